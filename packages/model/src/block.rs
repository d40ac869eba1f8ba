//! # Block Variants
//!
//! Every content block is one of a closed set of kinds, each with its own
//! payload. Two kinds are containers:
//!
//! - `card` holds child blocks in `data.blocks`
//! - `row` holds columns in `data.columns`, each column holding blocks
//!
//! ## Wire format
//!
//! ```json
//! { "id": "9f3a-4", "type": "heading", "data": { "text": "Hi", "level": 2 } }
//! ```
//!
//! Payload fields are all optional on the way in (missing ones take their
//! defaults). Keys a payload does not know about are kept in its `extra` map
//! and written back out unchanged.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};
use crate::id_generator::{BlockId, IdGenerator};
use crate::page::{Column, GridWidth};

/// Block type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Text,
    List,
    Image,
    Gallery,
    Carousel,
    Tabs,
    Accordion,
    Link,
    Spacer,
    Video,
    Card,
    Table,
    Row,
}

impl BlockKind {
    pub const ALL: [BlockKind; 14] = [
        BlockKind::Heading,
        BlockKind::Text,
        BlockKind::List,
        BlockKind::Image,
        BlockKind::Gallery,
        BlockKind::Carousel,
        BlockKind::Tabs,
        BlockKind::Accordion,
        BlockKind::Link,
        BlockKind::Spacer,
        BlockKind::Video,
        BlockKind::Card,
        BlockKind::Table,
        BlockKind::Row,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Text => "text",
            BlockKind::List => "list",
            BlockKind::Image => "image",
            BlockKind::Gallery => "gallery",
            BlockKind::Carousel => "carousel",
            BlockKind::Tabs => "tabs",
            BlockKind::Accordion => "accordion",
            BlockKind::Link => "link",
            BlockKind::Spacer => "spacer",
            BlockKind::Video => "video",
            BlockKind::Card => "card",
            BlockKind::Table => "table",
            BlockKind::Row => "row",
        }
    }

    pub fn is_container(self) -> bool {
        self.child_list_key().is_some()
    }

    /// Payload key that holds this kind's children, if it has any
    pub fn child_list_key(self) -> Option<&'static str> {
        match self {
            BlockKind::Card => Some("blocks"),
            BlockKind::Row => Some("columns"),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModelError::UnknownKind(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    #[default]
    Button,
    Text,
}

/// Image entry of a gallery or carousel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaItem {
    pub src: String,
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Titled panel of a tabs or accordion block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Panel {
    pub title: String,
    pub content: String,
}

/// Table cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cell {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeadingData {
    pub text: String,
    /// 1-6, as in `<h1>`..`<h6>`
    pub level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for HeadingData {
    fn default() -> Self {
        Self {
            text: String::new(),
            level: 2,
            alignment: None,
            color: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextData {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListData {
    pub items: Vec<String>,
    pub ordered: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageData {
    /// Opaque URL handed back by the upload collaborator
    pub src: String,
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryData {
    pub images: Vec<MediaItem>,
    /// Images per row
    pub columns: u8,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for GalleryData {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            columns: 3,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselData {
    pub images: Vec<MediaItem>,
    pub autoplay: bool,
    pub interval_ms: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CarouselData {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            autoplay: false,
            interval_ms: 5000,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TabsData {
    pub tabs: Vec<Panel>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TabsData {
    fn default() -> Self {
        Self {
            tabs: vec![Panel {
                title: "Tab 1".to_string(),
                content: String::new(),
            }],
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccordionData {
    pub items: Vec<Panel>,
    pub allow_multiple: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for AccordionData {
    fn default() -> Self {
        Self {
            items: vec![Panel {
                title: "Item 1".to_string(),
                content: String::new(),
            }],
            allow_multiple: false,
            extra: Map::new(),
        }
    }
}

/// Link or button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkData {
    pub text: String,
    pub href: String,
    pub style: LinkStyle,
    pub new_tab: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for LinkData {
    fn default() -> Self {
        Self {
            text: "Click here".to_string(),
            href: "#".to_string(),
            style: LinkStyle::Button,
            new_tab: false,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpacerData {
    /// Pixels
    pub height: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for SpacerData {
    fn default() -> Self {
        Self {
            height: 32,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoData {
    pub url: String,
    pub autoplay: bool,
    pub controls: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for VideoData {
    fn default() -> Self {
        Self {
            url: String::new(),
            autoplay: false,
            controls: true,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    pub blocks: Vec<Block>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TableData {
    fn default() -> Self {
        Self {
            headers: vec!["Column 1".to_string(), "Column 2".to_string()],
            rows: vec![vec![Cell::default(), Cell::default()]],
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RowData {
    pub columns: Vec<Column>,
    /// Gap between columns in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Variant payload of a block.
///
/// Serializes as the bare payload object; the tag travels next to it in
/// [`Block`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BlockData {
    Heading(HeadingData),
    Text(TextData),
    List(ListData),
    Image(ImageData),
    Gallery(GalleryData),
    Carousel(CarouselData),
    Tabs(TabsData),
    Accordion(AccordionData),
    Link(LinkData),
    Spacer(SpacerData),
    Video(VideoData),
    Card(CardData),
    Table(TableData),
    Row(RowData),
}

impl BlockData {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockData::Heading(_) => BlockKind::Heading,
            BlockData::Text(_) => BlockKind::Text,
            BlockData::List(_) => BlockKind::List,
            BlockData::Image(_) => BlockKind::Image,
            BlockData::Gallery(_) => BlockKind::Gallery,
            BlockData::Carousel(_) => BlockKind::Carousel,
            BlockData::Tabs(_) => BlockKind::Tabs,
            BlockData::Accordion(_) => BlockKind::Accordion,
            BlockData::Link(_) => BlockKind::Link,
            BlockData::Spacer(_) => BlockKind::Spacer,
            BlockData::Video(_) => BlockKind::Video,
            BlockData::Card(_) => BlockKind::Card,
            BlockData::Table(_) => BlockKind::Table,
            BlockData::Row(_) => BlockKind::Row,
        }
    }

    /// Payload for a freshly added block. Rows get two half-width columns,
    /// which need ids of their own.
    pub fn new_default(kind: BlockKind, ids: &mut IdGenerator) -> Self {
        match kind {
            BlockKind::Heading => BlockData::Heading(HeadingData::default()),
            BlockKind::Text => BlockData::Text(TextData::default()),
            BlockKind::List => BlockData::List(ListData::default()),
            BlockKind::Image => BlockData::Image(ImageData::default()),
            BlockKind::Gallery => BlockData::Gallery(GalleryData::default()),
            BlockKind::Carousel => BlockData::Carousel(CarouselData::default()),
            BlockKind::Tabs => BlockData::Tabs(TabsData::default()),
            BlockKind::Accordion => BlockData::Accordion(AccordionData::default()),
            BlockKind::Link => BlockData::Link(LinkData::default()),
            BlockKind::Spacer => BlockData::Spacer(SpacerData::default()),
            BlockKind::Video => BlockData::Video(VideoData::default()),
            BlockKind::Card => BlockData::Card(CardData::default()),
            BlockKind::Table => BlockData::Table(TableData::default()),
            BlockKind::Row => BlockData::Row(RowData {
                columns: vec![
                    Column::new(ids.column_id(), GridWidth::clamped(6)),
                    Column::new(ids.column_id(), GridWidth::clamped(6)),
                ],
                ..RowData::default()
            }),
        }
    }

    /// Decode a payload object for `kind`. `null` decodes to the defaults.
    pub fn from_value(kind: BlockKind, value: Value) -> ModelResult<Self> {
        let value = match value {
            Value::Null => Value::Object(Map::new()),
            Value::Object(_) => value,
            _ => return Err(ModelError::NotAnObject),
        };

        Ok(match kind {
            BlockKind::Heading => BlockData::Heading(serde_json::from_value(value)?),
            BlockKind::Text => BlockData::Text(serde_json::from_value(value)?),
            BlockKind::List => BlockData::List(serde_json::from_value(value)?),
            BlockKind::Image => BlockData::Image(serde_json::from_value(value)?),
            BlockKind::Gallery => BlockData::Gallery(serde_json::from_value(value)?),
            BlockKind::Carousel => BlockData::Carousel(serde_json::from_value(value)?),
            BlockKind::Tabs => BlockData::Tabs(serde_json::from_value(value)?),
            BlockKind::Accordion => BlockData::Accordion(serde_json::from_value(value)?),
            BlockKind::Link => BlockData::Link(serde_json::from_value(value)?),
            BlockKind::Spacer => BlockData::Spacer(serde_json::from_value(value)?),
            BlockKind::Video => BlockData::Video(serde_json::from_value(value)?),
            BlockKind::Card => BlockData::Card(serde_json::from_value(value)?),
            BlockKind::Table => BlockData::Table(serde_json::from_value(value)?),
            BlockKind::Row => BlockData::Row(serde_json::from_value(value)?),
        })
    }

    pub fn to_value(&self) -> ModelResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Shallow merge: keys in `patch` replace the payload's keys, every other
    /// key is kept. The kind never changes.
    pub fn merged(&self, patch: &Map<String, Value>) -> ModelResult<Self> {
        let mut value = self.to_value()?;
        let Value::Object(fields) = &mut value else {
            return Err(ModelError::NotAnObject);
        };

        for (key, field) in patch {
            fields.insert(key.clone(), field.clone());
        }

        Self::from_value(self.kind(), value)
    }
}

/// A content block
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    pub id: BlockId,
    pub data: BlockData,
}

#[derive(Deserialize)]
struct RawBlock {
    id: BlockId,
    #[serde(rename = "type")]
    kind: BlockKind,
    #[serde(default)]
    data: Value,
}

impl TryFrom<RawBlock> for Block {
    type Error = ModelError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        Ok(Block {
            id: raw.id,
            data: BlockData::from_value(raw.kind, raw.data)?,
        })
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Block", 3)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", &self.kind())?;
        state.serialize_field("data", &self.data)?;
        state.end()
    }
}

impl Block {
    pub fn new(id: BlockId, data: BlockData) -> Self {
        Self { id, data }
    }

    /// New block of `kind` with default payload and a fresh id
    pub fn new_default(ids: &mut IdGenerator, kind: BlockKind) -> Self {
        let id = ids.block_id();
        let data = BlockData::new_default(kind, ids);
        Self { id, data }
    }

    pub fn kind(&self) -> BlockKind {
        self.data.kind()
    }

    /// Child block lists: one per column for a row, the card's own list for
    /// a card, none for leaf kinds.
    pub fn child_lists(&self) -> Vec<&Vec<Block>> {
        match &self.data {
            BlockData::Row(row) => row.columns.iter().map(|c| &c.blocks).collect(),
            BlockData::Card(card) => vec![&card.blocks],
            _ => Vec::new(),
        }
    }

    pub fn child_lists_mut(&mut self) -> Vec<&mut Vec<Block>> {
        match &mut self.data {
            BlockData::Row(row) => row.columns.iter_mut().map(|c| &mut c.blocks).collect(),
            BlockData::Card(card) => vec![&mut card.blocks],
            _ => Vec::new(),
        }
    }

    pub fn columns(&self) -> Option<&[Column]> {
        match &self.data {
            BlockData::Row(row) => Some(&row.columns),
            _ => None,
        }
    }

    pub fn columns_mut(&mut self) -> Option<&mut Vec<Column>> {
        match &mut self.data {
            BlockData::Row(row) => Some(&mut row.columns),
            _ => None,
        }
    }

    pub fn card_blocks_mut(&mut self) -> Option<&mut Vec<Block>> {
        match &mut self.data {
            BlockData::Card(card) => Some(&mut card.blocks),
            _ => None,
        }
    }
}
