use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::id_generator::{ColumnId, SectionId};

/// Number of units in the layout grid
pub const GRID_UNITS: u8 = 12;

/// Width in grid units, always within 1..=12.
///
/// Out-of-range input is clamped rather than rejected, both when built in
/// code and when read back from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct GridWidth(u8);

impl GridWidth {
    pub const FULL: GridWidth = GridWidth(GRID_UNITS);

    pub fn clamped(units: i64) -> Self {
        Self(units.clamp(1, GRID_UNITS as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for GridWidth {
    fn default() -> Self {
        Self::FULL
    }
}

impl From<i64> for GridWidth {
    fn from(units: i64) -> Self {
        Self::clamped(units)
    }
}

impl From<GridWidth> for u8 {
    fn from(width: GridWidth) -> Self {
        width.0
    }
}

/// A page: the ordered list of top-level sections.
///
/// Serializes as a bare JSON array of sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Page {
    pub sections: Vec<Section>,
}

/// Top-level page container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    #[serde(default)]
    pub width: GridWidth,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// Grid slot inside a `row` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    #[serde(default)]
    pub width: GridWidth,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(id: SectionId, width: GridWidth) -> Self {
        Self {
            id,
            width,
            blocks: Vec::new(),
        }
    }
}

impl Column {
    pub fn new(id: ColumnId, width: GridWidth) -> Self {
        Self {
            id,
            width,
            blocks: Vec::new(),
        }
    }
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_index(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Depth-first search for a block anywhere in the page.
    pub fn find_block(&self, id: &str) -> Option<&Block> {
        self.sections
            .iter()
            .find_map(|section| find_in(&section.blocks, id))
    }

    /// Id of the section whose subtree holds `block_id`
    pub fn section_of(&self, block_id: &str) -> Option<&SectionId> {
        self.sections
            .iter()
            .find(|section| find_in(&section.blocks, block_id).is_some())
            .map(|section| &section.id)
    }

    /// Total number of blocks at every depth
    pub fn block_count(&self) -> usize {
        fn count(blocks: &[Block]) -> usize {
            blocks
                .iter()
                .map(|b| 1 + b.child_lists().into_iter().map(|l| count(l)).sum::<usize>())
                .sum()
        }

        self.sections.iter().map(|s| count(&s.blocks)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn find_in<'a>(blocks: &'a [Block], id: &str) -> Option<&'a Block> {
    for block in blocks {
        if block.id == id {
            return Some(block);
        }
        for list in block.child_lists() {
            if let Some(found) = find_in(list, id) {
                return Some(found);
            }
        }
    }
    None
}
