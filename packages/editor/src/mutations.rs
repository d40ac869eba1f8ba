//! # Page Mutations
//!
//! Named edit operations on a page tree.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: Each mutation is one editor action (add, remove,
//!    move, patch, restructure)
//! 2. **Validated first**: Every check runs before the first write, so an
//!    `Err` always leaves the page exactly as it was
//! 3. **Explicit outcome**: A stale id is an `Err`, an edit that found its
//!    target but had nothing to do is `Ok` with `changed == false`
//!
//! ## Mutation Semantics
//!
//! ### RemoveBlock
//! - Removes the block and its whole subtree, at any depth
//! - A second removal of the same id reports `BlockNotFound`
//!
//! ### UpdateBlock
//! - Shallow merge of a JSON object into the block's payload
//! - Keys the payload does not know are kept as-is
//! - The child list of a container (`blocks` on card, `columns` on row) is
//!   never replaced through a patch
//!
//! ### MoveBlock
//! - Reorders the direct children of one section
//! - `to_index` is clamped to the last position

use pagecraft_common::{
    collect_ids, collect_subtree_ids, walk_block_mut, walk_column_mut, VisitorMut,
};
use pagecraft_model::{
    Block, BlockId, BlockKind, Column, ColumnId, GridWidth, IdGenerator, Page, Section, SectionId,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::search;

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Replace every section with fresh empty ones, one per width
    SetPageLayout { column_widths: Vec<GridWidth> },

    /// Append an empty section
    AddSection { width: GridWidth },

    /// Remove a section with everything in it
    RemoveSection { section_id: SectionId },

    SetSectionWidth {
        section_id: SectionId,
        width: GridWidth,
    },

    /// Append a default block to a section
    AddBlock {
        section_id: SectionId,
        kind: BlockKind,
    },

    /// Append a default block to one column of a row block
    AddBlockToColumn {
        row_block_id: BlockId,
        column_id: ColumnId,
        kind: BlockKind,
    },

    /// Append a default block to a card block
    AddBlockToCard {
        card_block_id: BlockId,
        kind: BlockKind,
    },

    /// Remove a block and its subtree from anywhere in the page
    RemoveBlock { block_id: BlockId },

    /// Reorder the top-level blocks of a section
    MoveBlock {
        section_id: SectionId,
        from_index: usize,
        to_index: usize,
    },

    /// Shallow-merge fields into a block's payload
    UpdateBlock {
        block_id: BlockId,
        patch: Map<String, Value>,
    },

    /// Insert a deep copy (with fresh ids) right after the block
    DuplicateBlock { block_id: BlockId },

    AddColumn {
        row_block_id: BlockId,
        width: GridWidth,
    },

    RemoveColumn {
        row_block_id: BlockId,
        column_id: ColumnId,
    },

    SetColumnWidth {
        row_block_id: BlockId,
        column_id: ColumnId,
        width: GridWidth,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Column {column_id} not found in row {row_id}")]
    ColumnNotFound { row_id: String, column_id: String },

    #[error("Block {0} is not a row")]
    NotARow(String),

    #[error("Block {0} is not a card")]
    NotACard(String),

    #[error("Rows cannot be placed inside a column")]
    RowInColumn,

    #[error("Index {index} out of bounds for section with {len} blocks")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Patch key '{key}' would replace the children of block {block_id}")]
    ChildListPatch { block_id: String, key: String },

    #[error("Invalid patch for block {block_id}: {message}")]
    InvalidPatch { block_id: String, message: String },

    #[error("Row {0} must keep at least one column")]
    LastColumn(String),
}

impl MutationError {
    /// The mutation named an id that is not (or no longer) in the page
    pub fn is_stale_reference(&self) -> bool {
        matches!(
            self,
            MutationError::SectionNotFound(_)
                | MutationError::BlockNotFound(_)
                | MutationError::ColumnNotFound { .. }
        )
    }
}

/// What an applied mutation did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Applied {
    /// False when the target was found but already in the requested state
    pub changed: bool,

    /// Ids of nodes created, outermost first
    pub created: Vec<String>,

    /// Ids of every node removed, descendants included
    pub removed: Vec<String>,
}

impl Applied {
    fn unchanged() -> Self {
        Self::default()
    }

    fn changed() -> Self {
        Self {
            changed: true,
            ..Self::default()
        }
    }

    fn created(ids: Vec<String>) -> Self {
        Self {
            changed: true,
            created: ids,
            removed: Vec::new(),
        }
    }

    fn removed(ids: Vec<String>) -> Self {
        Self {
            changed: true,
            created: Vec::new(),
            removed: ids,
        }
    }
}

impl Mutation {
    /// Apply mutation to the page with validation
    pub fn apply(&self, page: &mut Page, ids: &mut IdGenerator) -> Result<Applied, MutationError> {
        // Validate first
        self.validate(page)?;

        let applied = match self {
            Mutation::SetPageLayout { column_widths } => {
                Self::apply_set_page_layout(page, ids, column_widths)
            }

            Mutation::AddSection { width } => {
                let section = Section::new(ids.section_id(), *width);
                let id = section.id.to_string();
                page.sections.push(section);
                Ok(Applied::created(vec![id]))
            }

            Mutation::RemoveSection { section_id } => Self::apply_remove_section(page, section_id),

            Mutation::SetSectionWidth { section_id, width } => {
                let section = search::section_mut(page, section_id.as_str())
                    .ok_or_else(|| MutationError::SectionNotFound(section_id.to_string()))?;
                Ok(Self::set_width(&mut section.width, *width))
            }

            Mutation::AddBlock { section_id, kind } => {
                let section = search::section_mut(page, section_id.as_str())
                    .ok_or_else(|| MutationError::SectionNotFound(section_id.to_string()))?;
                Ok(Self::push_new_block(&mut section.blocks, ids, *kind))
            }

            Mutation::AddBlockToColumn {
                row_block_id,
                column_id,
                kind,
            } => {
                let column = Self::column_mut(page, row_block_id, column_id)?;
                Ok(Self::push_new_block(&mut column.blocks, ids, *kind))
            }

            Mutation::AddBlockToCard {
                card_block_id,
                kind,
            } => {
                let card = search::find_block_mut(page, card_block_id.as_str())
                    .ok_or_else(|| MutationError::BlockNotFound(card_block_id.to_string()))?;
                let blocks = card
                    .card_blocks_mut()
                    .ok_or_else(|| MutationError::NotACard(card_block_id.to_string()))?;
                Ok(Self::push_new_block(blocks, ids, *kind))
            }

            Mutation::RemoveBlock { block_id } => {
                let removed = search::remove_block(page, block_id.as_str())
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;
                Ok(Applied::removed(collect_subtree_ids(&removed)))
            }

            Mutation::MoveBlock {
                section_id,
                from_index,
                to_index,
            } => Self::apply_move(page, section_id, *from_index, *to_index),

            Mutation::UpdateBlock { block_id, patch } => Self::apply_update(page, block_id, patch),

            Mutation::DuplicateBlock { block_id } => Self::apply_duplicate(page, ids, block_id),

            Mutation::AddColumn {
                row_block_id,
                width,
            } => {
                let columns = Self::columns_mut(page, row_block_id)?;
                let column = Column::new(ids.column_id(), *width);
                let id = column.id.to_string();
                columns.push(column);
                Ok(Applied::created(vec![id]))
            }

            Mutation::RemoveColumn {
                row_block_id,
                column_id,
            } => Self::apply_remove_column(page, row_block_id, column_id),

            Mutation::SetColumnWidth {
                row_block_id,
                column_id,
                width,
            } => {
                let column = Self::column_mut(page, row_block_id, column_id)?;
                Ok(Self::set_width(&mut column.width, *width))
            }
        }?;

        debug!(
            mutation = self.name(),
            changed = applied.changed,
            created = applied.created.len(),
            removed = applied.removed.len(),
            "applied mutation"
        );

        Ok(applied)
    }

    fn apply_set_page_layout(
        page: &mut Page,
        ids: &mut IdGenerator,
        widths: &[GridWidth],
    ) -> Result<Applied, MutationError> {
        let sections: Vec<Section> = widths
            .iter()
            .map(|width| Section::new(ids.section_id(), *width))
            .collect();

        let applied = Applied {
            changed: true,
            created: sections.iter().map(|s| s.id.to_string()).collect(),
            removed: collect_ids(page),
        };

        page.sections = sections;
        Ok(applied)
    }

    fn apply_remove_section(page: &mut Page, section_id: &SectionId) -> Result<Applied, MutationError> {
        let index = page
            .section_index(section_id.as_str())
            .ok_or_else(|| MutationError::SectionNotFound(section_id.to_string()))?;

        let section = page.sections.remove(index);
        let mut removed = vec![section.id.to_string()];
        for block in &section.blocks {
            removed.extend(collect_subtree_ids(block));
        }

        Ok(Applied::removed(removed))
    }

    fn apply_move(
        page: &mut Page,
        section_id: &SectionId,
        from_index: usize,
        to_index: usize,
    ) -> Result<Applied, MutationError> {
        let section = search::section_mut(page, section_id.as_str())
            .ok_or_else(|| MutationError::SectionNotFound(section_id.to_string()))?;

        let len = section.blocks.len();
        if from_index >= len {
            return Err(MutationError::IndexOutOfBounds {
                index: from_index,
                len,
            });
        }

        let to_index = to_index.min(len - 1);
        if from_index == to_index {
            return Ok(Applied::unchanged());
        }

        let block = section.blocks.remove(from_index);
        section.blocks.insert(to_index, block);
        Ok(Applied::changed())
    }

    fn apply_update(
        page: &mut Page,
        block_id: &BlockId,
        patch: &Map<String, Value>,
    ) -> Result<Applied, MutationError> {
        let block = search::find_block_mut(page, block_id.as_str())
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;

        let merged = block
            .data
            .merged(patch)
            .map_err(|e| MutationError::InvalidPatch {
                block_id: block_id.to_string(),
                message: e.to_string(),
            })?;

        if merged == block.data {
            return Ok(Applied::unchanged());
        }

        block.data = merged;
        Ok(Applied::changed())
    }

    fn apply_duplicate(
        page: &mut Page,
        ids: &mut IdGenerator,
        block_id: &BlockId,
    ) -> Result<Applied, MutationError> {
        let (list, pos) = search::locate_block_mut(page, block_id.as_str())
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;

        let mut copy = list[pos].clone();
        Reassign { ids }.visit_block_mut(&mut copy);
        let created = collect_subtree_ids(&copy);

        list.insert(pos + 1, copy);
        Ok(Applied::created(created))
    }

    fn apply_remove_column(
        page: &mut Page,
        row_block_id: &BlockId,
        column_id: &ColumnId,
    ) -> Result<Applied, MutationError> {
        let columns = Self::columns_mut(page, row_block_id)?;
        if columns.len() <= 1 {
            return Err(MutationError::LastColumn(row_block_id.to_string()));
        }

        let index = columns
            .iter()
            .position(|c| c.id == *column_id)
            .ok_or_else(|| MutationError::ColumnNotFound {
                row_id: row_block_id.to_string(),
                column_id: column_id.to_string(),
            })?;

        let column = columns.remove(index);
        let mut removed = vec![column.id.to_string()];
        for block in &column.blocks {
            removed.extend(collect_subtree_ids(block));
        }

        Ok(Applied::removed(removed))
    }

    fn push_new_block(blocks: &mut Vec<Block>, ids: &mut IdGenerator, kind: BlockKind) -> Applied {
        let block = Block::new_default(ids, kind);
        let created = collect_subtree_ids(&block);
        blocks.push(block);
        Applied::created(created)
    }

    fn set_width(current: &mut GridWidth, width: GridWidth) -> Applied {
        if *current == width {
            return Applied::unchanged();
        }
        *current = width;
        Applied::changed()
    }

    fn columns_mut<'p>(
        page: &'p mut Page,
        row_block_id: &BlockId,
    ) -> Result<&'p mut Vec<Column>, MutationError> {
        let row = search::find_block_mut(page, row_block_id.as_str())
            .ok_or_else(|| MutationError::BlockNotFound(row_block_id.to_string()))?;

        row.columns_mut()
            .ok_or_else(|| MutationError::NotARow(row_block_id.to_string()))
    }

    fn column_mut<'p>(
        page: &'p mut Page,
        row_block_id: &BlockId,
        column_id: &ColumnId,
    ) -> Result<&'p mut Column, MutationError> {
        Self::columns_mut(page, row_block_id)?
            .iter_mut()
            .find(|c| c.id == *column_id)
            .ok_or_else(|| MutationError::ColumnNotFound {
                row_id: row_block_id.to_string(),
                column_id: column_id.to_string(),
            })
    }

    /// Validate without applying
    pub fn validate(&self, page: &Page) -> Result<(), MutationError> {
        match self {
            Mutation::SetPageLayout { .. } | Mutation::AddSection { .. } => Ok(()),

            Mutation::RemoveSection { section_id }
            | Mutation::SetSectionWidth { section_id, .. }
            | Mutation::AddBlock { section_id, .. } => {
                Self::section(page, section_id)?;
                Ok(())
            }

            Mutation::MoveBlock {
                section_id,
                from_index,
                ..
            } => {
                let section = Self::section(page, section_id)?;
                if *from_index >= section.blocks.len() {
                    return Err(MutationError::IndexOutOfBounds {
                        index: *from_index,
                        len: section.blocks.len(),
                    });
                }
                Ok(())
            }

            Mutation::AddBlockToColumn {
                row_block_id,
                column_id,
                kind,
            } => {
                let row = Self::row(page, row_block_id)?;
                Self::column(row, row_block_id, column_id)?;

                // Rows only live in sections and cards
                if *kind == BlockKind::Row {
                    return Err(MutationError::RowInColumn);
                }
                Ok(())
            }

            Mutation::AddBlockToCard { card_block_id, .. } => {
                let card = Self::block(page, card_block_id)?;
                match card.kind() {
                    BlockKind::Card => Ok(()),
                    _ => Err(MutationError::NotACard(card_block_id.to_string())),
                }
            }

            Mutation::RemoveBlock { block_id } | Mutation::DuplicateBlock { block_id } => {
                Self::block(page, block_id)?;
                Ok(())
            }

            Mutation::UpdateBlock { block_id, patch } => {
                let block = Self::block(page, block_id)?;

                if let Some(key) = block.kind().child_list_key() {
                    if patch.contains_key(key) {
                        return Err(MutationError::ChildListPatch {
                            block_id: block_id.to_string(),
                            key: key.to_string(),
                        });
                    }
                }

                block
                    .data
                    .merged(patch)
                    .map_err(|e| MutationError::InvalidPatch {
                        block_id: block_id.to_string(),
                        message: e.to_string(),
                    })?;
                Ok(())
            }

            Mutation::AddColumn { row_block_id, .. } => {
                Self::row(page, row_block_id)?;
                Ok(())
            }

            Mutation::RemoveColumn {
                row_block_id,
                column_id,
            } => {
                let row = Self::row(page, row_block_id)?;
                Self::column(row, row_block_id, column_id)?;

                if row.columns().map_or(0, |c| c.len()) <= 1 {
                    return Err(MutationError::LastColumn(row_block_id.to_string()));
                }
                Ok(())
            }

            Mutation::SetColumnWidth {
                row_block_id,
                column_id,
                ..
            } => {
                let row = Self::row(page, row_block_id)?;
                Self::column(row, row_block_id, column_id)?;
                Ok(())
            }
        }
    }

    fn section<'p>(page: &'p Page, section_id: &SectionId) -> Result<&'p Section, MutationError> {
        page.section(section_id.as_str())
            .ok_or_else(|| MutationError::SectionNotFound(section_id.to_string()))
    }

    fn block<'p>(page: &'p Page, block_id: &BlockId) -> Result<&'p Block, MutationError> {
        page.find_block(block_id.as_str())
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))
    }

    fn row<'p>(page: &'p Page, row_block_id: &BlockId) -> Result<&'p Block, MutationError> {
        let block = Self::block(page, row_block_id)?;
        match block.kind() {
            BlockKind::Row => Ok(block),
            _ => Err(MutationError::NotARow(row_block_id.to_string())),
        }
    }

    fn column<'p>(
        row: &'p Block,
        row_block_id: &BlockId,
        column_id: &ColumnId,
    ) -> Result<&'p Column, MutationError> {
        row.columns()
            .and_then(|columns| columns.iter().find(|c| c.id == *column_id))
            .ok_or_else(|| MutationError::ColumnNotFound {
                row_id: row_block_id.to_string(),
                column_id: column_id.to_string(),
            })
    }

    /// Get a debug name for this mutation
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::SetPageLayout { .. } => "set_page_layout",
            Mutation::AddSection { .. } => "add_section",
            Mutation::RemoveSection { .. } => "remove_section",
            Mutation::SetSectionWidth { .. } => "set_section_width",
            Mutation::AddBlock { .. } => "add_block",
            Mutation::AddBlockToColumn { .. } => "add_block_to_column",
            Mutation::AddBlockToCard { .. } => "add_block_to_card",
            Mutation::RemoveBlock { .. } => "remove_block",
            Mutation::MoveBlock { .. } => "move_block",
            Mutation::UpdateBlock { .. } => "update_block",
            Mutation::DuplicateBlock { .. } => "duplicate_block",
            Mutation::AddColumn { .. } => "add_column",
            Mutation::RemoveColumn { .. } => "remove_column",
            Mutation::SetColumnWidth { .. } => "set_column_width",
        }
    }
}

/// Gives every node of a copied subtree a fresh id
struct Reassign<'g> {
    ids: &'g mut IdGenerator,
}

impl VisitorMut for Reassign<'_> {
    fn visit_block_mut(&mut self, block: &mut Block) {
        block.id = self.ids.block_id();
        walk_block_mut(self, block);
    }

    fn visit_column_mut(&mut self, column: &mut Column) {
        column.id = self.ids.column_id();
        walk_column_mut(self, column);
    }
}
