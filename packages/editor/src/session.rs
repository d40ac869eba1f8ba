//! # Edit Session Management
//!
//! An EditSession is one editor's working state: the document, the current
//! selection, the id generator and the undo history. Every operation goes
//! through it; there is no global editor state.
//!
//! Named operations never fail loudly. A stale or mismatched id leaves the
//! page as it was and the method reports that through its return value
//! (`None` / `false`). Use [`EditSession::apply`] to see the reason.

use pagecraft_model::{BlockId, BlockKind, ColumnId, GridWidth, IdGenerator, Page, SectionId};
use serde_json::{Map, Value};
use tracing::debug;

use crate::undo_stack::Snapshot;
use crate::{Applied, Document, EditorError, Mutation, MutationError, Selection, UndoStack};

/// Single edit session
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    /// Document being edited
    document: Document,

    /// Selected section or block
    selection: Selection,

    /// Source of fresh node ids; never rolled back by undo
    ids: IdGenerator,

    history: UndoStack,
}

impl EditSession {
    /// Create new edit session
    pub fn new(id: impl Into<String>, document: Document) -> Self {
        let ids = document.id_generator();

        Self {
            id: id.into(),
            document,
            selection: Selection::None,
            ids,
            history: UndoStack::new(),
        }
    }

    /// Limit the undo history (0 = unlimited)
    pub fn with_undo_levels(mut self, levels: usize) -> Self {
        self.history = UndoStack::with_max_levels(levels);
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn page(&self) -> &Page {
        self.document.page()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Apply a mutation and record it for undo.
    ///
    /// `Err` means nothing changed; `Ok` with `changed == false` means the
    /// target was found but already in the requested state.
    pub fn apply(&mut self, mutation: Mutation) -> Result<Applied, MutationError> {
        let before = Snapshot::capture(self.document.page(), &self.selection);

        let applied = self.document.apply(&mutation, &mut self.ids)?;
        if applied.changed {
            if self.selection.reconcile(self.document.page()) {
                debug!(session = %self.id, "selection cleared, node removed");
            }
            self.history.record(before, mutation);
        }

        Ok(applied)
    }

    fn apply_or_skip(&mut self, mutation: Mutation) -> Option<Applied> {
        let name = mutation.name();
        match self.apply(mutation) {
            Ok(applied) => Some(applied),
            Err(e) => {
                debug!(session = %self.id, mutation = name, error = %e, "mutation skipped");
                None
            }
        }
    }

    /// Replace the page with one empty section per width. Returns the new
    /// section ids.
    pub fn set_page_layout(&mut self, column_widths: &[u32]) -> Vec<SectionId> {
        let mutation = Mutation::SetPageLayout {
            column_widths: column_widths
                .iter()
                .map(|w| GridWidth::clamped(*w as i64))
                .collect(),
        };

        self.apply_or_skip(mutation)
            .map(|applied| applied.created.into_iter().map(SectionId::from).collect())
            .unwrap_or_default()
    }

    pub fn add_section(&mut self, width: u32) -> Option<SectionId> {
        let mutation = Mutation::AddSection {
            width: GridWidth::clamped(width as i64),
        };
        self.created(mutation).map(SectionId::from)
    }

    pub fn remove_section(&mut self, section_id: &str) -> bool {
        self.changed(Mutation::RemoveSection {
            section_id: SectionId::from(section_id),
        })
    }

    pub fn set_section_width(&mut self, section_id: &str, width: u32) -> bool {
        self.changed(Mutation::SetSectionWidth {
            section_id: SectionId::from(section_id),
            width: GridWidth::clamped(width as i64),
        })
    }

    /// Append a default block to a section
    pub fn add_block(&mut self, section_id: &str, kind: BlockKind) -> Option<BlockId> {
        let mutation = Mutation::AddBlock {
            section_id: SectionId::from(section_id),
            kind,
        };
        self.created(mutation).map(BlockId::from)
    }

    /// Append a default block to a column of a row block (at any depth)
    pub fn add_block_to_column(
        &mut self,
        row_block_id: &str,
        column_id: &str,
        kind: BlockKind,
    ) -> Option<BlockId> {
        let mutation = Mutation::AddBlockToColumn {
            row_block_id: BlockId::from(row_block_id),
            column_id: ColumnId::from(column_id),
            kind,
        };
        self.created(mutation).map(BlockId::from)
    }

    /// Append a default block to a card block (at any depth)
    pub fn add_block_to_card(&mut self, card_block_id: &str, kind: BlockKind) -> Option<BlockId> {
        let mutation = Mutation::AddBlockToCard {
            card_block_id: BlockId::from(card_block_id),
            kind,
        };
        self.created(mutation).map(BlockId::from)
    }

    /// Remove a block and its subtree. Clears the selection if it pointed
    /// into the removed subtree.
    pub fn remove_block(&mut self, block_id: &str) -> bool {
        self.changed(Mutation::RemoveBlock {
            block_id: BlockId::from(block_id),
        })
    }

    pub fn move_block(&mut self, section_id: &str, from_index: usize, to_index: usize) -> bool {
        self.changed(Mutation::MoveBlock {
            section_id: SectionId::from(section_id),
            from_index,
            to_index,
        })
    }

    /// Shallow-merge `patch` into the block's data
    pub fn update_block(&mut self, block_id: &str, patch: Map<String, Value>) -> bool {
        self.changed(Mutation::UpdateBlock {
            block_id: BlockId::from(block_id),
            patch,
        })
    }

    pub fn duplicate_block(&mut self, block_id: &str) -> Option<BlockId> {
        let mutation = Mutation::DuplicateBlock {
            block_id: BlockId::from(block_id),
        };
        self.created(mutation).map(BlockId::from)
    }

    pub fn add_column(&mut self, row_block_id: &str, width: u32) -> Option<ColumnId> {
        let mutation = Mutation::AddColumn {
            row_block_id: BlockId::from(row_block_id),
            width: GridWidth::clamped(width as i64),
        };
        self.created(mutation).map(ColumnId::from)
    }

    pub fn remove_column(&mut self, row_block_id: &str, column_id: &str) -> bool {
        self.changed(Mutation::RemoveColumn {
            row_block_id: BlockId::from(row_block_id),
            column_id: ColumnId::from(column_id),
        })
    }

    pub fn set_column_width(&mut self, row_block_id: &str, column_id: &str, width: u32) -> bool {
        self.changed(Mutation::SetColumnWidth {
            row_block_id: BlockId::from(row_block_id),
            column_id: ColumnId::from(column_id),
            width: GridWidth::clamped(width as i64),
        })
    }

    fn created(&mut self, mutation: Mutation) -> Option<String> {
        self.apply_or_skip(mutation)
            .and_then(|applied| applied.created.into_iter().next())
    }

    fn changed(&mut self, mutation: Mutation) -> bool {
        self.apply_or_skip(mutation)
            .map_or(false, |applied| applied.changed)
    }

    /// Select a block (clears any section selection)
    pub fn select_block(&mut self, block_id: &str) -> bool {
        self.selection.select_block(self.document.page(), block_id)
    }

    /// Select a section (clears any block selection)
    pub fn select_section(&mut self, section_id: &str) -> bool {
        self.selection.select_section(self.document.page(), section_id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Group the following mutations into one undo step
    pub fn begin_batch(&mut self, description: impl Into<String>) {
        self.history.begin_batch();
        self.history.set_batch_description(description);
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    pub fn undo(&mut self) -> bool {
        let mut current = Snapshot::capture(self.document.page(), &self.selection);
        if !self.history.undo(&mut current) {
            return false;
        }
        self.restore(current);
        true
    }

    pub fn redo(&mut self) -> bool {
        let mut current = Snapshot::capture(self.document.page(), &self.selection);
        if !self.history.redo(&mut current) {
            return false;
        }
        self.restore(current);
        true
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.document.replace_page(snapshot.page);
        self.selection = snapshot.selection;
        self.selection.reconcile(self.document.page());
    }

    /// Persist the document (file-backed documents only)
    pub fn save(&mut self) -> Result<(), EditorError> {
        self.document.save()
    }
}
