//! # Undo/Redo Stack
//!
//! Snapshot history layered on top of the mutation engine.
//!
//! ## Design
//!
//! - Before a mutation changes the page, the session records the page and
//!   selection as they were
//! - Undo swaps the recorded snapshot with the current state and moves the
//!   entry to the redo stack, so the entry now holds the state to redo into
//! - New mutations clear the redo stack
//! - Batches group several mutations into one undo step
//! - The id generator is not part of a snapshot: ids issued before an undo
//!   are never issued again
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! let before = Snapshot::capture(&page, &selection);
//! mutation.apply(&mut page, &mut ids)?;
//! stack.record(before, mutation);
//!
//! let mut current = Snapshot::capture(&page, &selection);
//! stack.undo(&mut current);
//! ```

use crate::{Mutation, Selection};
use pagecraft_model::Page;

/// Page and selection at one point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub page: Page,
    pub selection: Selection,
}

impl Snapshot {
    pub fn capture(page: &Page, selection: &Selection) -> Self {
        Self {
            page: page.clone(),
            selection: selection.clone(),
        }
    }
}

/// One undo step: the state on the other side of it and the mutations it
/// covers
#[derive(Debug, Clone)]
pub struct MutationBatch {
    /// The mutations in this batch (in application order)
    pub mutations: Vec<Mutation>,

    /// State to restore when this batch is undone (or redone)
    state: Snapshot,

    /// Optional description of this batch
    pub description: Option<String>,
}

impl MutationBatch {
    /// Create a single-mutation batch
    pub fn single(before: Snapshot, mutation: Mutation) -> Self {
        Self {
            mutations: vec![mutation],
            state: before,
            description: None,
        }
    }
}

/// Undo/redo stack for page editing
#[derive(Debug)]
pub struct UndoStack {
    /// Stack of applied batches (most recent last)
    undo_stack: Vec<MutationBatch>,

    /// Stack of undone batches (most recent last)
    redo_stack: Vec<MutationBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<MutationBatch>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Record a mutation that changed the page, with the state from just
    /// before it
    pub fn record(&mut self, before: Snapshot, mutation: Mutation) {
        if let Some(batch) = &mut self.current_batch {
            // The first mutation of a batch fixes the state to return to
            if batch.mutations.is_empty() {
                batch.state = before;
            }
            batch.mutations.push(mutation);
        } else {
            self.push_batch(MutationBatch::single(before, mutation));
        }
    }

    /// Start a batch of mutations (will be undone/redone together)
    pub fn begin_batch(&mut self) {
        self.end_batch();
        self.current_batch = Some(MutationBatch {
            mutations: Vec::new(),
            state: Snapshot::default(),
            description: None,
        });
    }

    /// End the current batch and push to undo stack
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if !batch.mutations.is_empty() {
                self.push_batch(batch);
            }
        }
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    /// Push a batch to the undo stack
    fn push_batch(&mut self, batch: MutationBatch) {
        self.undo_stack.push(batch);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // Clear redo stack (new action invalidates future)
        self.redo_stack.clear();
    }

    /// Undo the most recent batch, replacing `current` with the state before
    /// it. Returns false if there is nothing to undo.
    pub fn undo(&mut self, current: &mut Snapshot) -> bool {
        self.end_batch();

        if let Some(mut batch) = self.undo_stack.pop() {
            std::mem::swap(&mut batch.state, current);
            self.redo_stack.push(batch);
            true
        } else {
            false // Nothing to undo
        }
    }

    /// Redo the most recently undone batch. Returns false if there is
    /// nothing to redo.
    pub fn redo(&mut self, current: &mut Snapshot) -> bool {
        self.end_batch();

        if let Some(mut batch) = self.redo_stack.pop() {
            std::mem::swap(&mut batch.state, current);
            self.undo_stack.push(batch);
            true
        } else {
            false // Nothing to redo
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
