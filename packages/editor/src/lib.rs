//! # Pagecraft Editor
//!
//! Editing engine for block-based page layouts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Page → Section → Block (row/card …)  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: session + mutations                 │
//! │  - Locate nodes by id at any depth          │
//! │  - Apply validated mutations                │
//! │  - Selection and layout bookkeeping         │
//! │  - Snapshot undo/redo, JSON persistence     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ render-html: Page + Selection → HTML        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Explicit session**: All state lives in an [`EditSession`]; nothing is global
//! 2. **Ids are forever**: Every node gets a fresh id at creation, never reused
//! 3. **Stale ids are harmless**: A mutation naming a missing node changes nothing
//! 4. **Single writer**: Mutations run to completion, one at a time
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{Document, EditSession};
//! use pagecraft_model::BlockKind;
//!
//! let doc = Document::load("pages/home.json".into())?;
//! let mut session = EditSession::new("editor-1", doc);
//!
//! let sections = session.set_page_layout(&[6, 6]);
//! let heading = session.add_block(sections[0].as_str(), BlockKind::Heading).unwrap();
//! session.update_block(heading.as_str(), serde_json::json!({ "text": "Hello" })
//!     .as_object().cloned().unwrap());
//!
//! session.save()?;
//! ```

mod assets;
mod document;
mod errors;
pub mod layout;
mod mutations;
mod search;
mod selection;
mod session;
mod undo_stack;

pub use assets::{AssetStore, DirAssetStore};
pub use document::{Document, DocumentStorage};
pub use errors::EditorError;
pub use mutations::{Applied, Mutation, MutationError};
pub use selection::Selection;
pub use session::EditSession;
pub use undo_stack::{MutationBatch, Snapshot, UndoStack};

// Re-export model types for convenience
pub use pagecraft_model::{Block, BlockData, BlockId, BlockKind, ColumnId, Page, SectionId};
