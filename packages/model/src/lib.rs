//! # Pagecraft Model
//!
//! The page tree: sections hold blocks, `row` blocks hold columns of
//! blocks, `card` blocks hold blocks directly.
//!
//! ```text
//! Page
//!  └─ Section (width 1-12)
//!      └─ Block
//!          ├─ row  → Column (width 1-12) → Block …
//!          ├─ card → Block …
//!          └─ leaf (heading, text, image, …)
//! ```
//!
//! This crate only defines the tree and read-only queries over it. Edits go
//! through `pagecraft-editor`.

pub mod block;
pub mod error;
pub mod id_generator;
pub mod page;

pub use block::*;
pub use error::{ModelError, ModelResult};
pub use id_generator::{get_document_id, BlockId, ColumnId, IdGenerator, SectionId};
pub use page::{Column, GridWidth, Page, Section};
