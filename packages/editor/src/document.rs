//! # Document Handle
//!
//! A Document is one page being edited, plus where it is persisted.
//! Documents can be:
//! - **Memory-backed**: Temporary, for testing or in-memory operations
//! - **File-backed**: Saved as JSON on disk
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Edit → Save
//!   ↓      ↓      ↓
//! JSON  Mutations JSON
//! ```
//!
//! The saved form is the plain section list; loading it back yields the same
//! tree.

use pagecraft_common::ensure_unique_ids;
use pagecraft_model::{IdGenerator, Page};
use std::path::PathBuf;
use tracing::info;

use crate::{Applied, EditorError, Mutation, MutationError};

/// Editable page document
#[derive(Debug)]
pub struct Document {
    /// Path to the page file (also seeds node ids)
    pub path: PathBuf,

    /// Current version number (increments on each change)
    pub version: u64,

    /// Backing storage strategy
    storage: DocumentStorage,
}

/// Storage backend for document
#[derive(Debug)]
pub enum DocumentStorage {
    /// In-memory only (for testing, temp docs)
    Memory { page: Page },

    /// File-backed
    File { page: Page, dirty: bool },
}

impl Document {
    /// Empty memory-backed document
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            version: 0,
            storage: DocumentStorage::Memory { page: Page::new() },
        }
    }

    /// Memory-backed document over an existing page
    pub fn from_page(path: PathBuf, page: Page) -> Result<Self, EditorError> {
        ensure_unique_ids(&page)?;

        Ok(Self {
            path,
            version: 0,
            storage: DocumentStorage::Memory { page },
        })
    }

    /// Memory-backed document from serialized JSON
    pub fn from_json(path: PathBuf, json: &str) -> Result<Self, EditorError> {
        let page: Page = serde_json::from_str(json)?;
        Self::from_page(path, page)
    }

    /// New file-backed document that does not exist on disk yet
    pub fn create(path: PathBuf, page: Page) -> Result<Self, EditorError> {
        ensure_unique_ids(&page)?;

        Ok(Self {
            path,
            version: 0,
            storage: DocumentStorage::File { page, dirty: true },
        })
    }

    /// Load document from file (file-backed)
    pub fn load(path: PathBuf) -> Result<Self, EditorError> {
        let source = std::fs::read_to_string(&path)?;
        let page: Page = serde_json::from_str(&source)?;
        ensure_unique_ids(&page)?;

        info!(
            path = %path.display(),
            sections = page.sections.len(),
            blocks = page.block_count(),
            "loaded page"
        );

        Ok(Self {
            path,
            version: 0,
            storage: DocumentStorage::File { page, dirty: false },
        })
    }

    pub fn page(&self) -> &Page {
        match &self.storage {
            DocumentStorage::Memory { page } => page,
            DocumentStorage::File { page, .. } => page,
        }
    }

    fn page_mut(&mut self) -> &mut Page {
        match &mut self.storage {
            DocumentStorage::Memory { page } => page,
            DocumentStorage::File { page, dirty } => {
                *dirty = true;
                page
            }
        }
    }

    /// Apply a mutation. The version only moves when the page changed.
    pub fn apply(
        &mut self,
        mutation: &Mutation,
        ids: &mut IdGenerator,
    ) -> Result<Applied, MutationError> {
        let applied = match &mut self.storage {
            DocumentStorage::Memory { page } => mutation.apply(page, ids)?,
            DocumentStorage::File { page, dirty } => {
                let applied = mutation.apply(page, ids)?;
                *dirty |= applied.changed;
                applied
            }
        };

        if applied.changed {
            self.version += 1;
        }
        Ok(applied)
    }

    /// Swap in a whole page (undo/redo), returning the previous one
    pub fn replace_page(&mut self, page: Page) -> Page {
        self.version += 1;
        std::mem::replace(self.page_mut(), page)
    }

    /// Id generator continuing after every id already in the page
    pub fn id_generator(&self) -> IdGenerator {
        let seed = pagecraft_model::get_document_id(&self.path.to_string_lossy());
        let ids = pagecraft_common::collect_ids(self.page());
        IdGenerator::resume(seed, ids.iter().map(String::as_str))
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DocumentStorage::File { dirty, .. } => *dirty,
            _ => false,
        }
    }

    /// Serialized section list
    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self.page())?)
    }

    /// Save document to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        let json = self.to_json()?;

        match &mut self.storage {
            DocumentStorage::File { dirty, .. } => {
                if let Some(parent) = self.path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                std::fs::write(&self.path, json)?;
                *dirty = false;
                info!(path = %self.path.display(), version = self.version, "saved page");
                Ok(())
            }
            _ => Err(EditorError::NotFileBacked),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_model::{BlockKind, GridWidth, SectionId};

    #[test]
    fn test_create_memory_document() {
        let doc = Document::new(PathBuf::from("home.json"));

        assert_eq!(doc.version, 0);
        assert!(!doc.is_dirty());
        assert!(doc.page().is_empty());
    }

    #[test]
    fn test_document_version_tracks_changes() {
        let mut doc = Document::new(PathBuf::from("home.json"));
        let mut ids = doc.id_generator();

        let layout = Mutation::SetPageLayout {
            column_widths: vec![GridWidth::clamped(6), GridWidth::clamped(6)],
        };
        doc.apply(&layout, &mut ids).unwrap();
        assert_eq!(doc.version, 1);

        // Stale id: rejected, version unchanged
        let stale = Mutation::AddBlock {
            section_id: SectionId::from("gone"),
            kind: BlockKind::Text,
        };
        assert!(doc.apply(&stale, &mut ids).is_err());
        assert_eq!(doc.version, 1);
    }

    #[test]
    fn test_duplicate_ids_rejected_on_load() {
        let json = r#"[
            { "id": "a", "width": 6, "blocks": [] },
            { "id": "a", "width": 6, "blocks": [] }
        ]"#;

        let result = Document::from_json(PathBuf::from("home.json"), json);
        assert!(matches!(result, Err(EditorError::Tree(_))));
    }

    #[test]
    fn test_memory_document_cannot_save() {
        let mut doc = Document::new(PathBuf::from("home.json"));
        assert!(matches!(doc.save(), Err(EditorError::NotFileBacked)));
    }

    #[test]
    fn test_id_generator_resumes_after_existing_ids() {
        let mut doc = Document::new(PathBuf::from("home.json"));
        let mut ids = doc.id_generator();
        doc.apply(
            &Mutation::AddSection {
                width: GridWidth::FULL,
            },
            &mut ids,
        )
        .unwrap();

        let mut resumed = doc.id_generator();
        assert_eq!(resumed.count(), ids.count());
        assert_ne!(resumed.new_id(), doc.page().sections[0].id.to_string());
    }
}
