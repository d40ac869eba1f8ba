//! # Selection State
//!
//! At most one node is selected: either a section or a block, never both.
//! A selection always names a node present in the page; selecting a missing
//! id is refused and the session drops a selection whose node was removed.

use pagecraft_model::{BlockId, Page, SectionId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Selection {
    #[default]
    None,
    Section(SectionId),
    Block(BlockId),
}

impl Selection {
    pub fn block_id(&self) -> Option<&BlockId> {
        match self {
            Selection::Block(id) => Some(id),
            _ => None,
        }
    }

    pub fn section_id(&self) -> Option<&SectionId> {
        match self {
            Selection::Section(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    /// Whether `id` is the selected node, whatever its kind
    pub fn is_selected(&self, id: &str) -> bool {
        match self {
            Selection::None => false,
            Selection::Section(selected) => selected == id,
            Selection::Block(selected) => selected == id,
        }
    }

    /// Select a block, dropping any section selection. Refused if the block
    /// is not in the page.
    pub fn select_block(&mut self, page: &Page, id: &str) -> bool {
        if page.find_block(id).is_none() {
            return false;
        }
        *self = Selection::Block(BlockId::from(id));
        true
    }

    /// Select a section, dropping any block selection. Refused if the
    /// section is not in the page.
    pub fn select_section(&mut self, page: &Page, id: &str) -> bool {
        if page.section(id).is_none() {
            return false;
        }
        *self = Selection::Section(SectionId::from(id));
        true
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }

    /// Clear the selection if its node left the page. Returns true if it
    /// was cleared.
    pub fn reconcile(&mut self, page: &Page) -> bool {
        let present = match self {
            Selection::None => true,
            Selection::Section(id) => page.section(id.as_str()).is_some(),
            Selection::Block(id) => page.find_block(id.as_str()).is_some(),
        };

        if !present {
            self.clear();
        }
        !present
    }
}
