use pagecraft_model::{Block, Column, Page, Section};
use std::collections::HashSet;

use crate::{CommonError, CommonResult};

/// Visitor pattern for traversing the page tree immutably
///
/// This trait provides default implementations that walk the entire tree.
/// Override specific visit_* methods to perform custom actions on nodes.
pub trait Visitor: Sized {
    fn visit_page(&mut self, page: &Page) {
        walk_page(self, page);
    }

    fn visit_section(&mut self, section: &Section) {
        walk_section(self, section);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_column(&mut self, column: &Column) {
        walk_column(self, column);
    }
}

/// Mutable visitor pattern for transforming the page tree
///
/// Similar to Visitor, but provides mutable access to nodes.
pub trait VisitorMut: Sized {
    fn visit_page_mut(&mut self, page: &mut Page) {
        walk_page_mut(self, page);
    }

    fn visit_section_mut(&mut self, section: &mut Section) {
        walk_section_mut(self, section);
    }

    fn visit_block_mut(&mut self, block: &mut Block) {
        walk_block_mut(self, block);
    }

    fn visit_column_mut(&mut self, column: &mut Column) {
        walk_column_mut(self, column);
    }
}

// Default walk implementations for immutable visitor

pub fn walk_page<V: Visitor>(visitor: &mut V, page: &Page) {
    for section in &page.sections {
        visitor.visit_section(section);
    }
}

pub fn walk_section<V: Visitor>(visitor: &mut V, section: &Section) {
    for block in &section.blocks {
        visitor.visit_block(block);
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &Block) {
    if let Some(columns) = block.columns() {
        for column in columns {
            visitor.visit_column(column);
        }
        return;
    }

    for list in block.child_lists() {
        for child in list {
            visitor.visit_block(child);
        }
    }
}

pub fn walk_column<V: Visitor>(visitor: &mut V, column: &Column) {
    for block in &column.blocks {
        visitor.visit_block(block);
    }
}

// Default walk implementations for mutable visitor

pub fn walk_page_mut<V: VisitorMut>(visitor: &mut V, page: &mut Page) {
    for section in &mut page.sections {
        visitor.visit_section_mut(section);
    }
}

pub fn walk_section_mut<V: VisitorMut>(visitor: &mut V, section: &mut Section) {
    for block in &mut section.blocks {
        visitor.visit_block_mut(block);
    }
}

pub fn walk_block_mut<V: VisitorMut>(visitor: &mut V, block: &mut Block) {
    if let Some(columns) = block.columns_mut() {
        for column in columns {
            visitor.visit_column_mut(column);
        }
        return;
    }

    for list in block.child_lists_mut() {
        for child in list {
            visitor.visit_block_mut(child);
        }
    }
}

pub fn walk_column_mut<V: VisitorMut>(visitor: &mut V, column: &mut Column) {
    for block in &mut column.blocks {
        visitor.visit_block_mut(block);
    }
}

/// Collects every node id (sections, columns, blocks) in visit order
#[derive(Debug, Default)]
pub struct IdCollector {
    pub ids: Vec<String>,
}

impl Visitor for IdCollector {
    fn visit_section(&mut self, section: &Section) {
        self.ids.push(section.id.to_string());
        walk_section(self, section);
    }

    fn visit_block(&mut self, block: &Block) {
        self.ids.push(block.id.to_string());
        walk_block(self, block);
    }

    fn visit_column(&mut self, column: &Column) {
        self.ids.push(column.id.to_string());
        walk_column(self, column);
    }
}

/// Every node id in the page
pub fn collect_ids(page: &Page) -> Vec<String> {
    let mut collector = IdCollector::default();
    collector.visit_page(page);
    collector.ids
}

/// Ids of `block` and all of its descendants (columns included)
pub fn collect_subtree_ids(block: &Block) -> Vec<String> {
    let mut collector = IdCollector::default();
    collector.visit_block(block);
    collector.ids
}

/// Fails with the first id that appears twice
pub fn ensure_unique_ids(page: &Page) -> CommonResult<()> {
    let mut seen = HashSet::new();
    for id in collect_ids(page) {
        if !seen.insert(id.clone()) {
            return Err(CommonError::DuplicateId(id));
        }
    }
    Ok(())
}
