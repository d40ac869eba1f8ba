//! Mutable lookups shared by the mutation engine.
//!
//! Every search is depth-first from each section's block list, descending
//! into a row's columns and a card's blocks through `Block::child_lists_mut`.
//! Ids are unique, so the first match is the only match.

use pagecraft_model::{Block, Page, Section};

pub(crate) fn section_mut<'a>(page: &'a mut Page, id: &str) -> Option<&'a mut Section> {
    page.sections.iter_mut().find(|s| s.id == id)
}

pub(crate) fn find_block_mut<'a>(page: &'a mut Page, id: &str) -> Option<&'a mut Block> {
    page.sections
        .iter_mut()
        .find_map(|section| find_in_mut(&mut section.blocks, id))
}

/// Detach a block (and with it its whole subtree) from wherever it lives
pub(crate) fn remove_block(page: &mut Page, id: &str) -> Option<Block> {
    page.sections
        .iter_mut()
        .find_map(|section| remove_in(&mut section.blocks, id))
}

/// The list holding the block, with the block's position in it
pub(crate) fn locate_block_mut<'a>(
    page: &'a mut Page,
    id: &str,
) -> Option<(&'a mut Vec<Block>, usize)> {
    page.sections
        .iter_mut()
        .find_map(|section| locate_in(&mut section.blocks, id))
}

fn find_in_mut<'a>(blocks: &'a mut [Block], id: &str) -> Option<&'a mut Block> {
    for block in blocks.iter_mut() {
        if block.id == id {
            return Some(block);
        }
        for list in block.child_lists_mut() {
            if let Some(found) = find_in_mut(list, id) {
                return Some(found);
            }
        }
    }
    None
}

fn remove_in(blocks: &mut Vec<Block>, id: &str) -> Option<Block> {
    if let Some(pos) = blocks.iter().position(|b| b.id == id) {
        return Some(blocks.remove(pos));
    }

    for block in blocks.iter_mut() {
        for list in block.child_lists_mut() {
            if let Some(removed) = remove_in(list, id) {
                return Some(removed);
            }
        }
    }
    None
}

fn locate_in<'a>(blocks: &'a mut Vec<Block>, id: &str) -> Option<(&'a mut Vec<Block>, usize)> {
    let pos = blocks.iter().position(|b| b.id == id);
    if let Some(pos) = pos {
        return Some((blocks, pos));
    }

    for block in blocks.iter_mut() {
        for list in block.child_lists_mut() {
            if let Some(found) = locate_in(list, id) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_model::{BlockKind, GridWidth, IdGenerator};

    fn page_with_card_in_column(ids: &mut IdGenerator) -> (Page, String, String) {
        let mut section = Section::new(ids.section_id(), GridWidth::FULL);
        let mut row = Block::new_default(ids, BlockKind::Row);
        let mut card = Block::new_default(ids, BlockKind::Card);
        let text = Block::new_default(ids, BlockKind::Text);
        let text_id = text.id.to_string();
        let card_id = card.id.to_string();

        card.card_blocks_mut().unwrap().push(text);
        row.child_lists_mut()[1].push(card);
        section.blocks.push(row);

        (
            Page {
                sections: vec![section],
            },
            card_id,
            text_id,
        )
    }

    #[test]
    fn test_find_block_mut_descends_columns_and_cards() {
        let mut ids = IdGenerator::from_seed("s".to_string());
        let (mut page, _, text_id) = page_with_card_in_column(&mut ids);

        let found = find_block_mut(&mut page, &text_id).unwrap();
        assert_eq!(found.kind(), BlockKind::Text);
    }

    #[test]
    fn test_remove_block_takes_subtree() {
        let mut ids = IdGenerator::from_seed("s".to_string());
        let (mut page, card_id, text_id) = page_with_card_in_column(&mut ids);

        let removed = remove_block(&mut page, &card_id).unwrap();
        assert_eq!(removed.id.as_str(), card_id);
        assert!(page.find_block(&text_id).is_none());
        assert!(remove_block(&mut page, &card_id).is_none());
    }

    #[test]
    fn test_locate_reports_position_in_parent_list() {
        let mut ids = IdGenerator::from_seed("s".to_string());
        let (mut page, _, text_id) = page_with_card_in_column(&mut ids);

        let (list, pos) = locate_block_mut(&mut page, &text_id).unwrap();
        assert_eq!(pos, 0);
        assert_eq!(list.len(), 1);
    }
}
