//! Mutation engine properties

use pagecraft_common::{collect_ids, ensure_unique_ids};
use pagecraft_editor::{BlockData, BlockKind, Document, EditSession, Mutation, MutationError};
use pagecraft_model::{BlockId, GridWidth, IdGenerator, Page, SectionId};
use serde_json::{json, Map, Value};
use std::path::PathBuf;

fn session() -> EditSession {
    EditSession::new("test", Document::new(PathBuf::from("page.json")))
}

fn patch(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("patch must be an object")
}

#[test]
fn test_ids_unique_across_additions() {
    let mut session = session();
    let sections = session.set_page_layout(&[6, 6]);

    for kind in BlockKind::ALL {
        session.add_block(sections[0].as_str(), kind).unwrap();
    }

    let row = session.add_block(sections[1].as_str(), BlockKind::Row).unwrap();
    let card = session.add_block(sections[1].as_str(), BlockKind::Card).unwrap();
    let columns: Vec<String> = session
        .page()
        .find_block(row.as_str())
        .unwrap()
        .columns()
        .unwrap()
        .iter()
        .map(|c| c.id.to_string())
        .collect();

    for column in &columns {
        session.add_block_to_column(row.as_str(), column, BlockKind::Card).unwrap();
        session.add_block_to_column(row.as_str(), column, BlockKind::Gallery).unwrap();
    }
    for _ in 0..3 {
        session.add_block_to_card(card.as_str(), BlockKind::Row).unwrap();
    }

    // section, 14 kinds + 2 row columns, row + 2 columns, card,
    // 2 x (card + gallery), 3 x (row + 2 columns)
    let old_ids = collect_ids(session.page());
    assert_eq!(old_ids.len(), 2 + 16 + 3 + 1 + 4 + 9);
    assert!(ensure_unique_ids(session.page()).is_ok());

    // A second layout reset keeps drawing from the same counter
    session.set_page_layout(&[12]);
    let new_ids = collect_ids(session.page());

    assert!(ensure_unique_ids(session.page()).is_ok());
    for id in new_ids {
        assert!(!old_ids.contains(&id));
    }
}

#[test]
fn test_empty_patch_is_round_trip() {
    let mut session = session();
    let section = session.set_page_layout(&[12]).remove(0);
    for kind in BlockKind::ALL {
        session.add_block(section.as_str(), kind);
    }
    let heading = session.page().sections[0].blocks[0].id.clone();
    session.update_block(heading.as_str(), patch(json!({ "text": "Hi", "color": "#123456" })));

    let before = serde_json::to_string(session.page()).unwrap();
    let block_ids: Vec<BlockId> = session.page().sections[0]
        .blocks
        .iter()
        .map(|b| b.id.clone())
        .collect();

    for id in &block_ids {
        let result = session.apply(Mutation::UpdateBlock {
            block_id: id.clone(),
            patch: Map::new(),
        });
        assert!(!result.unwrap().changed);
    }

    let after = serde_json::to_string(session.page()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_remove_is_idempotent() {
    let mut session = session();
    let section = session.set_page_layout(&[12]).remove(0);
    let a = session.add_block(section.as_str(), BlockKind::Text).unwrap();
    session.add_block(section.as_str(), BlockKind::Text).unwrap();

    assert!(session.remove_block(a.as_str()));
    let once = session.page().clone();

    assert!(!session.remove_block(a.as_str()));
    assert_eq!(session.page(), &once);
}

#[test]
fn test_removing_row_removes_every_descendant() {
    let mut session = session();
    let section = session.set_page_layout(&[12]).remove(0);
    let row = session.add_block(section.as_str(), BlockKind::Row).unwrap();
    let columns: Vec<String> = session
        .page()
        .find_block(row.as_str())
        .unwrap()
        .columns()
        .unwrap()
        .iter()
        .map(|c| c.id.to_string())
        .collect();

    let mut descendants = Vec::new();
    for column in &columns {
        descendants.push(session.add_block_to_column(row.as_str(), column, BlockKind::Text).unwrap());
        let card = session
            .add_block_to_column(row.as_str(), column, BlockKind::Card)
            .unwrap();
        descendants.push(session.add_block_to_card(card.as_str(), BlockKind::Image).unwrap());
        descendants.push(card);
    }

    assert!(session.remove_block(row.as_str()));

    for id in &descendants {
        assert!(session.page().find_block(id.as_str()).is_none());
        assert!(!session.update_block(id.as_str(), patch(json!({ "content": "x" }))));
    }
    let remaining = collect_ids(session.page());
    for column in &columns {
        assert!(!remaining.contains(column));
    }
}

#[test]
fn test_move_bounds() {
    let mut session = session();
    let section = session.set_page_layout(&[12]).remove(0);
    let a = session.add_block(section.as_str(), BlockKind::Heading).unwrap();
    let b = session.add_block(section.as_str(), BlockKind::Text).unwrap();

    let order = |session: &EditSession| -> Vec<BlockId> {
        session.page().sections[0].blocks.iter().map(|b| b.id.clone()).collect()
    };

    assert!(session.move_block(section.as_str(), 0, 1));
    assert_eq!(order(&session), vec![b.clone(), a.clone()]);

    // Back to [A, B], then clamp a far target to the end
    session.move_block(section.as_str(), 1, 0);
    assert_eq!(order(&session), vec![a.clone(), b.clone()]);
    assert!(session.move_block(section.as_str(), 0, 99));
    assert_eq!(order(&session), vec![b.clone(), a.clone()]);
}

#[test]
fn test_move_to_same_index_is_unchanged() {
    let mut session = session();
    let section = session.set_page_layout(&[12]).remove(0);
    session.add_block(section.as_str(), BlockKind::Heading);
    session.add_block(section.as_str(), BlockKind::Text);

    let applied = session
        .apply(Mutation::MoveBlock {
            section_id: section.clone(),
            from_index: 1,
            to_index: 1,
        })
        .unwrap();
    assert!(!applied.changed);

    // Clamped onto itself
    let applied = session
        .apply(Mutation::MoveBlock {
            section_id: section.clone(),
            from_index: 1,
            to_index: 50,
        })
        .unwrap();
    assert!(!applied.changed);

    let result = session.apply(Mutation::MoveBlock {
        section_id: section,
        from_index: 7,
        to_index: 0,
    });
    assert_eq!(result, Err(MutationError::IndexOutOfBounds { index: 7, len: 2 }));
}

#[test]
fn test_layout_and_heading_scenario() {
    let mut session = session();
    let sections = session.set_page_layout(&[6, 6]);

    assert_eq!(sections.len(), 2);
    for section in &session.page().sections {
        assert_eq!(section.width.get(), 6);
        assert!(section.blocks.is_empty());
    }

    let heading = session.add_block(sections[0].as_str(), BlockKind::Heading).unwrap();
    let block = &session.page().sections[0].blocks[0];
    assert_eq!(block.id, heading);
    let level_before = match &block.data {
        BlockData::Heading(h) => {
            assert_eq!(h.text, "");
            h.level
        }
        other => panic!("Expected heading, got {:?}", other),
    };

    assert!(session.update_block(heading.as_str(), patch(json!({ "text": "Hello" }))));
    match &session.page().find_block(heading.as_str()).unwrap().data {
        BlockData::Heading(h) => {
            assert_eq!(h.text, "Hello");
            assert_eq!(h.level, level_before);
            assert!(h.color.is_none());
            assert!(h.alignment.is_none());
        }
        other => panic!("Expected heading, got {:?}", other),
    }

    // Card operations on a non-card leave the tree alone
    let before = session.page().clone();
    assert!(session.add_block_to_card(heading.as_str(), BlockKind::Text).is_none());
    assert_eq!(session.page(), &before);
}

#[test]
fn test_column_operation_on_non_row_is_rejected() {
    let mut ids = IdGenerator::from_seed("p".to_string());
    let mut page = Page::new();
    let section = Mutation::AddSection {
        width: GridWidth::FULL,
    }
    .apply(&mut page, &mut ids)
    .unwrap()
    .created
    .remove(0);
    let card = Mutation::AddBlock {
        section_id: SectionId::from(section),
        kind: BlockKind::Card,
    }
    .apply(&mut page, &mut ids)
    .unwrap()
    .created
    .remove(0);

    let before = page.clone();
    let result = Mutation::AddBlockToColumn {
        row_block_id: BlockId::from(card.as_str()),
        column_id: "whatever".into(),
        kind: BlockKind::Text,
    }
    .apply(&mut page, &mut ids);

    assert_eq!(result, Err(MutationError::NotARow(card)));
    assert_eq!(page, before);
}

#[test]
fn test_malformed_patch_keys_are_kept() {
    let mut session = session();
    let section = session.set_page_layout(&[12]).remove(0);
    let text = session.add_block(section.as_str(), BlockKind::Text).unwrap();

    assert!(session.update_block(text.as_str(), patch(json!({ "level": 9, "glow": true }))));

    let json = serde_json::to_value(session.page().find_block(text.as_str()).unwrap()).unwrap();
    assert_eq!(json["data"]["level"], 9);
    assert_eq!(json["data"]["glow"], true);
    assert_eq!(json["data"]["content"], "");
}

#[test]
fn test_mistyped_patch_is_rejected_without_change() {
    let mut session = session();
    let section = session.set_page_layout(&[12]).remove(0);
    let spacer = session.add_block(section.as_str(), BlockKind::Spacer).unwrap();
    let before = session.page().clone();

    let result = session.apply(Mutation::UpdateBlock {
        block_id: spacer,
        patch: patch(json!({ "height": "tall" })),
    });

    assert!(matches!(result, Err(MutationError::InvalidPatch { .. })));
    assert_eq!(session.page(), &before);
}

#[test]
fn test_table_cells_patch() {
    let mut session = session();
    let section = session.set_page_layout(&[12]).remove(0);
    let table = session.add_block(section.as_str(), BlockKind::Table).unwrap();

    let cells = json!({
        "headers": ["Plan", "Price"],
        "rows": [
            [{ "text": "Basic" }, { "text": "$5", "href": "/basic" }],
            [{ "text": "Pro" }, { "text": "$15" }]
        ]
    });
    assert!(session.update_block(table.as_str(), patch(cells)));

    match &session.page().find_block(table.as_str()).unwrap().data {
        BlockData::Table(t) => {
            assert_eq!(t.headers, vec!["Plan", "Price"]);
            assert_eq!(t.rows.len(), 2);
            assert_eq!(t.rows[0][1].href.as_deref(), Some("/basic"));
        }
        other => panic!("Expected table, got {:?}", other),
    }
}
