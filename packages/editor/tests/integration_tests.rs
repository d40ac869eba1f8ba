//! End-to-end tests: document on disk, session edits, save and reload

use pagecraft_common::ensure_unique_ids;
use pagecraft_editor::{
    AssetStore, BlockData, BlockKind, DirAssetStore, Document, EditSession, Mutation, Selection,
};
use pagecraft_model::{BlockId, Page, SectionId};
use serde_json::{json, Map};
use tempfile::TempDir;

#[test]
fn test_document_lifecycle() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("pages").join("home.json");

    let document = Document::create(path.clone(), Page::new())?;
    assert!(document.is_dirty());

    let mut session = EditSession::new("editor-1", document);
    let sections = session.set_page_layout(&[8, 4]);
    let hero = session
        .add_block(sections[0].as_str(), BlockKind::Heading)
        .unwrap();
    let row = session.add_block(sections[0].as_str(), BlockKind::Row).unwrap();
    let column = session
        .page()
        .find_block(row.as_str())
        .and_then(|b| b.columns())
        .map(|columns| columns[0].id.to_string())
        .unwrap();
    session.add_block_to_column(row.as_str(), &column, BlockKind::Text);
    session.update_block(
        hero.as_str(),
        json!({ "text": "Welcome", "level": 1 })
            .as_object()
            .cloned()
            .unwrap(),
    );
    session.save()?;

    let saved = session.into_document();
    assert!(!saved.is_dirty());
    assert!(path.exists());

    let loaded = Document::load(path.clone())?;
    assert_eq!(loaded.page(), saved.page());
    assert!(!loaded.is_dirty());

    // Ids issued after reload never collide with the saved ones
    let mut session = EditSession::new("editor-2", loaded);
    let before = session.page().block_count();
    let added = session
        .add_block(sections[1].as_str(), BlockKind::Spacer)
        .unwrap();
    assert_eq!(session.page().block_count(), before + 1);
    assert!(ensure_unique_ids(session.page()).is_ok());
    assert_ne!(added, hero);

    Ok(())
}

#[test]
fn test_saved_form_is_section_list() -> anyhow::Result<()> {
    let mut session = EditSession::new("editor-1", Document::new("page.json".into()));
    let section = session.set_page_layout(&[12]).remove(0);
    let link = session.add_block(section.as_str(), BlockKind::Link).unwrap();

    let json: serde_json::Value = serde_json::from_str(&session.document().to_json()?)?;
    assert_eq!(json[0]["id"], section.as_str());
    assert_eq!(json[0]["width"], 12);
    assert_eq!(json[0]["blocks"][0]["id"], link.as_str());
    assert_eq!(json[0]["blocks"][0]["type"], "link");
    assert_eq!(json[0]["blocks"][0]["data"]["text"], "Click here");
    assert_eq!(json[0]["blocks"][0]["data"]["href"], "#");

    Ok(())
}

#[test]
fn test_loading_duplicate_ids_fails() {
    let json = r#"[
        { "id": "s1", "width": 12, "blocks": [
            { "id": "b1", "type": "text", "data": { "content": "a" } },
            { "id": "b1", "type": "text", "data": { "content": "b" } }
        ] }
    ]"#;

    assert!(Document::from_json("dup.json".into(), json).is_err());
}

#[test]
fn test_loading_unknown_block_type_fails() {
    let json = r#"[
        { "id": "s1", "width": 12, "blocks": [
            { "id": "b1", "type": "marquee", "data": {} }
        ] }
    ]"#;

    assert!(Document::from_json("bad.json".into(), json).is_err());
}

#[test]
fn test_memory_document_cannot_save() {
    let mut session = EditSession::new("editor-1", Document::new("scratch.json".into()));
    session.set_page_layout(&[12]);
    assert!(session.save().is_err());
}

#[test]
fn test_uploaded_image_url_goes_into_block() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mut assets = DirAssetStore::new(dir.path().join("assets"), "/assets");

    let mut session = EditSession::new("editor-1", Document::new("page.json".into()));
    let section = session.set_page_layout(&[12]).remove(0);
    let image = session.add_block(section.as_str(), BlockKind::Image).unwrap();

    let url = assets.store("hero shot.png", b"\x89PNG fake bytes")?;
    assert!(url.starts_with("/assets/"));

    let mut patch = Map::new();
    patch.insert("src".to_string(), json!(url));
    patch.insert("alt".to_string(), json!("Hero"));
    assert!(session.update_block(image.as_str(), patch));

    match &session.page().find_block(image.as_str()).unwrap().data {
        BlockData::Image(data) => {
            assert_eq!(data.src, url);
            assert_eq!(data.alt, "Hero");
        }
        other => panic!("Expected image, got {:?}", other),
    }

    Ok(())
}

#[test]
fn test_mutation_serialization() -> anyhow::Result<()> {
    let mutation = Mutation::MoveBlock {
        section_id: SectionId::from("s1"),
        from_index: 0,
        to_index: 2,
    };

    let json = serde_json::to_string(&mutation)?;
    assert!(json.contains("MoveBlock"));

    let back: Mutation = serde_json::from_str(&json)?;
    match back {
        Mutation::MoveBlock {
            section_id,
            from_index,
            to_index,
        } => {
            assert_eq!(section_id, "s1");
            assert_eq!(from_index, 0);
            assert_eq!(to_index, 2);
        }
        other => panic!("Expected MoveBlock, got {:?}", other),
    }

    Ok(())
}

#[test]
fn test_session_selection_survives_unrelated_edits() {
    let mut session = EditSession::new("editor-1", Document::new("page.json".into()));
    let sections = session.set_page_layout(&[6, 6]);
    let card = session
        .add_block(sections[1].as_str(), BlockKind::Card)
        .unwrap();
    let inner = session.add_block_to_card(card.as_str(), BlockKind::Video).unwrap();

    assert!(session.select_block(inner.as_str()));
    session.add_block(sections[0].as_str(), BlockKind::List);
    session.move_block(sections[1].as_str(), 0, 0);
    assert_eq!(session.selection(), &Selection::Block(inner.clone()));

    // Selecting a section replaces the block selection
    assert!(session.select_section(sections[0].as_str()));
    assert_eq!(session.selection().block_id(), None::<&BlockId>);

    session.remove_section(sections[0].as_str());
    assert!(session.selection().is_none());
}

#[test]
fn test_rehydrated_id_at_counter_limit() -> anyhow::Result<()> {
    let seed = pagecraft_model::get_document_id("limit.json");
    let json = format!(
        r#"[
            {{ "id": "{seed}-{max}", "width": 12, "blocks": [
                {{ "id": "{seed}-1", "type": "spacer", "data": {{}} }}
            ] }}
        ]"#,
        seed = seed,
        max = u64::MAX
    );
    let document = Document::from_json("limit.json".into(), &json)?;
    let mut session = EditSession::new("limit", document);

    let section = session.add_section(6).unwrap();
    let block = session.add_block(section.as_str(), BlockKind::Text).unwrap();

    assert_eq!(section.to_string(), format!("{}-0", seed));
    assert_eq!(block.to_string(), format!("{}-2", seed));
    assert!(ensure_unique_ids(session.page()).is_ok());
    Ok(())
}
