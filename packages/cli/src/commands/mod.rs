pub mod add;
pub mod init;
pub mod move_block;
pub mod remove;
pub mod render;
pub mod show;
pub mod update;
pub mod upload;

pub use add::{add, AddArgs};
pub use init::{init, InitArgs};
pub use move_block::{move_block, MoveArgs};
pub use remove::{remove, RemoveArgs};
pub use render::{render, RenderArgs};
pub use show::{show, ShowArgs};
pub use update::{update, UpdateArgs};
pub use upload::{upload, UploadArgs};

use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use pagecraft_editor::{Document, EditSession};

/// Open page `name` for editing with the configured history depth
pub(crate) fn open_session(config: &Config, cwd: &str, name: &str) -> Result<EditSession> {
    let path = config.page_path(cwd, name);
    if !path.exists() {
        return Err(anyhow!(
            "Page does not exist: {} (run `pagecraft init --page {}`)",
            path.display(),
            name
        ));
    }

    let document =
        Document::load(path.clone()).with_context(|| format!("Failed to load {}", path.display()))?;
    Ok(EditSession::new(name, document).with_undo_levels(config.undo_levels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_editor::BlockData;
    use tempfile::TempDir;

    fn project() -> Result<(TempDir, String)> {
        let dir = TempDir::new()?;
        let cwd = dir.path().to_string_lossy().to_string();
        init(
            InitArgs {
                page: "home".to_string(),
                layout: vec![8, 4],
                force: false,
            },
            &cwd,
        )?;
        Ok((dir, cwd))
    }

    fn reopen(cwd: &str) -> Result<EditSession> {
        open_session(&Config::load(cwd)?, cwd, "home")
    }

    fn add_to_section(cwd: &str, section: &str, kind: &str) -> Result<()> {
        add(
            AddArgs {
                page: "home".to_string(),
                kind: kind.to_string(),
                section: Some(section.to_string()),
                card: None,
                row: None,
                column: None,
            },
            cwd,
        )
    }

    #[test]
    fn test_edit_commands_persist() -> Result<()> {
        let (_dir, cwd) = project()?;
        let section = reopen(&cwd)?.page().sections[0].id.to_string();

        add_to_section(&cwd, &section, "heading")?;
        add_to_section(&cwd, &section, "text")?;
        let blocks: Vec<String> = reopen(&cwd)?.page().sections[0]
            .blocks
            .iter()
            .map(|b| b.id.to_string())
            .collect();
        assert_eq!(blocks.len(), 2);

        update(
            UpdateArgs {
                page: "home".to_string(),
                block_id: blocks[0].clone(),
                patch: r#"{"text":"Hello"}"#.to_string(),
            },
            &cwd,
        )?;
        move_block(
            MoveArgs {
                page: "home".to_string(),
                section_id: section.clone(),
                from: 0,
                to: 5,
            },
            &cwd,
        )?;
        remove(
            RemoveArgs {
                page: "home".to_string(),
                block_id: blocks[1].clone(),
            },
            &cwd,
        )?;

        let session = reopen(&cwd)?;
        let remaining = &session.page().sections[0].blocks;
        assert_eq!(remaining.len(), 1);
        match &remaining[0].data {
            BlockData::Heading(h) => assert_eq!(h.text, "Hello"),
            other => panic!("Expected heading, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_stale_id_is_reported() -> Result<()> {
        let (_dir, cwd) = project()?;

        let result = remove(
            RemoveArgs {
                page: "home".to_string(),
                block_id: "missing".to_string(),
            },
            &cwd,
        );
        assert!(result.is_err());

        let result = add_to_section(&cwd, "missing", "text");
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_non_object_patch_is_rejected() -> Result<()> {
        let (_dir, cwd) = project()?;
        let section = reopen(&cwd)?.page().sections[0].id.to_string();
        add_to_section(&cwd, &section, "text")?;
        let block = reopen(&cwd)?.page().sections[0].blocks[0].id.to_string();

        let result = update(
            UpdateArgs {
                page: "home".to_string(),
                block_id: block,
                patch: "[1, 2]".to_string(),
            },
            &cwd,
        );
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_render_and_upload() -> Result<()> {
        let (dir, cwd) = project()?;
        let section = reopen(&cwd)?.page().sections[0].id.to_string();
        add_to_section(&cwd, &section, "image")?;
        let image = reopen(&cwd)?.page().sections[0].blocks[0].id.to_string();

        let file = dir.path().join("photo.png");
        std::fs::write(&file, b"not really a png")?;
        upload(
            UploadArgs {
                page: "home".to_string(),
                file,
                block: image.clone(),
                field: "src".to_string(),
            },
            &cwd,
        )?;

        let out = dir.path().join("dist/home.html");
        render(
            RenderArgs {
                page: "home".to_string(),
                out: Some(out.clone()),
                select: Some(image.clone()),
                clean: false,
            },
            &cwd,
        )?;

        let html = std::fs::read_to_string(out)?;
        assert!(html.contains("<img src=\"/assets/"));
        assert!(html.contains("photo.png"));
        assert!(html.contains("is-selected"));
        assert_eq!(std::fs::read_dir(dir.path().join("assets"))?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_rejected_upload_stores_no_asset() -> Result<()> {
        let (dir, cwd) = project()?;
        let section = reopen(&cwd)?.page().sections[0].id.to_string();
        add_to_section(&cwd, &section, "heading")?;
        add_to_section(&cwd, &section, "card")?;
        let blocks: Vec<String> = reopen(&cwd)?.page().sections[0]
            .blocks
            .iter()
            .map(|b| b.id.to_string())
            .collect();

        let file = dir.path().join("photo.png");
        std::fs::write(&file, b"not really a png")?;

        // Wrong type for the field, then a card's child list
        for (block, field) in [(&blocks[0], "level"), (&blocks[1], "blocks")] {
            let result = upload(
                UploadArgs {
                    page: "home".to_string(),
                    file: file.clone(),
                    block: block.clone(),
                    field: field.to_string(),
                },
                &cwd,
            );
            assert!(result.is_err(), "upload into {} should fail", field);
        }

        assert!(!dir.path().join("assets").exists());
        Ok(())
    }

    #[test]
    fn test_missing_page_fails() -> Result<()> {
        let dir = TempDir::new()?;
        let cwd = dir.path().to_string_lossy().to_string();

        let result = open_session(&Config::default(), &cwd, "nowhere");
        assert!(result.is_err());
        Ok(())
    }
}
