use super::open_session;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{AssetStore, DirAssetStore, Mutation};
use pagecraft_model::BlockId;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Page name
    pub page: String,

    /// File to upload
    pub file: PathBuf,

    /// Block that receives the URL
    #[arg(short, long)]
    pub block: String,

    /// Data field set to the URL
    #[arg(short, long, default_value = "src")]
    pub field: String,
}

pub fn upload(args: UploadArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut session = open_session(&config, cwd, &args.page)?;

    let bytes = fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let file_name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());

    // Check the target with a stand-in URL so a rejected patch stores nothing
    url_patch(&args.block, &args.field, String::new()).validate(session.page())?;

    let mut store = DirAssetStore::new(config.get_assets_dir(cwd), config.asset_url_prefix.clone());
    let url = store.store(&file_name, &bytes)?;

    session.apply(url_patch(&args.block, &args.field, url.clone()))?;
    session.save()?;

    println!(
        "  {} Uploaded {} → {}",
        "✓".green(),
        file_name,
        url.bright_white()
    );
    println!("  {} {}.{} updated", "✓".green(), args.block, args.field);

    Ok(())
}

fn url_patch(block_id: &str, field: &str, url: String) -> Mutation {
    let mut patch = Map::new();
    patch.insert(field.to_string(), Value::String(url));
    Mutation::UpdateBlock {
        block_id: BlockId::from(block_id),
        patch,
    }
}
