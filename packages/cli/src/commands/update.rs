use super::open_session;
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::Mutation;
use pagecraft_model::BlockId;
use serde_json::Value;

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Page name
    pub page: String,

    /// Block to update
    pub block_id: String,

    /// JSON object merged into the block's data, e.g. '{"text":"Hi"}'
    pub patch: String,
}

pub fn update(args: UpdateArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut session = open_session(&config, cwd, &args.page)?;

    let patch = match serde_json::from_str::<Value>(&args.patch).context("Patch is not valid JSON")? {
        Value::Object(fields) => fields,
        other => return Err(anyhow!("Patch must be a JSON object, got {}", other)),
    };
    let keys: Vec<String> = patch.keys().cloned().collect();

    let applied = session.apply(Mutation::UpdateBlock {
        block_id: BlockId::from(args.block_id.as_str()),
        patch,
    })?;

    if !applied.changed {
        println!("  {} Nothing to change", "•".dimmed());
        return Ok(());
    }

    session.save()?;
    println!(
        "  {} Updated {} ({})",
        "✓".green(),
        args.block_id.bright_white(),
        keys.join(", ")
    );

    Ok(())
}
