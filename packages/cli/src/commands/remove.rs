use super::open_session;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_editor::Mutation;
use pagecraft_model::BlockId;

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Page name
    pub page: String,

    /// Block to remove, with everything inside it
    pub block_id: String,
}

pub fn remove(args: RemoveArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut session = open_session(&config, cwd, &args.page)?;

    let applied = session.apply(Mutation::RemoveBlock {
        block_id: BlockId::from(args.block_id.as_str()),
    })?;
    session.save()?;

    println!(
        "  {} Removed {} ({} node(s))",
        "✓".green(),
        args.block_id.bright_white(),
        applied.removed.len()
    );

    Ok(())
}
