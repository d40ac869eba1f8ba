use super::open_session;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_editor::Mutation;
use pagecraft_model::SectionId;

#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Page name
    pub page: String,

    /// Section whose top-level blocks are reordered
    pub section_id: String,

    /// Current position of the block
    pub from: usize,

    /// New position (past the end moves it last)
    pub to: usize,
}

pub fn move_block(args: MoveArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut session = open_session(&config, cwd, &args.page)?;

    let applied = session.apply(Mutation::MoveBlock {
        section_id: SectionId::from(args.section_id.as_str()),
        from_index: args.from,
        to_index: args.to,
    })?;

    if !applied.changed {
        println!("  {} Block already in place", "•".dimmed());
        return Ok(());
    }

    session.save()?;
    println!(
        "  {} Moved block {} → {} in {}",
        "✓".green(),
        args.from,
        args.to,
        args.section_id.bright_white()
    );

    Ok(())
}
