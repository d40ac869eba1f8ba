use super::open_session;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::Mutation;
use pagecraft_model::{BlockId, BlockKind, ColumnId, SectionId};

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Page name
    pub page: String,

    /// Block type (heading, text, list, image, gallery, carousel, tabs,
    /// accordion, link, spacer, video, card, table, row)
    pub kind: String,

    /// Append to this section
    #[arg(short, long, conflicts_with_all = ["card", "row"])]
    pub section: Option<String>,

    /// Append inside this card block
    #[arg(long, conflicts_with = "row")]
    pub card: Option<String>,

    /// Append inside a column of this row block (needs --column)
    #[arg(long, requires = "column")]
    pub row: Option<String>,

    /// Column of the row block
    #[arg(long)]
    pub column: Option<String>,
}

pub fn add(args: AddArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut session = open_session(&config, cwd, &args.page)?;
    let kind: BlockKind = args.kind.parse()?;

    let mutation = match (&args.section, &args.card, &args.row, &args.column) {
        (Some(section), _, _, _) => Mutation::AddBlock {
            section_id: SectionId::from(section.as_str()),
            kind,
        },
        (_, Some(card), _, _) => Mutation::AddBlockToCard {
            card_block_id: BlockId::from(card.as_str()),
            kind,
        },
        (_, _, Some(row), Some(column)) => Mutation::AddBlockToColumn {
            row_block_id: BlockId::from(row.as_str()),
            column_id: ColumnId::from(column.as_str()),
            kind,
        },
        _ => return Err(anyhow!("Pass --section, --card, or --row with --column")),
    };

    let applied = session.apply(mutation)?;
    session.save()?;

    // Outermost first: the block, then any columns it came with
    let mut created = applied.created.iter();
    if let Some(id) = created.next() {
        println!("  {} Added {} {}", "✓".green(), kind, id.bright_white());
    }
    for id in created {
        println!("    {} column {}", "+".cyan(), id.bright_white());
    }

    Ok(())
}
