use super::open_session;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_model::{Block, BlockData, Page};

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Page name
    pub page: String,

    /// Print the stored JSON instead of the outline
    #[arg(long)]
    pub json: bool,
}

pub fn show(args: ShowArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let session = open_session(&config, cwd, &args.page)?;

    if args.json {
        println!("{}", session.document().to_json()?);
    } else {
        print!("{}", outline(session.page()));
    }

    Ok(())
}

/// One line per node, indented by depth
pub fn outline(page: &Page) -> String {
    let mut out = String::new();

    if page.is_empty() {
        out.push_str(&format!("{}\n", "(empty page)".dimmed()));
        return out;
    }

    for section in &page.sections {
        out.push_str(&format!(
            "{} {} {}\n",
            "section".bright_blue().bold(),
            section.id.as_str().bright_white(),
            format!("width {}", section.width.get()).dimmed()
        ));
        for block in &section.blocks {
            outline_block(block, 1, &mut out);
        }
    }

    out
}

fn outline_block(block: &Block, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    out.push_str(&format!(
        "{}{} {}{}\n",
        pad,
        block.kind().to_string().green(),
        block.id.as_str().bright_white(),
        summary(&block.data)
            .map(|s| format!(" {}", s.dimmed()))
            .unwrap_or_default()
    ));

    match &block.data {
        BlockData::Row(row) => {
            for column in &row.columns {
                out.push_str(&format!(
                    "{}  {} {} {}\n",
                    pad,
                    "column".cyan(),
                    column.id.as_str().bright_white(),
                    format!("width {}", column.width.get()).dimmed()
                ));
                for child in &column.blocks {
                    outline_block(child, depth + 2, out);
                }
            }
        }
        BlockData::Card(card) => {
            for child in &card.blocks {
                outline_block(child, depth + 1, out);
            }
        }
        _ => {}
    }
}

/// Short preview of a block's visible content
fn summary(data: &BlockData) -> Option<String> {
    let text = match data {
        BlockData::Heading(h) => h.text.clone(),
        BlockData::Text(t) => t.content.clone(),
        BlockData::Link(l) => format!("{} → {}", l.text, l.href),
        BlockData::Image(i) => i.src.clone(),
        BlockData::Video(v) => v.url.clone(),
        BlockData::List(l) => format!("{} item(s)", l.items.len()),
        BlockData::Gallery(g) => format!("{} image(s)", g.images.len()),
        BlockData::Carousel(c) => format!("{} image(s)", c.images.len()),
        BlockData::Card(c) => c.title.clone().unwrap_or_default(),
        _ => String::new(),
    };

    if text.is_empty() {
        return None;
    }

    let mut preview: String = text.chars().take(40).collect();
    if text.chars().count() > 40 {
        preview.push('…');
    }
    Some(format!("\"{}\"", preview))
}
