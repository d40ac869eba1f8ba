use super::open_session;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_render_html::{HtmlRenderer, Renderer};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Page name
    pub page: String,

    /// Write HTML to this file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Mark this section or block as selected
    #[arg(long)]
    pub select: Option<String>,

    /// Leave out data-*-id attributes and selection marks
    #[arg(long)]
    pub clean: bool,
}

pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut session = open_session(&config, cwd, &args.page)?;

    if let Some(id) = &args.select {
        if !session.select_block(id) && !session.select_section(id) {
            return Err(anyhow!("No section or block with id {}", id));
        }
    }

    let mut options = config.render_options();
    options.editor_marks = !args.clean;
    let html = HtmlRenderer::new(options).render(session.page(), session.selection())?;

    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, html)?;
            println!("  {} {} → {}", "✓".green(), args.page, path.display());
        }
        None => print!("{}", html),
    }

    Ok(())
}
