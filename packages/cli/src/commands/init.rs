use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{Document, EditSession};
use pagecraft_model::Page;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Name of the first page
    #[arg(short, long, default_value = "home")]
    pub page: String,

    /// Section widths, comma separated (defaults to the config's layout)
    #[arg(short, long, value_delimiter = ',')]
    pub layout: Vec<u32>,

    /// Force overwrite existing config and page
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    println!(
        "{}",
        "📝 Initializing Pagecraft project...".bright_blue().bold()
    );

    let config = if config_path.exists() && !args.force {
        println!(
            "  {} {} already exists, keeping it",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        Config::load(cwd)?
    } else {
        let config = Config::default();
        fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
        println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
        config
    };

    let pages_dir = config.get_pages_dir(cwd);
    if !pages_dir.exists() {
        fs::create_dir_all(&pages_dir)?;
        println!("  {} Created {}/", "✓".green(), config.pages_dir);
    }

    let page_path = config.page_path(cwd, &args.page);
    if page_path.exists() && !args.force {
        println!(
            "  {} Page {} already exists",
            "⚠️".yellow(),
            args.page.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let layout = if args.layout.is_empty() {
        config.default_layout.clone()
    } else {
        args.layout.clone()
    };

    let document = Document::create(page_path, Page::new())?;
    let mut session = EditSession::new(args.page.as_str(), document);
    let sections = session.set_page_layout(&layout);
    session.save()?;

    println!(
        "  {} Created page {} with {} section(s)",
        "✓".green(),
        args.page.bright_white(),
        sections.len()
    );
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: pagecraft show {}", args.page);
    println!(
        "  2. Run: pagecraft add {} heading --section {}",
        args.page,
        sections.first().map(|s| s.as_str()).unwrap_or("<section-id>")
    );
    println!("  3. Run: pagecraft render {}", args.page);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run(cwd: &str, layout: Vec<u32>, force: bool) -> Result<()> {
        init(
            InitArgs {
                page: "home".to_string(),
                layout,
                force,
            },
            cwd,
        )
    }

    #[test]
    fn test_init_creates_config_and_page() -> Result<()> {
        let dir = TempDir::new()?;
        let cwd = dir.path().to_string_lossy().to_string();

        run(&cwd, vec![6, 6], false)?;

        assert!(dir.path().join(DEFAULT_CONFIG_NAME).exists());
        let document = Document::load(dir.path().join("pages/home.json"))?;
        let widths: Vec<u8> = document
            .page()
            .sections
            .iter()
            .map(|s| s.width.get())
            .collect();
        assert_eq!(widths, vec![6, 6]);
        Ok(())
    }

    #[test]
    fn test_init_keeps_existing_page() -> Result<()> {
        let dir = TempDir::new()?;
        let cwd = dir.path().to_string_lossy().to_string();

        run(&cwd, vec![12], false)?;
        run(&cwd, vec![4, 4, 4], false)?;

        let document = Document::load(dir.path().join("pages/home.json"))?;
        assert_eq!(document.page().sections.len(), 1);

        run(&cwd, vec![4, 4, 4], true)?;
        let document = Document::load(dir.path().join("pages/home.json"))?;
        assert_eq!(document.page().sections.len(), 3);
        Ok(())
    }
}
