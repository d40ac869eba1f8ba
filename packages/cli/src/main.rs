mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    add, init, move_block, remove, render, show, update, upload, AddArgs, InitArgs, MoveArgs,
    RemoveArgs, RenderArgs, ShowArgs, UpdateArgs, UploadArgs,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Pagecraft CLI - edit block-based pages from the terminal
#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the config file and a first page
    Init(InitArgs),

    /// Print the outline of a page
    Show(ShowArgs),

    /// Add a block to a section, card, or row column
    Add(AddArgs),

    /// Remove a block and everything inside it
    Remove(RemoveArgs),

    /// Merge a JSON patch into a block's data
    Update(UpdateArgs),

    /// Reorder the top-level blocks of a section
    Move(MoveArgs),

    /// Render a page to static HTML
    Render(RenderArgs),

    /// Store a file as an asset and point a block at it
    Upload(UploadArgs),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };
    debug!(%cwd, "starting");

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Show(args) => show(args, &cwd),
        Command::Add(args) => add(args, &cwd),
        Command::Remove(args) => remove(args, &cwd),
        Command::Update(args) => update(args, &cwd),
        Command::Move(args) => move_block(args, &cwd),
        Command::Render(args) => render(args, &cwd),
        Command::Upload(args) => upload(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
