use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

mod app;
mod logging;
mod ui;

use app::App;
use callsheet::clipboard::SystemClipboard;
use callsheet::config::Config;
use callsheet::content::Content;
use callsheet::objections::ObjectionBrowser;
use callsheet::session::Session;

#[derive(Parser)]
#[command(name = "callsheet")]
#[command(about = "Call-flow checklist and objection reference for call-center agents")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the call script grouped by category
    Script,

    /// Print the objection-handling reference
    Objections {
        /// Only show objections whose prompt or response contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = cli.command.is_none();
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    let content = Content::load_configured(&config).context("Failed to load call content")?;

    match cli.command {
        Some(Commands::Script) => cmd_script(content),
        Some(Commands::Objections { search }) => cmd_objections(content, search),
        None => run_tui(config, content, logging_handle.log_file_path).await?,
    }

    Ok(())
}

async fn run_tui(config: Config, content: Content, log_file_path: Option<PathBuf>) -> Result<()> {
    let clipboard = Arc::new(
        SystemClipboard::new(config.clipboard.command.as_deref())
            .with_timeout(config.clipboard_timeout()),
    );

    let mut app = App::new(config, content, clipboard);
    let result = app.run().await;

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

fn cmd_script(content: Content) {
    let session = Session::new(content.steps);

    println!("Call Script ({} steps)", session.total_count());
    println!("{}", "─".repeat(60));

    for group in session.grouped_by_category() {
        println!();
        println!("{}", group.category.display_name());
        for step in &group.steps {
            println!("  {}", step.title);
            println!("    \"{}\"", step.verbatim);
        }
    }
}

fn cmd_objections(content: Content, search: Option<String>) {
    let browser = ObjectionBrowser::new(content.objections).with_query(search.unwrap_or_default());
    let matches = browser.filtered();

    if matches.is_empty() {
        println!("No objections match \"{}\"", browser.query());
        return;
    }

    println!(
        "Objections ({} of {})",
        matches.len(),
        browser.objections().len()
    );
    println!("{}", "─".repeat(60));

    for objection in matches {
        println!();
        println!("\"{}\"", objection.objection);
        println!("  → {}", objection.solution);
    }
}
