use anyhow::{Context, Result};
use briefing::api::{ApiClient, Category};
use briefing::app::App;
use briefing::config::{Config, API_BASE_URL_ENV};
use briefing::sync::{sort_newest_first, validate_submit_url, SyncController};
use briefing::ui;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Get the config directory path (~/.config/briefing/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("briefing"))
}

#[derive(Parser, Debug)]
#[command(
    name = "briefing",
    about = "Terminal client for a news summarizer: submit, filter and prune article summaries"
)]
struct Args {
    /// Backend base URL (overrides $BRIEFING_API_BASE_URL and the config file)
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,

    /// Path to the config file (default: ~/.config/briefing/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Category to show on startup
    #[arg(long, value_name = "CATEGORY")]
    category: Option<Category>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print articles, newest first, and exit
    List {
        /// Only list articles in this category
        #[arg(long, value_name = "CATEGORY")]
        category: Option<Category>,
    },
    /// Submit a URL for summarization and print the stored article
    Submit { url: String },
    /// Delete an article by id
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never mix with the TUI or `list` output
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?;

    let env_base_url = std::env::var(API_BASE_URL_ENV).ok();
    let base_url = config
        .resolve_base_url(args.base_url.as_deref(), env_base_url.as_deref())
        .context("Invalid backend URL")?;
    let client = ApiClient::new(&base_url, config.request_timeout())
        .context("Failed to build HTTP client")?;

    match args.command {
        Some(Command::List { category }) => list(&client, category).await,
        Some(Command::Submit { url }) => {
            let url = validate_submit_url(&url)?;
            let article = client.submit(url).await?;
            println!("Added [{}] {}", article.id, article.display_title());
            if !article.summary_text().is_empty() {
                println!("\n{}", article.summary_text());
            }
            Ok(())
        }
        Some(Command::Delete { id }) => {
            client.remove(id).await?;
            println!("Deleted article {}", id);
            Ok(())
        }
        None => run_tui(client, &config, args.category).await,
    }
}

async fn list(client: &ApiClient, category: Option<Category>) -> Result<()> {
    let mut articles = match category {
        Some(category) => client.list_by_category(category).await?,
        None => client.list_all().await?,
    };
    sort_newest_first(&mut articles);

    if articles.is_empty() {
        match category {
            Some(category) => println!("No articles found for category: {}", category.label()),
            None => println!("No articles found"),
        }
        return Ok(());
    }

    let now = Utc::now();
    for article in &articles {
        println!(
            "{:>6}  {:<14} {:>6}  {}",
            article.id,
            article.category.as_deref().unwrap_or("-"),
            ui::format_relative_time(article.created_at, now),
            article.display_title()
        );
    }
    Ok(())
}

async fn run_tui(client: ApiClient, config: &Config, initial: Option<Category>) -> Result<()> {
    tracing::info!(base_url = %client.base_url(), "Starting TUI");

    let (event_tx, event_rx) = mpsc::channel(32);
    let sync = SyncController::new(client, event_tx);
    let mut app = App::new(sync, config);
    app.select_filter(initial);

    ui::run(&mut app, event_rx).await
}
