use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use feedpage::config::Config;
use feedpage::feed::build_client;
use feedpage::widget::{init_feed, Document, LoadStatus, WidgetOptions};

#[derive(Parser, Debug)]
#[command(name = "feedpage", about = "Render an RSS feed as a paginated HTML widget")]
struct Args {
    /// URL of the RSS feed
    feed_url: String,

    /// Items per page (overrides config)
    #[arg(long, value_name = "N")]
    per_page: Option<NonZeroUsize>,

    /// Page to render
    #[arg(long, value_name = "N", default_value_t = 1)]
    page: usize,

    /// Config file (default: ~/.config/feedpage/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write output to FILE instead of stdout
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the parsed feed items as JSON instead of HTML
    #[arg(long)]
    json: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let path = match path {
        Some(p) => p.clone(),
        None => match Config::default_path() {
            Some(p) => p,
            None => {
                tracing::debug!("HOME not set, using default configuration");
                return Ok(Config::default());
            }
        },
    };
    Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write output to {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the rendered page can be piped
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = load_config(args.config.as_ref())?;
    if let Some(per_page) = args.per_page {
        config.items_per_page = per_page.get();
    }

    let client = build_client(&config).context("Failed to create HTTP client")?;

    let mut doc = Document::new();
    doc.add_container(&config.display_target_id);
    doc.add_container(&config.controls_target_id);

    let options = WidgetOptions::from_config(&config, &args.feed_url);
    let mut widget = init_feed(&mut doc, &client, &config, options).await;

    if widget.status() == LoadStatus::Loaded && args.page != 1 {
        widget
            .go_to_page(&mut doc, args.page)
            .with_context(|| format!("Cannot show page {}", args.page))?;
    }

    let content = if args.json {
        serde_json::to_string_pretty(widget.state().items()).context("Failed to serialize items")?
    } else {
        doc.to_page_html(&args.feed_url)
    };
    write_output(args.output.as_ref(), &content)?;

    if widget.status() == LoadStatus::Failed {
        anyhow::bail!("Feed could not be loaded from {}", args.feed_url);
    }
    Ok(())
}
