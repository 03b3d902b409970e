use clap::Parser;
use reftree::{
    config::Config,
    render::{render_json, render_text, Placeholders},
    CrossrefClient, ReferenceTreeBuilder,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Search a paper by title and print a tree of its references-of-references
#[derive(Debug, Parser)]
#[command(name = "reftree", version, about)]
struct Cli {
    /// Paper title (or any free-text query)
    #[arg(required = true)]
    query: Vec<String>,

    /// Levels of references to expand (overrides MAX_DEPTH)
    #[arg(short = 'd', long)]
    max_depth: Option<usize>,

    /// Candidate works requested from the search endpoint (overrides SEARCH_ROWS)
    #[arg(short, long)]
    rows: Option<usize>,

    /// Print the report as JSON instead of a text tree
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reftree=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(max_depth) = cli.max_depth {
        config.tree.max_depth = max_depth;
    }
    if let Some(rows) = cli.rows {
        config.crossref.search_rows = rows;
    }
    config.validate()?;
    info!("Configuration loaded: {:?}", config);

    let client = CrossrefClient::from_config(&config.crossref);
    let mut builder = ReferenceTreeBuilder::from_config(Arc::new(client), &config);

    let query = cli.query.join(" ");
    let report = match builder.search(&query).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Search failed");
            eprintln!("{}", e.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.json {
        println!("{}", render_json(&report)?);
    } else {
        print!("{}", render_text(&report, &Placeholders::default())?);
        println!(
            "\n{} nodes, {} lookups, {} cache hits",
            report.stats.nodes, report.stats.remote_fetches, report.stats.cache_hits
        );
    }

    Ok(ExitCode::SUCCESS)
}
