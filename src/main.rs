mod cli;
mod config;
mod error;
mod fields;
mod jira;
mod render;
mod search;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use jira::JiraClient;
use tracing::Level;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("failed to load config")?;

    match cli.command {
        Commands::Search(args) => {
            let resolved = search::resolve(&config, &args)?;
            let client = JiraClient::new(&config.jira)?;
            let mut stdout = std::io::stdout();
            search::search_and_render(&client, &config, &resolved, args.format, &mut stdout)
                .await?;
        }
    }

    Ok(())
}
