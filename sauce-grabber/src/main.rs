use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use app_utils::{Config, DEFAULT_CONFIG_PATH, init_tracing, login, public_client};
use clap::{Parser, Subcommand};
use sauce_grabber::{download_sheet, own_submissions, scores};
use tracing::debug;

/// Lists, scores and downloads your SAUCE submissions.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// `KEY=value` lines (no INI sections) with `UserName`, `password`, `lessonNumber` and
    /// `downloadPath`. Not read by `events`.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the portal's current events. Needs no login and no config file.
    Events,
    /// Total grade per team over your submissions in an event.
    Scores {
        #[arg(long)]
        event: String,
        #[arg(long)]
        json: bool,
    },
    /// Your submissions in an event.
    Submissions {
        #[arg(long)]
        event: String,
        #[arg(long)]
        json: bool,
    },
    /// Download every submission of one sheet into the configured directory.
    Download {
        #[arg(long)]
        event: String,
        #[arg(long)]
        sheet: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    match args.command {
        Command::Events => {
            let sauce = public_client()?;
            let events = sauce.get_events().await?;
            for (name, url) in events.iter() {
                println!("{name}\t{url}");
            }
        }
        Command::Scores { event, json } => {
            let config = load_config(&args.config)?;
            let sauce = login(&config).await?;
            let ledger = scores(&sauce, &event, config.lesson()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ledger)?);
            } else {
                print!("{ledger}");
            }
        }
        Command::Submissions { event, json } => {
            let config = load_config(&args.config)?;
            let sauce = login(&config).await?;
            let submissions = own_submissions(&sauce, &event, config.lesson()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&submissions)?);
            } else {
                for submission in &submissions {
                    println!("{submission}");
                }
            }
        }
        Command::Download { event, sheet } => {
            let config = load_config(&args.config)?;
            let sauce = login(&config).await?;
            println!("Downloading submissions from {event} {sheet}");
            let summary = download_sheet(
                &sauce,
                &event,
                &sheet,
                config.lesson(),
                config.download_path(),
            )
            .await?;
            println!(
                "Downloaded {} submissions to {}",
                summary.downloaded,
                config.download_path().display()
            );
            if summary.failed > 0 {
                anyhow::bail!("{} submissions could not be downloaded", summary.failed);
            }
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<Config> {
    let config = Config::from_file(path)
        .with_context(|| format!("could not load config from `{}`", path.display()))?;
    debug!(?config, "loaded config");
    Ok(config)
}
