use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jokebot::{
    last_posted_style, next_style, refresh_access_token, select, Config, DoodleClient,
    JsonLedger, Ledger, LinkedInClient, Orchestrator, RunOutcome, SheetsLedger,
};

#[derive(Parser)]
#[command(name = "jokebot")]
#[command(about = "Joke rotation and LinkedIn posting bot")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the YAML config file
    #[arg(long, default_value = "jokebot.yml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Post the next joke in the rotation
    Post {
        /// Select the candidate but produce no external side effects
        #[arg(long)]
        dry_run: bool,

        /// Skip doodle generation even if an API key is present
        #[arg(long)]
        no_image: bool,

        /// Use a local JSON ledger file instead of Google Sheets
        #[arg(long)]
        ledger_file: Option<PathBuf>,
    },

    /// Show the rotation state and the next candidate
    Status {
        /// Use a local JSON ledger file instead of Google Sheets
        #[arg(long)]
        ledger_file: Option<PathBuf>,
    },

    /// Exchange the configured refresh token for a new LinkedIn access token
    RefreshToken,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("jokebot=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Post {
            dry_run,
            no_image,
            ledger_file,
        } => {
            run_post(cli.config, dry_run, no_image, ledger_file).await?;
        }
        Commands::Status { ledger_file } => {
            show_status(cli.config, ledger_file).await?;
        }
        Commands::RefreshToken => {
            refresh_token().await?;
        }
    }

    Ok(())
}

async fn run_post(
    config_path: PathBuf,
    dry_run: bool,
    no_image: bool,
    ledger_file: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load(&config_path)?;

    let access_token =
        std::env::var("LINKEDIN_ACCESS_TOKEN").context("LINKEDIN_ACCESS_TOKEN not set")?;

    let linkedin = LinkedInClient::new(access_token)?
        .with_visibility(&config.post.visibility)
        .with_media_title(&config.post.media_title);

    // Doodles are optional: no key means the feature is simply off
    let doodle = if no_image || !config.image.enabled {
        None
    } else {
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) => Some(DoodleClient::new(key, &config.image)?),
            Err(_) => None,
        }
    };

    let styles = config.rotation.styles.clone();

    match ledger_file {
        Some(path) => {
            let ledger = JsonLedger::new(path);
            run_pipeline(ledger, linkedin, doodle, styles, dry_run).await
        }
        None => {
            let ledger = sheets_ledger(&config)?;
            run_pipeline(ledger, linkedin, doodle, styles, dry_run).await
        }
    }
}

async fn run_pipeline<L: Ledger>(
    ledger: L,
    linkedin: LinkedInClient,
    doodle: Option<DoodleClient>,
    styles: Vec<String>,
    dry_run: bool,
) -> Result<()> {
    let orchestrator = Orchestrator::new(ledger, linkedin, doodle, styles);

    match orchestrator.run(dry_run).await? {
        RunOutcome::Posted {
            style,
            position,
            post_id,
        } => {
            println!("Posted {} joke from row {} (post id: {})", style, position, post_id);
        }
        RunOutcome::WouldPost { style, position } => {
            println!("Dry run: would post the {} joke from row {}", style, position);
        }
        RunOutcome::NothingToDo { style } => {
            println!("No unposted jokes found in style: {}", style);
        }
    }

    Ok(())
}

async fn show_status(config_path: PathBuf, ledger_file: Option<PathBuf>) -> Result<()> {
    let config = Config::load(&config_path)?;

    let records = match ledger_file {
        Some(path) => JsonLedger::new(path).load_records().await?,
        None => sheets_ledger(&config)?.load_records().await?,
    };

    let unposted = records.iter().filter(|r| !r.posted).count();
    println!("Ledger: {} records, {} unposted", records.len(), unposted);

    match last_posted_style(&records) {
        Some(style) => println!("Last posted style: {}", style),
        None => println!("Last posted style: none yet"),
    }

    let styles = &config.rotation.styles;
    if let Some(style) = next_style(styles, last_posted_style(&records)) {
        println!("Next style due: {}", style);
    }

    match select(&records, styles) {
        Ok(selection) => {
            println!(
                "Next candidate (row {}): {}",
                selection.position, selection.record.joke
            );
        }
        Err(no_candidate) => {
            println!("No unposted jokes found in style: {}", no_candidate.style);
        }
    }

    Ok(())
}

fn sheets_ledger(config: &Config) -> Result<SheetsLedger> {
    if config.ledger.spreadsheet_id.is_empty() {
        anyhow::bail!("ledger.spreadsheet_id is not configured");
    }

    let service_account_json =
        std::env::var("SERVICE_ACCOUNT_JSON").context("SERVICE_ACCOUNT_JSON not set")?;

    SheetsLedger::new(&service_account_json, config.ledger.spreadsheet_id.clone())
}

async fn refresh_token() -> Result<()> {
    let client_id = std::env::var("LINKEDIN_CLIENT_ID").context("LINKEDIN_CLIENT_ID not set")?;
    let client_secret =
        std::env::var("LINKEDIN_CLIENT_SECRET").context("LINKEDIN_CLIENT_SECRET not set")?;
    let refresh_token =
        std::env::var("LINKEDIN_REFRESH_TOKEN").context("LINKEDIN_REFRESH_TOKEN not set")?;

    let access_token = refresh_access_token(&client_id, &client_secret, &refresh_token).await?;

    println!("{}", access_token);

    Ok(())
}
