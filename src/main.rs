use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use repovault::{local, repos_to_clone, Config, MirrorEngine, MirrorError};

#[derive(Parser)]
#[command(name = "repovault")]
#[command(about = "Mirror GitHub repositories into a local backup directory")]
#[command(version)]
struct Cli {
    /// Credentials and settings file (JSON or YAML)
    #[arg(short = 'c', long = "creds", visible_alias = "config", value_name = "FILE")]
    creds: PathBuf,

    /// List what would be cloned without cloning or fetching
    #[arg(long)]
    dry_run: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    info!("Starting repovault v{}", env!("CARGO_PKG_VERSION"));

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            if let Some(processed) = err.processed() {
                println!("Number of repositories processed before the failure: {}", processed);
            }
            error!("{:#}", anyhow::Error::new(err));
            ExitCode::from(code)
        }
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

async fn run(cli: &Cli) -> Result<(), MirrorError> {
    let config = Config::load(&cli.creds).map_err(|source| MirrorError::Config {
        path: cli.creds.clone(),
        source,
    })?;

    let engine = MirrorEngine::from_config(config).map_err(|source| MirrorError::Config {
        path: cli.creds.clone(),
        source,
    })?;

    let entries = engine.scan_local().await?;
    println!("Current directory entries: {}", entries.len());

    let remote = engine.discover().await?;
    println!("Number of repositories to process: {}", remote.len());

    let to_clone = repos_to_clone(&local::display_names(&entries), &remote);
    println!("Number of repositories to clone: {}", to_clone.len());

    if cli.dry_run {
        for repo in &to_clone {
            info!("Would clone {}", repo.full_name);
        }
        println!("Dry run: nothing cloned or fetched");
        return Ok(());
    }

    let cloned = engine.clone_missing(&to_clone).await?;
    println!("Number of repositories cloned: {}", cloned);

    let updated = engine.update_all().await?;
    println!("Number of repositories updated: {}", updated);

    Ok(())
}
