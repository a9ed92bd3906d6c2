use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use r53up::config::Settings;
use r53up::dns::Route53Provider;
use r53up::ip::{Families, HttpResolver};
use r53up::{UpdateOutcome, Updater};

#[derive(Parser)]
#[command(name = "r53up")]
#[command(about = "Point a Route 53 record at this host's public IP address")]
#[command(version)]
struct Cli {
    /// Route 53 hosted zone ID
    #[arg(value_name = "ZONE_ID")]
    zone_id: Option<String>,

    /// Fully qualified hostname to update
    #[arg(value_name = "HOSTNAME")]
    hostname: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Only update the A record
    #[arg(short = '4', long = "ipv4")]
    ipv4: bool,

    /// Only update the AAAA record
    #[arg(short = '6', long = "ipv6")]
    ipv6: bool,

    /// Configuration file (defaults to /etc/r53up/config.toml if present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Resolve addresses and show the changes without submitting them
    #[arg(short = 'n', long)]
    dry_run: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,r53up=info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let families = match Families::from_flags(cli.ipv4, cli.ipv6) {
        Ok(families) => families,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Checked after the -4/-6 conflict so that error always exits 1.
    let (Some(zone_id), Some(hostname)) = (cli.zone_id.as_deref(), cli.hostname.as_deref())
    else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "<ZONE_ID> and <HOSTNAME> are required",
            )
            .exit();
    };

    init_logging(cli.verbose);

    match run(&cli, zone_id, hostname, families).await {
        Ok(UpdateOutcome::DryRun(batch)) => {
            for change in batch.changes() {
                println!("{}", change);
            }
            ExitCode::SUCCESS
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Update failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(
    cli: &Cli,
    zone_id: &str,
    hostname: &str,
    families: Families,
) -> Result<UpdateOutcome> {
    let settings = Settings::resolve(cli.config.as_deref())?;

    let resolver = HttpResolver::new(
        settings.lookup.ipv4_url.as_str(),
        settings.lookup.ipv6_url.as_str(),
        settings.lookup.timeout(),
    )
    .context("Failed to create HTTP client")?;
    let provider = Route53Provider::from_env(&settings.route53).await;

    let updater = Updater::new(Arc::new(resolver), Arc::new(provider)).with_dry_run(cli.dry_run);
    let outcome = updater.update(zone_id, hostname, families).await?;

    Ok(outcome)
}
