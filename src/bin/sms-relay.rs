//! Command-line entry point: load the gateway config, send one SMS, print
//! the status code and body.

use clap::Parser;
use sms_relay::config::load_config;
use sms_relay::{SmsClient, SmsRequest};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "sms-relay")]
#[command(about = "Send one SMS through an HTTP gateway", long_about = None)]
struct Cli {
    /// Path to the TOML gateway configuration
    #[arg(long)]
    config: PathBuf,

    /// Sender number or name
    #[arg(long)]
    sender: String,

    /// Recipient number
    #[arg(long)]
    recipient: String,

    /// Message text
    #[arg(long)]
    message: String,

    /// I/O timeout in seconds, overrides `timeout_secs` from the config
    #[arg(long)]
    timeout: Option<u64>,

    /// Also write log lines to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log requests and responses
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(cli: &Cli) -> Result<(), std::io::Error> {
    let default_level = if cli.verbose { "sms_relay=debug" } else { "sms_relay=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());

    let file_layer = match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Error: could not open log file: {}", e);
        return ExitCode::FAILURE;
    }

    let mut config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = %cli.config.display(), error = %e, "failed to load configuration");
            println!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Some(Duration::from_secs(secs)));
    }

    tracing::debug!(?config, "configuration loaded");

    let client = SmsClient::new(config);
    let sms = SmsRequest::new(cli.sender, cli.recipient, cli.message);
    let result = client.send_sms(&sms);

    println!("{}", result);
    ExitCode::SUCCESS
}
