/*
[INPUT]:  CLI arguments, YAML settings document, OS shutdown signals
[OUTPUT]: A rotated API credential persisted to the settings document
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use lighter_keyrotate::{RotationError, RotationRunner};

#[derive(Parser, Debug)]
#[command(
    name = "lighter-keyrotate",
    version,
    about = "Provision a fresh Lighter API key for a trading account"
)]
struct Cli {
    #[arg(long = "config", value_name = "PATH", default_value = "config.yaml")]
    config_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing()?;

    info!(
        config_path = %args.config_path.display(),
        "starting lighter-keyrotate"
    );

    let runner = RotationRunner::new(&args.config_path);
    setup_signal_handlers(runner.cancellation_token());

    match runner.run().await {
        Ok(outcome) => {
            info!(account_index = outcome.account_index, "API key rotation complete");
            println!("Lighter API key rotated.");
            println!(
                "New API private key saved to {}: {}",
                args.config_path.display(),
                outcome.key_preview()
            );
            Ok(())
        }
        Err(RotationError::Aborted) => {
            warn!("rotation aborted before the new key was verified; the config was not changed");
            Err(anyhow!("rotation aborted"))
        }
        Err(err) => {
            error!(stage = %err.stage(), error = %err, "rotation failed");
            Err(anyhow!(err)).context(
                "API key rotation failed; check the settings document and network connectivity",
            )
        }
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
