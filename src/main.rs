//! nam - command-line access to a Nettigo Air Monitor device

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::time::interval;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nettigo_air_monitor::config::CliConfig;
use nettigo_air_monitor::NettigoAirMonitor;

/// Read sensor data from a Nettigo Air Monitor.
#[derive(Parser, Debug)]
#[command(name = "nam")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to config/nam.*).
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Device host, overrides NAM__HOST.
    #[arg(long, global = true)]
    host: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch sensor values once.
    Data,
    /// Print the device MAC address.
    Mac,
    /// Print config.json and detected auth state.
    Config,
    /// Restart the device.
    Restart,
    /// Trigger an OTA firmware update.
    Ota,
    /// Poll sensor values until interrupted.
    Watch {
        /// Seconds between updates (defaults to poll_interval_secs).
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nettigo_air_monitor=info,nam=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = CliConfig::load(args.config.as_deref())?;
    if args.host.is_some() {
        config.host = args.host.clone();
    }
    let options = config.connection_options()?;

    let http_client = reqwest::Client::new();
    let mut nam = NettigoAirMonitor::create(http_client, options).await?;
    tracing::info!(
        "Connected to {} (software: {}, auth: {})",
        nam.host(),
        nam.software_version().unwrap_or("unknown"),
        nam.auth_enabled()
    );

    match args.command {
        Command::Data => {
            let sensors = nam.async_update().await?;
            println!("{}", serde_json::to_string_pretty(&sensors)?);
        }
        Command::Mac => {
            println!("{}", nam.async_get_mac_address().await?);
        }
        Command::Config => {
            let raw = nam.async_check_credentials().await?;
            let summary = serde_json::json!({
                "host": nam.host(),
                "auth_enabled": nam.auth_enabled(),
                "software_version": nam.software_version(),
                "config": raw,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Restart => {
            nam.async_restart().await?;
            tracing::info!("Restart requested for {}", nam.host());
        }
        Command::Ota => {
            nam.async_ota_update().await?;
            tracing::info!("OTA update requested for {}", nam.host());
        }
        Command::Watch { interval: secs } => {
            let secs = secs.unwrap_or(config.poll_interval_secs).max(1);
            watch(&mut nam, Duration::from_secs(secs)).await;
        }
    }

    Ok(())
}

/// Poll the device forever, logging failures and carrying on
async fn watch(nam: &mut NettigoAirMonitor, period: Duration) {
    let mut interval_timer = interval(period);

    loop {
        interval_timer.tick().await;

        match nam.async_update().await {
            Ok(sensors) => match serde_json::to_string(&sensors) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::error!("Failed to serialize sensors: {}", e),
            },
            Err(e) => tracing::warn!("Update from {} failed: {}", nam.host(), e),
        }

        if nam.update_errors() > 0 {
            tracing::debug!(
                "{} consecutive updates served from cache",
                nam.update_errors()
            );
        }
    }
}
