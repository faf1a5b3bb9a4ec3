use clap::Parser;
use std::path::PathBuf;

use dice_server::config::{self, ServiceConfig};
use dice_server::lifecycle;

#[derive(Parser)]
#[command(name = "dice-server")]
#[command(about = "Dice-rolling demo service with OpenTelemetry tracing", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address (e.g. "127.0.0.1:8080").
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => ServiceConfig::default(),
    };
    config::apply_env_overrides(&mut config);
    if let Some(listen) = args.listen {
        config.listener.bind_address = listen;
    }

    if let Err(err) = lifecycle::run(config).await {
        // The subscriber is installed by lifecycle::run, so this reaches the
        // console and, when exporting, the collector.
        tracing::error!(error = %err, "Service terminated with error");
        return Err(err.into());
    }
    Ok(())
}
