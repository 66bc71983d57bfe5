use anyhow::Result;
use tracing::{error, info};

mod collector;
mod config;
mod pipeline;
mod providers;

use config::WrapConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    std::panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
        error!("PANIC: {info}");
    }));

    info!(version = env!("CARGO_PKG_VERSION"), "market wrap starting");

    let config = match WrapConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {:#}", e);
            std::process::exit(1);
        }
    };
    info!(
        providers = ?config.providers,
        template = %config.template_path.display(),
        recipients = config.recipients.len(),
        "configuration loaded"
    );

    if let Err(e) = pipeline::run(&config).await {
        error!("run failed: {:#}", e);
        std::process::exit(1);
    }

    info!("market wrap completed successfully");
    Ok(())
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}
