use crate::cli::commands::LogFormat;
use crate::gateway::{AiGateway, CredentialHook, GatewayConfig, GatewayError};
use anyhow::{anyhow, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init_logging(verbose: bool, log_format: LogFormat) -> Result<()> {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let fmt_layer = match log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .boxed(),
        LogFormat::Text => fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize tracing subscriber: {}", e))
}

pub fn print_info() {
    println!("EstateMind v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();
    println!("Authors: {}", env!("CARGO_PKG_AUTHORS"));
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
    println!();
    println!("For more information, visit: {}", env!("CARGO_PKG_REPOSITORY"));
}

/// Load gateway settings, optionally from an explicit env file
pub fn load_config(env_file: Option<&Path>, verbose: bool) -> Result<GatewayConfig> {
    let config = match env_file {
        Some(path) => GatewayConfig::from_env_file(path).map_err(|e| anyhow!(e))?,
        None => GatewayConfig::from_env(),
    };
    Ok(if verbose { config.with_debug(true) } else { config })
}

/// Hook telling the user how to replace a rejected key
pub fn credential_hint() -> CredentialHook {
    Arc::new(|error: &GatewayError| {
        eprintln!("{} {}", "✗".red().bold(), error.to_string().red());
        eprintln!(
            "  {}",
            "The API key was rejected. Set GEMINI_API_KEY to a key with access to the configured models."
                .yellow()
        );
    })
}

/// Build the gateway used by every networked command
pub fn build_gateway(config: &GatewayConfig) -> Result<Arc<AiGateway>> {
    let gateway = AiGateway::from_config(config)?.with_credential_hook(credential_hint());
    tracing::debug!("Gateway ready: {:?}", gateway);
    Ok(Arc::new(gateway))
}

/// Spinner shown while a request is in flight
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
