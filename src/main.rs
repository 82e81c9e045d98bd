//! xks-preflight: preflight checks for GPU workloads on managed Kubernetes

mod config;

use clap::Parser;
use color_eyre::Result;
use config::{LogLevel, ProviderArg, Settings};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, prelude::*};
use xks_preflight_core::{CloudProvider, builtin_checks};
use xks_preflight_kube::{connect, detect, run_checks};

/// xks-preflight: preflight checks for GPU workloads on managed Kubernetes
#[derive(Parser, Debug)]
#[command(name = "xks-preflight")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to an alternate config file
    #[arg(short, long, env = "XKS_PREFLIGHT_CONFIG")]
    config: Option<PathBuf>,

    /// Log verbosity (default: INFO)
    #[arg(short, long, env = "XKS_PREFLIGHT_LOG_LEVEL")]
    log_level: Option<LogLevel>,

    /// Path to the kubeconfig file (default: ambient discovery)
    #[arg(short, long, env = "KUBECONFIG")]
    kube_config: Option<PathBuf>,

    /// Cloud provider to perform checks on (by default, try to auto-detect)
    #[arg(short = 'u', long, env = "XKS_PREFLIGHT_CLOUD_PROVIDER")]
    cloud_provider: Option<ProviderArg>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse CLI arguments and merge the config-file layer underneath
    let cli = Cli::parse();
    let file = config::load_file(cli.config.as_deref())?;
    let settings = Settings::resolve(cli.log_level, cli.kube_config, cli.cloud_provider, file);

    init_logging(settings.log_level);

    tracing::debug!(?settings, "resolved settings");
    tracing::info!("xks-preflight initialized");

    // Connect to the cluster; nothing works without it
    let client = match connect(settings.kube_config.as_deref()).await {
        Ok(client) => client,
        Err(err) => {
            tracing::error!("Failed to connect to Kubernetes cluster: {err}");
            std::process::exit(1);
        }
    };
    tracing::info!("Kubernetes connection established");

    // Resolve the provider before any check runs
    let provider = match settings.cloud_provider {
        ProviderArg::Azure => {
            tracing::info!("Cloud provider specified: azure");
            CloudProvider::Azure
        }
        ProviderArg::Auto => match detect(&client).await {
            Ok(CloudProvider::None) => {
                tracing::error!("Failed to detect cloud provider");
                std::process::exit(2);
            }
            Ok(provider) => {
                tracing::info!("Cloud provider detected: {provider}");
                provider
            }
            Err(err) => {
                tracing::error!("Failed to connect to Kubernetes cluster: {err}");
                std::process::exit(1);
            }
        },
    };

    let report = match run_checks(&client, provider, builtin_checks()).await {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("Failed to connect to Kubernetes cluster: {err}");
            std::process::exit(1);
        }
    };

    // Report goes to stdout; diagnostics stay on stderr
    print!("{}", report.render());

    Ok(())
}

/// Set up the stderr tracing subscriber.
fn init_logging(level: LogLevel) {
    let base = level.as_tracing_level();

    // Build filter: set base level, but quiet down noisy HTTP client libraries
    let filter = if base == Level::DEBUG {
        EnvFilter::from_default_env()
            .add_directive(Level::DEBUG.into())
            .add_directive("hyper=info".parse().unwrap())
            .add_directive("hyper_util=info".parse().unwrap())
            .add_directive("tower=info".parse().unwrap())
            .add_directive("rustls=info".parse().unwrap())
    } else {
        EnvFilter::from_default_env().add_directive(base.into())
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}
