// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use axum::{http::StatusCode, routing::get, Router};
use clap::Parser;
use kube::Client;
use route53_ingress::{
    aws::{elb::ElbFrontEndLookup, load_sdk_config, route53::Route53ZoneService},
    cli::Cli,
    constants::{
        HEALTH_SERVER_PATH, METRICS_SERVER_PATH, TOKIO_THREAD_NAME, TOKIO_WORKER_THREADS,
    },
    context::{install_crypto_provider, Context},
    engine::ReconciliationEngine,
    ingress_controller::run_ingress_controller,
    metrics::gather_metrics,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name(TOKIO_THREAD_NAME)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    // Respects RUST_LOG environment variable if set, otherwise defaults to INFO level
    // Example: RUST_LOG=debug route53-ingress
    //
    // Respects RUST_LOG_FORMAT environment variable for output format
    // Example: RUST_LOG_FORMAT=json route53-ingress
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    info!("Starting Route53 ingress controller");
    let engine_config = cli.engine_config();
    debug!(config = ?engine_config, "Engine configuration loaded");

    install_crypto_provider();
    debug!("Initializing Kubernetes client");
    let client = Client::try_default().await?;
    debug!("Kubernetes client initialized successfully");

    debug!("Loading AWS configuration");
    let sdk_config = load_sdk_config().await;
    let dns = Arc::new(Route53ZoneService::new(&sdk_config));
    let front_ends = Arc::new(ElbFrontEndLookup::new(&sdk_config));
    debug!(region = ?sdk_config.region(), "AWS clients created");

    let engine = Arc::new(ReconciliationEngine::new(engine_config, dns, front_ends));
    let context = Arc::new(Context::new(client, engine, cli.namespace.clone()));
    let metrics_address = cli.metrics_address()?;

    // The controller and the metrics server should never exit on their own
    tokio::select! {
        result = run_ingress_controller(context) => {
            error!("CRITICAL: Ingress controller exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("Ingress controller exited unexpectedly without error")
        }
        result = run_metrics_server(metrics_address) => {
            error!("CRITICAL: Metrics server exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("Metrics server exited unexpectedly without error")
        }
        signal = shutdown_signal() => {
            info!("Received {}", signal?);
        }
    }

    info!("Shutting down...");
    Ok(())
}

/// Wait for SIGINT or SIGTERM and return the signal name.
async fn shutdown_signal() -> Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                Ok("SIGINT")
            }
            _ = sigterm.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok("SIGINT")
    }
}

/// Serve `/metrics` and `/healthz`. Parks forever when the server is disabled.
async fn run_metrics_server(address: Option<SocketAddr>) -> Result<()> {
    let Some(address) = address else {
        warn!("Metrics server disabled");
        std::future::pending::<()>().await;
        return Ok(());
    };

    let app = Router::new()
        .route(METRICS_SERVER_PATH, get(metrics_handler))
        .route(HEALTH_SERVER_PATH, get(health_handler));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(bind_address = %address, "Metrics server started");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn metrics_handler() -> (StatusCode, String) {
    match gather_metrics() {
        Ok(body) => (StatusCode::OK, body),
        Err(err) => {
            error!(error = %err, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

async fn health_handler() -> &'static str {
    "ok"
}
