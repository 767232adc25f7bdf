//! Sentiment API HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use sentiment::config::Config;
use sentiment::constants::{PROJECT_DESCRIPTION, PROJECT_NAME, VERSION};
use sentiment::gateway::{HandlerState, create_router_with_state};
use sentiment::inference::InferenceGateway;
use sentiment::model::BertLoader;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    let directive = config.log_directive()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(version = VERSION, "Starting {}", PROJECT_NAME);
    tracing::debug!("{}", PROJECT_DESCRIPTION);
    tracing::info!(
        model_path = %config.model_path.display(),
        model_endpoint = %config.model_endpoint,
        confidence_threshold = config.confidence_threshold,
        "Model configuration"
    );

    let gateway = Arc::new(InferenceGateway::new(
        BertLoader::new(),
        config.gateway_settings(),
    )?);

    let loading = Arc::clone(&gateway);
    if let Err(e) = tokio::task::spawn_blocking(move || loading.load()).await? {
        tracing::error!(error = %e, "Failed to load sentiment analysis model");
        return Err(e.into());
    }

    let state = HandlerState::new(gateway, config.allowed_origins.clone());
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down {}", PROJECT_NAME);
    Ok(())
}

fn run_health_check() -> i32 {
    let Ok(config) = Config::from_env() else {
        return 1;
    };

    let url = format!("http://{}/health", config.local_addr());

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
