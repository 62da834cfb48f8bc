mod cli;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::{StorageBackendArg, CLI};
use clap::Parser;
use linkpulse_core::Repository;
use linkpulse_gateway::{App, AppState};
use linkpulse_generator::{Alphabet, RandomGenerator, RandomGeneratorSettings};
use linkpulse_redirector::RecorderService;
use linkpulse_shortener::ShortenerService;
use linkpulse_storage::{InMemoryRepository, MySqlRepository};
use linkpulse_telemetry::TelemetryConfig;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::try_parse()?;

    let _telemetry = linkpulse_telemetry::init(
        TelemetryConfig::builder()
            .service_name("linkpulse-gateway")
            .log_format(config.log_format)
            .otlp_endpoint(config.otlp_endpoint.clone())
            .build(),
    )?;

    let alphabet = match &config.id_alphabet {
        Some(chars) => chars.parse::<Alphabet>()?,
        None => Alphabet::base62(),
    };
    let generator = RandomGenerator::new(
        RandomGeneratorSettings::builder()
            .length(config.id_length)
            .alphabet(alphabet)
            .build(),
    )?;

    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %config.public_base_url,
        storage_backend = %config.storage,
        id_length = generator.length(),
        id_alphabet = %generator.alphabet(),
        "starting gateway server"
    );

    match config.storage {
        StorageBackendArg::InMemory => {
            run_server(
                config.listen_addr,
                config.public_base_url,
                InMemoryRepository::new(),
                generator,
            )
            .await?;
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .ok_or("mysql dsn is required when storage backend is mysql")?;
            let repository = MySqlRepository::connect(&mysql_dsn).await?;
            repository.migrate().await?;
            run_server(
                config.listen_addr,
                config.public_base_url,
                repository,
                generator,
            )
            .await?;
        }
    }

    info!("gateway server stopped");
    Ok(())
}

async fn run_server<R: Repository>(
    listen_addr: SocketAddr,
    public_base_url: String,
    repository: R,
    generator: RandomGenerator,
) -> std::io::Result<()> {
    let repository = Arc::new(repository);
    let shortener = ShortenerService::from_shared(Arc::clone(&repository), Arc::new(generator));
    let recorder = RecorderService::from_shared(repository);
    let state = AppState::new(Arc::new(shortener), Arc::new(recorder), public_base_url);

    let listener = TcpListener::bind(listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
