use std::process::ExitCode;

use tracing::{error, info};

use catalog_search::config::LogFormat;
use catalog_search::http::{router, AppState};
use catalog_search::{Dependencies, ServiceError, Settings};
use catalog_search_ingest::SeedOutcome;

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn run(settings: Settings) -> Result<(), ServiceError> {
    let deps = Dependencies::new(&settings).await?;

    // Seed before binding so no request sees a half-loaded index
    match deps.seeder.ensure_seeded().await? {
        SeedOutcome::Skipped { existing } => {
            info!(existing = existing, "Using existing product index");
        }
        SeedOutcome::Seeded(summary) => {
            info!(
                indexed = summary.indexed,
                failed = summary.failed,
                batches = summary.batches,
                "Seeded product index"
            );
        }
    }

    let app = router(AppState::from(&deps));
    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    info!(addr = %settings.bind_addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let settings = Settings::from_env();
    init_tracing(
        settings
            .as_ref()
            .map(|s| s.log_format)
            .unwrap_or_default(),
    );

    let result = match settings {
        Ok(settings) => run(settings).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!(error = %e, "Catalog search service failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
