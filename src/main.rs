use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use parlance::application::ports::{IdentityResolver, StagingStore, TranscriptRepository};
use parlance::application::services::{IntakeLimits, IntakeValidator, JobPoller, TranscriptionService};
use parlance::infrastructure::auth::StaticTokenResolver;
use parlance::infrastructure::observability::{TracingConfig, init_tracing};
use parlance::infrastructure::persistence::{
    InMemoryTranscriptRepository, PgTranscriptRepository, create_pool,
};
use parlance::infrastructure::provider::AssemblyAiClient;
use parlance::infrastructure::storage::LocalStagingStore;
use parlance::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;

    init_tracing(
        TracingConfig {
            json_format: settings.logging.enable_json,
            ..TracingConfig::default()
        },
        settings.server.port,
    );

    let staging: Arc<dyn StagingStore> =
        Arc::new(LocalStagingStore::new(PathBuf::from(&settings.staging.dir))?);

    let repository: Arc<dyn TranscriptRepository> = match settings.database.url.as_deref() {
        Some(url) if !url.is_empty() => {
            let pool = create_pool(url, settings.database.max_connections).await?;
            tracing::info!("Running database migrations");
            sqlx::migrate!().run(&pool).await?;
            Arc::new(PgTranscriptRepository::new(pool))
        }
        _ => {
            tracing::warn!("No database configured; transcript records are kept in memory");
            Arc::new(InMemoryTranscriptRepository::new())
        }
    };

    let provider = Arc::new(AssemblyAiClient::new(
        settings.provider.api_key.clone(),
        settings.provider.base_url.clone(),
    ));

    let intake = IntakeValidator::new(
        Arc::clone(&staging),
        IntakeLimits {
            min_bytes: settings.intake.min_file_bytes,
            max_bytes: settings.intake.max_file_bytes,
        },
    );

    let poller = JobPoller::new(
        Duration::from_secs(settings.polling.interval_secs),
        settings.polling.max_ticks,
    );

    let transcription_service = Arc::new(TranscriptionService::new(
        intake,
        provider,
        poller,
        Arc::clone(&staging),
        Arc::clone(&repository),
    ));

    let identity_resolver: Arc<dyn IdentityResolver> =
        Arc::new(StaticTokenResolver::new(settings.auth.tokens.clone()));

    let state = AppState {
        transcription_service,
        identity_resolver,
    };

    let router = create_router(state);

    let host: IpAddr = settings.server.host.parse()?;
    let addr = SocketAddr::new(host, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
