use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vodify_core::traits::{EventDirectory, NotificationDispatcher};
use vodify_core::{ContentMaterializer, ConversionService};
use vodify_db::{PgContentStore, PgEventDirectory, PgStatusStore};
use vodify_vimeo::{ThumbnailFetcher, VimeoClient};

use vodify_api::config::ServerConfig;
use vodify_api::converter::{ConverterClient, JobSubmitter};
use vodify_api::notifications::{EmailNotifier, NullDispatcher, SmtpConfig};
use vodify_api::router::build_app_router;
use vodify_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vodify_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = vodify_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    vodify_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    vodify_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // Collaborators behind the core traits.
    let store = Arc::new(PgStatusStore::new(pool.clone()));
    let content = Arc::new(PgContentStore::new(pool.clone()));
    let events: Arc<dyn EventDirectory> = Arc::new(PgEventDirectory::new(pool.clone()));
    let thumbnails = Arc::new(ThumbnailFetcher::new(config.thumbnail_dir.clone()));

    let notifier: Arc<dyn NotificationDispatcher> = match SmtpConfig::from_env() {
        Some(smtp) => Arc::new(EmailNotifier::new(
            smtp,
            config.notification_recipients.clone(),
            config.notification_template.clone(),
            config.public_base_url.clone(),
        )),
        None => {
            tracing::warn!("SMTP not configured, video notifications are disabled");
            Arc::new(NullDispatcher)
        }
    };

    let materializer = ContentMaterializer::new(content, events.clone(), thumbnails);
    let service = Arc::new(ConversionService::new(store, materializer, notifier));

    let submitter: Arc<dyn JobSubmitter> =
        Arc::new(ConverterClient::new(config.converter_url.clone()));
    let vimeo = config
        .vimeo_access_token
        .clone()
        .map(|token| Arc::new(VimeoClient::new(Some(token))));
    if vimeo.is_none() {
        tracing::warn!("VIMEO_ACCESS_TOKEN not set, prefill video lookup is disabled");
    }

    let state = AppState {
        config: Arc::new(config.clone()),
        service,
        events,
        submitter,
        vimeo,
    };

    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(config.host.parse().expect("Invalid HOST"), config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
