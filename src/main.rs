use catalog_server::core::rate_limit::purge_expired_buckets;
use catalog_server::{AppState, config::Config, create_router, repositories};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Inizializza il logging, RUST_LOG ha la precedenza
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Inizializza la configurazione
    let config = Config::from_env()?;
    config.print_info();

    // Database e migrazioni
    let pool = repositories::connect(&config.database_url, config.max_connections).await?;
    repositories::run_migrations(&pool).await?;

    let state = Arc::new(AppState::new(pool, &config));

    // Pulizia periodica dei contatori del rate limiter
    tokio::spawn(purge_expired_buckets(state.limiter.clone()));

    let app = create_router(state);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    // ConnectInfo serve al rate limiter per distinguere i client
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
