//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Ogni repository gestisce le operazioni di database per una specifica entità.
//! Le query sono scritte con `sqlx::query_as` + `FromRow` (controllo a runtime), così la
//! compilazione non richiede un database raggiungibile. Lo schema vive in `migrations/`
//! ed è incluso nel binario da `sqlx::migrate!`.

pub mod product;
pub mod traits;
pub mod user;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{Create, Delete, Read, Update};

// Re-esportazione delle struct dei repository per facilitare l'import
pub use product::ProductRepository;
pub use user::UserRepository;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

// alias di tipo per il pool, per semplificare lo switch in caso in cui vogliamo usare un altro db
pub type PoolType = SqlitePool;

/// Apre il pool di connessioni, creando il file del database se manca
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PoolType, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await?;

    info!("Connected to database");
    Ok(pool)
}

/// Pool su database in memoria: una sola connessione mai riciclata,
/// altrimenti ogni nuova connessione vedrebbe un database vuoto
pub async fn connect_in_memory() -> Result<PoolType, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
}

/// Applica le migrazioni in `migrations/`
pub async fn run_migrations(pool: &PoolType) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Migrations completed");
    Ok(())
}
