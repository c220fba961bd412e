//! Application State - Stato globale dell'applicazione
//!
//! Contiene i repository, la configurazione della sessione e il rate limiter
//! condivisi tra tutte le route e i middleware.

use crate::core::auth::SessionCookie;
use crate::core::config::Config;
use crate::core::rate_limit::RateLimiter;
use crate::repositories::{PoolType, ProductRepository, UserRepository};
use std::time::Duration;

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    /// Repository per la gestione degli utenti
    pub user: UserRepository,

    /// Repository per la gestione dei prodotti
    pub product: ProductRepository,

    /// Secret key per JWT token
    pub jwt_secret: String,

    /// Durata del token in ore
    pub jwt_expiry_hours: i64,

    /// Attributi del cookie di sessione
    pub cookie: SessionCookie,

    /// Costo bcrypt per l'hash delle password
    pub bcrypt_cost: u32,

    /// Origini ammesse dal CORS
    pub cors_origin: String,

    /// Contatori delle richieste per client
    pub limiter: RateLimiter,
}

impl AppState {
    /// Crea una nuova istanza di AppState inizializzando tutti i repository
    /// con il pool di connessioni fornito.
    pub fn new(pool: PoolType, config: &Config) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            product: ProductRepository::new(pool),
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiry_hours: config.jwt_expiry_hours,
            cookie: SessionCookie {
                domain: config.cookie_domain.clone(),
                secure: config.cookie_secure,
                max_age_secs: config.jwt_expiry_hours * 60 * 60,
            },
            bcrypt_cost: config.bcrypt_cost,
            cors_origin: config.cors_origin.clone(),
            limiter: RateLimiter::new(
                config.rate_limit_max,
                Duration::from_secs(config.rate_limit_window_secs),
            ),
        }
    }
}
