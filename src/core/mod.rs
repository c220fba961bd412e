//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! Questo modulo contiene tutti i componenti "core" dell'applicazione:
//! - Autenticazione, JWT e cookie di sessione
//! - Configurazione
//! - Gestione errori ed envelope delle risposte
//! - Rate limiting
//! - Stato applicazione

pub mod auth;
pub mod config;
pub mod error;
pub mod rate_limit;
pub mod response;
pub mod state;

// Re-exports per facilitare l'import
pub use auth::{AuthUser, Claims, authentication_middleware, decode_jwt, encode_jwt};
pub use config::Config;
pub use error::AppError;
pub use rate_limit::{RateLimiter, rate_limit_middleware};
pub use response::ApiResponse;
pub use state::AppState;
