//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Questo modulo organizza i service handlers in sotto-moduli separati per una migliore manutenibilità.
//! Ogni modulo gestisce gli endpoint HTTP per una specifica funzionalità.

pub mod auth;
pub mod product;

// Re-exports per facilitare l'import
pub use auth::{login_user, logout_user, register_user};
pub use product::{create_product, delete_product, get_product, list_products, update_product};

use crate::core::response::defaults;
use crate::core::{ApiResponse, AppError};
use axum::http::Uri;
use tracing::debug;

/// Root endpoint - health check
pub async fn root() -> ApiResponse<&'static str> {
    ApiResponse::success("Server is running!")
}

/// Fallback per le route inesistenti
pub async fn route_not_found(uri: Uri) -> AppError {
    debug!("No route for {}", uri.path());
    AppError::not_found(defaults::NOT_FOUND)
}

/// Fallback per i metodi non supportati su una route esistente
pub async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed(defaults::METHOD_NOT_ALLOWED)
}
