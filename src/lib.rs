//! Server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod utils;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    use crate::core::rate_limit_middleware;
    use services::{method_not_allowed, route_not_found};

    Router::new()
        .route("/", get(root))
        .nest("/api/auth", configure_auth_routes())
        .nest("/api/products", configure_product_routes(state.clone()))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(configure_cors(&state.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Configura le routes di autenticazione (register, login, logout)
fn configure_auth_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/logout", post(logout_user))
}

/// Configura le routes del catalogo: lettura pubblica, scrittura autenticata
fn configure_product_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    let auth_guard = middleware::from_fn_with_state(state, authentication_middleware);

    Router::new()
        .route(
            "/",
            get(list_products).merge(post(create_product).layer(auth_guard.clone())),
        )
        .route(
            "/{id}",
            get(get_product).merge(
                put(update_product)
                    .delete(delete_product)
                    .layer(auth_guard),
            ),
        )
}

/// CORS con credenziali per le origini configurate (separate da virgola).
/// Il wildcard `*` non è compatibile con le credenziali e viene scartato.
fn configure_cors(origins: &str) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|origin| {
            if *origin == "*" {
                warn!("Ignoring wildcard CORS origin: not allowed with credentials");
            }
            !origin.is_empty() && *origin != "*"
        })
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|_| warn!("Ignoring invalid CORS origin: {}", origin))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}
