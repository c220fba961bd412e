#![allow(dead_code)]

use axum_test::TestServer;
use axum_test::http::HeaderName;
use catalog_server::config::Config;
use catalog_server::core::{AppState, encode_jwt};
use catalog_server::repositories::{connect_in_memory, run_migrations};
use catalog_server::utils::encode_string;
use serde_json::{Value, json};
use std::sync::Arc;

pub const JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";

/// Configurazione per i test: secret noto e bcrypt al costo minimo
pub fn test_config() -> Config {
    Config {
        jwt_secret: JWT_SECRET.to_string(),
        bcrypt_cost: 4,
        ..Config::default()
    }
}

/// Crea un AppState su un database in memoria con le migrazioni applicate
pub async fn create_test_state_with(config: Config) -> Arc<AppState> {
    let pool = connect_in_memory()
        .await
        .expect("Failed to open in-memory database");
    run_migrations(&pool).await.expect("Failed to run migrations");
    Arc::new(AppState::new(pool, &config))
}

pub async fn create_test_state() -> Arc<AppState> {
    create_test_state_with(test_config()).await
}

/// Crea un TestServer per i test
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = catalog_server::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

pub async fn spawn_server() -> TestServer {
    create_test_server(create_test_state().await)
}

/// Password offuscata come la invierebbe il client
pub fn obfuscate(password: &str) -> String {
    encode_string(password).expect("password must be Latin-1")
}

pub fn register_body(username: &str, password: &str) -> Value {
    json!({
        "firstname": "Mario",
        "lastname": "Rossi",
        "username": username,
        "password": obfuscate(password),
        "role": "admin"
    })
}

/// Genera un JWT valido per 24 ore
pub fn create_test_jwt(user_id: i64, role: &str) -> String {
    encode_jwt(user_id, role, JWT_SECRET, 24).expect("Failed to create JWT token")
}

pub fn cookie_header() -> HeaderName {
    HeaderName::from_static("cookie")
}

/// Registra un utente, fa login e ritorna la coppia `token=<jwt>` dal Set-Cookie
pub async fn login_cookie(server: &TestServer, username: &str, password: &str) -> String {
    server
        .post("/api/auth/register")
        .json(&register_body(username, password))
        .await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "username": username, "password": obfuscate(password) }))
        .await;
    response.assert_status_ok();

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("Set-Cookie header should be present")
        .to_str()
        .expect("Set-Cookie should be ASCII");

    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}
