//! Auth services - Gestione autenticazione e registrazione utenti

use crate::core::{ApiResponse, AppError, AppState, encode_jwt};
use crate::dtos::CreateUserDTO;
use crate::entities::User;
use crate::repositories::Create;
use crate::utils::{decode_string, log_error, logged, missing_params, read_body, text_param};
use axum::{
    extract::{Json, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, header},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const REGISTER: &str = "post_/api/auth/register";
const LOGIN: &str = "post_/api/auth/login";

/// Esito della registrazione: 1 creato, -1 username già esistente
const REGISTERED: i32 = 1;
const ALREADY_REGISTERED: i32 = -1;

#[instrument(skip(state, body))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>, // JSON body
) -> Result<ApiResponse<i32>, AppError> {
    // 1. Controllare i parametri obbligatori (firstname, username, password, role), lastname è opzionale
    // 2. Decodificare la password offuscata, se non è decodificabile ritornare errore di validazione
    // 3. Se lo username esiste già ritornare successo con data = -1
    // 4. Generare l'hash bcrypt della password e salvare l'utente
    // 5. Ritornare 201 con data = 1
    let body = read_body(body)?;

    if let Some(missing) = missing_params(&body, &["firstname", "username", "password", "role"]) {
        debug!("Missing register parameters: {}", missing);
        return Err(AppError::missing_param(&missing));
    }

    let (Some(firstname), Some(username), Some(role)) = (
        text_param(&body, "firstname"),
        text_param(&body, "username"),
        text_param(&body, "role"),
    ) else {
        return Err(AppError::validation_error(
            "firstname, username and role must be strings",
        ));
    };

    let password = text_param(&body, "password")
        .as_deref()
        .and_then(decode_string)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            AppError::validation_error(json!({ "password": "Password could not be decoded." }))
        })?;

    if state
        .user
        .find_by_username(&username)
        .await
        .map_err(logged(REGISTER))?
        .is_some()
    {
        info!("Username already registered: {}", username);
        return Ok(ApiResponse::success(ALREADY_REGISTERED));
    }

    let password_hash =
        User::hash_password(&password, state.bcrypt_cost).map_err(logged(REGISTER))?;

    let new_user = CreateUserDTO {
        firstname,
        lastname: text_param(&body, "lastname").unwrap_or_default(),
        username,
        password: password_hash,
        role,
    };

    match state.user.create(&new_user).await {
        Ok(user) => {
            info!("User registered with id {}", user.id);
            Ok(ApiResponse::created(REGISTERED))
        }
        // registrazione concorrente con lo stesso username
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            info!("Username already registered: {}", new_user.username);
            Ok(ApiResponse::success(ALREADY_REGISTERED))
        }
        Err(e) => {
            log_error(REGISTER, &e);
            Err(e.into())
        }
    }
}

#[instrument(skip(state, body))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>, // JSON body
) -> Result<(HeaderMap, ApiResponse<&'static str>), AppError> {
    // 1. Controllare i parametri obbligatori (username, password)
    // 2. Decodificare la password offuscata
    // 3. Cercare l'utente tramite username e verificare l'hash, altrimenti UNAUTHORIZED
    // 4. Generare il token JWT con userId e role
    // 5. Installare il token nel cookie HttpOnly e ritornare successo
    let body = read_body(body)?;

    if let Some(missing) = missing_params(&body, &["username", "password"]) {
        debug!("Missing login parameters: {}", missing);
        return Err(AppError::missing_param(&missing));
    }

    let username = text_param(&body, "username").unwrap_or_default();
    let password = text_param(&body, "password")
        .as_deref()
        .and_then(decode_string);

    let user = state
        .user
        .find_by_username(&username)
        .await
        .map_err(logged(LOGIN))?;

    let Some(user) = user.filter(|u| password.as_deref().is_some_and(|p| u.verify_password(p)))
    else {
        warn!("Invalid credentials for username {}", username);
        return Err(AppError::unauthorized("Invalid credentials"));
    };

    let token = encode_jwt(user.id, &user.role, &state.jwt_secret, state.jwt_expiry_hours)
        .map_err(logged(LOGIN))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&state.cookie.issue(&token)).map_err(logged(LOGIN))?,
    );

    info!("User {} logged in", user.id);
    Ok((headers, ApiResponse::success("Login successful")))
}

/// Cancella il cookie di sessione lato client
pub async fn logout_user(
    State(state): State<Arc<AppState>>,
) -> Result<(HeaderMap, ApiResponse<&'static str>), AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&state.cookie.clear())?,
    );
    Ok((headers, ApiResponse::success("Logout successful")))
}
