use crate::core::{AppError, AppState};
use axum::extract::State;
use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, Response, header},
    middleware::Next,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Nome del cookie che trasporta il token di sessione
pub const TOKEN_COOKIE: &str = "token";

// struct che codifica il contenuto del token jwt
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub role: String,
    pub iat: usize, // Issued at time of the token
    pub exp: usize, // Expiry time of the token
}

/// Identità autenticata, inserita nelle extensions della richiesta dal middleware
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            role: claims.role,
        }
    }
}

#[instrument(skip(secret), fields(user_id = %user_id, role = %role))]
pub fn encode_jwt(
    user_id: i64,
    role: &str,
    secret: &str,
    expiry_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    debug!("Encoding JWT token for user");
    let now = Utc::now();
    let claims = Claims {
        user_id,
        role: role.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(expiry_hours)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .inspect(|_| info!("JWT token encoded successfully"))
    .inspect_err(|e| error!("Failed to encode JWT token: {:?}", e))
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(
    jwt_token: &str,
    secret: &str,
) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
    debug!("Decoding JWT token");
    decode::<Claims>(
        jwt_token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .inspect(|data| debug!("JWT token decoded for user {}", data.claims.user_id))
}

/// Estrae il valore di un cookie dall'header `Cookie`.
///
/// Le coppie sono separate da `;` e divise sul primo `=`; a parità di nome vince
/// l'ultima occorrenza. Un valore vuoto equivale a cookie assente.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(key, _)| *key == name)
        .last()
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Token da `Authorization: Bearer <jwt>`, usato quando manca il cookie
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Attributi del cookie di sessione emesso al login
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub domain: Option<String>,
    pub secure: bool,
    pub max_age_secs: i64,
}

impl SessionCookie {
    /// Valore dell'header Set-Cookie che installa il token
    pub fn issue(&self, token: &str) -> String {
        self.build(token, self.max_age_secs)
    }

    /// Valore dell'header Set-Cookie che cancella il token lato client
    pub fn clear(&self) -> String {
        self.build("", 0)
    }

    fn build(&self, value: &str, max_age: i64) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            TOKEN_COOKIE, value, max_age
        );
        if let Some(domain) = &self.domain {
            cookie.push_str(&format!("; Domain={}", domain));
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Auth guard: richiede un token valido nel cookie `token`
#[instrument(skip(state, req, next), fields(path = %req.uri().path()))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let token = extract_cookie(req.headers(), TOKEN_COOKIE)
        .or_else(|| bearer_token(req.headers()))
        .ok_or_else(|| {
            warn!("Missing session token");
            AppError::unauthorized("Access denied")
        })?;

    let token_data = decode_jwt(&token, &state.jwt_secret).map_err(|e| {
        crate::utils::log_error("auth middleware", &e);
        AppError::unauthorized("Invalid token")
    })?;

    info!("User authenticated: {}", token_data.claims.user_id);
    req.extensions_mut().insert(AuthUser::from(token_data.claims));
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret";

    fn headers_with_cookie(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(raw).unwrap());
        headers
    }

    #[test]
    fn extract_cookie_finds_token_among_others() {
        let headers = headers_with_cookie("theme=dark; token=abc.def.ghi ; lang=it");
        assert_eq!(
            extract_cookie(&headers, "token").as_deref(),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn extract_cookie_ignores_empty_and_missing() {
        assert_eq!(extract_cookie(&headers_with_cookie("token="), "token"), None);
        assert_eq!(extract_cookie(&headers_with_cookie("a=1; b=2"), "token"), None);
        assert_eq!(extract_cookie(&HeaderMap::new(), "token"), None);
    }

    #[test]
    fn extract_cookie_last_occurrence_wins() {
        let headers = headers_with_cookie("token=old; token=new");
        assert_eq!(extract_cookie(&headers, "token").as_deref(), Some("new"));
    }

    #[test]
    fn bearer_token_requires_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("xyz"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn jwt_round_trip_keeps_claims() {
        let token = encode_jwt(42, "admin", SECRET, 24).unwrap();
        let data = decode_jwt(&token, SECRET).unwrap();
        assert_eq!(data.claims.user_id, 42);
        assert_eq!(data.claims.role, "admin");
        assert!(data.claims.exp > data.claims.iat);
    }

    #[test]
    fn jwt_with_wrong_secret_is_rejected() {
        let token = encode_jwt(1, "user", SECRET, 24).unwrap();
        assert!(decode_jwt(&token, "another-secret").is_err());
    }

    #[test]
    fn expired_jwt_is_rejected() {
        let token = encode_jwt(1, "user", SECRET, -2).unwrap();
        assert!(decode_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = SessionCookie {
            domain: Some("localhost".to_string()),
            secure: false,
            max_age_secs: 86_400,
        };
        assert_eq!(
            cookie.issue("jwt"),
            "token=jwt; HttpOnly; SameSite=Lax; Path=/; Max-Age=86400; Domain=localhost"
        );
        assert!(cookie.clear().starts_with("token=; "));
        assert!(cookie.clear().contains("Max-Age=0"));

        let secure = SessionCookie {
            domain: None,
            secure: true,
            max_age_secs: 60,
        };
        assert!(secure.issue("jwt").ends_with("; Secure"));
    }
}
