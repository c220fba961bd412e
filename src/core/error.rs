use crate::core::response::{Envelope, defaults};
use axum::{
    Json,
    http::{StatusCode, header::InvalidHeaderValue},
    response::IntoResponse,
};
use serde_json::{Map, Value};
use std::fmt;

/// Errore applicativo: viene sempre serializzato come envelope con `error = 1`
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    details: Option<Value>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<Value>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    // Common error constructors
    pub fn not_found(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: &str) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn method_not_allowed(message: &str) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, message)
    }

    /// 400 con messaggio fisso "Validation error" e il dettaglio dei campi
    pub fn validation_error(details: impl Into<Value>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, defaults::VALIDATION).with_details(details)
    }

    /// 400 per parametri obbligatori assenti, `names` è già la lista separata da virgole
    pub fn missing_param(names: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            format!("Missing required parameter: {}", names),
        )
    }

    pub fn server_error(err: impl fmt::Display) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, defaults::SERVER_ERROR)
            .with_details(err.to_string())
    }

    pub fn custom_error(status: StatusCode, message: &str) -> Self {
        Self::new(status, message)
    }

    pub fn timeout(message: &str) -> Self {
        Self::new(StatusCode::REQUEST_TIMEOUT, message)
    }

    pub fn unprocessable_entity(message: &str) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn too_many_requests(message: &str) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found(defaults::NOT_FOUND),

            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::custom_error(StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
            }

            other => Self::server_error(other),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::server_error(err)
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::server_error(err)
    }
}

impl From<InvalidHeaderValue> for AppError {
    fn from(err: InvalidHeaderValue) -> Self {
        Self::server_error(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        // un solo messaggio per campo, il primo dichiarato
        let fields: Map<String, Value> = err
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let message = errors
                    .first()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => e.code.to_string(),
                    })
                    .unwrap_or_default();
                (field.to_string(), Value::String(message))
            })
            .collect();
        Self::validation_error(Value::Object(fields))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(Envelope::failure(self.message, self.details));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_param_lists_names() {
        let err = AppError::missing_param("firstname, role");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Missing required parameter: firstname, role");
        assert!(err.details().is_none());
    }

    #[test]
    fn server_error_keeps_cause_in_details() {
        let err = AppError::server_error("disk full");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Internal server error");
        assert_eq!(err.details(), Some(&json!("disk full")));
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Data not found");
    }
}
