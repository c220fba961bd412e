//! Response envelope - Forma uniforme di tutte le risposte HTTP
//!
//! Ogni handler risponde con lo stesso oggetto JSON:
//! `{ error, errorMessage, data, processed, message?, details? }`.
//! Le risposte di successo si costruiscono con [`ApiResponse`], quelle di errore con
//! [`crate::core::AppError`], che usa lo stesso [`Envelope`] in serializzazione.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

/// Messaggi di default usati quando il chiamante non ne specifica uno
pub mod defaults {
    pub const CREATED: &str = "Successfully created.";
    pub const UPDATED: &str = "Successfully updated.";
    pub const ACCEPTED: &str = "Request accepted for processing";
    pub const NOT_FOUND: &str = "Data not found";
    pub const UNAUTHORIZED: &str = "Unauthorized access";
    pub const FORBIDDEN: &str = "Forbidden access";
    pub const METHOD_NOT_ALLOWED: &str = "Method Not Allowed";
    pub const VALIDATION: &str = "Validation error";
    pub const SERVER_ERROR: &str = "Internal server error";
    pub const TIMEOUT: &str = "Request Timeout: The server timed out waiting for the request";
    pub const UNPROCESSABLE: &str = "Unprocessable Entity";
    pub const TOO_MANY_REQUESTS: &str = "Too many requests, please try again later.";
}

/// Corpo JSON comune a tutte le risposte
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T: Serialize> {
    /// 0 per le risposte di successo, 1 per gli errori
    pub error: u8,
    pub error_message: String,
    pub data: Option<T>,
    pub processed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: Option<T>, processed: bool, message: Option<String>) -> Self {
        Self {
            error: 0,
            error_message: String::new(),
            data,
            processed,
            message,
            details: None,
        }
    }
}

impl Envelope<Value> {
    pub fn failure(error_message: String, details: Option<Value>) -> Self {
        Self {
            error: 1,
            error_message,
            data: None,
            processed: false,
            message: None,
            details,
        }
    }
}

/// Risposta di successo con status code e payload
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    status: StatusCode,
    envelope: Envelope<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK con `data`
    pub fn success(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            envelope: Envelope::ok(Some(data), true, None),
        }
    }

    /// 201 Created con `data` e messaggio di conferma
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            envelope: Envelope::ok(Some(data), true, Some(defaults::CREATED.to_string())),
        }
    }

    /// 200 OK con `data` e messaggio di aggiornamento
    pub fn updated(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            envelope: Envelope::ok(Some(data), true, Some(defaults::UPDATED.to_string())),
        }
    }
}

impl ApiResponse<()> {
    /// 202 Accepted: nessun dato, la richiesta non è ancora stata processata
    pub fn accepted(message: Option<&str>) -> Self {
        Self {
            status: StatusCode::ACCEPTED,
            envelope: Envelope::ok(
                None,
                false,
                Some(message.unwrap_or(defaults::ACCEPTED).to_string()),
            ),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match serde_json::to_value(&self.envelope) {
            Ok(body) => (self.status, Json(body)).into_response(),
            Err(e) => {
                error!("Failed to serialize response data: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(Envelope::failure(
                        defaults::SERVER_ERROR.to_string(),
                        Some(Value::String(e.to_string())),
                    )),
                )
                    .into_response()
            }
        }
    }
}
