//! Helper di logging per gli handler
//!
//! Ogni evento riporta il nome della funzione/route (es. `post_/api/products`)
//! nel campo `function`, così gli errori sono filtrabili per endpoint.

use std::fmt::Display;
use tracing::{error, info};

pub fn log_error(function_name: &str, err: &dyn Display) {
    error!(function = function_name, error = %err, "Request failed");
}

pub fn log_info(function_name: &str, message: &dyn Display) {
    info!(function = function_name, "{}", message);
}

/// Da usare con `map_err`: logga l'errore e lo restituisce invariato
pub fn logged<E: Display>(function_name: &'static str) -> impl FnOnce(E) -> E {
    move |err| {
        log_error(function_name, &err);
        err
    }
}
