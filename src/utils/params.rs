//! Controllo dei parametri del body JSON

use crate::core::AppError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use serde_json::{Map, Value};
use tracing::warn;

/// Un valore "falsy" conta come parametro mancante: null, false, 0, NaN, stringa vuota
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0 || f.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Ritorna i nomi dei parametri mancanti separati da `", "`, nell'ordine dato
pub fn missing_params(body: &Value, names: &[&str]) -> Option<String> {
    let missing: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| body.get(*name).is_none_or(is_falsy))
        .collect();

    if missing.is_empty() {
        None
    } else {
        Some(missing.join(", "))
    }
}

/// Legge un parametro scalare come testo: stringhe, numeri e booleani
pub fn text_param(body: &Value, name: &str) -> Option<String> {
    match body.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Normalizza il body della richiesta.
///
/// Un body assente o non JSON-object vale come oggetto vuoto, così i controlli sui
/// parametri rispondono con l'elenco dei mancanti. Un JSON malformato è un 400.
pub fn read_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    match body {
        Ok(Json(value @ Value::Object(_))) => Ok(value),
        Ok(_) | Err(JsonRejection::MissingJsonContentType(_)) => Ok(Value::Object(Map::new())),
        Err(rejection) => {
            warn!("Rejected request body: {}", rejection.body_text());
            Err(AppError::validation_error(rejection.body_text()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values() {
        assert!(is_falsy(&json!(null)));
        assert!(is_falsy(&json!(false)));
        assert!(is_falsy(&json!(0)));
        assert!(is_falsy(&json!(0.0)));
        assert!(is_falsy(&json!("")));
        assert!(!is_falsy(&json!("0")));
        assert!(!is_falsy(&json!(-1)));
        assert!(!is_falsy(&json!([])));
        assert!(!is_falsy(&json!({})));
    }

    #[test]
    fn missing_params_keeps_requested_order() {
        let body = json!({"username": "mario", "role": "", "price": 0});
        assert_eq!(
            missing_params(&body, &["firstname", "username", "password", "role"]).as_deref(),
            Some("firstname, password, role")
        );
        assert_eq!(missing_params(&body, &["username"]), None);
        assert_eq!(missing_params(&body, &["price"]).as_deref(), Some("price"));
    }

    #[test]
    fn text_param_accepts_scalars_only() {
        let body = json!({"a": "x", "b": 12, "c": true, "d": {"k": 1}, "e": null});
        assert_eq!(text_param(&body, "a").as_deref(), Some("x"));
        assert_eq!(text_param(&body, "b").as_deref(), Some("12"));
        assert_eq!(text_param(&body, "c").as_deref(), Some("true"));
        assert_eq!(text_param(&body, "d"), None);
        assert_eq!(text_param(&body, "e"), None);
        assert_eq!(text_param(&body, "missing"), None);
    }

    #[test]
    fn non_object_body_reads_as_empty() {
        let body = read_body(Ok(Json(json!([1, 2])))).unwrap();
        assert_eq!(body, json!({}));
    }
}
