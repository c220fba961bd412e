//! Product DTOs - Data Transfer Objects per prodotti

use crate::core::AppError;
use crate::entities::Product;
use crate::utils::text_param;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use validator::Validate;

pub const INVALID_PRICE: &str = "Price must be a valid non-negative number (integer or float).";

/// Forma pubblica di un prodotto
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProductDTO {
    pub id: i64,
    #[serde(rename = "productName")]
    pub product_name: String,
    pub price: f64,
    pub category: String,
    pub detail: String,
}

impl From<Product> for ProductDTO {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            product_name: value.name,
            price: value.price,
            category: value.category,
            detail: value.description,
        }
    }
}

/// DTO per creare un nuovo prodotto (senza id)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateProductDTO {
    pub name: String,

    #[validate(range(
        exclusive_min = 0.0,
        message = "Price must be a valid non-negative number (integer or float)."
    ))]
    pub price: f64,

    pub category: String,
    pub description: String,
}

impl CreateProductDTO {
    /// Costruisce il DTO dal body, i parametri obbligatori sono già stati controllati.
    /// `detail` diventa la descrizione, vuota se assente.
    pub fn from_body(body: &Value) -> Result<Self, AppError> {
        let price = body
            .get("price")
            .and_then(Value::as_f64)
            .ok_or_else(|| AppError::validation_error(json!({ "price": INVALID_PRICE })))?;

        let name = text_param(body, "name")
            .ok_or_else(|| AppError::validation_error(json!({ "name": "Name must be a string." })))?;

        let category = text_param(body, "category").ok_or_else(|| {
            AppError::validation_error(json!({ "category": "Category must be a string." }))
        })?;

        let dto = Self {
            name,
            price,
            category,
            description: text_param(body, "detail").unwrap_or_default(),
        };
        dto.validate()?;
        Ok(dto)
    }
}

/// DTO per aggiornare un prodotto (solo i campi `Some(_)` vengono modificati)
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UpdateProductDTO {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl UpdateProductDTO {
    /// Aggiornamento parziale: nome e categoria solo se non vuoti, prezzo solo se valido
    /// (altrimenti ignorato), descrizione se `detail` è presente nel body, anche nullo.
    pub fn from_body(body: &Value) -> Self {
        let non_empty = |field: &str| text_param(body, field).filter(|s| !s.is_empty());

        Self {
            name: non_empty("name"),
            price: body
                .get("price")
                .and_then(Value::as_f64)
                .filter(|p| p.is_finite() && *p > 0.0),
            category: non_empty("category"),
            description: body
                .get("detail")
                .map(|_| text_param(body, "detail").unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn create_from_body_defaults_description() {
        let dto = CreateProductDTO::from_body(&json!({
            "name": "Moka", "price": 24.5, "category": "kitchen"
        }))
        .unwrap();
        assert_eq!(dto.name, "Moka");
        assert_eq!(dto.price, 24.5);
        assert_eq!(dto.description, "");
    }

    #[test]
    fn create_rejects_negative_or_textual_price() {
        for price in [json!(-3), json!("10")] {
            let err = CreateProductDTO::from_body(&json!({
                "name": "Moka", "price": price, "category": "kitchen"
            }))
            .unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
            assert_eq!(err.details(), Some(&json!({ "price": INVALID_PRICE })));
        }
    }

    #[test]
    fn update_ignores_invalid_price_and_empty_fields() {
        let dto = UpdateProductDTO::from_body(&json!({
            "name": "", "price": -1, "category": "bar"
        }));
        assert_eq!(
            dto,
            UpdateProductDTO {
                category: Some("bar".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn update_null_detail_clears_description() {
        let dto = UpdateProductDTO::from_body(&json!({ "detail": null }));
        assert_eq!(dto.description.as_deref(), Some(""));

        let dto = UpdateProductDTO::from_body(&json!({}));
        assert_eq!(dto.description, None);
    }

    #[test]
    fn public_shape_renames_fields() {
        let dto = ProductDTO {
            id: 7,
            product_name: "Moka".to_string(),
            price: 24.5,
            category: "kitchen".to_string(),
            detail: String::new(),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["productName"], "Moka");
        assert_eq!(json["detail"], "");
    }
}
