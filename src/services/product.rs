//! Product services - CRUD del catalogo prodotti
//!
//! Lettura pubblica, scrittura protetta dall'auth guard.

use crate::core::{ApiResponse, AppError, AppState, AuthUser};
use crate::dtos::{CreateProductDTO, ProductDTO, UpdateProductDTO};
use crate::entities::Product;
use crate::repositories::{Create, Delete, Read, Update};
use crate::utils::{log_error, log_info, logged, missing_params, read_body};
use axum::{
    Extension,
    extract::{Json, Path, State, rejection::JsonRejection},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const LIST: &str = "get_/api/products";
const CREATE: &str = "post_/api/products";
const GET: &str = "get_/api/products/:id";
const UPDATE: &str = "put_/api/products/:id";
const DELETE: &str = "delete_/api/products/:id";

/// Gli id sono interi positivi assegnati dal database
fn parse_product_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            debug!("Invalid product id: {}", raw);
            AppError::validation_error("Invalid product ID")
        })
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<Vec<ProductDTO>>, AppError> {
    let products = state.product.list().await.map_err(logged(LIST))?;
    info!("Found {} products", products.len());
    Ok(ApiResponse::success(
        products.into_iter().map(ProductDTO::from).collect(),
    ))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>, // ottenuto dall'auth guard
    body: Result<Json<Value>, JsonRejection>,
) -> Result<ApiResponse<Product>, AppError> {
    // 1. Controllare i parametri obbligatori (name, price, category)
    // 2. Validare il prezzo: numero JSON strettamente positivo
    // 3. Salvare il prodotto, detail diventa la descrizione (vuota se assente)
    // 4. Ritornare 201 con il record salvato
    let body = read_body(body)?;

    if let Some(missing) = missing_params(&body, &["name", "price", "category"]) {
        debug!("Missing product parameters: {}", missing);
        return Err(AppError::missing_param(&missing));
    }

    let new_product = CreateProductDTO::from_body(&body)?;
    let product = state
        .product
        .create(&new_product)
        .await
        .map_err(logged(CREATE))?;

    log_info(CREATE, &format_args!("product {} created", product.id));
    Ok(ApiResponse::created(product))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>, // parametro dalla URL /api/products/{id}
) -> Result<ApiResponse<ProductDTO>, AppError> {
    let id = parse_product_id(&id)?;

    match state.product.read(&id).await.map_err(logged(GET))? {
        Some(product) => Ok(ApiResponse::success(ProductDTO::from(product))),
        None => {
            warn!("Product {} not found", id);
            Err(AppError::not_found("Product not found"))
        }
    }
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<ApiResponse<ProductDTO>, AppError> {
    // 1. Validare l'id
    // 2. Raccogliere i soli campi validi del body (aggiornamento parziale)
    // 3. Aggiornare, se il prodotto non esiste ritornare NOT_FOUND
    let id = parse_product_id(&id)?;
    let body = read_body(body)?;
    let changes = UpdateProductDTO::from_body(&body);

    match state.product.update(&id, &changes).await {
        Ok(product) => {
            info!("Product {} updated", id);
            Ok(ApiResponse::success(ProductDTO::from(product)))
        }
        Err(sqlx::Error::RowNotFound) => {
            warn!("Product {} not found", id);
            Err(AppError::not_found("Product not found"))
        }
        Err(e) => {
            log_error(UPDATE, &e);
            Err(e.into())
        }
    }
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<ApiResponse<&'static str>, AppError> {
    let id = parse_product_id(&id)?;

    if state.product.delete(&id).await.map_err(logged(DELETE))? {
        info!("Product {} deleted", id);
        Ok(ApiResponse::success("Product deleted successfully"))
    } else {
        warn!("Nothing to delete for product {}", id);
        Ok(ApiResponse::success("Product deleted failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn product_id_must_be_positive_integer() {
        assert_eq!(parse_product_id("12").unwrap(), 12);
        for raw in ["0", "-4", "abc", "65f1c0ffee", ""] {
            let err = parse_product_id(raw).unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
            assert_eq!(err.details(), Some(&Value::from("Invalid product ID")));
        }
    }
}
