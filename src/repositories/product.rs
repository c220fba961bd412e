//! ProductRepository - Repository per la gestione dei prodotti

use super::{Create, Delete, PoolType, Read, Update};
use crate::dtos::{CreateProductDTO, UpdateProductDTO};
use crate::entities::Product;
use chrono::Utc;
use sqlx::Error;

const PRODUCT_COLUMNS: &str = "id, name, price, category, description, created_at, updated_at";

pub struct ProductRepository {
    connection_pool: PoolType,
}

impl ProductRepository {
    pub fn new(connection_pool: PoolType) -> ProductRepository {
        Self { connection_pool }
    }

    /// Tutti i prodotti, in ordine di inserimento
    pub async fn list(&self) -> Result<Vec<Product>, Error> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<Product, CreateProductDTO> for ProductRepository {
    async fn create(&self, data: &CreateProductDTO) -> Result<Product, Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, price, category, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&data.name)
        .bind(data.price)
        .bind(&data.category)
        .bind(&data.description)
        .bind(now)
        .bind(now)
        .fetch_one(&self.connection_pool)
        .await
    }
}

impl Read<Product, i64> for ProductRepository {
    async fn read(&self, id: &i64) -> Result<Option<Product>, Error> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Update<Product, UpdateProductDTO, i64> for ProductRepository {
    /// I campi `None` mantengono il valore corrente (COALESCE)
    async fn update(&self, id: &i64, data: &UpdateProductDTO) -> Result<Product, Error> {
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET
                name = COALESCE(?, name),
                price = COALESCE(?, price),
                category = COALESCE(?, category),
                description = COALESCE(?, description),
                updated_at = ?
             WHERE id = ?
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&data.name)
        .bind(data.price)
        .bind(&data.category)
        .bind(&data.description)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?
        .ok_or(Error::RowNotFound)
    }
}

impl Delete<i64> for ProductRepository {
    async fn delete(&self, id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{connect_in_memory, run_migrations};

    async fn repository() -> ProductRepository {
        let pool = connect_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        ProductRepository::new(pool)
    }

    fn moka() -> CreateProductDTO {
        CreateProductDTO {
            name: "Moka".to_string(),
            price: 24.5,
            category: "kitchen".to_string(),
            description: "Caffettiera".to_string(),
        }
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let repo = repository().await;
        let created = repo.create(&moka()).await.unwrap();

        let updated = repo
            .update(
                &created.id,
                &UpdateProductDTO {
                    price: Some(30.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price, 30.0);
        assert_eq!(updated.name, "Moka");
        assert_eq!(updated.description, "Caffettiera");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_missing_row_is_row_not_found() {
        let repo = repository().await;
        let err = repo
            .update(&99, &UpdateProductDTO::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RowNotFound));
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let repo = repository().await;
        let created = repo.create(&moka()).await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 1);

        assert!(repo.delete(&created.id).await.unwrap());
        assert!(!repo.delete(&created.id).await.unwrap());
        assert!(repo.read(&created.id).await.unwrap().is_none());
    }
}
