//! UserRepository - Repository per la gestione degli utenti

use super::{Create, PoolType, Read};
use crate::dtos::CreateUserDTO;
use crate::entities::User;
use chrono::Utc;
use sqlx::Error;

const USER_COLUMNS: &str =
    "id, firstname, lastname, username, password, role, created_at, updated_at";

pub struct UserRepository {
    connection_pool: PoolType,
}

impl UserRepository {
    pub fn new(connection_pool: PoolType) -> UserRepository {
        Self { connection_pool }
    }

    /// Find user by exact username match, username is unique
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        let now = Utc::now();
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (firstname, lastname, username, password, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&data.firstname)
        .bind(&data.lastname)
        .bind(&data.username)
        .bind(&data.password)
        .bind(&data.role)
        .bind(now)
        .bind(now)
        .fetch_one(&self.connection_pool)
        .await
    }
}

impl Read<User, i64> for UserRepository {
    async fn read(&self, id: &i64) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{connect_in_memory, run_migrations};

    async fn repository() -> UserRepository {
        let pool = connect_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        UserRepository::new(pool)
    }

    fn new_user(username: &str) -> CreateUserDTO {
        CreateUserDTO {
            firstname: "Mario".to_string(),
            lastname: "Rossi".to_string(),
            username: username.to_string(),
            password: "hash".to_string(),
            role: "admin".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_find_by_username() {
        let repo = repository().await;
        let created = repo.create(&new_user("mario")).await.unwrap();
        assert!(created.id > 0);

        let found = repo.find_by_username("mario").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.lastname, "Rossi");
        assert!(repo.read(&created.id).await.unwrap().is_some());
        assert!(repo.find_by_username("luigi").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_unique_violation() {
        let repo = repository().await;
        repo.create(&new_user("mario")).await.unwrap();
        let err = repo.create(&new_user("mario")).await.unwrap_err();
        match err {
            sqlx::Error::Database(db) => assert!(db.is_unique_violation()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
