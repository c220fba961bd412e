//! User entity - Entità utente con metodi per gestione password

use bcrypt::{hash, verify};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Verify if target_password matches the stored hashed password
    pub fn verify_password(&self, target_password: &str) -> bool {
        verify(target_password, &self.password).unwrap_or(false)
    }

    /// Hash a password using bcrypt with the configured cost
    pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
        hash(password, cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let hashed = User::hash_password("segreto", 4).unwrap();
        let user = User {
            id: 1,
            firstname: "Mario".to_string(),
            lastname: String::new(),
            username: "mario".to_string(),
            password: hashed,
            role: "admin".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(user.verify_password("segreto"));
        assert!(!user.verify_password("sbagliato"));

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none(), "la password non va mai esposta");
    }
}
