//! User DTOs - Data Transfer Objects per utenti

use serde::{Deserialize, Serialize};

/// DTO per creare un nuovo utente (senza id), la password è già hashata
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateUserDTO {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub password: String,
    pub role: String,
}
