use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Identifiable;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Identifiable for User {
    fn id(&self) -> Uuid {
        self.id
    }
}
