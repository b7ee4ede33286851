use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Identifiable;

/// A todo list. Sharing goes through `list_collaborators (list_id, user_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TodoList {
    pub id: Uuid,
    pub owner: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identifiable for TodoList {
    fn id(&self) -> Uuid {
        self.id
    }
}
