use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_organiser: bool,
    pub is_agent: bool,
    pub organization_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Account fields supplied at signup or agent creation. The organization is
/// assigned by the store operation that inserts the row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn into_user(self, organization_id: Uuid, is_organiser: bool) -> User {
        User {
            id: Uuid::new_v4(),
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            password_hash: self.password_hash,
            is_organiser,
            is_agent: !is_organiser,
            organization_id,
            created_at: Utc::now(),
        }
    }
}
