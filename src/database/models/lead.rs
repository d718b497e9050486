use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub agent_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub email: String,
    pub phone_number: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The editable part of a lead: everything a form submission may set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadFields {
    pub agent_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub email: String,
    pub phone_number: String,
    pub description: String,
}

impl Lead {
    pub fn new(organization_id: Uuid, fields: LeadFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            organization_id,
            agent_id: fields.agent_id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            age: fields.age,
            email: fields.email,
            phone_number: fields.phone_number,
            description: fields.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every editable field; organization and id never change.
    pub fn apply(&mut self, fields: LeadFields) {
        self.agent_id = fields.agent_id;
        self.first_name = fields.first_name;
        self.last_name = fields.last_name;
        self.age = fields.age;
        self.email = fields.email;
        self.phone_number = fields.phone_number;
        self.description = fields.description;
        self.updated_at = Utc::now();
    }

    pub fn is_assigned(&self) -> bool {
        self.agent_id.is_some()
    }
}
