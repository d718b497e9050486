use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Agent, AgentProfile, Lead, LeadFields, NewUser, Organization, User};
use crate::filter::LeadFilter;

/// Errors surfaced by any `LeadStore` backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence seam for organizations, users, agents and leads.
///
/// Lead reads and writes take a `LeadFilter`; callers build it from the
/// request's policy so every query is scoped to the caller's organization.
/// Reads return rows in insertion order.
#[async_trait]
pub trait LeadStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn ping(&self) -> Result<(), StoreError>;

    /// Create an organization together with its first organiser account.
    async fn create_organiser(
        &self,
        organization_name: &str,
        user: NewUser,
    ) -> Result<(Organization, User), StoreError>;

    /// Create an agent account and its agent row inside `organization_id`.
    async fn create_agent(&self, organization_id: Uuid, user: NewUser) -> Result<AgentProfile, StoreError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn find_agent_by_user(&self, user_id: Uuid) -> Result<Option<Agent>, StoreError>;

    async fn list_agents(&self, organization_id: Uuid) -> Result<Vec<AgentProfile>, StoreError>;

    async fn list_leads(&self, filter: &LeadFilter) -> Result<Vec<Lead>, StoreError>;

    /// First lead matching `filter` with the given id, `NotFound` otherwise.
    async fn get_lead(&self, filter: &LeadFilter, id: Uuid) -> Result<Lead, StoreError>;

    async fn insert_lead(&self, lead: Lead) -> Result<Lead, StoreError>;

    async fn update_lead(&self, filter: &LeadFilter, id: Uuid, fields: LeadFields) -> Result<Lead, StoreError>;

    async fn delete_lead(&self, filter: &LeadFilter, id: Uuid) -> Result<(), StoreError>;
}
