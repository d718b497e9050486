// handlers/protected/leads/mod.rs - Lead pages
//
// GET  /leads              list (assigned, plus unassigned for organisers)
// GET  /leads/:id          detail
// GET  /leads/create       form context     POST  create + notify
// GET  /leads/:id/update   form context     POST  replace fields
// GET  /leads/:id/delete   confirmation     POST  delete
//
// Create, update and delete are gated by the configured access mode.

use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::{AgentProfile, Lead};
use crate::database::StoreError;
use crate::error::ApiError;
use crate::filter::LeadFilter;
use crate::forms::LEAD_FIELDS;
use crate::middleware::Identity;

pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;

pub use create::{create_get, create_post};
pub use delete::{delete_get, delete_post};
pub use detail::detail_get;
pub use list::list_get;
pub use update::{update_get, update_post};

/// Where every lead mutation lands afterwards
pub const LEADS_PATH: &str = "/leads";

/// Lead ids arrive as raw path segments; anything that is not a UUID cannot
/// name a lead and is a 404 like any other miss.
fn lead_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        tracing::debug!("Malformed lead id '{}'", raw);
        ApiError::not_found("Lead not found")
    })
}

/// Load one lead through a policy filter; ids outside it are a 404
async fn scoped_lead(
    state: &AppState,
    identity: &Identity,
    filter: &LeadFilter,
    id: Uuid,
) -> Result<Lead, ApiError> {
    match state.store.get_lead(filter, id).await {
        Ok(lead) => Ok(lead),
        Err(StoreError::NotFound(what)) => {
            tracing::debug!("Lead {} outside the scope of '{}'", id, identity.username);
            Err(ApiError::not_found(format!("{} not found", what)))
        }
        Err(e) => Err(e.into()),
    }
}

async fn organization_agents(state: &AppState, identity: &Identity) -> Result<Vec<AgentProfile>, ApiError> {
    Ok(state.store.list_agents(identity.organization_id()).await?)
}

fn form_context(agents: &[AgentProfile]) -> Value {
    json!({
        "fields": LEAD_FIELDS,
        "agents": agents,
    })
}
