// handlers/protected/agents.rs - GET /agents, GET|POST /agents/create
//
// Organisers manage the agents of their own organization. These pages keep
// the organiser gate in every access mode.

use axum::{extract::State, response::Redirect, Extension, Form};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::hash_password;
use crate::error::ApiError;
use crate::forms::{AgentForm, AGENT_FIELDS};
use crate::middleware::{ApiResponse, ApiResult, Identity};

pub async fn list_get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Value> {
    identity.require_organiser()?;

    let agents = state.store.list_agents(identity.organization_id()).await?;

    Ok(ApiResponse::success(json!({ "agents": agents })))
}

pub async fn create_get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Value> {
    identity.require_organiser()?;

    Ok(ApiResponse::success(json!({
        "form": {
            "fields": AGENT_FIELDS,
            "min_password_length": state.config.security.min_password_length,
        }
    })))
}

/// Creates the agent's user account and agent row together
pub async fn create_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Form(form): Form<AgentForm>,
) -> Result<Redirect, ApiError> {
    identity.require_organiser()?;

    let mut account = form.validate(state.config.security.min_password_length)?;
    account.password_hash = hash_password(&account.password_hash)?;

    let agent = state
        .store
        .create_agent(identity.organization_id(), account)
        .await?;

    tracing::info!(
        "Agent '{}' ({}) added to organization {} by '{}'",
        agent.username,
        agent.id,
        agent.organization_id,
        identity.username
    );

    Ok(Redirect::to("/agents"))
}
