// handlers/protected/leads/delete.rs - GET|POST /leads/:id/delete

use axum::{
    extract::{Path, State},
    response::Redirect,
    Extension,
};
use serde_json::{json, Value};

use super::{lead_id, scoped_lead, LEADS_PATH};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Identity};
use crate::policy::LeadAction;

/// Confirmation context
pub async fn delete_get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    identity.require(state.config.access_mode, LeadAction::Manage)?;

    let id = lead_id(&id)?;
    let lead = scoped_lead(&state, &identity, &identity.policy.manageable_leads(), id).await?;

    Ok(ApiResponse::success(json!({ "lead": lead })))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Redirect, ApiError> {
    identity.require(state.config.access_mode, LeadAction::Manage)?;

    let id = lead_id(&id)?;
    let filter = identity.policy.manageable_leads();
    // Resolve first so an out-of-scope id is a logged 404
    scoped_lead(&state, &identity, &filter, id).await?;
    state.store.delete_lead(&filter, id).await?;

    tracing::info!("Lead {} deleted by '{}'", id, identity.username);

    Ok(Redirect::to(LEADS_PATH))
}
