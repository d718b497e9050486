// handlers/protected/leads/detail.rs - GET /leads/:id

use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::{json, Value};

use super::{lead_id, scoped_lead};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, Identity};
use crate::policy::LeadAction;

/// Scoped like the list: organisers see their organization, agents only
/// their own assignments.
pub async fn detail_get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    identity.require(state.config.access_mode, LeadAction::View)?;

    let id = lead_id(&id)?;
    let lead = scoped_lead(&state, &identity, &identity.policy.visible_leads(), id).await?;

    Ok(ApiResponse::success(json!({ "lead": lead })))
}
