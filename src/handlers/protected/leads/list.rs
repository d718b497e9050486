// handlers/protected/leads/list.rs - GET /leads

use axum::{extract::State, Extension};
use serde::Serialize;

use crate::app::AppState;
use crate::database::models::Lead;
use crate::middleware::{ApiResponse, ApiResult, Identity};
use crate::policy::LeadAction;

#[derive(Debug, Serialize)]
pub struct LeadList {
    pub leads: Vec<Lead>,
    /// Organisers only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unassigned_leads: Option<Vec<Lead>>,
}

pub async fn list_get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<LeadList> {
    identity.require(state.config.access_mode, LeadAction::View)?;

    let leads = state.store.list_leads(&identity.policy.assigned_leads()).await?;

    let unassigned_leads = match identity.policy.unassigned_leads() {
        Some(filter) => Some(state.store.list_leads(&filter).await?),
        None => None,
    };

    Ok(ApiResponse::success(LeadList {
        leads,
        unassigned_leads,
    }))
}
