// handlers/protected/leads/update.rs - GET|POST /leads/:id/update

use axum::{
    extract::{Path, State},
    response::Redirect,
    Extension, Form,
};
use serde_json::{json, Value};

use super::{form_context, lead_id, organization_agents, scoped_lead, LEADS_PATH};
use crate::app::AppState;
use crate::error::ApiError;
use crate::forms::LeadForm;
use crate::middleware::{ApiResponse, ApiResult, Identity};
use crate::policy::LeadAction;

pub async fn update_get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    identity.require(state.config.access_mode, LeadAction::Manage)?;

    let id = lead_id(&id)?;
    let lead = scoped_lead(&state, &identity, &identity.policy.manageable_leads(), id).await?;
    let agents = organization_agents(&state, &identity).await?;

    Ok(ApiResponse::success(json!({
        "lead": lead,
        "form": form_context(&agents),
    })))
}

/// Replaces every editable field with the submitted values; an omitted or
/// empty `agent` leaves the lead unassigned.
pub async fn update_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Form(form): Form<LeadForm>,
) -> Result<Redirect, ApiError> {
    identity.require(state.config.access_mode, LeadAction::Manage)?;

    // Resolve the lead before reading the form so a foreign id is a 404
    let id = lead_id(&id)?;
    let filter = identity.policy.manageable_leads();
    scoped_lead(&state, &identity, &filter, id).await?;

    let agents = organization_agents(&state, &identity).await?;
    let fields = form.validate(&agents)?;

    let lead = state.store.update_lead(&filter, id, fields).await?;
    tracing::info!("Lead {} updated by '{}'", lead.id, identity.username);

    Ok(Redirect::to(LEADS_PATH))
}
