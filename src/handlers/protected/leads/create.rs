// handlers/protected/leads/create.rs - GET|POST /leads/create

use axum::{extract::State, response::Redirect, Extension, Form};
use serde_json::{json, Value};

use super::{form_context, organization_agents, LEADS_PATH};
use crate::app::AppState;
use crate::database::models::Lead;
use crate::error::ApiError;
use crate::forms::LeadForm;
use crate::middleware::{ApiResponse, ApiResult, Identity};
use crate::notify::Notice;
use crate::policy::LeadAction;

/// GET /leads/create - form context with the organization's agents as choices
pub async fn create_get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Value> {
    identity.require(state.config.access_mode, LeadAction::Manage)?;

    let agents = organization_agents(&state, &identity).await?;

    Ok(ApiResponse::success(json!({ "form": form_context(&agents) })))
}

/**
 * POST /leads/create - persist a lead in the caller's organization
 *
 * Sends one lead-created notification once the row is stored. A failed send
 * is logged; the lead stays created and the request still redirects.
 */
pub async fn create_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Form(form): Form<LeadForm>,
) -> Result<Redirect, ApiError> {
    identity.require(state.config.access_mode, LeadAction::Manage)?;

    let agents = organization_agents(&state, &identity).await?;
    let fields = form.validate(&agents)?;

    let lead = state
        .store
        .insert_lead(Lead::new(identity.organization_id(), fields))
        .await?;

    tracing::info!(
        "Lead {} created by '{}' (assigned: {})",
        lead.id,
        identity.username,
        lead.is_assigned()
    );

    let notify = &state.config.notify;
    if notify.enabled {
        if let Err(e) = state.notifier.send(&Notice::lead_created(notify)).await {
            tracing::error!("Lead {} created but notification failed: {}", lead.id, e);
        }
    }

    Ok(Redirect::to(LEADS_PATH))
}
