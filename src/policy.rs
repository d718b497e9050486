// Role-based visibility for leads.
//
// A request's identity is resolved once into a `Policy`; every lead query the
// handlers issue is built from it, so no handler filters by hand.

use uuid::Uuid;

use crate::config::AccessMode;
use crate::filter::LeadFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Sees every lead of the organization
    Organiser { organization_id: Uuid },
    /// Sees only leads assigned to its own agent row
    Agent { organization_id: Uuid, agent_id: Uuid },
}

/// What a handler is about to do with leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadAction {
    View,
    Manage,
}

impl Policy {
    pub fn organization_id(&self) -> Uuid {
        match self {
            Policy::Organiser { organization_id } | Policy::Agent { organization_id, .. } => *organization_id,
        }
    }

    pub fn is_organiser(&self) -> bool {
        matches!(self, Policy::Organiser { .. })
    }

    pub fn permits(&self, mode: AccessMode, action: LeadAction) -> bool {
        match (action, mode) {
            (LeadAction::View, _) => true,
            (LeadAction::Manage, AccessMode::Open) => true,
            (LeadAction::Manage, AccessMode::Protected) => self.is_organiser(),
        }
    }

    /// Leads a single-record page may show
    pub fn visible_leads(&self) -> LeadFilter {
        match self {
            Policy::Organiser { organization_id } => LeadFilter::new().organization(*organization_id),
            Policy::Agent { organization_id, agent_id } => {
                LeadFilter::new().organization(*organization_id).agent(*agent_id)
            }
        }
    }

    /// The main collection of the lead list: assigned leads only
    pub fn assigned_leads(&self) -> LeadFilter {
        match self {
            Policy::Organiser { organization_id } => LeadFilter::new().organization(*organization_id).assigned(),
            Policy::Agent { organization_id, agent_id } => LeadFilter::new()
                .organization(*organization_id)
                .assigned()
                .agent(*agent_id),
        }
    }

    /// The side collection of the lead list, shown to organisers only
    pub fn unassigned_leads(&self) -> Option<LeadFilter> {
        match self {
            Policy::Organiser { organization_id } => {
                Some(LeadFilter::new().organization(*organization_id).unassigned())
            }
            Policy::Agent { .. } => None,
        }
    }

    /// Leads that update and delete may touch
    pub fn manageable_leads(&self) -> LeadFilter {
        LeadFilter::new().organization(self.organization_id())
    }
}
