use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Agent, AgentProfile, Lead, LeadFields, NewUser, Organization, User};
use crate::database::store::{LeadStore, StoreError};
use crate::filter::LeadFilter;

#[derive(Default)]
struct Tables {
    organizations: Vec<Organization>,
    users: Vec<User>,
    agents: Vec<Agent>,
    leads: Vec<Lead>,
}

/// Process-local store backed by vectors, used by tests and `--memory` runs.
/// Vectors keep insertion order, which is the order every read returns.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lead_count(&self) -> usize {
        self.tables.read().await.leads.len()
    }
}

fn profile(agent: &Agent, user: &User) -> AgentProfile {
    AgentProfile {
        id: agent.id,
        user_id: user.id,
        organization_id: agent.organization_id,
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    }
}

fn ensure_unique_username(tables: &Tables, username: &str) -> Result<(), StoreError> {
    if tables.users.iter().any(|u| u.username == username) {
        return Err(StoreError::Conflict(format!("username '{}' is already taken", username)));
    }
    Ok(())
}

#[async_trait]
impl LeadStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_organiser(
        &self,
        organization_name: &str,
        user: NewUser,
    ) -> Result<(Organization, User), StoreError> {
        let mut tables = self.tables.write().await;
        ensure_unique_username(&tables, &user.username)?;

        let organization = Organization {
            id: Uuid::new_v4(),
            name: organization_name.to_string(),
            created_at: Utc::now(),
        };
        let user = user.into_user(organization.id, true);

        tables.organizations.push(organization.clone());
        tables.users.push(user.clone());
        Ok((organization, user))
    }

    async fn create_agent(&self, organization_id: Uuid, user: NewUser) -> Result<AgentProfile, StoreError> {
        let mut tables = self.tables.write().await;
        ensure_unique_username(&tables, &user.username)?;
        if !tables.organizations.iter().any(|o| o.id == organization_id) {
            return Err(StoreError::NotFound("Organization"));
        }

        let user = user.into_user(organization_id, false);
        let agent = Agent {
            id: Uuid::new_v4(),
            user_id: user.id,
            organization_id,
            created_at: Utc::now(),
        };
        let result = profile(&agent, &user);

        tables.users.push(user);
        tables.agents.push(agent);
        Ok(result)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_agent_by_user(&self, user_id: Uuid) -> Result<Option<Agent>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.agents.iter().find(|a| a.user_id == user_id).cloned())
    }

    async fn list_agents(&self, organization_id: Uuid) -> Result<Vec<AgentProfile>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .agents
            .iter()
            .filter(|a| a.organization_id == organization_id)
            .filter_map(|a| {
                tables
                    .users
                    .iter()
                    .find(|u| u.id == a.user_id)
                    .map(|u| profile(a, u))
            })
            .collect())
    }

    async fn list_leads(&self, filter: &LeadFilter) -> Result<Vec<Lead>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.leads.iter().filter(|l| filter.matches(l)).cloned().collect())
    }

    async fn get_lead(&self, filter: &LeadFilter, id: Uuid) -> Result<Lead, StoreError> {
        let tables = self.tables.read().await;
        tables
            .leads
            .iter()
            .find(|l| l.id == id && filter.matches(l))
            .cloned()
            .ok_or(StoreError::NotFound("Lead"))
    }

    async fn insert_lead(&self, lead: Lead) -> Result<Lead, StoreError> {
        let mut tables = self.tables.write().await;
        tables.leads.push(lead.clone());
        Ok(lead)
    }

    async fn update_lead(&self, filter: &LeadFilter, id: Uuid, fields: LeadFields) -> Result<Lead, StoreError> {
        let mut tables = self.tables.write().await;
        let lead = tables
            .leads
            .iter_mut()
            .find(|l| l.id == id && filter.matches(l))
            .ok_or(StoreError::NotFound("Lead"))?;
        lead.apply(fields);
        Ok(lead.clone())
    }

    async fn delete_lead(&self, filter: &LeadFilter, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let position = tables
            .leads
            .iter()
            .position(|l| l.id == id && filter.matches(l))
            .ok_or(StoreError::NotFound("Lead"))?;
        tables.leads.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: String::new(),
        }
    }

    fn fields(agent_id: Option<Uuid>) -> LeadFields {
        LeadFields {
            agent_id,
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            age: 45,
            email: "grace@example.com".to_string(),
            phone_number: "555-0100".to_string(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let store = MemoryStore::new();
        store.create_organiser("Acme", new_user("boss")).await.unwrap();
        let err = store.create_organiser("Other", new_user("boss")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn agents_are_listed_per_organization() {
        let store = MemoryStore::new();
        let (acme, _) = store.create_organiser("Acme", new_user("boss")).await.unwrap();
        let (globex, _) = store.create_organiser("Globex", new_user("hank")).await.unwrap();
        store.create_agent(acme.id, new_user("alice")).await.unwrap();
        store.create_agent(globex.id, new_user("bob")).await.unwrap();

        let agents = store.list_agents(acme.id).await.unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].username, "alice");

        let alice = store.find_user_by_username("alice").await.unwrap().unwrap();
        assert!(alice.is_agent);
        assert!(!alice.is_organiser);
        assert_eq!(store.find_agent_by_user(alice.id).await.unwrap().unwrap().id, agents[0].id);
    }

    #[tokio::test]
    async fn mutations_respect_the_filter() {
        let store = MemoryStore::new();
        let org = Uuid::new_v4();
        let lead = store.insert_lead(Lead::new(org, fields(None))).await.unwrap();

        let foreign = LeadFilter::new().organization(Uuid::new_v4());
        assert!(matches!(
            store.update_lead(&foreign, lead.id, fields(None)).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete_lead(&foreign, lead.id).await, Err(StoreError::NotFound(_))));
        assert_eq!(store.lead_count().await, 1);

        let own = LeadFilter::new().organization(org);
        store.delete_lead(&own, lead.id).await.unwrap();
        assert_eq!(store.lead_count().await, 0);
    }
}
