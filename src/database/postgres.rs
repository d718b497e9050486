use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Agent, AgentProfile, Lead, LeadFields, NewUser, Organization, User};
use crate::database::store::{LeadStore, StoreError};
use crate::filter::LeadFilter;

const LEAD_COLUMNS: &str = "id, organization_id, agent_id, first_name, last_name, age, email, \
                            phone_number, description, created_at, updated_at";

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, password_hash, \
                            is_organiser, is_agent, organization_id, created_at";

const AGENT_PROFILE_SELECT: &str = "SELECT a.id, a.user_id, a.organization_id, u.username, u.email, \
                                    u.first_name, u.last_name \
                                    FROM agents a JOIN users u ON u.id = a.user_id";

/// `LeadStore` over a PostgreSQL pool
#[derive(Clone)]
pub struct PgLeadStore {
    pool: PgPool,
}

impl PgLeadStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map unique-key violations onto `Conflict`; everything else stays a driver error
fn conflict_on_duplicate(err: sqlx::Error, what: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Conflict(format!("{} is already taken", what));
        }
    }
    StoreError::Sqlx(err)
}

async fn insert_user(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user: &User,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO users (id, username, email, first_name, last_name, password_hash, \
         is_organiser, is_agent, organization_id, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.password_hash)
    .bind(user.is_organiser)
    .bind(user.is_agent)
    .bind(user.organization_id)
    .bind(user.created_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| conflict_on_duplicate(e, &format!("username '{}'", user.username)))?;
    Ok(())
}

#[async_trait]
impl LeadStore for PgLeadStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn create_organiser(
        &self,
        organization_name: &str,
        user: NewUser,
    ) -> Result<(Organization, User), StoreError> {
        let mut tx = self.pool.begin().await?;

        let organization = sqlx::query_as::<_, Organization>(
            "INSERT INTO organizations (id, name, created_at) VALUES ($1, $2, $3) \
             RETURNING id, name, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(organization_name)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let user = user.into_user(organization.id, true);
        insert_user(&mut tx, &user).await?;

        tx.commit().await?;
        Ok((organization, user))
    }

    async fn create_agent(&self, organization_id: Uuid, user: NewUser) -> Result<AgentProfile, StoreError> {
        let mut tx = self.pool.begin().await?;

        let user = user.into_user(organization_id, false);
        insert_user(&mut tx, &user).await?;

        let agent_id = Uuid::new_v4();
        sqlx::query("INSERT INTO agents (id, user_id, organization_id, created_at) VALUES ($1, $2, $3, $4)")
            .bind(agent_id)
            .bind(user.id)
            .bind(organization_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(AgentProfile {
            id: agent_id,
            user_id: user.id,
            organization_id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        })
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_agent_by_user(&self, user_id: Uuid) -> Result<Option<Agent>, StoreError> {
        let agent = sqlx::query_as::<_, Agent>(
            "SELECT id, user_id, organization_id, created_at FROM agents WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(agent)
    }

    async fn list_agents(&self, organization_id: Uuid) -> Result<Vec<AgentProfile>, StoreError> {
        let sql = format!(
            "{} WHERE a.organization_id = $1 ORDER BY a.created_at, a.id",
            AGENT_PROFILE_SELECT
        );
        let agents = sqlx::query_as::<_, AgentProfile>(&sql)
            .bind(organization_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(agents)
    }

    async fn list_leads(&self, filter: &LeadFilter) -> Result<Vec<Lead>, StoreError> {
        let (where_clause, params) = filter.to_where_sql(0);
        let sql = format!(
            "SELECT {} FROM leads WHERE {} ORDER BY created_at, id",
            LEAD_COLUMNS, where_clause
        );

        let mut q = sqlx::query_as::<_, Lead>(&sql);
        for p in params {
            q = q.bind(p);
        }
        Ok(q.fetch_all(&self.pool).await?)
    }

    async fn get_lead(&self, filter: &LeadFilter, id: Uuid) -> Result<Lead, StoreError> {
        let (where_clause, params) = filter.clone().id(id).to_where_sql(0);
        let sql = format!("SELECT {} FROM leads WHERE {} LIMIT 1", LEAD_COLUMNS, where_clause);

        let mut q = sqlx::query_as::<_, Lead>(&sql);
        for p in params {
            q = q.bind(p);
        }
        q.fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("Lead"))
    }

    async fn insert_lead(&self, lead: Lead) -> Result<Lead, StoreError> {
        let sql = format!(
            "INSERT INTO leads ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {cols}",
            cols = LEAD_COLUMNS
        );
        let lead = sqlx::query_as::<_, Lead>(&sql)
            .bind(lead.id)
            .bind(lead.organization_id)
            .bind(lead.agent_id)
            .bind(&lead.first_name)
            .bind(&lead.last_name)
            .bind(lead.age)
            .bind(&lead.email)
            .bind(&lead.phone_number)
            .bind(&lead.description)
            .bind(lead.created_at)
            .bind(lead.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(lead)
    }

    async fn update_lead(&self, filter: &LeadFilter, id: Uuid, fields: LeadFields) -> Result<Lead, StoreError> {
        // $1..$8 are the new values; the filter's params follow
        let (where_clause, params) = filter.clone().id(id).to_where_sql(8);
        let sql = format!(
            "UPDATE leads SET agent_id = $1, first_name = $2, last_name = $3, age = $4, email = $5, \
             phone_number = $6, description = $7, updated_at = $8 WHERE {} RETURNING {}",
            where_clause, LEAD_COLUMNS
        );

        let mut q = sqlx::query_as::<_, Lead>(&sql)
            .bind(fields.agent_id)
            .bind(fields.first_name)
            .bind(fields.last_name)
            .bind(fields.age)
            .bind(fields.email)
            .bind(fields.phone_number)
            .bind(fields.description)
            .bind(Utc::now());
        for p in params {
            q = q.bind(p);
        }
        q.fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("Lead"))
    }

    async fn delete_lead(&self, filter: &LeadFilter, id: Uuid) -> Result<(), StoreError> {
        let (where_clause, params) = filter.clone().id(id).to_where_sql(0);
        let sql = format!("DELETE FROM leads WHERE {}", where_clause);

        let mut q = sqlx::query(&sql);
        for p in params {
            q = q.bind(p);
        }
        let result = q.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Lead"));
        }
        Ok(())
    }
}
