use sqlx::PgPool;
use tracing::debug;

use crate::database::store::StoreError;

/// Idempotent DDL, applied in order at startup.
const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS organizations (
        id          UUID PRIMARY KEY,
        name        TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id               UUID PRIMARY KEY,
        username         TEXT NOT NULL UNIQUE,
        email            TEXT NOT NULL,
        first_name       TEXT NOT NULL DEFAULT '',
        last_name        TEXT NOT NULL DEFAULT '',
        password_hash    TEXT NOT NULL,
        is_organiser     BOOLEAN NOT NULL DEFAULT true,
        is_agent         BOOLEAN NOT NULL DEFAULT false,
        organization_id  UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
        created_at       TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS agents (
        id               UUID PRIMARY KEY,
        user_id          UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
        organization_id  UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
        created_at       TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leads (
        id               UUID PRIMARY KEY,
        organization_id  UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
        agent_id         UUID REFERENCES agents(id) ON DELETE SET NULL,
        first_name       TEXT NOT NULL,
        last_name        TEXT NOT NULL,
        age              INTEGER NOT NULL DEFAULT 0,
        email            TEXT NOT NULL DEFAULT '',
        phone_number     TEXT NOT NULL DEFAULT '',
        description      TEXT NOT NULL DEFAULT '',
        created_at       TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at       TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS leads_organization_agent_idx ON leads (organization_id, agent_id)",
];

pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    debug!("Schema ensured ({} statements)", STATEMENTS.len());
    Ok(())
}
