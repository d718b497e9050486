#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use lead_crm::config::{AccessMode, AppConfig};
use lead_crm::database::models::Lead;
use lead_crm::database::{LeadStore, MemoryStore};
use lead_crm::filter::LeadFilter;
use lead_crm::notify::RecordingNotifier;
use lead_crm::{router, AppState};

pub const PASSWORD: &str = "correct horse battery";

/// The app wired to an in-memory store and a recording notifier
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub config: AppConfig,
}

/// A logged-in user: the `Cookie` header value plus ids to assert on
#[derive(Debug, Clone)]
pub struct Session {
    pub cookie: String,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    /// Set for agent accounts
    pub agent_id: Option<Uuid>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_mode(AccessMode::Protected)
    }

    pub fn with_mode(mode: AccessMode) -> Self {
        let mut config = AppConfig::development();
        config.access_mode = mode;
        config.api.enable_request_logging = false;
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let state = AppState::new(store.clone(), notifier.clone(), config.clone());

        Self {
            router: router(state),
            store,
            notifier,
            config,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Result<Response> {
        Ok(self.router.clone().oneshot(request).await?)
    }

    pub async fn get(&self, path: &str, session: Option<&Session>) -> Result<Response> {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(session) = session {
            builder = builder.header(header::COOKIE, &session.cookie);
        }
        self.send(builder.body(Body::empty())?).await
    }

    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)], session: Option<&Session>) -> Result<Response> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();

        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(session) = session {
            builder = builder.header(header::COOKIE, &session.cookie);
        }
        self.send(builder.body(Body::from(body))?).await
    }

    /// Sign up an organiser with its own organization and log in
    pub async fn organiser(&self, username: &str) -> Result<Session> {
        let email = format!("{}@example.com", username);
        let response = self
            .post_form(
                "/signup",
                &[
                    ("username", username),
                    ("email", &email),
                    ("organization_name", &format!("{} ltd", username)),
                    ("password1", PASSWORD),
                    ("password2", PASSWORD),
                ],
                None,
            )
            .await?;
        assert_redirect(&response, "/login");

        self.login(username).await
    }

    /// Add an agent to the organiser's organization and log in as it
    pub async fn agent(&self, organiser: &Session, username: &str) -> Result<Session> {
        let email = format!("{}@example.com", username);
        let response = self
            .post_form(
                "/agents/create",
                &[
                    ("username", username),
                    ("email", &email),
                    ("first_name", "Agent"),
                    ("last_name", username),
                    ("password", PASSWORD),
                ],
                Some(organiser),
            )
            .await?;
        assert_redirect(&response, "/agents");

        self.login(username).await
    }

    pub async fn login(&self, username: &str) -> Result<Session> {
        let response = self
            .post_form("/login", &[("username", username), ("password", PASSWORD)], None)
            .await?;
        assert_redirect(&response, "/leads");

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .context("login did not set a cookie")?
            .to_str()?
            .split(';')
            .next()
            .context("empty cookie")?
            .to_string();

        let user = self
            .store
            .find_user_by_username(username)
            .await?
            .context("user missing after login")?;
        let agent_id = self.store.find_agent_by_user(user.id).await?.map(|a| a.id);

        Ok(Session {
            cookie,
            user_id: user.id,
            organization_id: user.organization_id,
            agent_id,
        })
    }

    /// Create a lead through the form and return it from the store
    pub async fn create_lead(&self, session: &Session, first_name: &str, agent: Option<Uuid>) -> Result<Lead> {
        let agent = agent.map(|id| id.to_string()).unwrap_or_default();
        let response = self
            .post_form("/leads/create", &lead_fields(first_name, &agent), Some(session))
            .await?;
        assert_redirect(&response, "/leads");

        self.stored_lead(first_name).await?.context("lead was not stored")
    }

    pub async fn stored_lead(&self, first_name: &str) -> Result<Option<Lead>> {
        let leads = self.store.list_leads(&LeadFilter::new()).await?;
        Ok(leads.into_iter().find(|l| l.first_name == first_name))
    }
}

pub fn lead_fields<'a>(first_name: &'a str, agent: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("first_name", first_name),
        ("last_name", "Lovelace"),
        ("age", "36"),
        ("email", "lead@example.com"),
        ("phone_number", "555-0100"),
        ("description", "Met at the expo"),
        ("agent", agent),
    ]
}

pub fn assert_redirect(response: &Response, location: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "expected redirect to {}", location);
    assert_eq!(
        response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some(location)
    );
}

pub async fn json_body(response: Response) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// First names of the leads in a JSON array
pub fn names(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|leads| {
            leads
                .iter()
                .filter_map(|l| l["first_name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
