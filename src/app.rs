use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::LeadStore;
use crate::handlers::{protected, public};
use crate::middleware::session_middleware;
use crate::notify::Notifier;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LeadStore>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn LeadStore>, notifier: Arc<dyn Notifier>, config: AppConfig) -> Self {
        Self {
            store,
            notifier,
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let security = &state.config.security;
    let enable_cors = security.enable_cors;
    let cors = cors_layer(&security.cors_origins);
    let request_logging = state.config.api.enable_request_logging;

    let mut app = Router::new()
        // Public
        .merge(public_routes())
        // Session required
        .merge(lead_routes(state.clone()))
        .merge(agent_routes(state.clone()))
        .with_state(state);

    if enable_cors {
        app = app.layer(cors);
    }
    if request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }
    app
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::landing))
        .route("/health", get(public::health))
        .route("/signup", get(public::signup_get).post(public::signup_post))
        .route("/login", get(public::login_get).post(public::login_post))
        .route("/logout", post(public::logout_post))
}

fn lead_routes(state: AppState) -> Router<AppState> {
    use protected::leads;

    Router::new()
        .route("/leads", get(leads::list_get))
        .route("/leads/create", get(leads::create_get).post(leads::create_post))
        .route("/leads/:id", get(leads::detail_get))
        .route("/leads/:id/update", get(leads::update_get).post(leads::update_post))
        .route("/leads/:id/delete", get(leads::delete_get).post(leads::delete_post))
        .route_layer(from_fn_with_state(state, session_middleware))
}

fn agent_routes(state: AppState) -> Router<AppState> {
    use protected::agents;

    Router::new()
        .route("/agents", get(agents::list_get))
        .route("/agents/create", get(agents::create_get).post(agents::create_post))
        .route_layer(from_fn_with_state(state, session_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        });

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
