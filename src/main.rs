use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use lead_crm::config::{self, AccessMode};
use lead_crm::database::{DatabaseManager, LeadStore, MemoryStore, PgLeadStore};
use lead_crm::{notify, router, AppState};

#[derive(Parser)]
#[command(name = "lead-crm")]
#[command(about = "Lead CRM server - leads, organisers and their agents")]
#[command(version)]
struct Args {
    #[arg(long, help = "Port to listen on (overrides LEADS_PORT/PORT)")]
    port: Option<u16>,

    #[arg(long, value_parser = parse_access_mode, help = "protected or open")]
    access_mode: Option<AccessMode>,

    #[arg(long, help = "Keep everything in memory instead of PostgreSQL")]
    memory: bool,
}

fn parse_access_mode(value: &str) -> Result<AccessMode, String> {
    AccessMode::parse(value).ok_or_else(|| format!("unknown access mode '{}'", value))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL and SMTP_* are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = config::config().clone();
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(mode) = args.access_mode {
        config.access_mode = mode;
    }
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("SECURITY_JWT_SECRET must be set in {:?}", config.environment);
    }

    tracing::info!(
        "Starting Lead CRM in {:?} mode with {:?} lead access",
        config.environment,
        config.access_mode
    );

    let store: Arc<dyn LeadStore> = if args.memory {
        tracing::warn!("Using the in-memory store; data is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("database connection failed")?;
        Arc::new(PgLeadStore::new(pool))
    };

    let notifier = notify::from_config(&config.notify).context("invalid notification settings")?;

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::new(store, Arc::from(notifier), config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Lead CRM listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
