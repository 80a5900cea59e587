//! EIPScope API - EIP Governance Analytics
//!
//! Reconstructs unified lifecycle timelines for Ethereum standards
//! proposals (EIPs/ERCs/RIPs), classifies the governance state of their
//! linked pull requests, and ranks recent activity for trending views.
//!
//! The service mirrors an upstream event log (an external collaborator
//! that owns persistence and indexing) into an in-process snapshot and
//! serves derived, read-only views over it:
//! - Timeline: status, category, deadline, and PR events merged into one
//!   chronological narrative per proposal
//! - Governance: who an open PR is waiting on (editor, author, stalled)
//! - Trending: recency-weighted activity scores over a trailing window
//! - Reports: monthly snapshots, waiting buckets, lifecycle funnels

mod config;
mod error;
mod events;
mod governance;
mod reports;
mod roles;
mod routes;
mod state;
mod timeline;
mod trending;

use crate::config::Settings;
use crate::events::EventStore;
use crate::roles::RoleDirectory;
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting EIPScope - EIP Governance Analytics...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");
    info!(
        "   Stall threshold: {} days, trending window: {} days",
        settings.governance.stall_threshold_days, settings.governance.trending_window_days
    );

    // Seed the event log snapshot from the upstream export, if configured
    let events = match &settings.event_log.snapshot_path {
        Some(path) => {
            let store = EventStore::from_snapshot(path)?;
            info!("✅ Event log snapshot loaded from {}", path.display());
            store
        }
        None => {
            warn!("⚠️  EVENT_LOG_PATH not set, starting with an empty event log");
            EventStore::new()
        }
    };
    info!("   {} event(s) in snapshot", events.count().await);

    // Seed the actor-role directory; classification degrades without it
    let roles = match &settings.event_log.roles_path {
        Some(path) => {
            let directory = RoleDirectory::from_snapshot(path)?;
            info!("✅ Role directory loaded from {}", path.display());
            directory
        }
        None => {
            warn!("⚠️  ROLES_PATH not set, governance classification will degrade to NO_STATE");
            RoleDirectory::new()
        }
    };
    info!("   {} actor role(s) known", roles.count().await);

    let state = Arc::new(AppState::new(events, roles, settings.clone()));

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   ─── Timeline ───");
    info!("   GET  /api/proposals/{{repo}}/{{number}}/timeline - Unified lifecycle timeline");
    info!("");
    info!("   ─── Governance ───");
    info!("   GET  /api/prs/{{repo}}/{{number}}/governance    - Governance state of a PR");
    info!("   GET  /api/governance/buckets                   - Waiting-time buckets");
    info!("");
    info!("   ─── Trending & Reports ───");
    info!("   GET  /api/trending                             - Ranked recent activity");
    info!("   GET  /api/reports/monthly                      - Monthly status snapshot");
    info!("   GET  /api/reports/funnel                       - PR lifecycle funnel");
    info!("");
    info!("   ─── Ingestion ───");
    info!("   POST /api/events                               - Append upstream events");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,eipscope_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
