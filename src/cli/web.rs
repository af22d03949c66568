//! Web server CLI command

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::{self, auth::SessionAuth, AppState};
use crate::board::TaskStore;
use crate::items::{ItemService, Latency};
use crate::secrets::{self, Secrets};
use crate::storage::{self, config::Config, snapshot::FileSnapshotStore};

/// Build the server state from config and environment
pub fn build_state(config: &Config, secrets: &Secrets) -> Result<AppState> {
    let snapshots = FileSnapshotStore::new(storage::taskdeck_dir());
    let store = TaskStore::open(config.board.store_name.clone(), Box::new(snapshots))
        .context("failed to open task store")?;
    let items = ItemService::seeded(Latency::from(&config.items));

    let secret = match &secrets.session_secret {
        Some(secret) => secret.clone(),
        None => {
            warn!(
                "{} is not set, using a per-process secret (sessions end on restart); run `taskdeck setup`",
                secrets::SECRET_KEY
            );
            secrets::generate_secret().context("failed to generate session secret")?
        }
    };
    let auth = SessionAuth::new(secret, config.auth.session_cookie.clone(), secrets)
        .with_ttl(chrono::Duration::days(config.auth.session_ttl_days.max(1)));

    Ok(AppState::new(store, items, auth))
}

/// Execute the web server
pub async fn execute(
    config: &Config,
    secrets: &Secrets,
    host: Option<String>,
    port: Option<u16>,
    no_open: bool,
) -> Result<()> {
    let host = host.unwrap_or_else(|| config.web.host.clone());
    let port = port.unwrap_or(config.web.port);
    let addr = format!("{}:{}", host, port);
    let state = build_state(config, secrets)?;

    let url = secrets
        .app_url
        .clone()
        .unwrap_or_else(|| format!("http://{}", addr));
    println!("taskdeck: {}", url);

    // Open browser after a short delay
    if config.web.open_browser && !no_open {
        let url = url.clone();
        tokio::spawn(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
            info!(url = %url, "opening browser");
            if let Err(e) = open::that(&url) {
                warn!(error = %e, "failed to open browser");
            }
        });
    }

    api::start_server(state, &addr)
        .await
        .with_context(|| format!("server error on {}", addr))
}
