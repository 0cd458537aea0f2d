//! Live-reload development server.
//!
//! Two listeners side by side: HTTP on 3000 serving the most recently
//! rendered page, and a bare WebSocket on 3001 that pushes a reload token
//! whenever the watched source changes. The operating principle is "never
//! die from a bad résumé edit": render and parse failures become an error
//! page and the watcher keeps going; only startup problems (unknown role,
//! missing source, a port already taken) are fatal.

pub(crate) mod pages;
pub(crate) mod reload;
pub(crate) mod routes;
pub(crate) mod watcher;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{Role, ToolkitConfig};
use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::theme::{self, RoleContext, Theme, ThemeOptions};
use reload::ReloadHub;

pub const HTTP_PORT: u16 = 3000;
pub const WS_PORT: u16 = 3001;
pub(crate) const WATCH_INTERVAL: Duration = Duration::from_millis(500);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

// ────────────────────────────────────────────────────────────────────────────
// Shared state
// ────────────────────────────────────────────────────────────────────────────

/// Everything the handlers, the watcher, and the shutdown path share.
#[derive(Clone)]
pub(crate) struct ServerState {
    pub(crate) role_code: String,
    pub(crate) role: Role,
    pub(crate) theme_id: String,
    theme: Arc<dyn Theme>,
    pub(crate) source: PathBuf,
    pub(crate) html: Arc<RwLock<String>>,
    pub(crate) hub: ReloadHub,
}

impl ServerState {
    pub(crate) fn new(
        root: &Path,
        config: &ToolkitConfig,
        role_code: &str,
    ) -> Result<Self, AppError> {
        let role = config.role(role_code)?.clone();
        let source = root.join(&role.source_file);
        if !source.exists() {
            return Err(AppError::MissingSource(source));
        }
        let theme = theme::resolve(&config.default_theme)?;
        Ok(Self {
            role_code: role_code.to_string(),
            role,
            theme_id: config.default_theme.clone(),
            theme,
            source,
            html: Arc::new(RwLock::new(String::new())),
            hub: ReloadHub::new(),
        })
    }

    /// Re-renders the source into the served slot. Never fails: any error
    /// becomes the diagnostic page instead.
    pub(crate) async fn regenerate(&self) {
        info!("Generating HTML...");
        let html = match self.render_once().await {
            Ok(html) => {
                info!("HTML generated successfully");
                html
            }
            Err(err) => {
                error!("Error generating HTML: {err}");
                pages::error_page(
                    &err.to_string(),
                    &self.source,
                    &self.role.name,
                    &self.role_code,
                    &self.theme_id,
                )
            }
        };
        *self.html.write().await = html;
    }

    async fn render_once(&self) -> Result<String, AppError> {
        let raw = match tokio::fs::read_to_string(&self.source).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::MissingSource(self.source.clone()));
            }
            Err(err) => return Err(err.into()),
        };
        let resume: Resume = serde_json::from_str(&raw)?;
        let options = ThemeOptions {
            role: Some(RoleContext {
                code: self.role_code.clone(),
                name: self.role.name.clone(),
                description: self.role.description.clone(),
            }),
            version: None,
        };
        let html = self.theme.render(&resume, &options)?;
        Ok(pages::inject_reload_script(&html, WS_PORT))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Server lifecycle
// ────────────────────────────────────────────────────────────────────────────

pub struct DevServer {
    state: ServerState,
}

impl DevServer {
    /// Validates the role and its source document up front, so a typo fails
    /// before any port is bound.
    pub fn new(root: &Path, config: &ToolkitConfig, role_code: &str) -> Result<Self, AppError> {
        Ok(Self {
            state: ServerState::new(root, config, role_code)?,
        })
    }

    /// Runs until a shutdown signal arrives. Binds both listeners, starts
    /// the watcher, and serves the initial render (or its error page).
    pub async fn run(self) -> Result<(), AppError> {
        let state = self.state;
        info!(
            "Starting resume dev server: {} ({})",
            state.role.name, state.role_code
        );
        info!("Source: {}", state.source.display());
        info!("Theme: {}", state.theme_id);

        state.regenerate().await;

        let ws_listener = TcpListener::bind(("0.0.0.0", WS_PORT)).await?;
        let http_listener = TcpListener::bind(("0.0.0.0", HTTP_PORT)).await?;

        let cancel = CancellationToken::new();
        let watch_task = tokio::spawn(watcher::watch_source(state.clone(), cancel.clone()));

        let ws_task = {
            let app = reload::ws_router(state.hub.clone());
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if let Err(err) = axum::serve(ws_listener, app)
                    .with_graceful_shutdown(cancel.cancelled_owned())
                    .await
                {
                    error!("WebSocket server error: {err}");
                }
            })
        };
        info!("WebSocket server running on port {WS_PORT}");

        let http_task = {
            let app = routes::router(state.clone());
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if let Err(err) = axum::serve(http_listener, app)
                    .with_graceful_shutdown(cancel.cancelled_owned())
                    .await
                {
                    error!("HTTP server error: {err}");
                }
            })
        };
        info!("Development server running at http://localhost:{HTTP_PORT}");
        info!("Save the source file to reload; /status reports server info");

        spawn_shutdown_driver(state, cancel);

        let _ = http_task.await;
        let _ = ws_task.await;
        let _ = watch_task.await;
        info!("Server stopped");
        Ok(())
    }
}

/// Listens for SIGINT, SIGTERM, and SIGQUIT. The first signal starts a
/// single shutdown: close every reload client, cancel the listeners and
/// watcher, and arm a force-exit in case graceful close stalls. Repeat
/// signals during the grace window are swallowed.
fn spawn_shutdown_driver(state: ServerState, cancel: CancellationToken) {
    let started = Arc::new(AtomicBool::new(false));
    tokio::spawn(async move {
        loop {
            wait_for_signal().await;
            if started.swap(true, Ordering::SeqCst) {
                continue;
            }
            info!("Shutting down server...");
            let clients = state.hub.client_count().await;
            if clients > 0 {
                info!("Closing {clients} live reload clients");
            }
            state.hub.close_all().await;
            cancel.cancel();
            tokio::spawn(async {
                tokio::time::sleep(SHUTDOWN_GRACE).await;
                warn!("Force closing server...");
                std::process::exit(0);
            });
        }
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};
    match (signal(SignalKind::terminate()), signal(SignalKind::quit())) {
        (Ok(mut terminate), Ok(mut quit)) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
                _ = quit.recv() => {}
            }
        }
        // Cannot install the extra handlers; Ctrl+C alone still works.
        _ => {
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
