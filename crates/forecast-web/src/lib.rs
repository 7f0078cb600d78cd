//! forecast-web - Live-preview server for forecast using Axum
//!
//! Serves a YAML editor and re-renders the HTML report on every edit. Each
//! render parses and computes from scratch; the only shared state is the
//! read-only preload text and the holiday source.

pub mod router;

pub use router::create_router;

use anyhow::{Context, Result};
use forecast_core::{GermanHolidays, HolidaySource};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Read-only state shared by all handlers
pub struct WebState {
    /// Config text shown in the editor on first load
    pub preload: Option<String>,
    pub holidays: Arc<dyn HolidaySource>,
}

impl WebState {
    pub fn new(preload: Option<String>) -> Self {
        Self {
            preload,
            holidays: Arc::new(GermanHolidays),
        }
    }

    /// Preload `path` if it exists; a missing file just means an empty editor
    pub fn from_preload_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(?path, "No preload config, starting with an empty editor");
            return Ok(Self::new(None));
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read preload config: {}", path.display()))?;
        Ok(Self::new(Some(text)))
    }
}

/// Run the live-preview server until it is stopped
pub async fn run(host: &str, port: u16, state: WebState) -> Result<()> {
    let router = create_router(Arc::new(state));

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    let addr = listener.local_addr()?;

    info!("Live preview listening on http://{}", addr);
    println!("Live preview listening on http://{} (Ctrl+C to stop)", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
