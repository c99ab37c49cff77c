//! `vizlearn serve` - lesson REST server

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use vizlearn_app::config::{api_key_from_env, Settings};
use vizlearn_core::prelude::*;
use vizlearn_server::{run_server, GeminiClient, GeminiConfig, LessonStore, ServerState};

/// Generator settings as the Gemini client wants them
pub fn gemini_config(settings: &Settings) -> GeminiConfig {
    GeminiConfig {
        model: settings.generation.model.clone(),
        api_base_url: settings.generation.api_base_url.clone(),
        timeout: Duration::from_secs(settings.generation.timeout_secs.max(1)),
    }
}

/// Resolve the bind address from `[server]`
pub fn bind_addr(settings: &Settings) -> Result<SocketAddr> {
    format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .map_err(|e| {
            Error::config(format!(
                "Invalid server address {}:{}: {}",
                settings.server.host, settings.server.port, e
            ))
        })
}

/// Open the lesson store under `base_path` and serve until Ctrl+C
pub async fn run_serve(base_path: &Path, settings: Settings) -> Result<()> {
    let addr = bind_addr(&settings)?;

    let lessons_dir = base_path.join(&settings.server.lessons_dir);
    let store = LessonStore::open(&lessons_dir).await?;
    info!("Lessons stored in {}", lessons_dir.display());

    let api_key = match api_key_from_env() {
        Ok(key) => Some(key),
        Err(e) => {
            warn!("{}; lesson generation will fail until it is set", e);
            None
        }
    };

    let generator = GeminiClient::new(gemini_config(&settings), api_key)?;
    run_server(addr, ServerState::new(store, generator)).await
}
