//! Settings parser for .vizlearn/config.toml

use super::types::Settings;
use std::path::Path;
use vizlearn_core::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const VIZLEARN_DIR: &str = ".vizlearn";

/// Environment variables consulted for the generator API key, in order
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Load settings from `<base>/.vizlearn/config.toml`
///
/// Missing or unreadable files fall back to defaults.
pub fn load_settings(base_path: &Path) -> Settings {
    let config_path = base_path.join(VIZLEARN_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Create a commented default config in `.vizlearn/`. Never overwrites.
pub fn init_config_dir(base_path: &Path) -> Result<()> {
    let vizlearn_dir = base_path.join(VIZLEARN_DIR);

    if !vizlearn_dir.exists() {
        std::fs::create_dir_all(&vizlearn_dir)
            .map_err(|e| Error::config(format!("Failed to create .vizlearn dir: {}", e)))?;
    }

    let config_path = vizlearn_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r#"# vizlearn Configuration
# The generator API key is read from GEMINI_API_KEY (or API_KEY), never from this file.

[server]
host = "127.0.0.1"
port = 3001
lessons_dir = "generated_lessons"

[generation]
model = "gemini-2.0-flash"
api_base_url = "https://generativelanguage.googleapis.com"
timeout_secs = 80

[client]
server_url = "http://localhost:3001"
request_timeout_secs = 90   # Pending generate/load requests are abandoned after this
"#;
        std::fs::write(&config_path, default_content)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}

/// Read the generator API key from the environment
pub fn api_key_from_env() -> Result<String> {
    API_KEY_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| Error::missing_credentials(API_KEY_VARS.join(" or ")))
}
