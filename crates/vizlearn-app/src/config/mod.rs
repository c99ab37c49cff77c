//! Configuration file parsing for vizlearn
//!
//! Supports:
//! - `.vizlearn/config.toml` - Global settings
//! - `GEMINI_API_KEY` / `API_KEY` - Generator credentials (environment only)

pub mod settings;
pub mod types;

pub use settings::{api_key_from_env, init_config_dir, load_settings, API_KEY_VARS};
pub use types::*;
