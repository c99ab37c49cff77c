//! Configuration types for vizlearn
//!
//! Defines:
//! - `Settings` - Global application settings (.vizlearn/config.toml)
//! - `ServerSettings`, `GenerationSettings`, `ClientSettings` - per-section types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application settings (.vizlearn/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub generation: GenerationSettings,

    #[serde(default)]
    pub client: ClientSettings,
}

/// REST server settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerSettings {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory generated lessons are written to (relative to the working directory)
    #[serde(default = "default_lessons_dir")]
    pub lessons_dir: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            lessons_dir: default_lessons_dir(),
        }
    }
}

/// Generative model settings. The API key is never read from this file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GenerationSettings {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Upper bound for one generateContent call
    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_generation_timeout_secs(),
        }
    }
}

/// Settings for the interactive client that talks to the REST server
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClientSettings {
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// A generate/fetch request still pending after this long is abandoned
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_lessons_dir() -> PathBuf {
    PathBuf::from("generated_lessons")
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_generation_timeout_secs() -> u64 {
    80
}

fn default_server_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_request_timeout_secs() -> u64 {
    90
}
