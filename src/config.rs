//! Application configuration management.
//!
//! Endpoint locations and the identity-provider API key live in a JSON file
//! at `~/.config/wanderstay/config.json`. Environment variables (loaded from
//! a `.env` file when present) override the stored values:
//!
//! - `WANDERSTAY_API_KEY`
//! - `WANDERSTAY_AUTH_URL`
//! - `WANDERSTAY_DATABASE_URL`
//! - `WANDERSTAY_IMAGE_UPLOAD_URL`

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "wanderstay";

/// Config file name
const CONFIG_FILE: &str = "config.json";

fn default_auth_base_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

fn default_database_url() -> String {
    "https://wanderstay-prod.firebaseio.com".to_string()
}

fn default_image_upload_url() -> String {
    "https://us-central1-wanderstay-prod.cloudfunctions.net/storeImage".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Identity provider base URL (`accounts:signUp` / `accounts:signInWithPassword`).
    #[serde(default = "default_auth_base_url")]
    pub auth_base_url: String,
    /// Entity REST endpoint base URL.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Multipart image upload endpoint.
    #[serde(default = "default_image_upload_url")]
    pub image_upload_url: String,
    /// Identity provider API key, passed as the `key` query parameter.
    #[serde(default)]
    pub api_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_base_url: default_auth_base_url(),
            database_url: default_database_url(),
            image_upload_url: default_image_upload_url(),
            api_key: String::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("WANDERSTAY_API_KEY") {
            self.api_key = key;
        }
        if let Ok(url) = std::env::var("WANDERSTAY_AUTH_URL") {
            self.auth_base_url = url;
        }
        if let Ok(url) = std::env::var("WANDERSTAY_DATABASE_URL") {
            self.database_url = url;
        }
        if let Ok(url) = std::env::var("WANDERSTAY_IMAGE_UPLOAD_URL") {
            self.image_upload_url = url;
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for locally persisted state (credential record file store).
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
