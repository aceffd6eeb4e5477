use std::{fs, path::Path};

use serde::Deserialize;

use crate::core::error::EngineError;

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_link_per_window")]
    pub link_per_window: u32,
    #[serde(default = "default_text_per_window")]
    pub text_per_window: u32,
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_inference_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_inference_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_history_db_path")]
    pub history_db_path: String,
    #[serde(default = "default_history_retention_days")]
    pub history_retention_days: u32,
    #[serde(default)]
    pub rate_limits: RateLimitConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
}

impl AppConfig {
    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            link_per_window: default_link_per_window(),
            text_per_window: default_text_per_window(),
            window_ms: default_window_ms(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_inference_base_url(),
            model: default_model(),
            timeout_ms: default_inference_timeout_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user_agent: default_user_agent(),
            history_db_path: default_history_db_path(),
            history_retention_days: default_history_retention_days(),
            rate_limits: RateLimitConfig::default(),
            inference: InferenceConfig::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_user_agent() -> String {
    format!("vigia/{}", env!("CARGO_PKG_VERSION"))
}

fn default_history_db_path() -> String {
    "data/vigia.db".to_string()
}

fn default_history_retention_days() -> u32 {
    90
}

fn default_link_per_window() -> u32 {
    15
}

fn default_text_per_window() -> u32 {
    10
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_inference_base_url() -> String {
    "https://ai.gateway.lovable.dev/v1".to_string()
}

fn default_model() -> String {
    "google/gemini-2.5-flash".to_string()
}

fn default_inference_timeout_ms() -> u64 {
    20_000
}

fn default_max_attempts() -> u32 {
    3
}

pub fn load_config(path: Option<&str>) -> Result<AppConfig, EngineError> {
    let default_path = Path::new("config/vigia.toml");
    let path = path.map(Path::new).unwrap_or(default_path);

    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| EngineError::Config(e.to_string()))?;
    let cfg: AppConfig =
        toml::from_str(&content).map_err(|e| EngineError::Config(e.to_string()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.rate_limits.link_per_window, 15);
        assert_eq!(cfg.rate_limits.text_per_window, 10);
        assert_eq!(cfg.inference.max_attempts, 3);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let cfg: AppConfig = toml::from_str(
            "port = 9000\n\n[rate_limits]\nlink_per_window = 2\n",
        )
        .unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.rate_limits.link_per_window, 2);
        assert_eq!(cfg.rate_limits.window_ms, 60_000);
        assert_eq!(cfg.inference.model, "google/gemini-2.5-flash");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load_config(Some("config/does-not-exist.toml")).unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
    }
}
