use std::{collections::HashMap, fs, net::SocketAddr};

use anyhow::Context;
use serde::Deserialize;

const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub body_limit_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            body_limit_bytes: 16 * 1024,
        }
    }
}

impl Settings {
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        self.server_bind
            .parse()
            .with_context(|| format!("invalid bind address '{}'", self.server_bind))
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        tracing::warn!(file = SETTINGS_FILE, "ignoring unparseable settings file");
        return;
    };

    if let Some(v) = file_cfg.get("bind_addr").and_then(toml::Value::as_str) {
        settings.server_bind = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("body_limit_bytes")
        .and_then(toml::Value::as_integer)
        .and_then(|v| usize::try_from(v).ok())
    {
        settings.body_limit_bytes = v;
    }
}

fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(parsed) = var("APP__BODY_LIMIT_BYTES").and_then(|v| v.parse::<usize>().ok()) {
        settings.body_limit_bytes = parsed;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
