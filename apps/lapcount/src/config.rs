use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Context;
use client_core::LayoutDirection;

pub const SETTINGS_FILE: &str = "lapcount.toml";
const DEFAULT_DATA_FILE: &str = "data/swimmers.json";
const LAYOUT_DIRECTION_KEY: &str = "layout_direction";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_file: PathBuf,
    pub server_url: Option<String>,
    pub layout_direction: LayoutDirection,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            server_url: None,
            layout_direction: LayoutDirection::Ltr,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend<'a> {
    Local(&'a Path),
    Remote(&'a str),
}

impl Settings {
    pub fn backend(&self) -> Backend<'_> {
        match self.server_url.as_deref() {
            Some(url) => Backend::Remote(url),
            None => Backend::Local(&self.data_file),
        }
    }
}

/// Flags given on the command line. They win over every other source.
#[derive(Debug, Clone, Default)]
pub struct FlagOverrides {
    pub data_file: Option<PathBuf>,
    pub server_url: Option<String>,
    pub layout_direction: Option<LayoutDirection>,
}

pub fn load_settings(settings_file: &Path, flags: FlagOverrides) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(settings_file) {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    apply_flag_overrides(&mut settings, flags);

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        tracing::warn!(file = SETTINGS_FILE, "ignoring unparseable settings file");
        return;
    };

    if let Some(v) = file_cfg.get("data_file").and_then(toml::Value::as_str) {
        settings.data_file = PathBuf::from(v);
    }
    if let Some(v) = file_cfg.get("server_url").and_then(toml::Value::as_str) {
        settings.server_url = non_empty(v);
    }
    if let Some(v) = file_cfg
        .get(LAYOUT_DIRECTION_KEY)
        .and_then(toml::Value::as_str)
    {
        set_direction(settings, v);
    }
}

fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("LAPCOUNT__DATA_FILE") {
        settings.data_file = PathBuf::from(v);
    }
    if let Some(v) = var("LAPCOUNT__SERVER_URL") {
        settings.server_url = non_empty(&v);
    }
    if let Some(v) = var("LAPCOUNT__LAYOUT_DIRECTION") {
        set_direction(settings, &v);
    }
}

fn apply_flag_overrides(settings: &mut Settings, flags: FlagOverrides) {
    // An explicit data file selects the local backend even if a server url
    // came from the file or the environment.
    if let Some(path) = flags.data_file {
        settings.data_file = path;
        settings.server_url = None;
    }
    if let Some(url) = flags.server_url {
        settings.server_url = non_empty(&url);
    }
    if let Some(direction) = flags.layout_direction {
        settings.layout_direction = direction;
    }
}

fn set_direction(settings: &mut Settings, raw: &str) {
    match raw.parse() {
        Ok(direction) => settings.layout_direction = direction,
        Err(error) => tracing::warn!(%error, "ignoring layout direction"),
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Stores the layout direction preference, keeping any other keys in the file.
pub fn save_layout_direction(
    settings_file: &Path,
    direction: LayoutDirection,
) -> anyhow::Result<()> {
    let mut table = match fs::read_to_string(settings_file) {
        Ok(raw) => toml::from_str::<toml::Table>(&raw).with_context(|| {
            format!(
                "refusing to overwrite unparseable {}",
                settings_file.display()
            )
        })?,
        Err(err) if err.kind() == ErrorKind::NotFound => toml::Table::new(),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", settings_file.display()))
        }
    };

    table.insert(
        LAYOUT_DIRECTION_KEY.to_string(),
        toml::Value::String(direction.to_string()),
    );
    let rendered = toml::to_string(&table).context("failed to render settings")?;
    fs::write(settings_file, rendered)
        .with_context(|| format!("failed to write {}", settings_file.display()))?;

    tracing::info!(%direction, file = %settings_file.display(), "layout direction saved");
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
