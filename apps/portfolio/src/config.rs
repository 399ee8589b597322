use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use serde::Deserialize;
use shared::content::PageContent;
use url::Url;

const SETTINGS_FILE: &str = "portfolio.toml";
const DEFAULT_RELAY_BASE: &str = "https://formsubmit.co/ajax/";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub relay_endpoint: Option<String>,
    pub relay_recipient: String,
    pub scroll_threshold: f64,
    pub frame_interval_ms: u64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub assets_dir: PathBuf,
    pub content_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            relay_endpoint: None,
            relay_recipient: "hello@example.com".into(),
            scroll_threshold: page_core::SCROLL_THRESHOLD_PX,
            frame_interval_ms: 16,
            viewport_width: 1280.0,
            viewport_height: 800.0,
            assets_dir: PathBuf::from("public"),
            content_path: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    relay_endpoint: Option<String>,
    relay_recipient: Option<String>,
    scroll_threshold: Option<f64>,
    frame_interval_ms: Option<u64>,
    viewport_width: Option<f64>,
    viewport_height: Option<f64>,
    assets_dir: Option<PathBuf>,
    content_path: Option<PathBuf>,
}

impl Settings {
    /// Explicit endpoint if configured, otherwise the relay's AJAX URL for the
    /// configured recipient.
    pub fn relay_endpoint(&self) -> anyhow::Result<Url> {
        let raw = match &self.relay_endpoint {
            Some(endpoint) => endpoint.trim().to_string(),
            None => {
                let recipient = self.relay_recipient.trim();
                if recipient.is_empty() {
                    bail!("no relay endpoint or recipient configured");
                }
                format!("{DEFAULT_RELAY_BASE}{recipient}")
            }
        };

        let url = Url::parse(&raw).with_context(|| format!("invalid relay endpoint '{raw}'"))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("relay endpoint '{raw}' must use http or https");
        }
        Ok(url)
    }

    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file (if readable and well-formed), then env.
pub fn load_settings_from<F>(path: &Path, env: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<FileSettings>(&raw) {
            apply_file_settings(&mut settings, file_cfg);
        }
    }

    if let Some(v) = env("RELAY_ENDPOINT") {
        settings.relay_endpoint = Some(v);
    }
    if let Some(v) = env("APP__RELAY_ENDPOINT") {
        settings.relay_endpoint = Some(v);
    }
    if let Some(v) = env("APP__RELAY_RECIPIENT") {
        settings.relay_recipient = v;
    }
    if let Some(parsed) = env("APP__SCROLL_THRESHOLD").and_then(|v| parse_finite(&v)) {
        settings.scroll_threshold = parsed;
    }
    if let Some(parsed) = env("APP__FRAME_INTERVAL_MS").and_then(|v| v.parse().ok()) {
        settings.frame_interval_ms = parsed;
    }
    if let Some(parsed) = env("APP__VIEWPORT_WIDTH").and_then(|v| parse_finite(&v)) {
        settings.viewport_width = parsed;
    }
    if let Some(parsed) = env("APP__VIEWPORT_HEIGHT").and_then(|v| parse_finite(&v)) {
        settings.viewport_height = parsed;
    }
    if let Some(v) = env("APP__ASSETS_DIR") {
        settings.assets_dir = PathBuf::from(v);
    }
    if let Some(v) = env("APP__CONTENT_PATH") {
        settings.content_path = Some(PathBuf::from(v));
    }

    settings
}

/// Parses an `f64`, rejecting `NaN` and infinities.
fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.relay_endpoint {
        settings.relay_endpoint = Some(v);
    }
    if let Some(v) = file_cfg.relay_recipient {
        settings.relay_recipient = v;
    }
    if let Some(v) = file_cfg.scroll_threshold.filter(|v| v.is_finite()) {
        settings.scroll_threshold = v;
    }
    if let Some(v) = file_cfg.frame_interval_ms {
        settings.frame_interval_ms = v;
    }
    if let Some(v) = file_cfg.viewport_width.filter(|v| v.is_finite()) {
        settings.viewport_width = v;
    }
    if let Some(v) = file_cfg.viewport_height.filter(|v| v.is_finite()) {
        settings.viewport_height = v;
    }
    if let Some(v) = file_cfg.assets_dir {
        settings.assets_dir = v;
    }
    if let Some(v) = file_cfg.content_path {
        settings.content_path = Some(v);
    }
}

/// Built-in content unless a content file is configured.
pub fn load_content(settings: &Settings) -> anyhow::Result<PageContent> {
    let Some(path) = &settings.content_path else {
        return Ok(PageContent::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read page content '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse page content '{}'", path.display()))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
