//! Settings loading: file layer plus environment overrides.

use std::path::Path;

use crate::errors::{Result, SettingsError};
use crate::types::MathqSettings;

/// Load settings from an optional file path, then apply `MATHQ_*`
/// environment overrides and validation.
///
/// When `path` is `None`, the file layer is skipped and only defaults plus
/// env overrides apply.
pub fn load_settings(path: Option<&Path>) -> Result<MathqSettings> {
    let mut settings = match path {
        Some(p) => load_settings_from_path(p)?,
        None => MathqSettings::default(),
    };
    apply_env_overrides(&mut settings)?;
    settings.validate();
    Ok(settings)
}

/// Load settings from a JSON file. Partial files are allowed; missing
/// fields take compiled defaults.
pub fn load_settings_from_path(path: &Path) -> Result<MathqSettings> {
    let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Apply `MATHQ_*` environment variable overrides in place.
///
/// Unset variables leave the current value untouched. Set-but-unparseable
/// values are an error: silently ignoring a typo'd port is worse than
/// failing startup.
pub fn apply_env_overrides(settings: &mut MathqSettings) -> Result<()> {
    if let Ok(host) = std::env::var("MATHQ_HOST") {
        settings.server.host = host;
    }
    if let Some(port) = parse_env("MATHQ_PORT")? {
        settings.server.port = port;
    }
    if let Ok(url) = std::env::var("MATHQ_OPENAI_BASE_URL") {
        settings.openai.base_url = url;
    }
    if let Ok(model) = std::env::var("MATHQ_CHAT_MODEL") {
        settings.openai.chat_model = model;
    }
    if let Ok(model) = std::env::var("MATHQ_EMBEDDING_MODEL") {
        settings.openai.embedding_model = model;
    }
    if let Some(secs) = parse_env("MATHQ_REQUEST_TIMEOUT_SECS")? {
        settings.openai.request_timeout_secs = secs;
    }
    if let Some(k) = parse_env("MATHQ_TOP_K")? {
        settings.similarity.top_k = k;
    }
    if let Some(threshold) = parse_env("MATHQ_SCORE_THRESHOLD")? {
        settings.similarity.score_threshold = threshold;
    }
    if let Some(max) = parse_env("MATHQ_MAX_SESSIONS")? {
        settings.sessions.max_sessions = max;
    }
    if let Ok(path) = std::env::var("MATHQ_CORPUS") {
        settings.corpus.path = path;
    }
    Ok(())
}

fn parse_env<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>> {
    match std::env::var(var) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| SettingsError::InvalidEnvValue { var, value }),
        Err(_) => Ok(None),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
