use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::state::OverlapPolicy;

pub const SETTINGS_FILE_NAME: &str = "vibe_client.toml";
const DEFAULT_SEARCH_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub search_base_url: String,
    pub overlap_policy: OverlapPolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            search_base_url: DEFAULT_SEARCH_BASE_URL.into(),
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    search_base_url: Option<String>,
    overlap_policy: Option<OverlapPolicy>,
}

/// Defaults, then the first settings file found, then environment overrides.
pub fn load_settings() -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(path) = settings_file_path() {
        match fs::read_to_string(&path) {
            Ok(raw) => {
                if let Err(err) = settings.apply_toml(&raw) {
                    warn!(path = %path.display(), "ignoring unreadable settings file: {err:#}");
                } else {
                    debug!(path = %path.display(), "loaded client settings file");
                }
            }
            Err(err) => debug!(path = %path.display(), "no settings file: {err}"),
        }
    }

    settings.apply_env(|name| std::env::var(name).ok());
    settings
}

fn settings_file_path() -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var("VIBE_CLIENT_CONFIG") {
        return Some(PathBuf::from(explicit));
    }

    let local = Path::new(SETTINGS_FILE_NAME);
    if local.exists() {
        return Some(local.to_path_buf());
    }

    dirs::config_dir().map(|dir| dir.join("vibe_navigator").join(SETTINGS_FILE_NAME))
}

impl ClientSettings {
    pub fn apply_toml(&mut self, raw: &str) -> anyhow::Result<()> {
        let file: SettingsFile = toml::from_str(raw).context("invalid settings toml")?;
        if let Some(v) = file.search_base_url {
            self.search_base_url = v;
        }
        if let Some(v) = file.overlap_policy {
            self.overlap_policy = v;
        }
        Ok(())
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("VIBE_SEARCH_URL") {
            self.search_base_url = v;
        }
        if let Some(v) = lookup("APP__SEARCH_URL") {
            self.search_base_url = v;
        }

        if let Some(v) = lookup("APP__OVERLAP_POLICY") {
            match v.parse::<OverlapPolicy>() {
                Ok(policy) => self.overlap_policy = policy,
                Err(err) => warn!("ignoring APP__OVERLAP_POLICY: {err}"),
            }
        }
    }

    /// The base URL with surrounding whitespace and trailing slashes removed.
    pub fn base_url(&self) -> anyhow::Result<String> {
        normalize_base_url(&self.search_base_url)
    }
}

pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(DEFAULT_SEARCH_BASE_URL.to_string());
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let parsed = Url::parse(&candidate)
        .with_context(|| format!("invalid search service url '{raw}'"))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(anyhow!("unsupported scheme '{other}' in search service url")),
    }
    if parsed.host_str().is_none() {
        return Err(anyhow!("search service url '{raw}' has no host"));
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn trims_trailing_slashes() {
        assert_eq!(
            normalize_base_url(" http://localhost:8000/ ").expect("url"),
            "http://localhost:8000"
        );
    }

    #[test]
    fn adds_http_scheme_to_bare_host() {
        assert_eq!(
            normalize_base_url("10.0.0.5:8000").expect("url"),
            "http://10.0.0.5:8000"
        );
    }

    #[test]
    fn empty_url_falls_back_to_default() {
        assert_eq!(normalize_base_url("   ").expect("url"), DEFAULT_SEARCH_BASE_URL);
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(normalize_base_url("ftp://files.example.com").is_err());
    }

    #[test]
    fn toml_overrides_defaults() {
        let mut settings = ClientSettings::default();
        settings
            .apply_toml(
                r#"
search_base_url = "http://api.internal:9000"
overlap_policy = "last_resolved_wins"
"#,
            )
            .expect("toml");

        assert_eq!(settings.search_base_url, "http://api.internal:9000");
        assert_eq!(settings.overlap_policy, OverlapPolicy::LastResolvedWins);
    }

    #[test]
    fn app_prefixed_env_wins_over_plain_env() {
        let env = HashMap::from([
            ("VIBE_SEARCH_URL", "http://plain:1"),
            ("APP__SEARCH_URL", "http://prefixed:2"),
            ("APP__OVERLAP_POLICY", "last_resolved_wins"),
        ]);
        let mut settings = ClientSettings::default();
        settings.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.search_base_url, "http://prefixed:2");
        assert_eq!(settings.overlap_policy, OverlapPolicy::LastResolvedWins);
    }

    #[test]
    fn unknown_policy_keeps_previous_value() {
        let mut settings = ClientSettings::default();
        settings.apply_env(|name| (name == "APP__OVERLAP_POLICY").then(|| "random".to_string()));
        assert_eq!(settings.overlap_policy, OverlapPolicy::LatestSubmittedWins);
    }
}
