use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

// ── Profile ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Backend base URL for REST calls
    pub server: String,
    /// Event-channel base URL. Derived from `server` (http→ws + "/ws") when
    /// not set explicitly.
    #[serde(default)]
    pub ws_url: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            server: "http://localhost:8000".to_string(),
            ws_url: None,
        }
    }
}

// ── Config file ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Which profile to use when none is specified
    #[serde(default = "default_profile_name")]
    pub default_profile: String,

    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

fn default_profile_name() -> String {
    "default".to_string()
}

// The serde attribute only covers deserialization; keep the in-memory
// default in agreement with it.
impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            default_profile: default_profile_name(),
            profiles: HashMap::new(),
        }
    }
}

impl ConfigFile {
    /// Load from disk, or return a default config if the file doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))
    }

    /// Write a starter config file to disk (only if it doesn't exist).
    pub fn write_default_if_missing() -> Result<PathBuf> {
        let path = config_path();
        if path.exists() {
            return Ok(path);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, DEFAULT_CONFIG_TOML)?;
        Ok(path)
    }

    /// Resolve the active profile given an optional override name.
    pub fn resolve_profile(&self, name: Option<&str>) -> Option<&Profile> {
        let key = name.unwrap_or(&self.default_profile);
        self.profiles.get(key)
    }
}

// ── Resolved runtime config (after merging file + CLI overrides) ──────────────

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub server: String,
    pub ws_url: String,
    /// Profile name that was resolved (for display)
    pub profile_name: String,
}

impl ResolvedConfig {
    /// Merge config file profile with CLI overrides.
    /// Priority: CLI args > env vars (handled by clap) > config file profile > built-in defaults
    pub fn resolve(
        file: &ConfigFile,
        profile_override: Option<&str>,
        server_override: Option<&str>,
        ws_url_override: Option<&str>,
    ) -> Self {
        let profile_name = profile_override
            .unwrap_or(&file.default_profile)
            .to_string();

        let base = file
            .resolve_profile(profile_override)
            .cloned()
            .unwrap_or_default();

        let server = server_override
            .map(str::to_string)
            .unwrap_or(base.server);
        let ws_url = ws_url_override
            .map(str::to_string)
            .or(base.ws_url)
            .unwrap_or_else(|| derive_ws_url(&server));

        Self { server, ws_url, profile_name }
    }
}

/// `http://host:port` → `ws://host:port/ws` (and https → wss).
fn derive_ws_url(server: &str) -> String {
    let trimmed = server.trim_end_matches('/');
    let swapped = if let Some(rest) = trimmed.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = trimmed.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        format!("ws://{trimmed}")
    };
    format!("{swapped}/ws")
}

// ── Paths ─────────────────────────────────────────────────────────────────────

pub fn config_path() -> PathBuf {
    dirs_config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("agentdeck")
        .join("config.toml")
}

fn dirs_config_dir() -> Option<PathBuf> {
    // XDG_CONFIG_HOME or ~/.config on Linux/macOS
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
}

// ── Default config template written on first run ──────────────────────────────

const DEFAULT_CONFIG_TOML: &str = r#"# agentdeck configuration
# Run `agentdeck --init` to regenerate this file.

default_profile = "local"

# ── Local backend (default) ───────────────────────────────────────────────────
[profiles.local]
server = "http://localhost:8000"
# ws_url is derived from server ("ws://localhost:8000/ws") unless set:
# ws_url = "ws://localhost:8000/ws"

# ── Remote backend example ────────────────────────────────────────────────────
# [profiles.remote]
# server = "https://agent.example.com"
# ws_url = "wss://agent.example.com/ws"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn ws_url_derived_from_server_scheme() {
        assert_eq!(derive_ws_url("http://localhost:8000"), "ws://localhost:8000/ws");
        assert_eq!(derive_ws_url("https://agent.example.com/"), "wss://agent.example.com/ws");
    }

    #[test]
    fn resolve_prefers_overrides_over_profile() {
        let mut file = ConfigFile::default();
        file.default_profile = "local".to_string();
        file.profiles.insert(
            "local".to_string(),
            Profile { server: "http://backend:9000".to_string(), ws_url: None },
        );

        let resolved = ResolvedConfig::resolve(&file, None, None, None);
        assert_eq!(resolved.server, "http://backend:9000");
        assert_eq!(resolved.ws_url, "ws://backend:9000/ws");
        assert_eq!(resolved.profile_name, "local");

        let resolved = ResolvedConfig::resolve(&file, None, Some("http://other:1"), Some("ws://x/ws"));
        assert_eq!(resolved.server, "http://other:1");
        assert_eq!(resolved.ws_url, "ws://x/ws");
    }

    #[test]
    fn default_config_resolves_named_profile() {
        let resolved = ResolvedConfig::resolve(&ConfigFile::default(), None, None, None);
        assert_eq!(resolved.profile_name, "default");
        assert_eq!(resolved.server, "http://localhost:8000");
    }

    #[test]
    fn unknown_profile_falls_back_to_defaults() {
        let file = ConfigFile::default();
        let resolved = ResolvedConfig::resolve(&file, Some("nope"), None, None);
        assert_eq!(resolved.server, "http://localhost:8000");
        assert_eq!(resolved.profile_name, "nope");
    }

    #[test]
    fn load_from_parses_profiles() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            tmp,
            "default_profile = \"remote\"\n[profiles.remote]\nserver = \"https://a.example\"\nws_url = \"wss://a.example/ws\""
        )
        .unwrap();

        let file = ConfigFile::load_from(tmp.path()).unwrap();
        assert_eq!(file.default_profile, "remote");
        let profile = file.resolve_profile(None).unwrap();
        assert_eq!(profile.server, "https://a.example");
        assert_eq!(profile.ws_url.as_deref(), Some("wss://a.example/ws"));
    }

    #[test]
    fn missing_file_yields_default_config() {
        let file = ConfigFile::load_from(Path::new("/nonexistent/agentdeck.toml")).unwrap();
        assert_eq!(file.default_profile, "default");
        assert!(file.profiles.is_empty());
    }

    #[test]
    fn default_template_parses() {
        let file: ConfigFile = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(file.default_profile, "local");
        assert!(file.profiles.contains_key("local"));
    }
}
