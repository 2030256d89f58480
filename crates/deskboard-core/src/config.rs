use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A named profile selecting which buckets are visible on the board.
///
/// Matching against bucket titles is trimmed and case-insensitive so a
/// cosmetic rename on the server does not drop a bucket from view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    #[serde(default)]
    pub buckets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub board: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub personas: Vec<Persona>,
    #[serde(default)]
    pub default_persona: Option<String>,
}

fn default_api_base() -> String {
    "https://api.trello.com".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            board: None,
            api_key: None,
            api_token: None,
            personas: Vec::new(),
            default_persona: None,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/deskboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("deskboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("deskboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(path) {
                if let Ok(config) = toml::from_str(&content) {
                    return config;
                }
            }
        }
        Self::default()
    }

    /// Credentials resolve environment first, config file second.
    pub fn effective_api_key(&self) -> Option<String> {
        std::env::var("DESKBOARD_API_KEY")
            .ok()
            .or_else(|| self.api_key.clone())
    }

    pub fn effective_api_token(&self) -> Option<String> {
        std::env::var("DESKBOARD_API_TOKEN")
            .ok()
            .or_else(|| self.api_token.clone())
    }

    pub fn persona(&self, name: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.name == name)
    }

    pub fn effective_persona(&self, override_name: Option<&str>) -> Option<&Persona> {
        match override_name {
            Some(name) => self.persona(name),
            None => self
                .default_persona
                .as_deref()
                .and_then(|name| self.persona(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api_base, "https://api.trello.com");
        assert!(config.board.is_none());
        assert!(config.personas.is_empty());
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("nope.toml"));
        assert_eq!(config.api_base, "https://api.trello.com");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
board = "b0ard1d"

[[personas]]
name = "actuary"
buckets = ["Today", "This Week"]
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.board.as_deref(), Some("b0ard1d"));
        assert_eq!(config.personas.len(), 1);
        assert_eq!(config.personas[0].buckets.len(), 2);
    }

    #[test]
    fn test_load_from_malformed_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is not toml [[").unwrap();

        let config = AppConfig::load_from(&path);
        assert!(config.board.is_none());
    }

    #[test]
    fn test_effective_persona() {
        let config = AppConfig {
            personas: vec![
                Persona {
                    name: "a".to_string(),
                    buckets: vec!["One".to_string()],
                },
                Persona {
                    name: "b".to_string(),
                    buckets: vec!["Two".to_string()],
                },
            ],
            default_persona: Some("a".to_string()),
            ..Default::default()
        };

        assert_eq!(config.effective_persona(None).unwrap().name, "a");
        assert_eq!(config.effective_persona(Some("b")).unwrap().name, "b");
        assert!(config.effective_persona(Some("missing")).is_none());
    }
}
