use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const DEFAULT_BOT_NAME: &str = "Shadow Scribe";

pub const DEFAULT_PERSONA: &str = "You are a persona named 'Shadow Scribe.' Your purpose is to take \
the user's text, correct all grammatical errors, and then rewrite it with a casual but serious tone, \
as if you're a knowledgeable mentor. Use words like 'fear,' 'legacy,' and 'echo.' Your sentences \
should be easy to understand and conversational. Do not break character.";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// The persisted settings record: bot display name, persona instructions,
/// API credential, and the provider endpoint/model to talk to.
///
/// Every field is optional on disk; missing or empty fields fall back to the
/// built-in defaults at load time, so a partially written or absent config
/// file is never fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_persona")]
    pub persona: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_name() -> String {
    DEFAULT_BOT_NAME.to_string()
}

fn default_persona() -> String {
    DEFAULT_PERSONA.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            persona: default_persona(),
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
        }
    }
}

/// Errors that can occur when loading configuration from disk.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the configuration file as valid TOML.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(
                    f,
                    "Failed to read config at {}: {}",
                    path_display(path),
                    source
                )
            }
            ConfigError::Parse { path, source } => {
                write!(
                    f,
                    "Failed to parse config at {}: {}",
                    path_display(path),
                    source
                )
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl Config {
    /// Load the config from the platform config directory.
    ///
    /// Load failures are logged to the diagnostic stream and otherwise
    /// ignored; the defaults win.
    pub fn load() -> Config {
        let path = Self::config_path();
        match Self::load_from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{e}; falling back to defaults");
                Config::default()
            }
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        let mut config: Config =
            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: config_path.to_path_buf(),
                source,
            })?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn StdError>> {
        self.save_to_path(&Self::config_path())
    }

    pub(crate) fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn StdError>> {
        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };

        temp_file.write_all(contents.as_bytes())?;
        temp_file.as_file_mut().sync_all()?;
        temp_file
            .persist(config_path)
            .map_err(|err| -> Box<dyn StdError> { Box::new(err) })?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let proj_dirs = ProjectDirs::from("org", "permacommons", "scrive")
            .expect("Failed to determine config directory");
        proj_dirs.config_dir().join("config.toml")
    }

    /// The persona must never be empty: blank persisted fields fall back to
    /// the built-in defaults, matching the absent-field behavior.
    fn normalize(&mut self) {
        if self.name.trim().is_empty() {
            self.name = default_name();
        }
        if self.persona.trim().is_empty() {
            self.persona = default_persona();
        }
        if self.base_url.trim().is_empty() {
            self.base_url = default_base_url();
        }
        if self.model.trim().is_empty() {
            self.model = default_model();
        }
        if let Some(key) = &self.api_key {
            if key.trim().is_empty() {
                self.api_key = None;
            }
        }
    }
}

/// Get a user-friendly display string for a path, using ~ notation on
/// Unix-like systems when the path lives under the home directory.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_path(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.name, DEFAULT_BOT_NAME);
        assert_eq!(config.persona, DEFAULT_PERSONA);
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "name = \"Quill\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.name, "Quill");
        assert_eq!(config.persona, DEFAULT_PERSONA);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn blank_persona_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "persona = \"  \"\napi_key = \"\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.persona, DEFAULT_PERSONA);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.name = "Archivist".to_string();
        config.persona = "Answer tersely.".to_string();
        config.api_key = Some("sk-test".to_string());
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.name, "Archivist");
        assert_eq!(loaded.persona, "Answer tersely.");
        assert_eq!(loaded.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "name = [not toml").unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
