use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

pub const TMDB_KEY_VAR: &str = "TMDB_API_KEY";
pub const YOUTUBE_KEY_VAR: &str = "YOUTUBE_API_KEY";

fn project_dirs() -> Option<ProjectDirs> {
  ProjectDirs::from("", "", "cinedex")
}

/// Persisted user preferences (`prefs.toml` in the platform config dir).
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct Config {
  pub theme_name: Option<String>,
  pub display_mode: Option<String>,
}

impl Config {
  pub fn load() -> Self {
    if let Some(proj_dirs) = project_dirs() {
      let config_file = proj_dirs.config_dir().join("prefs.toml");
      if let Ok(content) = std::fs::read_to_string(config_file)
        && let Ok(config) = toml::from_str(&content)
      {
        return config;
      }
    }
    Self::default()
  }

  pub fn save(&self) {
    if let Some(proj_dirs) = project_dirs() {
      let config_dir = proj_dirs.config_dir();
      if std::fs::create_dir_all(config_dir).is_ok() {
        let config_file = config_dir.join("prefs.toml");
        if let Ok(content) = toml::to_string(self) {
          let _ = std::fs::write(config_file, content);
        }
      }
    }
  }
}

/// Directory for the rolling log file.
pub fn log_dir() -> Option<std::path::PathBuf> {
  project_dirs().map(|d| d.data_local_dir().join("logs"))
}

/// API keys for the two remote services. Either may be absent; requests that
/// need a missing key fail when they are made.
#[derive(Clone, Default)]
pub struct Credentials {
  pub tmdb_api_key: Option<String>,
  pub youtube_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Credentials")
      .field("tmdb_api_key", &self.tmdb_api_key.as_ref().map(|_| "<set>"))
      .field("youtube_api_key", &self.youtube_api_key.as_ref().map(|_| "<set>"))
      .finish()
  }
}

impl Credentials {
  pub fn from_env() -> Self {
    Self::from_lookup(|name| std::env::var(name).ok())
  }

  /// Build from an arbitrary variable lookup, logging each missing key once.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let read = |name: &str| {
      let value = lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
      if value.is_none() {
        error!(var = name, "API key is not configured; requests that need it will fail");
      }
      value
    };
    let creds = Self { tmdb_api_key: read(TMDB_KEY_VAR), youtube_api_key: read(YOUTUBE_KEY_VAR) };
    info!(?creds, "credentials loaded");
    creds
  }

  /// Names of the variables that were not set.
  pub fn missing(&self) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if self.tmdb_api_key.is_none() {
      missing.push(TMDB_KEY_VAR);
    }
    if self.youtube_api_key.is_none() {
      missing.push(YOUTUBE_KEY_VAR);
    }
    missing
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn credentials_from_lookup() {
    let creds = Credentials::from_lookup(|name| match name {
      TMDB_KEY_VAR => Some("abc".to_string()),
      YOUTUBE_KEY_VAR => Some("   ".to_string()),
      _ => None,
    });
    assert_eq!(creds.tmdb_api_key.as_deref(), Some("abc"));
    assert_eq!(creds.youtube_api_key, None);
    assert_eq!(creds.missing(), [YOUTUBE_KEY_VAR]);
  }

  #[test]
  fn credentials_absent_is_not_fatal() {
    let creds = Credentials::from_lookup(|_| None);
    assert_eq!(creds.missing(), [TMDB_KEY_VAR, YOUTUBE_KEY_VAR]);
  }

  #[test]
  fn debug_hides_key_values() {
    let creds = Credentials { tmdb_api_key: Some("secret".to_string()), youtube_api_key: None };
    let out = format!("{:?}", creds);
    assert!(!out.contains("secret"));
    assert!(out.contains("<set>"));
  }

  #[test]
  fn prefs_toml_round_trip() {
    let config = Config { theme_name: Some("Noir".to_string()), display_mode: None };
    let text = toml::to_string(&config).unwrap();
    let back: Config = toml::from_str(&text).unwrap();
    assert_eq!(back.theme_name.as_deref(), Some("Noir"));
    assert_eq!(back.display_mode, None);
  }
}
