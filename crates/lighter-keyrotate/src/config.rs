/*
[INPUT]:  YAML settings document (operator-edited)
[OUTPUT]: Typed settings values and field-preserving persistence
[POS]:    Configuration layer - rotation tool settings store
[UPDATE]: When the settings document schema changes
*/

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the settings store
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write config at {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("missing required setting: {0}")]
    Missing(&'static str),
}

/// The operator's settings document.
///
/// Only the `exchanges.lighter` section is modeled; everything else in the
/// document round-trips untouched through the flattened maps. The value is
/// immutable during a run: the orchestrator derives the post-rotation
/// document with [`Settings::with_rotated_key`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub exchanges: Exchanges,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchanges {
    pub lighter: LighterSettings,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// The `exchanges.lighter` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LighterSettings {
    pub base_url: String,
    #[serde(default)]
    pub wallet_private_key: String,
    #[serde(default)]
    pub account_index: Option<i64>,
    #[serde(default)]
    pub api_key_index: u8,
    #[serde(default)]
    pub api_key_private_key: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Settings {
    /// Load the settings document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Persist the settings document, replacing the file atomically.
    ///
    /// The document is serialized next to the target as `<name>.tmp` and
    /// renamed over it, so a crash mid-write never leaves a torn file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let serialized = serde_yaml::to_string(self)?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = std::path::PathBuf::from(tmp);

        let write_err = |source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        };
        fs::write(&tmp, serialized).map_err(write_err)?;
        fs::rename(&tmp, path).map_err(write_err)?;
        Ok(())
    }

    /// Derive the post-rotation document: the resolved account index becomes
    /// authoritative and the new private key replaces the old one.
    pub fn with_rotated_key(&self, account_index: i64, api_key_private_key: String) -> Self {
        let mut updated = self.clone();
        updated.exchanges.lighter.account_index = Some(account_index);
        updated.exchanges.lighter.api_key_private_key = api_key_private_key;
        updated
    }
}

impl LighterSettings {
    /// Check the invariant that must hold before any rotation attempt
    pub fn require_wallet_key(&self) -> Result<&str, ConfigError> {
        let key = self.wallet_private_key.trim();
        if key.is_empty() {
            return Err(ConfigError::Missing("exchanges.lighter.wallet_private_key"));
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    const SAMPLE: &str = r#"
log_level: debug
exchanges:
  lighter:
    base_url: "https://mainnet.zklighter.elliot.ai"
    wallet_private_key: "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
    account_index: null
    api_key_index: 2
    api_key_private_key: ""
    leverage: 3
  binance:
    api_key: "abc"
"#;

    fn temp_config(content: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("keyrotate-test-{}.yaml", Uuid::new_v4()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_parses_lighter_section() {
        let path = temp_config(SAMPLE);
        let settings = Settings::load(&path).unwrap();

        let lighter = &settings.exchanges.lighter;
        assert_eq!(lighter.base_url, "https://mainnet.zklighter.elliot.ai");
        assert_eq!(lighter.account_index, None);
        assert_eq!(lighter.api_key_index, 2);
        assert!(lighter.api_key_private_key.is_empty());
        assert!(lighter.require_wallet_key().is_ok());

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load("/nonexistent/config.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_malformed_document() {
        let path = temp_config("exchanges: [not, a, mapping]");
        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_save_load_round_trip_preserves_foreign_fields() {
        let path = temp_config(SAMPLE);
        let settings = Settings::load(&path).unwrap();
        settings.save(&path).unwrap();

        let reloaded = Settings::load(&path).unwrap();
        assert_eq!(
            reloaded.extra.get("log_level"),
            Some(&serde_yaml::Value::String("debug".to_string()))
        );
        assert!(reloaded.exchanges.extra.contains_key("binance"));
        assert_eq!(
            reloaded.exchanges.lighter.extra.get("leverage"),
            Some(&serde_yaml::Value::Number(3.into()))
        );
        assert_eq!(
            reloaded.exchanges.lighter.wallet_private_key,
            settings.exchanges.lighter.wallet_private_key
        );

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_with_rotated_key_touches_only_rotated_fields() {
        let path = temp_config(SAMPLE);
        let settings = Settings::load(&path).unwrap();

        let updated = settings.with_rotated_key(5, "0xnewkey".to_string());
        assert_eq!(updated.exchanges.lighter.account_index, Some(5));
        assert_eq!(updated.exchanges.lighter.api_key_private_key, "0xnewkey");
        assert_eq!(updated.exchanges.lighter.api_key_index, 2);
        assert_eq!(
            updated.exchanges.lighter.wallet_private_key,
            settings.exchanges.lighter.wallet_private_key
        );
        // the source value is untouched
        assert_eq!(settings.exchanges.lighter.account_index, None);

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_require_wallet_key_rejects_blank() {
        let path = temp_config(SAMPLE.replace("0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80", "  ").as_str());
        let settings = Settings::load(&path).unwrap();
        let err = settings.exchanges.lighter.require_wallet_key().unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let path = temp_config(SAMPLE);
        let settings = Settings::load(&path).unwrap();
        settings.save(&path).unwrap();

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        assert!(!PathBuf::from(tmp).exists());

        fs::remove_file(path).unwrap();
    }
}
