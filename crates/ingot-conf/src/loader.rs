//! Document loading.
//!
//! Every source is parsed straight into a `serde_json::Value`, so object keys
//! keep document order. That order is significant: v5 `services` start in
//! the order they are written. Several sources are deep-merged in the order
//! given; later sources override earlier ones, keys already present keep
//! their position and new keys are appended.
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: accepts `.toml` documents
//! - `yaml-config` *(default)*: accepts `.yaml` / `.yml` documents
//!
//! # Environment Variable Mapping
//!
//! With [`DocumentLoader::with_env`], variables prefixed `INGOT_` are merged
//! last through figment, using `__` as the nesting separator:
//!
//! - `INGOT_LOG__LOGLEVEL=debug` → `log.loglevel = "debug"`

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::Env;
use ingot_core::{ConfigError, ConfigResult};
use serde_json::Value;
use tracing::{debug, info, trace};

/// Prefix of environment variables merged by [`DocumentLoader::with_env`].
pub const ENV_PREFIX: &str = "INGOT_";

/// Text format of a configuration document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentFormat {
    #[default]
    Json,
    #[cfg(feature = "toml-config")]
    Toml,
    #[cfg(feature = "yaml-config")]
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext.to_ascii_lowercase().as_str() {
            "json" | "jsonc" | "" => Ok(Self::Json),
            #[cfg(feature = "toml-config")]
            "toml" => Ok(Self::Toml),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ConfigError::parse(format!(
                "unsupported or disabled document format: .{ext}"
            ))),
        }
    }

    fn parse(self, text: &str) -> ConfigResult<Value> {
        match self {
            Self::Json => serde_json::from_str(text).map_err(ConfigError::parse),
            #[cfg(feature = "toml-config")]
            Self::Toml => toml::from_str(text).map_err(ConfigError::parse),
            #[cfg(feature = "yaml-config")]
            Self::Yaml => serde_yaml::from_str(text).map_err(ConfigError::parse),
        }
    }
}

/// Deep-merges `source` into `target`. Objects merge key by key; anything
/// else in `source` replaces the value in `target`.
pub fn merge_value(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

/// Loads configuration documents into a JSON value tree.
///
/// # Example
///
/// ```rust,ignore
/// let document = DocumentLoader::new()
///     .file("base.json")
///     .file("overrides.yaml")
///     .with_env()
///     .load()?;
/// ```
#[derive(Debug, Default)]
pub struct DocumentLoader {
    files: Vec<PathBuf>,
    load_env: bool,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document; later files override earlier ones.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files.push(path.as_ref().to_path_buf());
        self
    }

    /// Merges `INGOT_*` environment variables over the documents.
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Parses one document held in memory.
    pub fn parse_str(text: &str, format: DocumentFormat) -> ConfigResult<Value> {
        format.parse(text)
    }

    /// Reads and merges every configured source.
    pub fn load(self) -> ConfigResult<Value> {
        if self.files.is_empty() {
            return Err(ConfigError::parse("no configuration document given"));
        }

        let mut document = Value::Null;
        for path in &self.files {
            let format = DocumentFormat::from_path(path)?;
            if !path.exists() {
                return Err(ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{} does not exist", path.display()),
                )));
            }
            info!(path = %path.display(), ?format, "Loading configuration document");

            let text = std::fs::read_to_string(path)?;
            let value = format.parse(&text).map_err(|err| match err {
                ConfigError::DocumentParse { reason } => {
                    ConfigError::parse(format!("{}: {reason}", path.display()))
                }
                other => other,
            })?;
            merge_value(&mut document, value);
        }

        if self.load_env {
            trace!("Merging environment variables with {ENV_PREFIX} prefix");
            let overlay: Value = Figment::from(Env::prefixed(ENV_PREFIX).split("__"))
                .extract()
                .map_err(ConfigError::parse)?;
            merge_value(&mut document, overlay);
        }

        debug!(sources = self.files.len(), "Configuration documents merged");
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("config.json")).unwrap(),
            DocumentFormat::Json
        );
        assert!(DocumentFormat::from_path(Path::new("config.ini")).is_err());
    }

    #[test]
    fn test_parse_str_keeps_order() {
        let document = DocumentLoader::parse_str(
            r#"{ "services": { "stats": {}, "api": {} } }"#,
            DocumentFormat::Json,
        )
        .unwrap();
        let keys: Vec<_> = document["services"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["stats", "api"]);
    }

    #[test]
    fn test_merge_keeps_positions() {
        let mut target = json!({ "services": { "stats": {}, "policy": { "levels": {} } }, "log": {} });
        merge_value(
            &mut target,
            json!({ "services": { "reverse": {}, "stats": { "enabled": true } }, "log": null }),
        );
        let keys: Vec<_> = target["services"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["stats", "policy", "reverse"]);
        assert_eq!(target["services"]["stats"]["enabled"], true);
        assert!(target["log"].is_null());
    }

    #[test]
    fn test_missing_file() {
        let err = DocumentLoader::new()
            .file("/nonexistent/ingot.json")
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(DocumentLoader::new().load().is_err());
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_parse_toml_keeps_order() {
        let document = DocumentLoader::parse_str(
            "[log]\nloglevel = \"debug\"\n\n[services.stats]\n\n[services.api]\ntag = \"api\"\n",
            DocumentFormat::Toml,
        )
        .unwrap();
        assert_eq!(document["log"], json!({ "loglevel": "debug" }));
        let keys: Vec<_> = document["services"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["stats", "api"]);
    }

    #[cfg(feature = "yaml-config")]
    #[test]
    fn test_parse_yaml_keeps_order() {
        let document = DocumentLoader::parse_str(
            "services:\n  stats: {}\n  policy: {}\n  reverse: {}\n",
            DocumentFormat::Yaml,
        )
        .unwrap();
        let keys: Vec<_> = document["services"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["stats", "policy", "reverse"]);
    }
}
