//! Configuration handling for feedsplit
//!
//! Reads an optional `feedsplit.toml`:
//!
//! ```toml
//! [server]
//! port = 8080
//!
//! [dispatch]
//! lookahead = 4
//!
//! [renderers.PhotoPost]
//! source = "template"
//! path = "modules/PhotoPost.toml"
//! ```
//!
//! Kinds without a `[renderers.*]` entry use the built-in renderer.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use feedsplit_core::{DEFAULT_LOOKAHEAD, Kind, LoaderTable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::renderers::{BuiltinLoader, TemplateLoader};

/// Default file name looked up when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "feedsplit.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("[renderers.{0}]: unknown kind")]
    UnknownKind(String),

    #[error("[dispatch] lookahead must be at least 1")]
    ZeroLookahead,
}

/// feedsplit configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Renderer source per kind name
    #[serde(default)]
    pub renderers: BTreeMap<String, RendererSource>,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to bind on 127.0.0.1
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Dispatcher settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Items whose renderers may resolve ahead of the one being rendered
    #[serde(default = "default_lookahead")]
    pub lookahead: usize,
}

/// Where the renderer for a kind comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum RendererSource {
    Builtin,
    Template { path: PathBuf },
}

fn default_port() -> u16 {
    8080
}

fn default_lookahead() -> usize {
    DEFAULT_LOOKAHEAD
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            lookahead: default_lookahead(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|err| match err {
            ParseFailure::Toml(source) => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            ParseFailure::Invalid(err) => err,
        })
    }

    /// Load `path` when given, else `feedsplit.toml` in the working directory
    /// if it exists, else defaults
    ///
    /// Returns the directory template paths are relative to.
    pub fn load_or_default(path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok((Config::default(), PathBuf::from(".")));
                }
                fallback
            }
        };
        let config = Self::load(&path)?;
        let base_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Ok((config, base_dir))
    }

    fn parse(content: &str) -> Result<Self, ParseFailure> {
        let config: Config = toml::from_str(content).map_err(ParseFailure::Toml)?;
        config.validate().map_err(ParseFailure::Invalid)?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dispatch.lookahead == 0 {
            return Err(ConfigError::ZeroLookahead);
        }
        for name in self.renderers.keys() {
            name.parse::<Kind>()
                .map_err(|_| ConfigError::UnknownKind(name.clone()))?;
        }
        Ok(())
    }

    /// Build the registry's loader table
    ///
    /// Every kind starts built-in; `[renderers.*]` entries replace it.
    pub fn loader_table(&self, base_dir: &Path) -> Result<LoaderTable, ConfigError> {
        let mut table = LoaderTable::new();
        for kind in Kind::ALL {
            table.insert(kind, Arc::new(BuiltinLoader));
        }
        for (name, source) in &self.renderers {
            let kind: Kind = name
                .parse()
                .map_err(|_| ConfigError::UnknownKind(name.clone()))?;
            match source {
                RendererSource::Builtin => {
                    table.insert(kind, Arc::new(BuiltinLoader));
                }
                RendererSource::Template { path } => {
                    table.insert(kind, Arc::new(TemplateLoader::new(base_dir.join(path))));
                }
            }
        }
        Ok(table)
    }
}

enum ParseFailure {
    Toml(toml::de::Error),
    Invalid(ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(content: &str) -> Result<Config, ConfigError> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        Config::load(file.path())
    }

    #[test]
    fn test_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.dispatch.lookahead, DEFAULT_LOOKAHEAD);
        assert!(config.renderers.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = parse(
            r#"
[server]
port = 9000

[dispatch]
lookahead = 1

[renderers.TextPost]
source = "builtin"

[renderers.PhotoPost]
source = "template"
path = "modules/PhotoPost.toml"
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.dispatch.lookahead, 1);
        assert_eq!(
            config.renderers.get("TextPost"),
            Some(&RendererSource::Builtin)
        );
        assert_eq!(
            config.renderers.get("PhotoPost"),
            Some(&RendererSource::Template {
                path: PathBuf::from("modules/PhotoPost.toml")
            })
        );
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = parse("[renderers.VideoPost]\nsource = \"builtin\"").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKind(ref name) if name == "VideoPost"));
    }

    #[test]
    fn test_unknown_source_rejected() {
        let err = parse("[renderers.TextPost]\nsource = \"wasm\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_template_requires_path() {
        let err = parse("[renderers.TextPost]\nsource = \"template\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_zero_lookahead_rejected() {
        let err = parse("[dispatch]\nlookahead = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroLookahead));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_or_default_uses_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedsplit.toml");
        fs::write(&path, "[server]\nport = 1234\n").unwrap();

        let (config, base_dir) = Config::load_or_default(Some(path.as_path())).unwrap();
        assert_eq!(config.server.port, 1234);
        assert_eq!(base_dir, dir.path());
    }

    #[test]
    fn test_loader_table_covers_every_kind() {
        let table = Config::default().loader_table(Path::new(".")).unwrap();
        assert_eq!(table.len(), Kind::ALL.len());
        for kind in Kind::ALL {
            assert_eq!(table.get(kind).unwrap().describe(), "builtin");
        }
    }

    #[test]
    fn test_loader_table_template_override() {
        let config = parse("[renderers.PhotoPost]\nsource = \"template\"\npath = \"p.toml\"").unwrap();
        let table = config.loader_table(Path::new("/etc/feedsplit")).unwrap();
        assert_eq!(table.get(Kind::TextPost).unwrap().describe(), "builtin");
        assert_eq!(
            table.get(Kind::PhotoPost).unwrap().describe(),
            "/etc/feedsplit/p.toml"
        );
    }
}
