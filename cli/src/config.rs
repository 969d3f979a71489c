#![deny(missing_docs)]

//! # Project Configuration
//!
//! Loads `tamplier.json` and merges command line overrides on top of it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tamplier_core::{AppError, AppResult, ExpandOptions, OutputLayout, TypeVocabulary};

/// Configuration file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "tamplier.json";

/// Contents of a project configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// OpenAPI document to generate from.
    #[serde(alias = "yml")]
    pub schema: Option<PathBuf>,
    /// Output directory.
    pub output: PathBuf,
    /// Template bundle directory.
    pub templates: PathBuf,
    /// Fail on unexpandable object properties.
    pub strict: bool,
    /// Type spelling overrides.
    pub types: TypeVocabulary,
    /// Template and output layout overrides.
    pub layout: OutputLayout,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            schema: None,
            output: PathBuf::from("Generated"),
            templates: PathBuf::from(".templates"),
            strict: false,
            types: TypeVocabulary::default(),
            layout: OutputLayout::default(),
        }
    }
}

impl ProjectConfig {
    /// Reads a configuration file, resolving its relative paths against the file's directory.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::General(format!("Failed to read config {:?}: {}", path, e))
        })?;
        let mut config: Self = serde_json::from_str(&content)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.schema = config.schema.map(|p| resolve(base, p));
        config.output = resolve(base, config.output);
        config.templates = resolve(base, config.templates);

        tracing::debug!(path = ?path, "loaded project configuration");
        Ok(config)
    }

    /// Loads `path`, or `tamplier.json` if present, or the defaults.
    pub fn load_or_default(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG).is_file() => Self::load(Path::new(DEFAULT_CONFIG)),
            None => Ok(Self::default()),
        }
    }

    /// The document path; it has no default.
    pub fn schema_path(&self) -> AppResult<&Path> {
        self.schema.as_deref().ok_or_else(|| {
            AppError::General(
                "No OpenAPI document given: pass --schema or set `schema` in the config".into(),
            )
        })
    }

    /// Reads the OpenAPI document.
    pub fn read_schema(&self) -> AppResult<String> {
        let path = self.schema_path()?;
        if !path.exists() {
            return Err(AppError::General(format!(
                "OpenAPI file not found: {:?}",
                path
            )));
        }
        fs::read_to_string(path)
            .map_err(|e| AppError::General(format!("Failed to read OpenAPI: {}", e)))
    }

    /// Expansion knobs derived from this configuration.
    pub fn expand_options(&self) -> ExpandOptions {
        ExpandOptions {
            vocabulary: self.types.clone(),
            strict: self.strict,
        }
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
