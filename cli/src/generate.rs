#![deny(missing_docs)]

//! # Generate Command
//!
//! Full pipeline: document -> IR -> templates -> output directory.
//!
//! Nothing is written until every template rendered, so a failed run leaves the
//! output directory untouched.

use crate::config::ProjectConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tamplier_core::{generate, parse_and_expand, AppError, AppResult, RenderedFile, TeraRenderer};

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Project configuration file (defaults to `tamplier.json` when present).
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// OpenAPI document (YAML or JSON).
    #[clap(long)]
    pub schema: Option<PathBuf>,

    /// Output directory.
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Template bundle directory.
    #[clap(long)]
    pub templates: Option<PathBuf>,

    /// Fail on object properties whose type cannot be expanded.
    #[clap(long)]
    pub strict: bool,

    /// Clear a non-empty output directory before writing.
    #[clap(long)]
    pub force: bool,
}

impl GenerateArgs {
    /// Merges the flags over the project configuration.
    pub fn resolve_config(&self) -> AppResult<ProjectConfig> {
        let mut config = ProjectConfig::load_or_default(self.config.as_deref())?;
        if let Some(schema) = &self.schema {
            config.schema = Some(schema.clone());
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(templates) = &self.templates {
            config.templates = templates.clone();
        }
        config.strict |= self.strict;
        Ok(config)
    }
}

/// Executes the generation.
pub fn execute(args: &GenerateArgs) -> AppResult<()> {
    let config = args.resolve_config()?;

    let content = config.read_schema()?;
    let api = parse_and_expand(&content, &config.expand_options())?;

    let renderer = TeraRenderer::from_dir(&config.templates)?;
    let files = generate(&api, &renderer, &config.layout)?;

    write_output(&config.output, &files, args.force)?;

    tracing::info!(files = files.len(), output = ?config.output, "generation finished");
    println!("Generated {} files in {:?}", files.len(), config.output);

    Ok(())
}

/// Writes the rendered files below `dir`.
///
/// # Arguments
///
/// * `dir` - Output directory, created if missing.
/// * `files` - Files with paths relative to `dir`.
/// * `force` - Clear `dir` first if it is not empty; without it a non-empty `dir` is an error.
pub fn write_output(dir: &Path, files: &[RenderedFile], force: bool) -> AppResult<()> {
    prepare_output_dir(dir, force)?;

    for file in files {
        let path = dir.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::General(format!("Failed to create {:?}: {}", parent, e)))?;
        }
        fs::write(&path, &file.contents)
            .map_err(|e| AppError::General(format!("Failed to write {:?}: {}", path, e)))?;
        tracing::debug!(path = ?path, "wrote file");
    }

    Ok(())
}

fn prepare_output_dir(dir: &Path, force: bool) -> AppResult<()> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(AppError::General(format!(
                "Output path {:?} is not a directory",
                dir
            )));
        }

        let non_empty = fs::read_dir(dir)?.next().is_some();
        if non_empty {
            if !force {
                return Err(AppError::General(format!(
                    "Output directory {:?} is not empty; pass --force to overwrite it",
                    dir
                )));
            }
            tracing::warn!(dir = ?dir, "clearing output directory");
            fs::remove_dir_all(dir)?;
        }
    }

    fs::create_dir_all(dir)?;
    Ok(())
}
