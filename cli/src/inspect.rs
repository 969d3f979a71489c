#![deny(missing_docs)]

//! # Inspect Command
//!
//! Prints the expanded IR, which is exactly what the templates receive.

use crate::config::ProjectConfig;
use std::path::PathBuf;
use tamplier_core::{parse_and_expand, AppResult};

/// Output format of the IR dump.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// YAML.
    #[default]
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

/// Arguments for the inspect command.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct InspectArgs {
    /// Project configuration file (defaults to `tamplier.json` when present).
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// OpenAPI document (YAML or JSON).
    #[clap(long)]
    pub schema: Option<PathBuf>,

    /// Fail on object properties whose type cannot be expanded.
    #[clap(long)]
    pub strict: bool,

    /// Output format.
    #[clap(long, value_enum, default_value_t = Format::Yaml)]
    pub format: Format,
}

/// Expands the document and serializes the IR.
pub fn render(args: &InspectArgs) -> AppResult<String> {
    let mut config = ProjectConfig::load_or_default(args.config.as_deref())?;
    if let Some(schema) = &args.schema {
        config.schema = Some(schema.clone());
    }
    config.strict |= args.strict;

    let api = parse_and_expand(&config.read_schema()?, &config.expand_options())?;

    Ok(match args.format {
        Format::Yaml => serde_yaml::to_string(&api)?,
        Format::Json => serde_json::to_string_pretty(&api)?,
    })
}

/// Executes the inspection, printing to stdout.
pub fn execute(args: &InspectArgs) -> AppResult<()> {
    println!("{}", render(args)?);
    Ok(())
}
