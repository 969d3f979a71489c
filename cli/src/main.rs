#![deny(missing_docs)]

//! # Tamplier CLI
//!
//! Command Line Interface of the OpenAPI client generator.
//!
//! Supported Commands:
//! - `generate`: Renders a template bundle from an OpenAPI document.
//! - `inspect`: Prints the expanded intermediate representation.

use clap::{Parser, Subcommand};
use tamplier_core::AppResult;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod generate;
mod inspect;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI client generator")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate client sources from an OpenAPI document.
    Generate(generate::GenerateArgs),
    /// Print the expanded API model.
    Inspect(inspect::InspectArgs),
}

fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "info".to_string(),
            2 => "info,tamplier_core=debug,tamplier=debug".to_string(),
            _ => "debug,tamplier_core=trace,tamplier=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
        Commands::Inspect(args) => inspect::execute(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_flags() {
        let cli = Cli::try_parse_from([
            "tamplier", "-vv", "generate", "--schema", "api.yml", "--force",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.schema.as_deref(), Some(std::path::Path::new("api.yml")));
                assert!(args.force);
                assert!(!args.strict);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_inspect_format() {
        let cli = Cli::try_parse_from(["tamplier", "inspect", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Inspect(args) => assert_eq!(args.format, inspect::Format::Json),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
