//! buildkit-provider - local host for the BuildKit provider core.
//!
//! Runs the provider lifecycle from the command line: print metadata and the
//! configuration schema, validate a configuration file, and list the
//! registered capabilities.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use buildkit_provider::{Provider, ProviderError, RawConfig, APP_NAME, VERSION};

/// BuildKit provider configuration and capability host
#[derive(Parser)]
#[command(name = "buildkit-provider")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the provider type name and version
    Metadata {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print the configuration schema
    Schema {
        /// Output format (json, toml)
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// Validate a provider configuration file
    Validate {
        /// Configuration file (.toml, .json, .yaml); defaults to discovery
        path: Option<String>,

        /// Override the BuildKit daemon address
        #[arg(long, env = "BUILDKIT_HOST")]
        buildkit_host: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List registered capabilities by category
    Capabilities {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    let provider = Provider::new(VERSION);

    match cli.command {
        Commands::Metadata { format } => cmd_metadata(&provider, &format)?,
        Commands::Schema { format } => cmd_schema(&provider, &format)?,
        Commands::Validate { path, buildkit_host, format } => {
            cmd_validate(&provider, path.as_deref(), buildkit_host, &format)?;
        }
        Commands::Capabilities { format } => cmd_capabilities(&provider, &format)?,
        Commands::Completions { shell } => cmd_completions(shell),
    }

    Ok(())
}

/// Show provider metadata.
fn cmd_metadata(provider: &Provider, format: &str) -> Result<()> {
    let metadata = provider.metadata();
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&metadata)?),
        _ => println!("{} {}", metadata.type_name, metadata.version),
    }
    Ok(())
}

/// Print the configuration schema.
fn cmd_schema(provider: &Provider, format: &str) -> Result<()> {
    let schema = provider.schema();
    let rendered = match format {
        "json" => serde_json::to_string_pretty(schema)?,
        "toml" => toml::to_string_pretty(schema)?,
        other => anyhow::bail!("Unknown schema format '{other}' (expected json or toml)"),
    };
    println!("{rendered}");
    Ok(())
}

/// Validate a configuration and print the canonical result.
fn cmd_validate(
    provider: &Provider,
    path: Option<&str>,
    buildkit_host: Option<String>,
    format: &str,
) -> Result<()> {
    let mut raw = match path {
        Some(path) => {
            let expanded = PathBuf::from(shellexpand::tilde(path).into_owned());
            RawConfig::from_file(&expanded)?
        }
        None => RawConfig::load()?,
    };

    if let Some(host) = buildkit_host {
        tracing::debug!(buildkit_host = %host, "Overriding buildkit_host");
        raw.buildkit_host = Some(host);
    }

    let config = match provider.configure(&raw) {
        Ok(config) => config,
        Err(diagnostics) => {
            if format == "json" {
                let report = serde_json::json!({ "valid": false, "diagnostics": diagnostics });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            return Err(ProviderError::Rejected(diagnostics).into());
        }
    };

    match format {
        "json" => {
            let report = serde_json::json!({ "valid": true, "config": config.as_ref() });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("✓ Configuration valid");
            let default_marker = if config.uses_default_host() { " (default)" } else { "" };
            println!("  buildkit_host: {}{}", config.buildkit_host(), default_marker);
            println!("  registry_auth: {} entries", config.registry_auth().len());
            for auth in config.registry_auth() {
                println!(
                    "    - {} (username: {}, password: {})",
                    auth.address(),
                    auth.username(),
                    auth.password()
                );
            }
        }
    }

    Ok(())
}

/// List registered capabilities.
fn cmd_capabilities(provider: &Provider, format: &str) -> Result<()> {
    let summary = provider.registry().summary();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => {
            for category in &summary {
                println!("{} ({})", category.kind.plural(), category.names.len());
                if category.names.is_empty() {
                    println!("  (none)");
                }
                for name in &category.names {
                    println!("  {name}");
                }
            }
            println!("\nTotal: {} capabilities", provider.registry().len());
        }
    }

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, APP_NAME, &mut io::stdout());
}
