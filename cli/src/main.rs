//! schemabridge CLI - Main entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use schemabridge_cli::commands::{
    ddl::DdlCommandOptions, extract::ExtractOptions, model::ModelOptions,
    overrides::ModelOverrides,
};
use schemabridge_cli::config::{Config, Naming};
use schemabridge_cli::{logging, output};
use schemabridge_types::Dialect;

/// schemabridge - C# models <-> relational tables
#[derive(Parser, Debug)]
#[command(name = "schemabridge")]
#[command(author, version, about = "Map C# model classes to table schemas and back", long_about = None)]
struct Cli {
    /// Path to config file (default: schemabridge.toml when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log debug events to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new schemabridge.toml configuration file
    Init {
        /// Database dialect (mysql, sqlserver)
        #[arg(short, long, default_value = "sqlserver", value_parser = parse_dialect)]
        dialect: Dialect,
    },

    /// Extract tables from C# model source files into a JSON schema snapshot
    Extract {
        /// Model source files
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,

        /// Write the snapshot here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Override dialect from config
        #[arg(short, long, value_parser = parse_dialect)]
        dialect: Option<Dialect>,

        /// Override naming from config (default, plural)
        #[arg(long, value_parser = parse_naming)]
        naming: Option<Naming>,
    },

    /// Render one model source file per table of a schema snapshot
    Model {
        /// Schema snapshot JSON
        #[arg(short, long, value_name = "PATH")]
        schema: PathBuf,

        /// Directory to write `.cs` files to (default: stdout)
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Override the snapshot's dialect
        #[arg(short, long, value_parser = parse_dialect)]
        dialect: Option<Dialect>,

        /// Override naming from config (default, plural)
        #[arg(long, value_parser = parse_naming)]
        naming: Option<Naming>,

        /// Namespace of the generated types
        #[arg(long)]
        namespace: Option<String>,

        /// Prefix for generated type names
        #[arg(long)]
        prefix: Option<String>,

        /// Suffix for generated type names
        #[arg(long)]
        suffix: Option<String>,

        /// Emit doc comments and data annotations
        #[arg(long)]
        annotations: bool,

        /// Private backing fields instead of auto-properties
        #[arg(long)]
        encapsulated: bool,

        /// Mark nullable reference types with `?`
        #[arg(long)]
        nullable: bool,

        /// Use a file-scoped namespace declaration
        #[arg(long)]
        file_scoped: bool,

        /// Omit imports covered by implicit usings
        #[arg(long)]
        implicit_imports: bool,
    },

    /// Render DDL for every table of a schema snapshot
    Ddl {
        /// Schema snapshot JSON
        #[arg(short, long, value_name = "PATH")]
        schema: PathBuf,

        /// Write the SQL here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Override the snapshot's dialect
        #[arg(short, long, value_parser = parse_dialect)]
        dialect: Option<Dialect>,

        /// Emit ALTER TABLE ... ADD statements instead of CREATE TABLE
        #[arg(long)]
        alter: bool,

        /// Leave out table and column descriptions
        #[arg(long)]
        no_descriptions: bool,
    },
}

fn parse_dialect(s: &str) -> Result<Dialect, String> {
    s.parse::<Dialect>().map_err(|e| e.to_string())
}

fn parse_naming(s: &str) -> Result<Naming, String> {
    s.parse()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", output::err_line(&format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Init { dialect } => {
            schemabridge_cli::commands::init::run(&std::env::current_dir()?, dialect)?;
        }
        Command::Extract {
            files,
            out,
            dialect,
            naming,
        } => {
            let config = Config::resolve(cli.config.as_deref())?;
            schemabridge_cli::commands::extract::run(
                &config,
                ExtractOptions {
                    files,
                    out,
                    dialect,
                    naming,
                },
            )?;
        }
        Command::Model {
            schema,
            out,
            dialect,
            naming,
            namespace,
            prefix,
            suffix,
            annotations,
            encapsulated,
            nullable,
            file_scoped,
            implicit_imports,
        } => {
            let config = Config::resolve(cli.config.as_deref())?;
            schemabridge_cli::commands::model::run(
                &config,
                ModelOptions {
                    schema,
                    out,
                    dialect,
                    naming,
                    flags: ModelOverrides {
                        namespace,
                        prefix,
                        suffix,
                        annotations,
                        encapsulated,
                        nullable,
                        file_scoped,
                        implicit_imports,
                    },
                },
            )?;
        }
        Command::Ddl {
            schema,
            out,
            dialect,
            alter,
            no_descriptions,
        } => {
            let config = Config::resolve(cli.config.as_deref())?;
            schemabridge_cli::commands::ddl::run(
                &config,
                DdlCommandOptions {
                    schema,
                    out,
                    dialect,
                    alter,
                    no_descriptions,
                },
            )?;
        }
    }
    Ok(())
}
