//! db2ice CLI
//!
//! Assesses DB2 or Snowflake DDL scripts for Snowflake Managed Iceberg
//! migration and converts them. Suitable for interactive use and CI
//! pipelines: `convert` exits with status 2 when nothing could be converted.

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use db2ice::{snowflake, AssessmentReport, Assessor, ConversionConfig, Db2IceConverter};
use log::{debug, info};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

const EXIT_CONVERSION_FAILED: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "db2ice")]
#[command(about = "DB2 / Snowflake to Snowflake Managed Iceberg DDL converter")]
#[command(version = "0.1.0")]
struct Cli {
    /// Configuration file (defaults to config/db2ice.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Dialect {
    Db2,
    Snowflake,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a DDL script for Iceberg migration readiness
    Assess {
        /// DDL file, or `-` for stdin
        input: String,

        #[arg(long, value_enum, default_value_t = Dialect::Db2)]
        dialect: Dialect,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Convert a DDL script to Iceberg DDL
    Convert {
        /// DDL file, or `-` for stdin
        input: String,

        #[arg(long, value_enum, default_value_t = Dialect::Db2)]
        dialect: Dialect,

        /// External volume named in the generated DDL
        #[arg(long)]
        external_volume: Option<String>,

        /// BASE_LOCATION pattern; `{schema}` and `{table}` are substituted
        #[arg(long)]
        base_location: Option<String>,

        /// Leave out explanatory comments
        #[arg(long)]
        no_comments: bool,

        /// Leave out inline EWI markers
        #[arg(long)]
        no_ewi: bool,

        /// Write the DDL here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also write the assessment report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Show the DB2 to Iceberg type-mapping matrix
    Mappings {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // RUST_LOG still wins over the flag-derived default
    let default_filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "❌ Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = load_config(cli.config.as_deref())?;
    debug!("Using configuration {:?}", config);

    match cli.command {
        Commands::Assess {
            input,
            dialect,
            format,
        } => handle_assess(&config, &input, dialect, format),
        Commands::Convert {
            input,
            dialect,
            external_volume,
            base_location,
            no_comments,
            no_ewi,
            output,
            report,
        } => {
            let mut config = config;
            if let Some(volume) = external_volume {
                config = config.with_external_volume(volume);
            }
            if let Some(pattern) = base_location {
                config = config.with_base_location(pattern);
            }
            if no_comments {
                config = config.with_comments(false);
            }
            if no_ewi {
                config = config.with_ewi(false);
            }
            handle_convert(
                &config,
                &input,
                dialect,
                output.as_deref(),
                report.as_deref(),
                cli.quiet,
            )
        }
        Commands::Mappings { format } => handle_mappings(format),
    }
}

fn load_config(path: Option<&Path>) -> Result<ConversionConfig> {
    let config = match path {
        Some(path) => ConversionConfig::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConversionConfig::load().context("Failed to load configuration")?,
    };
    Ok(config)
}

/// Reads the DDL script from a file, or from stdin for `-`.
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut ddl = String::new();
        io::stdin()
            .read_to_string(&mut ddl)
            .context("Failed to read DDL from stdin")?;
        return Ok(ddl);
    }
    fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
}

fn assess(config: &ConversionConfig, ddl: &str, dialect: Dialect) -> AssessmentReport {
    match dialect {
        Dialect::Db2 => Assessor::new().assess(ddl),
        Dialect::Snowflake => snowflake::assess(ddl, config),
    }
}

fn handle_assess(config: &ConversionConfig, input: &str, dialect: Dialect, format: Format) -> Result<i32> {
    let ddl = read_input(input)?;
    let report = assess(config, &ddl, dialect);
    match format {
        Format::Json => println!("{}", report.to_json_string()?),
        Format::Text => println!("{}", render::report(&report)),
    }
    Ok(0)
}

/// Dialect-independent view of a conversion result.
#[derive(Debug)]
struct ConvertOutcome {
    ddl: String,
    tables_converted: usize,
    ewi_count: usize,
    success: bool,
    error_message: Option<String>,
    report: AssessmentReport,
}

fn convert(config: &ConversionConfig, ddl: &str, dialect: Dialect) -> ConvertOutcome {
    match dialect {
        Dialect::Db2 => {
            let result = Db2IceConverter::new(config.clone()).convert(ddl);
            ConvertOutcome {
                ddl: result.iceberg_ddl,
                tables_converted: result.tables_converted,
                ewi_count: result.ewi_count,
                success: result.success,
                error_message: result.error_message,
                report: result.assessment,
            }
        }
        Dialect::Snowflake => {
            let result = snowflake::SnowflakeToIcebergConverter::new(config.clone()).convert(ddl);
            ConvertOutcome {
                ddl: result.iceberg_ddl,
                tables_converted: result.tables_converted,
                ewi_count: result.ewi_count,
                success: result.success,
                error_message: result.error_message,
                report: snowflake::assess(ddl, config),
            }
        }
    }
}

fn handle_convert(
    config: &ConversionConfig,
    input: &str,
    dialect: Dialect,
    output: Option<&Path>,
    report_path: Option<&Path>,
    quiet: bool,
) -> Result<i32> {
    let ddl = read_input(input)?;
    let outcome = convert(config, &ddl, dialect);

    if let Some(path) = report_path {
        fs::write(path, outcome.report.to_json_string()?)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Wrote assessment report to {}", path.display());
    }

    if !outcome.success {
        eprintln!(
            "{} {}",
            "❌ Conversion failed:".red().bold(),
            outcome.error_message.as_deref().unwrap_or("unknown error")
        );
        return Ok(EXIT_CONVERSION_FAILED);
    }

    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", outcome.ddl))
                .with_context(|| format!("Failed to write DDL to {}", path.display()))?;
            info!("Wrote Iceberg DDL to {}", path.display());
        }
        None => println!("{}", outcome.ddl),
    }

    if !quiet {
        // Summary goes to stderr so stdout stays valid SQL.
        eprintln!(
            "{} Converted {} table(s), {} EWI marker(s), readiness {:.1} ({})",
            "✅".green(),
            outcome.tables_converted,
            outcome.ewi_count,
            outcome.report.overall_score,
            outcome.report.overall_level
        );
    }
    Ok(0)
}

fn handle_mappings(format: Format) -> Result<i32> {
    let matrix = db2ice::mapper::mapping_matrix();
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&matrix)?),
        Format::Text => println!("{}", render::mappings(&matrix)),
    }
    Ok(0)
}
