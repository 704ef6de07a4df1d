//! CLI binary entrypoint.

mod commands;
mod error;
mod format;
mod logging;

use clap::{Parser, Subcommand};
use commands::{
    run_config_check, run_config_schema, run_config_show, run_info, run_map_json,
    run_map_violations,
};
use error::{CliError, ExitCode};
use faultline_api::v1::error_envelope_to_error_message;
use faultline_infra::{InfraError, redact_if_secret};
use format::{OutputArgs, OutputMode, pretty_json};
use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Prefix of the environment variables the CLI forwards to config loading.
const ENV_PREFIX: &str = "FAULTLINE_";

#[derive(Debug, Parser)]
#[command(
    name = "faultline",
    version,
    about = "Exception mapping and validation toolkit for JSON services",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show build and version details.
    Info,
    /// Config-related commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Run a failure document through the default exception mappers.
    Map {
        #[command(subcommand)]
        command: MapCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Validate config loading and env overrides.
    Check {
        /// Optional config file path (JSON/TOML).
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the effective config after applying env overrides.
    Show {
        /// Optional config file path (JSON/TOML).
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Print the config file JSON schema.
    Schema,
}

#[derive(Debug, Subcommand)]
enum MapCommands {
    /// Map a list of constraint violations.
    Violations {
        /// Violations JSON file; reads stdin when omitted.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Origin message attached to the failure (e.g. `server response`).
        #[arg(long)]
        message: Option<String>,
        /// Optional config file path (JSON/TOML).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Map a JSON processing failure.
    Json {
        /// Failure JSON file; reads stdin when omitted.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Optional config file path (JSON/TOML).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);

    match run(&cli.command, mode) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(command: &Commands, mode: OutputMode) -> Result<CliOutput, CliError> {
    let env = collect_scoped_env(ENV_PREFIX);
    match command {
        Commands::Info => run_info(mode),
        Commands::Config { command } => match command {
            ConfigCommands::Check { path } => run_config_check(mode, &env, path.as_deref()),
            ConfigCommands::Show { path } => run_config_show(mode, &env, path.as_deref()),
            ConfigCommands::Schema => run_config_schema(),
        },
        Commands::Map { command } => match command {
            MapCommands::Violations {
                input,
                message,
                config,
            } => {
                let input = read_input(input.as_deref())?;
                run_map_violations(mode, &env, config.as_deref(), &input, message.as_deref())
            },
            MapCommands::Json { input, config } => {
                let input = read_input(input.as_deref())?;
                run_map_json(mode, &env, config.as_deref(), &input)
            },
        },
    }
}

/// Render an envelope as a failed command; the exit code follows its kind.
pub(crate) fn format_error_output(mode: OutputMode, error: &InfraError) -> CliOutput {
    let body = error_envelope_to_error_message(error);
    let code = error.code.to_string();

    let mut stderr = String::new();
    log_info(&mut stderr, "command failed", mode.no_progress);

    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "code": code,
            "error": body,
        });
        // This is a CLI boundary, so JSON serialization errors are internal.
        pretty_json(&payload).unwrap_or_else(|_| {
            "{\"status\":\"error\",\"code\":\"core:internal\"}\n".to_string()
        })
    } else {
        let mut out = format!("status: error\ncode: {code}\nmessage: {}\n", body.message);
        if let Some(details) = body.details.as_deref() {
            out.push_str("details: ");
            out.push_str(details);
            out.push('\n');
        }
        out
    };

    CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::for_envelope(error),
    }
}

pub(crate) fn log_info(stderr: &mut String, message: &str, no_progress: bool) {
    if no_progress {
        return;
    }
    stderr.push_str("info: ");
    stderr.push_str(message);
    stderr.push('\n');
}

fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            if buffer.trim().is_empty() {
                return Err(CliError::InvalidInput(
                    "no input provided (use --input or stdin)".to_string(),
                ));
            }
            Ok(buffer)
        },
    }
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}

fn collect_scoped_env(prefix: &str) -> BTreeMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with(prefix))
        .map(|(key, value)| {
            let logged = redact_if_secret(&key, &value);
            tracing::trace!(key = %key, value = %logged, "env override");
            (key, value)
        })
        .collect()
}
