//! Config command handlers.

use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, pretty_json};
use crate::{CliOutput, format_error_output, log_info};
use faultline_config::config_schema;
use faultline_infra::{ConfigOutput, load_effective_config, render_effective_config};
use std::collections::BTreeMap;
use std::path::Path;

/// Print the effective config: TOML in text mode, wrapped JSON otherwise.
pub fn run_config_show(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    path: Option<&Path>,
) -> Result<CliOutput, CliError> {
    let format = if mode.is_json() {
        ConfigOutput::Json
    } else {
        ConfigOutput::Toml
    };
    let rendered = match render_effective_config(env, path, format) {
        Ok(rendered) => rendered,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    log_info(&mut stderr, "config show completed", mode.no_progress);

    let stdout = if mode.is_json() {
        let config: serde_json::Value = serde_json::from_str(rendered.trim())?;
        pretty_json(&serde_json::json!({
            "status": "ok",
            "configPath": path.map(|value| value.to_string_lossy().to_string()),
            "effectiveConfig": config,
        }))?
    } else {
        let mut out = String::from("status: ok\nconfig:\n");
        out.push_str(&rendered);
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

/// Validate config loading and env overrides.
pub fn run_config_check(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    path: Option<&Path>,
) -> Result<CliOutput, CliError> {
    if let Err(error) = load_effective_config(env, path) {
        return Ok(format_error_output(mode, &error));
    }

    let mut stderr = String::new();
    log_info(&mut stderr, "config check completed", mode.no_progress);

    let stdout = if mode.is_json() {
        pretty_json(&serde_json::json!({
            "status": "ok",
            "configPath": path.map(|value| value.to_string_lossy().to_string()),
        }))?
    } else {
        path.map_or_else(
            || "status: ok\nconfig: ok\n".to_string(),
            |path| format!("status: ok\nconfig: ok\npath: {}\n", path.to_string_lossy()),
        )
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

/// Print the JSON schema of the config file.
pub fn run_config_schema() -> Result<CliOutput, CliError> {
    let schema = config_schema();
    Ok(CliOutput {
        stdout: pretty_json(schema.as_value())?,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
