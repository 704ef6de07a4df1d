//! Map command handlers: run a failure through the default mappers.

use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, pretty_json};
use crate::logging::init_tracing;
use crate::{CliOutput, format_error_output, log_info};
use faultline_api::v1::HttpResponse;
use faultline_domain::{ConstraintViolationError, JsonFailure, PipelineError, ViolationSet};
use faultline_infra::{build_logger, build_registry, load_effective_config};
use faultline_shared::{ErrorCode, ErrorEnvelope};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Violations document accepted by `map violations`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ViolationsInput {
    Tagged {
        #[serde(default)]
        message: Option<String>,
        violations: ViolationSet,
    },
    Bare(ViolationSet),
}

impl ViolationsInput {
    fn into_error(self, message: Option<&str>) -> ConstraintViolationError {
        let (declared, violations) = match self {
            Self::Tagged {
                message,
                violations,
            } => (message, violations),
            Self::Bare(violations) => (None, violations),
        };
        match message.map(str::to_owned).or(declared) {
            Some(message) => ConstraintViolationError::with_message(message, violations),
            None => ConstraintViolationError::new(violations),
        }
    }
}

/// Map a violation list.
pub fn run_map_violations(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    config_path: Option<&Path>,
    input: &str,
    message: Option<&str>,
) -> Result<CliOutput, CliError> {
    let document: ViolationsInput = match parse_input(input, "violations") {
        Ok(document) => document,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };
    let error = PipelineError::from(document.into_error(message));
    map_with_registry(mode, env, config_path, &error)
}

/// Map a JSON processing failure.
pub fn run_map_json(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    config_path: Option<&Path>,
    input: &str,
) -> Result<CliOutput, CliError> {
    let failure: JsonFailure = match parse_input(input, "json failure") {
        Ok(failure) => failure,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };
    map_with_registry(mode, env, config_path, &PipelineError::from(failure))
}

fn parse_input<T: serde::de::DeserializeOwned>(input: &str, what: &str) -> Result<T, ErrorEnvelope> {
    serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            format!("invalid {what} document: {error}"),
        )
        .with_metadata("input", what)
    })
}

fn map_with_registry(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    config_path: Option<&Path>,
    error: &PipelineError,
) -> Result<CliOutput, CliError> {
    let config = match load_effective_config(env, config_path) {
        Ok(config) => config,
        Err(envelope) => return Ok(format_error_output(mode, &envelope)),
    };
    init_tracing(&config.logging);
    let registry = build_registry(&config, build_logger(&config.logging));

    let response = registry.map(error);
    tracing::debug!(kind = %error.kind(), status = %response.status, "mapped failure");

    let mut stderr = String::new();
    log_info(&mut stderr, "map completed", mode.no_progress);

    Ok(CliOutput {
        stdout: render_response(mode, &response)?,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

fn render_response(mode: OutputMode, response: &HttpResponse) -> Result<String, CliError> {
    if mode.is_json() {
        return Ok(pretty_json(&serde_json::to_value(response)?)?);
    }

    let mut out = format!("status: {}\n", response.status);
    if let Some(content_type) = response.content_type.as_deref() {
        out.push_str("content-type: ");
        out.push_str(content_type);
        out.push('\n');
    }
    match response.body_json() {
        Some(body) => {
            out.push_str("body: ");
            out.push_str(&serde_json::to_string(&body)?);
            out.push('\n');
        },
        None => out.push_str("body: <empty>\n"),
    }
    Ok(out)
}
