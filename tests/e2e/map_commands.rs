//! CLI map commands against the default mappers.

use serde_json::json;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn fixture(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../crates/testkit/fixtures")
        .join(relative)
}

fn faultline(args: &[&str], env: &[(&str, &str)]) -> io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_faultline"));
    command
        .args(["--output", "json", "--quiet"])
        .args(args)
        .env_remove("FAULTLINE_SHOW_DETAILS")
        .env_remove("FAULTLINE_LOG_FORMAT")
        .env("FAULTLINE_LOG_LEVEL", "error");
    for (key, value) in env {
        command.env(key, value);
    }
    command.output()
}

fn map_fixture(kind: &str, relative: &str, extra: &[&str]) -> io::Result<serde_json::Value> {
    map_fixture_with_env(kind, relative, extra, &[])
}

fn map_fixture_with_env(
    kind: &str,
    relative: &str,
    extra: &[&str],
    env: &[(&str, &str)],
) -> io::Result<serde_json::Value> {
    let path = fixture(relative);
    let path = path
        .to_str()
        .ok_or_else(|| io::Error::other("fixture path is not UTF-8"))?;
    let mut args = vec!["map", kind, "--input", path];
    args.extend_from_slice(extra);

    let output = faultline(&args, env)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(io::Error::other(format!("map failed: {stderr}")));
    }
    serde_json::from_slice(&output.stdout).map_err(io::Error::other)
}

#[test]
fn entity_violations_are_unprocessable() -> io::Result<()> {
    let response = map_fixture("violations", "violations/request-entity.json", &[])?;

    assert_eq!(response["status"], 422);
    assert_eq!(response["contentType"], "application/json");
    assert_eq!(
        response["body"],
        json!({"errors": ["name may not be empty", "passwords must match"]})
    );
    Ok(())
}

#[test]
fn parameter_violations_are_bad_requests() -> io::Result<()> {
    let response = map_fixture("violations", "violations/query-parameter.json", &[])?;

    assert_eq!(response["status"], 400);
    assert_eq!(
        response["body"]["errors"],
        json!(["find.arg0 must be greater than or equal to 1"])
    );
    Ok(())
}

#[test]
fn return_value_violations_are_server_errors() -> io::Result<()> {
    let response = map_fixture("violations", "violations/return-value.json", &[])?;

    assert_eq!(response["status"], 500);
    assert_eq!(
        response["body"]["errors"],
        json!(["current.<return value>.name may not be null"])
    );
    Ok(())
}

#[test]
fn server_response_message_prefixes_errors() -> io::Result<()> {
    let response = map_fixture(
        "violations",
        "violations/request-entity.json",
        &["--message", "server response"],
    )?;

    assert_eq!(response["status"], 500);
    assert_eq!(
        response["body"]["errors"],
        json!([
            "server response name may not be empty",
            "server response passwords must match"
        ])
    );
    Ok(())
}

#[test]
fn client_json_failures_hide_details_by_default() -> io::Result<()> {
    let response = map_fixture("json", "json/invalid-url.json", &[])?;

    assert_eq!(response["status"], 400);
    assert_eq!(
        response["body"],
        json!({"code": 400, "message": "Unable to process JSON"})
    );
    Ok(())
}

#[test]
fn client_json_failures_show_details_when_enabled() -> io::Result<()> {
    let response = map_fixture_with_env(
        "json",
        "json/invalid-url.json",
        &[],
        &[("FAULTLINE_SHOW_DETAILS", "true")],
    )?;

    assert_eq!(response["body"]["details"], "relative URL without a base");
    Ok(())
}

#[test]
fn unbindable_types_are_empty_server_errors() -> io::Result<()> {
    let response = map_fixture("json", "json/abstract-type.json", &[])?;

    assert_eq!(response["status"], 500);
    assert!(response.get("body").is_none());
    Ok(())
}

#[test]
fn generation_failures_are_empty_server_errors() -> io::Result<()> {
    let response = map_fixture("json", "json/generation.json", &[])?;

    assert_eq!(response["status"], 500);
    assert!(response.get("contentType").is_none());
    Ok(())
}

#[test]
fn violations_are_read_from_stdin() -> io::Result<()> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_faultline"))
        .args(["--output", "json", "--quiet", "map", "violations"])
        .env("FAULTLINE_LOG_LEVEL", "error")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;
    child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("stdin not captured"))?
        .write_all(b"[]")?;
    let output = child.wait_with_output()?;

    let response: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    assert_eq!(response["status"], 422);
    assert_eq!(response["body"]["errors"], json!([""]));
    Ok(())
}

#[test]
fn malformed_documents_are_invalid_input() -> io::Result<()> {
    let path = fixture("violations/invalid.json");
    let path = path
        .to_str()
        .ok_or_else(|| io::Error::other("fixture path is not UTF-8"))?;
    let output = faultline(&["map", "violations", "--input", path], &[])?;

    assert_eq!(output.status.code(), Some(2));
    Ok(())
}
