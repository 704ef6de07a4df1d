//! CLI config commands.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../crates/testkit/fixtures/config")
        .join(relative)
}

fn faultline(args: &[&str], env: &[(&str, &str)]) -> io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_faultline"));
    command
        .args(args)
        .env_remove("FAULTLINE_SHOW_DETAILS")
        .env_remove("FAULTLINE_LOG_LEVEL")
        .env_remove("FAULTLINE_LOG_FORMAT");
    for (key, value) in env {
        command.env(key, value);
    }
    command.output()
}

fn path_arg(path: &Path) -> io::Result<&str> {
    path.to_str()
        .ok_or_else(|| io::Error::other("fixture path is not UTF-8"))
}

#[test]
fn show_prints_defaults_as_toml() -> io::Result<()> {
    let output = faultline(&["--quiet", "config", "show"], &[])?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.starts_with("status: ok\nconfig:\n"));
    assert!(stdout.contains("showDetails = false"));
    Ok(())
}

#[test]
fn show_json_merges_file_and_env() -> io::Result<()> {
    let path = fixture("faultline.valid.toml");
    let output = faultline(
        &["--output", "json", "--quiet", "config", "show", "--path", path_arg(&path)?],
        &[("FAULTLINE_SHOW_DETAILS", "true")],
    )?;

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    assert_eq!(value["effectiveConfig"]["errors"]["showDetails"], true);
    assert_eq!(value["effectiveConfig"]["logging"]["level"], "warn");
    Ok(())
}

#[test]
fn check_rejects_invalid_file() -> io::Result<()> {
    let path = fixture("faultline.invalid.json");
    let output = faultline(&["config", "check", "--path", path_arg(&path)?], &[])?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout.contains("code: config:invalid_json"));
    Ok(())
}

#[test]
fn check_rejects_invalid_env() -> io::Result<()> {
    let output = faultline(
        &["--output", "json", "config", "check"],
        &[("FAULTLINE_SHOW_DETAILS", "maybe")],
    )?;

    assert_eq!(output.status.code(), Some(2));
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"]["code"], 400);
    Ok(())
}

#[test]
fn schema_is_valid_json() -> io::Result<()> {
    let output = faultline(&["config", "schema"], &[])?;
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;

    assert!(value["properties"].get("errors").is_some());
    Ok(())
}
