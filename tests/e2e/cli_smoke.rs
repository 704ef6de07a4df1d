//! CLI smoke tests: info output and exit codes.

use std::io;
use std::process::{Command, Output};

fn faultline(args: &[&str]) -> io::Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_faultline"))
        .args(args)
        .env_remove("FAULTLINE_SHOW_DETAILS")
        .env_remove("FAULTLINE_LOG_LEVEL")
        .env_remove("FAULTLINE_LOG_FORMAT")
        .output()
}

#[test]
fn info_json_is_deterministic() -> io::Result<()> {
    let first = faultline(&["--output", "json", "info"])?;
    let second = faultline(&["--output", "json", "info"])?;

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let value: serde_json::Value =
        serde_json::from_slice(&first.stdout).map_err(io::Error::other)?;
    assert_eq!(value["status"], "ok");
    assert_eq!(value["build"]["name"], "faultline-cli");
    Ok(())
}

#[test]
fn info_text_lists_versions() -> io::Result<()> {
    let output = faultline(&["info"])?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.starts_with("status: ok\n"));
    assert!(stdout.contains("\ninfra: "));
    Ok(())
}

#[test]
fn unknown_subcommand_is_rejected() -> io::Result<()> {
    let output = faultline(&["explode"])?;
    assert!(!output.status.success());
    Ok(())
}

#[test]
fn missing_input_file_exits_with_io_code() -> io::Result<()> {
    let output = faultline(&["map", "json", "--input", "does-not-exist.json"])?;
    assert_eq!(output.status.code(), Some(3));
    Ok(())
}
