//! Integration tests for env parsing and env-to-config merging.

use faultline_config::{EnvParseError, FaultlineEnv, LogFormat, LogLevelSetting, load_config_from_path};
use faultline_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map_or_else(|| manifest_dir.to_path_buf(), Path::to_path_buf)
        .join("testkit")
        .join("fixtures")
}

fn read_env_map(relative: &str) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
    let contents = fs::read_to_string(fixtures_root().join(relative))?;
    Ok(serde_json::from_str(&contents)?)
}

#[test]
fn env_fixture_overrides_file() -> Result<(), Box<dyn Error>> {
    let env = FaultlineEnv::from_map(&read_env_map("env/faultline-env.valid.json")?)?;
    let path = fixtures_root().join("config/faultline.valid.json");

    let config = load_config_from_path(Some(&path), &env)?;

    assert!(config.errors.show_details);
    assert_eq!(config.logging.level, LogLevelSetting::Trace);
    assert_eq!(config.logging.format, LogFormat::Tracing);
    Ok(())
}

#[test]
fn invalid_env_fixture_is_rejected() -> Result<(), Box<dyn Error>> {
    let error = FaultlineEnv::from_map(&read_env_map("env/faultline-env.invalid.json")?).err();
    assert!(matches!(error, Some(EnvParseError::InvalidBool { .. })));

    let envelope: ErrorEnvelope = error.ok_or("expected invalid env error")?.into();
    assert_eq!(envelope.code, ErrorCode::new("config", "invalid_env_bool"));
    Ok(())
}
