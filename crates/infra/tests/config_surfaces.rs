//! Config and env checks as seen by the CLI.

use faultline_infra::{
    ConfigOutput, build_registry, load_effective_config, mapper_settings,
    render_effective_config, validate_env_parsing,
};
use faultline_ports::LoggerPort;
use faultline_testkit::NoopLogger;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../testkit/fixtures/config")
        .join(name)
}

#[test]
fn env_overrides_file_values() -> Result<(), Box<dyn Error>> {
    let env = BTreeMap::from([("FAULTLINE_SHOW_DETAILS".to_owned(), "false".to_owned())]);
    let config = load_effective_config(&env, Some(&fixture("faultline.valid.json")))?;

    assert!(!config.errors.show_details);
    Ok(())
}

#[test]
fn rendering_is_deterministic() -> Result<(), Box<dyn Error>> {
    let env = BTreeMap::new();
    let path = fixture("faultline.valid.toml");
    let first = render_effective_config(&env, Some(&path), ConfigOutput::Json)?;
    let second = render_effective_config(&env, Some(&path), ConfigOutput::Json)?;

    assert_eq!(first, second);
    assert!(first.contains("\"showDetails\": false"));
    Ok(())
}

#[test]
fn invalid_file_is_rejected() {
    let error = load_effective_config(&BTreeMap::new(), Some(&fixture("faultline.invalid.json")));
    let code = error.err().map(|envelope| envelope.code.to_string());
    assert_eq!(code.as_deref(), Some("config:invalid_json"));
}

#[test]
fn invalid_env_is_rejected() {
    let env = BTreeMap::from([("FAULTLINE_SHOW_DETAILS".to_owned(), "maybe".to_owned())]);
    assert!(validate_env_parsing(&env).is_err());
    assert!(validate_env_parsing(&BTreeMap::new()).is_ok());
}

#[test]
fn registry_follows_show_details() -> Result<(), Box<dyn Error>> {
    let config = load_effective_config(&BTreeMap::new(), Some(&fixture("faultline.valid.json")))?;
    let logger: Arc<dyn LoggerPort> = Arc::new(NoopLogger);
    let registry = build_registry(&config, logger);

    assert_eq!(registry.len(), 4);
    Ok(())
}

#[test]
fn mapper_settings_follow_config() -> Result<(), Box<dyn Error>> {
    let shown = load_effective_config(&BTreeMap::new(), Some(&fixture("faultline.valid.json")))?;
    assert!(mapper_settings(&shown).show_details);

    let env = BTreeMap::from([("FAULTLINE_SHOW_DETAILS".to_owned(), "false".to_owned())]);
    let hidden = load_effective_config(&env, Some(&fixture("faultline.valid.json")))?;
    assert!(!mapper_settings(&hidden).show_details);
    Ok(())
}
