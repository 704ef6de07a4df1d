//! Info command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, pretty_json};
use faultline_app::app_crate_version;
use faultline_domain::domain_crate_version;
use faultline_infra::infra_crate_version;

/// Run the info command.
pub fn run_info(mode: OutputMode) -> Result<CliOutput, CliError> {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let stdout = if mode.is_json() {
        pretty_json(&serde_json::json!({
            "status": "ok",
            "build": {
                "name": name,
                "version": version,
                "domainVersion": domain_crate_version(),
                "appVersion": app_crate_version(),
                "infraVersion": infra_crate_version(),
            }
        }))?
    } else {
        format!(
            "status: ok\nname: {name}\nversion: {version}\ndomain: {}\napp: {}\ninfra: {}\n",
            domain_crate_version(),
            app_crate_version(),
            infra_crate_version(),
        )
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
