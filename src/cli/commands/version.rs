//! Version command implementation

use std::path::Path;

use anyhow::Result;

use crate::cli::output::Output;
use crate::config::{self, CliOverrides};
use crate::engine::QpdfEngine;

pub async fn execute(custom_config: Option<&Path>, output: &Output) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let name = env!("CARGO_PKG_NAME");
    let description = env!("CARGO_PKG_DESCRIPTION");

    if output.is_quiet() {
        println!("{name} {version}");
        return Ok(());
    }

    output.header(&format!("{name} v{version}"));
    output.key_value("Description:", description, false);

    output.category("Engine");
    let config = config::load(custom_config, None::<CliOverrides>)?;
    let engine = QpdfEngine::new(config.engine);
    match engine.initialize() {
        Ok(qpdf_version) => output.key_value("qpdf:", qpdf_version, true),
        Err(e) => output.key_value("qpdf:", &format!("unavailable ({e})"), false),
    }

    output.category("Build Information");
    output.key_value("Target:", std::env::consts::ARCH, false);
    output.key_value(
        "Profile:",
        if cfg!(debug_assertions) { "debug" } else { "release" },
        false,
    );
    Ok(())
}
