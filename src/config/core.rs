use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::Serialize;

use super::PdfsealConfig;
use crate::archive::ArchiveLayout;
use crate::mapping::MappingFormat;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const ENV_PREFIX: &str = "PDFSEAL_";

/// Values set on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CliOverrides {
    pub batch: BatchOverrides,
    pub archive: ArchiveOverrides,
    pub engine: EngineOverrides,
    pub mapping: MappingOverrides,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_documents: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ArchiveOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<ArchiveLayout>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MappingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<MappingFormat>,
}

/// Build the layered figment.
pub fn figment<T: Serialize>(custom_config: Option<&Path>, cli_overrides: Option<T>) -> Result<Figment> {
    tracing::trace!("CONFIG LOAD: Starting");

    let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

    if let Some(base) = user_config_base_path() {
        figment = merge_any_format(figment, &base);
    }
    figment = merge_any_format(figment, Path::new("pdfseal"));

    if let Some(path) = custom_config {
        if !path.is_file() {
            bail!("Config file not found: {}", path.display());
        }
        figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => figment.merge(Json::file(path)),
            Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
            _ => figment.merge(Toml::file(path)),
        };
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    if let Some(cli) = cli_overrides {
        tracing::trace!("CONFIG LOAD: Applying CLI overrides");
        figment = figment.merge(Serialized::defaults(cli));
    }

    Ok(figment)
}

/// Load, extract and validate the configuration.
pub fn load<T: Serialize>(custom_config: Option<&Path>, cli_overrides: Option<T>) -> Result<PdfsealConfig> {
    let config: PdfsealConfig = figment(custom_config, cli_overrides)?
        .extract()
        .context("Failed to parse configuration")?;
    config.validate()?;
    Ok(config)
}

// `base` without extension; every supported format is tried, later ones win
fn merge_any_format(figment: Figment, base: &Path) -> Figment {
    let with = |ext: &str| base.with_extension(ext);
    figment
        .merge(Toml::file(with("toml")))
        .merge(Json::file(with("json")))
        .merge(Yaml::file(with("yaml")))
        .merge(Yaml::file(with("yml")))
}

fn user_config_base_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config/pdfseal/config"))
}
