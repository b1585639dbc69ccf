use std::collections::HashMap;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

pub struct DepModelConfig {
    pub max_depth: Option<usize>,
    pub default_type: Option<String>,
}

impl DepModelConfig {
    pub fn load() -> anyhow::Result<Self> {
        let raw_config = RawConfig::load(None)?;

        Ok(Self {
            max_depth: raw_config.resolve.depth,
            default_type: raw_config.default.artifact_type,
        })
    }
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawConfig {
    #[serde(default)]
    resolve: ResolveConfig,
    #[serde(default)]
    default: DefaultsConfig,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct ResolveConfig {
    depth: Option<usize>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct DefaultsConfig {
    #[serde(rename = "type")]
    artifact_type: Option<String>,
}

impl RawConfig {
    fn load(env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                Environment::with_prefix("DEPMODEL")
                    .separator("_")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}
