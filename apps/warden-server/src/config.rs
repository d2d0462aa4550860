//! Server configuration: defaults, then a YAML file, then `WARDEN__` environment variables.

use std::path::Path;

use anyhow::{Context, bail};
use api_gateway::ApiGatewayConfig;
use authz_resolver::AuthZResolverConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use static_authn_plugin::StaticAuthNPluginConfig;
use warden_logging::LoggingConfig;

/// Environment prefix; `__` separates nesting levels, e.g.
/// `WARDEN__API_GATEWAY__BIND_ADDR=0.0.0.0:8080`.
pub const ENV_PREFIX: &str = "WARDEN__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub api_gateway: ApiGatewayConfig,
    pub static_authn: StaticAuthNPluginConfig,
    pub authz_resolver: AuthZResolverConfig,
}

impl AppConfig {
    /// Layer the optional YAML file and the environment over the defaults.
    ///
    /// # Errors
    ///
    /// Fails if `path` does not exist or any layer does not match the schema.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file {} does not exist", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }
}
