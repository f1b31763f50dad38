use crate::common::{Provider, Result};

#[cfg(feature = "cli")]
use crate::common::ConfigSnafu;

/// Prefix of the environment variables read by [`Config::populate_from_env`],
/// e.g. `VDXDNS_DOMAIN`, `VDXDNS_AUTH_USERNAME`, `VDXDNS_AUTH_PASSWORD`.
pub const ENV_PREFIX: &str = "VDXDNS";

#[derive(Clone, serde::Deserialize)]
pub struct Config {
    pub vdxnl: crate::vdxnl::Config,
}

impl Config {
    /// Load settings from the environment. Overrides that are `Some` win
    /// over the environment, keyed by setting name (`domain`, ...).
    #[cfg(feature = "cli")]
    pub fn populate_from_env(overrides: &[(&str, Option<String>)]) -> Result<Self> {
        let to_err = |err: config::ConfigError| {
            ConfigSnafu {
                prefix: ENV_PREFIX,
                message: err.to_string(),
            }
            .build()
        };

        let mut builder =
            config::Config::builder().add_source(config::Environment::with_prefix(ENV_PREFIX));
        for (key, value) in overrides {
            builder = builder
                .set_override_option(*key, value.clone())
                .map_err(to_err)?;
        }

        let vdxnl = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(to_err)?;

        Ok(Self { vdxnl })
    }

    pub fn into_provider(self) -> Result<Box<dyn Provider>> {
        Ok(Box::new(crate::vdxnl::VdxClient::try_from(self.vdxnl)?))
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn overrides_fill_every_setting() {
        let config = Config::populate_from_env(&[
            ("domain", Some("example.com".into())),
            ("auth_username", Some("user".into())),
            ("auth_password", Some("hunter2".into())),
        ])
        .unwrap();

        assert_eq!(config.vdxnl.domain, "example.com");
        assert_eq!(config.vdxnl.auth_username, "user");
        assert_eq!(config.vdxnl.auth_password, "hunter2");
    }

    #[test]
    fn missing_setting_is_a_config_error() {
        let err = Config::populate_from_env(&[
            ("domain", Some("example.com".into())),
            ("auth_username", None),
        ])
        .err()
        .unwrap();

        assert!(matches!(err, crate::common::Error::ConfigError { .. }));
    }
}
