use serde::Deserialize;

pub use config::ConfigError;

const ENV_PREFIX: &str = "SURVEY_ATTEMPT";

const DEFAULT_LOAD_ERROR_MESSAGE: &str = "We couldn't load your survey. Please try again.";

/// How the options of multiple-choice questions are fetched during initialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionLoading {
    /// One question at a time, in question order. Store calls are deterministic.
    #[default]
    Sequential,

    /// All option lists requested at once and merged when every one has arrived.
    Concurrent,
}

/// Tunables for [`SurveyAttemptManager`](crate::SurveyAttemptManager).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    pub option_loading: OptionLoading,

    /// Shown to the user when initialization fails. The cause goes to the log.
    pub load_error_message: String,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            option_loading: OptionLoading::default(),
            load_error_message: DEFAULT_LOAD_ERROR_MESSAGE.to_string(),
        }
    }
}

impl ManagerConfig {
    /// Defaults overlaid with `SURVEY_ATTEMPT_*` environment variables,
    /// e.g. `SURVEY_ATTEMPT_OPTION_LOADING=concurrent`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load(env: config::Environment) -> Result<Self, ConfigError> {
        let cfg = config::Config::builder()
            .set_default("option_loading", "sequential")?
            .set_default("load_error_message", DEFAULT_LOAD_ERROR_MESSAGE)?
            .add_source(env)
            .build()?;
        cfg.try_deserialize()
    }

    pub fn with_option_loading(mut self, option_loading: OptionLoading) -> Self {
        self.option_loading = option_loading;
        self
    }

    pub fn with_load_error_message(mut self, message: impl Into<String>) -> Self {
        self.load_error_message = message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn defaults_without_environment() {
        let config = ManagerConfig::load(env(&[])).unwrap();
        assert_eq!(config, ManagerConfig::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ManagerConfig::load(env(&[
            ("SURVEY_ATTEMPT_OPTION_LOADING", "concurrent"),
            ("SURVEY_ATTEMPT_LOAD_ERROR_MESSAGE", "Try again later"),
        ]))
        .unwrap();

        assert_eq!(config.option_loading, OptionLoading::Concurrent);
        assert_eq!(config.load_error_message, "Try again later");
    }

    #[test]
    fn unknown_loading_mode_is_rejected() {
        let result = ManagerConfig::load(env(&[("SURVEY_ATTEMPT_OPTION_LOADING", "parallel")]));
        assert!(result.is_err());
    }
}
