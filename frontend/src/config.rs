use std::str::FromStr;

use log::{info, warn, LevelFilter};

use crate::action::ActionKind;
use crate::token::CSRF_FIELD_NAME;

pub const BASE_URL_KEY: &str = "data-toggle-base-url";
pub const TOKEN_FIELD_KEY: &str = "data-toggle-token-field";
pub const ERROR_TARGET_KEY: &str = "data-toggle-error-target";
pub const LOG_LEVEL_KEY: &str = "data-toggle-log-level";

pub const DEFAULT_ERROR_TARGET: &str = "toggle-error";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Prefix for the endpoint paths; empty means same origin, root relative.
    pub base_url: String,
    /// Name of the hidden input holding the anti-forgery token.
    pub token_field: String,
    /// Id of the element that receives failure messages.
    pub error_target_id: String,
    pub log_level: LevelFilter,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            base_url: String::new(),
            token_field: CSRF_FIELD_NAME.to_owned(),
            error_target_id: DEFAULT_ERROR_TARGET.to_owned(),
            log_level: LevelFilter::Info,
        }
    }
}

impl ControllerConfig {
    /// Builds the config from page attributes. `lookup` returns the raw
    /// attribute value for a key, if present.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ControllerConfig::default();

        ControllerConfig {
            base_url: try_load(&lookup, BASE_URL_KEY, defaults.base_url),
            token_field: try_load(&lookup, TOKEN_FIELD_KEY, defaults.token_field),
            error_target_id: try_load(&lookup, ERROR_TARGET_KEY, defaults.error_target_id),
            log_level: try_load(&lookup, LOG_LEVEL_KEY, defaults.log_level),
        }
    }

    pub fn endpoint(&self, action: ActionKind) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), action.path())
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
{
    let Some(raw) = lookup(key) else {
        info!("{} not set, using default: {:?}", key, default);
        return default;
    };

    let raw = raw.trim();
    if raw.is_empty() {
        warn!("{} is blank, using default: {:?}", key, default);
        return default;
    }

    raw.parse().unwrap_or_else(|_| {
        warn!("invalid {} value {:?}, using default: {:?}", key, raw, default);
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> ControllerConfig {
        let attrs: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        ControllerConfig::from_lookup(|key| attrs.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]);

        assert_eq!(config, ControllerConfig::default());
        assert_eq!(config.token_field, "csrfmiddlewaretoken");
        assert_eq!(config.endpoint(ActionKind::Follow), "/ac/follow/");
    }

    #[test]
    fn reads_attributes() {
        let config = config(&[
            (BASE_URL_KEY, "https://blog.example/"),
            (TOKEN_FIELD_KEY, "csrf"),
            (ERROR_TARGET_KEY, "flash"),
            (LOG_LEVEL_KEY, "debug"),
        ]);

        assert_eq!(
            config.endpoint(ActionKind::Bookmark),
            "https://blog.example/ac/bookmark/"
        );
        assert_eq!(config.token_field, "csrf");
        assert_eq!(config.error_target_id, "flash");
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn blank_and_invalid_fall_back() {
        let config = config(&[(TOKEN_FIELD_KEY, "  "), (LOG_LEVEL_KEY, "loud")]);

        assert_eq!(config.token_field, CSRF_FIELD_NAME);
        assert_eq!(config.log_level, LevelFilter::Info);
    }
}
