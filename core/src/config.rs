//! Connection settings for the marketplace service.
//!
//! Built once at start-up and passed by reference to `RequestClient`.

use serde::Deserialize;

use crate::error::ConfigError;

pub const ENV_PROJECT_ID: &str = "MARKETPLACE_PROJECT_ID";
pub const ENV_BASE_URL: &str = "MARKETPLACE_BASE_URL";
pub const ENV_API_TOKEN: &str = "MARKETPLACE_API_TOKEN";

/// Path of the marketplace edge function under a hosted project.
const FUNCTION_PATH: &str = "/functions/v1/make-server-ad57157a";

/// Base URL and bearer token for every request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    pub base_url: String,
    pub bearer_token: String,
}

impl ApiConfig {
    pub fn new(base_url: &str, bearer_token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: bearer_token.to_string(),
        }
    }

    /// Configuration for a hosted project identified by `project_id`.
    pub fn for_project(project_id: &str, bearer_token: &str) -> Self {
        Self::new(&format!("https://{project_id}.supabase.co{FUNCTION_PATH}"), bearer_token)
    }

    /// Read the configuration from the process environment.
    ///
    /// `MARKETPLACE_BASE_URL` wins over `MARKETPLACE_PROJECT_ID` when both are
    /// set. `MARKETPLACE_API_TOKEN` is always required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup(ENV_API_TOKEN)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingVar(ENV_API_TOKEN))?;
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|u| !u.is_empty()) {
            return Ok(Self::new(&base_url, &token));
        }
        match lookup(ENV_PROJECT_ID).filter(|p| !p.is_empty()) {
            Some(project_id) => Ok(Self::for_project(&project_id, &token)),
            None => Err(ConfigError::MissingEither(ENV_BASE_URL, ENV_PROJECT_ID)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn project_id_builds_hosted_url() {
        let config = ApiConfig::for_project("abc123", "anon");
        assert_eq!(
            config.base_url,
            "https://abc123.supabase.co/functions/v1/make-server-ad57157a"
        );
        assert_eq!(config.bearer_token, "anon");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ApiConfig::new("http://localhost:3000/", "t");
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn env_base_url_takes_precedence() {
        let config = ApiConfig::from_lookup(lookup(&[
            (ENV_API_TOKEN, "tok"),
            (ENV_BASE_URL, "http://127.0.0.1:9000"),
            (ENV_PROJECT_ID, "ignored"),
        ]))
        .unwrap();
        assert_eq!(config, ApiConfig::new("http://127.0.0.1:9000", "tok"));
    }

    #[test]
    fn env_project_id_is_used_without_base_url() {
        let config = ApiConfig::from_lookup(lookup(&[(ENV_API_TOKEN, "tok"), (ENV_PROJECT_ID, "proj")])).unwrap();
        assert_eq!(config, ApiConfig::for_project("proj", "tok"));
    }

    #[test]
    fn env_missing_token_is_an_error() {
        let err = ApiConfig::from_lookup(lookup(&[(ENV_PROJECT_ID, "proj")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(ENV_API_TOKEN));
    }

    #[test]
    fn env_missing_location_is_an_error() {
        let err = ApiConfig::from_lookup(lookup(&[(ENV_API_TOKEN, "tok")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEither(_, _)));
    }

    #[test]
    fn deserializes_from_json() {
        let config: ApiConfig =
            serde_json::from_str(r#"{"base_url":"http://h","bearer_token":"t"}"#).unwrap();
        assert_eq!(config.base_url, "http://h");
    }
}
