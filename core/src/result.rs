//! The `{data}` / `{error}` outcome of one remote call.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Either the parsed payload or a human-readable error, never both.
///
/// Serializes as `{"data": ...}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiResult<T> {
    Data(T),
    Error(String),
}

impl<T> ApiResult<T> {
    pub fn is_data(&self) -> bool {
        matches!(self, ApiResult::Data(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ApiResult::Error(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ApiResult::Data(data) => Some(data),
            ApiResult::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ApiResult::Data(_) => None,
            ApiResult::Error(message) => Some(message),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            ApiResult::Data(data) => Some(data),
            ApiResult::Error(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            ApiResult::Data(data) => ApiResult::Data(f(data)),
            ApiResult::Error(message) => ApiResult::Error(message),
        }
    }
}

impl<T> From<Result<T, ApiError>> for ApiResult<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => ApiResult::Data(data),
            Err(err) => ApiResult::Error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn data_serializes_under_data_key() {
        let result: ApiResult<serde_json::Value> = ApiResult::Data(json!({"status": "ok"}));
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"data": {"status": "ok"}}));
    }

    #[test]
    fn error_serializes_under_error_key() {
        let result: ApiResult<()> = ApiResult::Error("boom".to_string());
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"error": "boom"}));
    }

    #[test]
    fn from_api_error_renders_message() {
        let result: ApiResult<u32> = Err(ApiError::Http {
            status: 503,
            body: "down".to_string(),
        })
        .into();
        assert_eq!(result.error(), Some("API Error: 503 down"));
        assert!(result.data().is_none());
    }

    #[test]
    fn map_only_touches_data() {
        assert_eq!(ApiResult::Data(2).map(|n| n * 10), ApiResult::Data(20));
        assert_eq!(
            ApiResult::<i32>::Error("e".into()).map(|n| n * 10),
            ApiResult::Error("e".into())
        );
    }
}
