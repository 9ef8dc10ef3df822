//! Request client for the marketplace service.
//!
//! # Design
//! `RequestClient` holds the base URL, the bearer token and a `Transport`,
//! and carries no mutable state between calls. Every call is split the same
//! way: `build_request` produces an `HttpRequest`, the transport executes it,
//! and `parse_response` turns the `HttpResponse` into a typed value. Both
//! halves are public so a host can drive the I/O itself.
//!
//! The generic verbs and the resource wrappers never fail outright: every
//! error is logged and folded into `ApiResult::Error`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{merge_headers, HttpMethod, HttpRequest, HttpResponse};
use crate::result::ApiResult;
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    CreatedProposal, CreatedProvider, CreatedRequirement, HealthStatus, MessageList, ProfileEnvelope, ProposalList,
    ProviderList, RequirementList, SentMessage,
};

/// Stateless client for the marketplace service.
#[derive(Debug, Clone)]
pub struct RequestClient<T = UreqTransport> {
    base_url: String,
    bearer_token: String,
    transport: T,
}

impl RequestClient<UreqTransport> {
    /// Client that talks to the network through `ureq`.
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> RequestClient<T> {
    pub fn with_transport(config: &ApiConfig, transport: T) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token.clone(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the request for `method` on `path`.
    ///
    /// `path` must be relative to the base URL; a missing leading `/` is
    /// added. `headers` override the JSON content type and bearer
    /// authorization defaults by name, ignoring case.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
        headers: &[(&str, &str)],
    ) -> Result<HttpRequest, ApiError> {
        let url = self.resource_url(path)?;
        let defaults = vec![
            ("content-type".to_string(), "application/json".to_string()),
            ("authorization".to_string(), format!("Bearer {}", self.bearer_token)),
        ];
        Ok(HttpRequest {
            method,
            url,
            headers: merge_headers(defaults, headers),
            body,
        })
    }

    /// Interpret a response: non-2xx becomes `ApiError::Http`, otherwise the
    /// body is parsed as JSON. An empty body parses as `null`.
    pub fn parse_response<R: DeserializeOwned>(&self, response: HttpResponse) -> Result<R, ApiError> {
        if !response.is_success() {
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }
        let body = if response.body.trim().is_empty() { "null" } else { response.body.as_str() };
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Issue one request and fold any failure into `ApiResult::Error`.
    pub fn send<R, B>(&self, method: HttpMethod, path: &str, body: Option<&B>, headers: &[(&str, &str)]) -> ApiResult<R>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let result = self.call(method, path, body, headers);
        if let Err(err) = &result {
            match err {
                ApiError::Http { status, body } => {
                    error!(%method, path, status, body = %body, "marketplace API returned an error status");
                }
                other => error!(%method, path, error = %other, "marketplace request failed"),
            }
        }
        result.into()
    }

    fn call<R, B>(&self, method: HttpMethod, path: &str, body: Option<&B>, headers: &[(&str, &str)]) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        let request = self.build_request(method, path, body, headers)?;
        debug!(%method, url = %request.url, "sending marketplace request");
        let response = self.transport.execute(&request)?;
        self.parse_response(response)
    }

    fn resource_url(&self, path: &str) -> Result<String, ApiError> {
        if path.contains("://") {
            return Err(ApiError::InvalidPath(path.to_string()));
        }
        if path.starts_with('/') {
            Ok(format!("{}{path}", self.base_url))
        } else {
            Ok(format!("{}/{path}", self.base_url))
        }
    }

    // --- generic verbs ---

    pub fn get<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.send::<R, ()>(HttpMethod::Get, path, None, &[])
    }

    pub fn post<R: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<R> {
        self.send(HttpMethod::Post, path, Some(body), &[])
    }

    pub fn put<R: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<R> {
        self.send(HttpMethod::Put, path, Some(body), &[])
    }

    pub fn delete<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.send::<R, ()>(HttpMethod::Delete, path, None, &[])
    }

    // --- requirements ---

    pub fn get_requirements(&self) -> ApiResult<RequirementList> {
        self.get("/requirements")
    }

    pub fn create_requirement<B: Serialize + ?Sized>(&self, requirement: &B) -> ApiResult<CreatedRequirement> {
        self.post("/requirements", requirement)
    }

    // --- providers ---

    pub fn get_providers(&self) -> ApiResult<ProviderList> {
        self.get("/providers")
    }

    pub fn create_provider<B: Serialize + ?Sized>(&self, provider: &B) -> ApiResult<CreatedProvider> {
        self.post("/providers", provider)
    }

    // --- proposals ---

    pub fn get_proposals(&self) -> ApiResult<ProposalList> {
        self.get("/proposals")
    }

    pub fn create_proposal<B: Serialize + ?Sized>(&self, proposal: &B) -> ApiResult<CreatedProposal> {
        self.post("/proposals", proposal)
    }

    // --- messages ---

    pub fn get_messages(&self, user_id: &str) -> ApiResult<MessageList> {
        self.get(&format!("/messages/{}", urlencoding::encode(user_id)))
    }

    pub fn send_message<B: Serialize + ?Sized>(&self, message: &B) -> ApiResult<SentMessage> {
        self.post("/messages", message)
    }

    // --- profile ---

    pub fn get_profile(&self, user_id: &str) -> ApiResult<ProfileEnvelope> {
        self.get(&format!("/profile/{}", urlencoding::encode(user_id)))
    }

    pub fn update_profile<B: Serialize + ?Sized>(&self, profile: &B) -> ApiResult<ProfileEnvelope> {
        self.post("/profile", profile)
    }

    // --- diagnostics ---

    pub fn health_check(&self) -> ApiResult<HealthStatus> {
        self.get("/health")
    }

    /// Ask the service to verify its database connection.
    pub fn test_connection(&self) -> ApiResult<Value> {
        self.get("/test")
    }

    /// Run the start-up checks: health first, then the database check only
    /// when the service reports healthy.
    pub fn diagnose(&self) -> Diagnostics {
        let health = self.health_check();
        let database = match &health {
            ApiResult::Data(status) => {
                info!(status = %status.status, "marketplace API health check succeeded");
                let database = self.test_connection();
                if database.is_data() {
                    info!("marketplace database connection succeeded");
                }
                Some(database)
            }
            ApiResult::Error(_) => None,
        };
        Diagnostics { health, database }
    }
}

/// Outcome of `RequestClient::diagnose`. `database` is `None` when the
/// health check failed and the database check was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    pub health: ApiResult<HealthStatus>,
    pub database: Option<ApiResult<Value>>,
}

impl Diagnostics {
    pub fn is_healthy(&self) -> bool {
        self.health.is_data() && self.database.as_ref().is_some_and(ApiResult::is_data)
    }
}
