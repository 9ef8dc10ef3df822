//! Request client core for the hotel services marketplace.
//!
//! # Overview
//! One gateway for every call to the marketplace service: it adds the JSON
//! content type and bearer authorization, serializes bodies, and normalizes
//! every outcome into an `ApiResult` (`{data}` or `{error}`). Views feed
//! results into a `ResourceView`, which keeps seeded sample data when the
//! service is unavailable and says so.
//!
//! # Design
//! - `RequestClient` is stateless: base URL, token and a `Transport`.
//! - Each call is split into `build_request` (pure), `Transport::execute`
//!   (I/O) and `parse_response` (pure), so tests can drive the client with
//!   scripted responses and hosts can bring their own HTTP stack.
//! - Configuration is an explicit `ApiConfig` built once at start-up.
//! - Records are typed per resource but pass unknown fields through.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod result;
pub mod search;
pub mod state;
pub mod transport;
pub mod types;

pub use client::{Diagnostics, RequestClient};
pub use config::ApiConfig;
pub use error::{ApiError, ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use result::ApiResult;
pub use search::{filter_records, matches_query, KindFilter, Searchable};
pub use state::{LoadState, ResourceView};
pub use transport::{Transport, UreqTransport};
pub use types::{
    CreatedProposal, CreatedProvider, CreatedRequirement, HealthStatus, Message, MessageList, Profile,
    ProfileEnvelope, Proposal, ProposalList, Provider, ProviderList, RecordId, Requirement, RequirementList,
    SentMessage, ServiceKind, UserRole,
};
