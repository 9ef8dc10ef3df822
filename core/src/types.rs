//! Marketplace records and the envelopes the service wraps them in.
//!
//! # Design
//! Records are pass-through: every field the marketplace screens use is
//! named (and optional), everything else lands in `extra` and is sent back
//! unchanged. The client never validates a record. Field names follow the
//! service's camelCase JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque record id. The service and the sample data use both numbers and
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// The two kinds of service a hotel can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Staffing,
    Vendor,
}

impl ServiceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::Staffing => "staffing",
            ServiceKind::Vendor => "vendor",
        }
    }
}

impl FromStr for ServiceKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "staffing" => Ok(ServiceKind::Staffing),
            "vendor" => Ok(ServiceKind::Vendor),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// Who is using the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Hotel,
    Staffing,
    Vendor,
}

impl FromStr for UserRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hotel" => Ok(UserRole::Hotel),
            "staffing" => Ok(UserRole::Staffing),
            "vendor" => Ok(UserRole::Vendor),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value: {0}")]
pub struct UnknownVariant(pub String);

/// A service request posted by a hotel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Requirement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Requirement {
    pub fn service_kind(&self) -> Option<ServiceKind> {
        self.kind.as_deref().and_then(|k| k.parse().ok())
    }
}

/// A staffing company or vendor offering services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Provider {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_jobs: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Provider {
    pub fn service_kind(&self) -> Option<ServiceKind> {
        self.kind.as_deref().and_then(|k| k.parse().ok())
    }
}

/// A provider's offer against a requirement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Proposal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirement_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    pub fn user_role(&self) -> Option<UserRole> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }
}

// Envelopes. A missing key is a deserialization error, not an empty list,
// so a malformed payload never wipes what a view is showing.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementList {
    pub requirements: Vec<Requirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedRequirement {
    pub requirement: Requirement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderList {
    pub providers: Vec<Provider>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedProvider {
    pub provider: Provider,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalList {
    pub proposals: Vec<Proposal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedProposal {
    pub proposal: Proposal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageList {
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentMessage {
    pub message: Message,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileEnvelope {
    pub profile: Profile,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn requirement_keeps_unknown_fields() {
        let raw = json!({
            "id": 1,
            "title": "Event Staff",
            "type": "staffing",
            "budgetMin": "2000",
            "contactInfo": "ops@grandplaza.example"
        });
        let req: Requirement = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(req.id, Some(RecordId::Number(1)));
        assert_eq!(req.service_kind(), Some(ServiceKind::Staffing));
        assert_eq!(req.extra["budgetMin"], "2000");
        assert_eq!(serde_json::to_value(&req).unwrap(), raw);
    }

    #[test]
    fn record_id_accepts_strings_and_numbers() {
        let text: RecordId = serde_json::from_value(json!("a1b2")).unwrap();
        let number: RecordId = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(text.to_string(), "a1b2");
        assert_eq!(number.to_string(), "7");
    }

    #[test]
    fn provider_uses_camel_case_fields() {
        let provider: Provider = serde_json::from_value(json!({
            "name": "Elite Event Staffing",
            "type": "staffing",
            "responseTime": "< 2 hours",
            "recentJobs": 45,
            "services": ["Waitstaff", "Bartenders"]
        }))
        .unwrap();
        assert_eq!(provider.response_time.as_deref(), Some("< 2 hours"));
        assert_eq!(provider.recent_jobs, Some(45));
        assert_eq!(provider.services.len(), 2);
        assert!(provider.extra.is_empty());
    }

    #[test]
    fn unknown_kind_is_kept_as_text() {
        let req: Requirement = serde_json::from_value(json!({"type": "catering"})).unwrap();
        assert_eq!(req.kind.as_deref(), Some("catering"));
        assert_eq!(req.service_kind(), None);
    }

    #[test]
    fn envelope_requires_its_key() {
        let result: Result<RequirementList, _> = serde_json::from_value(json!({"items": []}));
        assert!(result.is_err());
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Vendor".parse::<UserRole>().unwrap(), UserRole::Vendor);
        assert!("guest".parse::<UserRole>().is_err());
    }

    #[test]
    fn health_status_collects_extra_fields() {
        let health: HealthStatus =
            serde_json::from_value(json!({"status": "ok", "timestamp": "2024-10-01T00:00:00Z"})).unwrap();
        assert_eq!(health.status, "ok");
        assert!(health.extra.contains_key("timestamp"));
    }
}
