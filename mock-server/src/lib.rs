//! In-memory stand-in for the marketplace service.
//!
//! Serves every resource path the request client uses, behind the same
//! bearer-token check. Records are stored as raw JSON objects and returned
//! unchanged apart from a server-assigned `id`.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

/// Token accepted by `app()`.
pub const DEFAULT_TOKEN: &str = "mock-anon-key";

#[derive(Debug, Default)]
pub struct Store {
    pub requirements: Vec<Value>,
    pub providers: Vec<Value>,
    pub proposals: Vec<Value>,
    pub messages: Vec<Value>,
    pub profiles: HashMap<String, Value>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    token: Arc<str>,
}

/// The listable, creatable resources. Lists are returned newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Requirements,
    Providers,
    Proposals,
}

impl Collection {
    fn plural(self) -> &'static str {
        match self {
            Collection::Requirements => "requirements",
            Collection::Providers => "providers",
            Collection::Proposals => "proposals",
        }
    }

    fn singular(self) -> &'static str {
        match self {
            Collection::Requirements => "requirement",
            Collection::Providers => "provider",
            Collection::Proposals => "proposal",
        }
    }

    fn records(self, store: &Store) -> &Vec<Value> {
        match self {
            Collection::Requirements => &store.requirements,
            Collection::Providers => &store.providers,
            Collection::Proposals => &store.proposals,
        }
    }

    fn records_mut(self, store: &mut Store) -> &mut Vec<Value> {
        match self {
            Collection::Requirements => &mut store.requirements,
            Collection::Providers => &mut store.providers,
            Collection::Proposals => &mut store.proposals,
        }
    }
}

/// A failure rendered as `{"error": "..."}` with the given status.
struct Failure(StatusCode, String);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

type Reply = Result<(StatusCode, Json<Value>), Failure>;

/// A request body that may have failed to parse.
type Body = Result<Json<Value>, JsonRejection>;

pub fn app() -> Router {
    app_with_token(DEFAULT_TOKEN)
}

pub fn app_with_token(token: &str) -> Router {
    let state = AppState {
        db: Db::default(),
        token: Arc::from(token),
    };
    Router::new()
        .route("/health", get(health))
        .route("/test", get(test_connection))
        .route("/requirements", get(list_requirements).post(create_requirement))
        .route("/providers", get(list_providers).post(create_provider))
        .route("/proposals", get(list_proposals).post(create_proposal))
        .route("/messages", post(send_message))
        .route("/messages/{user_id}", get(list_messages))
        .route("/profile", post(upsert_profile))
        .route("/profile/{user_id}", get(get_profile))
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_token(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_token(token)).await
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !is_authorized(request.headers(), &state.token) {
        warn!(path = %request.uri().path(), "rejected request without a valid bearer token");
        return Failure(StatusCode::UNAUTHORIZED, "missing or invalid bearer token".to_string()).into_response();
    }
    next.run(request).await
}

fn is_authorized(headers: &HeaderMap, token: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|presented| presented == token)
}

/// Give `record` a fresh UUID `id` unless it already has one.
fn assign_id(record: &mut Map<String, Value>) {
    if !record.contains_key("id") {
        record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    }
}

fn into_object(body: Value) -> Result<Map<String, Value>, Failure> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(Failure(StatusCode::BAD_REQUEST, "expected a JSON object".to_string())),
    }
}

/// Unwrap a JSON object body, reporting parse failures as `{"error": ...}`.
fn json_object(body: Body) -> Result<Map<String, Value>, Failure> {
    match body {
        Ok(Json(value)) => into_object(value),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected malformed request body");
            Err(Failure(rejection.status(), rejection.body_text()))
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn test_connection(State(state): State<AppState>) -> Json<Value> {
    let store = state.db.read().await;
    Json(json!({
        "status": "connected",
        "counts": {
            "requirements": store.requirements.len(),
            "providers": store.providers.len(),
            "proposals": store.proposals.len(),
            "messages": store.messages.len(),
            "profiles": store.profiles.len(),
        }
    }))
}

async fn list(db: &Db, collection: Collection) -> Json<Value> {
    let store = db.read().await;
    let mut body = Map::new();
    body.insert(collection.plural().to_string(), Value::Array(collection.records(&store).clone()));
    Json(Value::Object(body))
}

async fn create(db: &Db, collection: Collection, body: Body) -> Reply {
    let mut record = json_object(body)?;
    assign_id(&mut record);
    let record = Value::Object(record);
    collection.records_mut(&mut *db.write().await).insert(0, record.clone());
    debug!(collection = collection.plural(), id = %record["id"], "created record");

    let mut body = Map::new();
    body.insert(collection.singular().to_string(), record);
    Ok((StatusCode::CREATED, Json(Value::Object(body))))
}

async fn list_requirements(State(state): State<AppState>) -> Json<Value> {
    list(&state.db, Collection::Requirements).await
}

async fn create_requirement(State(state): State<AppState>, body: Body) -> Reply {
    create(&state.db, Collection::Requirements, body).await
}

async fn list_providers(State(state): State<AppState>) -> Json<Value> {
    list(&state.db, Collection::Providers).await
}

async fn create_provider(State(state): State<AppState>, body: Body) -> Reply {
    create(&state.db, Collection::Providers, body).await
}

async fn list_proposals(State(state): State<AppState>) -> Json<Value> {
    list(&state.db, Collection::Proposals).await
}

async fn create_proposal(State(state): State<AppState>, body: Body) -> Reply {
    create(&state.db, Collection::Proposals, body).await
}

/// Messages sent or received by `user_id`, oldest first.
async fn list_messages(State(state): State<AppState>, Path(user_id): Path<String>) -> Json<Value> {
    let store = state.db.read().await;
    let involves = |m: &&Value| m["senderId"] == user_id.as_str() || m["recipientId"] == user_id.as_str();
    let messages: Vec<Value> = store.messages.iter().filter(involves).cloned().collect();
    Json(json!({ "messages": messages }))
}

async fn send_message(State(state): State<AppState>, body: Body) -> Reply {
    let mut message = json_object(body)?;
    assign_id(&mut message);
    let message = Value::Object(message);
    state.db.write().await.messages.push(message.clone());
    Ok((StatusCode::CREATED, Json(json!({ "message": message }))))
}

async fn get_profile(State(state): State<AppState>, Path(user_id): Path<String>) -> Reply {
    let store = state.db.read().await;
    match store.profiles.get(&user_id) {
        Some(profile) => Ok((StatusCode::OK, Json(json!({ "profile": profile })))),
        None => Err(Failure(StatusCode::NOT_FOUND, format!("profile {user_id} not found"))),
    }
}

/// Create or replace the profile keyed by its `userId`.
async fn upsert_profile(State(state): State<AppState>, body: Body) -> Reply {
    let mut profile = json_object(body)?;
    let user_id = match profile.get("userId").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return Err(Failure(StatusCode::BAD_REQUEST, "profile requires a userId".to_string())),
    };
    let mut store = state.db.write().await;
    if let Some(id) = store.profiles.get(&user_id).and_then(|p| p.get("id")) {
        profile.entry("id").or_insert_with(|| id.clone());
    }
    assign_id(&mut profile);
    let profile = Value::Object(profile);
    store.profiles.insert(user_id, profile.clone());
    Ok((StatusCode::OK, Json(json!({ "profile": profile }))))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_must_match() {
        assert!(is_authorized(&headers("Bearer secret"), "secret"));
        assert!(!is_authorized(&headers("Bearer other"), "secret"));
        assert!(!is_authorized(&headers("secret"), "secret"));
        assert!(!is_authorized(&HeaderMap::new(), "secret"));
    }

    #[test]
    fn assign_id_keeps_existing_id() {
        let mut record = Map::new();
        record.insert("id".to_string(), json!(7));
        assign_id(&mut record);
        assert_eq!(record["id"], 7);
    }

    #[test]
    fn assign_id_generates_uuid() {
        let mut record = Map::new();
        assign_id(&mut record);
        let id = record["id"].as_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        assert!(into_object(json!(["not", "an", "object"])).is_err());
        assert!(into_object(json!({"title": "ok"})).is_ok());
    }

    #[test]
    fn collections_use_envelope_keys() {
        assert_eq!(Collection::Requirements.plural(), "requirements");
        assert_eq!(Collection::Providers.singular(), "provider");
        assert_eq!(Collection::Proposals.singular(), "proposal");
    }
}
