//! Test utilities for CLI testing
//!
//! Provides a mock control plane implementation and test helpers for
//! integration testing.

use anyhow::Result;
use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use gantry_core::api::{
    AddKeyRequest, ChangePasswordRequest, CreateInstanceRequest, CreateTeamRequest,
    CreateUserRequest, LoginRequest, Plan, RemoveKeyRequest, ServiceCatalogEntry, ServiceInstance,
    Team, TeamDetail, TokenResponse,
};
use gantry_core::GantryError;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use crate::prompt::Prompter;

/// Session token issued by the mock login endpoint
pub const MOCK_SESSION_TOKEN: &str = "mock-session-token";

/// Mock control plane state
#[derive(Debug, Clone)]
pub struct MockState {
    /// Registered services and their instances, keyed by service name
    pub services: Arc<Mutex<BTreeMap<String, Vec<ServiceInstance>>>>,
    /// Available plans per service
    pub plans: Arc<Mutex<HashMap<String, Vec<Plan>>>>,
    /// Service documentation text
    pub docs: Arc<Mutex<HashMap<String, String>>>,
    /// Status text per service instance
    pub statuses: Arc<Mutex<HashMap<String, String>>>,
    /// Active (instance, app) bindings
    pub bindings: Arc<Mutex<Vec<(String, String)>>>,
    /// Instance creation requests as they arrived on the wire
    pub create_requests: Arc<Mutex<Vec<CreateInstanceRequest>>>,
    /// Registered accounts, email to password
    pub users: Arc<Mutex<HashMap<String, String>>>,
    /// When set, the signup route answers 404
    pub user_creation_disabled: Arc<Mutex<bool>>,
    /// Password reset requests, (email, token)
    pub reset_requests: Arc<Mutex<Vec<(String, Option<String>)>>>,
    /// Account the current session token belongs to
    pub session_user: Arc<Mutex<String>>,
    /// Current API key
    pub api_key: Arc<Mutex<String>>,
    /// Counter behind API key regeneration
    pub api_key_serial: Arc<Mutex<u32>>,
    /// Teams and their members, keyed by team name
    pub teams: Arc<Mutex<BTreeMap<String, Vec<String>>>>,
    /// Registered public keys, name to key material
    pub keys: Arc<Mutex<HashMap<String, String>>>,
}

impl Default for MockState {
    fn default() -> Self {
        let mut services = BTreeMap::new();
        services.insert(
            "mongodb".to_string(),
            vec![
                ServiceInstance {
                    name: "prod-db".to_string(),
                    apps: vec!["billing".to_string()],
                    info: HashMap::from([("cluster".to_string(), "east".to_string())]),
                },
                ServiceInstance {
                    name: "stage-db".to_string(),
                    apps: Vec::new(),
                    info: HashMap::from([("region".to_string(), "west".to_string())]),
                },
            ],
        );
        services.insert("redis".to_string(), Vec::new());

        let mut plans = HashMap::new();
        plans.insert(
            "mongodb".to_string(),
            vec![
                Plan {
                    name: "small".to_string(),
                    description: "shared cluster, 1 GB storage".to_string(),
                },
                Plan {
                    name: "large".to_string(),
                    description: "dedicated cluster, 100 GB storage".to_string(),
                },
            ],
        );

        let mut docs = HashMap::new();
        docs.insert(
            "mongodb".to_string(),
            "MongoDB on demand.\n\nAdd an instance with `gantryctl service add mongodb <name>`.\n"
                .to_string(),
        );

        let mut statuses = HashMap::new();
        statuses.insert(
            "prod-db".to_string(),
            "service instance \"prod-db\" is up".to_string(),
        );

        let mut users = HashMap::new();
        users.insert("alice@example.com".to_string(), "secret".to_string());

        let mut teams = BTreeMap::new();
        teams.insert(
            "platform".to_string(),
            vec!["bob@example.com".to_string(), "alice@example.com".to_string()],
        );

        let mut keys = HashMap::new();
        keys.insert(
            "work".to_string(),
            "ssh-rsa AAAAB3NzaC1yc2EAAAADAQABAAABgQDexample alice@work".to_string(),
        );

        Self {
            services: Arc::new(Mutex::new(services)),
            plans: Arc::new(Mutex::new(plans)),
            docs: Arc::new(Mutex::new(docs)),
            statuses: Arc::new(Mutex::new(statuses)),
            bindings: Arc::new(Mutex::new(Vec::new())),
            create_requests: Arc::new(Mutex::new(Vec::new())),
            users: Arc::new(Mutex::new(users)),
            user_creation_disabled: Arc::new(Mutex::new(false)),
            reset_requests: Arc::new(Mutex::new(Vec::new())),
            session_user: Arc::new(Mutex::new("alice@example.com".to_string())),
            api_key: Arc::new(Mutex::new("mock-api-key-0001".to_string())),
            api_key_serial: Arc::new(Mutex::new(1)),
            teams: Arc::new(Mutex::new(teams)),
            keys: Arc::new(Mutex::new(keys)),
        }
    }
}

/// Query parameters for password reset
#[derive(Debug, Deserialize)]
pub struct ResetPasswordQuery {
    token: Option<String>,
}

/// Mock control plane implementation
#[derive(Debug)]
pub struct MockControlPlane {
    state: MockState,
    port: u16,
}

impl Default for MockControlPlane {
    fn default() -> Self {
        Self::new()
    }
}

impl MockControlPlane {
    /// Create a new mock control plane
    pub fn new() -> Self {
        Self {
            state: MockState::default(),
            port: 0, // Will be assigned when the server starts
        }
    }

    /// Start the mock control plane and return the base URL
    pub async fn start(mut self) -> Result<(Self, String)> {
        let app = self.create_router();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        self.port = addr.port();

        let base_url = format!("http://127.0.0.1:{}", self.port);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock control plane error: {}", e);
            }
        });

        // Give the server a moment to start and verify it's running
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                break;
            }
        }

        Ok((self, base_url))
    }

    /// Get the server port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the server state
    pub fn state(&self) -> &MockState {
        &self.state
    }

    /// Create the mock control plane router
    fn create_router(&self) -> Router {
        Router::new()
            // Service endpoints
            .route(
                "/services/instances",
                get(list_catalog_handler).post(create_instance_handler),
            )
            .route("/services/instances/:instance", delete(remove_instance_handler))
            .route(
                "/services/instances/:instance/status",
                get(instance_status_handler),
            )
            .route(
                "/services/instances/:instance/:app",
                put(bind_handler).delete(unbind_handler),
            )
            .route("/services/:service", get(service_instances_handler))
            .route("/services/:service/plans", get(service_plans_handler))
            .route("/services/:service/doc", get(service_doc_handler))
            // User endpoints
            .route("/users", post(create_user_handler).delete(remove_user_handler))
            .route("/users/password", put(change_password_handler))
            .route(
                "/users/api-key",
                get(show_api_key_handler).post(regenerate_api_key_handler),
            )
            .route(
                "/users/keys",
                get(list_keys_handler)
                    .post(add_key_handler)
                    .delete(remove_key_handler),
            )
            .route("/users/:email/password", post(reset_password_handler))
            .route("/users/:email/tokens", post(login_handler))
            // Team endpoints
            .route("/teams", get(list_teams_handler).post(create_team_handler))
            .route(
                "/teams/:name",
                get(team_detail_handler).delete(remove_team_handler),
            )
            .route(
                "/teams/:name/:email",
                put(add_member_handler).delete(remove_member_handler),
            )
            .with_state(self.state.clone())
    }
}

/// Check for a bearer token on routes that require authentication
fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("Bearer "))
        .unwrap_or(false)
}

// Handler functions

async fn list_catalog_handler(
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Json<Vec<ServiceCatalogEntry>> {
    let services = state.services.lock().unwrap();
    let catalog = services
        .iter()
        .map(|(service, instances)| ServiceCatalogEntry {
            service: service.clone(),
            instances: instances.iter().map(|i| i.name.clone()).collect(),
        })
        .collect();
    Json(catalog)
}

async fn create_instance_handler(
    axum::extract::State(state): axum::extract::State<MockState>,
    Json(req): Json<CreateInstanceRequest>,
) -> Result<(), (StatusCode, String)> {
    let mut services = state.services.lock().unwrap();
    if !services.contains_key(&req.service_name) {
        return Err((StatusCode::NOT_FOUND, "service not found".to_string()));
    }
    if services.values().flatten().any(|i| i.name == req.name) {
        return Err((
            StatusCode::CONFLICT,
            "service instance name already exists".to_string(),
        ));
    }

    state.create_requests.lock().unwrap().push(req.clone());

    let instance = ServiceInstance {
        name: req.name,
        apps: Vec::new(),
        info: HashMap::new(),
    };
    if let Some(instances) = services.get_mut(&req.service_name) {
        instances.push(instance);
    }
    Ok(())
}

async fn remove_instance_handler(
    Path(instance): Path<String>,
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Result<(), (StatusCode, String)> {
    let mut services = state.services.lock().unwrap();
    let mut removed = false;
    for instances in services.values_mut() {
        let before = instances.len();
        instances.retain(|i| i.name != instance);
        if instances.len() != before {
            removed = true;
        }
    }

    if removed {
        Ok(())
    } else {
        Err((
            StatusCode::NOT_FOUND,
            "service instance not found".to_string(),
        ))
    }
}

async fn instance_status_handler(
    Path(instance): Path<String>,
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Result<String, (StatusCode, String)> {
    let statuses = state.statuses.lock().unwrap();
    statuses.get(&instance).cloned().ok_or((
        StatusCode::NOT_FOUND,
        "service instance not found".to_string(),
    ))
}

async fn bind_handler(
    Path((instance, app)): Path<(String, String)>,
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Result<String, (StatusCode, String)> {
    let known = state
        .services
        .lock()
        .unwrap()
        .values()
        .flatten()
        .any(|i| i.name == instance);
    if !known {
        return Err((
            StatusCode::NOT_FOUND,
            "service instance not found".to_string(),
        ));
    }

    state
        .bindings
        .lock()
        .unwrap()
        .push((instance, app.clone()));
    Ok(format!(
        "DATABASE_HOST=mongodb.internal\nDATABASE_USER={}\n",
        app
    ))
}

async fn unbind_handler(
    Path((instance, app)): Path<(String, String)>,
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Result<(), (StatusCode, String)> {
    let mut bindings = state.bindings.lock().unwrap();
    let before = bindings.len();
    bindings.retain(|(i, a)| !(*i == instance && *a == app));

    if bindings.len() == before {
        return Err((
            StatusCode::NOT_FOUND,
            "app is not bound to this service instance".to_string(),
        ));
    }
    Ok(())
}

async fn service_instances_handler(
    Path(service): Path<String>,
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Result<Json<Vec<ServiceInstance>>, (StatusCode, String)> {
    let services = state.services.lock().unwrap();
    services
        .get(&service)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "service not found".to_string()))
}

async fn service_plans_handler(
    Path(service): Path<String>,
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Result<Json<Vec<Plan>>, (StatusCode, String)> {
    if !state.services.lock().unwrap().contains_key(&service) {
        return Err((StatusCode::NOT_FOUND, "service not found".to_string()));
    }

    let plans = state.plans.lock().unwrap();
    Ok(Json(plans.get(&service).cloned().unwrap_or_default()))
}

async fn service_doc_handler(
    Path(service): Path<String>,
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Result<String, (StatusCode, String)> {
    let docs = state.docs.lock().unwrap();
    docs.get(&service)
        .cloned()
        .ok_or((StatusCode::NOT_FOUND, "service not found".to_string()))
}

async fn create_user_handler(
    axum::extract::State(state): axum::extract::State<MockState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(), (StatusCode, String)> {
    if *state.user_creation_disabled.lock().unwrap() {
        return Err((
            StatusCode::NOT_FOUND,
            "user registration is disabled".to_string(),
        ));
    }

    let mut users = state.users.lock().unwrap();
    if users.contains_key(&req.email) {
        return Err((
            StatusCode::CONFLICT,
            "this email is already registered".to_string(),
        ));
    }
    users.insert(req.email, req.password);
    Ok(())
}

async fn remove_user_handler(
    headers: HeaderMap,
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Result<(), (StatusCode, String)> {
    if !authorized(&headers) {
        return Err((StatusCode::UNAUTHORIZED, "unauthorized".to_string()));
    }

    let session = state.session_user.lock().unwrap().clone();
    state.users.lock().unwrap().remove(&session);
    Ok(())
}

async fn change_password_handler(
    headers: HeaderMap,
    axum::extract::State(state): axum::extract::State<MockState>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<(), (StatusCode, String)> {
    if !authorized(&headers) {
        return Err((StatusCode::UNAUTHORIZED, "unauthorized".to_string()));
    }

    let session = state.session_user.lock().unwrap().clone();
    let mut users = state.users.lock().unwrap();
    match users.get_mut(&session) {
        Some(current) if *current == req.old => {
            *current = req.new;
            Ok(())
        }
        Some(_) => Err((
            StatusCode::FORBIDDEN,
            "the given password didn't match the current password".to_string(),
        )),
        None => Err((StatusCode::NOT_FOUND, "user not found".to_string())),
    }
}

async fn reset_password_handler(
    Path(email): Path<String>,
    Query(params): Query<ResetPasswordQuery>,
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Result<(), (StatusCode, String)> {
    if !state.users.lock().unwrap().contains_key(&email) {
        return Err((StatusCode::NOT_FOUND, "user not found".to_string()));
    }

    state
        .reset_requests
        .lock()
        .unwrap()
        .push((email, params.token));
    Ok(())
}

async fn login_handler(
    Path(email): Path<String>,
    axum::extract::State(state): axum::extract::State<MockState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, (StatusCode, String)> {
    let valid = {
        let users = state.users.lock().unwrap();
        users
            .get(&email)
            .map(|password| *password == req.password)
            .unwrap_or(false)
    };
    if !valid {
        return Err((StatusCode::UNAUTHORIZED, "invalid credentials".to_string()));
    }

    *state.session_user.lock().unwrap() = email;
    Ok(Json(TokenResponse {
        token: MOCK_SESSION_TOKEN.to_string(),
    }))
}

async fn show_api_key_handler(
    headers: HeaderMap,
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Result<Json<String>, (StatusCode, String)> {
    if !authorized(&headers) {
        return Err((StatusCode::UNAUTHORIZED, "unauthorized".to_string()));
    }

    Ok(Json(state.api_key.lock().unwrap().clone()))
}

async fn regenerate_api_key_handler(
    headers: HeaderMap,
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Result<Json<String>, (StatusCode, String)> {
    if !authorized(&headers) {
        return Err((StatusCode::UNAUTHORIZED, "unauthorized".to_string()));
    }

    let mut serial = state.api_key_serial.lock().unwrap();
    *serial += 1;
    let key = format!("mock-api-key-{:04}", *serial);
    *state.api_key.lock().unwrap() = key.clone();
    Ok(Json(key))
}

async fn list_keys_handler(
    headers: HeaderMap,
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Result<Json<HashMap<String, String>>, (StatusCode, String)> {
    if !authorized(&headers) {
        return Err((StatusCode::UNAUTHORIZED, "unauthorized".to_string()));
    }

    Ok(Json(state.keys.lock().unwrap().clone()))
}

async fn add_key_handler(
    headers: HeaderMap,
    axum::extract::State(state): axum::extract::State<MockState>,
    Json(req): Json<AddKeyRequest>,
) -> Result<(), (StatusCode, String)> {
    if !authorized(&headers) {
        return Err((StatusCode::UNAUTHORIZED, "unauthorized".to_string()));
    }

    let mut keys = state.keys.lock().unwrap();
    if keys.contains_key(&req.name) {
        return Err((StatusCode::CONFLICT, "key name already in use".to_string()));
    }
    keys.insert(req.name, req.key);
    Ok(())
}

async fn remove_key_handler(
    headers: HeaderMap,
    axum::extract::State(state): axum::extract::State<MockState>,
    Json(req): Json<RemoveKeyRequest>,
) -> Result<(), (StatusCode, String)> {
    if !authorized(&headers) {
        return Err((StatusCode::UNAUTHORIZED, "unauthorized".to_string()));
    }

    if state.keys.lock().unwrap().remove(&req.name).is_none() {
        return Err((StatusCode::NOT_FOUND, "key not found".to_string()));
    }
    Ok(())
}

async fn list_teams_handler(
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Json<Vec<Team>> {
    let teams = state.teams.lock().unwrap();
    Json(
        teams
            .keys()
            .map(|name| Team { name: name.clone() })
            .collect(),
    )
}

async fn create_team_handler(
    axum::extract::State(state): axum::extract::State<MockState>,
    Json(req): Json<CreateTeamRequest>,
) -> Result<(), (StatusCode, String)> {
    let mut teams = state.teams.lock().unwrap();
    if teams.contains_key(&req.name) {
        return Err((StatusCode::CONFLICT, "team already exists".to_string()));
    }
    teams.insert(req.name, Vec::new());
    Ok(())
}

async fn team_detail_handler(
    Path(name): Path<String>,
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Result<Json<TeamDetail>, (StatusCode, String)> {
    let teams = state.teams.lock().unwrap();
    teams
        .get(&name)
        .map(|users| {
            Json(TeamDetail {
                name: name.clone(),
                users: users.clone(),
            })
        })
        .ok_or((StatusCode::NOT_FOUND, "team not found".to_string()))
}

async fn remove_team_handler(
    Path(name): Path<String>,
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Result<(), (StatusCode, String)> {
    if state.teams.lock().unwrap().remove(&name).is_none() {
        return Err((StatusCode::NOT_FOUND, "team not found".to_string()));
    }
    Ok(())
}

async fn add_member_handler(
    Path((name, email)): Path<(String, String)>,
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Result<(), (StatusCode, String)> {
    let mut teams = state.teams.lock().unwrap();
    if let Some(members) = teams.get_mut(&name) {
        if members.contains(&email) {
            return Err((
                StatusCode::CONFLICT,
                "user is already a member of this team".to_string(),
            ));
        }
        members.push(email);
        Ok(())
    } else {
        Err((StatusCode::NOT_FOUND, "team not found".to_string()))
    }
}

async fn remove_member_handler(
    Path((name, email)): Path<(String, String)>,
    axum::extract::State(state): axum::extract::State<MockState>,
) -> Result<(), (StatusCode, String)> {
    let mut teams = state.teams.lock().unwrap();
    if let Some(members) = teams.get_mut(&name) {
        let before = members.len();
        members.retain(|member| *member != email);
        if members.len() == before {
            return Err((
                StatusCode::NOT_FOUND,
                "user is not a member of this team".to_string(),
            ));
        }
        Ok(())
    } else {
        Err((StatusCode::NOT_FOUND, "team not found".to_string()))
    }
}

/// Prompter with pre-scripted answers
///
/// Handlers under test pop answers in the order the real prompter would
/// ask for them; running out of scripted answers fails the test instead
/// of blocking on stdin.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    confirms: VecDeque<bool>,
    passwords: VecDeque<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next confirmation question
    pub fn confirm_with(mut self, answer: bool) -> Self {
        self.confirms.push_back(answer);
        self
    }

    /// Queue an answer for the next password prompt
    pub fn password_with(mut self, password: &str) -> Self {
        self.passwords.push_back(password.to_string());
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, _question: &str) -> gantry_core::Result<bool> {
        self.confirms.pop_front().ok_or_else(|| {
            GantryError::InvalidInput("no scripted confirmation answer left".to_string())
        })
    }

    fn password(&mut self, _prompt: &str) -> gantry_core::Result<String> {
        self.passwords
            .pop_front()
            .ok_or_else(|| GantryError::InvalidInput("no scripted password left".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_control_plane_startup() {
        let server = MockControlPlane::new();
        let (server, url) = server.start().await.unwrap();

        assert!(server.port() > 0);
        assert!(url.contains(&server.port().to_string()));

        // Test basic connectivity
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/services/instances", url))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    #[tokio::test]
    async fn test_catalog_endpoint() {
        let server = MockControlPlane::new();
        let (_, url) = server.start().await.unwrap();

        let client = reqwest::Client::new();
        let catalog: Vec<ServiceCatalogEntry> = client
            .get(format!("{}/services/instances", url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].service, "mongodb");
        assert_eq!(catalog[0].instances, vec!["prod-db", "stage-db"]);
        assert_eq!(catalog[1].service, "redis");
        assert!(catalog[1].instances.is_empty());
    }

    #[tokio::test]
    async fn test_instance_create_and_remove() {
        let server = MockControlPlane::new();
        let (server, url) = server.start().await.unwrap();

        let client = reqwest::Client::new();

        // Create an instance
        let response = client
            .post(format!("{}/services/instances", url))
            .json(&CreateInstanceRequest {
                name: "cache-1".to_string(),
                service_name: "redis".to_string(),
                plan: None,
                owner: None,
            })
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());

        {
            let services = server.state().services.lock().unwrap();
            assert!(services["redis"].iter().any(|i| i.name == "cache-1"));
        }

        // Remove it again
        let response = client
            .delete(format!("{}/services/instances/cache-1", url))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());

        let services = server.state().services.lock().unwrap();
        assert!(services["redis"].is_empty());
    }

    #[tokio::test]
    async fn test_login_endpoint() {
        let server = MockControlPlane::new();
        let (_, url) = server.start().await.unwrap();

        let client = reqwest::Client::new();

        // Wrong password is rejected
        let response = client
            .post(format!("{}/users/alice@example.com/tokens", url))
            .json(&LoginRequest {
                password: "wrong".to_string(),
            })
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 401);

        // Correct password returns a token
        let response = client
            .post(format!("{}/users/alice@example.com/tokens", url))
            .json(&LoginRequest {
                password: "secret".to_string(),
            })
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());

        let body: TokenResponse = response.json().await.unwrap();
        assert_eq!(body.token, MOCK_SESSION_TOKEN);
    }

    #[tokio::test]
    async fn test_key_routes_require_bearer_token() {
        let server = MockControlPlane::new();
        let (_, url) = server.start().await.unwrap();

        let client = reqwest::Client::new();

        let response = client
            .get(format!("{}/users/keys", url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 401);

        let response = client
            .get(format!("{}/users/keys", url))
            .bearer_auth(MOCK_SESSION_TOKEN)
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());

        let keys: HashMap<String, String> = response.json().await.unwrap();
        assert!(keys.contains_key("work"));
    }

    #[tokio::test]
    async fn test_scripted_prompter_pops_in_order() {
        let mut prompter = ScriptedPrompter::new()
            .confirm_with(true)
            .confirm_with(false)
            .password_with("hunter2");

        assert!(prompter.confirm("first?").unwrap());
        assert!(!prompter.confirm("second?").unwrap());
        assert_eq!(prompter.password("Password: ").unwrap(), "hunter2");
        assert!(prompter.confirm("third?").is_err());
    }
}
