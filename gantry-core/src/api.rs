//! API request and response types
//!
//! Wire models exchanged with the Gantry control plane. Successful
//! responses are plain JSON documents; failed requests carry a
//! plain-text body describing the problem.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A provisioned instance of a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstance {
    /// Instance name, unique within its service
    pub name: String,
    /// Applications currently bound to this instance
    #[serde(default)]
    pub apps: Vec<String>,
    /// Provider-specific metadata; the key set varies between instances
    #[serde(default)]
    pub info: HashMap<String, String>,
}

/// One service in the catalog, with the caller's instances of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCatalogEntry {
    /// Service name as registered in the catalog
    pub service: String,
    /// Names of the caller's instances of this service
    #[serde(default)]
    pub instances: Vec<String>,
}

/// A plan offered by a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A team, as listed by the control plane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
}

/// A team with its member list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDetail {
    pub name: String,
    /// Email addresses of the team members
    #[serde(default)]
    pub users: Vec<String>,
}

/// Session token issued after a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Request body for creating a user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
}

/// Request body for logging in; the email travels in the URL path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Request body for changing the current user's password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub old: String,
    pub new: String,
}

/// Request body for creating a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
}

/// Request body for provisioning a service instance
///
/// `plan` and `owner` are omitted from the JSON document when unset so
/// the control plane applies its defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInstanceRequest {
    pub name: String,
    pub service_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// Request body for registering a public key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddKeyRequest {
    pub name: String,
    pub key: String,
}

/// Request body for removing a public key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveKeyRequest {
    pub name: String,
}
