//! HTTP client for communicating with the Gantry control plane.

use anyhow::{Context, Result};
use gantry_core::{api, GantryError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

/// Normalize a target URL by removing trailing slashes.
fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// HTTP client for communicating with the Gantry control plane's REST API.
///
/// This client handles all HTTP communication with the control plane,
/// including:
/// - Automatic retries on connection failures
/// - Timeout handling
/// - Bearer token authentication
/// - Error response processing
///
/// # Retry Logic
///
/// The client automatically retries requests that fail due to:
/// - Connection errors (network unreachable, connection refused)
/// - Timeout errors
/// - Generic request errors
///
/// Retries use exponential backoff, with the delay increasing on each attempt.
/// Client errors (4xx) and server errors (5xx) are not retried; their
/// plain-text body becomes the error message.
///
/// # Examples
///
/// ```no_run
/// use gantryctl::client::ApiClient;
/// use std::time::Duration;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = ApiClient::with_config(
///     "http://gantry.example.com",
///     10,  // timeout in seconds
///     3,   // max retries
///     Duration::from_millis(500),  // initial retry delay
///     Some("session-token".to_string()),
/// )?;
///
/// let teams = client.list_teams().await?;
/// println!("{} teams", teams.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    max_retries: u32,
    retry_delay: Duration,
}

impl ApiClient {
    /// Create a new client with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `target` - Base URL of the control plane (e.g., "https://gantry.example.com")
    /// * `timeout_secs` - Request timeout in seconds
    /// * `max_retries` - Maximum number of retry attempts for failed requests
    /// * `retry_delay` - Initial delay between retries (uses exponential backoff)
    /// * `token` - Session token to send as a bearer credential, if logged in
    ///
    /// # Errors
    ///
    /// Returns an error if no target is configured or the HTTP client
    /// cannot be created.
    pub fn with_config(
        target: &str,
        timeout_secs: u64,
        max_retries: u32,
        retry_delay: Duration,
        token: Option<String>,
    ) -> Result<Self> {
        if target.is_empty() {
            return Err(GantryError::NoTarget.into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("gantryctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: normalize_url(target),
            token,
            max_retries,
            retry_delay,
        })
    }

    /// Attach the bearer credential, when one is present.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Process an HTTP response, returning the raw success body.
    ///
    /// The control plane reports failures as a plain-text body, so
    /// non-2xx responses surface that body in the error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The HTTP status code indicates failure (4xx or 5xx)
    /// - The response body cannot be read
    async fn handle_response(response: Response, endpoint: &str) -> Result<String> {
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", endpoint))?;

        if !status.is_success() {
            let message = if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                text.trim().to_string()
            };
            return Err(GantryError::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        Ok(text)
    }

    /// Execute an HTTP request with automatic retry logic.
    ///
    /// Only retry on connection-related errors (connection failures, timeouts).
    /// Client errors (4xx) and server errors (5xx) are not retried.
    ///
    /// Uses exponential backoff: retry delay increases with each attempt
    /// (delay * (attempt + 1)).
    ///
    /// # Errors
    ///
    /// Returns an error if all retry attempts fail.
    async fn execute_with_retry<F, Fut>(&self, endpoint: &str, request_fn: F) -> Result<String>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<Response, reqwest::Error>>,
    {
        let mut last_error = None;
        let mut attempts = 0;

        for attempt in 0..=self.max_retries {
            attempts = attempt + 1;
            match request_fn().await {
                Ok(response) => {
                    return Self::handle_response(response, endpoint).await;
                }
                Err(e) => {
                    // Only retry on connection errors, not client errors
                    let should_retry = e.is_connect() || e.is_timeout() || e.is_request();
                    last_error = Some(e);

                    // Don't retry on the last attempt
                    if attempt < self.max_retries && should_retry {
                        tokio::time::sleep(self.retry_delay * (attempt + 1)).await;
                        continue;
                    } else {
                        break;
                    }
                }
            }
        }

        Err(anyhow::anyhow!(
            "Failed to reach {} after {} attempts: {}",
            endpoint,
            attempts,
            last_error.unwrap()
        ))
    }

    /// Execute a request with retries and decode the JSON body.
    async fn fetch_json<T, F, Fut>(&self, endpoint: &str, request_fn: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<Response, reqwest::Error>>,
    {
        let text = self.execute_with_retry(endpoint, request_fn).await?;

        serde_json::from_str(&text)
            .map_err(GantryError::from)
            .with_context(|| format!("Failed to parse JSON response from {}", endpoint))
    }

    // =========================================================================
    // Service operations
    // =========================================================================

    /// Retrieve the service catalog with the caller's instances of each service.
    pub async fn list_instances(&self) -> Result<Vec<api::ServiceCatalogEntry>> {
        let url = format!("{}/services/instances", self.base_url);
        let endpoint = "services/instances";

        self.fetch_json(endpoint, || self.authorize(self.client.get(&url)).send())
            .await
    }

    /// Provision a new service instance.
    ///
    /// # Arguments
    ///
    /// * `name` - Name for the new instance
    /// * `service` - Service to provision it from
    /// * `plan` - Plan to use; the control plane picks its default when unset
    /// * `owner` - Team that owns the instance, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the instance or service name is empty or whitespace.
    pub async fn create_instance(
        &self,
        name: &str,
        service: &str,
        plan: Option<String>,
        owner: Option<String>,
    ) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow::anyhow!("Instance name cannot be empty"));
        }
        if service.trim().is_empty() {
            return Err(anyhow::anyhow!("Service name cannot be empty"));
        }

        let url = format!("{}/services/instances", self.base_url);
        let request = api::CreateInstanceRequest {
            name: name.to_string(),
            service_name: service.to_string(),
            plan,
            owner,
        };
        let endpoint = "services/instances";

        let response = self
            .authorize(self.client.post(&url).json(&request))
            .send()
            .await
            .with_context(|| format!("Failed to send create instance request to {}", endpoint))?;

        Self::handle_response(response, endpoint).await.map(|_| ())
    }

    /// Remove a service instance by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance name is empty or whitespace.
    pub async fn remove_instance(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow::anyhow!("Instance name cannot be empty"));
        }

        let url = format!(
            "{}/services/instances/{}",
            self.base_url,
            urlencoding::encode(name)
        );
        let endpoint = &format!("services/instances/{}", name);

        self.execute_with_retry(endpoint, || self.authorize(self.client.delete(&url)).send())
            .await
            .map(|_| ())
    }

    /// Retrieve the caller's instances of one service, with their metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the service name is empty or whitespace.
    pub async fn service_instances(&self, service: &str) -> Result<Vec<api::ServiceInstance>> {
        if service.trim().is_empty() {
            return Err(anyhow::anyhow!("Service name cannot be empty"));
        }

        let url = format!("{}/services/{}", self.base_url, urlencoding::encode(service));
        let endpoint = &format!("services/{}", service);

        self.fetch_json(endpoint, || self.authorize(self.client.get(&url)).send())
            .await
    }

    /// Retrieve the plans offered by a service.
    ///
    /// # Errors
    ///
    /// Returns an error if the service name is empty or whitespace.
    pub async fn service_plans(&self, service: &str) -> Result<Vec<api::Plan>> {
        if service.trim().is_empty() {
            return Err(anyhow::anyhow!("Service name cannot be empty"));
        }

        let url = format!(
            "{}/services/{}/plans",
            self.base_url,
            urlencoding::encode(service)
        );
        let endpoint = &format!("services/{}/plans", service);

        self.fetch_json(endpoint, || self.authorize(self.client.get(&url)).send())
            .await
    }

    /// Retrieve the status line reported for a service instance.
    ///
    /// # Returns
    ///
    /// Returns the plain-text status body exactly as the control plane
    /// sent it.
    pub async fn instance_status(&self, name: &str) -> Result<String> {
        if name.trim().is_empty() {
            return Err(anyhow::anyhow!("Instance name cannot be empty"));
        }

        let url = format!(
            "{}/services/instances/{}/status",
            self.base_url,
            urlencoding::encode(name)
        );
        let endpoint = &format!("services/instances/{}/status", name);

        self.execute_with_retry(endpoint, || self.authorize(self.client.get(&url)).send())
            .await
    }

    /// Retrieve the documentation text published for a service.
    pub async fn service_doc(&self, service: &str) -> Result<String> {
        if service.trim().is_empty() {
            return Err(anyhow::anyhow!("Service name cannot be empty"));
        }

        let url = format!(
            "{}/services/{}/doc",
            self.base_url,
            urlencoding::encode(service)
        );
        let endpoint = &format!("services/{}/doc", service);

        self.execute_with_retry(endpoint, || self.authorize(self.client.get(&url)).send())
            .await
    }

    /// Bind a service instance to an application.
    ///
    /// # Returns
    ///
    /// Returns the plain-text body from the control plane, which lists
    /// the environment variables exposed to the application.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance or application name is empty or
    /// whitespace.
    pub async fn bind_instance(&self, instance: &str, app: &str) -> Result<String> {
        if instance.trim().is_empty() {
            return Err(anyhow::anyhow!("Instance name cannot be empty"));
        }
        if app.trim().is_empty() {
            return Err(anyhow::anyhow!("Application name cannot be empty"));
        }

        let url = format!(
            "{}/services/instances/{}/{}",
            self.base_url,
            urlencoding::encode(instance),
            urlencoding::encode(app)
        );
        let endpoint = &format!("services/instances/{}/{}", instance, app);

        self.execute_with_retry(endpoint, || self.authorize(self.client.put(&url)).send())
            .await
    }

    /// Unbind a service instance from an application.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance or application name is empty or
    /// whitespace.
    pub async fn unbind_instance(&self, instance: &str, app: &str) -> Result<()> {
        if instance.trim().is_empty() {
            return Err(anyhow::anyhow!("Instance name cannot be empty"));
        }
        if app.trim().is_empty() {
            return Err(anyhow::anyhow!("Application name cannot be empty"));
        }

        let url = format!(
            "{}/services/instances/{}/{}",
            self.base_url,
            urlencoding::encode(instance),
            urlencoding::encode(app)
        );
        let endpoint = &format!("services/instances/{}/{}", instance, app);

        self.execute_with_retry(endpoint, || self.authorize(self.client.delete(&url)).send())
            .await
            .map(|_| ())
    }

    // =========================================================================
    // User and session operations
    // =========================================================================

    /// Create a new user account.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is empty or whitespace. A control
    /// plane with self-service signup disabled answers 404 or 405;
    /// callers can inspect the [`GantryError::Api`] status for
    /// that case.
    pub async fn create_user(&self, email: &str, password: &str) -> Result<()> {
        if email.trim().is_empty() {
            return Err(anyhow::anyhow!("Email cannot be empty"));
        }

        let url = format!("{}/users", self.base_url);
        let request = api::CreateUserRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let endpoint = "users";

        let response = self
            .authorize(self.client.post(&url).json(&request))
            .send()
            .await
            .with_context(|| format!("Failed to send create user request to {}", endpoint))?;

        Self::handle_response(response, endpoint).await.map(|_| ())
    }

    /// Remove the authenticated user's account.
    pub async fn remove_user(&self) -> Result<()> {
        let url = format!("{}/users", self.base_url);
        let endpoint = "users";

        self.execute_with_retry(endpoint, || self.authorize(self.client.delete(&url)).send())
            .await
            .map(|_| ())
    }

    /// Change the authenticated user's password.
    pub async fn change_password(&self, old: &str, new: &str) -> Result<()> {
        let url = format!("{}/users/password", self.base_url);
        let request = api::ChangePasswordRequest {
            old: old.to_string(),
            new: new.to_string(),
        };
        let endpoint = "users/password";

        let response = self
            .authorize(self.client.put(&url).json(&request))
            .send()
            .await
            .with_context(|| format!("Failed to send change password request to {}", endpoint))?;

        Self::handle_response(response, endpoint).await.map(|_| ())
    }

    /// Start or finish a password reset.
    ///
    /// Without a token this starts the process and the control plane
    /// mails a reset token; with one it completes the reset.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is empty or whitespace.
    pub async fn reset_password(&self, email: &str, token: Option<&str>) -> Result<()> {
        if email.trim().is_empty() {
            return Err(anyhow::anyhow!("Email cannot be empty"));
        }

        let mut url = format!(
            "{}/users/{}/password",
            self.base_url,
            urlencoding::encode(email)
        );
        if let Some(token) = token {
            url.push_str(&format!("?token={}", urlencoding::encode(token)));
        }
        let endpoint = &format!("users/{}/password", email);

        self.execute_with_retry(endpoint, || self.authorize(self.client.post(&url)).send())
            .await
            .map(|_| ())
    }

    /// Exchange an email and password for a session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is empty or whitespace, or the
    /// credentials are rejected.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        if email.trim().is_empty() {
            return Err(anyhow::anyhow!("Email cannot be empty"));
        }

        let url = format!("{}/users/{}/tokens", self.base_url, urlencoding::encode(email));
        let request = api::LoginRequest {
            password: password.to_string(),
        };
        let endpoint = &format!("users/{}/tokens", email);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to send login request to {}", endpoint))?;

        let text = Self::handle_response(response, endpoint).await?;
        let token: api::TokenResponse = serde_json::from_str(&text)
            .map_err(GantryError::from)
            .with_context(|| format!("Failed to parse JSON response from {}", endpoint))?;

        Ok(token.token)
    }

    /// Retrieve the authenticated user's permanent API key.
    pub async fn show_api_key(&self) -> Result<String> {
        let url = format!("{}/users/api-key", self.base_url);
        let endpoint = "users/api-key";

        self.fetch_json(endpoint, || self.authorize(self.client.get(&url)).send())
            .await
    }

    /// Invalidate the current API key and issue a new one.
    pub async fn regenerate_api_key(&self) -> Result<String> {
        let url = format!("{}/users/api-key", self.base_url);
        let endpoint = "users/api-key";

        self.fetch_json(endpoint, || self.authorize(self.client.post(&url)).send())
            .await
    }

    // =========================================================================
    // Team operations
    // =========================================================================

    /// Create a new team owned by the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the team name is empty or whitespace.
    pub async fn create_team(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow::anyhow!("Team name cannot be empty"));
        }

        let url = format!("{}/teams", self.base_url);
        let request = api::CreateTeamRequest {
            name: name.to_string(),
        };
        let endpoint = "teams";

        let response = self
            .authorize(self.client.post(&url).json(&request))
            .send()
            .await
            .with_context(|| format!("Failed to send create team request to {}", endpoint))?;

        Self::handle_response(response, endpoint).await.map(|_| ())
    }

    /// Remove a team by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the team name is empty or whitespace.
    pub async fn remove_team(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow::anyhow!("Team name cannot be empty"));
        }

        let url = format!("{}/teams/{}", self.base_url, urlencoding::encode(name));
        let endpoint = &format!("teams/{}", name);

        self.execute_with_retry(endpoint, || self.authorize(self.client.delete(&url)).send())
            .await
            .map(|_| ())
    }

    /// Retrieve the teams the authenticated user belongs to.
    pub async fn list_teams(&self) -> Result<Vec<api::Team>> {
        let url = format!("{}/teams", self.base_url);
        let endpoint = "teams";

        self.fetch_json(endpoint, || self.authorize(self.client.get(&url)).send())
            .await
    }

    /// Retrieve one team with its member list.
    ///
    /// # Errors
    ///
    /// Returns an error if the team name is empty or whitespace.
    pub async fn team_detail(&self, name: &str) -> Result<api::TeamDetail> {
        if name.trim().is_empty() {
            return Err(anyhow::anyhow!("Team name cannot be empty"));
        }

        let url = format!("{}/teams/{}", self.base_url, urlencoding::encode(name));
        let endpoint = &format!("teams/{}", name);

        self.fetch_json(endpoint, || self.authorize(self.client.get(&url)).send())
            .await
    }

    /// Add a user to a team.
    ///
    /// # Errors
    ///
    /// Returns an error if the team name or email is empty or whitespace.
    pub async fn add_team_member(&self, team: &str, email: &str) -> Result<()> {
        if team.trim().is_empty() {
            return Err(anyhow::anyhow!("Team name cannot be empty"));
        }
        if email.trim().is_empty() {
            return Err(anyhow::anyhow!("Email cannot be empty"));
        }

        let url = format!(
            "{}/teams/{}/{}",
            self.base_url,
            urlencoding::encode(team),
            urlencoding::encode(email)
        );
        let endpoint = &format!("teams/{}/{}", team, email);

        self.execute_with_retry(endpoint, || self.authorize(self.client.put(&url)).send())
            .await
            .map(|_| ())
    }

    /// Remove a user from a team.
    ///
    /// # Errors
    ///
    /// Returns an error if the team name or email is empty or whitespace.
    pub async fn remove_team_member(&self, team: &str, email: &str) -> Result<()> {
        if team.trim().is_empty() {
            return Err(anyhow::anyhow!("Team name cannot be empty"));
        }
        if email.trim().is_empty() {
            return Err(anyhow::anyhow!("Email cannot be empty"));
        }

        let url = format!(
            "{}/teams/{}/{}",
            self.base_url,
            urlencoding::encode(team),
            urlencoding::encode(email)
        );
        let endpoint = &format!("teams/{}/{}", team, email);

        self.execute_with_retry(endpoint, || self.authorize(self.client.delete(&url)).send())
            .await
            .map(|_| ())
    }

    // =========================================================================
    // Public key operations
    // =========================================================================

    /// Register a public key under a name.
    ///
    /// # Errors
    ///
    /// Returns an error if the key name or material is empty or whitespace.
    pub async fn add_key(&self, name: &str, key: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow::anyhow!("Key name cannot be empty"));
        }
        if key.trim().is_empty() {
            return Err(anyhow::anyhow!("Key material cannot be empty"));
        }

        let url = format!("{}/users/keys", self.base_url);
        let request = api::AddKeyRequest {
            name: name.to_string(),
            key: key.to_string(),
        };
        let endpoint = "users/keys";

        let response = self
            .authorize(self.client.post(&url).json(&request))
            .send()
            .await
            .with_context(|| format!("Failed to send add key request to {}", endpoint))?;

        Self::handle_response(response, endpoint).await.map(|_| ())
    }

    /// Remove a public key by name.
    ///
    /// The name travels in the request body, not the URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the key name is empty or whitespace.
    pub async fn remove_key(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow::anyhow!("Key name cannot be empty"));
        }

        let url = format!("{}/users/keys", self.base_url);
        let request = api::RemoveKeyRequest {
            name: name.to_string(),
        };
        let endpoint = "users/keys";

        let response = self
            .authorize(self.client.delete(&url).json(&request))
            .send()
            .await
            .with_context(|| format!("Failed to send remove key request to {}", endpoint))?;

        Self::handle_response(response, endpoint).await.map(|_| ())
    }

    /// Retrieve the authenticated user's keys as a name-to-material map.
    pub async fn list_keys(&self) -> Result<HashMap<String, String>> {
        let url = format!("{}/users/keys", self.base_url);
        let endpoint = "users/keys";

        self.fetch_json(endpoint, || self.authorize(self.client.get(&url)).send())
            .await
    }
}
