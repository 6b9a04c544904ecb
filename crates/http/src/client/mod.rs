//! Voltbay API client
//!
//! One client instance owns the HTTP connection pool, the credential
//! store, the session-expiry watch and the refresh gate. Cloning is
//! cheap and shares all of them, so every clone participates in the
//! same single-flight refresh.

pub mod error;

mod auth;
mod chats;
mod orders;
mod payment;
mod pricing;
mod products;
mod refresh;
mod users;
mod wallet;

pub use chats::{DEFAULT_MESSAGE_PAGE_SIZE, DEFAULT_POLL_INTERVAL};

use error::ClientError;
use refresh::{RefreshAttempt, RefreshGate};
use reqwest::{Client, ClientBuilder, Method, Response, StatusCode, header};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use crate::types::{RefreshRequest, TokenResponse};
use voltbay_core::storage::{CredentialStore, MemoryCredentialStore};
use voltbay_core::types::TokenPair;
use voltbay_core::SessionWatch;

pub(crate) const REFRESH_PATH: &str = "/auth/refresh-token";
pub(crate) const LOGOUT_PATH: &str = "/auth/logout";

/// Paths whose 401 responses must never trigger a refresh: the refresh
/// call itself and sign-out.
fn refresh_exempt(path: &str) -> bool {
    path == REFRESH_PATH || path == LOGOUT_PATH
}

struct ClientShared {
    http: Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
    session: SessionWatch,
    refresh: RefreshGate,
}

/// Voltbay API client
#[derive(Clone)]
pub struct VoltbayClient {
    inner: Arc<ClientShared>,
}

impl VoltbayClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> VoltbayClientBuilder {
        VoltbayClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Session-expiry watch shared by all clones of this client
    pub fn session(&self) -> &SessionWatch {
        &self.inner.session
    }

    /// The credential store backing this client
    pub fn credential_store(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.inner.store)
    }

    /// Whether a credential pair is currently stored
    pub async fn is_authenticated(&self) -> bool {
        matches!(self.inner.store.load_tokens().await, Ok(Some(_)))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
        query: Option<&[(String, String)]>,
        token: Option<&str>,
    ) -> Result<Response, ClientError> {
        let mut request = self.inner.http.request(method, self.endpoint(path));
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(payload) = payload {
            request = request.json(payload);
        }
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        Ok(request.send().await?)
    }

    /// Issue a request with the stored access token attached, refreshing
    /// and replaying once on 401. Returns the final response; the status
    /// may still be an error for the caller to map.
    async fn send_raw(
        &self,
        method: Method,
        path: &str,
        payload: Option<Value>,
        query: Option<Vec<(String, String)>>,
    ) -> Result<Response, ClientError> {
        let token = self
            .inner
            .store
            .load_tokens()
            .await
            .map_err(ClientError::from)?
            .map(|pair| pair.access_token);

        let response = self
            .dispatch(
                method.clone(),
                path,
                payload.as_ref(),
                query.as_deref(),
                token.as_deref(),
            )
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED || refresh_exempt(path) {
            return Ok(response);
        }

        // One coordinated refresh, then a single replay. A 401 on the
        // replayed request is surfaced, never retried again.
        debug!(%path, "access token rejected, attempting refresh");
        let fresh = self.refresh_access_token().await?;
        self.dispatch(method, path, payload.as_ref(), query.as_deref(), Some(&fresh))
            .await
    }

    pub(crate) async fn send<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Option<Value>,
        query: Option<Vec<(String, String)>>,
    ) -> Result<T, ClientError> {
        let response = self.send_raw(method, path, payload, query).await?;
        Self::decode(response).await
    }

    /// Like [`send`] for endpoints whose success body is empty or
    /// irrelevant.
    pub(crate) async fn send_unit(
        &self,
        method: Method,
        path: &str,
        payload: Option<Value>,
        query: Option<Vec<(String, String)>>,
    ) -> Result<(), ClientError> {
        let response = self.send_raw(method, path, payload, query).await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::status_error(status, response).await)
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::status_error(status, response).await)
        }
    }

    async fn status_error(status: StatusCode, response: Response) -> ClientError {
        let body = response.text().await.unwrap_or_else(|_| status.to_string());
        let message = server_message(&body).unwrap_or(body);
        ClientError::from_status(status, message)
    }

    /// Obtain a fresh access token, coordinating with any refresh that
    /// is already in flight.
    pub(crate) async fn refresh_access_token(&self) -> Result<String, ClientError> {
        match self.inner.refresh.begin() {
            RefreshAttempt::Follower(waiter) => match waiter.await {
                Ok(Ok(token)) => Ok(token),
                Ok(Err(denied)) => Err(ClientError::SessionExpired(denied.0)),
                Err(_) => Err(ClientError::SessionExpired(
                    "token refresh was interrupted".into(),
                )),
            },
            RefreshAttempt::Leader(leader) => {
                let outcome = self.run_refresh().await;
                match outcome {
                    Ok(pair) => {
                        leader.complete(Ok(&pair.access_token));
                        Ok(pair.access_token)
                    }
                    Err(err) => {
                        leader.complete(Err(&err));
                        self.expire_session(&err).await;
                        Err(err)
                    }
                }
            }
        }
    }

    /// The actual refresh call. Runs on the bare HTTP client, outside
    /// [`send`], so a failing refresh can never re-enter the 401 path.
    async fn run_refresh(&self) -> Result<TokenPair, ClientError> {
        let Some(current) = self.inner.store.load_tokens().await? else {
            return Err(ClientError::SessionExpired(
                "no refresh token available".into(),
            ));
        };

        let response = self
            .inner
            .http
            .post(self.endpoint(REFRESH_PATH))
            .json(&RefreshRequest {
                refresh_token: current.refresh_token,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, response).await);
        }

        let tokens: TokenResponse = response.json().await?;
        let pair = TokenPair::new(tokens.access_token, tokens.refresh_token);
        self.inner.store.store_tokens(&pair).await?;
        self.inner.session.reset();
        debug!("credential pair rotated");
        Ok(pair)
    }

    /// Wipe credentials and raise the (debounced) session-expired
    /// signal.
    async fn expire_session(&self, err: &ClientError) {
        if let Err(clear_err) = self.inner.store.clear().await {
            error!(error = %clear_err, "failed to clear credentials after refresh failure");
        }
        self.inner.session.notify_expired(err.to_string());
    }
}

/// Pull a server-provided `message` field out of an error body, if the
/// body is JSON and carries one.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// Builder for VoltbayClient
#[derive(Default)]
pub struct VoltbayClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    store: Option<Arc<dyn CredentialStore>>,
    session: Option<SessionWatch>,
}

impl VoltbayClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Use a specific credential store (defaults to an in-memory store)
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use a specific session watch (defaults to a fresh one)
    pub fn session_watch(mut self, session: SessionWatch) -> Self {
        self.session = Some(session);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<VoltbayClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base_url is empty".into()));
        }

        let mut client_builder = ClientBuilder::new();
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            client_builder = client_builder.user_agent(user_agent);
        } else {
            client_builder = client_builder.user_agent("voltbay-client/0.1.0");
        }
        let http = client_builder.build()?;

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryCredentialStore::new()));
        let session = self.session.unwrap_or_default();

        Ok(VoltbayClient {
            inner: Arc::new(ClientShared {
                http,
                base_url,
                store,
                session,
                refresh: RefreshGate::new(),
            }),
        })
    }
}
