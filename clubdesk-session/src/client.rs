use crate::config::ClientConfig;
use crate::events::SessionEvent;
use crate::request::{RequestBody, RequestOptions};
use clubdesk_core::{
    ClientError, CredentialPair, KeyValueStore, Preferences, SessionState, SessionUser,
};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

/// Login endpoint.
pub const LOGIN_PATH: &str = "/auth/login/";
/// Logout endpoint.
pub const LOGOUT_PATH: &str = "/auth/logout/";
/// Token refresh endpoint.
pub const REFRESH_PATH: &str = "/auth/token/refresh/";

const EVENT_CAPACITY: usize = 16;

/// Successful answer of the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Always `true` for a successful login.
    pub success: bool,
    /// Issued credentials.
    pub tokens: CredentialPair,
    /// The logged-in user.
    pub user: SessionUser,
    /// Any other fields the backend sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}

/// Where a single call stands. `Retrying` is reachable at most once.
enum Phase {
    Trying,
    Refreshing { rejected: Option<String> },
    Retrying,
    Done(Response),
}

/// Result of waiting at the refresh gate.
#[derive(Debug, PartialEq, Eq)]
enum Renewal {
    /// This caller refreshed the token.
    Refreshed,
    /// Another caller refreshed while this one waited.
    AlreadyRenewed,
    /// The refresh call failed and this caller cleared the session.
    Failed,
    /// Another caller's refresh failed and the session is already gone.
    AlreadyExpired,
}

/// HTTP client that keeps the caller authenticated.
///
/// Every feature API sends its requests through [`SessionClient::request`],
/// which attaches the bearer token, renews it once on a 401 and retries the
/// request once with the new token.
pub struct SessionClient {
    http: reqwest::Client,
    config: ClientConfig,
    state: SessionState,
    events: broadcast::Sender<SessionEvent>,
    refresh_gate: Mutex<()>,
}

impl SessionClient {
    /// Create a client for `config`, keeping the session in `store`.
    pub fn new(config: ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_http_client(config, store, http))
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_http_client(
        config: ClientConfig,
        store: Arc<dyn KeyValueStore>,
        http: reqwest::Client,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            http,
            config,
            state: SessionState::new(store),
            events,
            refresh_gate: Mutex::new(()),
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The session entries of the store.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// UI preferences kept in the same store.
    pub fn preferences(&self) -> Preferences {
        Preferences::new(self.state.store())
    }

    /// Receive session lifecycle events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Whether an access token is stored. The token itself is not checked.
    pub async fn is_authenticated(&self) -> bool {
        match self.state.access_token().await {
            Ok(token) => token.is_some(),
            Err(e) => {
                log::warn!("Could not read access token: {}", e);
                false
            }
        }
    }

    /// The user cached at login.
    pub async fn current_user(&self) -> Result<Option<SessionUser>, ClientError> {
        self.state.user().await
    }

    /// Send a request and return its JSON body.
    ///
    /// A 401 with a refresh token available triggers one refresh and one
    /// retry; the retried response is final. If the refresh fails the session
    /// is cleared, [`SessionEvent::Expired`] is emitted and the call fails
    /// with [`ClientError::SessionExpired`].
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, ClientError> {
        let response = self.execute(path, &options).await?;
        read_json(response).await
    }

    /// [`SessionClient::request`], deserializing the body into `T`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let value = self.request(path, options).await?;
        serde_json::from_value(value).map_err(ClientError::from)
    }

    /// `GET path`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(path, RequestOptions::get()).await
    }

    /// `POST path` with a JSON body.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(path, RequestOptions::post().json(body)?).await
    }

    /// `PUT path` with a JSON body.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(path, RequestOptions::put().json(body)?).await
    }

    /// `DELETE path`.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(path, RequestOptions::delete()).await
    }

    /// Renew the access token with the stored refresh token.
    ///
    /// Returns `false` on any failure; storage is only written on success and
    /// the refresh token itself is never replaced.
    pub async fn refresh(&self) -> bool {
        let _gate = self.refresh_gate.lock().await;
        self.refresh_unlocked().await
    }

    /// Log in and store the issued tokens and user, replacing any previous session.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let url = self.config.endpoint(LOGIN_PATH);
        log::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        let accepted = body.get("success").and_then(Value::as_bool) == Some(true);
        if !status.is_success() || !accepted {
            let message = message_field(&body, "error")
                .unwrap_or_else(|| "Invalid credentials".to_string());
            log::info!("Login rejected for {} ({})", username, status.as_u16());
            return Err(ClientError::InvalidCredentials(message));
        }

        let login: LoginResponse = serde_json::from_value(body)?;
        self.state.set_tokens(&login.tokens).await?;
        self.state.set_user(&login.user).await?;

        log::info!("Logged in as {}", login.user.username);
        let _ = self.events.send(SessionEvent::LoggedIn {
            user: login.user.clone(),
        });
        Ok(login)
    }

    /// Tell the backend, then clear the session whatever it answered.
    ///
    /// Only a failure to clear the store is reported.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if let Err(e) = self.request(LOGOUT_PATH, RequestOptions::post()).await {
            log::debug!("Logout call failed, clearing session anyway: {}", e);
        }
        self.state.clear().await?;
        log::info!("Logged out");
        let _ = self.events.send(SessionEvent::LoggedOut);
        Ok(())
    }

    async fn execute(&self, path: &str, options: &RequestOptions) -> Result<Response, ClientError> {
        let mut phase = Phase::Trying;
        loop {
            phase = match phase {
                Phase::Trying => {
                    let token = self.state.access_token().await?;
                    let response = self.dispatch(path, options, token.as_deref()).await?;
                    if response.status() != StatusCode::UNAUTHORIZED
                        || self.state.refresh_token().await?.is_none()
                    {
                        Phase::Done(response)
                    } else {
                        Phase::Refreshing { rejected: token }
                    }
                }
                Phase::Refreshing { rejected } => match self.renew(rejected.as_deref()).await {
                    Renewal::Refreshed | Renewal::AlreadyRenewed => Phase::Retrying,
                    Renewal::Failed | Renewal::AlreadyExpired => {
                        return Err(ClientError::SessionExpired)
                    }
                },
                Phase::Retrying => {
                    let token = self.state.access_token().await?;
                    Phase::Done(self.dispatch(path, options, token.as_deref()).await?)
                }
                Phase::Done(response) => return Ok(response),
            };
        }
    }

    async fn dispatch(
        &self,
        path: &str,
        options: &RequestOptions,
        token: Option<&str>,
    ) -> Result<Response, ClientError> {
        let url = self.config.endpoint(path);
        log::debug!(
            "{} {} (token: {})",
            options.method,
            url,
            if token.is_some() { "yes" } else { "no" }
        );

        let mut builder = self
            .http
            .request(options.method.clone(), &url)
            .headers(options.header_map(token)?);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        builder = match &options.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(serde_json::to_vec(value)?),
            RequestBody::Multipart(form) => builder.multipart(form.to_form()?),
        };

        let response = builder.send().await?;
        log::debug!("{} {} -> {}", options.method, url, response.status().as_u16());
        Ok(response)
    }

    /// Single-flight refresh: concurrent callers queue on the gate, and a
    /// caller whose rejected token has already been replaced skips the
    /// network call. A failed refresh clears the session before the gate is
    /// released.
    async fn renew(&self, rejected: Option<&str>) -> Renewal {
        let _gate = self.refresh_gate.lock().await;

        match self.state.refresh_token().await {
            Ok(Some(_)) => {}
            Ok(None) => return Renewal::AlreadyExpired,
            Err(e) => {
                log::warn!("Could not read refresh token: {}", e);
                self.expire().await;
                return Renewal::Failed;
            }
        }

        if let Ok(Some(current)) = self.state.access_token().await {
            if Some(current.as_str()) != rejected {
                log::debug!("Access token was renewed by a concurrent request");
                return Renewal::AlreadyRenewed;
            }
        }

        if self.refresh_unlocked().await {
            Renewal::Refreshed
        } else {
            self.expire().await;
            Renewal::Failed
        }
    }

    async fn refresh_unlocked(&self) -> bool {
        let refresh = match self.state.refresh_token().await {
            Ok(Some(token)) => token,
            Ok(None) => return false,
            Err(e) => {
                log::warn!("Could not read refresh token: {}", e);
                return false;
            }
        };

        let url = self.config.endpoint(REFRESH_PATH);
        log::debug!("POST {}", url);
        let response = match self
            .http
            .post(&url)
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Token refresh failed: {}", e);
                return false;
            }
        };

        if !response.status().is_success() {
            log::warn!("Token refresh rejected with status {}", response.status().as_u16());
            return false;
        }

        let body: RefreshResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Token refresh returned an unreadable body: {}", e);
                return false;
            }
        };

        if let Err(e) = self.state.set_access_token(&body.access).await {
            log::warn!("Could not store refreshed access token: {}", e);
            return false;
        }

        log::info!("Access token refreshed");
        let _ = self.events.send(SessionEvent::Refreshed);
        true
    }

    async fn expire(&self) {
        if let Err(e) = self.state.clear().await {
            log::warn!("Could not clear expired session: {}", e);
        }
        log::warn!("Session expired, login required at {}", self.config.login_path);
        let _ = self.events.send(SessionEvent::Expired {
            redirect_to: self.config.login_path.clone(),
        });
    }
}

async fn read_json(response: Response) -> Result<Value, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        return Err(error_from_body(status, &bytes));
    }
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(ClientError::from)
}

fn error_from_body(status: StatusCode, bytes: &[u8]) -> ClientError {
    let message = match serde_json::from_slice::<Value>(bytes) {
        Ok(body) => message_field(&body, "error")
            .or_else(|| message_field(&body, "detail"))
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16())),
        Err(_) => "Request failed".to_string(),
    };
    ClientError::Request {
        status: status.as_u16(),
        message,
    }
}

fn message_field(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_prefers_error_then_detail() {
        let err = error_from_body(
            StatusCode::BAD_REQUEST,
            json!({"error": "Member not found", "detail": "x"}).to_string().as_bytes(),
        );
        assert_eq!(err.to_string(), "Member not found");

        let err = error_from_body(
            StatusCode::FORBIDDEN,
            json!({"detail": "Not allowed"}).to_string().as_bytes(),
        );
        assert_eq!(err.to_string(), "Not allowed");
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn error_falls_back_to_status() {
        let err = error_from_body(StatusCode::NOT_FOUND, b"{}");
        assert_eq!(err.to_string(), "Request failed with status 404");

        let err = error_from_body(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");
        assert_eq!(err.to_string(), "Request failed");
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn login_response_keeps_extra_fields() {
        let login: LoginResponse = serde_json::from_value(json!({
            "success": true,
            "tokens": {"access": "A1", "refresh": "R1"},
            "user": {"id": 1, "username": "admin", "email": "a@club.test", "is_staff": true},
            "message": "welcome"
        }))
        .unwrap();
        assert_eq!(login.tokens.access, "A1");
        assert_eq!(login.extra.get("message"), Some(&json!("welcome")));
    }
}
