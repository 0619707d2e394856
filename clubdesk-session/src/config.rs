use clubdesk_core::ClientError;
use std::time::Duration;
use url::Url;

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
/// Where the user is sent once the session is lost.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Settings for a [`SessionClient`](crate::SessionClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    /// Per-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Login entry point reported in [`SessionEvent::Expired`](crate::SessionEvent::Expired).
    pub login_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            user_agent: concat!("clubdesk/", env!("CARGO_PKG_VERSION")).to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    /// Configuration for the backend at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// Read `CLUBDESK_API_URL` and `CLUBDESK_TIMEOUT_SECS` from the environment.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("CLUBDESK_API_URL") {
            Some(url) if !url.trim().is_empty() => Self::new(&url)?,
            _ => Self::default(),
        };

        if let Some(raw) = lookup("CLUBDESK_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ClientError::Config(format!("CLUBDESK_TIMEOUT_SECS is not a number: '{}'", raw))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the login entry point.
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// The base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an API path.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ClientError> {
    let parsed = Url::parse(raw.trim())
        .map_err(|e| ClientError::Config(format!("Invalid base URL '{}': {}", raw, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::Config(format!(
            "Unsupported scheme '{}' in base URL",
            parsed.scheme()
        )));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
