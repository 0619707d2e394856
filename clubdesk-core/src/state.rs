use crate::error::ClientError;
use crate::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
/// Storage key of the JSON-serialized [`SessionUser`].
pub const USER_KEY: &str = "user";

/// The access/refresh token pair issued at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    /// Short-lived bearer credential.
    pub access: String,
    /// Long-lived credential used only to obtain a new access token.
    pub refresh: String,
}

/// Snapshot of the logged-in user, cached at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Backend user id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Contact email, possibly empty.
    #[serde(default)]
    pub email: String,
    /// Whether the user may use the admin API.
    #[serde(default)]
    pub is_staff: bool,
}

/// Typed view over the session entries of a [`KeyValueStore`].
#[derive(Clone)]
pub struct SessionState {
    store: Arc<dyn KeyValueStore>,
}

impl SessionState {
    /// Wrap a store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    /// The current access token, if any.
    pub async fn access_token(&self) -> Result<Option<String>, ClientError> {
        self.store.get(ACCESS_TOKEN_KEY).await
    }

    /// The current refresh token, if any.
    pub async fn refresh_token(&self) -> Result<Option<String>, ClientError> {
        self.store.get(REFRESH_TOKEN_KEY).await
    }

    /// Store both tokens.
    pub async fn set_tokens(&self, tokens: &CredentialPair) -> Result<(), ClientError> {
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access).await?;
        self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh).await
    }

    /// Replace only the access token; the refresh token is left as is.
    pub async fn set_access_token(&self, access: &str) -> Result<(), ClientError> {
        self.store.set(ACCESS_TOKEN_KEY, access).await
    }

    /// The cached user snapshot.
    ///
    /// An unreadable snapshot is treated as absent.
    pub async fn user(&self) -> Result<Option<SessionUser>, ClientError> {
        let Some(raw) = self.store.get(USER_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                log::warn!("Ignoring unreadable cached user: {}", e);
                Ok(None)
            }
        }
    }

    /// Cache the user snapshot.
    pub async fn set_user(&self, user: &SessionUser) -> Result<(), ClientError> {
        let raw = serde_json::to_string(user)
            .map_err(|e| ClientError::Store(format!("User serialization error: {}", e)))?;
        self.store.set(USER_KEY, &raw).await
    }

    /// Remove the tokens and the cached user. Other entries are kept.
    pub async fn clear(&self) -> Result<(), ClientError> {
        self.store.remove(ACCESS_TOKEN_KEY).await?;
        self.store.remove(REFRESH_TOKEN_KEY).await?;
        self.store.remove(USER_KEY).await
    }
}
