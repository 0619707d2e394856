use clubdesk_core::{ClientError, SessionUser};
use clubdesk_session::SessionClient;
use std::sync::Arc;

/// Current-user endpoint.
pub const ME_PATH: &str = "/auth/me/";

/// Authentication endpoints that go through the session.
///
/// Login and logout live on [`SessionClient`] itself since they own the tokens.
#[derive(Clone)]
pub struct AuthApi {
    client: Arc<SessionClient>,
}

impl AuthApi {
    /// Wrap a session client.
    pub fn new(client: Arc<SessionClient>) -> Self {
        Self { client }
    }

    /// Ask the backend who the access token belongs to.
    pub async fn me(&self) -> Result<SessionUser, ClientError> {
        self.client.get(ME_PATH).await
    }
}
