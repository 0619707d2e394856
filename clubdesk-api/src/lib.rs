//! # Clubdesk API
//!
//! Typed access to the club backend: members, activities, enrollments,
//! subscriptions, class sessions and statistics. Every call goes through a
//! shared [`SessionClient`], so token renewal is handled in one place.
//!
//! ```no_run
//! # async fn run() -> Result<(), clubdesk_core::ClientError> {
//! use clubdesk_api::{ClubApi, members::MemberQuery};
//! use clubdesk_core::MemoryStore;
//! use clubdesk_session::{ClientConfig, SessionClient};
//! use std::sync::Arc;
//!
//! let client = SessionClient::new(ClientConfig::default(), Arc::new(MemoryStore::new()))?;
//! let api = ClubApi::new(Arc::new(client));
//! api.session().login("admin", "secret").await?;
//! let members = api.members().list(&MemberQuery::default()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Current-user endpoint.
pub mod auth;
/// Activities and their photos.
pub mod activities;
/// Class sessions.
pub mod class_sessions;
/// Enrollments of members in activities.
pub mod enrollments;
/// Members.
pub mod members;
/// Payload types shared by several resources.
pub mod models;
/// Weekly calendar built from class sessions.
pub mod schedule;
/// Aggregate statistics.
pub mod stats;
/// Membership subscriptions.
pub mod subscriptions;

use clubdesk_session::SessionClient;
use std::sync::Arc;

pub use activities::ActivitiesApi;
pub use auth::AuthApi;
pub use class_sessions::ClassSessionsApi;
pub use enrollments::EnrollmentsApi;
pub use members::MembersApi;
pub use schedule::WeekSchedule;
pub use stats::StatsApi;
pub use subscriptions::SubscriptionsApi;

/// Entry point bundling every resource API over one session.
#[derive(Clone)]
pub struct ClubApi {
    client: Arc<SessionClient>,
}

impl ClubApi {
    /// Wrap a session client.
    pub fn new(client: Arc<SessionClient>) -> Self {
        Self { client }
    }

    /// The shared session client.
    pub fn session(&self) -> &Arc<SessionClient> {
        &self.client
    }

    /// Current-user endpoint.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.client.clone())
    }

    /// Members.
    pub fn members(&self) -> MembersApi {
        MembersApi::new(self.client.clone())
    }

    /// Activities.
    pub fn activities(&self) -> ActivitiesApi {
        ActivitiesApi::new(self.client.clone())
    }

    /// Enrollments.
    pub fn enrollments(&self) -> EnrollmentsApi {
        EnrollmentsApi::new(self.client.clone())
    }

    /// Subscriptions.
    pub fn subscriptions(&self) -> SubscriptionsApi {
        SubscriptionsApi::new(self.client.clone())
    }

    /// Class sessions.
    pub fn class_sessions(&self) -> ClassSessionsApi {
        ClassSessionsApi::new(self.client.clone())
    }

    /// Statistics.
    pub fn stats(&self) -> StatsApi {
        StatsApi::new(self.client.clone())
    }
}
