use crate::models::{Ack, Created};
use chrono::NaiveDate;
use clubdesk_core::ClientError;
use clubdesk_session::SessionClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A member enrolled in an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Backend id.
    pub id: i64,
    /// Enrolled member.
    pub membre_id: i64,
    /// Member family name.
    pub membre_nom: String,
    /// Member given name.
    pub membre_prenom: String,
    /// Activity.
    pub activite_id: i64,
    /// Activity name.
    pub activite_nom: String,
    /// Day the enrollment was recorded.
    pub date_inscription: NaiveDate,
}

/// A new enrollment. A member can be enrolled in a given activity only once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEnrollment {
    /// Member to enroll.
    pub membre_id: i64,
    /// Activity to enroll in.
    pub activite_id: i64,
}

/// Moves an enrollment to another member or activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentPatch {
    /// New member.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membre_id: Option<i64>,
    /// New activity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activite_id: Option<i64>,
}

/// `/enrollments/` endpoints.
#[derive(Clone)]
pub struct EnrollmentsApi {
    client: Arc<SessionClient>,
}

impl EnrollmentsApi {
    /// Wrap a session client.
    pub fn new(client: Arc<SessionClient>) -> Self {
        Self { client }
    }

    /// List all enrollments.
    pub async fn list(&self) -> Result<Vec<Enrollment>, ClientError> {
        self.client.get("/enrollments/").await
    }

    /// Fetch one enrollment.
    pub async fn get(&self, id: i64) -> Result<Enrollment, ClientError> {
        self.client.get(&format!("/enrollments/{}/", id)).await
    }

    /// Enroll a member.
    pub async fn create(&self, enrollment: &NewEnrollment) -> Result<Created, ClientError> {
        self.client.post("/enrollments/", enrollment).await
    }

    /// Change an enrollment.
    pub async fn update(&self, id: i64, patch: &EnrollmentPatch) -> Result<Ack, ClientError> {
        self.client.put(&format!("/enrollments/{}/", id), patch).await
    }

    /// Remove an enrollment.
    pub async fn delete(&self, id: i64) -> Result<Ack, ClientError> {
        self.client.delete(&format!("/enrollments/{}/", id)).await
    }
}
