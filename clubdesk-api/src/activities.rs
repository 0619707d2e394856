use crate::models::{Ack, Created};
use clubdesk_core::ClientError;
use clubdesk_session::{FilePart, MultipartBody, RequestOptions, SessionClient};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Largest photo accepted for upload.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// An activity offered by the club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Backend id.
    pub id: i64,
    /// Unique short code, e.g. `YOGA`.
    pub code_act: String,
    /// Display name.
    pub nom_act: String,
    /// Monthly fee.
    pub tarif_mensuel: f64,
    /// Maximum number of enrolled members.
    pub capacite: u32,
    /// URL of the photo, if one was uploaded.
    #[serde(default)]
    pub photo: Option<String>,
}

/// Fields of a new activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewActivity {
    /// Unique short code; sent upper-cased.
    pub code_act: String,
    /// Display name.
    pub nom_act: String,
    /// Monthly fee.
    pub tarif_mensuel: f64,
    /// Maximum number of enrolled members.
    pub capacite: u32,
}

impl NewActivity {
    fn normalized(&self) -> Self {
        Self {
            code_act: self.code_act.trim().to_uppercase(),
            ..self.clone()
        }
    }
}

/// Partial update of an activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityPatch {
    /// Unique short code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_act: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom_act: Option<String>,
    /// Monthly fee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tarif_mensuel: Option<f64>,
    /// Maximum number of enrolled members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacite: Option<u32>,
}

/// An image to attach to an activity.
#[derive(Debug, Clone)]
pub struct Photo {
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`.
    pub mime: Option<String>,
    /// Image bytes.
    pub bytes: Vec<u8>,
}

impl Photo {
    fn validate(&self) -> Result<(), ClientError> {
        if self.bytes.len() > MAX_PHOTO_BYTES {
            return Err(ClientError::Validation(format!(
                "Photo '{}' is {} bytes, the limit is 5 MB",
                self.file_name,
                self.bytes.len()
            )));
        }
        Ok(())
    }
}

/// Activity ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivitySort {
    /// Smallest capacity first.
    CapacityAsc,
    /// Largest capacity first.
    CapacityDesc,
}

impl fmt::Display for ActivitySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActivitySort::CapacityAsc => "capacite",
            ActivitySort::CapacityDesc => "-capacite",
        })
    }
}

/// Filters for [`ActivitiesApi::list`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityQuery {
    /// Substring of the name.
    pub search: Option<String>,
    /// Ordering.
    pub sort: Option<ActivitySort>,
}

/// `/activities/` endpoints.
#[derive(Clone)]
pub struct ActivitiesApi {
    client: Arc<SessionClient>,
}

impl ActivitiesApi {
    /// Wrap a session client.
    pub fn new(client: Arc<SessionClient>) -> Self {
        Self { client }
    }

    /// List activities.
    pub async fn list(&self, query: &ActivityQuery) -> Result<Vec<Activity>, ClientError> {
        let options = RequestOptions::get()
            .query_opt("search", query.search.as_deref())
            .query_opt("sort", query.sort);
        self.client.send("/activities/", options).await
    }

    /// Fetch one activity.
    pub async fn get(&self, id: i64) -> Result<Activity, ClientError> {
        self.client.get(&format!("/activities/{}/", id)).await
    }

    /// Create an activity from JSON fields.
    pub async fn create(&self, activity: &NewActivity) -> Result<Created, ClientError> {
        self.client.post("/activities/", &activity.normalized()).await
    }

    /// Create an activity with a photo, as a multipart form.
    pub async fn create_with_photo(
        &self,
        activity: &NewActivity,
        photo: Photo,
    ) -> Result<Created, ClientError> {
        photo.validate()?;
        let activity = activity.normalized();
        let form = MultipartBody::new()
            .text("code_act", &activity.code_act)
            .text("nom_act", &activity.nom_act)
            .text("tarif_mensuel", activity.tarif_mensuel)
            .text("capacite", activity.capacite)
            .file(FilePart {
                field: "photo".to_string(),
                file_name: photo.file_name,
                mime: photo.mime,
                bytes: photo.bytes,
            });
        self.client
            .send("/activities/", RequestOptions::post().multipart(form))
            .await
    }

    /// Update an activity.
    pub async fn update(&self, id: i64, patch: &ActivityPatch) -> Result<Ack, ClientError> {
        self.client.put(&format!("/activities/{}/", id), patch).await
    }

    /// Delete an activity.
    pub async fn delete(&self, id: i64) -> Result<Ack, ClientError> {
        self.client.delete(&format!("/activities/{}/", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_upper_cased() {
        let activity = NewActivity {
            code_act: " yoga ".into(),
            nom_act: "Yoga".into(),
            tarif_mensuel: 45.0,
            capacite: 20,
        };
        assert_eq!(activity.normalized().code_act, "YOGA");
    }

    #[test]
    fn oversize_photo_is_rejected() {
        let photo = Photo {
            file_name: "big.jpg".into(),
            mime: Some("image/jpeg".into()),
            bytes: vec![0; MAX_PHOTO_BYTES + 1],
        };
        assert!(matches!(photo.validate(), Err(ClientError::Validation(_))));

        let photo = Photo {
            bytes: vec![0; MAX_PHOTO_BYTES],
            ..photo
        };
        assert!(photo.validate().is_ok());
    }
}
