use crate::models::{hhmm, Ack, Created};
use chrono::{NaiveDate, NaiveTime};
use clubdesk_core::ClientError;
use clubdesk_session::{RequestOptions, SessionClient};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The activity a class session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRef {
    /// Activity id.
    pub id: i64,
    /// Activity name.
    pub nom_act: String,
    /// Activity code.
    pub code_act: String,
}

/// One scheduled class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSession {
    /// Backend id.
    pub id: i64,
    /// Activity taught.
    pub activite: ActivityRef,
    /// Day of the class.
    pub date: NaiveDate,
    /// Start time.
    #[serde(with = "hhmm")]
    pub heure_debut: NaiveTime,
    /// End time.
    #[serde(with = "hhmm")]
    pub heure_fin: NaiveTime,
}

/// A class to schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClassSession {
    /// Activity taught.
    pub activite_id: i64,
    /// Day of the class.
    pub date: NaiveDate,
    /// Start time.
    #[serde(with = "hhmm")]
    pub heure_debut: NaiveTime,
    /// End time.
    #[serde(with = "hhmm")]
    pub heure_fin: NaiveTime,
}

impl NewClassSession {
    fn validate(&self) -> Result<(), ClientError> {
        validate_times(Some(self.heure_debut), Some(self.heure_fin))
    }
}

/// Partial update of a class session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSessionPatch {
    /// Activity taught.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activite_id: Option<i64>,
    /// Day of the class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Start time.
    #[serde(default, with = "hhmm::option", skip_serializing_if = "Option::is_none")]
    pub heure_debut: Option<NaiveTime>,
    /// End time.
    #[serde(default, with = "hhmm::option", skip_serializing_if = "Option::is_none")]
    pub heure_fin: Option<NaiveTime>,
}

fn validate_times(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Result<(), ClientError> {
    match (start, end) {
        (Some(start), Some(end)) if end <= start => Err(ClientError::Validation(format!(
            "Class must end after it starts ({} - {})",
            start.format("%H:%M"),
            end.format("%H:%M")
        ))),
        _ => Ok(()),
    }
}

/// Class session ordering. The server defaults to [`ClassSessionSort::DateAsc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassSessionSort {
    /// Earliest day first.
    DateAsc,
    /// Latest day first.
    DateDesc,
    /// Earliest start time first.
    StartAsc,
    /// Latest start time first.
    StartDesc,
}

impl fmt::Display for ClassSessionSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClassSessionSort::DateAsc => "date",
            ClassSessionSort::DateDesc => "-date",
            ClassSessionSort::StartAsc => "heure_debut",
            ClassSessionSort::StartDesc => "-heure_debut",
        })
    }
}

/// Filters for [`ClassSessionsApi::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassSessionQuery {
    /// Only this activity.
    pub activite_id: Option<i64>,
    /// Only this day.
    pub date: Option<NaiveDate>,
    /// Ordering.
    pub sort: Option<ClassSessionSort>,
}

/// `/class-sessions/` endpoints. Listing is also available without a session.
#[derive(Clone)]
pub struct ClassSessionsApi {
    client: Arc<SessionClient>,
}

impl ClassSessionsApi {
    /// Wrap a session client.
    pub fn new(client: Arc<SessionClient>) -> Self {
        Self { client }
    }

    /// List class sessions.
    pub async fn list(&self, query: &ClassSessionQuery) -> Result<Vec<ClassSession>, ClientError> {
        let options = RequestOptions::get()
            .query_opt("activite_id", query.activite_id)
            .query_opt("date", query.date)
            .query_opt("sort", query.sort);
        self.client.send("/class-sessions/", options).await
    }

    /// Fetch one class session.
    pub async fn get(&self, id: i64) -> Result<ClassSession, ClientError> {
        self.client.get(&format!("/class-sessions/{}/", id)).await
    }

    /// Schedule a class.
    pub async fn create(&self, session: &NewClassSession) -> Result<Created, ClientError> {
        session.validate()?;
        self.client.post("/class-sessions/", session).await
    }

    /// Change a class.
    pub async fn update(&self, id: i64, patch: &ClassSessionPatch) -> Result<Ack, ClientError> {
        validate_times(patch.heure_debut, patch.heure_fin)?;
        self.client.put(&format!("/class-sessions/{}/", id), patch).await
    }

    /// Cancel a class.
    pub async fn delete(&self, id: i64) -> Result<Ack, ClientError> {
        self.client.delete(&format!("/class-sessions/{}/", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn decodes_backend_rows() {
        let session: ClassSession = serde_json::from_value(json!({
            "id": 3,
            "activite": {"id": 1, "nom_act": "Yoga", "code_act": "YOGA"},
            "date": "2026-10-12",
            "heure_debut": "09:00",
            "heure_fin": "10:30"
        }))
        .unwrap();
        assert_eq!(session.heure_debut, t(9, 0));
        assert_eq!(session.heure_fin, t(10, 30));
    }

    #[test]
    fn new_session_encodes_short_times() {
        let body = serde_json::to_value(NewClassSession {
            activite_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
            heure_debut: t(18, 0),
            heure_fin: t(19, 0),
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"activite_id": 1, "date": "2026-10-12", "heure_debut": "18:00", "heure_fin": "19:00"})
        );
    }

    #[test]
    fn end_must_follow_start() {
        assert!(validate_times(Some(t(10, 0)), Some(t(9, 0))).is_err());
        assert!(validate_times(Some(t(10, 0)), Some(t(10, 0))).is_err());
        assert!(validate_times(Some(t(9, 0)), None).is_ok());
    }

    #[test]
    fn patch_skips_unset_times() {
        let patch = ClassSessionPatch {
            heure_fin: Some(t(21, 0)),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"heure_fin": "21:00"}));
    }
}
