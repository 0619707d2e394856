use crate::models::{Ack, Created};
use chrono::NaiveDate;
use clubdesk_core::ClientError;
use clubdesk_session::{RequestOptions, SessionClient};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A club member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Backend id.
    pub id: i64,
    /// Family name.
    pub nom: String,
    /// Given name.
    pub prenom: String,
    /// Age in years.
    pub age: u32,
    /// Eight-digit phone number.
    pub telephone: String,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the membership is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actif: Option<bool>,
    /// Registration date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_inscription: Option<NaiveDate>,
}

impl Member {
    /// "Prénom Nom".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom)
    }
}

/// Fields of a new member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMember {
    /// Family name.
    pub nom: String,
    /// Given name.
    pub prenom: String,
    /// Age in years.
    pub age: u32,
    /// Eight-digit phone number.
    pub telephone: String,
}

impl NewMember {
    /// Check the phone number before sending; the backend requires exactly eight digits.
    pub fn validate(&self) -> Result<(), ClientError> {
        validate_telephone(&self.telephone)
    }
}

/// Partial update of a member. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberPatch {
    /// Family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    /// Given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prenom: Option<String>,
    /// Age in years.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Eight-digit phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
}

/// Member ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberSort {
    /// Youngest first.
    AgeAsc,
    /// Oldest first.
    AgeDesc,
}

impl fmt::Display for MemberSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemberSort::AgeAsc => "age",
            MemberSort::AgeDesc => "-age",
        })
    }
}

/// Filters for [`MembersApi::list`]. An `id` takes precedence over `search` on the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberQuery {
    /// Substring of the family or given name.
    pub search: Option<String>,
    /// Exact id.
    pub id: Option<i64>,
    /// Ordering.
    pub sort: Option<MemberSort>,
}

fn validate_telephone(telephone: &str) -> Result<(), ClientError> {
    if telephone.len() == 8 && telephone.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ClientError::Validation(
            "Le numéro de téléphone doit contenir exactement 8 chiffres.".to_string(),
        ))
    }
}

/// `/members/` endpoints.
#[derive(Clone)]
pub struct MembersApi {
    client: Arc<SessionClient>,
}

impl MembersApi {
    /// Wrap a session client.
    pub fn new(client: Arc<SessionClient>) -> Self {
        Self { client }
    }

    /// List members.
    pub async fn list(&self, query: &MemberQuery) -> Result<Vec<Member>, ClientError> {
        let options = RequestOptions::get()
            .query_opt("search", query.search.as_deref())
            .query_opt("id", query.id)
            .query_opt("sort", query.sort);
        self.client.send("/members/", options).await
    }

    /// Fetch one member.
    pub async fn get(&self, id: i64) -> Result<Member, ClientError> {
        self.client.get(&format!("/members/{}/", id)).await
    }

    /// Create a member.
    pub async fn create(&self, member: &NewMember) -> Result<Created, ClientError> {
        member.validate()?;
        self.client.post("/members/", member).await
    }

    /// Update a member.
    pub async fn update(&self, id: i64, patch: &MemberPatch) -> Result<Ack, ClientError> {
        if let Some(telephone) = &patch.telephone {
            validate_telephone(telephone)?;
        }
        self.client.put(&format!("/members/{}/", id), patch).await
    }

    /// Delete a member.
    pub async fn delete(&self, id: i64) -> Result<Ack, ClientError> {
        self.client.delete(&format!("/members/{}/", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telephone_must_be_eight_digits() {
        assert!(validate_telephone("22123456").is_ok());
        assert!(validate_telephone("2212345").is_err());
        assert!(validate_telephone("22-12345").is_err());
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let patch = MemberPatch {
            age: Some(31),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), serde_json::json!({"age": 31}));
    }

    #[test]
    fn member_list_rows_may_omit_optional_fields() {
        let member: Member = serde_json::from_value(serde_json::json!({
            "id": 1, "nom": "Trabelsi", "prenom": "Amira", "age": 19, "telephone": "98765432"
        }))
        .unwrap();
        assert_eq!(member.full_name(), "Amira Trabelsi");
        assert_eq!(member.email, None);
    }
}
