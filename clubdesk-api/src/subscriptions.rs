use crate::models::Ack;
use chrono::NaiveDate;
use clubdesk_core::ClientError;
use clubdesk_session::{RequestOptions, SessionClient};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Length of a subscription. The server derives `date_fin` from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionType {
    /// One month.
    #[serde(rename = "MONTHLY")]
    Monthly,
    /// Three months.
    #[serde(rename = "3_MONTHS")]
    ThreeMonths,
    /// Six months.
    #[serde(rename = "6_MONTHS")]
    SixMonths,
    /// Twelve months.
    #[serde(rename = "ANNUAL")]
    Annual,
}

impl SubscriptionType {
    /// Every type, shortest first.
    pub const ALL: [SubscriptionType; 4] = [
        SubscriptionType::Monthly,
        SubscriptionType::ThreeMonths,
        SubscriptionType::SixMonths,
        SubscriptionType::Annual,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionType::Monthly => "MONTHLY",
            SubscriptionType::ThreeMonths => "3_MONTHS",
            SubscriptionType::SixMonths => "6_MONTHS",
            SubscriptionType::Annual => "ANNUAL",
        }
    }

    /// Duration in months.
    pub fn months(&self) -> u32 {
        match self {
            SubscriptionType::Monthly => 1,
            SubscriptionType::ThreeMonths => 3,
            SubscriptionType::SixMonths => 6,
            SubscriptionType::Annual => 12,
        }
    }
}

impl fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ClientError::Validation(format!(
                    "Invalid type_abonnement. Must be one of: MONTHLY, 3_MONTHS, 6_MONTHS, ANNUAL (got '{}')",
                    s
                ))
            })
    }
}

/// A member's subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Backend id.
    pub id: i64,
    /// Subscribed member.
    pub membre_id: i64,
    /// Member display name.
    pub membre_nom: String,
    /// Subscription length.
    pub type_abonnement: SubscriptionType,
    /// Localized label of the length.
    pub type_abonnement_display: String,
    /// First day.
    pub date_debut: NaiveDate,
    /// Last day, computed by the server.
    pub date_fin: NaiveDate,
    /// Whether the subscription is active.
    pub actif: bool,
}

/// A new subscription. A member can hold only one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubscription {
    /// Member to subscribe.
    pub membre_id: i64,
    /// Subscription length.
    pub type_abonnement: SubscriptionType,
    /// First day.
    pub date_debut: NaiveDate,
    /// Defaults to active on the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actif: Option<bool>,
}

/// Partial update of a subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPatch {
    /// Subscription length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_abonnement: Option<SubscriptionType>,
    /// First day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_debut: Option<NaiveDate>,
    /// Active flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actif: Option<bool>,
}

/// Answer of a subscription create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionCreated {
    /// Id of the new subscription.
    pub id: i64,
    /// Last day computed by the server.
    pub date_fin: NaiveDate,
}

/// Answer of a subscription update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionUpdated {
    /// Whether the backend reported success.
    pub success: bool,
    /// Last day recomputed by the server.
    pub date_fin: NaiveDate,
}

/// Filters for [`SubscriptionsApi::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionQuery {
    /// Only this member's subscription.
    pub member_id: Option<i64>,
    /// Only active (or only inactive) subscriptions.
    pub actif: Option<bool>,
}

/// `/subscriptions/` endpoints.
#[derive(Clone)]
pub struct SubscriptionsApi {
    client: Arc<SessionClient>,
}

impl SubscriptionsApi {
    /// Wrap a session client.
    pub fn new(client: Arc<SessionClient>) -> Self {
        Self { client }
    }

    /// List subscriptions.
    pub async fn list(&self, query: &SubscriptionQuery) -> Result<Vec<Subscription>, ClientError> {
        let options = RequestOptions::get()
            .query_opt("member_id", query.member_id)
            .query_opt("actif", query.actif);
        self.client.send("/subscriptions/", options).await
    }

    /// Fetch one subscription.
    pub async fn get(&self, id: i64) -> Result<Subscription, ClientError> {
        self.client.get(&format!("/subscriptions/{}/", id)).await
    }

    /// Subscribe a member.
    pub async fn create(
        &self,
        subscription: &NewSubscription,
    ) -> Result<SubscriptionCreated, ClientError> {
        self.client.post("/subscriptions/", subscription).await
    }

    /// Change a subscription.
    pub async fn update(
        &self,
        id: i64,
        patch: &SubscriptionPatch,
    ) -> Result<SubscriptionUpdated, ClientError> {
        self.client.put(&format!("/subscriptions/{}/", id), patch).await
    }

    /// Remove a subscription.
    pub async fn delete(&self, id: i64) -> Result<Ack, ClientError> {
        self.client.delete(&format!("/subscriptions/{}/", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(
            serde_json::to_value(SubscriptionType::ThreeMonths).unwrap(),
            serde_json::json!("3_MONTHS")
        );
        assert_eq!("annual".parse::<SubscriptionType>().unwrap(), SubscriptionType::Annual);
        assert!("WEEKLY".parse::<SubscriptionType>().is_err());
    }

    #[test]
    fn new_subscription_omits_unset_actif() {
        let body = serde_json::to_value(NewSubscription {
            membre_id: 2,
            type_abonnement: SubscriptionType::Monthly,
            date_debut: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            actif: None,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"membre_id": 2, "type_abonnement": "MONTHLY", "date_debut": "2026-09-01"})
        );
    }
}
