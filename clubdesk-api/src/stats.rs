use clubdesk_core::ClientError;
use clubdesk_session::SessionClient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// An activity and how many enrollments it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Popularity {
    /// Activity name.
    pub nom: String,
    /// Number of enrollments.
    pub inscriptions: u32,
}

/// Club-wide summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsOverview {
    /// Number of members.
    pub total_members: u32,
    /// Activity with the most enrollments; `None` when there are no activities.
    pub most_popular_activity: Option<Popularity>,
    /// Activity with the fewest enrollments.
    pub least_popular_activity: Option<Popularity>,
}

/// Enrollment figures for one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityStats {
    /// Activity code.
    pub code_act: String,
    /// Activity name.
    pub nom_act: String,
    /// Monthly fee.
    pub tarif_mensuel: f64,
    /// Capacity.
    pub capacite: u32,
    /// Enrollments.
    pub nb_inscriptions: u32,
    /// Remaining places; negative when over capacity.
    pub places_disponibles: i64,
}

impl ActivityStats {
    /// Share of the capacity in use, in percent.
    pub fn fill_rate(&self) -> f64 {
        if self.capacite == 0 {
            return 0.0;
        }
        f64::from(self.nb_inscriptions) * 100.0 / f64::from(self.capacite)
    }
}

/// Name of an enrolled member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberName {
    /// Family name.
    pub nom: String,
    /// Given name.
    pub prenom: String,
}

/// Enrolled members keyed by activity name.
pub type MembersPerActivity = BTreeMap<String, Vec<MemberName>>;

/// `/stats/` endpoints.
#[derive(Clone)]
pub struct StatsApi {
    client: Arc<SessionClient>,
}

impl StatsApi {
    /// Wrap a session client.
    pub fn new(client: Arc<SessionClient>) -> Self {
        Self { client }
    }

    /// Club-wide summary.
    pub async fn overview(&self) -> Result<StatsOverview, ClientError> {
        self.client.get("/stats/").await
    }

    /// Per-activity figures, most enrollments first.
    pub async fn activities(&self) -> Result<Vec<ActivityStats>, ClientError> {
        self.client.get("/stats/activities/").await
    }

    /// Enrolled members grouped by activity.
    pub async fn members_per_activity(&self) -> Result<MembersPerActivity, ClientError> {
        self.client.get("/stats/members-per-activity/").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rate_handles_zero_capacity() {
        let mut stats = ActivityStats {
            code_act: "TEN".into(),
            nom_act: "Tennis".into(),
            tarif_mensuel: 60.0,
            capacite: 8,
            nb_inscriptions: 6,
            places_disponibles: 2,
        };
        assert_eq!(stats.fill_rate(), 75.0);
        stats.capacite = 0;
        assert_eq!(stats.fill_rate(), 0.0);
    }

    #[test]
    fn overview_allows_missing_activities() {
        let overview: StatsOverview = serde_json::from_value(serde_json::json!({
            "total_members": 0,
            "most_popular_activity": null,
            "least_popular_activity": null
        }))
        .unwrap();
        assert_eq!(overview.most_popular_activity, None);
    }
}
