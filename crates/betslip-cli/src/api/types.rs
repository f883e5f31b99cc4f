//! Wire types for the betslip backend.
//!
//! Generation bodies stay as `serde_json::Value` and go through the
//! normalizer; only the profile envelope is decoded here.

use betslip_core::{SubscriptionTier, UserAccessState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /betslips/generate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub target_odd: f64,
}

/// Envelope of `GET /users/me`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<RemoteUser>,
    #[serde(default)]
    pub error: Option<String>,
}

/// User record as the backend reports it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUser {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub subscription_end_date: Option<String>,
    #[serde(default)]
    pub credits: Option<f64>,
}

impl RemoteUser {
    /// Snapshot for the access gate.
    ///
    /// An end date that does not parse is treated as already passed.
    pub fn into_state(self) -> UserAccessState {
        let subscription_end_date = self.subscription_end_date.as_deref().map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map_or(DateTime::<Utc>::UNIX_EPOCH, |d| d.with_timezone(&Utc))
        });

        UserAccessState {
            is_authenticated: true,
            is_admin: self.is_admin,
            subscription_tier: self
                .subscription
                .as_deref()
                .map(SubscriptionTier::parse_lenient)
                .unwrap_or_default(),
            subscription_end_date,
            credits: whole_credits(self.credits),
            username: self.username,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_credits(raw: Option<f64>) -> u64 {
    raw.filter(|c| c.is_finite() && *c > 0.0)
        .map_or(0, |c| c.floor() as u64)
}
