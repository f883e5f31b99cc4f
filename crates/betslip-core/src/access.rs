//! Generation access gating.
//!
//! Decides, from a client-held snapshot of the user, whether a new betslip
//! generation may be requested. Admins and active subscribers have full
//! access; every other authenticated user spends credits.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Credits consumed by one generation for users without full access.
pub const CREDITS_REQUIRED: u64 = 100;

/// Subscription tier held by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Pro,
}

impl SubscriptionTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Pro => "pro",
        }
    }

    /// Human-readable label for profile display.
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Pro => "PRO",
        }
    }

    /// Parse a tier string from the backend. Unknown or empty values map to `None`.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for SubscriptionTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "pro" => Ok(Self::Pro),
            other => Err(format!("unknown subscription tier: {other}")),
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the authenticated user as held by the client.
///
/// Snapshots are immutable from the gate's point of view: the session layer
/// replaces the whole value after a refresh instead of mutating fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserAccessState {
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub subscription_tier: SubscriptionTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub credits: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl UserAccessState {
    /// State of a client with no session.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Why a generation request was refused before reaching the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("Log in to generate betslips")]
    NotAuthenticated,

    #[error("Need {need} credits to generate betslips (you have {have})")]
    InsufficientCredits { have: u64, need: u64 },
}

/// Display annotation describing the user's generation allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditStatus {
    LoginRequired,
    /// Admins generate without limit.
    Unlimited,
    /// Active subscription of the given tier.
    Subscribed(SubscriptionTier),
    /// Enough credits for at least one generation.
    Sufficient(u64),
    Insufficient { have: u64, need: u64 },
}

impl CreditStatus {
    pub const fn allows_generation(&self) -> bool {
        matches!(
            self,
            Self::Unlimited | Self::Subscribed(_) | Self::Sufficient(_)
        )
    }
}

impl fmt::Display for CreditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoginRequired => write!(f, "Log in to generate betslips"),
            Self::Unlimited => write!(f, "Admin • Unlimited"),
            Self::Subscribed(tier) => write!(f, "{} subscription", tier.label()),
            Self::Sufficient(credits) => write!(f, "{credits} credits"),
            Self::Insufficient { have, need } => {
                write!(f, "Need {need} credits (you have {have})")
            }
        }
    }
}

/// Single authority for "may this user request a new generation right now".
#[derive(Debug, Clone, Copy)]
pub struct AccessGate {
    credits_required: u64,
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessGate {
    pub const fn new() -> Self {
        Self {
            credits_required: CREDITS_REQUIRED,
        }
    }

    pub const fn credits_required(&self) -> u64 {
        self.credits_required
    }

    /// Whether the user is an admin or holds a subscription that has not ended.
    pub fn has_full_access(&self, state: &UserAccessState) -> bool {
        self.has_full_access_at(state, Utc::now())
    }

    /// [`Self::has_full_access`] evaluated at an explicit instant.
    pub fn has_full_access_at(&self, state: &UserAccessState, now: DateTime<Utc>) -> bool {
        if state.is_admin {
            return true;
        }
        state.subscription_tier != SubscriptionTier::None
            && state.subscription_end_date.is_none_or(|end| end > now)
    }

    /// Whether a generation request is permitted.
    pub fn can_generate(&self, state: &UserAccessState) -> bool {
        self.can_generate_at(state, Utc::now())
    }

    /// [`Self::can_generate`] evaluated at an explicit instant.
    pub fn can_generate_at(&self, state: &UserAccessState, now: DateTime<Utc>) -> bool {
        self.check_eligibility_at(state, now).is_ok()
    }

    /// Like [`Self::can_generate`], but reports why access was refused.
    pub fn check_eligibility(&self, state: &UserAccessState) -> Result<(), AccessDenied> {
        self.check_eligibility_at(state, Utc::now())
    }

    pub fn check_eligibility_at(
        &self,
        state: &UserAccessState,
        now: DateTime<Utc>,
    ) -> Result<(), AccessDenied> {
        // Unauthenticated clients never generate, whatever the snapshot claims.
        if !state.is_authenticated {
            return Err(AccessDenied::NotAuthenticated);
        }
        if self.has_full_access_at(state, now) || state.credits >= self.credits_required {
            return Ok(());
        }
        Err(AccessDenied::InsufficientCredits {
            have: state.credits,
            need: self.credits_required,
        })
    }

    /// Credit annotation for status displays.
    pub fn credit_status(&self, state: &UserAccessState) -> CreditStatus {
        self.credit_status_at(state, Utc::now())
    }

    pub fn credit_status_at(&self, state: &UserAccessState, now: DateTime<Utc>) -> CreditStatus {
        if !state.is_authenticated {
            return CreditStatus::LoginRequired;
        }
        if state.is_admin {
            return CreditStatus::Unlimited;
        }
        if self.has_full_access_at(state, now) {
            return CreditStatus::Subscribed(state.subscription_tier);
        }
        if state.credits >= self.credits_required {
            CreditStatus::Sufficient(state.credits)
        } else {
            CreditStatus::Insufficient {
                have: state.credits,
                need: self.credits_required,
            }
        }
    }

    /// Whether a refreshed balance should raise the low-credit warning.
    pub fn is_low_on_credits(&self, state: &UserAccessState) -> bool {
        self.is_low_on_credits_at(state, Utc::now())
    }

    pub fn is_low_on_credits_at(&self, state: &UserAccessState, now: DateTime<Utc>) -> bool {
        state.is_authenticated
            && !self.has_full_access_at(state, now)
            && state.credits < self.credits_required
    }
}
