//! Tests for the API client and wire types.

#![allow(clippy::unwrap_used)]

use betslip_core::SubscriptionTier;
use betslip_core::config::ApiConfig;
use chrono::{DateTime, Utc};
use serde_json::json;

use super::client::ApiClient;
use super::error::{ApiError, FailureKind, classify_message};
use super::types::{GenerateRequest, ProfileResponse};

// =============================================================================
// Client construction
// =============================================================================

#[test]
fn empty_base_url_returns_config_error() {
    let config = ApiConfig {
        base_url: "  ".into(),
        ..ApiConfig::default()
    };
    let err = ApiClient::new(&config, None).unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
}

#[test]
fn invalid_token_returns_config_error() {
    let err = ApiClient::new(&ApiConfig::default(), Some("bad\ntoken")).unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
}

#[test]
fn endpoint_urls_come_from_config() {
    let config = ApiConfig {
        base_url: "https://slips.test/api/".into(),
        ..ApiConfig::default()
    };
    let client = ApiClient::new(&config, Some("tok")).unwrap();
    assert_eq!(client.generate_url(), "https://slips.test/api/betslips/generate");
    assert_eq!(client.profile_url(), "https://slips.test/api/users/me");
}

#[tokio::test]
async fn profile_without_token_is_refused_locally() {
    use super::client::ProfileApi;

    let client = ApiClient::new(&ApiConfig::default(), Some("")).unwrap();
    let err = client.fetch_profile().await.unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
}

// =============================================================================
// Wire types
// =============================================================================

#[test]
fn generate_request_uses_camel_case() {
    let body = serde_json::to_value(GenerateRequest { target_odd: 2.5 }).unwrap();
    assert_eq!(body, json!({ "targetOdd": 2.5 }));
}

#[test]
fn profile_maps_to_access_state() {
    let profile: ProfileResponse = serde_json::from_value(json!({
        "success": true,
        "user": {
            "username": "amina",
            "isAdmin": false,
            "subscription": "Weekly",
            "subscriptionEndDate": "2030-05-01T00:00:00.000Z",
            "credits": 250
        }
    }))
    .unwrap();
    let state = profile.user.unwrap().into_state();

    assert!(state.is_authenticated);
    assert!(!state.is_admin);
    assert_eq!(state.subscription_tier, SubscriptionTier::Weekly);
    assert_eq!(
        state.subscription_end_date,
        Some("2030-05-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap())
    );
    assert_eq!(state.credits, 250);
    assert_eq!(state.username.as_deref(), Some("amina"));
}

#[test]
fn sparse_profile_defaults() {
    let profile: ProfileResponse =
        serde_json::from_value(json!({ "success": true, "user": { "credits": -5 } })).unwrap();
    let state = profile.user.unwrap().into_state();
    assert_eq!(state.subscription_tier, SubscriptionTier::None);
    assert_eq!(state.credits, 0);
    assert!(state.subscription_end_date.is_none());
}

#[test]
fn unparsable_end_date_counts_as_expired() {
    let profile: ProfileResponse = serde_json::from_value(json!({
        "success": true,
        "user": { "subscription": "pro", "subscriptionEndDate": "next tuesday" }
    }))
    .unwrap();
    let state = profile.user.unwrap().into_state();
    assert_eq!(state.subscription_end_date, Some(DateTime::<Utc>::UNIX_EPOCH));
    assert!(!betslip_core::AccessGate::new().has_full_access(&state));
}

// =============================================================================
// Failure classification
// =============================================================================

#[test]
fn connectivity_messages() {
    assert_eq!(
        classify_message("error sending request: Connection refused"),
        FailureKind::Connectivity
    );
    assert_eq!(classify_message("operation timed out"), FailureKind::Connectivity);
    assert_eq!(classify_message("Network unreachable"), FailureKind::Connectivity);
    assert_eq!(classify_message("invalid utf-8 in body"), FailureKind::Generic);
}

#[test]
fn host_name_does_not_decide_the_category() {
    assert_eq!(
        classify_message(
            "error decoding response body for url (https://dnsbets.example/api/betslips/generate)"
        ),
        FailureKind::Generic
    );
    assert_eq!(
        classify_message(
            "error sending request for url (https://network.example/api): connection refused"
        ),
        FailureKind::Connectivity
    );
}

#[test]
fn non_transport_errors_are_generic() {
    let err = ApiError::Status {
        status: 502,
        message: "Bad gateway".into(),
    };
    assert_eq!(err.failure_kind(), FailureKind::Generic);
    assert_eq!(ApiError::Decode("x".into()).failure_kind(), FailureKind::Generic);
}
