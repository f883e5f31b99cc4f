//! Betslip generation flow.
//!
//! Gate, validate, request, normalize, then refresh the session. Failures
//! before the response is decoded leave no betslips behind.

use betslip_core::normalize::GenerationOutcome;
use betslip_core::normalize::parse_generation_response;
use betslip_core::{
    AccessDenied, AccessGate, Betslip, UserAccessState, ValidationError, validate_target_odd,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiError, FailureKind, GenerationApi};
use crate::session::SessionSource;

/// Why a generation attempt produced no betslips.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),

    #[error("Invalid target odd: {0}")]
    Validation(#[from] ValidationError),

    /// Transport failure; `kind` selects the message shown to the user.
    #[error("{kind}")]
    Network { kind: FailureKind, message: String },

    /// Non-2xx status or `success: false`; carries the server's text.
    #[error("{0}")]
    Server(String),
}

impl From<ApiError> for GenerateError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Status { message, .. } | ApiError::Server(message) => Self::Server(message),
            other => Self::Network {
                kind: other.failure_kind(),
                message: other.to_string(),
            },
        }
    }
}

/// Result of a successful generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub target_odd: f64,
    pub betslips: Vec<Betslip>,
    /// Set when the server returned no betslips.
    pub notice: Option<String>,
    /// Snapshot after the post-generation refresh, if it succeeded.
    pub refreshed: Option<UserAccessState>,
    pub low_credits: bool,
}

/// Drives one generation request against the API and the session.
pub struct Generator<A> {
    gate: AccessGate,
    api: A,
}

impl<A: GenerationApi> Generator<A> {
    pub const fn new(api: A) -> Self {
        Self {
            gate: AccessGate::new(),
            api,
        }
    }

    pub const fn gate(&self) -> &AccessGate {
        &self.gate
    }

    /// Run the flow for the raw target-odd text.
    ///
    /// Eligibility is checked before the input, and neither check touches
    /// the network.
    pub async fn generate<S: SessionSource + ?Sized>(
        &self,
        session: &mut S,
        raw_odd: &str,
    ) -> Result<GenerationReport, GenerateError> {
        let state = session.state();
        if let Err(denied) = self.gate.check_eligibility(&state) {
            debug!(%denied, "Generation refused");
            return Err(denied.into());
        }

        let target_odd = validate_target_odd(raw_odd).inspect_err(|e| {
            debug!(error = %e, raw_odd, "Target odd rejected");
        })?;

        info!(target_odd, "Requesting betslip generation");
        let body = self.api.generate(target_odd).await?;

        let outcome = parse_generation_response(&body);
        let notice = outcome.empty_message().map(ToString::to_string);
        let betslips = match outcome {
            GenerationOutcome::Generated { betslips, .. } => betslips,
            GenerationOutcome::Rejected { error } => {
                return Err(GenerateError::Server(error));
            }
        };
        if let Some(notice) = &notice {
            info!(target_odd, %notice, "Generation returned no betslips");
        }

        let mut report = GenerationReport {
            target_odd,
            betslips,
            notice,
            refreshed: None,
            low_credits: false,
        };

        // The server charged the credits; only a refresh tells us the new balance.
        match session.refresh().await {
            Ok(fresh) => {
                report.low_credits = self.gate.is_low_on_credits(&fresh);
                report.refreshed = Some(fresh);
            }
            Err(e) => warn!(error = %e, "Could not refresh credits after generation"),
        }

        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use betslip_core::SubscriptionTier;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    /// Generation API returning a canned result and recording requests.
    struct FakeApi {
        reply: Mutex<Option<Result<Value, ApiError>>>,
        requests: Mutex<Vec<f64>>,
    }

    impl FakeApi {
        fn replying(reply: Result<Value, ApiError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GenerationApi for FakeApi {
        async fn generate(&self, target_odd: f64) -> Result<Value, ApiError> {
            self.requests.lock().unwrap().push(target_odd);
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(json!({ "success": true, "betslips": [] })))
        }
    }

    struct FakeSession {
        state: UserAccessState,
        refreshed: Option<UserAccessState>,
        refreshes: usize,
    }

    impl FakeSession {
        fn with(state: UserAccessState) -> Self {
            Self {
                state,
                refreshed: None,
                refreshes: 0,
            }
        }
    }

    #[async_trait]
    impl SessionSource for FakeSession {
        fn state(&self) -> UserAccessState {
            self.state.clone()
        }

        async fn refresh(&mut self) -> Result<UserAccessState, ApiError> {
            self.refreshes += 1;
            match self.refreshed.clone() {
                Some(fresh) => {
                    self.state = fresh.clone();
                    Ok(fresh)
                }
                None => Err(ApiError::Server("profile unavailable".into())),
            }
        }
    }

    fn user(credits: u64) -> UserAccessState {
        UserAccessState {
            is_authenticated: true,
            credits,
            ..UserAccessState::default()
        }
    }

    fn two_betslips() -> Value {
        json!({
            "success": true,
            "betslips": [
                { "_id": "a", "totalOdd": 2.1, "selections": [{ "homeTeam": "Lyon" }] },
                { "_id": "b", "totalOdd": 2.4 }
            ]
        })
    }

    #[tokio::test]
    async fn anonymous_is_refused_before_any_request() {
        let generator = Generator::new(FakeApi::replying(Ok(two_betslips())));
        let mut session = FakeSession::with(UserAccessState::anonymous());

        let err = generator.generate(&mut session, "2.5").await.unwrap_err();
        assert!(matches!(
            err,
            GenerateError::AccessDenied(AccessDenied::NotAuthenticated)
        ));
        assert_eq!(generator.api.request_count(), 0);
        assert_eq!(session.refreshes, 0);
    }

    #[tokio::test]
    async fn insufficient_credits_are_refused_locally() {
        let generator = Generator::new(FakeApi::replying(Ok(two_betslips())));
        let mut session = FakeSession::with(user(99));

        let err = generator.generate(&mut session, "2.5").await.unwrap_err();
        assert!(matches!(
            err,
            GenerateError::AccessDenied(AccessDenied::InsufficientCredits { have: 99, need: 100 })
        ));
        assert_eq!(generator.api.request_count(), 0);
    }

    #[tokio::test]
    async fn eligibility_is_checked_before_the_odd() {
        let generator = Generator::new(FakeApi::replying(Ok(two_betslips())));
        let mut session = FakeSession::with(UserAccessState::anonymous());

        let err = generator.generate(&mut session, "abc").await.unwrap_err();
        assert!(matches!(err, GenerateError::AccessDenied(_)));
    }

    #[tokio::test]
    async fn invalid_odd_never_reaches_the_network() {
        let generator = Generator::new(FakeApi::replying(Ok(two_betslips())));
        let mut session = FakeSession::with(user(500));

        for (raw, expected) in [
            ("1.05", ValidationError::BelowMinimum),
            ("10.01", ValidationError::AboveMaximum),
            ("", ValidationError::InvalidFormat),
        ] {
            let err = generator.generate(&mut session, raw).await.unwrap_err();
            assert!(matches!(err, GenerateError::Validation(e) if e == expected));
        }
        assert_eq!(generator.api.request_count(), 0);
    }

    #[tokio::test]
    async fn success_normalizes_and_refreshes() {
        let generator = Generator::new(FakeApi::replying(Ok(two_betslips())));
        let mut session = FakeSession::with(user(300));
        session.refreshed = Some(user(200));

        let report = generator.generate(&mut session, "5.5").await.unwrap();
        assert_eq!(report.target_odd, 5.5);
        assert_eq!(report.betslips.len(), 2);
        assert_eq!(report.betslips[0].id, "a");
        assert_eq!(report.betslips[0].selections[0].team1, "Lyon");
        assert_eq!(report.notice, None);
        assert_eq!(report.refreshed, Some(user(200)));
        assert!(!report.low_credits);
        assert_eq!(*generator.api.requests.lock().unwrap(), vec![5.5]);
    }

    #[tokio::test]
    async fn low_balance_after_refresh_is_flagged() {
        let generator = Generator::new(FakeApi::replying(Ok(two_betslips())));
        let mut session = FakeSession::with(user(150));
        session.refreshed = Some(user(50));

        let report = generator.generate(&mut session, "2").await.unwrap();
        assert!(report.low_credits);
    }

    #[tokio::test]
    async fn subscribers_are_never_low() {
        let subscriber = UserAccessState {
            subscription_tier: SubscriptionTier::Pro,
            ..user(0)
        };
        let generator = Generator::new(FakeApi::replying(Ok(two_betslips())));
        let mut session = FakeSession::with(subscriber.clone());
        session.refreshed = Some(subscriber);

        let report = generator.generate(&mut session, "3").await.unwrap();
        assert!(!report.low_credits);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_stale_snapshot() {
        let generator = Generator::new(FakeApi::replying(Ok(two_betslips())));
        let mut session = FakeSession::with(user(300));

        let report = generator.generate(&mut session, "2").await.unwrap();
        assert_eq!(report.betslips.len(), 2);
        assert_eq!(report.refreshed, None);
        assert!(!report.low_credits);
        assert_eq!(session.refreshes, 1);
        assert_eq!(session.state().credits, 300);
    }

    #[tokio::test]
    async fn empty_result_carries_a_notice() {
        let generator = Generator::new(FakeApi::replying(Ok(json!({
            "success": true,
            "betslips": [],
            "message": "No fixtures match"
        }))));
        let mut session = FakeSession::with(user(300));

        let report = generator.generate(&mut session, "9.5").await.unwrap();
        assert!(report.betslips.is_empty());
        assert_eq!(report.notice.as_deref(), Some("No fixtures match"));
    }

    #[tokio::test]
    async fn rejected_body_is_a_server_error() {
        let generator = Generator::new(FakeApi::replying(Ok(json!({
            "success": false,
            "error": "Daily limit reached"
        }))));
        let mut session = FakeSession::with(user(300));

        let err = generator.generate(&mut session, "2").await.unwrap_err();
        assert!(matches!(err, GenerateError::Server(m) if m == "Daily limit reached"));
        assert_eq!(session.refreshes, 0);
    }

    #[tokio::test]
    async fn http_status_failure_is_a_server_error() {
        let generator = Generator::new(FakeApi::replying(Err(ApiError::Status {
            status: 403,
            message: "Insufficient credits".into(),
        })));
        let mut session = FakeSession::with(user(300));

        let err = generator.generate(&mut session, "2").await.unwrap_err();
        assert_eq!(err.to_string(), "Insufficient credits");
    }

    #[tokio::test]
    async fn decode_failure_is_a_generic_network_error() {
        let generator =
            Generator::new(FakeApi::replying(Err(ApiError::Decode("expected value".into()))));
        let mut session = FakeSession::with(user(300));

        let err = generator.generate(&mut session, "2").await.unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Network {
                kind: FailureKind::Generic,
                ..
            }
        ));
    }
}
