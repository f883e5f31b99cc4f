//! Auth subcommands: login, logout, status.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};
use std::path::Path;

use betslip_core::UserAccessState;
use betslip_core::config::ApiConfig;

use crate::api::{ApiClient, ProfileApi};
use crate::session::{AuthConfig, SessionFile};

/// Auth subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AuthAction {
    /// Store an access token after checking it against the profile endpoint.
    Login {
        /// Bearer token issued by the betslip backend.
        #[arg(short, long, env = "BETSLIP_TOKEN")]
        token: String,
    },
    /// Forget the stored token.
    Logout,
    /// Show current auth status.
    Status,
}

/// Execute an auth subcommand.
pub async fn run(
    action: AuthAction,
    session: &mut SessionFile,
    path: &Path,
    api: &ApiConfig,
) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        AuthAction::Login { token } => {
            let client = ApiClient::new(api, Some(token.as_str()))?;
            let state = login(session, path, &token, &client).await?;
            writeln!(
                out,
                "Logged in as {}",
                state.username.as_deref().unwrap_or("(unnamed user)")
            )?;
        }
        AuthAction::Logout => {
            session.clear_auth();
            session.save_to(path)?;
            writeln!(out, "Logged out")?;
        }
        AuthAction::Status => status(&mut out, session)?,
    }
    Ok(())
}

/// Verify `token` with the profile endpoint, then persist it with the snapshot.
///
/// Nothing is written when the token is rejected.
pub async fn login<P: ProfileApi + ?Sized>(
    session: &mut SessionFile,
    path: &Path,
    token: &str,
    profile: &P,
) -> anyhow::Result<UserAccessState> {
    let state = profile
        .fetch_profile()
        .await
        .map_err(|e| anyhow::anyhow!("Login failed: {e}"))?;

    session.auth = Some(AuthConfig {
        username: state.username.clone(),
        access_token: token.to_string(),
    });
    session.user = Some(state.clone());
    session.save_to(path)?;
    Ok(state)
}

fn status(out: &mut impl Write, session: &SessionFile) -> io::Result<()> {
    match &session.auth {
        Some(auth) => {
            writeln!(
                out,
                "Logged in as: {}",
                auth.username.as_deref().unwrap_or("(unnamed user)")
            )?;
            if session.user.is_none() {
                writeln!(out, "Profile not loaded yet; run `betslip status --refresh`")?;
            }
        }
        None => writeln!(out, "Not logged in")?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use async_trait::async_trait;

    struct Profile(Result<UserAccessState, String>);

    #[async_trait]
    impl ProfileApi for Profile {
        async fn fetch_profile(&self) -> Result<UserAccessState, ApiError> {
            self.0.clone().map_err(ApiError::Server)
        }
    }

    #[tokio::test]
    async fn login_persists_token_and_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let state = UserAccessState {
            is_authenticated: true,
            credits: 120,
            username: Some("amina".into()),
            ..UserAccessState::default()
        };
        let mut session = SessionFile::default();

        login(&mut session, &path, "tok", &Profile(Ok(state.clone())))
            .await
            .unwrap();

        let saved = SessionFile::load_from(&path);
        assert_eq!(saved.access_token(), Some("tok"));
        assert_eq!(saved.auth.unwrap().username.as_deref(), Some("amina"));
        assert_eq!(saved.user, Some(state));
    }

    #[tokio::test]
    async fn rejected_token_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut session = SessionFile::default();

        let err = login(&mut session, &path, "bad", &Profile(Err("Invalid token".into())))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid token"));
        assert!(session.auth.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn status_reports_login_state() {
        let mut buf = Vec::new();
        status(&mut buf, &SessionFile::default()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Not logged in\n");
    }
}
