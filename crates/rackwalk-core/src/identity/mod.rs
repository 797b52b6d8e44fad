//! Operator identity and sign-in.
//!
//! The walkthrough flow takes an [`AuthSession`] by value instead of looking
//! an operator up from ambient state. The [`AuthGateway`] trait is the
//! sign-in seam; [`StaticDirectory`] backs it with a fixed operator list for
//! the CLI and tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Profile of an operator who performs walkthroughs.
///
/// Field names follow the dashboard wire format, which spells compound names
/// in camel case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Stable operator id.
    pub id: String,

    /// Full display name.
    pub name: String,

    /// Sign-in email.
    pub email: String,

    /// Role label shown on the dashboard.
    pub role: String,

    /// Avatar image URL, when the operator has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    /// ISO date of the operator's most recent inspection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_inspection_date: Option<String>,
}

/// A signed-in operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// The operator's profile.
    pub user: UserProfile,

    /// Wall-clock milliseconds of sign-in.
    pub signed_in_at_ms: u64,
}

/// Sign-in failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Email or password was empty.
    #[error("email and password are required")]
    MissingCredentials,

    /// No operator matches the given email.
    #[error("invalid email or password")]
    InvalidCredentials,
}

/// Sign-in seam for walkthrough runners.
pub trait AuthGateway {
    /// Attempts to sign an operator in.
    fn login(&self, email: &str, password: &str, now_ms: u64) -> Result<AuthSession, AuthError>;

    /// Ends a session.
    ///
    /// The default implementation only logs; gateways with server-side state
    /// override it.
    fn logout(&self, session: &AuthSession) {
        tracing::debug!(operator = %session.user.id, "operator signed out");
    }
}

/// Gateway backed by a fixed operator list.
///
/// Lookup is by email, case-insensitive. The directory stores no secrets;
/// any non-empty password passes once the email matches.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    operators: Vec<UserProfile>,
}

impl StaticDirectory {
    /// Creates a directory over the given operators.
    #[must_use]
    pub fn new(operators: Vec<UserProfile>) -> Self {
        Self { operators }
    }

    /// All operators in the directory.
    #[must_use]
    pub fn operators(&self) -> &[UserProfile] {
        &self.operators
    }
}

impl AuthGateway for StaticDirectory {
    fn login(&self, email: &str, password: &str, now_ms: u64) -> Result<AuthSession, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        let user = self
            .operators
            .iter()
            .find(|op| op.email.eq_ignore_ascii_case(email.trim()))
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;
        tracing::debug!(operator = %user.id, "operator signed in");
        Ok(AuthSession {
            user,
            signed_in_at_ms: now_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> StaticDirectory {
        StaticDirectory::new(vec![UserProfile {
            id: "op-1".to_string(),
            name: "Sarah Chen".to_string(),
            email: "sarah.chen@example.com".to_string(),
            role: "Facilities Technician".to_string(),
            avatar_url: None,
            last_inspection_date: Some("2025-06-12".to_string()),
        }])
    }

    #[test]
    fn login_matches_email_case_insensitively() {
        let session = directory()
            .login("Sarah.Chen@Example.com", "pw", 10)
            .unwrap();
        assert_eq!(session.user.id, "op-1");
        assert_eq!(session.signed_in_at_ms, 10);
    }

    #[test]
    fn login_rejects_empty_credentials() {
        let dir = directory();
        assert_eq!(
            dir.login("", "pw", 0).unwrap_err(),
            AuthError::MissingCredentials
        );
        assert_eq!(
            dir.login("sarah.chen@example.com", "", 0).unwrap_err(),
            AuthError::MissingCredentials
        );
    }

    #[test]
    fn login_rejects_unknown_operator() {
        assert_eq!(
            directory().login("nobody@example.com", "pw", 0).unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn profile_serializes_camel_case() {
        let profile = UserProfile {
            id: "op-1".to_string(),
            name: "Sarah Chen".to_string(),
            email: "sarah.chen@example.com".to_string(),
            role: "Facilities Technician".to_string(),
            avatar_url: Some("https://example.com/a.png".to_string()),
            last_inspection_date: None,
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["avatarUrl"], "https://example.com/a.png");
        assert!(json.get("lastInspectionDate").is_none());
        assert!(json.get("avatar_url").is_none());
    }
}
