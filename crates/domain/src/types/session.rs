//! Session and account types
//!
//! The authenticated user, the credential payloads exchanged during login,
//! and the durable session record persisted across restarts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_status_conversions;

/// Role of an authenticated dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Dispatcher,
    Viewer,
}

impl_status_conversions!(UserRole {
    Admin => "admin",
    Dispatcher => "dispatcher",
    Viewer => "viewer",
});

/// An authenticated user account.
///
/// The id keeps the identity provider's format (not necessarily a UUID), so
/// it stays a plain string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

/// Login credentials submitted by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Result of a login or verification attempt.
///
/// A backend that requires a second factor answers the initial credential
/// POST with a verification challenge instead of tokens; that outcome is a
/// normal result, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// Tokens issued, session established.
    Authenticated(UserAccount),
    /// Credentials accepted but a verification code was sent; the session
    /// remains anonymous until the code is submitted.
    VerificationRequired { email: String },
}

/// Tokens and account issued by a successful credential exchange.
///
/// This is what the auth gateway hands back on login, code verification,
/// and refresh; the session manager turns it into a [`StoredSession`].
#[derive(Debug, Clone, PartialEq)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in_secs: Option<u64>,
    pub user: UserAccount,
}

/// Gateway-level reply to a credential or verification submission.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthReply {
    /// Tokens were issued.
    Granted(TokenGrant),
    /// The backend wants a verification code before issuing tokens.
    VerificationRequired { email: String },
}

/// Durable session record persisted to the key/value store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: UserAccount,
    pub issued_at: DateTime<Utc>,
    /// Token lifetime as reported at issue time; drives refresh scheduling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_secs: Option<u64>,
}

impl StoredSession {
    /// Seconds remaining until the access token expires, if the lifetime is
    /// known. Saturates at zero once past expiry.
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> Option<u64> {
        let lifetime = self.expires_in_secs?;
        let age = now.signed_duration_since(self.issued_at).num_seconds().max(0);
        let age = u64::try_from(age).unwrap_or(u64::MAX);
        Some(lifetime.saturating_sub(age))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn account() -> UserAccount {
        UserAccount {
            id: "usr_9001".into(),
            email: "ops@example.com".into(),
            name: Some("Ops Admin".into()),
            role: UserRole::Admin,
            avatar_url: None,
            email_verified: true,
        }
    }

    #[test]
    fn expiry_countdown() {
        let issued = Utc::now();
        let session = StoredSession {
            access_token: "tok".into(),
            refresh_token: None,
            user: account(),
            issued_at: issued,
            expires_in_secs: Some(3600),
        };

        let halfway = issued + Duration::seconds(1800);
        assert_eq!(session.seconds_until_expiry(halfway), Some(1800));

        let past = issued + Duration::seconds(7200);
        assert_eq!(session.seconds_until_expiry(past), Some(0));
    }

    #[test]
    fn unknown_lifetime_yields_none() {
        let session = StoredSession {
            access_token: "tok".into(),
            refresh_token: None,
            user: account(),
            issued_at: Utc::now(),
            expires_in_secs: None,
        };
        assert_eq!(session.seconds_until_expiry(Utc::now()), None);
    }

    #[test]
    fn stored_session_roundtrips_through_json() {
        let session = StoredSession {
            access_token: "tok".into(),
            refresh_token: Some("ref".into()),
            user: account(),
            issued_at: Utc::now(),
            expires_in_secs: Some(900),
        };
        let json = serde_json::to_string(&session).unwrap();
        let back: StoredSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back.user, session.user);
        assert_eq!(back.refresh_token.as_deref(), Some("ref"));
    }
}
