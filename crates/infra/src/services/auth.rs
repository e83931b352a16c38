//! Authentication gateway (REST dialect)
//!
//! Speaks the `/auth/*` endpoints over the shared API client. A login or
//! verification reply is either a token grant or a verification challenge;
//! both arrive as 200s and are distinguished by shape. Because identical
//! concurrent POSTs share one in-flight request, parallel logins with the
//! same credentials collapse into a single network call.

use std::sync::Arc;

use async_trait::async_trait;
use fleetline_common::time::{Clock, SystemClock};
use fleetline_core::AuthGateway;
use fleetline_domain::{
    ApiError, AuthReply, Credentials, TokenGrant, UserAccount, UserRole,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{ApiClient, CallOptions};

const LOGIN_PATH: &str = "/auth/login";
const VERIFY_PATH: &str = "/auth/verify";
const REFRESH_PATH: &str = "/auth/refresh";
const ME_PATH: &str = "/auth/me";
const LOGOUT_PATH: &str = "/auth/logout";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    id: String,
    email: String,
    #[serde(default)]
    name: Option<String>,
    role: UserRole,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

/// Reply to login, verify, and refresh: either tokens or a challenge.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthReplyRecord {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    user: Option<UserRecord>,
    #[serde(default)]
    verification_required: bool,
    #[serde(default)]
    email: Option<String>,
}

fn map_user(record: UserRecord) -> UserAccount {
    UserAccount {
        id: record.id,
        email: record.email,
        name: record.name,
        role: record.role,
        avatar_url: record.avatar_url,
        email_verified: record.email_verified,
    }
}

fn map_reply(record: AuthReplyRecord) -> Result<AuthReply, ApiError> {
    if record.verification_required {
        let email = record.email.ok_or_else(|| {
            ApiError::Decode("verification challenge without an email".to_string())
        })?;
        return Ok(AuthReply::VerificationRequired { email });
    }
    match (record.access_token, record.user) {
        (Some(access_token), Some(user)) => Ok(AuthReply::Granted(TokenGrant {
            access_token,
            refresh_token: record.refresh_token,
            expires_in_secs: record.expires_in,
            user: map_user(user),
        })),
        _ => Err(ApiError::Decode("auth reply carries neither tokens nor a challenge".to_string())),
    }
}

/// Auth gateway over the shared API client.
pub struct AuthService<C = SystemClock>
where
    C: Clock + Clone,
{
    api: Arc<ApiClient<C>>,
}

impl<C> AuthService<C>
where
    C: Clock + Clone + 'static,
{
    pub fn new(api: Arc<ApiClient<C>>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<C> AuthGateway for AuthService<C>
where
    C: Clock + Clone + 'static,
{
    async fn login(&self, credentials: &Credentials) -> Result<AuthReply, ApiError> {
        let body =
            LoginRequest { email: &credentials.email, password: &credentials.password };
        let record: AuthReplyRecord =
            self.api.post(LOGIN_PATH, &body, CallOptions::new()).await?;
        map_reply(record)
    }

    async fn verify_code(&self, email: &str, code: &str) -> Result<AuthReply, ApiError> {
        let record: AuthReplyRecord = self
            .api
            .post(VERIFY_PATH, &json!({"email": email, "code": code}), CallOptions::new())
            .await?;
        map_reply(record)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthReply, ApiError> {
        let record: AuthReplyRecord = self
            .api
            .post(REFRESH_PATH, &json!({"refreshToken": refresh_token}), CallOptions::new())
            .await?;
        map_reply(record)
    }

    async fn me(&self) -> Result<UserAccount, ApiError> {
        // Never cached: this call is how a stale token gets noticed.
        let record: UserRecord = self.api.get(ME_PATH, CallOptions::new().no_cache()).await?;
        Ok(map_user(record))
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let _: serde_json::Value =
            self.api.post(LOGOUT_PATH, &json!({}), CallOptions::new()).await?;
        Ok(())
    }
}
