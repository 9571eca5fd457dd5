//! OAuth credential record.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CredentialError, Result};

/// Request-token pair obtained during the authorization handshake.
///
/// Kept as one value so the token and its secret are always set together.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
struct RequestTokenPair {
    token: String,
    secret: String,
}

/// OAuth consumer identity plus the session tokens issued for it.
///
/// The consumer key/secret are bound at construction and cannot change.
/// The request-token pair can only be replaced through
/// [`Credential::set_request_token`]. Everything else is plain mutable state
/// filled in by whatever authorization flow owns the credential.
///
/// # Example
/// ```
/// use chrono::{Duration, Utc};
/// use oauth_credential::auth::Credential;
///
/// let mut credential = Credential::new("key123", "secret456");
/// assert!(!credential.is_expired());
///
/// credential.set_request_token("rtok", "rtoksecret");
/// assert_eq!(credential.request_token(), Some("rtok"));
///
/// credential.access_token = Some("access".to_string());
/// credential.expiration_date = Some(Utc::now() - Duration::hours(1));
/// assert!(credential.is_expired());
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    consumer_key: String,
    consumer_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_token: Option<RequestTokenPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
}

impl Credential {
    /// Create a credential for the given consumer with no tokens set.
    ///
    /// Inputs are stored as given. Use [`Credential::try_new`] to reject
    /// empty values.
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        let consumer_key = consumer_key.into();
        let consumer_secret = consumer_secret.into();
        if consumer_key.is_empty() || consumer_secret.is_empty() {
            warn!(
                key_empty = consumer_key.is_empty(),
                secret_empty = consumer_secret.is_empty(),
                "credential created with empty consumer value"
            );
        }
        Self {
            consumer_key,
            consumer_secret,
            request_token: None,
            access_token: None,
            access_token_secret: None,
            token_type: None,
            refresh_token: None,
            expiration_date: None,
        }
    }

    /// Create a credential, rejecting an empty or blank consumer key or secret.
    pub fn try_new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Result<Self> {
        let consumer_key = consumer_key.into();
        let consumer_secret = consumer_secret.into();
        if consumer_key.trim().is_empty() {
            return Err(CredentialError::InvalidArgument(
                "consumer key must not be empty".to_string(),
            ));
        }
        if consumer_secret.trim().is_empty() {
            return Err(CredentialError::InvalidArgument(
                "consumer secret must not be empty".to_string(),
            ));
        }
        Ok(Self::new(consumer_key, consumer_secret))
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    pub fn request_token(&self) -> Option<&str> {
        self.request_token.as_ref().map(|pair| pair.token.as_str())
    }

    pub fn request_token_secret(&self) -> Option<&str> {
        self.request_token.as_ref().map(|pair| pair.secret.as_str())
    }

    /// Replace the request-token pair.
    ///
    /// Overwrites any previous pair. Values are stored as given, empty strings included.
    pub fn set_request_token(
        &mut self,
        request_token: impl Into<String>,
        request_token_secret: impl Into<String>,
    ) {
        let replaced = self.request_token.is_some();
        self.request_token = Some(RequestTokenPair {
            token: request_token.into(),
            secret: request_token_secret.into(),
        });
        debug!(
            consumer_key = %self.consumer_key,
            replaced,
            "request token pair set"
        );
    }

    pub fn has_request_token(&self) -> bool {
        self.request_token.is_some()
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// Whether the expiration date is set and not after the current instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Same as [`Credential::is_expired`], evaluated against `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date.is_some_and(|expires_at| expires_at <= now)
    }

    /// Set the expiration date from a relative lifetime in seconds (`expires_in`).
    pub fn set_expires_in(&mut self, seconds: u64) -> Result<()> {
        self.set_expires_in_at(Utc::now(), seconds)
    }

    /// Set the expiration date to `seconds` after `now`.
    pub fn set_expires_in_at(&mut self, now: DateTime<Utc>, seconds: u64) -> Result<()> {
        let expires_at = i64::try_from(seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                CredentialError::InvalidArgument(format!(
                    "expires_in of {seconds}s is out of range"
                ))
            })?;
        self.expiration_date = Some(expires_at);
        Ok(())
    }

    /// Drop every token and the expiration date, keeping the consumer pair.
    pub fn clear_session(&mut self) {
        self.request_token = None;
        self.access_token = None;
        self.access_token_secret = None;
        self.token_type = None;
        self.refresh_token = None;
        self.expiration_date = None;
        debug!(consumer_key = %self.consumer_key, "credential session cleared");
    }
}

const REDACTED: &str = "<redacted>";

fn redact(value: Option<&str>) -> Option<&'static str> {
    value.map(|_| REDACTED)
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &REDACTED)
            .field("request_token", &self.request_token())
            .field("request_token_secret", &redact(self.request_token_secret()))
            .field("access_token", &redact(self.access_token.as_deref()))
            .field(
                "access_token_secret",
                &redact(self.access_token_secret.as_deref()),
            )
            .field("token_type", &self.token_type)
            .field("refresh_token", &redact(self.refresh_token.as_deref()))
            .field("expiration_date", &self.expiration_date)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn credential() -> Credential {
        Credential::new("key123", "secret456")
    }

    #[test]
    fn new_stores_consumer_pair_and_leaves_tokens_unset() {
        let credential = credential();
        assert_eq!(credential.consumer_key(), "key123");
        assert_eq!(credential.consumer_secret(), "secret456");
        assert_eq!(credential.request_token(), None);
        assert_eq!(credential.request_token_secret(), None);
        assert!(credential.access_token.is_none());
        assert!(credential.access_token_secret.is_none());
        assert!(credential.token_type.is_none());
        assert!(credential.refresh_token.is_none());
        assert!(credential.expiration_date.is_none());
    }

    #[test]
    fn new_accepts_empty_values_as_given() {
        let credential = Credential::new("", "");
        assert_eq!(credential.consumer_key(), "");
        assert_eq!(credential.consumer_secret(), "");
    }

    #[test]
    fn try_new_rejects_blank_key() {
        let err = Credential::try_new("  ", "secret").unwrap_err();
        match err {
            CredentialError::InvalidArgument(msg) => assert!(msg.contains("consumer key")),
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn try_new_rejects_empty_secret() {
        let err = Credential::try_new("key", "").unwrap_err();
        match err {
            CredentialError::InvalidArgument(msg) => assert!(msg.contains("consumer secret")),
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn set_request_token_overwrites_previous_pair() {
        let mut credential = credential();
        credential.set_request_token("first", "first-secret");
        credential.set_request_token("second", "second-secret");
        assert_eq!(credential.request_token(), Some("second"));
        assert_eq!(credential.request_token_secret(), Some("second-secret"));
        assert!(credential.has_request_token());
    }

    #[test]
    fn set_request_token_keeps_empty_strings() {
        let mut credential = credential();
        credential.set_request_token("", "");
        assert_eq!(credential.request_token(), Some(""));
        assert_eq!(credential.request_token_secret(), Some(""));
    }

    #[test]
    fn is_expired_at_boundary_is_inclusive() {
        let now = Utc::now();
        let mut credential = credential();
        assert!(!credential.is_expired_at(now));

        credential.expiration_date = Some(now);
        assert!(credential.is_expired_at(now));
        assert!(!credential.is_expired_at(now - Duration::milliseconds(1)));
        assert!(credential.is_expired_at(now + Duration::milliseconds(1)));
    }

    #[test]
    fn set_expires_in_at_offsets_from_now() {
        let now = Utc::now();
        let mut credential = credential();
        credential.set_expires_in_at(now, 3600).unwrap();
        assert_eq!(credential.expiration_date, Some(now + Duration::seconds(3600)));
        assert!(!credential.is_expired_at(now));
        assert!(credential.is_expired_at(now + Duration::seconds(3600)));
    }

    #[test]
    fn set_expires_in_zero_expires_immediately() {
        let mut credential = credential();
        credential.set_expires_in(0).unwrap();
        assert!(credential.is_expired());
    }

    #[test]
    fn set_expires_in_rejects_overflow() {
        let mut credential = credential();
        let err = credential.set_expires_in(u64::MAX).unwrap_err();
        assert!(matches!(err, CredentialError::InvalidArgument(_)));
        assert!(credential.expiration_date.is_none());
    }

    #[test]
    fn clear_session_keeps_consumer_pair() {
        let mut credential = credential();
        credential.set_request_token("rtok", "rtoksecret");
        credential.access_token = Some("access".into());
        credential.access_token_secret = Some("access-secret".into());
        credential.token_type = Some("bearer".into());
        credential.refresh_token = Some("refresh".into());
        credential.expiration_date = Some(Utc::now());

        credential.clear_session();

        assert_eq!(credential, Credential::new("key123", "secret456"));
        assert!(!credential.has_request_token());
        assert!(!credential.has_access_token());
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut credential = credential();
        credential.set_request_token("rtok", "rtoksecret");
        credential.access_token = Some("access-value".into());
        credential.access_token_secret = Some("access-secret-value".into());
        credential.refresh_token = Some("refresh-value".into());

        let rendered = format!("{credential:?}");
        assert!(rendered.contains("key123"));
        assert!(rendered.contains("rtok"));
        assert!(!rendered.contains("secret456"));
        assert!(!rendered.contains("rtoksecret"));
        assert!(!rendered.contains("access-value"));
        assert!(!rendered.contains("access-secret-value"));
        assert!(!rendered.contains("refresh-value"));
    }
}
