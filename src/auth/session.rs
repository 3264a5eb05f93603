//! Session management for HCB API authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Error, Result};

/// An OAuth access token with its optional refresh token and expiry.
///
/// Tokens are never edited in place: a refresh produces a new
/// `AccessToken` which replaces the old one inside the [`Session`].
#[derive(Clone)]
pub struct AccessToken {
    token: SecretString,
    refresh_token: Option<SecretString>,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Create a token that never expires and cannot be refreshed.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            refresh_token: None,
            expires_at: None,
        }
    }

    /// Attach a refresh token.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(SecretString::from(refresh_token.into()));
        self
    }

    /// Set the expiry timestamp.
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// When the token expires, if it expires at all.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns `true` if the token expires within `buffer` from now.
    ///
    /// Evaluated locally against the stored expiry; a token without an
    /// expiry never reports itself expired.
    pub fn expires_within(&self, buffer: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => match Utc::now().checked_add_signed(buffer) {
                Some(deadline) => deadline >= expires_at,
                None => buffer > Duration::zero(),
            },
            None => false,
        }
    }

    /// Returns `true` if the token has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_within(Duration::zero())
    }

    pub(crate) fn secret(&self) -> &SecretString {
        &self.token
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// OAuth application credentials plus the tokens issued to the user.
///
/// # Example
///
/// ```
/// use hcb_rs::OAuthCredentials;
///
/// let creds = OAuthCredentials::new("client-id", "client-secret", "access", "refresh");
/// ```
#[derive(Clone)]
pub struct OAuthCredentials {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: SecretString,
    /// Current access token
    pub access_token: SecretString,
    /// Refresh token
    pub refresh_token: SecretString,
    /// Access token expiry
    pub expires_at: Option<DateTime<Utc>>,
}

impl OAuthCredentials {
    /// Create credentials without a known expiry.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            access_token: SecretString::from(access_token.into()),
            refresh_token: SecretString::from(refresh_token.into()),
            expires_at: None,
        }
    }

    /// Set the access token expiry.
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Load credentials from the environment.
    ///
    /// Reads `HCB_CLIENT_ID`, `HCB_CLIENT_SECRET`, `HCB_ACCESS_TOKEN`,
    /// `HCB_REFRESH_TOKEN` and, optionally, `HCB_TOKEN_EXPIRES_AT` as unix
    /// seconds.
    pub fn from_env() -> Result<Self> {
        fn var(name: &str) -> Result<String> {
            std::env::var(name).map_err(|_| Error::Config(format!("{} must be set", name)))
        }

        let mut creds = Self::new(
            var("HCB_CLIENT_ID")?,
            var("HCB_CLIENT_SECRET")?,
            var("HCB_ACCESS_TOKEN")?,
            var("HCB_REFRESH_TOKEN")?,
        );

        if let Ok(raw) = std::env::var("HCB_TOKEN_EXPIRES_AT") {
            let secs: i64 = raw.parse().map_err(|_| {
                Error::Config(format!("HCB_TOKEN_EXPIRES_AT is not a unix timestamp: {}", raw))
            })?;
            let expires_at = Utc
                .timestamp_opt(secs, 0)
                .single()
                .ok_or_else(|| Error::Config(format!("HCB_TOKEN_EXPIRES_AT out of range: {}", secs)))?;
            creds.expires_at = Some(expires_at);
        }

        Ok(creds)
    }
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Authentication session for the HCB API.
///
/// The session owns the current [`AccessToken`] and is the only place it is
/// replaced. Cloning a session shares the token.
///
/// # Concurrency
///
/// The expiry check and the refresh acquire the lock separately. Two
/// requests racing on one client may both observe an expired token and both
/// refresh, or one may be sent with a token that is replaced a moment later.
#[derive(Clone)]
pub struct Session {
    inner: Arc<RwLock<SessionInner>>,
}

struct SessionInner {
    token: AccessToken,
    app: Option<OAuthApp>,
    token_url: Option<String>,
}

struct OAuthApp {
    client_id: String,
    client_secret: SecretString,
}

impl Session {
    /// Create a session around a static bearer token.
    ///
    /// The token is used as-is and never refreshed.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::from_token(AccessToken::new(access_token))
    }

    /// Create a session around an existing token without refresh credentials.
    pub fn from_token(token: AccessToken) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                token,
                app: None,
                token_url: None,
            })),
        }
    }

    /// Create a refreshable session from OAuth credentials.
    ///
    /// No request is made; the access token is used until it reports itself
    /// expired, at which point it is exchanged at `{base_url}/oauth/token`.
    pub fn from_credentials(credentials: OAuthCredentials, base_url: &str) -> Self {
        let token = AccessToken {
            token: credentials.access_token,
            refresh_token: Some(credentials.refresh_token),
            expires_at: credentials.expires_at,
        };

        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                token,
                app: Some(OAuthApp {
                    client_id: credentials.client_id,
                    client_secret: credentials.client_secret,
                }),
                token_url: Some(format!("{}/oauth/token", base_url.trim_end_matches('/'))),
            })),
        }
    }

    /// Check if the access token has expired.
    pub async fn is_expired(&self) -> bool {
        self.inner.read().await.token.is_expired()
    }

    /// Check if the access token will expire within the given buffer.
    pub async fn expires_within(&self, buffer: Duration) -> bool {
        self.inner.read().await.token.expires_within(buffer)
    }

    /// Get the access token expiration time.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.token.expires_at
    }

    /// Returns `true` if this session holds refresh credentials.
    pub async fn can_refresh(&self) -> bool {
        let inner = self.inner.read().await;
        inner.app.is_some() && inner.token.refresh_token.is_some()
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the session has no refresh
    /// credentials or the token endpoint rejects the exchange.
    pub async fn refresh(&self) -> Result<()> {
        let mut inner = self.inner.write().await;

        let (app, token_url, refresh_token) =
            match (&inner.app, &inner.token_url, &inner.token.refresh_token) {
                (Some(app), Some(url), Some(refresh)) => (app, url.clone(), refresh.clone()),
                _ => {
                    return Err(Error::Authentication {
                        kind: crate::error::AuthErrorKind::TokenExpired,
                        message: "Access token expired and no refresh credentials are available"
                            .to_string(),
                        messages: Vec::new(),
                    })
                }
            };

        let response = Self::exchange_token(app, &token_url, &refresh_token).await?;

        let expires_at = match response.expires_in {
            Some(secs) => Some(expiry_after(secs).ok_or_else(|| Error::Authentication {
                kind: crate::error::AuthErrorKind::TokenExpired,
                message: format!("Token endpoint returned an unusable expires_in: {}", secs),
                messages: Vec::new(),
            })?),
            None => None,
        };

        let new_token = AccessToken {
            token: SecretString::from(response.access_token),
            refresh_token: Some(
                response
                    .refresh_token
                    .map(SecretString::from)
                    .unwrap_or(refresh_token),
            ),
            expires_at,
        };
        inner.token = new_token;

        tracing::info!(expires_at = ?inner.token.expires_at, "Refreshed HCB access token");
        Ok(())
    }

    /// Get a copy of the current access token.
    pub async fn token(&self) -> AccessToken {
        self.inner.read().await.token.clone()
    }

    pub(crate) async fn access_token(&self) -> SecretString {
        self.inner.read().await.token.secret().clone()
    }

    async fn exchange_token(
        app: &OAuthApp,
        token_url: &str,
        refresh_token: &SecretString,
    ) -> Result<TokenResponse> {
        let client = reqwest::Client::new();

        let response = client
            .post(token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.expose_secret()),
                ("client_id", app.client_id.as_str()),
                ("client_secret", app.client_secret.expose_secret()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            tracing::warn!(status, "HCB token refresh rejected");
            return Err(Error::from_oauth_response(status, body));
        }

        Ok(response.json().await?)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &"...")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// `secs` from now, or `None` if that is outside the representable range.
fn expiry_after(secs: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(secs).and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
}
