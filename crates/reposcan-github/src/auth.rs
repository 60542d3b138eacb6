// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! GitHub App authentication.
//!
//! The app signs a short-lived RS256 assertion with its private key; the
//! installation endpoint exchanges it for a bearer token scoped to one
//! installation. Tokens are cached until shortly before their expiry.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use reposcan_core::ScanError;

/// Refresh margin: a cached token within this window of expiry is replaced.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Lifetime of the signed app assertion. GitHub caps this at 10 minutes.
const ASSERTION_LIFETIME_SECS: i64 = 540;

#[derive(Debug, Serialize)]
struct AppClaims {
    iat: i64,
    exp: i64,
    iss: String,
}

/// Signs app-level JWT assertions with the App's private key.
pub struct AppTokenSource {
    encoding_key: EncodingKey,
    client_id: String,
}

impl std::fmt::Debug for AppTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppTokenSource")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl AppTokenSource {
    /// Creates a signer from a PEM-encoded RSA private key and the App's
    /// client ID.
    pub fn new(private_key_pem: &str, client_id: String) -> Result<Self, ScanError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| ScanError::Auth(format!("invalid app private key: {e}")))?;
        Ok(Self {
            encoding_key,
            client_id,
        })
    }

    /// Signs a fresh assertion. Issued-at is backdated 60 seconds to absorb
    /// clock skew between this host and the API.
    pub fn sign_assertion(&self) -> Result<String, ScanError> {
        let now = Utc::now().timestamp();
        let claims = AppClaims {
            iat: now - 60,
            exp: now + ASSERTION_LIFETIME_SECS,
            iss: self.client_id.clone(),
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| ScanError::Auth(format!("signing app assertion: {e}")))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct InstallationTokenResponse {
    token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Exchanges app assertions for installation bearer tokens, caching the
/// result until it nears expiry.
pub struct InstallationTokenSource {
    app: Option<AppTokenSource>,
    installation_id: i64,
    http: reqwest::Client,
    api_base: String,
    cached: Mutex<Option<CachedToken>>,
}

impl InstallationTokenSource {
    pub fn new(
        app: AppTokenSource,
        installation_id: i64,
        http: reqwest::Client,
        api_base: String,
    ) -> Self {
        Self {
            app: Some(app),
            installation_id,
            http,
            api_base,
            cached: Mutex::new(None),
        }
    }

    /// A source pre-seeded with a fixed token; used by tests to bypass the
    /// signing path, which needs a real RSA key.
    #[cfg(test)]
    pub fn with_static_token(token: &str) -> Self {
        Self {
            app: None,
            installation_id: 0,
            http: reqwest::Client::new(),
            api_base: String::new(),
            cached: Mutex::new(Some(CachedToken {
                token: token.to_string(),
                expires_at: Utc::now() + ChronoDuration::hours(1),
            })),
        }
    }

    /// Returns a valid installation bearer token, fetching a new one when the
    /// cached token is absent or within the refresh margin of expiry.
    pub async fn bearer(&self) -> Result<String, ScanError> {
        let mut cached = self.cached.lock().await;
        if let Some(tok) = cached.as_ref() {
            if tok.expires_at - ChronoDuration::seconds(EXPIRY_MARGIN_SECS) > Utc::now() {
                return Ok(tok.token.clone());
            }
        }

        let app = self
            .app
            .as_ref()
            .ok_or_else(|| ScanError::Auth("no app credentials configured".into()))?;
        let assertion = app.sign_assertion()?;
        let url = format!(
            "{}/app/installations/{}/access_tokens",
            self.api_base, self.installation_id
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(assertion)
            .header("accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| ScanError::Auth(format!("installation token request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScanError::Auth(format!(
                "installation token endpoint returned {status}: {body}"
            )));
        }

        let token: InstallationTokenResponse = response
            .json()
            .await
            .map_err(|e| ScanError::Auth(format!("parsing installation token: {e}")))?;

        debug!(
            installation_id = self.installation_id,
            expires_at = %token.expires_at,
            "installation token refreshed"
        );

        *cached = Some(CachedToken {
            token: token.token.clone(),
            expires_at: token.expires_at,
        });
        Ok(token.token)
    }
}
