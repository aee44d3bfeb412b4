//! Google OAuth 2.0 authorization-code flow.

use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use super::identity::{ProfileEmail, ProviderProfile};
use crate::config::GoogleConfig;

const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPES: &str = "profile email";

#[derive(Debug, thiserror::Error)]
pub enum AuthProviderError {
    #[error("authorization denied: {0}")]
    Denied(String),
    #[error("missing authorization code")]
    MissingCode,
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("identity provider rejected the exchange: {0}")]
    Rejected(String),
    #[error("identity provider returned no usable email")]
    NoUsableEmail,
}

impl AuthProviderError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthProviderError::Denied(_)
            | AuthProviderError::MissingCode
            | AuthProviderError::NoUsableEmail => StatusCode::UNAUTHORIZED,
            AuthProviderError::Http(_) | AuthProviderError::Rejected(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

/// External login collaborator: builds the consent URL and turns the returned
/// authorization code into an authenticated profile.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn authorize_url(&self) -> String;

    async fn exchange_code(&self, code: &str) -> Result<ProviderProfile, AuthProviderError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

impl From<UserInfo> for ProviderProfile {
    fn from(info: UserInfo) -> Self {
        let emails = info
            .email
            .map(|value| ProfileEmail {
                value,
                verified: info.email_verified,
            })
            .into_iter()
            .collect();
        Self {
            subject: info.sub,
            display_name: info.name.unwrap_or_default(),
            emails,
        }
    }
}

#[derive(Clone)]
pub struct GoogleProvider {
    http: reqwest::Client,
    config: GoogleConfig,
}

impl GoogleProvider {
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorize_url(&self) -> String {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.callback_url.as_str()),
            ("response_type", "code"),
            ("scope", SCOPES),
        ];
        match Url::parse_with_params(AUTHORIZE_ENDPOINT, &params) {
            Ok(url) => url.into(),
            Err(e) => {
                warn!(error = %e, "failed to build authorize url");
                AUTHORIZE_ENDPOINT.to_string()
            }
        }
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderProfile, AuthProviderError> {
        let form = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.callback_url.as_str()),
            ("grant_type", "authorization_code"),
        ];
        let res = self.http.post(TOKEN_ENDPOINT).form(&form).send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(AuthProviderError::Rejected(format!("{status}: {body}")));
        }
        let token: TokenResponse = res.json().await?;
        debug!("authorization code exchanged");

        let info: UserInfo = self
            .http
            .get(USERINFO_ENDPOINT)
            .bearer_auth(&token.access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(sub = %info.sub, "userinfo fetched");

        Ok(info.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GoogleProvider {
        GoogleProvider::new(GoogleConfig {
            client_id: "client-123".into(),
            client_secret: "shh".into(),
            callback_url: "http://localhost:3000/auth/google/callback".into(),
        })
    }

    #[test]
    fn authorize_url_carries_client_scopes_and_callback() {
        let url = Url::parse(&provider().authorize_url()).unwrap();
        assert_eq!(url.host_str(), Some("accounts.google.com"));
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("client_id"), Some("client-123"));
        assert_eq!(get("response_type"), Some("code"));
        assert_eq!(get("scope"), Some("profile email"));
        assert_eq!(
            get("redirect_uri"),
            Some("http://localhost:3000/auth/google/callback")
        );
    }

    #[test]
    fn userinfo_maps_to_profile() {
        let info: UserInfo = serde_json::from_value(serde_json::json!({
            "sub": "42",
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "email_verified": true
        }))
        .unwrap();
        let profile = ProviderProfile::from(info);
        assert_eq!(profile.subject, "42");
        assert_eq!(profile.display_name, "Grace Hopper");
        assert_eq!(
            profile.emails,
            vec![ProfileEmail {
                value: "grace@example.com".into(),
                verified: true
            }]
        );
    }

    #[test]
    fn userinfo_without_email_has_no_addresses() {
        let info: UserInfo = serde_json::from_value(serde_json::json!({ "sub": "42" })).unwrap();
        assert!(ProviderProfile::from(info).emails.is_empty());
    }
}
