use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::{claims::Claims, identity::Identity};
use crate::{config::JwtConfig, state::AppState};

/// Session tokens are valid for one hour from issuance.
pub const TOKEN_TTL: Duration = Duration::hours(1);

/// Signs identities into HS256 bearer tokens and verifies them again.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    #[allow(dead_code)] // no route requires a token yet; only verify reads it
    decoding: DecodingKey,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    pub fn issue(&self, identity: Identity) -> jsonwebtoken::errors::Result<String> {
        self.issue_at(identity, OffsetDateTime::now_utc())
    }

    fn issue_at(
        &self,
        identity: Identity,
        now: OffsetDateTime,
    ) -> jsonwebtoken::errors::Result<String> {
        let claims = Claims {
            identity,
            iat: now.unix_timestamp(),
            exp: (now + TOKEN_TTL).unix_timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(google_id = %claims.identity.google_id, exp = claims.exp, "jwt signed");
        Ok(token)
    }

    /// Checks signature and expiry.
    #[allow(dead_code)] // no route requires a token yet
    pub fn verify(&self, token: &str) -> jsonwebtoken::errors::Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        debug!(google_id = %data.claims.identity.google_id, "jwt verified");
        Ok(data.claims)
    }
}

impl FromRef<AppState> for TokenIssuer {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(&JwtConfig {
            secret: secret.into(),
        })
    }

    fn identity() -> Identity {
        Identity {
            google_id: "1100220033".into(),
            email: "ada@example.com".into(),
            display_name: "Ada Lovelace".into(),
        }
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = issuer("dev-secret");
        let before = OffsetDateTime::now_utc().unix_timestamp();
        let token = keys.issue(identity()).expect("sign");
        let claims = keys.verify(&token).expect("verify");

        assert_eq!(claims.identity, identity());
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!((claims.iat - before).abs() <= 5);
    }

    #[test]
    fn payload_carries_identity_fields_at_top_level() {
        let keys = issuer("dev-secret");
        let token = keys.issue(identity()).expect("sign");
        let mut validation = Validation::default();
        validation.required_spec_claims.clear();
        let raw = decode::<serde_json::Value>(
            &token,
            &DecodingKey::from_secret(b"dev-secret"),
            &validation,
        )
        .expect("decode");
        assert_eq!(raw.claims["googleId"], "1100220033");
        assert_eq!(raw.claims["email"], "ada@example.com");
        assert_eq!(raw.claims["displayName"], "Ada Lovelace");
    }

    #[test]
    fn verify_rejects_other_secret() {
        let token = issuer("secret-a").issue(identity()).expect("sign");
        let err = issuer("secret-b").verify(&token).unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = issuer("dev-secret");
        let long_ago = OffsetDateTime::now_utc() - Duration::hours(3);
        let token = keys.issue_at(identity(), long_ago).expect("sign");
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(
            err.kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        ));
    }
}
