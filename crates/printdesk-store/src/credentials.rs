//! # Access Token Inspection
//!
//! Access tokens are passed through to the record store untouched. Before a
//! network round-trip we only look at what the token says about itself: an
//! empty token is rejected, and a JWT whose `exp` is already in the past is
//! reported as expired instead of producing an opaque 401 later.
//!
//! Signatures are NOT verified here; the store does that.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::error::{StoreError, StoreResult};

/// Claims read from a store access token.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (user id).
    #[serde(default)]
    pub sub: Option<String>,

    /// Expiry, seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,

    /// Database role the token maps to.
    #[serde(default)]
    pub role: Option<String>,
}

impl TokenClaims {
    /// Expiry as a timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }
}

/// What [`inspect_token`] learned about a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A readable, unexpired JWT.
    Jwt(TokenClaims),
    /// Anything else; forwarded as-is.
    Opaque,
}

/// Inspects an access token without verifying its signature.
pub fn inspect_token(token: &str, now: DateTime<Utc>) -> StoreResult<TokenKind> {
    let token = token.trim();
    if token.is_empty() {
        return Err(StoreError::MissingCredentials);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let claims = match decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => data.claims,
        Err(_) => return Ok(TokenKind::Opaque),
    };

    if let Some(expired_at) = claims.expires_at() {
        if expired_at <= now {
            return Err(StoreError::TokenExpired { expired_at });
        }
    }

    Ok(TokenKind::Jwt(claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: i64,
        role: String,
        aud: String,
    }

    fn jwt(exp: i64) -> String {
        let claims = Claims {
            sub: "user-1".into(),
            exp,
            role: "authenticated".into(),
            aud: "authenticated".into(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"store-side-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_token_is_missing() {
        assert!(matches!(
            inspect_token("  ", Utc::now()),
            Err(StoreError::MissingCredentials)
        ));
    }

    #[test]
    fn test_valid_jwt_is_read() {
        let now = Utc::now();
        let token = jwt(now.timestamp() + 3600);

        match inspect_token(&token, now).unwrap() {
            TokenKind::Jwt(claims) => {
                assert_eq!(claims.sub.as_deref(), Some("user-1"));
                assert_eq!(claims.role.as_deref(), Some("authenticated"));
            }
            TokenKind::Opaque => panic!("expected a readable JWT"),
        }
    }

    #[test]
    fn test_expired_jwt_is_rejected() {
        let now = Utc::now();
        let token = jwt(now.timestamp() - 60);

        let err = inspect_token(&token, now).unwrap_err();
        assert!(matches!(err, StoreError::TokenExpired { .. }));
        assert!(err.is_credential_error());
    }

    #[test]
    fn test_opaque_token_passes_through() {
        assert_eq!(
            inspect_token("sbp_opaque_token", Utc::now()).unwrap(),
            TokenKind::Opaque
        );
    }
}
