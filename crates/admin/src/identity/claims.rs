//! ID token claims.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use super::IdentityError;

/// The claims the panel reads from an ID token.
///
/// The payload is decoded without checking the signature. The claims only
/// drive what the panel renders; the roles backend verifies the token on
/// every call.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Account id.
    #[serde(default)]
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Expiry, unix seconds.
    pub exp: i64,
    /// Custom claim set when the admin role is granted.
    #[serde(default)]
    pub admin: Option<bool>,
    /// Custom role claim, used by accounts promoted through the role field.
    #[serde(default)]
    pub role: Option<String>,
}

impl TokenClaims {
    /// Decode the payload segment of a JWT.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::InvalidToken` if the token does not have three
    /// segments or the payload is not base64url-encoded JSON.
    pub fn from_id_token(token: &str) -> Result<Self, IdentityError> {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => {
                return Err(IdentityError::InvalidToken(
                    "expected three segments".to_string(),
                ));
            }
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| IdentityError::InvalidToken(e.to_string()))
    }

    /// Whether the token grants admin access.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.admin == Some(true) || self.role.as_deref() == Some("admin")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn jwt(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn test_admin_claim() {
        let token = jwt(&json!({"sub": "u1", "exp": 1_900_000_000, "admin": true}));
        let claims = TokenClaims::from_id_token(&token).unwrap();
        assert!(claims.is_admin());
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.exp, 1_900_000_000);
    }

    #[test]
    fn test_role_claim() {
        let token = jwt(&json!({"sub": "u1", "exp": 1, "role": "admin"}));
        assert!(TokenClaims::from_id_token(&token).unwrap().is_admin());

        let token = jwt(&json!({"sub": "u1", "exp": 1, "role": "editor"}));
        assert!(!TokenClaims::from_id_token(&token).unwrap().is_admin());
    }

    #[test]
    fn test_no_claims_is_not_admin() {
        let token = jwt(&json!({"sub": "u1", "exp": 1, "admin": false}));
        assert!(!TokenClaims::from_id_token(&token).unwrap().is_admin());

        let token = jwt(&json!({"sub": "u1", "exp": 1}));
        assert!(!TokenClaims::from_id_token(&token).unwrap().is_admin());
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(TokenClaims::from_id_token("not-a-jwt").is_err());
        assert!(TokenClaims::from_id_token("a.b.c.d").is_err());
        assert!(TokenClaims::from_id_token("a.!!!.c").is_err());

        let not_json = URL_SAFE_NO_PAD.encode("plain text");
        assert!(TokenClaims::from_id_token(&format!("h.{not_json}.s")).is_err());
    }
}
