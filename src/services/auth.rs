use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::entities::admin_users;

/// Claims embedded in an admin session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub id: i32,
    pub username: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

/// Issues and verifies signed, time-limited admin session tokens.
/// Verification is stateless: there is no session store.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl_hours: i64,
}

impl AuthService {
    pub fn new(secret: &str, issuer: String, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            ttl_hours,
        }
    }

    pub fn issue_token(&self, admin: &admin_users::Model) -> anyhow::Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(self.ttl_hours);

        let claims = Claims {
            sub: admin.id.to_string(),
            id: admin.id,
            username: admin.username.clone(),
            role: admin.role.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_admin() -> admin_users::Model {
        admin_users::Model {
            id: 7,
            username: "admin".to_string(),
            password_hash: "unused".to_string(),
            email: "admin@example.org".to_string(),
            role: "admin".to_string(),
            last_login: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_issue_and_verify_token() {
        let service = AuthService::new("test_secret_key", "clubhouse".to_string(), 24);

        let token = service.issue_token(&test_admin()).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.id, 7);
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.iss, "clubhouse");
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = AuthService::new("test_secret_key", "clubhouse".to_string(), 24);
        assert!(service.verify_token("not-a-token").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service1 = AuthService::new("secret1", "clubhouse".to_string(), 24);
        let service2 = AuthService::new("secret2", "clubhouse".to_string(), 24);

        let token = service1.issue_token(&test_admin()).unwrap();
        assert!(service2.verify_token(&token).is_err());
    }

    #[test]
    fn test_expiry_window() {
        let service = AuthService::new("test_secret_key", "clubhouse".to_string(), 24);

        let token = service.issue_token(&test_admin()).unwrap();
        let claims = service.verify_token(&token).unwrap();

        let now = chrono::Utc::now().timestamp();
        let expires_in = claims.exp - now;
        assert!(expires_in > 23 * 3600);
        assert!(expires_in <= 24 * 3600);
    }
}
