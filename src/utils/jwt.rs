use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::errors::ClassroomError;

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub iat: i64,    // Issued at (签发时间)
    pub exp: i64,    // Expiration time (时间戳)
}

/// 令牌校验失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid,
}

impl TokenError {
    pub fn message(&self) -> &'static str {
        match self {
            TokenError::Expired => "Token has expired!",
            TokenError::Invalid => "Invalid token!",
        }
    }
}

impl From<TokenError> for ClassroomError {
    fn from(err: TokenError) -> Self {
        ClassroomError::authentication(err.message())
    }
}

/// 无状态令牌服务（HS256）
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(&config.secret, Duration::minutes(config.token_ttl_minutes))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // 签发令牌
    pub fn issue(&self, user_id: i64) -> Result<String, ClassroomError> {
        self.issue_at(user_id, chrono::Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        user_id: i64,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<String, ClassroomError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ClassroomError::serialization(format!("JWT token 生成失败: {e}")))
    }

    // 校验令牌，返回用户 ID；不检查用户是否仍然有效
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        data.claims.sub.parse::<i64>().map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", Duration::minutes(30))
    }

    #[test]
    fn test_issue_then_verify() {
        let svc = service();
        let token = svc.issue(42).unwrap();
        assert_eq!(svc.verify(&token), Ok(42));
    }

    #[test]
    fn test_expired_token() {
        let svc = service();
        let issued = chrono::Utc::now() - Duration::hours(2);
        let token = svc.issue_at(42, issued).unwrap();
        assert_eq!(svc.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = service().issue(42).unwrap();
        let other = TokenService::new("another-secret", Duration::minutes(30));
        assert_eq!(other.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert_eq!(service().verify("not.a.token"), Err(TokenError::Invalid));
        assert_eq!(service().verify(""), Err(TokenError::Invalid));
    }

    #[test]
    fn test_token_error_maps_to_401() {
        let err: ClassroomError = TokenError::Expired.into();
        assert_eq!(err.status(), actix_web::http::StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Token has expired!");
    }
}
