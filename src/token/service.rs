//! Token issuing and verification over a shared HMAC secret.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};

use crate::config::{SigningAlgorithm, TokenConfig};
use crate::token::types::{TokenClaims, TokenError};

/// Issued-at is backdated to tolerate small clock differences between hosts.
const IAT_BACKDATE_SECS: u64 = 30;

/// Reserved claims owned by the service; caller values are replaced.
const RESERVED_CLAIMS: [&str; 2] = ["iat", "exp"];

/// Stateless issuer/verifier of compact signed tokens.
#[derive(Clone)]
pub struct TokenService {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: Option<u64>,
}

impl TokenService {
    /// Create a service from configuration.
    pub fn new(config: &TokenConfig) -> Self {
        let secret = config.secret.as_bytes();
        Self {
            algorithm: match config.algorithm {
                SigningAlgorithm::HS256 => Algorithm::HS256,
                SigningAlgorithm::HS512 => Algorithm::HS512,
            },
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs: config.ttl_secs,
        }
    }

    /// Sign claims plus an issued-at timestamp.
    pub fn issue(&self, claims: Map<String, Value>) -> Result<String, TokenError> {
        self.issue_at(claims, jsonwebtoken::get_current_timestamp())
    }

    /// Sign claims as if issued at `now` (seconds since the epoch).
    pub fn issue_at(&self, mut claims: Map<String, Value>, now: u64) -> Result<String, TokenError> {
        for reserved in RESERVED_CLAIMS {
            claims.remove(reserved);
        }

        let payload = TokenClaims {
            iat: now.saturating_sub(IAT_BACKDATE_SECS),
            exp: self.ttl_secs.map(|ttl| now + ttl),
            claims,
        };

        encode(&Header::new(self.algorithm), &payload, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Check the signature and expiry of a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims.clear();
        validation.validate_aud = false;
        validation.leeway = 0;

        decode::<TokenClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str, algorithm: SigningAlgorithm) -> TokenConfig {
        TokenConfig {
            secret: secret.to_string(),
            algorithm,
            ..TokenConfig::default()
        }
    }

    fn claims() -> Map<String, Value> {
        let mut claims = Map::new();
        claims.insert("foo".into(), Value::from("bar"));
        claims.insert("score".into(), Value::from(12));
        claims
    }

    #[test]
    fn test_round_trip() {
        for algorithm in [SigningAlgorithm::HS256, SigningAlgorithm::HS512] {
            let service = TokenService::new(&config("shhhhh", algorithm));
            let token = service.issue(claims()).unwrap();
            let verified = service.verify(&token).unwrap();
            assert_eq!(verified.claims, claims());
            assert!(verified.exp.is_none());
        }
    }

    #[test]
    fn test_issued_at_is_backdated() {
        let service = TokenService::new(&config("shhhhh", SigningAlgorithm::HS256));
        let now = jsonwebtoken::get_current_timestamp();
        let token = service.issue_at(claims(), now).unwrap();
        assert_eq!(service.verify(&token).unwrap().iat, now - IAT_BACKDATE_SECS);
    }

    #[test]
    fn test_reserved_claims_are_owned_by_service() {
        let service = TokenService::new(&config("shhhhh", SigningAlgorithm::HS256));
        let mut input = claims();
        input.insert("iat".into(), Value::from(1));
        input.insert("exp".into(), Value::from(1));

        let verified = service.verify(&service.issue(input).unwrap()).unwrap();
        assert!(verified.iat > 1);
        assert!(verified.exp.is_none());
        assert_eq!(verified.claims, claims());
    }

    #[test]
    fn test_wrong_secret_fails() {
        let issuer = TokenService::new(&config("shhhhh", SigningAlgorithm::HS256));
        let verifier = TokenService::new(&config("other", SigningAlgorithm::HS256));
        let token = issuer.issue(claims()).unwrap();
        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_wrong_algorithm_fails() {
        let issuer = TokenService::new(&config("shhhhh", SigningAlgorithm::HS512));
        let verifier = TokenService::new(&config("shhhhh", SigningAlgorithm::HS256));
        let token = issuer.issue(claims()).unwrap();
        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_token() {
        let mut cfg = config("shhhhh", SigningAlgorithm::HS256);
        cfg.ttl_secs = Some(60);
        let service = TokenService::new(&cfg);

        let long_ago = jsonwebtoken::get_current_timestamp() - 3600;
        let token = service.issue_at(claims(), long_ago).unwrap();
        assert!(matches!(service.verify(&token), Err(TokenError::Expired)));

        let fresh = service.issue(claims()).unwrap();
        assert!(service.verify(&fresh).unwrap().exp.is_some());
    }

    #[test]
    fn test_malformed_and_missing() {
        let service = TokenService::new(&config("shhhhh", SigningAlgorithm::HS256));
        assert!(matches!(service.verify("not.a.token"), Err(TokenError::Invalid(_))));
        assert!(matches!(service.verify(""), Err(TokenError::Missing)));
    }

    #[test]
    fn test_debug_hides_secret() {
        let service = TokenService::new(&config("super-secret", SigningAlgorithm::HS256));
        assert!(!format!("{:?}", service).contains("super-secret"));
    }
}
