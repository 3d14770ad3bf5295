//! OAuth2 client-credentials authentication against the gateway

pub mod oauth2;

pub use oauth2::Oauth2Client;

use crate::error::GopayResult;
use crate::payments::lists::Scope;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Seconds shaved off the token lifetime so it is renewed before the gateway expires it
const EXPIRY_MARGIN_SECS: u64 = 30;

/// Token response of the gateway's `/oauth2/token` endpoint
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Bearer token held by the client
#[derive(Clone)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub scope: Scope,
    expires_at: Option<Instant>,
}

impl Token {
    pub fn new(response: TokenResponse, scope: Scope) -> Self {
        let expires_at = response.expires_in.map(|secs| {
            Instant::now() + Duration::from_secs(secs.saturating_sub(EXPIRY_MARGIN_SECS))
        });

        Self {
            access_token: response.access_token,
            token_type: response.token_type.unwrap_or_else(|| "bearer".to_string()),
            scope,
            expires_at,
        }
    }

    /// Token supplied by the caller; it is assumed valid for every scope and never expires
    pub fn from_access_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
            scope: Scope::PaymentAll,
            expires_at: None,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|expires_at| Instant::now() >= expires_at)
            .unwrap_or(false)
    }

    /// Usable for `scope` right now
    pub fn is_valid_for(&self, scope: Scope) -> bool {
        !self.is_expired() && self.scope.covers(scope)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"***")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Acquires access tokens
#[async_trait]
pub trait Auth: Send + Sync {
    async fn authenticate(&self, scope: Scope) -> GopayResult<Token>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(expires_in: Option<u64>) -> TokenResponse {
        TokenResponse {
            access_token: "AAArt6RuzM".to_string(),
            token_type: Some("bearer".to_string()),
            expires_in,
            refresh_token: None,
        }
    }

    #[test]
    fn test_token_scope_coverage() {
        let token = Token::new(response(Some(1800)), Scope::PaymentCreate);
        assert!(token.is_valid_for(Scope::PaymentCreate));
        assert!(!token.is_valid_for(Scope::PaymentAll));
    }

    #[test]
    fn test_short_lived_token_is_expired_immediately() {
        let token = Token::new(response(Some(10)), Scope::PaymentAll);
        assert!(token.is_expired());

        let token = Token::new(response(None), Scope::PaymentAll);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_debug_hides_access_token() {
        let token = Token::from_access_token("secret-token");
        assert!(!format!("{:?}", token).contains("secret-token"));
    }
}
