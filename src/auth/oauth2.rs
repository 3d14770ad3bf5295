use crate::auth::{Auth, Token, TokenResponse};
use crate::error::{GopayError, GopayResult};
use crate::http::{Body, Credentials, Http, Request};
use crate::payments::lists::Scope;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

/// Client-credentials grant against `/oauth2/token`
pub struct Oauth2Client {
    client_id: String,
    client_secret: String,
    http: Arc<dyn Http>,
}

impl Oauth2Client {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        http: Arc<dyn Http>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            http,
        }
    }
}

#[async_trait]
impl Auth for Oauth2Client {
    async fn authenticate(&self, scope: Scope) -> GopayResult<Token> {
        info!("Requesting GoPay access token: scope={}", scope);

        let request = Request::post(
            "/oauth2/token",
            Body::Form(vec![
                ("grant_type".to_string(), "client_credentials".to_string()),
                ("scope".to_string(), scope.as_str().to_string()),
            ]),
        )
        .with_credentials(Credentials::Basic {
            username: self.client_id.clone(),
            password: self.client_secret.clone(),
        });

        let response = self.http.send(request).await.map_err(|e| match e {
            GopayError::Gateway { .. } | GopayError::Http { .. } => {
                error!("GoPay authentication rejected: {}", e);
                GopayError::auth(e.to_string())
            }
            other => other,
        })?;

        let token: TokenResponse = response
            .json()
            .map_err(|e| GopayError::auth(format!("Token for given credentials does not work: {}", e)))?;

        info!(
            "GoPay access token acquired: scope={}, expires_in={:?}",
            scope, token.expires_in
        );
        Ok(Token::new(token, scope))
    }
}
