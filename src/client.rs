use crate::accounts::AccountsService;
use crate::auth::{Auth, Oauth2Client, Token};
use crate::config::Config;
use crate::error::{GopayError, GopayResult};
use crate::http::{Credentials, Http, HttpClient, Request, Response};
use crate::payments::lists::Scope;
use crate::payments::service::PaymentsService;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Entry point for talking to the gateway
///
/// Holds the configuration, the transport, the authenticator and the cached
/// access token. Everything is passed in explicitly; there is no global mode.
pub struct Client {
    config: Config,
    http: Arc<dyn Http>,
    auth: Option<Arc<dyn Auth>>,
    token: RwLock<Option<Token>>,
}

impl Client {
    pub fn new(config: Config) -> GopayResult<Self> {
        config
            .validate()
            .map_err(|e| GopayError::config(e.to_string()))?;

        let http = HttpClient::new(&config)?;

        info!(
            "GoPay client initialized: goid={}, mode={:?}",
            config.goid, config.mode
        );

        Ok(Self {
            config,
            http: Arc::new(http),
            auth: None,
            token: RwLock::new(None),
        })
    }

    /// Replace the transport
    pub fn with_http(mut self, http: Arc<dyn Http>) -> Self {
        self.http = http;
        self
    }

    /// Replace the authenticator; by default an [`Oauth2Client`] over the current transport is used
    pub fn with_auth(mut self, auth: Arc<dyn Auth>) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn goid(&self) -> u64 {
        self.config.goid
    }

    pub fn client_id(&self) -> &str {
        &self.config.client_id
    }

    fn auth(&self) -> Arc<dyn Auth> {
        match &self.auth {
            Some(auth) => Arc::clone(auth),
            None => Arc::new(Oauth2Client::new(
                self.config.client_id.clone(),
                self.config.client_secret.clone(),
                Arc::clone(&self.http),
            )),
        }
    }

    /// Return an access token valid for `scope`, fetching one only when needed
    pub async fn authenticate(&self, scope: Scope) -> GopayResult<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.is_valid_for(scope) {
                debug!("Reusing cached GoPay token: scope={}", token.scope);
                return Ok(token.access_token.clone());
            }
        }

        let mut guard = self.token.write().await;
        if let Some(token) = guard.as_ref() {
            if token.is_valid_for(scope) {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.auth().authenticate(scope).await?;
        let access_token = token.access_token.clone();
        *guard = Some(token);
        Ok(access_token)
    }

    /// Use a token obtained elsewhere
    pub async fn set_token(&self, access_token: impl Into<String>) {
        *self.token.write().await = Some(Token::from_access_token(access_token));
    }

    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    pub async fn token(&self) -> Option<Token> {
        self.token.read().await.clone()
    }

    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    /// Send an authorized request; fails when no token has been obtained
    pub async fn call(&self, request: Request) -> GopayResult<Response> {
        let access_token = match self.token.read().await.as_ref() {
            Some(token) => token.access_token.clone(),
            None => return Err(GopayError::MissingToken),
        };

        self.http
            .send(request.with_credentials(Credentials::Bearer(access_token)))
            .await
    }

    pub fn payments(&self) -> PaymentsService<'_> {
        PaymentsService::new(self)
    }

    pub fn accounts(&self) -> AccountsService<'_> {
        AccountsService::new(self)
    }
}
