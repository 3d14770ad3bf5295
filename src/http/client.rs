use crate::config::Config;
use crate::error::{GatewayErrorDetail, GopayError, GopayResult};
use crate::http::{Body, Credentials, Http, Method, Request, Response};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    errors: Vec<GatewayErrorDetail>,
}

/// `reqwest`-backed transport bound to one gateway base URL
pub struct HttpClient {
    http_client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(config: &Config) -> GopayResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("gopay-inline/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GopayError::config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "GoPay transport initialized for {:?} mode with URL: {}",
            config.mode,
            config.base_url()
        );

        Ok(Self {
            http_client,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Http for HttpClient {
    async fn send(&self, request: Request) -> GopayResult<Response> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!("{:?} {}", request.method, url);

        let mut builder = match request.method {
            Method::Get => self.http_client.get(&url),
            Method::Post => self.http_client.post(&url),
        }
        .header("Accept", "application/json");

        builder = match request.credentials {
            Credentials::None => builder,
            Credentials::Bearer(token) => builder.bearer_auth(token),
            Credentials::Basic { username, password } => builder.basic_auth(username, Some(password)),
        };

        builder = match request.body {
            Body::Empty => builder,
            Body::Json(body) => builder.json(&body),
            Body::Form(fields) => builder.form(&fields),
        };

        let response = builder.send().await.map_err(|e| {
            error!("GoPay request to {} failed: {}", url, e);
            GopayError::Request(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();
        let data: Option<Value> = if body.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            serde_json::from_slice(&body).ok()
        };

        if let Some(payload) = data.as_ref().filter(|d| d.get("errors").is_some()) {
            let errors = serde_json::from_value::<ErrorPayload>(payload.clone())
                .map(|p| p.errors)
                .unwrap_or_default();
            warn!(
                "GoPay reported {} error(s) for {} (HTTP {})",
                errors.len(),
                request.path,
                status.as_u16()
            );
            return Err(GopayError::gateway(status.as_u16(), errors));
        }

        if !status.is_success() {
            error!("GoPay API error: HTTP {} for {}", status, request.path);
            return Err(GopayError::http(
                status.as_u16(),
                String::from_utf8_lossy(&body).into_owned(),
            ));
        }

        debug!("GoPay responded HTTP {} for {}", status.as_u16(), request.path);
        Ok(Response {
            status: status.as_u16(),
            data,
            body,
        })
    }
}
