use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

const TEST_BASE_URL: &str = "https://gw.sandbox.gopay.com/api";
const PROD_BASE_URL: &str = "https://gate.gopay.cz/api";

/// Which gateway environment requests go to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum GatewayMode {
    #[default]
    Test,
    Prod,
}

impl GatewayMode {
    pub fn base_url(&self) -> &'static str {
        match self {
            GatewayMode::Test => TEST_BASE_URL,
            GatewayMode::Prod => PROD_BASE_URL,
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "test" => Ok(GatewayMode::Test),
            "prod" | "production" => Ok(GatewayMode::Prod),
            other => Err(anyhow!("GOPAY_MODE must be 'test' or 'prod', got {}", other)),
        }
    }
}

impl TryFrom<String> for GatewayMode {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        GatewayMode::parse(&value)
    }
}

/// Gateway identity and environment
#[derive(Clone, Deserialize)]
pub struct Config {
    pub goid: u64,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub mode: GatewayMode,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Overrides the mode's base URL, used against mock servers
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("goid", &self.goid)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("mode", &self.mode)
            .field("timeout_secs", &self.timeout_secs)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    pub fn new(
        goid: u64,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        mode: GatewayMode,
    ) -> Self {
        Self {
            goid,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            mode,
            timeout_secs: default_timeout_secs(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.mode.base_url())
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn from_env() -> Result<Self> {
        let goid = env::var("GOPAY_GOID")
            .context("GOPAY_GOID not set")?
            .trim()
            .parse()
            .context("GOPAY_GOID must be a valid number")?;

        let mode = match env::var("GOPAY_MODE") {
            Ok(value) => GatewayMode::parse(&value)?,
            Err(_) => GatewayMode::Test,
        };

        let timeout_secs = env::var("GOPAY_TIMEOUT_SECS")
            .unwrap_or_else(|_| default_timeout_secs().to_string())
            .parse()
            .context("GOPAY_TIMEOUT_SECS must be a valid number")?;

        let config = Config {
            goid,
            client_id: env::var("GOPAY_CLIENT_ID").context("GOPAY_CLIENT_ID not set")?,
            client_secret: env::var("GOPAY_CLIENT_SECRET")
                .context("GOPAY_CLIENT_SECRET not set")?,
            mode,
            timeout_secs,
            base_url: env::var("GOPAY_BASE_URL").ok(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from an optional config file, overridden by `GOPAY_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path));
        }

        let config: Config = builder
            .add_source(::config::Environment::with_prefix("GOPAY").try_parsing(true))
            .build()
            .context("Failed to read gateway configuration")?
            .try_deserialize()
            .context("Invalid gateway configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.goid == 0 {
            return Err(anyhow!("GOPAY_GOID must be greater than 0"));
        }

        if self.client_id.trim().is_empty() {
            return Err(anyhow!("GOPAY_CLIENT_ID cannot be empty"));
        }

        if self.client_secret.trim().is_empty() {
            return Err(anyhow!("GOPAY_CLIENT_SECRET cannot be empty"));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow!("GOPAY_TIMEOUT_SECS must be greater than 0"));
        }

        Ok(())
    }
}
