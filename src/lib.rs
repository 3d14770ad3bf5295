//! GoPay payment gateway client
//!
//! Builds and validates payment requests from loosely-typed input, manages the
//! OAuth2 access token and sends the requests to the gateway.
//!
//! ```no_run
//! use gopay_inline::{Client, Config, GatewayMode};
//! use gopay_inline::payments::{RecurrentPaymentFactory, Validators};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), gopay_inline::GopayError> {
//! let client = Client::new(Config::new(8123456789, "client-id", "secret", GatewayMode::Test))?;
//! let payment = RecurrentPaymentFactory::create(
//!     &json!({
//!         "amount": 1000,
//!         "currency": "CZK",
//!         "order_number": "001",
//!         "order_description": "subscription",
//!         "items": [{"name": "Monthly plan", "amount": 1000, "count": 1}],
//!         "recurrence": {"recurrence_cycle": "MONTH", "recurrence_period": 1, "recurrence_date_to": "2030-12-31"},
//!         "return_url": "https://eshop.example/return",
//!         "notify_url": "https://eshop.example/notify",
//!     }),
//!     Validators::default(),
//! )?;
//! let created = client.payments().create_recurrent_payment(payment).await?;
//! println!("redirect to {:?}", created.gw_url);
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod payments;

pub use client::Client;
pub use config::{Config, GatewayMode};
pub use error::{GatewayErrorDetail, GopayError, GopayResult};
