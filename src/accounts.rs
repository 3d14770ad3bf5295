//! Account statements of the e-shop's GoPay account

use crate::client::Client;
use crate::error::GopayResult;
use crate::http::{Body, Request};
use crate::payments::error::ValidationError;
use crate::payments::lists::{Currency, Scope, StatementFormat};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

/// Period, currency and file format of a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementRequest {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub currency: Currency,
    pub format: StatementFormat,
}

#[derive(Serialize)]
struct StatementBody {
    date_from: NaiveDate,
    date_to: NaiveDate,
    goid: u64,
    currency: Currency,
    format: StatementFormat,
}

pub struct AccountsService<'a> {
    client: &'a Client,
}

impl<'a> AccountsService<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Download a statement; the gateway returns the file itself
    pub async fn statement(&self, request: &StatementRequest) -> GopayResult<Vec<u8>> {
        if request.date_from > request.date_to {
            return Err(ValidationError::invalid_value(
                "date_from",
                format!("{} is after date_to {}", request.date_from, request.date_to),
            )
            .into());
        }

        info!(
            "Requesting GoPay account statement: {} to {}, currency={}, format={:?}",
            request.date_from, request.date_to, request.currency, request.format
        );
        self.client.authenticate(Scope::PaymentAll).await?;

        let body = StatementBody {
            date_from: request.date_from,
            date_to: request.date_to,
            goid: self.client.goid(),
            currency: request.currency,
            format: request.format,
        };
        let response = self
            .client
            .call(Request::post(
                "/accounts/account-statement",
                Body::Json(serde_json::to_value(&body)?),
            ))
            .await?;

        info!("GoPay account statement received: {} bytes", response.body.len());
        Ok(response.body)
    }
}
