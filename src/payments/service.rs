//! Payment endpoints of the gateway
//!
//! Requests sent from here are already validated by the factories; this layer
//! only fills in the default target, authenticates and dispatches.

use crate::client::Client;
use crate::error::GopayResult;
use crate::http::{Body, Request};
use crate::payments::lists::{Currency, Scope};
use crate::payments::types::{
    OperationResponse, Payment, PaymentResponse, RecurrentPayment, RecurringPayment, Target,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;

pub struct PaymentsService<'a> {
    client: &'a Client,
}

impl<'a> PaymentsService<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create a one-off payment
    pub async fn create_payment(&self, mut payment: Payment) -> GopayResult<PaymentResponse> {
        self.fill_target(&mut payment);
        info!(
            "Creating GoPay payment: order_number={}, amount={}",
            payment.order_number, payment.amount
        );
        self.create(serde_json::to_value(&payment)?).await
    }

    /// Create a payment that sets up a recurrence
    pub async fn create_recurrent_payment(
        &self,
        mut payment: RecurrentPayment,
    ) -> GopayResult<PaymentResponse> {
        self.fill_target(&mut payment.payment);
        info!(
            "Creating GoPay recurrent payment: order_number={}, amount={}",
            payment.payment.order_number, payment.payment.amount
        );
        self.create(serde_json::to_value(&payment)?).await
    }

    /// Charge an existing on-demand recurrence
    pub async fn create_recurring_payment(
        &self,
        parent_id: u64,
        payment: RecurringPayment,
    ) -> GopayResult<PaymentResponse> {
        info!(
            "Creating GoPay recurring payment: parent_id={}, order_number={}",
            parent_id, payment.order_number
        );
        self.client.authenticate(Scope::PaymentAll).await?;
        let request = Request::post(
            format!("/payments/payment/{}/create-recurrence", parent_id),
            Body::Json(serde_json::to_value(&payment)?),
        );
        self.client.call(request).await?.json()
    }

    /// Look up the current state of a payment
    pub async fn verify(&self, id: u64) -> GopayResult<PaymentResponse> {
        info!("Verifying GoPay payment: id={}", id);
        self.client.authenticate(Scope::PaymentAll).await?;
        self.client
            .call(Request::get(format!("/payments/payment/{}", id)))
            .await?
            .json()
    }

    /// Refund `amount` (minor units) of a paid payment
    pub async fn refund(&self, id: u64, amount: Decimal) -> GopayResult<OperationResponse> {
        info!("Refunding GoPay payment: id={}, amount={}", id, amount);
        self.client.authenticate(Scope::PaymentAll).await?;

        let request = Request::post(
            format!("/payments/payment/{}/refund", id),
            Body::Form(vec![("amount".to_string(), amount.normalize().to_string())]),
        );
        self.client.call(request).await?.json()
    }

    /// Stop an active recurrence
    pub async fn void_recurrence(&self, id: u64) -> GopayResult<OperationResponse> {
        info!("Voiding GoPay recurrence: id={}", id);
        self.client.authenticate(Scope::PaymentAll).await?;
        self.client
            .call(Request::post(
                format!("/payments/payment/{}/void-recurrence", id),
                Body::Empty,
            ))
            .await?
            .json()
    }

    /// Payment instruments enabled for this e-shop in `currency`
    pub async fn payment_instruments(&self, currency: Currency) -> GopayResult<Value> {
        self.client.authenticate(Scope::PaymentCreate).await?;
        self.client
            .call(Request::get(format!(
                "/eshops/eshop/{}/payment-instruments/{}",
                self.client.goid(),
                currency
            )))
            .await?
            .json()
    }

    fn fill_target(&self, payment: &mut Payment) {
        if payment.target.is_none() {
            payment.target = Some(Target::account(self.client.goid()));
        }
    }

    async fn create(&self, body: Value) -> GopayResult<PaymentResponse> {
        self.client.authenticate(Scope::PaymentCreate).await?;
        let response: PaymentResponse = self
            .client
            .call(Request::post("/payments/payment", Body::Json(body)))
            .await?
            .json()?;

        info!(
            "GoPay payment created: id={}, state={:?}",
            response.id, response.state
        );
        Ok(response)
    }
}
