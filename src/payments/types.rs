//! Typed payment request object graph
//!
//! These structures serialize to the gateway's JSON payment-creation schema.
//! They are produced by the factories in [`crate::payments::factory`] and are
//! not validated again once built.

use crate::payments::error::{ValidationError, ValidationResult};
use crate::payments::lists::{
    Currency, ItemType, PaymentInstrument, RecurrenceCycle, TargetType,
};
use crate::payments::money::{serialize_amount, serialize_optional_amount};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const AMOUNT_OVERFLOW: &str = "amount overflow";

/// One order line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unit price in minor units
    #[serde(serialize_with = "serialize_amount")]
    pub amount: Decimal,
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            name: None,
            amount: Decimal::ZERO,
            count: 1,
            vat_rate: None,
            item_type: None,
        }
    }
}

impl Item {
    /// Unit price multiplied by quantity, `None` on overflow
    pub fn total(&self) -> Option<Decimal> {
        self.amount.checked_mul(Decimal::from(self.count))
    }
}

/// Sum of price times count over `items`
fn sum_items(items: &[Item]) -> ValidationResult<Decimal> {
    items
        .iter()
        .enumerate()
        .try_fold(Decimal::ZERO, |acc, (index, item)| {
            item.total()
                .and_then(|total| acc.checked_add(total))
                .ok_or_else(|| {
                    ValidationError::invalid_value(format!("items[{}].amount", index), AMOUNT_OVERFLOW)
                })
        })
}

/// Payer contact details
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

/// Payment methods offered to the payer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Payer {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_payment_instruments: Vec<PaymentInstrument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_payment_instrument: Option<PaymentInstrument>,
    /// Bank transfer SWIFT codes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_swifts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_swift: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
}

/// Receiving side of the payment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Target {
    #[serde(rename = "type")]
    pub target_type: TargetType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goid: Option<u64>,
}

impl Target {
    pub fn account(goid: u64) -> Self {
        Self {
            target_type: TargetType::Account,
            goid: Some(goid),
        }
    }
}

/// Schedule of a recurrent payment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Recurrence {
    #[serde(rename = "recurrence_cycle", skip_serializing_if = "Option::is_none")]
    pub cycle: Option<RecurrenceCycle>,
    #[serde(rename = "recurrence_period", skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(rename = "recurrence_date_to", skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

/// Free-form name/value pair echoed back by the gateway
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Czech electronic sales registration (EET) record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Eet {
    #[serde(rename = "mena", skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(
        rename = "celk_trzba",
        serialize_with = "serialize_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub sum: Option<Decimal>,
    #[serde(
        rename = "zakl_dan1",
        serialize_with = "serialize_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_base: Option<Decimal>,
    #[serde(
        rename = "zakl_nepodl_dph",
        serialize_with = "serialize_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_base_no_vat: Option<Decimal>,
    #[serde(
        rename = "dan1",
        serialize_with = "serialize_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax: Option<Decimal>,
    #[serde(
        rename = "zakl_dan2",
        serialize_with = "serialize_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_base_reduced_rate_first: Option<Decimal>,
    #[serde(
        rename = "dan2",
        serialize_with = "serialize_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_reduced_rate_first: Option<Decimal>,
    #[serde(
        rename = "zakl_dan3",
        serialize_with = "serialize_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_base_reduced_rate_second: Option<Decimal>,
    #[serde(
        rename = "dan3",
        serialize_with = "serialize_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_reduced_rate_second: Option<Decimal>,
}

impl Eet {
    /// Sum of every tax base and tax component, missing ones counting as zero
    pub fn component_sum(&self) -> ValidationResult<Decimal> {
        [
            self.tax,
            self.tax_base_no_vat,
            self.tax_base,
            self.tax_base_reduced_rate_first,
            self.tax_reduced_rate_first,
            self.tax_base_reduced_rate_second,
            self.tax_reduced_rate_second,
        ]
        .into_iter()
        .flatten()
        .try_fold(Decimal::ZERO, |acc, component| acc.checked_add(component))
        .ok_or_else(|| ValidationError::invalid_value("eet", AMOUNT_OVERFLOW))
    }

    /// Declared total, zero when absent
    pub fn declared_sum(&self) -> Decimal {
        self.sum.unwrap_or_default()
    }
}

/// Where the payer is sent after paying and where the gateway posts status changes
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Callback {
    pub return_url: String,
    pub notification_url: String,
}

/// One-off payment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Payment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<Payer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    /// Order total in minor units
    #[serde(serialize_with = "serialize_amount")]
    pub amount: Decimal,
    pub currency: Option<Currency>,
    pub order_number: String,
    pub order_description: String,
    pub items: Vec<Item>,
    pub callback: Callback,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_params: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eet: Option<Eet>,
}

impl Payment {
    /// Sum of every item's price times count
    pub fn items_price(&self) -> ValidationResult<Decimal> {
        sum_items(&self.items)
    }
}

/// Payment that sets up a recurrence on top of the first charge
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecurrentPayment {
    #[serde(flatten)]
    pub payment: Payment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

/// Follow-up charge on an existing on-demand recurrence
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecurringPayment {
    #[serde(serialize_with = "serialize_amount")]
    pub amount: Decimal,
    pub currency: Option<Currency>,
    pub order_number: String,
    pub order_description: String,
    pub items: Vec<Item>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_params: Vec<Parameter>,
}

impl RecurringPayment {
    pub fn items_price(&self) -> ValidationResult<Decimal> {
        sum_items(&self.items)
    }
}

/// Lifecycle state reported by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    Created,
    PaymentMethodChosen,
    Paid,
    Authorized,
    Canceled,
    Timeouted,
    Refunded,
    PartiallyRefunded,
    #[serde(other)]
    Unknown,
}

/// Payment as returned by the gateway after creation or lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: u64,
    #[serde(default)]
    pub order_number: Option<String>,
    pub state: PaymentState,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Gateway URL the payer is redirected to
    #[serde(default)]
    pub gw_url: Option<String>,
    #[serde(default)]
    pub additional_params: Vec<Parameter>,
}

/// Result of a refund or recurrence void call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResponse {
    pub id: u64,
    pub result: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_item_defaults() {
        let item = Item::default();
        assert_eq!(item.count, 1);
        assert_eq!(item.amount, Decimal::ZERO);
        assert_eq!(item.total(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_eet_component_sum_treats_missing_as_zero() {
        let eet = Eet {
            sum: Some(dec!(121)),
            tax_base: Some(dec!(100)),
            tax: Some(dec!(21)),
            ..Default::default()
        };
        assert_eq!(eet.component_sum(), Ok(dec!(121)));
        assert_eq!(Eet::default().declared_sum(), Decimal::ZERO);
    }

    #[test]
    fn test_target_serializes_with_default_type() {
        let target = Target {
            goid: Some(8123456789),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&target).unwrap(),
            json!({"type": "ACCOUNT", "goid": 8123456789u64})
        );
    }

    #[test]
    fn test_recurrent_payment_flattens_payment_fields() {
        let payment = RecurrentPayment {
            payment: Payment {
                amount: dec!(1000),
                currency: Some(Currency::CZK),
                order_number: "001".into(),
                order_description: "pojisteni01".into(),
                items: vec![Item {
                    name: Some("item01".into()),
                    amount: dec!(1000),
                    ..Default::default()
                }],
                callback: Callback {
                    return_url: "https://eshop.example/return".into(),
                    notification_url: "https://eshop.example/notify".into(),
                },
                ..Default::default()
            },
            recurrence: Some(Recurrence {
                cycle: Some(RecurrenceCycle::Month),
                period: Some(1),
                date_to: NaiveDate::from_ymd_opt(2030, 12, 31),
            }),
        };

        let value = serde_json::to_value(&payment).unwrap();
        assert_eq!(value["amount"], json!(1000));
        assert_eq!(value["items"][0], json!({"name": "item01", "amount": 1000, "count": 1}));
        assert_eq!(value["callback"]["notification_url"], "https://eshop.example/notify");
        assert_eq!(
            value["recurrence"],
            json!({
                "recurrence_cycle": "MONTH",
                "recurrence_period": 1,
                "recurrence_date_to": "2030-12-31"
            })
        );
        assert!(value.get("payer").is_none());
        assert!(value.get("additional_params").is_none());
    }

    #[test]
    fn test_payment_state_tolerates_unknown_values() {
        let response: PaymentResponse = serde_json::from_value(json!({
            "id": 3000006529u64,
            "state": "SOMETHING_NEW",
        }))
        .unwrap();
        assert_eq!(response.state, PaymentState::Unknown);
    }
}
