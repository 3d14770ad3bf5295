//! Closed enumerations understood by the gateway
//!
//! Each list serializes to the exact string the gateway expects and
//! deserializes from the same string, so the field mapper can read them
//! straight out of the untyped input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Czech crowns
    CZK,
    /// Euros
    EUR,
    /// Polish zloty
    PLN,
    /// US dollars
    USD,
    /// Pound sterling
    GBP,
    /// Hungarian forint
    HUF,
    /// Romanian leu
    RON,
    /// Bulgarian lev
    BGN,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::CZK => "CZK",
            Currency::EUR => "EUR",
            Currency::PLN => "PLN",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
            Currency::HUF => "HUF",
            Currency::RON => "RON",
            Currency::BGN => "BGN",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often a recurrent payment repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceCycle {
    /// Daily recurring
    Day,
    /// Weekly recurring
    Week,
    /// Monthly recurring
    Month,
    /// Only for manually triggered recurring payments
    OnDemand,
}

/// Kind of an order line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    /// Goods or a service
    #[default]
    Item,
    /// Shipping
    Delivery,
    /// Discount, carries a negative amount
    Discount,
}

/// Where the money goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    #[default]
    Account,
}

/// Payment methods a payer may be offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentInstrument {
    PaymentCard,
    BankAccount,
    Prsms,
    Mpayment,
    Paysafecard,
    Supercash,
    Gopay,
    Paypal,
    Bitcoin,
    Gpay,
    ApplePay,
}

/// File format of an account statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementFormat {
    XlsA,
    XlsB,
    XlsC,
    CsvA,
    CsvB,
    CsvC,
    CsvD,
    AboA,
    AboB,
}

/// OAuth2 scope requested when authenticating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Allows only the establishment of payments
    #[serde(rename = "payment-create")]
    PaymentCreate,
    /// Allows all operations above payments
    #[serde(rename = "payment-all")]
    PaymentAll,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::PaymentCreate => "payment-create",
            Scope::PaymentAll => "payment-all",
        }
    }

    /// Whether a token issued for `self` can be used for `other`
    pub fn covers(&self, other: Scope) -> bool {
        matches!((self, other), (Scope::PaymentAll, _) | (Scope::PaymentCreate, Scope::PaymentCreate))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
