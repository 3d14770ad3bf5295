//! Payment request factories
//!
//! Each factory takes the untyped input a caller collected (usually straight
//! from a form or a JSON body), checks its key set, builds the typed object
//! graph and reconciles the declared totals. The first violation aborts the
//! whole construction; nothing partially built is returned.

use crate::payments::error::{EetMismatchKind, ValidationError, ValidationResult};
use crate::payments::mapper::{field, map_fields, nested_list, nested_object, Field};
use crate::payments::money::{eq_at_precision, EET_PRECISION};
use crate::payments::types::{
    Contact, Eet, Item, Parameter, Payer, Payment, Recurrence, RecurrentPayment,
    RecurringPayment, Target,
};
use crate::payments::validator::{validate_optional, validate_required, Validators};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

const PAYMENT_FIELDS: &[Field<Payment>] = &[
    field!("amount" => amount),
    field!("currency" => currency),
    field!("order_number" => order_number),
    field!("order_description" => order_description),
    field!("return_url" => callback.return_url),
    field!("notify_url" => callback.notification_url),
];

const RECURRING_FIELDS: &[Field<RecurringPayment>] = &[
    field!("amount" => amount),
    field!("currency" => currency),
    field!("order_number" => order_number),
    field!("order_description" => order_description),
];

const LANG_FIELDS: &[Field<Payment>] = &[field!("lang" => lang)];

const PAYER_FIELDS: &[Field<Payer>] = &[
    field!("allowed_payment_instruments" => allowed_payment_instruments),
    field!("default_payment_instrument" => default_payment_instrument),
    field!("allowed_swifts" => allowed_swifts),
    field!("default_swift" => default_swift),
];

const CONTACT_FIELDS: &[Field<Contact>] = &[
    field!("first_name" => first_name),
    field!("last_name" => last_name),
    field!("email" => email),
    field!("phone_number" => phone_number),
    field!("city" => city),
    field!("street" => street),
    field!("postal_code" => postal_code),
    field!("country_code" => country_code),
];

const TARGET_FIELDS: &[Field<Target>] = &[field!("type" => target_type), field!("goid" => goid)];

const ITEM_FIELDS: &[Field<Item>] = &[
    field!("name" => name),
    field!("amount" => amount),
    field!("count" => count),
    field!("vat_rate" => vat_rate),
    field!("type" => item_type),
];

const RECURRENCE_FIELDS: &[Field<Recurrence>] = &[
    field!("recurrence_cycle" => cycle),
    field!("recurrence_period" => period),
    field!("recurrence_date_to" => date_to),
];

const PARAMETER_FIELDS: &[Field<Parameter>] =
    &[field!("name" => name), field!("value" => value)];

const EET_FIELDS: &[Field<Eet>] = &[
    field!("mena" => currency),
    field!("celk_trzba" => sum),
    field!("zakl_dan1" => tax_base),
    field!("zakl_nepodl_dph" => tax_base_no_vat),
    field!("dan1" => tax),
    field!("zakl_dan2" => tax_base_reduced_rate_first),
    field!("dan2" => tax_reduced_rate_first),
    field!("zakl_dan3" => tax_base_reduced_rate_second),
    field!("dan3" => tax_reduced_rate_second),
];

/// Builds one-off [`Payment`]s
pub struct PaymentFactory;

impl PaymentFactory {
    pub const REQUIRED: &'static [&'static str] = &[
        "amount",
        "currency",
        "order_number",
        "order_description",
        "items",
        "return_url",
        "notify_url",
    ];

    pub const OPTIONAL: &'static [&'static str] =
        &["target", "payer", "additional_params", "lang", "eet"];

    pub fn create(data: &Value, validators: Validators) -> ValidationResult<Payment> {
        let data = check_keys("payment", data, Self::REQUIRED, Self::OPTIONAL, validators)?;

        let result = build_payment_head(data, validators)
            .and_then(|payment| build_payment_tail(payment, data))
            .and_then(|payment| {
                check_prices(&payment, validators)?;
                Ok(payment)
            });

        log_outcome("payment", &result);
        result
    }
}

/// Builds [`RecurrentPayment`]s: a first charge that sets up a recurrence
pub struct RecurrentPaymentFactory;

impl RecurrentPaymentFactory {
    pub const REQUIRED: &'static [&'static str] = &[
        "amount",
        "currency",
        "order_number",
        "order_description",
        "items",
        "recurrence",
        "return_url",
        "notify_url",
    ];

    pub const OPTIONAL: &'static [&'static str] = PaymentFactory::OPTIONAL;

    pub fn create(data: &Value, validators: Validators) -> ValidationResult<RecurrentPayment> {
        let data = check_keys(
            "recurrent payment",
            data,
            Self::REQUIRED,
            Self::OPTIONAL,
            validators,
        )?;

        let result = build_recurrent(data, validators);
        log_outcome("recurrent payment", &result);
        result
    }
}

fn build_recurrent(
    data: &Map<String, Value>,
    validators: Validators,
) -> ValidationResult<RecurrentPayment> {
    let payment = build_payment_head(data, validators)?;

    let recurrence = nested_object(data, "recurrence", "")?
        .map(|block| map_fields(Recurrence::default(), RECURRENCE_FIELDS, block, "recurrence"))
        .transpose()?;

    let payment = build_payment_tail(payment, data)?;
    check_prices(&payment, validators)?;

    Ok(RecurrentPayment {
        payment,
        recurrence,
    })
}

/// Builds [`RecurringPayment`]s: follow-up charges on an on-demand recurrence
pub struct RecurringPaymentFactory;

impl RecurringPaymentFactory {
    pub const REQUIRED: &'static [&'static str] = &[
        "amount",
        "currency",
        "order_number",
        "order_description",
        "items",
    ];

    pub const OPTIONAL: &'static [&'static str] = &["additional_params"];

    pub fn create(data: &Value, validators: Validators) -> ValidationResult<RecurringPayment> {
        let data = check_keys(
            "recurring payment",
            data,
            Self::REQUIRED,
            Self::OPTIONAL,
            validators,
        )?;

        let result = build_recurring(data, validators);
        log_outcome("recurring payment", &result);
        result
    }
}

fn build_recurring(
    data: &Map<String, Value>,
    validators: Validators,
) -> ValidationResult<RecurringPayment> {
    let mut payment = map_fields(RecurringPayment::default(), RECURRING_FIELDS, data, "")?;
    payment.items = build_items(data, validators)?;
    payment.additional_params = build_parameters(data)?;

    if validators.enforce_prices {
        check_items_price(payment.amount, payment.items_price()?)?;
    }

    Ok(payment)
}

/// Which factory to run for a given input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentVariant {
    Payment,
    Recurrent,
    Recurring,
}

/// A built request of any variant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PaymentRequest {
    Payment(Payment),
    Recurrent(RecurrentPayment),
    Recurring(RecurringPayment),
}

impl PaymentVariant {
    pub fn create(self, data: &Value, validators: Validators) -> ValidationResult<PaymentRequest> {
        match self {
            PaymentVariant::Payment => {
                PaymentFactory::create(data, validators).map(PaymentRequest::Payment)
            }
            PaymentVariant::Recurrent => {
                RecurrentPaymentFactory::create(data, validators).map(PaymentRequest::Recurrent)
            }
            PaymentVariant::Recurring => {
                RecurringPaymentFactory::create(data, validators).map(PaymentRequest::Recurring)
            }
        }
    }
}

/// Coerce the input to an object and run both key-set checks
fn check_keys<'a>(
    kind: &str,
    data: &'a Value,
    required: &[&str],
    optional: &[&str],
    validators: Validators,
) -> ValidationResult<&'a Map<String, Value>> {
    let data = data.as_object().ok_or_else(|| {
        ValidationError::invalid_input(format!("{} data must be a JSON object", kind))
    })?;

    debug!(
        "Validating {} keys: {} present, scheme={}, prices={}",
        kind,
        data.len(),
        validators.enforce_scheme,
        validators.enforce_prices
    );

    if let Err(missing) = validate_required(data, required) {
        warn!("Rejected {}: missing keys {:?}", kind, missing);
        return Err(ValidationError::missing_fields(missing));
    }

    if validators.enforce_scheme {
        let allowed: Vec<&str> = required.iter().chain(optional).copied().collect();
        if let Err(extra) = validate_optional(data, &allowed) {
            warn!("Rejected {}: not allowed keys {:?}", kind, extra);
            return Err(ValidationError::unexpected_fields(extra));
        }
    }

    Ok(data)
}

/// Payer, target, base scalars and items
fn build_payment_head(
    data: &Map<String, Value>,
    validators: Validators,
) -> ValidationResult<Payment> {
    let mut payment = Payment {
        payer: build_payer(data)?,
        ..Default::default()
    };

    payment.target = nested_object(data, "target", "")?
        .map(|block| map_fields(Target::default(), TARGET_FIELDS, block, "target"))
        .transpose()?;

    let mut payment = map_fields(payment, PAYMENT_FIELDS, data, "")?;
    payment.items = build_items(data, validators)?;

    Ok(payment)
}

/// Additional params, language and EET
fn build_payment_tail(payment: Payment, data: &Map<String, Value>) -> ValidationResult<Payment> {
    let mut payment = Payment {
        additional_params: build_parameters(data)?,
        ..payment
    };

    payment = map_fields(payment, LANG_FIELDS, data, "")?;

    payment.eet = nested_object(data, "eet", "")?
        .map(|block| map_fields(Eet::default(), EET_FIELDS, block, "eet"))
        .transpose()?;

    Ok(payment)
}

fn build_payer(data: &Map<String, Value>) -> ValidationResult<Option<Payer>> {
    let Some(block) = nested_object(data, "payer", "")? else {
        return Ok(None);
    };

    let mut payer = map_fields(Payer::default(), PAYER_FIELDS, block, "payer")?;
    payer.contact = nested_object(block, "contact", "payer")?
        .map(|contact| map_fields(Contact::default(), CONTACT_FIELDS, contact, "payer.contact"))
        .transpose()?;

    Ok(Some(payer))
}

fn build_items(data: &Map<String, Value>, validators: Validators) -> ValidationResult<Vec<Item>> {
    nested_list(data, "items", "")?
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            if validators.enforce_scheme && !has_name(entry) {
                return Err(ValidationError::invalid_item(index));
            }
            map_fields(Item::default(), ITEM_FIELDS, entry, &format!("items[{}]", index))
        })
        .collect()
}

fn has_name(entry: &Map<String, Value>) -> bool {
    match entry.get("name") {
        None | Some(Value::Null) => false,
        Some(Value::String(name)) => !name.is_empty(),
        Some(Value::Bool(flag)) => *flag,
        Some(_) => true,
    }
}

fn build_parameters(data: &Map<String, Value>) -> ValidationResult<Vec<Parameter>> {
    nested_list(data, "additional_params", "")?
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            map_fields(
                Parameter::default(),
                PARAMETER_FIELDS,
                entry,
                &format!("additional_params[{}]", index),
            )
        })
        .collect()
}

fn check_prices(payment: &Payment, validators: Validators) -> ValidationResult<()> {
    if !validators.enforce_prices {
        return Ok(());
    }

    check_items_price(payment.amount, payment.items_price()?)?;
    if let Some(eet) = &payment.eet {
        check_eet(eet, payment.amount)?;
    }

    Ok(())
}

/// Declared order total must equal the sum of item price times count
pub fn check_items_price(order_price: Decimal, items_price: Decimal) -> ValidationResult<()> {
    if items_price != order_price {
        return Err(ValidationError::price_mismatch(order_price, items_price));
    }
    Ok(())
}

/// EET sum must equal both its tax components and the order total
pub fn check_eet(eet: &Eet, order_price: Decimal) -> ValidationResult<()> {
    let eet_sum = eet.declared_sum();
    let eet_total = eet.component_sum()?;

    if !eq_at_precision(eet_sum, eet_total, EET_PRECISION) {
        return Err(ValidationError::eet_mismatch(
            EetMismatchKind::TaxSum,
            eet_sum,
            eet_total,
        ));
    }

    if !eq_at_precision(eet_sum, order_price, EET_PRECISION) {
        return Err(ValidationError::eet_mismatch(
            EetMismatchKind::OrderSum,
            eet_sum,
            order_price,
        ));
    }

    Ok(())
}

fn log_outcome<T>(kind: &str, result: &ValidationResult<T>) {
    match result {
        Ok(_) => debug!("Built {}", kind),
        Err(e) => warn!("Rejected {}: {}", kind, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::lists::{Currency, ItemType, PaymentInstrument, RecurrenceCycle, TargetType};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn recurrent_input() -> Value {
        json!({
            "amount": 1500,
            "currency": "CZK",
            "order_number": "001",
            "order_description": "subscription",
            "items": [
                {"name": "Monthly plan", "amount": 1000, "count": 1, "vat_rate": 21, "type": "ITEM"},
                {"name": "Add-on", "amount": 250, "count": 2},
            ],
            "recurrence": {
                "recurrence_cycle": "MONTH",
                "recurrence_period": 1,
                "recurrence_date_to": "2030-12-31",
            },
            "return_url": "https://eshop.example/return",
            "notify_url": "https://eshop.example/notify",
        })
    }

    #[test]
    fn test_builds_full_recurrent_graph() {
        let mut data = recurrent_input();
        data["payer"] = json!({
            "allowed_payment_instruments": ["PAYMENT_CARD", "BANK_ACCOUNT"],
            "default_payment_instrument": "PAYMENT_CARD",
            "allowed_swifts": ["FIOBCZPP"],
            "contact": {"first_name": "Jana", "email": "jana@example.com", "country_code": "CZE"},
        });
        data["additional_params"] = json!([
            {"name": "invoice", "value": "2024-01"},
            {"name": "customer", "value": 42},
        ]);
        data["lang"] = json!("CS");

        let payment = RecurrentPaymentFactory::create(&data, Validators::default()).unwrap();

        assert_eq!(payment.payment.amount, dec!(1500));
        assert_eq!(payment.payment.currency, Some(Currency::CZK));
        assert_eq!(payment.payment.callback.notification_url, "https://eshop.example/notify");
        assert_eq!(payment.payment.items.len(), 2);
        assert_eq!(payment.payment.items[0].item_type, Some(ItemType::Item));
        assert_eq!(payment.payment.items[0].vat_rate, Some(21));
        assert_eq!(payment.payment.items[1].count, 2);
        assert_eq!(payment.payment.lang.as_deref(), Some("CS"));
        assert!(payment.payment.target.is_none());

        let payer = payment.payment.payer.unwrap();
        assert_eq!(
            payer.allowed_payment_instruments,
            vec![PaymentInstrument::PaymentCard, PaymentInstrument::BankAccount]
        );
        assert_eq!(payer.default_swift, None);
        let contact = payer.contact.unwrap();
        assert_eq!(contact.first_name.as_deref(), Some("Jana"));
        assert_eq!(contact.last_name, None);

        let names: Vec<_> = payment
            .payment
            .additional_params
            .iter()
            .map(|p| p.name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["invoice", "customer"]);

        let recurrence = payment.recurrence.unwrap();
        assert_eq!(recurrence.cycle, Some(RecurrenceCycle::Month));
        assert_eq!(recurrence.period, Some(1));
    }

    #[test]
    fn test_target_type_defaults_to_account() {
        let mut data = recurrent_input();
        data["target"] = json!({"goid": 8123456789u64});

        let payment = RecurrentPaymentFactory::create(&data, Validators::default()).unwrap();
        let target = payment.payment.target.unwrap();
        assert_eq!(target.target_type, TargetType::Account);
        assert_eq!(target.goid, Some(8123456789));
    }

    #[test]
    fn test_payer_without_contact_leaves_contact_empty() {
        let mut data = recurrent_input();
        data["payer"] = json!({"default_swift": "GIBACZPX"});

        let payment = RecurrentPaymentFactory::create(&data, Validators::default()).unwrap();
        let payer = payment.payment.payer.unwrap();
        assert_eq!(payer.default_swift.as_deref(), Some("GIBACZPX"));
        assert!(payer.contact.is_none());
    }

    #[test]
    fn test_item_name_checked_before_item_is_mapped() {
        let mut data = recurrent_input();
        data["items"] = json!([
            {"name": "ok", "amount": 1500, "count": 1},
            {"name": "", "amount": "not a number"},
        ]);

        let err = RecurrentPaymentFactory::create(&data, Validators::default()).unwrap_err();
        assert_eq!(err, ValidationError::InvalidItem { index: 1 });
    }

    #[test]
    fn test_has_name_rejects_only_empty_or_missing_names() {
        let entry = |value: Value| json!({"name": value}).as_object().cloned().unwrap();

        assert!(has_name(&entry(json!("0"))));
        assert!(has_name(&entry(json!(0))));
        assert!(has_name(&entry(json!(true))));
        assert!(!has_name(&entry(json!(""))));
        assert!(!has_name(&entry(json!(false))));
        assert!(!has_name(&entry(Value::Null)));
        assert!(!has_name(&Map::new()));
    }

    #[test]
    fn test_recurring_payment_ignores_recurrent_only_blocks() {
        let data = json!({
            "amount": 300,
            "currency": "EUR",
            "order_number": "002",
            "order_description": "on demand",
            "items": [{"name": "Top-up", "amount": 300}],
            "additional_params": [{"name": "ref", "value": "x"}],
        });

        let payment = RecurringPaymentFactory::create(&data, Validators::default()).unwrap();
        assert_eq!(payment.currency, Some(Currency::EUR));
        assert_eq!(payment.items[0].count, 1);
        assert_eq!(payment.additional_params.len(), 1);

        let mut with_target = data.clone();
        with_target["target"] = json!({"goid": 1});
        let err = RecurringPaymentFactory::create(&with_target, Validators::default()).unwrap_err();
        assert_eq!(err, ValidationError::unexpected_fields(vec!["target".into()]));
    }

    #[test]
    fn test_recurring_payment_price_mismatch() {
        let data = json!({
            "amount": 301,
            "currency": "EUR",
            "order_number": "002",
            "order_description": "on demand",
            "items": [{"name": "Top-up", "amount": 300}],
        });

        let err = RecurringPaymentFactory::create(&data, Validators::default()).unwrap_err();
        assert_eq!(err, ValidationError::price_mismatch(dec!(301), dec!(300)));
    }

    #[test]
    fn test_non_object_input_is_rejected() {
        let err = PaymentFactory::create(&json!([1, 2]), Validators::default()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidInput { .. }));
    }

    #[test]
    fn test_decimal_prices_reconcile_exactly() {
        let data = json!({
            "amount": 0.3,
            "currency": "CZK",
            "order_number": "003",
            "order_description": "float noise",
            "items": [
                {"name": "a", "amount": 0.1},
                {"name": "b", "amount": 0.2},
            ],
            "return_url": "https://eshop.example/return",
            "notify_url": "https://eshop.example/notify",
        });

        let payment = PaymentFactory::create(&data, Validators::default()).unwrap();
        assert_eq!(payment.items_price(), Ok(dec!(0.3)));
    }

    #[test]
    fn test_eet_order_sum_mismatch() {
        let eet = Eet {
            sum: Some(dec!(900)),
            tax_base: Some(dec!(900)),
            ..Default::default()
        };
        let err = check_eet(&eet, dec!(1000)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::eet_mismatch(EetMismatchKind::OrderSum, dec!(900), dec!(1000))
        );
    }

    #[test]
    fn test_variant_dispatch() {
        let request = PaymentVariant::Recurrent
            .create(&recurrent_input(), Validators::default())
            .unwrap();
        assert!(matches!(request, PaymentRequest::Recurrent(_)));

        let err = PaymentVariant::Payment
            .create(&recurrent_input(), Validators::default())
            .unwrap_err();
        assert_eq!(err, ValidationError::unexpected_fields(vec!["recurrence".into()]));
    }
}
