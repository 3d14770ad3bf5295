//! Key-set checks run before any object is built

use serde_json::{Map, Value};

/// Which checks a factory enforces
///
/// Both are on by default. Turning one off is an escape hatch for data the
/// caller has already validated; the corresponding check is then not run at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validators {
    /// Reject unknown keys and items without a name
    pub enforce_scheme: bool,
    /// Reconcile item and EET totals against the order amount
    pub enforce_prices: bool,
}

impl Default for Validators {
    fn default() -> Self {
        Self {
            enforce_scheme: true,
            enforce_prices: true,
        }
    }
}

impl Validators {
    pub fn without_scheme(mut self) -> Self {
        self.enforce_scheme = false;
        self
    }

    pub fn without_prices(mut self) -> Self {
        self.enforce_prices = false;
        self
    }
}

/// Return the required keys absent from `data`, in `required` order
///
/// A key holding `null` or an empty value still counts as present.
pub fn validate_required(data: &Map<String, Value>, required: &[&str]) -> Result<(), Vec<String>> {
    let missing: Vec<String> = required
        .iter()
        .filter(|key| !data.contains_key(**key))
        .map(|key| key.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

/// Return the keys of `data` that are not in `allowed`, in the map's key order
pub fn validate_optional(data: &Map<String, Value>, allowed: &[&str]) -> Result<(), Vec<String>> {
    let extra: Vec<String> = data
        .keys()
        .filter(|key| !allowed.contains(&key.as_str()))
        .cloned()
        .collect();

    if extra.is_empty() {
        Ok(())
    } else {
        Err(extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_required_reports_missing_keys_in_schema_order() {
        let data = object(json!({"currency": "CZK"}));
        let res = validate_required(&data, &["amount", "currency", "items"]);
        assert_eq!(res, Err(vec!["amount".to_string(), "items".to_string()]));
    }

    #[test]
    fn test_required_accepts_null_and_empty_values() {
        let data = object(json!({"amount": null, "items": []}));
        assert_eq!(validate_required(&data, &["amount", "items"]), Ok(()));
    }

    #[test]
    fn test_optional_reports_unknown_keys() {
        let data = object(json!({"amount": 1, "foo": 2, "lang": "CS"}));
        let res = validate_optional(&data, &["amount", "lang"]);
        assert_eq!(res, Err(vec!["foo".to_string()]));
        assert_eq!(validate_optional(&data, &["amount", "foo", "lang"]), Ok(()));
    }

    #[test]
    fn test_validators_default_enforces_everything() {
        let validators = Validators::default();
        assert!(validators.enforce_scheme && validators.enforce_prices);

        let relaxed = Validators::default().without_scheme().without_prices();
        assert!(!relaxed.enforce_scheme && !relaxed.enforce_prices);
    }
}
