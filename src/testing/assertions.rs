//! Field assertions over raw JSON response bodies
//!
//! Paths are dot separated (`orderInfo.input.startAmount`); a numeric
//! segment indexes into an array.

use serde_json::Value;

use crate::api::{is_valid_address, parse_amount};
use crate::common::{Error, Result};

/// Look up a dotted path
pub fn field<'a>(body: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(body, |value, segment| match value {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// The field exists and is not null
pub fn expect_present(body: &Value, path: &str) -> Result<()> {
    match field(body, path) {
        Some(Value::Null) | None => Err(Error::assertion(format!(
            "Expected response to have property '{}'",
            path
        ))),
        Some(_) => Ok(()),
    }
}

/// The field is a JSON string equal to `expected`
///
/// Amounts, ids and mints travel as strings, so a number with the same
/// digits is a mismatch.
pub fn expect_eq(body: &Value, path: &str, expected: &str) -> Result<()> {
    let value = field(body, path)
        .ok_or_else(|| Error::assertion(format!("Expected '{}' to be '{}', got nothing", path, expected)))?;

    match value.as_str() {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(Error::assertion(format!(
            "Expected '{}' to be '{}', got '{}'",
            path, expected, actual
        ))),
        None => Err(Error::assertion(format!(
            "Expected '{}' to be the string '{}', got {}",
            path, expected, value
        ))),
    }
}

/// The field equals `expected` exactly, type included
pub fn expect_value(body: &Value, path: &str, expected: &Value) -> Result<()> {
    match field(body, path) {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(Error::assertion(format!(
            "Expected '{}' to be {}, got {}",
            path, expected, actual
        ))),
        None => Err(Error::assertion(format!(
            "Expected '{}' to be {}, got nothing",
            path, expected
        ))),
    }
}

/// The field is a decimal amount string strictly greater than zero
pub fn expect_positive(body: &Value, path: &str) -> Result<()> {
    let value = field(body, path)
        .ok_or_else(|| Error::assertion(format!("Expected '{}' to be an amount, got nothing", path)))?;

    let text = value.as_str().ok_or_else(|| {
        Error::assertion(format!(
            "Expected '{}' to be a decimal amount string, got {}",
            path, value
        ))
    })?;

    match parse_amount(text) {
        Some(amount) if amount > 0 => Ok(()),
        Some(_) => Err(Error::assertion(format!(
            "Expected '{}' to be greater than 0, got '{}'",
            path, text
        ))),
        None => Err(Error::assertion(format!(
            "Expected '{}' to be a decimal amount, got '{}'",
            path, text
        ))),
    }
}

/// The field is truthy: a non-empty string, array or object, or any other
/// non-null scalar
pub fn expect_non_empty(body: &Value, path: &str) -> Result<()> {
    let empty = match field(body, path) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Bool(b)) => !b,
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
        Some(Value::Number(_)) => false,
    };

    if empty {
        return Err(Error::assertion(format!("Expected '{}' to be non-empty", path)));
    }
    Ok(())
}

/// Every element of the array at `path` (or the body itself when `path` is
/// empty) is a valid address
pub fn expect_valid_addresses(body: &Value, path: &str) -> Result<usize> {
    let value = if path.is_empty() {
        Some(body)
    } else {
        field(body, path)
    };

    let items = value
        .and_then(Value::as_array)
        .ok_or_else(|| Error::assertion("Expected a list of addresses"))?;

    for item in items {
        let address = item.as_str().unwrap_or_default();
        if !is_valid_address(address) {
            return Err(Error::assertion(format!(
                "Expected a valid address, got {}",
                item
            )));
        }
    }

    Ok(items.len())
}

/// Expect the call to have failed with a specific HTTP status
pub fn expect_status<T>(result: Result<T>, expected: u16) -> Result<()> {
    match result {
        Ok(_) => Err(Error::assertion(format!(
            "Expected {} response, got a successful one",
            expected
        ))),
        Err(e) => match e.status() {
            Some(status) if status == expected => Ok(()),
            Some(status) => Err(Error::assertion(format!(
                "Expected status {}, got {}",
                expected, status
            ))),
            None => Err(e),
        },
    }
}
