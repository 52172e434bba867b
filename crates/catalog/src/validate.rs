//! Field validators over the raw tool-call argument map.
//!
//! Every failure is an [`Error::Validation`] naming the offending field,
//! the caller-diagnostic contract the dispatcher and its tests rely on.
//! Falsy-but-present values (`0`, `""`, `false`) are valid; only absence
//! and explicit `null` count as missing.

use serde_json::{Map, Number, Value};

use lg_domain::error::{Error, Result};

/// The raw input map of one invocation.
pub type Input = Map<String, Value>;

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Required fields ────────────────────────────────────────────────

/// The raw value for `field`, rejecting absent and explicit-null values.
pub fn require<'a>(input: &'a Input, field: &str) -> Result<&'a Value> {
    match input.get(field) {
        None | Some(Value::Null) => Err(Error::validation(field, "is required")),
        Some(value) => Ok(value),
    }
}

pub fn require_str<'a>(input: &'a Input, field: &str) -> Result<&'a str> {
    match require(input, field)? {
        Value::String(s) => Ok(s),
        other => Err(Error::validation(
            field,
            format!("must be a string, got {}", type_name(other)),
        )),
    }
}

pub fn require_number(input: &Input, field: &str) -> Result<Number> {
    match require(input, field)? {
        Value::Number(n) => Ok(n.clone()),
        other => Err(Error::validation(
            field,
            format!("must be a number, got {}", type_name(other)),
        )),
    }
}

/// `require_str` plus membership in the closed `allowed` set
/// (exact, case-sensitive match).
pub fn require_enum<'a>(input: &'a Input, field: &str, allowed: &[&str]) -> Result<&'a str> {
    let value = require_str(input, field)?;
    check_enum(field, value, allowed)?;
    Ok(value)
}

// ── Optional fields ────────────────────────────────────────────────

pub fn optional_str<'a>(input: &'a Input, field: &str) -> Result<Option<&'a str>> {
    match input.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(Error::validation(
            field,
            format!("must be a string, got {}", type_name(other)),
        )),
    }
}

pub fn optional_number(input: &Input, field: &str) -> Result<Option<Number>> {
    match input.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.clone())),
        Some(other) => Err(Error::validation(
            field,
            format!("must be a number, got {}", type_name(other)),
        )),
    }
}

pub fn optional_bool(input: &Input, field: &str) -> Result<Option<bool>> {
    match input.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(Error::validation(
            field,
            format!("must be a boolean, got {}", type_name(other)),
        )),
    }
}

pub fn optional_enum<'a>(
    input: &'a Input,
    field: &str,
    allowed: &[&str],
) -> Result<Option<&'a str>> {
    match optional_str(input, field)? {
        None => Ok(None),
        Some(value) => {
            check_enum(field, value, allowed)?;
            Ok(Some(value))
        }
    }
}

pub fn optional_str_array(input: &Input, field: &str) -> Result<Option<Vec<String>>> {
    match input.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => out.push(s.clone()),
                    other => {
                        return Err(Error::validation(
                            field,
                            format!("must contain only strings, got {}", type_name(other)),
                        ))
                    }
                }
            }
            Ok(Some(out))
        }
        Some(other) => Err(Error::validation(
            field,
            format!("must be an array of strings, got {}", type_name(other)),
        )),
    }
}

fn check_enum(field: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(Error::validation(
            field,
            format!("must be one of: {}", allowed.join(", ")),
        ))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
