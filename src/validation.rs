//! Field-level checks on raw request payloads.
//!
//! Checks run against the untyped JSON so a wrong type (e.g. a boolean price) is
//! reported as a field error instead of a deserialization failure. Every rule is
//! evaluated; callers get the full list in field order.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult = Result<(), Vec<FieldError>>;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn non_empty_str(v: Option<&Value>) -> bool {
    matches!(v, Some(Value::String(s)) if !s.trim().is_empty())
}

/// Absent and `null` both count as "not provided".
fn optional_str(v: Option<&Value>) -> bool {
    matches!(v, None | Some(Value::Null) | Some(Value::String(_)))
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, Vec<FieldError>> {
    payload
        .as_object()
        .ok_or_else(|| vec![FieldError::new("body", "Request body must be a JSON object")])
}

fn finish(errors: Vec<FieldError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Non-negative finite number, given as a JSON number or a numeric string.
pub(crate) fn parse_price(v: &Value) -> Option<f64> {
    let price = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (price.is_finite() && price >= 0.0).then_some(price)
}

/// Non-negative integer in i64 range. Numbers only need a zero fraction, so
/// `5.0` and `1e2` count; strings must be plain integer literals.
pub(crate) fn parse_stock(v: &Value) -> Option<i64> {
    let stock = match v {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => {
                let f = n.as_f64()?;
                // 2^63 itself is out of range, so the upper bound is exclusive
                let in_range = (0.0..9_223_372_036_854_775_808.0).contains(&f);
                if !in_range || f.fract() != 0.0 {
                    return None;
                }
                f as i64
            }
        },
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (stock >= 0).then_some(stock)
}

pub fn validate_user(payload: &Value) -> ValidationResult {
    let body = as_object(payload)?;
    let mut errors = Vec::new();

    if !non_empty_str(body.get("username")) {
        errors.push(FieldError::new("username", "Username is required"));
    }
    let email_ok = matches!(body.get("email"), Some(Value::String(e)) if is_valid_email(e));
    if !email_ok {
        errors.push(FieldError::new("email", "Valid email is required"));
    }
    if !non_empty_str(body.get("passwordHash")) {
        errors.push(FieldError::new("passwordHash", "Password is required"));
    }
    if !optional_str(body.get("firstName")) {
        errors.push(FieldError::new("firstName", "First name must be a string"));
    }
    if !optional_str(body.get("lastName")) {
        errors.push(FieldError::new("lastName", "Last name must be a string"));
    }
    match body.get("role") {
        None | Some(Value::Null) => {}
        Some(Value::String(r)) if r == "user" || r == "admin" => {}
        Some(_) => errors.push(FieldError::new("role", "Role must be one of: user, admin")),
    }

    finish(errors)
}

pub fn validate_product(payload: &Value) -> ValidationResult {
    let body = as_object(payload)?;
    let mut errors = Vec::new();

    if !non_empty_str(body.get("name")) {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if !non_empty_str(body.get("description")) {
        errors.push(FieldError::new("description", "Description is required"));
    }
    if body.get("price").and_then(parse_price).is_none() {
        errors.push(FieldError::new("price", "Price must be a positive number"));
    }
    if body.get("stock").and_then(parse_stock).is_none() {
        errors.push(FieldError::new("stock", "Stock must be a non-negative integer"));
    }
    if !optional_str(body.get("category")) {
        errors.push(FieldError::new("category", "Category must be a string"));
    }
    if !optional_str(body.get("imageUrl")) {
        errors.push(FieldError::new("imageUrl", "Image URL must be a string"));
    }

    finish(errors)
}
