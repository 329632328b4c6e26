//! Form fields: presence/format checks and payload coercion.
//!
//! # Design
//! A form is an ordered list of `FormField`s. Validation marks each field
//! valid or invalid; it never talks to the API. `to_payload` builds the JSON
//! object sent on submit, turning numeric-looking values into JSON numbers
//! the way the API expects for ids, prices and quantities.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::error::ApiError;
use crate::types::{Customer, Product};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 10..=15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Tel,
    Number,
    Select,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
}

impl FormField {
    pub fn new(name: &str, kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
            value: value.into(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Valid,
    Invalid,
    /// Optional and left empty.
    Untouched,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Validation {
    pub fields: Vec<(String, FieldState)>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|(_, state)| *state != FieldState::Invalid)
    }

    pub fn invalid_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, state)| *state == FieldState::Invalid)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn state(&self, name: &str) -> Option<FieldState> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, state)| *state)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("Please correct the highlighted fields: {}", .0.join(", "))]
    Invalid(Vec<String>),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Keep only the digits of a phone number as typed.
pub fn normalize_phone(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_DIGITS.contains(&normalize_phone(value).len())
}

fn check(field: &FormField) -> FieldState {
    let value = field.value.trim();
    if value.is_empty() {
        return if field.required {
            FieldState::Invalid
        } else {
            FieldState::Untouched
        };
    }
    let ok = match field.kind {
        FieldKind::Email => is_valid_email(value),
        FieldKind::Tel => is_valid_phone(value),
        FieldKind::Number => value.parse::<f64>().is_ok_and(|n| n.is_finite() && n > 0.0),
        FieldKind::Text | FieldKind::Select => true,
    };
    if ok {
        FieldState::Valid
    } else {
        FieldState::Invalid
    }
}

pub fn validate(fields: &[FormField]) -> Validation {
    Validation {
        fields: fields.iter().map(|f| (f.name.clone(), check(f))).collect(),
    }
}

/// A JSON number for numeric-looking text, integral values as integers.
fn coerce(value: &str) -> Option<Value> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let n = trimmed.parse::<f64>().ok().filter(|n| n.is_finite())?;
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        return Some(Value::Number(Number::from(n as i64)));
    }
    Number::from_f64(n).map(Value::Number)
}

/// The JSON object for a submit. Phone numbers stay strings.
pub fn to_payload(fields: &[FormField]) -> Map<String, Value> {
    fields
        .iter()
        .map(|field| {
            // Phone numbers reach the server verbatim; leading zeros must survive.
            let value = match field.kind {
                FieldKind::Tel => None,
                _ => coerce(&field.value),
            }
            .unwrap_or_else(|| Value::String(field.value.clone()));
            (field.name.clone(), value)
        })
        .collect()
}

/// Fields of the customer form; blank for a create, filled for an edit.
pub fn customer_fields(customer: Option<&Customer>) -> Vec<FormField> {
    let text = |value: Option<&Option<String>>| {
        value.and_then(Option::as_deref).unwrap_or("").to_string()
    };
    vec![
        FormField::new("name", FieldKind::Text, customer.map(|c| c.name.as_str()).unwrap_or(""))
            .required(),
        FormField::new("phone", FieldKind::Tel, text(customer.map(|c| &c.phone))),
        FormField::new("email", FieldKind::Email, text(customer.map(|c| &c.email))),
        FormField::new("address", FieldKind::Text, text(customer.map(|c| &c.address))),
    ]
}

/// Fields of the product form. `uom_id` is the unit to pre-select.
pub fn product_fields(product: Option<&Product>, uom_id: Option<u64>) -> Vec<FormField> {
    vec![
        FormField::new("name", FieldKind::Text, product.map(|p| p.name.as_str()).unwrap_or(""))
            .required(),
        FormField::new(
            "uom_id",
            FieldKind::Select,
            uom_id.map(|id| id.to_string()).unwrap_or_default(),
        )
        .required(),
        FormField::new(
            "price_per_unit",
            FieldKind::Number,
            product.map(|p| p.price_per_unit.to_string()).unwrap_or_default(),
        )
        .required(),
    ]
}
