//! Domain DTOs for the grocery API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch drift between the two. The real API serializes
//! SQL decimals as strings and timestamps in more than one format, so prices
//! and dates go through the lenient helpers in [`wire`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stock assumed for products the API reports without a quantity.
pub const DEFAULT_STOCK: i64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub customer_id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "wire::blank_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "wire::blank_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "wire::blank_as_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub product_id: u64,
    pub name: String,
    #[serde(default)]
    pub uom_id: Option<u64>,
    #[serde(deserialize_with = "wire::decimal")]
    pub price_per_unit: f64,
    pub uom_name: String,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
}

impl Product {
    pub fn stock(&self) -> i64 {
        self.stock_quantity.unwrap_or(DEFAULT_STOCK)
    }

    pub fn stock_value(&self) -> f64 {
        self.stock() as f64 * self.price_per_unit
    }
}

/// Unit of measure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Uom {
    pub uom_id: u64,
    pub uom_name: String,
}

/// One row of `GET /api/orders`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSummary {
    pub order_id: u64,
    #[serde(default)]
    pub customer_id: Option<u64>,
    pub customer_name: String,
    #[serde(deserialize_with = "wire::decimal")]
    pub total: f64,
    #[serde(with = "wire::timestamp")]
    pub datetime: NaiveDateTime,
}

/// `GET /api/orders/<id>`: the summary plus its lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDetail {
    pub order_id: u64,
    #[serde(default)]
    pub customer_id: Option<u64>,
    pub customer_name: String,
    #[serde(deserialize_with = "wire::decimal")]
    pub total: f64,
    #[serde(with = "wire::timestamp")]
    pub datetime: NaiveDateTime,
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub product_id: u64,
    pub product_name: String,
    #[serde(deserialize_with = "wire::decimal")]
    pub quantity: f64,
    pub uom_name: String,
    #[serde(deserialize_with = "wire::decimal")]
    pub total_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCustomer {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub uom_id: u64,
    pub price_per_unit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrder {
    pub customer_id: u64,
    pub total: f64,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrderItem {
    pub product_id: u64,
    pub quantity: f64,
    pub total_price: f64,
}

/// Body of a successful POST/PUT/DELETE: an optional message plus
/// entity-specific fields such as `order_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Acknowledgement {
    pub fn id(&self, key: &str) -> Option<u64> {
        self.fields.get(key).and_then(Value::as_u64)
    }
}

pub mod wire {
    //! Lenient decoders for the API's wire formats.

    use chrono::{DateTime, NaiveDateTime};
    use serde::de::{self, Deserializer};
    use serde::{Deserialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    /// Accepts `12.5` as well as `"12.50"`.
    pub fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| de::Error::custom(format!("invalid decimal: {s:?}"))),
        }
    }

    /// Treats `null` and whitespace-only strings as absent.
    pub fn blank_as_none<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.trim().is_empty()))
    }

    /// Parses the timestamp formats the API emits, normalized to UTC.
    pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
            return Some(dt.naive_utc());
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    }

    pub mod timestamp {
        use super::*;

        pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S").to_string())
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
            let raw = String::deserialize(deserializer)?;
            parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw:?}")))
        }
    }
}
