//! Order schema and types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// SQL schema for initialization
///
/// `seq` only exists to keep insertion order; it never leaves the database.
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS orders (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    customer_name TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    address TEXT NOT NULL,
    meal_type TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    delivery_time TEXT NOT NULL,
    dietary_preferences TEXT NOT NULL,
    special_instructions TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'new'
);

CREATE INDEX IF NOT EXISTS idx_orders_seq ON orders(seq DESC);
";

/// Placeholder stored for any text field the customer never supplied
pub const MISSING_FIELD: &str = "None";

/// Quantity used when the supplied text has no usable number
pub const DEFAULT_QUANTITY: u32 = 1;

/// Fulfillment status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    New,
    Preparing,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Delivered => "delivered",
        }
    }

    /// The only status the kitchen may move this order to, if any
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::New => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(OrderStatus::New),
            "preparing" => Ok(OrderStatus::Preparing),
            "delivered" => Ok(OrderStatus::Delivered),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A persisted order
///
/// Field names and their order are the on-disk contract shared by every
/// store backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: String,
    pub customer_name: String,
    pub phone_number: String,
    pub address: String,
    pub meal_type: String,
    pub quantity: u32,
    pub delivery_time: String,
    pub dietary_preferences: String,
    pub special_instructions: String,
    pub timestamp: DateTime<Utc>,
    pub status: OrderStatus,
}

impl OrderRecord {
    /// Build a record from raw order text, applying field defaults.
    ///
    /// A timestamp on the draft wins over `now`.
    pub fn from_draft(id: impl Into<String>, draft: OrderDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            customer_name: text_or_missing(draft.customer_name),
            phone_number: text_or_missing(draft.phone_number),
            address: text_or_missing(draft.address),
            meal_type: text_or_missing(draft.meal_type),
            quantity: draft
                .quantity
                .as_deref()
                .map_or(DEFAULT_QUANTITY, parse_quantity),
            delivery_time: text_or_missing(draft.delivery_time),
            dietary_preferences: text_or_missing(draft.dietary_preferences),
            special_instructions: text_or_missing(draft.special_instructions),
            timestamp: draft.timestamp.unwrap_or(now),
            status: OrderStatus::New,
        }
    }
}

/// Unvalidated order contents, as typed by a customer or posted by a client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    pub customer_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub meal_type: Option<String>,
    pub quantity: Option<String>,
    pub delivery_time: Option<String>,
    pub dietary_preferences: Option<String>,
    pub special_instructions: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

fn text_or_missing(value: Option<String>) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => MISSING_FIELD.to_string(),
    }
}

/// Read the leading integer of `input`, falling back to one.
///
/// `"2 tiffins"` is 2; `"two"`, `"0"` and `"-3"` are all 1.
pub fn parse_quantity(input: &str) -> u32 {
    let trimmed = input.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = unsigned.chars().take_while(char::is_ascii_digit).collect();
    match digits.parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => DEFAULT_QUANTITY,
    }
}
