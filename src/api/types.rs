//! API request and response types

use crate::db::{OrderDraft, OrderRecord, OrderStatus};
use crate::state_machine::DialogueSession;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response when a conversation is opened
#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub reply: String,
}

/// Response with a single session's progress
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub session: DialogueSession,
}

/// Request to answer the current question
#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub text: String,
}

/// Response to one customer reply
#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    pub reply: String,
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderRecord>,
}

/// Response for restart: the greeting again
#[derive(Debug, Serialize)]
pub struct RestartResponse {
    pub reply: String,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Request to create an order directly.
///
/// Every field is optional; missing ones get their defaults on insert.
/// `quantity` may arrive as a number or a string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub meal_type: Option<String>,
    pub quantity: Option<Value>,
    pub delivery_time: Option<String>,
    pub dietary_preferences: Option<String>,
    pub special_instructions: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<CreateOrderRequest> for OrderDraft {
    fn from(req: CreateOrderRequest) -> Self {
        let quantity = req.quantity.and_then(|q| match q {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        OrderDraft {
            customer_name: req.customer_name,
            phone_number: req.phone_number,
            address: req.address,
            meal_type: req.meal_type,
            quantity,
            delivery_time: req.delivery_time,
            dietary_preferences: req.dietary_preferences,
            special_instructions: req.special_instructions,
            timestamp: req.timestamp,
        }
    }
}

/// Request to overwrite an order's status
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub id: String,
    pub status: OrderStatus,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
