//! Dialogue state types

use crate::db::OrderDraft;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One stage of the ordering conversation, in the order they are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    #[default]
    Greeting,
    AskName,
    AskPhone,
    AskAddress,
    AskMealType,
    AskQuantity,
    AskDeliveryTime,
    AskDietaryPreferences,
    AskSpecialInstructions,
    Confirmation,
    Complete,
}

impl Step {
    /// The step that follows this one when the customer moves forward
    pub fn next(self) -> Step {
        match self {
            Step::Greeting => Step::AskName,
            Step::AskName => Step::AskPhone,
            Step::AskPhone => Step::AskAddress,
            Step::AskAddress => Step::AskMealType,
            Step::AskMealType => Step::AskQuantity,
            Step::AskQuantity => Step::AskDeliveryTime,
            Step::AskDeliveryTime => Step::AskDietaryPreferences,
            Step::AskDietaryPreferences => Step::AskSpecialInstructions,
            Step::AskSpecialInstructions => Step::Confirmation,
            Step::Confirmation | Step::Complete => Step::Complete,
        }
    }

    /// The order field answered at this step, for question steps only
    pub fn field(self) -> Option<OrderField> {
        super::script::question(self).map(|q| q.field)
    }
}

/// Order fields the conversation asks for, in record order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderField {
    CustomerName,
    PhoneNumber,
    Address,
    MealType,
    Quantity,
    DeliveryTime,
    DietaryPreferences,
    SpecialInstructions,
}

impl OrderField {
    pub const ALL: [OrderField; 8] = [
        OrderField::CustomerName,
        OrderField::PhoneNumber,
        OrderField::Address,
        OrderField::MealType,
        OrderField::Quantity,
        OrderField::DeliveryTime,
        OrderField::DietaryPreferences,
        OrderField::SpecialInstructions,
    ];

    /// Label used in the confirmation summary
    pub fn label(self) -> &'static str {
        match self {
            OrderField::CustomerName => "Name",
            OrderField::PhoneNumber => "Phone",
            OrderField::Address => "Address",
            OrderField::MealType => "Meal Type",
            OrderField::Quantity => "Quantity",
            OrderField::DeliveryTime => "Delivery Time",
            OrderField::DietaryPreferences => "Dietary Preferences",
            OrderField::SpecialInstructions => "Special Instructions",
        }
    }
}

/// One customer's in-progress conversation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DialogueSession {
    pub current_step: Step,
    /// Raw answers, keyed by the field each question step fills
    pub collected_fields: BTreeMap<OrderField, String>,
}

impl DialogueSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: OrderField) -> Option<&str> {
        self.collected_fields.get(&field).map(String::as_str)
    }

    /// Whether every question has an answer
    pub fn is_fully_collected(&self) -> bool {
        OrderField::ALL
            .iter()
            .all(|f| self.collected_fields.contains_key(f))
    }

    /// The collected answers as order text, without any defaults applied
    pub fn to_draft(&self) -> OrderDraft {
        let take = |field| self.get(field).map(String::from);
        OrderDraft {
            customer_name: take(OrderField::CustomerName),
            phone_number: take(OrderField::PhoneNumber),
            address: take(OrderField::Address),
            meal_type: take(OrderField::MealType),
            quantity: take(OrderField::Quantity),
            delivery_time: take(OrderField::DeliveryTime),
            dietary_preferences: take(OrderField::DietaryPreferences),
            special_instructions: take(OrderField::SpecialInstructions),
            timestamp: None,
        }
    }
}
