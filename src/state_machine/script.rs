//! What the bot says
//!
//! The question sequence is a table: each question step names the order
//! field it fills and the prompt shown when the conversation arrives there.

use super::state::{DialogueSession, OrderField, Step};
use std::fmt::Write;

pub const GREETING: &str = "Hello! 👋 Welcome to our Tiffin Service! I'm here to help you place your order. Would you like to order a tiffin today?";

pub const GREETING_REPROMPT: &str =
    "I didn't quite catch that. Would you like to order a tiffin? Please say 'yes' or 'no'.";

pub const FAREWELL: &str =
    "No problem! Feel free to come back when you're ready. Have a great day! 😊";

pub const ORDER_PLACED: &str = "🎉 Perfect! Your order has been placed and sent to our cook. You'll receive your delicious tiffin on time. Thank you for choosing our service!";

pub const START_OVER: &str = "No problem! Let's start over. Would you like to place a new order?";

pub const ALREADY_COMPLETE: &str =
    "This order is already complete. Start a new chat to place another order.";

/// Placeholder replaced by the customer's name in prompts
const NAME_PLACEHOLDER: &str = "{customerName}";

/// A question step of the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub step: Step,
    pub field: OrderField,
    pub prompt: &'static str,
}

pub const QUESTIONS: [Question; 8] = [
    Question {
        step: Step::AskName,
        field: OrderField::CustomerName,
        prompt: "Great! Let's get started. What's your name?",
    },
    Question {
        step: Step::AskPhone,
        field: OrderField::PhoneNumber,
        prompt: "Nice to meet you, {customerName}! 😊 What's your phone number?",
    },
    Question {
        step: Step::AskAddress,
        field: OrderField::Address,
        prompt: "Perfect! Where should we deliver your tiffin? Please provide your complete address.",
    },
    Question {
        step: Step::AskMealType,
        field: OrderField::MealType,
        prompt: "Got it! What type of meal would you like?\n\n• Vegetarian\n• Non-Vegetarian\n• Vegan\n• Jain\n\nPlease choose one.",
    },
    Question {
        step: Step::AskQuantity,
        field: OrderField::Quantity,
        prompt: "Excellent choice! How many tiffins would you like to order?",
    },
    Question {
        step: Step::AskDeliveryTime,
        field: OrderField::DeliveryTime,
        prompt: "When would you like your tiffin delivered?\n\n• Lunch (12:00 PM - 2:00 PM)\n• Dinner (7:00 PM - 9:00 PM)\n• Custom time\n\nPlease specify.",
    },
    Question {
        step: Step::AskDietaryPreferences,
        field: OrderField::DietaryPreferences,
        prompt: "Do you have any dietary preferences or allergies we should know about? (e.g., no onion, no garlic, less spicy, etc.)",
    },
    Question {
        step: Step::AskSpecialInstructions,
        field: OrderField::SpecialInstructions,
        prompt: "Any special instructions for the cook? (e.g., extra roti, less oil, etc.)",
    },
];

pub fn question(step: Step) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.step == step)
}

/// The message shown when `session` has just arrived at its current step
pub fn prompt_for(session: &DialogueSession) -> String {
    match session.current_step {
        Step::Greeting => GREETING.to_string(),
        Step::Confirmation => confirmation_summary(session),
        Step::Complete => ORDER_PLACED.to_string(),
        step => question(step).map_or_else(String::new, |q| {
            q.prompt.replace(
                NAME_PLACEHOLDER,
                session.get(OrderField::CustomerName).unwrap_or_default(),
            )
        }),
    }
}

fn confirmation_summary(session: &DialogueSession) -> String {
    let mut summary = String::from("Let me confirm your order:\n\n");
    for field in OrderField::ALL {
        let icon = match field {
            OrderField::CustomerName => "👤",
            OrderField::PhoneNumber => "📞",
            OrderField::Address => "📍",
            OrderField::MealType => "🍽️",
            OrderField::Quantity => "🔢",
            OrderField::DeliveryTime => "⏰",
            OrderField::DietaryPreferences => "🥗",
            OrderField::SpecialInstructions => "📝",
        };
        let _ = writeln!(
            summary,
            "{icon} {}: {}",
            field.label(),
            session.get(field).unwrap_or_default()
        );
    }
    summary.push_str("\nIs everything correct? Please reply 'yes' to confirm or 'no' to start over.");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_every_question_step_has_one_entry() {
        for q in &QUESTIONS {
            assert_eq!(QUESTIONS.iter().filter(|o| o.step == q.step).count(), 1);
        }
        assert!(question(Step::Greeting).is_none());
        assert!(question(Step::Confirmation).is_none());
    }

    #[test]
    fn test_phone_prompt_uses_name() {
        let session = DialogueSession {
            current_step: Step::AskPhone,
            collected_fields: BTreeMap::from([(OrderField::CustomerName, "Asha".to_string())]),
        };
        assert_eq!(
            prompt_for(&session),
            "Nice to meet you, Asha! 😊 What's your phone number?"
        );
    }

    #[test]
    fn test_summary_lists_every_answer() {
        let session = DialogueSession {
            current_step: Step::Confirmation,
            collected_fields: OrderField::ALL
                .iter()
                .map(|f| (*f, format!("answer-{}", f.label())))
                .collect(),
        };
        let summary = prompt_for(&session);
        for field in OrderField::ALL {
            assert!(summary.contains(&format!("{}: answer-{}", field.label(), field.label())));
        }
        assert!(summary.ends_with("'no' to start over."));
    }
}
