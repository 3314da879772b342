//! Pure state transition function
//!
//! Given the same session and event, `transition` always produces the same
//! result and performs no I/O. It is total: every input has a defined
//! outcome.

use super::classify::{classify_confirmation, classify_greeting, Answer};
use super::script::{self, ALREADY_COMPLETE, FAREWELL, GREETING, GREETING_REPROMPT, START_OVER};
use super::state::{DialogueSession, Step};
use super::{Effect, Event};

/// Result of a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_session: DialogueSession,
    pub reply: String,
    /// The conversation has reached an end (order placed or declined)
    pub is_complete: bool,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: DialogueSession, reply: impl Into<String>) -> Self {
        Self {
            new_session: session,
            reply: reply.into(),
            is_complete: false,
            effects: vec![],
        }
    }

    pub fn complete(mut self) -> Self {
        self.is_complete = true;
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Pure transition function
pub fn transition(session: &DialogueSession, event: Event) -> TransitionResult {
    let text = match event {
        Event::Restart => return TransitionResult::new(DialogueSession::new(), GREETING),
        Event::Reply { text } => text,
    };

    match session.current_step {
        Step::Greeting => match classify_greeting(&text) {
            Answer::Affirmative => advance_to_next(session.clone()),
            Answer::Negative => TransitionResult::new(session.clone(), FAREWELL)
                .complete()
                .with_effect(Effect::EndConversation),
            Answer::Unclear => TransitionResult::new(session.clone(), GREETING_REPROMPT),
        },

        Step::Confirmation => match classify_confirmation(&text) {
            Answer::Affirmative => {
                debug_assert!(session.is_fully_collected());
                let draft = session.to_draft();
                let mut new_session = session.clone();
                new_session.current_step = Step::Complete;
                TransitionResult::new(new_session, script::ORDER_PLACED)
                    .complete()
                    .with_effect(Effect::SubmitOrder { draft })
            }
            // Ambiguous replies start over too
            Answer::Negative | Answer::Unclear => {
                TransitionResult::new(DialogueSession::new(), START_OVER)
            }
        },

        Step::Complete => TransitionResult::new(session.clone(), ALREADY_COMPLETE).complete(),

        step => {
            let mut new_session = session.clone();
            if let Some(field) = step.field() {
                new_session
                    .collected_fields
                    .insert(field, text.trim().to_string());
            }
            advance_to_next(new_session)
        }
    }
}

fn advance_to_next(mut session: DialogueSession) -> TransitionResult {
    session.current_step = session.current_step.next();
    let reply = script::prompt_for(&session);
    TransitionResult::new(session, reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::state::OrderField;

    fn run(session: &DialogueSession, text: &str) -> TransitionResult {
        transition(session, Event::reply(text))
    }

    fn at_confirmation() -> DialogueSession {
        DialogueSession {
            current_step: Step::Confirmation,
            collected_fields: OrderField::ALL
                .iter()
                .map(|f| (*f, "x".to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_greeting_yes_asks_name() {
        let result = run(&DialogueSession::new(), "yes");

        assert_eq!(result.new_session.current_step, Step::AskName);
        assert!(result.new_session.collected_fields.is_empty());
        assert_eq!(result.reply, "Great! Let's get started. What's your name?");
        assert!(!result.is_complete);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_greeting_no_ends_without_reset() {
        let result = run(&DialogueSession::new(), "no");

        assert_eq!(result.new_session.current_step, Step::Greeting);
        assert_eq!(result.reply, FAREWELL);
        assert!(result.is_complete);
        assert_eq!(result.effects, vec![Effect::EndConversation]);
    }

    #[test]
    fn test_greeting_unclear_reprompts() {
        let session = DialogueSession::new();
        let result = run(&session, "maybe later");

        assert_eq!(result.new_session, session);
        assert_eq!(result.reply, GREETING_REPROMPT);
        assert!(!result.is_complete);
    }

    #[test]
    fn test_free_text_stored_trimmed() {
        let session = DialogueSession {
            current_step: Step::AskName,
            ..DialogueSession::default()
        };
        let result = run(&session, "  Asha  ");

        assert_eq!(result.new_session.current_step, Step::AskPhone);
        assert_eq!(result.new_session.get(OrderField::CustomerName), Some("Asha"));
        assert!(result.reply.contains("Asha"));
    }

    #[test]
    fn test_empty_answer_is_accepted() {
        let session = DialogueSession {
            current_step: Step::AskDietaryPreferences,
            ..DialogueSession::default()
        };
        let result = run(&session, "");

        assert_eq!(result.new_session.current_step, Step::AskSpecialInstructions);
        assert_eq!(result.new_session.get(OrderField::DietaryPreferences), Some(""));
    }

    #[test]
    fn test_last_question_shows_summary() {
        let mut session = at_confirmation();
        session.current_step = Step::AskSpecialInstructions;
        session.collected_fields.remove(&OrderField::SpecialInstructions);

        let result = run(&session, "extra roti");
        assert_eq!(result.new_session.current_step, Step::Confirmation);
        assert!(result.new_session.is_fully_collected());
        assert!(result.reply.starts_with("Let me confirm your order"));
        assert!(result.reply.contains("Special Instructions: extra roti"));
    }

    #[test]
    fn test_confirm_submits_order() {
        let session = at_confirmation();
        let result = run(&session, "Yes, confirm");

        assert_eq!(result.new_session.current_step, Step::Complete);
        assert!(result.is_complete);
        assert_eq!(
            result.effects,
            vec![Effect::SubmitOrder {
                draft: session.to_draft()
            }]
        );
    }

    #[test]
    fn test_decline_at_confirmation_resets() {
        let result = run(&at_confirmation(), "no thanks");

        assert_eq!(result.new_session, DialogueSession::new());
        assert_eq!(result.reply, START_OVER);
        assert!(!result.is_complete);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_ambiguous_confirmation_resets() {
        let result = run(&at_confirmation(), "what?");
        assert_eq!(result.new_session, DialogueSession::new());
    }

    #[test]
    fn test_complete_is_not_reentered() {
        let mut session = at_confirmation();
        session.current_step = Step::Complete;
        let result = run(&session, "yes");

        assert_eq!(result.new_session, session);
        assert_eq!(result.reply, ALREADY_COMPLETE);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_restart_from_anywhere() {
        let result = transition(&at_confirmation(), Event::Restart);
        assert_eq!(result.new_session, DialogueSession::new());
        assert_eq!(result.reply, GREETING);
    }
}
