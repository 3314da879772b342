//! Property-based tests for the dialogue state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Replies biased towards the keywords the classifier looks for
fn arb_utterance() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("yes".to_string()),
        Just("no".to_string()),
        Just("sure".to_string()),
        Just("not now".to_string()),
        Just("confirm".to_string()),
        Just("maybe".to_string()),
        Just(String::new()),
        "[a-zA-Z0-9 ]{0,24}",
        any::<String>(),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        9 => arb_utterance().prop_map(Event::reply),
        1 => Just(Event::Restart),
    ]
}

/// Free-text answers that never look like a decline at confirmation
fn arb_answer() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 ,.]{0,30}"
}

/// A session as it would look on arriving at `step`
fn session_at(step: Step) -> DialogueSession {
    let mut session = DialogueSession::new();
    let mut current = Step::Greeting;
    while current != step {
        if let Some(field) = current.field() {
            session.collected_fields.insert(field, format!("{field:?}"));
        }
        current = current.next();
    }
    session.current_step = step;
    session
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Greeting),
        Just(Step::AskName),
        Just(Step::AskPhone),
        Just(Step::AskAddress),
        Just(Step::AskMealType),
        Just(Step::AskQuantity),
        Just(Step::AskDeliveryTime),
        Just(Step::AskDietaryPreferences),
        Just(Step::AskSpecialInstructions),
        Just(Step::Confirmation),
        Just(Step::Complete),
    ]
}

// ============================================================================
// Invariant Helpers
// ============================================================================

/// Fields present are exactly those of the question steps already passed
fn fields_match_step(session: &DialogueSession) -> bool {
    let mut expected = Vec::new();
    let mut step = Step::Greeting;
    while step < session.current_step {
        if let Some(field) = step.field() {
            expected.push(field);
        }
        step = step.next();
    }
    session.collected_fields.keys().copied().collect::<Vec<_>>() == expected
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // Invariant 1: steps move forward one at a time, stay put, or reset fully
    #[test]
    fn prop_step_never_skips(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut session = DialogueSession::new();
        for event in events {
            let result = transition(&session, event);
            let next = &result.new_session;
            let moved_forward = next.current_step == session.current_step.next();
            let stayed = next.current_step == session.current_step;
            let reset = *next == DialogueSession::new();
            prop_assert!(
                moved_forward || stayed || reset,
                "{:?} -> {:?}", session.current_step, next.current_step
            );
            session = result.new_session;
        }
    }

    // Invariant 2: collected fields track the current step exactly
    #[test]
    fn prop_fields_in_lockstep(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut session = DialogueSession::new();
        for event in events {
            session = transition(&session, event).new_session;
            prop_assert!(fields_match_step(&session), "Fields out of step: {:?}", session);
            if session.current_step >= Step::Confirmation {
                prop_assert!(session.is_fully_collected());
            }
        }
    }

    // Invariant 3: an order is submitted only on confirmation -> complete
    #[test]
    fn prop_submit_only_on_confirm(step in arb_step(), event in arb_event()) {
        let session = session_at(step);
        let result = transition(&session, event);
        let submits = result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::SubmitOrder { .. }));
        let confirmed = session.current_step == Step::Confirmation
            && result.new_session.current_step == Step::Complete;
        prop_assert_eq!(submits, confirmed);
        if submits {
            prop_assert!(result.is_complete);
        }
    }

    // Invariant 4: a completed order carries exactly the answers given
    #[test]
    fn prop_record_matches_answers(answers in proptest::collection::vec(arb_answer(), 8)) {
        let mut session = DialogueSession::new();
        advance(&mut session, "yes");
        for answer in &answers {
            let outcome = advance(&mut session, answer);
            prop_assert!(!outcome.is_complete);
        }
        prop_assert_eq!(session.current_step, Step::Confirmation);

        let outcome = advance(&mut session, "yes");
        prop_assert!(outcome.is_complete);
        let record = outcome.record.expect("confirmed order has a record");
        let draft = session.to_draft();
        prop_assert_eq!(draft.customer_name.as_deref(), Some(answers[0].trim()));
        prop_assert_eq!(draft.special_instructions.as_deref(), Some(answers[7].trim()));
        prop_assert_eq!(record.customer_name, answers[0].trim());
        prop_assert_eq!(record.phone_number, answers[1].trim());
        prop_assert_eq!(record.address, answers[2].trim());
        prop_assert_eq!(record.meal_type, answers[3].trim());
        prop_assert_eq!(record.quantity, crate::db::parse_quantity(&answers[4]));
        prop_assert_eq!(record.delivery_time, answers[5].trim());
        prop_assert_eq!(record.dietary_preferences, answers[6].trim());
        prop_assert_eq!(record.special_instructions, answers[7].trim());
    }

    // Invariant 5: the engine is total; the reply is never empty
    #[test]
    fn prop_every_input_gets_a_reply(step in arb_step(), text in arb_utterance()) {
        let result = transition(&session_at(step), Event::reply(text));
        prop_assert!(!result.reply.is_empty());
    }

    // Invariant 6: greeting either advances, ends, or re-prompts; it never stores
    #[test]
    fn prop_greeting_stores_nothing(text in arb_utterance()) {
        let result = transition(&DialogueSession::new(), Event::reply(text));
        prop_assert!(result.new_session.collected_fields.is_empty());
        prop_assert!(matches!(
            result.new_session.current_step,
            Step::Greeting | Step::AskName
        ));
    }

    // Invariant 7: restart always lands on a clean greeting
    #[test]
    fn prop_restart_resets(step in arb_step()) {
        let result = transition(&session_at(step), Event::Restart);
        prop_assert_eq!(result.new_session, DialogueSession::new());
        prop_assert!(!result.is_complete);
    }
}
