//! Dialogue engine
//!
//! Applies `transition` to a session in place and turns a confirmed order
//! into a record ready for the store.

use super::state::DialogueSession;
use super::{transition, Effect, Event};
use crate::db::{next_order_id, OrderRecord};
use chrono::Utc;

/// Outcome of one customer reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    pub reply: String,
    pub is_complete: bool,
    /// Present only on the reply that confirmed the order
    pub record: Option<OrderRecord>,
}

/// Feed one utterance into `session`.
pub fn advance(session: &mut DialogueSession, utterance: &str) -> Advance {
    apply(session, Event::reply(utterance))
}

/// Start `session` over and return the greeting
pub fn restart(session: &mut DialogueSession) -> String {
    apply(session, Event::Restart).reply
}

fn apply(session: &mut DialogueSession, event: Event) -> Advance {
    let result = transition(session, event);
    *session = result.new_session;

    let record = result.effects.into_iter().find_map(|effect| match effect {
        Effect::SubmitOrder { draft } => {
            Some(OrderRecord::from_draft(next_order_id(), draft, Utc::now()))
        }
        Effect::EndConversation => None,
    });

    Advance {
        reply: result.reply,
        is_complete: result.is_complete,
        record,
    }
}
