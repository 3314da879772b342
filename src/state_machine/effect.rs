//! Effects produced by state transitions

use crate::db::OrderDraft;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The customer confirmed; turn the answers into an order
    SubmitOrder { draft: OrderDraft },

    /// The customer declined to order
    EndConversation,
}
