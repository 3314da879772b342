//! Kitchen view of the order list
//!
//! The kitchen re-reads the whole list on every poll, spots new arrivals by
//! comparing counts, and may only move an order one status forward.

use crate::db::{DbError, DbResult, OrderRecord, OrderStatus, OrderStore};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KitchenError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Order {0} is already delivered")]
    AlreadyDelivered(String),
    #[error(transparent)]
    Storage(DbError),
}

impl From<DbError> for KitchenError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::OrderNotFound(id) => KitchenError::NotFound(id),
            other => KitchenError::Storage(other),
        }
    }
}

/// An order as the kitchen sees it, with the one action it may take
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KitchenCard {
    #[serde(flatten)]
    pub order: OrderRecord,
    #[serde(rename = "nextStatus")]
    pub next_status: Option<OrderStatus>,
}

impl From<OrderRecord> for KitchenCard {
    fn from(order: OrderRecord) -> Self {
        let next_status = order.status.next();
        Self { order, next_status }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub new: usize,
    pub preparing: usize,
    pub delivered: usize,
}

impl StatusCounts {
    fn tally(orders: &[OrderRecord]) -> Self {
        orders.iter().fold(Self::default(), |mut counts, order| {
            match order.status {
                OrderStatus::New => counts.new += 1,
                OrderStatus::Preparing => counts.preparing += 1,
                OrderStatus::Delivered => counts.delivered += 1,
            }
            counts
        })
    }
}

/// Result of one kitchen poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KitchenSnapshot {
    pub orders: Vec<KitchenCard>,
    pub total: usize,
    /// Orders that appeared since the previous poll
    pub new_arrivals: usize,
    pub counts: StatusCounts,
}

/// Polling state of one kitchen screen
#[derive(Debug, Clone, Default)]
pub struct KitchenBoard {
    last_count: Option<usize>,
}

impl KitchenBoard {
    /// Continue from a count seen by an earlier poll
    pub fn resume(last_count: Option<usize>) -> Self {
        Self { last_count }
    }

    pub async fn poll(&mut self, store: &dyn OrderStore) -> DbResult<KitchenSnapshot> {
        let orders = store.list().await?;
        Ok(self.observe(orders))
    }

    /// Build a snapshot from a fresh list. The first observation never
    /// reports arrivals.
    pub fn observe(&mut self, orders: Vec<OrderRecord>) -> KitchenSnapshot {
        let total = orders.len();
        let new_arrivals = self
            .last_count
            .map_or(0, |previous| total.saturating_sub(previous));
        self.last_count = Some(total);

        if new_arrivals > 0 {
            tracing::info!(new_arrivals, total, "New orders received");
        }

        KitchenSnapshot {
            counts: StatusCounts::tally(&orders),
            orders: orders.into_iter().map(KitchenCard::from).collect(),
            total,
            new_arrivals,
        }
    }
}

/// Move one order to its next status.
pub async fn advance_order(store: &dyn OrderStore, id: &str) -> Result<OrderRecord, KitchenError> {
    let current = store
        .list()
        .await?
        .into_iter()
        .find(|o| o.id == id)
        .ok_or_else(|| KitchenError::NotFound(id.to_string()))?;

    let next = current
        .status
        .next()
        .ok_or_else(|| KitchenError::AlreadyDelivered(id.to_string()))?;

    Ok(store.update_status(id, next).await?)
}
