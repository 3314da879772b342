//! Order persistence
//!
//! Provides the shared order list that the chat flow writes to and the
//! kitchen reads from.

mod json_file;
mod schema;
mod sqlite;

pub use json_file::JsonFileStore;
pub use schema::*;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed order data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Order not found: {0}")]
    OrderNotFound(String),
    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Shared, durable list of orders, most recent first
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert a record at the front of the list.
    ///
    /// A record whose id is already taken is stored under a fresh id; the
    /// stored version is returned.
    async fn append(&self, record: OrderRecord) -> DbResult<OrderRecord>;

    /// Snapshot of every order, most recent first
    async fn list(&self) -> DbResult<Vec<OrderRecord>>;

    /// Overwrite the status of one order.
    ///
    /// No ordering between statuses is enforced here.
    async fn update_status(&self, id: &str, status: OrderStatus) -> DbResult<OrderRecord>;

    /// Build a record from a draft and append it
    async fn create(&self, draft: OrderDraft) -> DbResult<OrderRecord> {
        let record = OrderRecord::from_draft(next_order_id(), draft, Utc::now());
        self.append(record).await
    }
}

#[async_trait]
impl<T: OrderStore + ?Sized> OrderStore for Arc<T> {
    async fn append(&self, record: OrderRecord) -> DbResult<OrderRecord> {
        (**self).append(record).await
    }

    async fn list(&self) -> DbResult<Vec<OrderRecord>> {
        (**self).list().await
    }

    async fn update_status(&self, id: &str, status: OrderStatus) -> DbResult<OrderRecord> {
        (**self).update_status(id, status).await
    }
}

static LAST_ORDER_ID: AtomicI64 = AtomicI64::new(0);

/// Generate an order id.
///
/// Ids are epoch milliseconds, bumped so that every id handed out by this
/// process is strictly greater than the previous one.
pub fn next_order_id() -> String {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ORDER_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_ORDER_ID.compare_exchange_weak(
            last,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate.to_string(),
            Err(actual) => last = actual,
        }
    }
}

/// Give `record` an id no existing order uses
fn ensure_unique_id(
    record: &mut OrderRecord,
    mut taken: impl FnMut(&str) -> DbResult<bool>,
) -> DbResult<()> {
    while taken(&record.id)? {
        let fresh = next_order_id();
        tracing::warn!(old_id = %record.id, new_id = %fresh, "Order id already taken, reassigning");
        record.id = fresh;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_order_ids_strictly_increase() {
        let ids: Vec<i64> = (0..1000)
            .map(|_| next_order_id().parse().unwrap())
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_order_ids_unique_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| (0..200).map(|_| next_order_id()).collect::<Vec<_>>()))
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate order id");
            }
        }
        assert_eq!(seen.len(), 1600);
    }

    #[test]
    fn test_ensure_unique_id_reassigns_on_collision() {
        let mut record = OrderRecord::from_draft("7", OrderDraft::default(), Utc::now());
        let existing = ["7".to_string()];
        ensure_unique_id(&mut record, |id| Ok(existing.iter().any(|e| e == id))).unwrap();
        assert_ne!(record.id, "7");
    }
}
