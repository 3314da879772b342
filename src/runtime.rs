//! Runtime for live ordering sessions
//!
//! Holds every in-progress conversation in memory, feeds replies through the
//! dialogue engine one at a time per session, and hands confirmed orders to
//! the store. Order changes are broadcast to kitchen subscribers.

use crate::db::{DbError, OrderDraft, OrderRecord, OrderStatus, OrderStore};
use crate::kitchen::{self, KitchenBoard, KitchenError, KitchenSnapshot};
use crate::state_machine::{self, Advance, DialogueSession};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex, RwLock};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),
    #[error("Failed to save order: {0}")]
    Storage(#[from] DbError),
}

/// Order changes pushed to kitchen subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    OrderCreated { order: OrderRecord },
    OrderUpdated { order: OrderRecord },
}

type SessionHandle = Arc<Mutex<DialogueSession>>;

/// Manager for all ordering sessions
pub struct SessionManager {
    store: Arc<dyn OrderStore>,
    sessions: RwLock<HashMap<String, SessionHandle>>,
    order_tx: broadcast::Sender<OrderEvent>,
    /// Kitchen advances read then write; one at a time keeps them forward-only
    kitchen_lock: Mutex<()>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        let (order_tx, _) = broadcast::channel(128);
        Self {
            store,
            sessions: RwLock::new(HashMap::new()),
            order_tx,
            kitchen_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &dyn OrderStore {
        self.store.as_ref()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.order_tx.subscribe()
    }

    // ==================== Sessions ====================

    /// Open a new conversation; returns its id and the greeting
    pub async fn start_session(&self) -> (String, String) {
        let id = uuid::Uuid::new_v4().to_string();
        let session = DialogueSession::new();
        let greeting = state_machine::script::prompt_for(&session);

        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        tracing::info!(session_id = %id, "Session started");

        (id, greeting)
    }

    async fn handle(&self, id: &str) -> Result<SessionHandle, SessionError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    pub async fn session(&self, id: &str) -> Result<DialogueSession, SessionError> {
        let handle = self.handle(id).await?;
        let session = handle.lock().await.clone();
        Ok(session)
    }

    /// Feed one customer reply into a session.
    ///
    /// A confirmed order is stored before the session moves on; if storing
    /// fails the session stays at confirmation so the customer can confirm
    /// again. A finished conversation is dropped once it has replied.
    pub async fn send_reply(&self, id: &str, text: &str) -> Result<Advance, SessionError> {
        let handle = self.handle(id).await?;
        let outcome = self.advance_session(id, &handle, text).await?;

        if outcome.is_complete {
            self.sessions.write().await.remove(id);
            tracing::info!(session_id = %id, "Session finished");
        }
        Ok(outcome)
    }

    async fn advance_session(
        &self,
        id: &str,
        handle: &SessionHandle,
        text: &str,
    ) -> Result<Advance, SessionError> {
        let mut session = handle.lock().await;

        let mut next = session.clone();
        let mut outcome = state_machine::advance(&mut next, text);

        if let Some(record) = outcome.record.take() {
            let stored = match self.store.append(record).await {
                Ok(stored) => stored,
                Err(e) => {
                    tracing::error!(session_id = %id, error = %e, "Failed to store confirmed order");
                    return Err(e.into());
                }
            };
            tracing::info!(session_id = %id, order_id = %stored.id, "Order placed");
            self.publish(OrderEvent::OrderCreated {
                order: stored.clone(),
            });
            outcome.record = Some(stored);
        }

        tracing::debug!(
            session_id = %id,
            from = ?session.current_step,
            to = ?next.current_step,
            "Session advanced"
        );
        *session = next;
        Ok(outcome)
    }

    /// Start a session over; returns the greeting
    pub async fn restart_session(&self, id: &str) -> Result<String, SessionError> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        tracing::info!(session_id = %id, "Session restarted");
        Ok(state_machine::restart(&mut session))
    }

    pub async fn end_session(&self, id: &str) -> Result<(), SessionError> {
        if self.sessions.write().await.remove(id).is_none() {
            return Err(SessionError::NotFound(id.to_string()));
        }
        let active = self.session_count().await;
        tracing::info!(session_id = %id, active, "Session ended");
        Ok(())
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    // ==================== Orders ====================

    pub async fn list_orders(&self) -> Result<Vec<OrderRecord>, DbError> {
        self.store.list().await
    }

    /// Create an order directly, bypassing the conversation
    pub async fn create_order(&self, draft: OrderDraft) -> Result<OrderRecord, DbError> {
        let order = self.store.create(draft).await?;
        self.publish(OrderEvent::OrderCreated {
            order: order.clone(),
        });
        Ok(order)
    }

    /// Overwrite an order's status, whatever it was
    pub async fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<OrderRecord, DbError> {
        let order = self.store.update_status(id, status).await?;
        self.publish(OrderEvent::OrderUpdated {
            order: order.clone(),
        });
        Ok(order)
    }

    // ==================== Kitchen ====================

    pub async fn kitchen_snapshot(
        &self,
        last_count: Option<usize>,
    ) -> Result<KitchenSnapshot, DbError> {
        KitchenBoard::resume(last_count).poll(self.store()).await
    }

    /// Move an order one status forward
    pub async fn advance_order(&self, id: &str) -> Result<OrderRecord, KitchenError> {
        let _guard = self.kitchen_lock.lock().await;
        let order = kitchen::advance_order(self.store(), id).await?;
        self.publish(OrderEvent::OrderUpdated {
            order: order.clone(),
        });
        Ok(order)
    }

    fn publish(&self, event: OrderEvent) {
        // No subscribers is fine
        let _ = self.order_tx.send(event);
    }
}
