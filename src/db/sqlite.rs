//! Order store backed by SQLite

use super::{
    ensure_unique_id, DbError, DbResult, OrderRecord, OrderStatus, OrderStore, SCHEMA,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_ORDER: &str = "SELECT id, customer_name, phone_number, address, meal_type, quantity,
        delivery_time, dietary_preferences, special_instructions, timestamp, status
 FROM orders";

/// Thread-safe database handle
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> DbResult<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    fn conn(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    fn get_order(conn: &Connection, id: &str) -> DbResult<OrderRecord> {
        conn.query_row(
            &format!("{SELECT_ORDER} WHERE id = ?1"),
            params![id],
            parse_order_row,
        )
        .optional()?
        .ok_or_else(|| DbError::OrderNotFound(id.to_string()))
    }
}

#[async_trait]
impl OrderStore for SqliteStore {
    async fn append(&self, mut record: OrderRecord) -> DbResult<OrderRecord> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        ensure_unique_id(&mut record, |id| {
            let count: i64 = tx.query_row(
                "SELECT COUNT(*) FROM orders WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })?;

        tx.execute(
            "INSERT INTO orders (id, customer_name, phone_number, address, meal_type, quantity,
                                 delivery_time, dietary_preferences, special_instructions, timestamp, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                record.id,
                record.customer_name,
                record.phone_number,
                record.address,
                record.meal_type,
                record.quantity,
                record.delivery_time,
                record.dietary_preferences,
                record.special_instructions,
                record.timestamp.to_rfc3339(),
                record.status.as_str(),
            ],
        )?;
        tx.commit()?;

        tracing::info!(order_id = %record.id, "Order appended");
        Ok(record)
    }

    async fn list(&self) -> DbResult<Vec<OrderRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{SELECT_ORDER} ORDER BY seq DESC"))?;
        let rows = stmt.query_map([], parse_order_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    async fn update_status(&self, id: &str, status: OrderStatus) -> DbResult<OrderRecord> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE orders SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        if changed == 0 {
            return Err(DbError::OrderNotFound(id.to_string()));
        }

        tracing::info!(order_id = %id, %status, "Order status updated");
        Self::get_order(&conn, id)
    }
}

/// Parse an order row from the database
fn parse_order_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderRecord> {
    let status: String = row.get(10)?;
    let status = status
        .parse::<OrderStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e)))?;

    Ok(OrderRecord {
        id: row.get(0)?,
        customer_name: row.get(1)?,
        phone_number: row.get(2)?,
        address: row.get(3)?,
        meal_type: row.get(4)?,
        quantity: row.get(5)?,
        delivery_time: row.get(6)?,
        dietary_preferences: row.get(7)?,
        special_instructions: row.get(8)?,
        timestamp: parse_datetime(9, &row.get::<_, String>(9)?)?,
        status,
    })
}

fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}
