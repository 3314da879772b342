//! Order store backed by a single JSON file
//!
//! The whole list is rewritten on every change. Writers are serialized by a
//! lock and each rewrite lands through a temp file and rename, so readers
//! always see a complete list.

use super::{ensure_unique_id, DbError, DbResult, OrderRecord, OrderStatus, OrderStore};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating its directory if needed.
    ///
    /// The file itself is created on first write.
    pub async fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    #[allow(dead_code)] // Used in tests
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> DbResult<Vec<OrderRecord>> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(DbError::Io(e)),
        }
    }

    async fn write_all(&self, orders: &[OrderRecord]) -> DbResult<()> {
        let data = serde_json::to_vec_pretty(orders)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, &data).await?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(DbError::Io(e));
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl OrderStore for JsonFileStore {
    async fn append(&self, mut record: OrderRecord) -> DbResult<OrderRecord> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.read_all().await?;

        ensure_unique_id(&mut record, |id| Ok(orders.iter().any(|o| o.id == id)))?;
        orders.insert(0, record.clone());
        self.write_all(&orders).await?;

        tracing::info!(order_id = %record.id, path = %self.path.display(), "Order appended");
        Ok(record)
    }

    async fn list(&self) -> DbResult<Vec<OrderRecord>> {
        self.read_all().await
    }

    async fn update_status(&self, id: &str, status: OrderStatus) -> DbResult<OrderRecord> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.read_all().await?;

        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| DbError::OrderNotFound(id.to_string()))?;
        order.status = status;
        let updated = order.clone();
        self.write_all(&orders).await?;

        tracing::info!(order_id = %id, %status, "Order status updated");
        Ok(updated)
    }
}
