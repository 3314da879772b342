//! Server configuration from the environment

use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8000;

/// Which order store backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// One JSON array in a file
    #[default]
    Json,
    Sqlite,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" | "file" => Some(StoreBackend::Json),
            "sqlite" | "db" => Some(StoreBackend::Sqlite),
            _ => None,
        }
    }

    fn default_path(self) -> PathBuf {
        match self {
            StoreBackend::Json => PathBuf::from("data/orders.json"),
            StoreBackend::Sqlite => PathBuf::from("data/orders.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub backend: StoreBackend,
    pub data_path: PathBuf,
}

impl ServerConfig {
    /// Read `TIFFIN_PORT`, `TIFFIN_STORE` and `TIFFIN_DATA_PATH`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("TIFFIN_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let backend = match lookup("TIFFIN_STORE") {
            Some(value) => StoreBackend::parse(&value).unwrap_or_else(|| {
                tracing::warn!(value = %value, "Unknown TIFFIN_STORE, using json");
                StoreBackend::Json
            }),
            None => StoreBackend::default(),
        };

        let data_path = lookup("TIFFIN_DATA_PATH")
            .filter(|p| !p.trim().is_empty())
            .map_or_else(|| backend.default_path(), PathBuf::from);

        Self {
            port,
            backend,
            data_path,
        }
    }
}
