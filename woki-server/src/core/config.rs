//! Server Configuration
//!
//! All configuration comes from environment variables (a `.env` file is
//! loaded first if present).
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `WORK_DIR` | `/var/lib/woki` | Root for database and log files |
//! | `HTTP_PORT` | `3000` | Listen port |
//! | `STORAGE` | `surreal` | `surreal` or `memory` |
//! | `LOG_LEVEL` | `info` | tracing filter level |
//! | `ENVIRONMENT` | `production` | Free-form environment label |
//! | `WEBHOOK_URLS` | _(empty)_ | Comma-separated webhook endpoints |
//! | `IDEMPOTENCY_TTL_HOURS` | `24` | Idempotency key lifetime |
//! | `MAX_COMBO_TABLES` | `4` | Cap on tables per combination |
//! | `REQUEST_TIMEOUT_MS` | `30000` | Per-request timeout |

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Surreal,
    Memory,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Surreal => "surreal",
            StorageKind::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: PathBuf,
    pub http_port: u16,
    pub storage: StorageKind,
    pub log_level: String,
    pub environment: String,
    pub webhook_urls: Vec<String>,
    pub idempotency_ttl_hours: i64,
    pub max_combo_tables: usize,
    pub request_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let work_dir = env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/woki".to_string());

        let http_port = env::var("HTTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        let storage = match env::var("STORAGE").as_deref() {
            Ok("memory") => StorageKind::Memory,
            _ => StorageKind::Surreal,
        };

        let webhook_urls = env::var("WEBHOOK_URLS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let idempotency_ttl_hours = env::var("IDEMPOTENCY_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(24);

        let max_combo_tables = env::var("MAX_COMBO_TABLES")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v >= 2)
            .unwrap_or(crate::allocation::DEFAULT_MAX_COMBO_TABLES);

        let request_timeout_ms = env::var("REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30_000);

        Self {
            work_dir: PathBuf::from(work_dir),
            http_port,
            storage,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()),
            webhook_urls,
            idempotency_ttl_hours,
            max_combo_tables,
            request_timeout_ms,
        }
    }

    pub fn database_dir(&self) -> PathBuf {
        self.work_dir.join("db")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.work_dir.join("logs")
    }

    /// Create the working directory layout if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}
