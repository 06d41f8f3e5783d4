//! Configuration module
//!
//! Env-based configuration for the delivery pipeline, the redirect service,
//! and the operator CLI. Binaries load `.env` via `dotenvy` before calling
//! `Config::from_env()`.

use std::env;
use std::str::FromStr;

const DEFAULT_SHEETS_RANGE: &str = "Sheet1!A2:D1000";
const DEFAULT_PROVIDER_FOLDER_BASE_URL: &str = "https://drive.google.com/drive/folders";
const DEFAULT_LEDGER_PATH: &str = "redirects.json";
const DEFAULT_DELIVERY_LOG_PATH: &str = "delivery_log.jsonl";
const DEFAULT_REDIRECT_PORT: u16 = 3000;
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_EXTERNAL_CALL_TIMEOUT_SECS: u64 = 30;

/// Alias Ledger backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerBackend {
    File,
    Postgres,
}

impl FromStr for LedgerBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(LedgerBackend::File),
            "postgres" | "pg" => Ok(LedgerBackend::Postgres),
            other => Err(format!("Unknown ledger backend: {}", other)),
        }
    }
}

/// Remote storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Drive,
    Local,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drive" => Ok(StorageBackend::Drive),
            "local" => Ok(StorageBackend::Local),
            other => Err(format!("Unknown storage backend: {}", other)),
        }
    }
}

/// Application configuration, loaded once per process from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    environment: String,
    // Recipient source (spreadsheet)
    spreadsheet_id: Option<String>,
    sheets_range: String,
    google_api_token: Option<String>,
    // Remote storage
    storage_backend: StorageBackend,
    drive_parent_folder_id: Option<String>,
    local_storage_path: Option<String>,
    local_storage_base_url: Option<String>,
    // Short links
    public_base_url: Option<String>,
    provider_folder_base_url: String,
    // Alias ledger
    ledger_backend: LedgerBackend,
    ledger_path: String,
    database_url: Option<String>,
    // Audit log
    delivery_log_path: String,
    // Email
    smtp_host: Option<String>,
    smtp_port: u16,
    smtp_user: Option<String>,
    smtp_password: Option<String>,
    smtp_from: Option<String>,
    smtp_tls: bool,
    email_template_path: Option<String>,
    signature_path: Option<String>,
    event_name: Option<String>,
    // Operator CLI
    images_dir: Option<String>,
    photographers_path: Option<String>,
    // Redirect service
    redirect_port: u16,
    redirect_api_secret: Option<String>,
    linktree_url: Option<String>,
    // External call bounds
    external_call_timeout_secs: u64,
}

fn opt_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let storage_backend = opt_var("STORAGE_BACKEND")
            .map(|v| StorageBackend::from_str(&v))
            .transpose()
            .map_err(anyhow::Error::msg)?
            .unwrap_or(StorageBackend::Drive);

        let ledger_backend = opt_var("LEDGER_BACKEND")
            .map(|v| LedgerBackend::from_str(&v))
            .transpose()
            .map_err(anyhow::Error::msg)?
            .unwrap_or(LedgerBackend::File);

        let redirect_port = opt_var("REDIRECT_PORT")
            .map(|v| v.parse::<u16>())
            .transpose()?
            .unwrap_or(DEFAULT_REDIRECT_PORT);

        let smtp_port = opt_var("SMTP_PORT")
            .map(|v| v.parse::<u16>())
            .transpose()?
            .unwrap_or(DEFAULT_SMTP_PORT);

        let external_call_timeout_secs = opt_var("EXTERNAL_CALL_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()?
            .unwrap_or(DEFAULT_EXTERNAL_CALL_TIMEOUT_SECS);

        let smtp_tls = opt_var("SMTP_TLS")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        Ok(Config {
            environment: opt_var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            spreadsheet_id: opt_var("SPREADSHEET_ID"),
            sheets_range: opt_var("SHEETS_RANGE")
                .unwrap_or_else(|| DEFAULT_SHEETS_RANGE.to_string()),
            google_api_token: opt_var("GOOGLE_API_TOKEN"),
            storage_backend,
            drive_parent_folder_id: opt_var("DRIVE_PARENT_FOLDER_ID"),
            local_storage_path: opt_var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: opt_var("LOCAL_STORAGE_BASE_URL"),
            public_base_url: opt_var("PUBLIC_BASE_URL"),
            provider_folder_base_url: opt_var("PROVIDER_FOLDER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PROVIDER_FOLDER_BASE_URL.to_string()),
            ledger_backend,
            ledger_path: opt_var("LEDGER_PATH").unwrap_or_else(|| DEFAULT_LEDGER_PATH.to_string()),
            database_url: opt_var("DATABASE_URL"),
            delivery_log_path: opt_var("DELIVERY_LOG_PATH")
                .unwrap_or_else(|| DEFAULT_DELIVERY_LOG_PATH.to_string()),
            smtp_host: opt_var("SMTP_HOST"),
            smtp_port,
            smtp_user: opt_var("SMTP_USER"),
            smtp_password: opt_var("SMTP_PASSWORD"),
            smtp_from: opt_var("SMTP_FROM"),
            smtp_tls,
            email_template_path: opt_var("EMAIL_TEMPLATE_PATH"),
            signature_path: opt_var("SIGNATURE_PATH"),
            event_name: opt_var("EVENT_NAME"),
            images_dir: opt_var("IMAGES_DIR"),
            photographers_path: opt_var("PHOTOGRAPHERS_PATH"),
            redirect_port,
            redirect_api_secret: opt_var("REDIRECT_API_SECRET"),
            linktree_url: opt_var("LINKTREE_URL"),
            external_call_timeout_secs,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Validate the settings the delivery pipeline needs up front, so the
    /// operator hears about missing configuration before the first attempt.
    pub fn validate_pipeline(&self) -> Result<(), anyhow::Error> {
        if self.spreadsheet_id.is_none() {
            anyhow::bail!("SPREADSHEET_ID not configured");
        }
        if self.public_base_url.is_none() {
            anyhow::bail!("PUBLIC_BASE_URL not configured");
        }
        match self.storage_backend {
            StorageBackend::Drive => {
                if self.google_api_token.is_none() {
                    anyhow::bail!("GOOGLE_API_TOKEN not configured");
                }
                if self.drive_parent_folder_id.is_none() {
                    anyhow::bail!("DRIVE_PARENT_FOLDER_ID not configured");
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    anyhow::bail!("LOCAL_STORAGE_PATH not configured");
                }
            }
        }
        if self.ledger_backend == LedgerBackend::Postgres && self.database_url.is_none() {
            anyhow::bail!("DATABASE_URL not configured for the postgres ledger backend");
        }
        if self.smtp_host.is_none() || self.smtp_from.is_none() {
            anyhow::bail!("SMTP_HOST and SMTP_FROM must be configured");
        }
        Ok(())
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn spreadsheet_id(&self) -> Option<&str> {
        self.spreadsheet_id.as_deref()
    }

    pub fn sheets_range(&self) -> &str {
        &self.sheets_range
    }

    pub fn google_api_token(&self) -> Option<&str> {
        self.google_api_token.as_deref()
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn drive_parent_folder_id(&self) -> Option<&str> {
        self.drive_parent_folder_id.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.local_storage_base_url.as_deref()
    }

    pub fn public_base_url(&self) -> Option<&str> {
        self.public_base_url.as_deref()
    }

    pub fn provider_folder_base_url(&self) -> &str {
        &self.provider_folder_base_url
    }

    pub fn ledger_backend(&self) -> LedgerBackend {
        self.ledger_backend
    }

    pub fn ledger_path(&self) -> &str {
        &self.ledger_path
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn delivery_log_path(&self) -> &str {
        &self.delivery_log_path
    }

    pub fn smtp_host(&self) -> Option<&str> {
        self.smtp_host.as_deref()
    }

    pub fn smtp_port(&self) -> u16 {
        self.smtp_port
    }

    pub fn smtp_user(&self) -> Option<&str> {
        self.smtp_user.as_deref()
    }

    pub fn smtp_password(&self) -> Option<&str> {
        self.smtp_password.as_deref()
    }

    pub fn smtp_from(&self) -> Option<&str> {
        self.smtp_from.as_deref()
    }

    pub fn smtp_tls(&self) -> bool {
        self.smtp_tls
    }

    pub fn email_template_path(&self) -> Option<&str> {
        self.email_template_path.as_deref()
    }

    pub fn signature_path(&self) -> Option<&str> {
        self.signature_path.as_deref()
    }

    pub fn event_name(&self) -> Option<&str> {
        self.event_name.as_deref()
    }

    pub fn images_dir(&self) -> Option<&str> {
        self.images_dir.as_deref()
    }

    pub fn photographers_path(&self) -> Option<&str> {
        self.photographers_path.as_deref()
    }

    pub fn redirect_port(&self) -> u16 {
        self.redirect_port
    }

    pub fn redirect_api_secret(&self) -> Option<&str> {
        self.redirect_api_secret.as_deref()
    }

    pub fn linktree_url(&self) -> Option<&str> {
        self.linktree_url.as_deref()
    }

    pub fn external_call_timeout_secs(&self) -> u64 {
        self.external_call_timeout_secs
    }
}
