//! # API Configuration Module
//!
//! Loads the server and workshop configuration from environment variables,
//! with defaults matching a small single-location workshop.
//!
//! ## Environment Variables
//!
//! - `ATELIER_HOST`: bind address (default: "0.0.0.0")
//! - `ATELIER_PORT`: port to listen on (default: 3000)
//! - `ATELIER_DATA_DIR`: root directory for the JSON document stores
//!   (default: "./data"; `weeks/`, `clients/` and `requests/` live under it)
//! - `LOG_LEVEL`: logging level (default: "info")
//! - `ATELIER_CORS_ORIGINS`: comma-separated list of allowed CORS origins
//! - `ATELIER_REQUEST_TIMEOUT_SECONDS`: request timeout (default: 30)
//! - `ATELIER_SLOT_TIMES`: default slot start times, comma-separated `HH:MM`
//!   (default: "09:00,11:00,14:00,16:00")
//! - `ATELIER_SLOT_DURATION_HOURS`: duration of each default slot (default: 2)
//! - `ATELIER_CLOSED_DAYS`: comma-separated lowercase weekday names the
//!   workshop stays closed (default: "sunday")
//! - `ATELIER_YEAR_MIN` / `ATELIER_YEAR_MAX`: accepted week-key year range
//!   (default: 2020..=2035)
//! - `ATELIER_CLIENT_ID_WIDTH` / `ATELIER_CLIENT_ID_ATTEMPTS`: client
//!   identifier namespace (default: 4 digits, 100 attempts)
//! - `ATELIER_REQUEST_ID_WIDTH` / `ATELIER_REQUEST_ID_ATTEMPTS`: request
//!   identifier namespace (default: 5 digits, 1000 attempts)
//! - `ATELIER_CLEANUP_MAX_AGE_DAYS`: default age for request cleanup
//!   (default: 30)

use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use atelier_core::models::week::{SlotTemplate, WeekTemplate, Weekday};
use atelier_store::IdNamespace;
use chrono::NaiveTime;
use eyre::{Result, WrapErr};
use tracing::Level;

/// Configuration for the atelier API server and the workshop's weekly shape.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// Root directory for the per-entity JSON stores
    pub data_dir: PathBuf,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Default slot start times applied to every open day
    pub slot_times: Vec<NaiveTime>,

    /// Duration in whole hours of each default slot
    pub slot_duration_hours: u32,

    /// Weekdays the workshop is closed
    pub closed_days: Vec<Weekday>,

    /// Years for which week keys are accepted
    pub valid_years: RangeInclusive<i32>,

    /// Client identifier namespace: suffix width and retry bound
    pub client_id_width: usize,
    pub client_id_attempts: u32,

    /// Request identifier namespace: suffix width and retry bound
    pub request_id_width: usize,
    pub request_id_attempts: u32,

    /// Default maximum age for `cleanupOldRequests`
    pub cleanup_max_age_days: i64,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables, providing
    /// defaults where sensible.
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("ATELIER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("ATELIER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid ATELIER_PORT value")?;

        // Storage settings
        let data_dir =
            PathBuf::from(env::var("ATELIER_DATA_DIR").unwrap_or_else(|_| "./data".to_string()));

        // Logging settings
        let log_level = match env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = env::var("ATELIER_CORS_ORIGINS")
            .ok()
            .map(|origins| origins.split(',').map(|s| s.trim().to_string()).collect());

        // Performance settings
        let request_timeout = env::var("ATELIER_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Workshop settings
        let slot_times = env::var("ATELIER_SLOT_TIMES")
            .unwrap_or_else(|_| "09:00,11:00,14:00,16:00".to_string())
            .split(',')
            .map(|s| {
                NaiveTime::parse_from_str(s.trim(), "%H:%M")
                    .wrap_err_with(|| format!("Invalid slot time in ATELIER_SLOT_TIMES: {s}"))
            })
            .collect::<Result<Vec<_>>>()?;

        let slot_duration_hours = env::var("ATELIER_SLOT_DURATION_HOURS")
            .unwrap_or_else(|_| "2".to_string())
            .parse()
            .wrap_err("Invalid ATELIER_SLOT_DURATION_HOURS value")?;

        let closed_days = env::var("ATELIER_CLOSED_DAYS")
            .unwrap_or_else(|_| "sunday".to_string())
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| Ok(s.trim().parse::<Weekday>()?))
            .collect::<Result<Vec<_>>>()?;

        let year_min = env::var("ATELIER_YEAR_MIN")
            .unwrap_or_else(|_| "2020".to_string())
            .parse()
            .wrap_err("Invalid ATELIER_YEAR_MIN value")?;
        let year_max = env::var("ATELIER_YEAR_MAX")
            .unwrap_or_else(|_| "2035".to_string())
            .parse()
            .wrap_err("Invalid ATELIER_YEAR_MAX value")?;

        let client_id_width = parse_or("ATELIER_CLIENT_ID_WIDTH", 4)?;
        let client_id_attempts = parse_or("ATELIER_CLIENT_ID_ATTEMPTS", 100)?;
        let request_id_width = parse_or("ATELIER_REQUEST_ID_WIDTH", 5)?;
        let request_id_attempts = parse_or("ATELIER_REQUEST_ID_ATTEMPTS", 1000)?;
        let cleanup_max_age_days = parse_or("ATELIER_CLEANUP_MAX_AGE_DAYS", 30)?;

        Ok(Self {
            host,
            port,
            data_dir,
            log_level,
            cors_origins,
            request_timeout,
            slot_times,
            slot_duration_hours,
            closed_days,
            valid_years: year_min..=year_max,
            client_id_width,
            client_id_attempts,
            request_id_width,
            request_id_attempts,
            cleanup_max_age_days,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:3000")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The weekly template used when synthesizing default week documents.
    pub fn week_template(&self) -> WeekTemplate {
        WeekTemplate {
            slots: self
                .slot_times
                .iter()
                .map(|&time| SlotTemplate {
                    time,
                    duration: self.slot_duration_hours,
                })
                .collect(),
            closed_days: self.closed_days.clone(),
        }
    }

    pub fn client_namespace(&self) -> IdNamespace {
        IdNamespace::new("client_", self.client_id_width, self.client_id_attempts)
    }

    pub fn request_namespace(&self) -> IdNamespace {
        IdNamespace::new("req_", self.request_id_width, self.request_id_attempts)
    }
}

fn parse_or<T: std::str::FromStr>(var: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(var) {
        Ok(value) => value.parse().wrap_err_with(|| format!("Invalid {var} value")),
        Err(_) => Ok(default),
    }
}
