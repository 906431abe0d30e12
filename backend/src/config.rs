//! Server configuration read from `CERTVERIFY_*` environment variables.
//!
//! Unset or unparsable values fall back to the defaults, so a bare
//! `certverify` starts a local demo server on `127.0.0.1:8080`.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_VERIFY_LATENCY_MS: u64 = 3000;
pub const DEFAULT_MAX_DATASET_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_JOB_RETENTION_SECS: u64 = 60 * 60;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file holding datasets and verification history.
    pub database_path: PathBuf,
    /// Directory accepted certificate documents are saved into.
    pub upload_dir: PathBuf,
    /// Delay before a verification job starts extracting.
    pub verify_latency: Duration,
    pub seed_demo_data: bool,
    pub max_dataset_bytes: usize,
    pub job_channel_capacity: usize,
    /// How long a finished job's status stays readable.
    pub job_retention: Duration,
    /// Sessions untouched for this long are dropped with their stored copy.
    pub session_idle_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            database_path: PathBuf::from("certverify.sqlite"),
            upload_dir: PathBuf::from("uploads"),
            verify_latency: Duration::from_millis(DEFAULT_VERIFY_LATENCY_MS),
            seed_demo_data: true,
            max_dataset_bytes: DEFAULT_MAX_DATASET_BYTES,
            job_channel_capacity: 100,
            job_retention: Duration::from_secs(DEFAULT_JOB_RETENTION_SECS),
            session_idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        let parsed = |name: &str| lookup(name).map(|v| v.trim().to_string());

        AppConfig {
            host: parsed("CERTVERIFY_HOST")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.host),
            port: parsed("CERTVERIFY_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            database_path: parsed("CERTVERIFY_DATABASE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            upload_dir: parsed("CERTVERIFY_UPLOAD_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            verify_latency: parsed("CERTVERIFY_VERIFY_LATENCY_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.verify_latency),
            seed_demo_data: parsed("CERTVERIFY_SEED_DEMO_DATA")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.seed_demo_data),
            max_dataset_bytes: parsed("CERTVERIFY_MAX_DATASET_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_dataset_bytes),
            job_channel_capacity: parsed("CERTVERIFY_JOB_CHANNEL_CAPACITY")
                .and_then(|v| v.parse().ok())
                .filter(|&v: &usize| v > 0)
                .unwrap_or(defaults.job_channel_capacity),
            job_retention: parsed("CERTVERIFY_JOB_RETENTION_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.job_retention),
            session_idle_timeout: parsed("CERTVERIFY_SESSION_IDLE_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|&v| v > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_idle_timeout),
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.bind_address(), ("127.0.0.1".to_string(), 8080));
        assert_eq!(config.verify_latency, Duration::from_millis(3000));
        assert!(config.seed_demo_data);
        assert_eq!(config.database_path, PathBuf::from("certverify.sqlite"));
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("CERTVERIFY_HOST", "0.0.0.0"),
            ("CERTVERIFY_PORT", "9090"),
            ("CERTVERIFY_VERIFY_LATENCY_MS", "0"),
            ("CERTVERIFY_SEED_DEMO_DATA", "no"),
            ("CERTVERIFY_UPLOAD_DIR", "/tmp/certs"),
            ("CERTVERIFY_JOB_RETENTION_SECS", "120"),
            ("CERTVERIFY_SESSION_IDLE_SECS", "900"),
        ]);
        assert_eq!(config.bind_address(), ("0.0.0.0".to_string(), 9090));
        assert_eq!(config.verify_latency, Duration::ZERO);
        assert!(!config.seed_demo_data);
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/certs"));
        assert_eq!(config.job_retention, Duration::from_secs(120));
        assert_eq!(config.session_idle_timeout, Duration::from_secs(900));
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("CERTVERIFY_PORT", "eighty"),
            ("CERTVERIFY_SEED_DEMO_DATA", "maybe"),
            ("CERTVERIFY_JOB_CHANNEL_CAPACITY", "0"),
            ("CERTVERIFY_SESSION_IDLE_SECS", "0"),
        ]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.seed_demo_data);
        assert_eq!(config.job_channel_capacity, 100);
        assert_eq!(
            config.session_idle_timeout,
            Duration::from_secs(DEFAULT_SESSION_IDLE_SECS)
        );
    }
}
