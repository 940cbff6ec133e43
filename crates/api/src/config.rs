use lungrisk_core::concurrency::{validate_lease_secs, LockScope, DEFAULT_LOCK_LEASE_SECS};

use crate::auth::jwt::JwtConfig;

/// Default interval between expired-lock sweeps, in seconds.
pub const DEFAULT_LOCK_SWEEP_INTERVAL_SECS: u64 = 300;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5050`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Prediction write serialization settings.
    pub locks: LockSettings,
}

/// How prediction writes are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockSettings {
    /// Which submissions contend for the same lock.
    pub scope: LockScope,
    /// Lock lease in seconds.
    pub lease_secs: u64,
    /// Expired-lock sweep interval in seconds; `0` disables the sweeper.
    pub sweep_interval_secs: u64,
}

impl Default for LockSettings {
    fn default() -> Self {
        Self {
            scope: LockScope::default(),
            lease_secs: DEFAULT_LOCK_LEASE_SECS,
            sweep_interval_secs: DEFAULT_LOCK_SWEEP_INTERVAL_SECS,
        }
    }
}

impl LockSettings {
    /// Parse lock settings from raw (possibly absent) values.
    pub fn parse(
        scope: Option<&str>,
        lease_secs: Option<&str>,
        sweep_interval_secs: Option<&str>,
    ) -> Result<Self, String> {
        let defaults = Self::default();

        let scope = match scope {
            Some(raw) => raw.parse::<LockScope>()?,
            None => defaults.scope,
        };

        let lease_secs = match lease_secs {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("PREDICTION_LOCK_LEASE_SECS must be a valid u64, got '{raw}'"))?,
            None => defaults.lease_secs,
        };
        validate_lease_secs(lease_secs)?;

        let sweep_interval_secs = match sweep_interval_secs {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                format!("LOCK_SWEEP_INTERVAL_SECS must be a valid u64, got '{raw}'")
            })?,
            None => defaults.sweep_interval_secs,
        };

        Ok(Self {
            scope,
            lease_secs,
            sweep_interval_secs,
        })
    }

    /// Lease as a `chrono` duration for the lock table.
    pub fn lease(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.lease_secs as i64)
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `5050`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `PREDICTION_LOCK_SCOPE`      | `submitter`             |
    /// | `PREDICTION_LOCK_LEASE_SECS` | `30`                    |
    /// | `LOCK_SWEEP_INTERVAL_SECS`   | `300` (`0` disables)    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5050".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let locks = LockSettings::parse(
            std::env::var("PREDICTION_LOCK_SCOPE").ok().as_deref(),
            std::env::var("PREDICTION_LOCK_LEASE_SECS").ok().as_deref(),
            std::env::var("LOCK_SWEEP_INTERVAL_SECS").ok().as_deref(),
        )
        .unwrap_or_else(|e| panic!("Invalid lock configuration: {e}"));

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            locks,
        }
    }
}
