use std::{env, fmt::Display, net::IpAddr, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_DB_PATH: &str = "./db.json";
pub const DEFAULT_ROTATION_SECS: &str = "86400";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("VOTES_ROTATION_SECS must be greater than zero")]
    ZeroRotationInterval,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub address: IpAddr,
    pub port: u16,
    pub db_path: PathBuf,
    pub rotation_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            rotation_interval: Duration::from_secs(86_400),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let rotation_secs: u64 = try_load("VOTES_ROTATION_SECS", DEFAULT_ROTATION_SECS)?;
        if rotation_secs == 0 {
            return Err(ConfigError::ZeroRotationInterval);
        }

        Ok(Self {
            address: try_load("VOTES_ADDRESS", DEFAULT_ADDRESS)?,
            port: try_load("VOTES_PORT", DEFAULT_PORT)?,
            db_path: try_load("VOTES_DB_PATH", DEFAULT_DB_PATH)?,
            rotation_interval: Duration::from_secs(rotation_secs),
        })
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    parse_value(key, &value)
}

pub(crate) fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}
