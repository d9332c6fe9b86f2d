//! Settings for the `space-dump` binary, read from the environment.
//!
//! A `.env` file in the working directory is loaded first when present.

use crate::error::{AddressError, ConfigError};
use crate::models::{Cidr, Range};
use std::env;

pub const ENV_RANGES: &str = "IPAM_RANGES";
pub const ENV_LOG_CONFIG: &str = "IPAM_LOG_CONFIG";
pub const ENV_CIDR_ALIGNED: &str = "IPAM_CIDR_ALIGNED";

const DEFAULT_RANGES: &str = "10.32.0.0/12";
const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Ranges to seed the space with.
    pub ranges: Vec<Range>,
    /// Path of the log4rs YAML file.
    pub log_config: String,
    /// Donation mode for the demo donation.
    pub cidr_aligned: bool,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv::dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; missing keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ranges = lookup(ENV_RANGES).unwrap_or_else(|| DEFAULT_RANGES.to_string());
        let ranges = parse_ranges(&ranges).map_err(|source| ConfigError::Range {
            key: ENV_RANGES,
            source,
        })?;

        let log_config = lookup(ENV_LOG_CONFIG).unwrap_or_else(|| DEFAULT_LOG_CONFIG.to_string());

        let cidr_aligned = match lookup(ENV_CIDR_ALIGNED) {
            None => false,
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" | "" => false,
                _ => {
                    return Err(ConfigError::Value {
                        key: ENV_CIDR_ALIGNED,
                        value,
                    })
                }
            },
        };

        Ok(Config {
            ranges,
            log_config,
            cidr_aligned,
        })
    }

    /// The configured ranges as CIDR blocks, for CIDR-aligned donation.
    pub fn cidrs(&self) -> Vec<Cidr> {
        self.ranges.iter().flat_map(|r| r.cidrs()).collect()
    }
}

/// Parse a comma separated list of `a.b.c.d/n` blocks or inclusive
/// `first-last` ranges.
pub fn parse_ranges(s: &str) -> Result<Vec<Range>, AddressError> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            if part.contains('/') {
                Cidr::parse_subnet(part).map(|cidr| cidr.range())
            } else {
                part.parse::<Range>()
            }
        })
        .collect()
}
