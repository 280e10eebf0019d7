use std::collections::HashMap;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::common::{
    enums::DegeneratePolicy,
    kd_exception::{ErrCode, KdError, KdResult},
};
use crate::math::kd::check_window_size;

/// KD calculation configuration
#[derive(Debug, Clone, PartialEq)]
pub struct KdConfig {
    /// Window size N of the rsv extrema
    pub kd_cycle: usize,
    pub degenerate_policy: DegeneratePolicy,
    /// Validate every record before computing
    pub kl_data_check: bool,
    /// Repair inconsistent high/low instead of failing
    pub autofix: bool,
}

impl Default for KdConfig {
    fn default() -> Self {
        Self {
            kd_cycle: 9,
            degenerate_policy: DegeneratePolicy::Propagate,
            kl_data_check: true,
            autofix: false,
        }
    }
}

impl KdConfig {
    pub fn new(conf: Option<HashMap<String, Value>>) -> KdResult<Self> {
        let mut conf = ConfigWithCheck::new(conf.unwrap_or_default());
        let default = Self::default();

        let degenerate_policy = match conf.get::<String>("degenerate_policy")? {
            Some(name) => DegeneratePolicy::from_str(&name).map_err(|_| {
                KdError::new(
                    format!("unknown degenerate_policy={}", name),
                    ErrCode::ParaError,
                )
            })?,
            None => default.degenerate_policy,
        };

        let config = Self {
            kd_cycle: conf.get("kd_cycle")?.unwrap_or(default.kd_cycle),
            degenerate_policy,
            kl_data_check: conf.get("kl_data_check")?.unwrap_or(default.kl_data_check),
            autofix: conf.get("autofix")?.unwrap_or(default.autofix),
        };

        conf.check()?;
        check_window_size(config.kd_cycle)?;
        Ok(config)
    }
}

/// Consumes known keys from a raw config map and rejects whatever is left.
#[derive(Debug)]
pub struct ConfigWithCheck {
    conf: HashMap<String, Value>,
}

impl ConfigWithCheck {
    pub fn new(conf: HashMap<String, Value>) -> Self {
        Self { conf }
    }

    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> KdResult<Option<T>> {
        match self.conf.remove(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|e| {
                KdError::new(
                    format!("invalid value {} for {}: {}", value, key, e),
                    ErrCode::ConfigError,
                )
            }),
        }
    }

    pub fn check(&self) -> KdResult<()> {
        let mut unknown: Vec<&String> = self.conf.keys().collect();
        if unknown.is_empty() {
            return Ok(());
        }
        unknown.sort();
        Err(KdError::new(
            format!(
                "unknown para = {}",
                unknown.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
            ),
            ErrCode::ParaError,
        ))
    }
}
