//! System configuration.
//!
//! The cluster is described by a small set of key/value parameters,
//! read either from `KEY = VALUE` text (with the usual comment rules)
//! or from a JSON file.

use super::input::clean_lines;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading the system configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing config key {0}")]
    MissingKey(&'static str),

    #[error("duplicate config key {0}")]
    DuplicateKey(String),

    #[error("unknown config key {0}")]
    UnknownKey(String),

    #[error("invalid value for {key}: `{value}`")]
    InvalidValue { key: String, value: String },

    #[error("malformed config line `{0}` (expected KEY = VALUE)")]
    MalformedLine(String),

    #[error("invalid config json: {0}")]
    Json(String),

    #[error("read config: {0}")]
    Io(#[from] io::Error),
}

fn default_topology() -> String {
    "ring".to_string()
}

fn default_chunk_size() -> u64 {
    65_536
}

fn default_shared_trace() -> bool {
    true
}

/// Cluster-wide simulation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Number of GPUs; they take object ids `0..num_gpus` and the
    /// network takes `num_gpus`.
    pub num_gpus: usize,
    /// Aggregate network bandwidth in GB/s.
    pub network_bandwidth_gbps: u64,
    /// Topology label; informational only.
    #[serde(default = "default_topology")]
    pub topology: String,
    /// Per-GPU compute capability in TFLOPS.
    pub compute_tflops: u64,
    /// Reserved for transfer chunking; does not affect timing yet.
    #[serde(default = "default_chunk_size")]
    pub chunk_size_bytes: u64,
    /// When true every GPU executes the same parsed trace; when false
    /// each GPU gets its own trace file.
    #[serde(default = "default_shared_trace")]
    pub shared_trace: bool,
}

impl SystemConfig {
    /// Load from a path; `.json` files go through serde, everything
    /// else is parsed as `KEY = VALUE` text.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&raw)
        } else {
            Self::from_kv_lines(&clean_lines(&raw))
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|err| ConfigError::Json(err.to_string()))?;
        config.validate()
    }

    /// Parse cleaned `KEY = VALUE` lines. Recognized keys: NUM_GPUS,
    /// NETWORK_BANDWIDTH, TOPOLOGY, COMPUTE_CAPABILITY,
    /// COMMUNICATION_CHUNK_SIZE, SHARED_TRACE.
    pub fn from_kv_lines(lines: &[String]) -> Result<Self, ConfigError> {
        let mut num_gpus: Option<usize> = None;
        let mut network_bandwidth_gbps: Option<u64> = None;
        let mut topology: Option<String> = None;
        let mut compute_tflops: Option<u64> = None;
        let mut chunk_size_bytes: Option<u64> = None;
        let mut shared_trace: Option<bool> = None;

        for line in lines {
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::MalformedLine(line.clone()));
            };
            let key = key.trim();
            let value = value.trim();
            match key {
                "NUM_GPUS" => set_once(key, &mut num_gpus, parse_int(key, value)?)?,
                "NETWORK_BANDWIDTH" => {
                    set_once(key, &mut network_bandwidth_gbps, parse_int(key, value)?)?
                }
                "TOPOLOGY" => set_once(key, &mut topology, value.to_string())?,
                "COMPUTE_CAPABILITY" => set_once(key, &mut compute_tflops, parse_int(key, value)?)?,
                "COMMUNICATION_CHUNK_SIZE" => {
                    set_once(key, &mut chunk_size_bytes, parse_int(key, value)?)?
                }
                "SHARED_TRACE" => set_once(key, &mut shared_trace, parse_bool(key, value)?)?,
                other => return Err(ConfigError::UnknownKey(other.to_string())),
            }
        }

        let config = Self {
            num_gpus: num_gpus.ok_or(ConfigError::MissingKey("NUM_GPUS"))?,
            network_bandwidth_gbps: network_bandwidth_gbps
                .ok_or(ConfigError::MissingKey("NETWORK_BANDWIDTH"))?,
            topology: topology.unwrap_or_else(default_topology),
            compute_tflops: compute_tflops.ok_or(ConfigError::MissingKey("COMPUTE_CAPABILITY"))?,
            chunk_size_bytes: chunk_size_bytes.unwrap_or_else(default_chunk_size),
            shared_trace: shared_trace.unwrap_or_else(default_shared_trace),
        };
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.num_gpus == 0 {
            return Err(ConfigError::InvalidValue {
                key: "NUM_GPUS".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(self)
    }
}

fn set_once<T>(key: &str, slot: &mut Option<T>, value: T) -> Result<(), ConfigError> {
    if slot.is_some() {
        return Err(ConfigError::DuplicateKey(key.to_string()));
    }
    *slot = Some(value);
    Ok(())
}

fn parse_int<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
