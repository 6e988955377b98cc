//! # Runtime Configuration Module
//!
//! Environment-variable configuration for the dispatch pipeline.
//!
//! ## Environment Variables
//!
//! ### `SWITCHYARD_CHUNK_SIZE`
//!
//! Size of the chunks the [`Transmitter`](crate::server::Transmitter) writes
//! response bodies in. Accepts decimal (`8192`) or hexadecimal (`0x2000`).
//! `0` writes the whole body in one call.
//!
//! Default: `8192`
//!
//! ### `SWITCHYARD_TEMPLATE_PATTERN`
//!
//! Regex fragment a plain URI-template variable (`{id}`) matches.
//!
//! Default: `[^/]+`
//!
//! ### `SWITCHYARD_MAX_RESOLUTION_DEPTH`
//!
//! How many service/factory indirections the dispatcher follows before
//! giving up with [`DispatchError::ResolutionDepth`](crate::dispatcher::DispatchError).
//!
//! Default: `16`
//!
//! ## Usage
//!
//! ```rust
//! use switchyard::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("chunk size: {} bytes", config.chunk_size);
//! ```

use std::env;

use crate::router::DEFAULT_TEMPLATE_PATTERN;

pub const DEFAULT_CHUNK_SIZE: usize = 8192;
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 16;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Body chunk size for transmission in bytes (0 = whole body)
    pub chunk_size: usize,
    /// Default regex fragment for template variables
    pub template_pattern: String,
    /// Maximum service/factory resolution steps per dispatch
    pub max_resolution_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            template_pattern: DEFAULT_TEMPLATE_PATTERN.to_string(),
            max_resolution_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let chunk_size = lookup("SWITCHYARD_CHUNK_SIZE")
            .and_then(|val| parse_size(&val))
            .unwrap_or(DEFAULT_CHUNK_SIZE);
        let template_pattern = lookup("SWITCHYARD_TEMPLATE_PATTERN")
            .filter(|val| !val.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TEMPLATE_PATTERN.to_string());
        let max_resolution_depth = lookup("SWITCHYARD_MAX_RESOLUTION_DEPTH")
            .and_then(|val| parse_size(&val))
            .filter(|depth| *depth > 0)
            .unwrap_or(DEFAULT_MAX_RESOLUTION_DEPTH);
        RuntimeConfig {
            chunk_size,
            template_pattern,
            max_resolution_depth,
        }
    }
}

/// Decimal or `0x`-prefixed hexadecimal.
fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]), RuntimeConfig::default());
        assert_eq!(RuntimeConfig::default().chunk_size, 8192);
        assert_eq!(RuntimeConfig::default().template_pattern, "[^/]+");
    }

    #[test]
    fn test_hex_and_decimal() {
        assert_eq!(config(&[("SWITCHYARD_CHUNK_SIZE", "0x400")]).chunk_size, 1024);
        assert_eq!(config(&[("SWITCHYARD_CHUNK_SIZE", "0")]).chunk_size, 0);
        assert_eq!(
            config(&[("SWITCHYARD_MAX_RESOLUTION_DEPTH", "4")]).max_resolution_depth,
            4
        );
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = config(&[
            ("SWITCHYARD_CHUNK_SIZE", "lots"),
            ("SWITCHYARD_MAX_RESOLUTION_DEPTH", "0"),
            ("SWITCHYARD_TEMPLATE_PATTERN", "  "),
        ]);
        assert_eq!(cfg, RuntimeConfig::default());
    }

    #[test]
    fn test_template_pattern_override() {
        let cfg = config(&[("SWITCHYARD_TEMPLATE_PATTERN", "[0-9]+")]);
        assert_eq!(cfg.template_pattern, "[0-9]+");
    }
}
