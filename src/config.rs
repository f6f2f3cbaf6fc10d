//! Gate Configuration
//!
//! Settings read once at startup. Unset or unparseable variables keep their
//! defaults.
//!
//! | Variable              | Default |
//! |-----------------------|---------|
//! | `HECKE_MAX_WORD_LEN`  | 10      |
//! | `HECKE_MAX_GENERATOR` | 7       |
//! | `HECKE_LOG_LEVEL`     | info    |
//! | `HECKE_CATALOG_PATH`  | (built-in catalog) |

use std::path::PathBuf;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use tracing::info;

use crate::catalog::{CatalogError, SignatureCatalog};
use crate::core::word::WordLimits;

/// Gate settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Input word bounds.
    pub limits: WordLimits,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// JSON catalog definition; built-in catalog when `None`.
    pub catalog_path: Option<PathBuf>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            limits: WordLimits::default(),
            log_level: "info".to_string(),
            catalog_path: None,
        }
    }
}

impl GateConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            limits: WordLimits {
                max_len: parse_or(&lookup, "HECKE_MAX_WORD_LEN", defaults.limits.max_len),
                max_generator: parse_or(&lookup, "HECKE_MAX_GENERATOR", defaults.limits.max_generator),
            },
            log_level: lookup("HECKE_LOG_LEVEL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.log_level),
            catalog_path: lookup("HECKE_CATALOG_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Build the signature catalog these settings describe.
    pub fn load_catalog(&self) -> Result<SignatureCatalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => {
                info!("Loading signature catalog from {}", path.display());
                SignatureCatalog::load(path, &self.limits)
            }
            None => SignatureCatalog::builtin(&self.limits),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> GateConfig {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        GateConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg, GateConfig::default());
        assert_eq!(cfg.limits.max_len, 10);
        assert_eq!(cfg.limits.max_generator, 7);
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.catalog_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("HECKE_MAX_WORD_LEN", "12"),
            ("HECKE_MAX_GENERATOR", " 9 "),
            ("HECKE_LOG_LEVEL", "hecke_gate=debug"),
            ("HECKE_CATALOG_PATH", "/etc/hecke/catalog.json"),
        ]);
        assert_eq!(cfg.limits.max_len, 12);
        assert_eq!(cfg.limits.max_generator, 9);
        assert_eq!(cfg.log_level, "hecke_gate=debug");
        assert_eq!(cfg.catalog_path, Some(PathBuf::from("/etc/hecke/catalog.json")));
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let cfg = config(&[
            ("HECKE_MAX_WORD_LEN", "ten"),
            ("HECKE_MAX_GENERATOR", "300"),
            ("HECKE_LOG_LEVEL", "  "),
            ("HECKE_CATALOG_PATH", ""),
        ]);
        assert_eq!(cfg, GateConfig::default());
    }

    #[test]
    fn test_load_catalog() {
        let catalog = GateConfig::default().load_catalog().unwrap();
        assert!(catalog
            .for_class(crate::transaction::TransactionClass::Payment)
            .get("DUP-INIT")
            .is_some());

        let missing = GateConfig {
            catalog_path: Some(PathBuf::from("/nonexistent/hecke-catalog.json")),
            ..GateConfig::default()
        };
        assert!(matches!(missing.load_catalog(), Err(CatalogError::Io { .. })));
    }
}
