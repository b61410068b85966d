//! View settings.
//!
//! Defaults can be overridden by a JSON file and then by CLI flags:
//! ```json
//! {
//!   "top_n": 10,
//!   "min_brand_models": 2,
//!   "brand_limit": 10
//! }
//! ```
//! Keys absent from the file keep their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Rows in the leaderboard.
    pub top_n: usize,
    /// Brands with fewer scored models are left out of the brand table.
    pub min_brand_models: usize,
    /// Rows in the brand table.
    pub brand_limit: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            min_brand_models: 2,
            brand_limit: 10,
        }
    }
}

impl ViewConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config '{}'", path.display()))?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let c = ViewConfig::default();
        assert_eq!(c.top_n, 10);
        assert_eq!(c.min_brand_models, 2);
        assert_eq!(c.brand_limit, 10);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "top_n": 5 }"#).unwrap();

        let c = ViewConfig::load(file.path()).unwrap();
        assert_eq!(c.top_n, 5);
        assert_eq!(c.min_brand_models, 2);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "topn": 5 }"#).unwrap();

        assert!(ViewConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_without_path() {
        assert_eq!(ViewConfig::load_or_default(None).unwrap(), ViewConfig::default());
    }
}
