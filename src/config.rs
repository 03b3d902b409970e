use anyhow::{bail, Result};
use serde::Deserialize;
use std::env;

pub const DEFAULT_API_BASE: &str = "https://api.crossref.org";
pub const DEFAULT_SEARCH_ROWS: usize = 5;
pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crossref: CrossrefConfig,
    pub tree: TreeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrossrefConfig {
    pub api_base: String,
    /// Contact address sent as `mailto` so requests land in Crossref's polite pool
    pub mailto: Option<String>,
    pub search_rows: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeConfig {
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crossref: CrossrefConfig {
                api_base: DEFAULT_API_BASE.to_string(),
                mailto: None,
                search_rows: DEFAULT_SEARCH_ROWS,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            tree: TreeConfig {
                max_depth: DEFAULT_MAX_DEPTH,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            crossref: CrossrefConfig {
                api_base: env::var("CROSSREF_API_BASE")
                    .unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                mailto: env::var("CROSSREF_MAILTO")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                search_rows: env::var("SEARCH_ROWS")
                    .unwrap_or_else(|_| DEFAULT_SEARCH_ROWS.to_string())
                    .parse()?,
                timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
                    .parse()?,
            },
            tree: TreeConfig {
                max_depth: env::var("MAX_DEPTH")
                    .unwrap_or_else(|_| DEFAULT_MAX_DEPTH.to_string())
                    .parse()?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tree.max_depth == 0 {
            bail!("MAX_DEPTH must be at least 1");
        }
        if self.crossref.search_rows == 0 {
            bail!("SEARCH_ROWS must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.crossref.api_base, "https://api.crossref.org");
        assert_eq!(config.crossref.search_rows, 5);
        assert_eq!(config.tree.max_depth, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let mut config = Config::default();
        config.tree.max_depth = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.crossref.search_rows = 0;
        assert!(config.validate().is_err());
    }
}
