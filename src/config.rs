use crate::error::{Error, Result};
use std::env;

pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_MIN_ISSUE_LEN: usize = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub top_n: usize,
    pub max_files: Option<usize>,
    pub concurrency_limit: usize,
    pub skip_errors: bool,
    /// Bullets of this many characters or fewer are not treated as issues.
    pub min_issue_len: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let top_n = match lookup("DEBTRANK_TOP_N") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(Error::Config(format!(
                        "DEBTRANK_TOP_N must be a positive integer, got '{}'",
                        raw
                    )))
                }
            },
            None => DEFAULT_TOP_N,
        };

        let max_files = lookup("DEBTRANK_MAX_FILES")
            .and_then(|v| v.trim().parse().ok())
            .filter(|n: &usize| *n > 0);

        let concurrency_limit = lookup("DEBTRANK_CONCURRENCY")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_CONCURRENCY)
            .max(1);

        let skip_errors = lookup("DEBTRANK_SKIP_ERRORS")
            .map(|v| v.trim().to_lowercase() == "true")
            .unwrap_or(false);

        let min_issue_len = lookup("DEBTRANK_MIN_ISSUE_LEN")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MIN_ISSUE_LEN);

        Ok(Self {
            top_n,
            max_files,
            concurrency_limit,
            skip_errors,
            min_issue_len,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            max_files: None,
            concurrency_limit: DEFAULT_CONCURRENCY,
            skip_errors: false,
            min_issue_len: DEFAULT_MIN_ISSUE_LEN,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub top_n: usize,
    pub max_files: Option<usize>,
    pub concurrency_limit: usize,
    pub skip_errors: bool,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            top_n: config.top_n,
            max_files: config.max_files,
            concurrency_limit: config.concurrency_limit,
            skip_errors: config.skip_errors,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.max_files, None);
        assert_eq!(config.concurrency_limit, 4);
        assert!(!config.skip_errors);
        assert_eq!(config.min_issue_len, 20);
    }

    #[test]
    fn test_reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DEBTRANK_TOP_N", "25"),
            ("DEBTRANK_MAX_FILES", "3"),
            ("DEBTRANK_CONCURRENCY", "0"),
            ("DEBTRANK_SKIP_ERRORS", "TRUE"),
            ("DEBTRANK_MIN_ISSUE_LEN", "40"),
        ]))
        .unwrap();
        assert_eq!(config.top_n, 25);
        assert_eq!(config.max_files, Some(3));
        assert_eq!(config.concurrency_limit, 1);
        assert!(config.skip_errors);
        assert_eq!(config.min_issue_len, 40);
    }

    #[test]
    fn test_rejects_zero_top_n() {
        let result = Config::from_lookup(lookup_from(&[("DEBTRANK_TOP_N", "0")]));
        assert!(matches!(result, Err(Error::Config(_))));

        let result = Config::from_lookup(lookup_from(&[("DEBTRANK_TOP_N", "ten")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
