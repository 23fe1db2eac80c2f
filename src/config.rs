use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

const DEFAULT_INDEX_URL: &str = "https://kotlinlang.org/docs/books.html";
const DEFAULT_DB_PATH: &str = "data/books.sqlite";
const DEFAULT_CONTAINER: &str = "article";
const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub index_url: String,
    pub db_path: String,
    pub container_selector: String,
    pub fetch_concurrency: usize,
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            db_path: DEFAULT_DB_PATH.to_string(),
            container_selector: DEFAULT_CONTAINER.to_string(),
            fetch_concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Defaults overridden by `BOOKS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            index_url: lookup("BOOKS_INDEX_URL").unwrap_or(defaults.index_url),
            db_path: lookup("BOOKS_DB_PATH").unwrap_or(defaults.db_path),
            container_selector: lookup("BOOKS_CONTAINER_SELECTOR")
                .unwrap_or(defaults.container_selector),
            fetch_concurrency: parse_var(&lookup, "BOOKS_FETCH_CONCURRENCY")?
                .unwrap_or(defaults.fetch_concurrency),
            fetch_timeout_secs: parse_var(&lookup, "BOOKS_FETCH_TIMEOUT_SECS")?
                .unwrap_or(defaults.fetch_timeout_secs),
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{} must be a number, got {:?}", key, raw))
        })
        .transpose()
}
