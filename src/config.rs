use anyhow::{bail, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::embedding::DEFAULT_MAX_TOKENS;

pub const DEFAULT_MODEL_DIR: &str = "gte-small";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Service settings, read from the environment after loading `.env`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub model_dir: PathBuf,
    pub max_tokens: usize,
    pub listen_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let model_dir = lookup("MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR));

        let max_tokens = match lookup("MAX_TOKENS") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("MAX_TOKENS must be a positive integer, got {raw:?}"))?,
            None => DEFAULT_MAX_TOKENS,
        };
        if max_tokens < 1 {
            bail!("MAX_TOKENS must be at least 1");
        }

        let raw_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = raw_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("LISTEN_ADDR is not a socket address: {raw_addr:?}"))?;

        Ok(Self {
            model_dir,
            max_tokens,
            listen_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.model_dir, PathBuf::from("gte-small"));
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.listen_addr.port(), 3000);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("MODEL_DIR", "/models/all-MiniLM-L6-v2"),
            ("MAX_TOKENS", " 256 "),
            ("LISTEN_ADDR", "127.0.0.1:8080"),
        ]))
        .unwrap();
        assert_eq!(config.model_dir, PathBuf::from("/models/all-MiniLM-L6-v2"));
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.listen_addr.port(), 8080);
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        assert!(Config::from_lookup(lookup(&[("MAX_TOKENS", "0")])).is_err());
    }

    #[test]
    fn test_non_numeric_max_tokens_rejected() {
        assert!(Config::from_lookup(lookup(&[("MAX_TOKENS", "lots")])).is_err());
    }

    #[test]
    fn test_bad_listen_addr_rejected() {
        assert!(Config::from_lookup(lookup(&[("LISTEN_ADDR", "localhost")])).is_err());
    }
}
