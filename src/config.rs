use std::{env, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    Mysql,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub employee_seed_file: Option<PathBuf>,
    pub api_prefix: String,

    // Rate limiting
    pub rate_per_min: u32,

    pub employee_cache_capacity: u64,
    pub employee_cache_ttl: Duration,

    pub log_dir: String,
}

fn parse_or<T>(source: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match source(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_source(|name| env::var(name).ok())
    }

    pub fn from_source(source: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let storage_backend = parse_or(&source, "STORAGE_BACKEND", StorageBackend::Mysql)?;
        let database_url = source("DATABASE_URL").filter(|url| !url.trim().is_empty());

        if storage_backend == StorageBackend::Mysql && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORAGE_BACKEND is mysql");
        }

        Ok(Self {
            server_addr: source("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            storage_backend,
            database_url,
            employee_seed_file: source("EMPLOYEE_SEED_FILE").map(PathBuf::from),
            api_prefix: source("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            rate_per_min: parse_or(&source, "RATE_PER_MIN", 600)?,
            employee_cache_capacity: parse_or(&source, "EMPLOYEE_CACHE_CAPACITY", 10_000)?,
            employee_cache_ttl: Duration::from_secs(parse_or(&source, "EMPLOYEE_CACHE_TTL_SECS", 300)?),
            log_dir: source("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_source(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DATABASE_URL", "mysql://root@localhost/payroll")]).unwrap();

        assert_eq!(config.server_addr, "127.0.0.1:8080");
        assert_eq!(config.storage_backend, StorageBackend::Mysql);
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.rate_per_min, 600);
        assert_eq!(config.employee_cache_capacity, 10_000);
        assert_eq!(config.employee_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.log_dir, "logs");
        assert_eq!(config.employee_seed_file, None);
    }

    #[test]
    fn test_memory_backend_needs_no_database() {
        let config = config_from(&[
            ("STORAGE_BACKEND", "Memory"),
            ("EMPLOYEE_SEED_FILE", "seed/employees.json"),
            ("RATE_PER_MIN", "60"),
        ])
        .unwrap();

        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.database_url, None);
        assert_eq!(config.employee_seed_file, Some(PathBuf::from("seed/employees.json")));
        assert_eq!(config.rate_per_min, 60);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        assert!(config_from(&[]).is_err());
        assert!(config_from(&[("STORAGE_BACKEND", "postgres")]).is_err());

        let err = config_from(&[("STORAGE_BACKEND", "memory"), ("RATE_PER_MIN", "lots")]).unwrap_err();
        assert!(err.to_string().contains("RATE_PER_MIN"));
    }
}
