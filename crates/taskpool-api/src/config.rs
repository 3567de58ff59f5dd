// Environment configuration for the service
//
// Defaults mirror the deployed service; invalid values are fatal at
// startup rather than silently corrected.

use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Worker count for the pool (positive)
    pub workers: usize,
    /// Task queue capacity (positive)
    pub queue_capacity: usize,
    /// Deadline for draining the pool on shutdown
    pub shutdown_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_env("SERVER_PORT", 8080)?;
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;
        let workers = parse_env("TASK_WORKER_WORKERS", 3)?;
        let queue_capacity = parse_env("TASK_WORKER_QUEUE_SIZE", 3)?;
        let shutdown_secs: u64 = parse_env("SERVER_SHUTDOWN_TIMEOUT_SECS", 10)?;

        let config = Self {
            host,
            port,
            database_url,
            workers,
            queue_capacity,
            shutdown_timeout: Duration::from_secs(shutdown_secs),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.workers > 0, "TASK_WORKER_WORKERS must be positive");
        anyhow::ensure!(
            self.queue_capacity > 0,
            "TASK_WORKER_QUEUE_SIZE must be positive"
        );
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_env<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("invalid value for {name}: {value}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            host: "0.0.0.0".into(),
            port: 8080,
            database_url: "postgres://localhost/taskpool".into(),
            workers: 3,
            queue_capacity: 3,
            shutdown_timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        assert_eq!(base_config().bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn zero_workers_is_invalid() {
        let mut config = base_config();
        config.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_queue_capacity_is_invalid() {
        let mut config = base_config();
        config.queue_capacity = 0;
        assert!(config.validate().is_err());
    }
}
