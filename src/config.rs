//! Env-driven configuration for the gateway, the HTTP service and the CLI.
//!
//! Values are read from the process environment; `dotenv` is loaded on demand
//! by the binaries. Everything except the provider credential has a default.
use std::env;
use dotenv;

use crate::error::{AppError, AppResult};

pub const DEFAULT_BASE_URL: &str = "https://api.together.xyz/v1";
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-3.3-70B-Instruct-Turbo";
pub const DEFAULT_BATCH_SIZE: u32 = 4;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub batch_size: u32,
    pub api_host: String,
    pub api_port: String,
}

impl Config {
    pub fn dotenv_load() {
        dotenv::dotenv().ok();
    }

    pub fn new() -> AppResult<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("PROVIDER_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::Config("PROVIDER_API_KEY must be set".to_string()))?;

        let timeout_secs = match lookup("PROVIDER_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| AppError::Config(format!("Invalid PROVIDER_TIMEOUT_SECS '{}'", raw)))?,
            None => 60,
        };

        let batch_size = match lookup("QUESTION_BATCH_SIZE") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(AppError::Config(format!("Invalid QUESTION_BATCH_SIZE '{}'", raw))),
            },
            None => DEFAULT_BATCH_SIZE,
        };

        Ok(Config {
            api_key,
            base_url: lookup("PROVIDER_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: lookup("PROVIDER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_secs,
            batch_size,
            api_host: lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            api_port: lookup("API_PORT").unwrap_or_else(|| "8190".to_string()),
        })
    }

    pub fn print_env_vars(&self) {
        println!("PROVIDER_BASE_URL: {}", self.base_url);
        println!("PROVIDER_MODEL: {}", self.model);
        println!("PROVIDER_API_KEY: {}", redact(&self.api_key));
        println!("PROVIDER_TIMEOUT_SECS: {}", self.timeout_secs);
        println!("QUESTION_BATCH_SIZE: {}", self.batch_size);
        println!("API_HOST: {}", self.api_host);
        println!("API_PORT: {}", self.api_port);
    }
}

fn redact(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}
