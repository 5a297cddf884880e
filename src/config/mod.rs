//! Configuration module for the bot backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ai::{DEFAULT_API_KEY, DEFAULT_BASE_URL};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// Path to the JSON record store
    pub data_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Base URL of the OpenAI-compatible chat completion backend
    pub ai_base_url: String,
    /// Shared credential for the AI backend
    pub ai_api_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = env::var("BOT_API_PSK").ok();

        let data_path = env::var("BOT_DATA_PATH")
            .unwrap_or_else(|_| "./data/reminders.json".to_string())
            .into();

        let bind_addr = env::var("BOT_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid BOT_BIND_ADDR format");

        let log_level = env::var("BOT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let ai_base_url =
            env::var("BOT_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let ai_api_key = env::var("BOT_AI_API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string());

        Self {
            api_psk,
            data_path,
            bind_addr,
            log_level,
            ai_base_url,
            ai_api_key,
        }
    }
}
