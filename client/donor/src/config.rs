//! Application configuration loaded from environment variables.

use crate::errors::ConfigError;

type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone)]
pub struct Config {
    /// Soroban RPC endpoint (e.g. https://soroban-testnet.stellar.org)
    pub rpc_url: String,
    /// The charity fund contract address (Strkey format)
    pub contract_id: String,
    /// Base URL of the log ingestion API
    pub log_api_url: String,
    /// The donating account address; required for `donate`
    pub donor_address: Option<String>,
    /// External wallet signing command; required for `donate`
    pub wallet_sign_cmd: Option<String>,
    /// Seconds between confirmation polls
    pub confirm_interval_secs: u64,
    /// Give up waiting for confirmation after this many seconds
    pub confirm_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            rpc_url: env_var("RPC_URL")
                .unwrap_or_else(|_| "https://soroban-testnet.stellar.org".to_string()),
            contract_id: env_var("CONTRACT_ID").map_err(|_| {
                ConfigError("CONTRACT_ID environment variable is required".to_string())
            })?,
            log_api_url: env_var("LOG_API_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            donor_address: env_var("DONOR_ADDRESS").ok(),
            wallet_sign_cmd: env_var("WALLET_SIGN_CMD").ok(),
            confirm_interval_secs: env_var("CONFIRM_INTERVAL_SECS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .map_err(|_| ConfigError("Invalid CONFIRM_INTERVAL_SECS".to_string()))?,
            confirm_timeout_secs: env_var("CONFIRM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .map_err(|_| ConfigError("Invalid CONFIRM_TIMEOUT_SECS".to_string()))?,
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ConfigError(format!("Missing env var: {key}")))
}
