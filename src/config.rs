use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::constants::{
    BASE_SEPOLIA_CHAIN_ID, DEFAULT_CHAIN_ID, DEFAULT_REFRESH_DELAY_MS, DEFAULT_RPC_TIMEOUT_MS,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Blockchain
    pub rpc_url: String,
    pub chain_id: u64,

    // Contract Addresses
    pub nft_contract_address: String,

    // Wallet
    pub wallet_private_key: Option<String>,

    // Timing
    pub refresh_delay_ms: u64,
    pub rpc_timeout_ms: u64,

    // CORS
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            rpc_url: env::var("RPC_URL")?,
            chain_id: env::var("CHAIN_ID")
                .unwrap_or_else(|_| DEFAULT_CHAIN_ID.to_string())
                .parse()?,

            nft_contract_address: env::var("NFT_CONTRACT_ADDRESS")?,

            wallet_private_key: env::var("WALLET_PRIVATE_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),

            refresh_delay_ms: env::var("REFRESH_DELAY_MS")
                .unwrap_or_else(|_| DEFAULT_REFRESH_DELAY_MS.to_string())
                .parse()?,
            rpc_timeout_ms: env::var("RPC_TIMEOUT_MS")
                .unwrap_or_else(|_| DEFAULT_RPC_TIMEOUT_MS.to_string())
                .parse()?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.rpc_url.trim().is_empty() {
            anyhow::bail!("RPC_URL is empty");
        }
        url::Url::parse(self.rpc_url.trim())
            .map_err(|e| anyhow::anyhow!("RPC_URL is not a valid URL: {}", e))?;

        let contract = self.nft_contract_address.trim();
        if contract.is_empty() {
            anyhow::bail!("NFT_CONTRACT_ADDRESS is empty");
        }
        if !contract.starts_with("0x")
            || contract.len() != 42
            || hex::decode(&contract[2..]).is_err()
        {
            anyhow::bail!("NFT_CONTRACT_ADDRESS is not a 20-byte hex address");
        }
        if contract.starts_with("0x0000") {
            tracing::warn!("Using placeholder NFT contract address");
        }

        if self.wallet_private_key.is_none() {
            tracing::warn!("WALLET_PRIVATE_KEY not set; upgrade submission is disabled");
        }

        if self.rpc_timeout_ms == 0 {
            tracing::warn!("RPC_TIMEOUT_MS is 0; every on-chain read will time out");
        }

        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }

    pub fn is_testnet(&self) -> bool {
        if self.environment == "development" || self.environment == "testnet" {
            return true;
        }
        self.chain_id == BASE_SEPOLIA_CHAIN_ID
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }
}

#[cfg(test)]
impl Config {
    pub(crate) fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            environment: "production".to_string(),
            rpc_url: "https://mainnet.base.org".to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            nft_contract_address: "0x5fbdb2315678afecb367f032d93f642f64180aa3".to_string(),
            wallet_private_key: None,
            refresh_delay_ms: DEFAULT_REFRESH_DELAY_MS,
            rpc_timeout_ms: DEFAULT_RPC_TIMEOUT_MS,
            cors_allowed_origins: "*".to_string(),
        }
    }
}
