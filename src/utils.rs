// Shared helpers for on-chain calls and price display.

use std::future::Future;
use std::time::Duration;

use ethers::types::U256;
use tokio::time::timeout;

use crate::error::{AppError, Result};

/// Bounds an on-chain call; elapsed deadlines surface as RPC errors.
pub async fn with_timeout<T, F>(duration: Duration, label: &str, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    timeout(duration, call)
        .await
        .map_err(|_| AppError::BlockchainRPC(format!("{} timeout", label)))?
}

/// Formats a wei amount as ether without trailing zeros, e.g. `0.0005`.
pub fn format_price_ether(wei: U256) -> String {
    let formatted = ethers::utils::format_ether(wei);
    if !formatted.contains('.') {
        return formatted;
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
