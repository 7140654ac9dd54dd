use std::sync::Arc;
use std::time::Duration;

use ethers::types::U256;

use crate::{
    constants::{LEVEL_IDS, NO_LEVEL},
    models::{Account, LevelStatus, QueryState},
    services::onchain::HammerContract,
    utils::with_timeout,
};

pub fn level_ids() -> Vec<U256> {
    LEVEL_IDS.iter().map(|id| U256::from(*id)).collect()
}

/// Reduces `[balance(0), balance(1), balance(2)]` to the highest id held.
///
/// Several positive balances resolve to the highest id. Anything other than
/// exactly three balances means no level.
pub fn derive_level(balances: &[U256]) -> i8 {
    if balances.len() != LEVEL_IDS.len() {
        return NO_LEVEL;
    }
    LEVEL_IDS
        .iter()
        .zip(balances)
        .rev()
        .find(|(_, balance)| !balance.is_zero())
        .map(|(id, _)| *id as i8)
        .unwrap_or(NO_LEVEL)
}

#[derive(Clone)]
pub struct LevelReader {
    contract: Arc<dyn HammerContract>,
    rpc_timeout: Duration,
}

impl LevelReader {
    pub fn new(contract: Arc<dyn HammerContract>, rpc_timeout: Duration) -> Self {
        Self {
            contract,
            rpc_timeout,
        }
    }

    /// Reads the balance batch; disabled unless the account is connected with an address.
    pub async fn query(&self, account: &Account) -> QueryState<i8> {
        let Some(owner) = account.active_address() else {
            return QueryState::Disabled;
        };

        let ids = level_ids();
        let read = with_timeout(
            self.rpc_timeout,
            "balanceOfBatch",
            self.contract.balance_of_batch(owner, &ids),
        )
        .await;

        match read {
            Ok(balances) => {
                let level = derive_level(&balances);
                tracing::debug!(
                    "hammer_level_read owner={:?} balances={:?} level={}",
                    owner,
                    balances,
                    level
                );
                QueryState::Ready(level)
            }
            Err(err) => {
                tracing::warn!("hammer_level_read failed owner={:?} err={}", owner, err);
                QueryState::from_result(Err(err))
            }
        }
    }

    pub async fn read(&self, account: &Account) -> LevelStatus {
        LevelStatus::from_query(&self.query(account).await)
    }
}
