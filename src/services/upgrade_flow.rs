use std::sync::Arc;
use std::time::Duration;

use ethers::types::{TxHash, U256};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::{
    constants::{
        MAX_LEVEL, NOTICE_MINT_REQUIRED, NOTICE_UPGRADE_NOT_READY, PRICE_CURRENCY,
        PRICE_TEXT_ERROR, PRICE_TEXT_LOADING, PRICE_TEXT_PENDING,
    },
    error::{AppError, Result},
    models::{
        score_multiplier, Account, ActionEvent, ActionView, LevelStatus, QueryState,
        UpgradeAction, UpgradeView,
    },
    services::{
        level_reader::LevelReader,
        onchain::{level_id, HammerContract, ReceiptStatus, WalletProvider},
    },
    utils::{format_price_ether, with_timeout},
};

pub fn target_level(current_level: i8) -> i8 {
    if current_level >= 0 {
        current_level + 1
    } else {
        0
    }
}

pub fn is_max_level(current_level: i8) -> bool {
    current_level == MAX_LEVEL
}

pub fn price_query_enabled(account: &Account, current_level: i8) -> bool {
    account.connected && current_level >= 0 && !is_max_level(current_level)
}

fn user_message(err: &AppError) -> String {
    match err {
        AppError::Transaction(failure) => failure.display_message().to_string(),
        other => other.to_string(),
    }
}

struct FlowState {
    level: QueryState<i8>,
    target_level: i8,
    price: QueryState<U256>,
    // Target the cached price was fetched for.
    price_target: Option<i8>,
    action: UpgradeAction,
    error: Option<String>,
    notice: Option<String>,
    refreshed_at: i64,
}

impl FlowState {
    fn new() -> Self {
        Self {
            level: QueryState::Disabled,
            target_level: target_level(crate::constants::NO_LEVEL),
            price: QueryState::Disabled,
            price_target: None,
            action: UpgradeAction::Idle,
            error: None,
            notice: None,
            refreshed_at: 0,
        }
    }

    fn loaded_price(&self) -> Option<U256> {
        if self.price_target != Some(self.target_level) {
            return None;
        }
        // A zero price means the contract has none configured for this level.
        self.price.data().copied().filter(|wei| !wei.is_zero())
    }

    fn apply(&mut self, event: ActionEvent) {
        self.action = self.action.apply(event);
    }

    fn render(&self, account: Account) -> UpgradeView {
        let level = LevelStatus::from_query(&self.level);
        let is_max = is_max_level(level.current_level);
        let show_upgrade = level.has_token && !level.is_loading;
        let price = self.loaded_price();

        let price_text = match &self.price {
            QueryState::Loading => PRICE_TEXT_LOADING.to_string(),
            QueryState::Failed(_) => PRICE_TEXT_ERROR.to_string(),
            QueryState::Ready(wei) if !wei.is_zero() => {
                format!("{} {}", format_price_ether(*wei), PRICE_CURRENCY)
            }
            QueryState::Ready(_) | QueryState::Disabled => PRICE_TEXT_PENDING.to_string(),
        };

        let action = (show_upgrade && !is_max).then(|| ActionView {
            state: self.action,
            label: self.action.label(self.target_level),
            disabled: !self.action.is_idle()
                || self.price.is_loading()
                || self.price.is_error()
                || price.is_none(),
        });

        UpgradeView {
            account,
            level,
            current_multiplier: score_multiplier(level.current_level),
            show_upgrade,
            mint_notice: (!level.has_token && !level.is_loading)
                .then(|| NOTICE_MINT_REQUIRED.to_string()),
            is_max_level: is_max,
            target_level: (!is_max).then_some(self.target_level),
            target_multiplier: (!is_max).then(|| score_multiplier(self.target_level)),
            price_wei: price.map(|wei| wei.to_string()),
            price_eth: price.map(format_price_ether),
            price_text,
            is_price_loading: self.price.is_loading(),
            is_price_error: self.price.is_error(),
            action,
            error: self.error.clone(),
            notice: self.notice.clone(),
            refreshed_at: self.refreshed_at,
        }
    }
}

/// Drives one wallet through price lookup, submission and confirmation.
#[derive(Clone)]
pub struct UpgradeFlow {
    contract: Arc<dyn HammerContract>,
    wallet: Arc<dyn WalletProvider>,
    level_reader: LevelReader,
    refresh_delay: Duration,
    rpc_timeout: Duration,
    state: Arc<Mutex<FlowState>>,
}

impl UpgradeFlow {
    pub fn new(
        contract: Arc<dyn HammerContract>,
        wallet: Arc<dyn WalletProvider>,
        refresh_delay: Duration,
        rpc_timeout: Duration,
    ) -> Self {
        Self {
            level_reader: LevelReader::new(contract.clone(), rpc_timeout),
            contract,
            wallet,
            refresh_delay,
            rpc_timeout,
            state: Arc::new(Mutex::new(FlowState::new())),
        }
    }

    /// Re-reads the level and, when the target moved, its price.
    pub async fn load(&self) -> UpgradeView {
        let account = self.wallet.account();
        let level = self.level_reader.query(&account).await;
        let current = LevelStatus::from_query(&level).current_level;
        let target = target_level(current);

        let price = if !price_query_enabled(&account, current) {
            QueryState::Disabled
        } else {
            let cached = {
                let mut state = self.state.lock().await;
                let cached = (state.price_target == Some(target))
                    .then(|| state.price.data().copied())
                    .flatten();
                if cached.is_none() {
                    state.price = QueryState::Loading;
                    state.price_target = Some(target);
                }
                cached
            };
            match cached {
                Some(wei) => QueryState::Ready(wei),
                None => self.fetch_price(target).await,
            }
        };

        let mut state = self.state.lock().await;
        state.level = level;
        state.target_level = target;
        state.price_target = (!matches!(price, QueryState::Disabled)).then_some(target);
        state.price = price;
        state.refreshed_at = chrono::Utc::now().timestamp();
        state.render(account)
    }

    /// Full refresh: drop the cached price and a finished action, then load.
    ///
    /// A submission still awaiting the wallet or the chain keeps its state.
    pub async fn reload(&self) -> UpgradeView {
        {
            let mut state = self.state.lock().await;
            state.apply(ActionEvent::Reset);
            state.error = None;
            state.price = QueryState::Disabled;
            state.price_target = None;
        }
        self.load().await
    }

    /// Current view without touching the chain.
    pub async fn snapshot(&self) -> UpgradeView {
        let account = self.wallet.account();
        self.state.lock().await.render(account)
    }

    pub async fn submit(&self) -> Result<UpgradeView> {
        let account = self.wallet.account();
        let (owner, target, price) = {
            let mut state = self.state.lock().await;
            if !state.action.is_idle() {
                return Err(AppError::UpgradeInProgress);
            }
            let (Some(owner), Some(price)) = (account.active_address(), state.loaded_price())
            else {
                state.notice = Some(NOTICE_UPGRADE_NOT_READY.to_string());
                tracing::warn!(
                    "hammer_upgrade_rejected owner={:?} price_loaded={}",
                    account.address,
                    state.loaded_price().is_some()
                );
                return Err(AppError::UpgradeNotReady);
            };
            state.apply(ActionEvent::Submit);
            state.error = None;
            state.notice = None;
            (owner, state.target_level, price)
        };

        tracing::info!(
            "hammer_upgrade_submit owner={:?} target={} value={}",
            owner,
            target,
            price
        );

        match self.contract.upgrade(level_id(target), price).await {
            Ok(tx_hash) => {
                self.state
                    .lock()
                    .await
                    .apply(ActionEvent::Submitted(tx_hash));
                tracing::info!(
                    "hammer_upgrade_pending owner={:?} target={} tx_hash=0x{}",
                    owner,
                    target,
                    hex::encode(tx_hash.as_bytes())
                );
                self.watch_confirmation(tx_hash, target);
                Ok(self.snapshot().await)
            }
            Err(err) => {
                self.abort(&err).await;
                Err(err)
            }
        }
    }

    fn watch_confirmation(&self, tx_hash: TxHash, target: i8) -> JoinHandle<()> {
        let flow = self.clone();
        tokio::spawn(async move { flow.observe_confirmation(tx_hash, target).await })
    }

    async fn observe_confirmation(&self, tx_hash: TxHash, target: i8) {
        match self.contract.wait_for_receipt(tx_hash).await {
            Ok(ReceiptStatus::Confirmed) => {
                {
                    let mut state = self.state.lock().await;
                    state.apply(ActionEvent::Confirmed);
                    state.notice = Some(format!(
                        "Upgrade successful! Your Hammer is now Level {}.",
                        target
                    ));
                }
                tracing::info!(
                    "hammer_upgrade_confirmed target={} tx_hash=0x{} refresh_in_ms={}",
                    target,
                    hex::encode(tx_hash.as_bytes()),
                    self.refresh_delay.as_millis()
                );
                tokio::time::sleep(self.refresh_delay).await;
                self.reload().await;
            }
            Ok(ReceiptStatus::Reverted) => {
                let err = AppError::Transaction(crate::error::TxFailure::new(
                    "Transaction reverted",
                ));
                self.abort(&err).await;
            }
            Err(err) => self.abort(&err).await,
        }
    }

    async fn abort(&self, err: &AppError) {
        let message = user_message(err);
        tracing::warn!("hammer_upgrade_failed err={}", message);
        let mut state = self.state.lock().await;
        state.apply(ActionEvent::Failed);
        state.error = Some(message);
    }

    async fn fetch_price(&self, target: i8) -> QueryState<U256> {
        let read = with_timeout(
            self.rpc_timeout,
            "levelPrices",
            self.contract.level_price(level_id(target)),
        )
        .await;
        if let Err(err) = &read {
            tracing::warn!("hammer_price_read failed target={} err={}", target, err);
        }
        QueryState::from_result(read)
    }
}
