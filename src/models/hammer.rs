use ethers::types::{Address, TxHash};
use serde::{Deserialize, Serialize};

use crate::constants::{MULTIPLIER_LEVEL_0, MULTIPLIER_LEVEL_1, MULTIPLIER_LEVEL_2};
use crate::error::Result;

// ==================== ACCOUNT ====================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: Option<Address>,
    pub connected: bool,
}

impl Account {
    pub fn connected(address: Address) -> Self {
        Self {
            address: Some(address),
            connected: true,
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Address usable for on-chain reads. `None` unless connected.
    pub fn active_address(&self) -> Option<Address> {
        if self.connected {
            self.address
        } else {
            None
        }
    }
}

// ==================== QUERY STATE ====================
/// Projection of one remote read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<T> {
    /// Enable condition not met; no call was made.
    Disabled,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> QueryState<T> {
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => QueryState::Ready(value),
            Err(err) => QueryState::Failed(err.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryState::Failed(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

// ==================== LEVEL ====================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelStatus {
    pub current_level: i8,
    pub has_token: bool,
    pub is_loading: bool,
    pub is_error: bool,
}

impl LevelStatus {
    pub fn from_query(query: &QueryState<i8>) -> Self {
        let current_level = query.data().copied().unwrap_or(crate::constants::NO_LEVEL);
        Self {
            current_level,
            has_token: current_level >= 0,
            is_loading: query.is_loading(),
            is_error: query.is_error(),
        }
    }
}

pub fn score_multiplier(level: i8) -> u8 {
    match level {
        1 => MULTIPLIER_LEVEL_1,
        2 => MULTIPLIER_LEVEL_2,
        _ => MULTIPLIER_LEVEL_0,
    }
}

// ==================== UPGRADE ACTION ====================
/// Lifecycle of the single upgrade button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UpgradeAction {
    Idle,
    AwaitingWallet,
    AwaitingChain { tx_hash: TxHash },
    Confirmed { tx_hash: TxHash },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEvent {
    Submit,
    Submitted(TxHash),
    Confirmed,
    Failed,
    Reset,
}

impl UpgradeAction {
    /// Unlisted (state, event) pairs leave the state untouched.
    pub fn apply(self, event: ActionEvent) -> Self {
        use UpgradeAction::*;
        match (self, event) {
            (Idle, ActionEvent::Submit) => AwaitingWallet,
            (AwaitingWallet, ActionEvent::Submitted(tx_hash)) => AwaitingChain { tx_hash },
            (AwaitingChain { tx_hash }, ActionEvent::Confirmed) => Confirmed { tx_hash },
            (_, ActionEvent::Failed) | (Confirmed { .. }, ActionEvent::Reset) => Idle,
            (state, _) => state,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, UpgradeAction::Idle)
    }

    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            UpgradeAction::AwaitingChain { tx_hash } | UpgradeAction::Confirmed { tx_hash } => {
                Some(*tx_hash)
            }
            _ => None,
        }
    }

    pub fn label(&self, target_level: i8) -> String {
        match self {
            UpgradeAction::Idle => format!("UPGRADE TO LEVEL {}", target_level),
            UpgradeAction::AwaitingWallet => "Awaiting Wallet Confirmation...".to_string(),
            UpgradeAction::AwaitingChain { .. } => "Upgrading NFT...".to_string(),
            UpgradeAction::Confirmed { .. } => "Upgrade Confirmed!".to_string(),
        }
    }
}

// ==================== VIEWS ====================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionView {
    pub state: UpgradeAction,
    pub label: String,
    pub disabled: bool,
}

/// Everything the upgrade page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradeView {
    pub account: Account,
    pub level: LevelStatus,
    pub current_multiplier: u8,
    pub show_upgrade: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mint_notice: Option<String>,
    pub is_max_level: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_level: Option<i8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_multiplier: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_wei: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_eth: Option<String>,
    pub price_text: String,
    pub is_price_loading: bool,
    pub is_price_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub refreshed_at: i64,
}
