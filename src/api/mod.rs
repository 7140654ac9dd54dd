// src/api/mod.rs

pub mod hammer;
pub mod health;

use std::sync::Arc;

use crate::config::Config;
use crate::services::{HammerContract, LevelReader, UpgradeFlow, WalletProvider};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub wallet: Arc<dyn WalletProvider>,
    pub level_reader: LevelReader,
    pub upgrade_flow: UpgradeFlow,
}

impl AppState {
    pub fn new(
        config: Config,
        contract: Arc<dyn HammerContract>,
        wallet: Arc<dyn WalletProvider>,
    ) -> Self {
        let level_reader = LevelReader::new(contract.clone(), config.rpc_timeout());
        let upgrade_flow = UpgradeFlow::new(
            contract,
            wallet.clone(),
            config.refresh_delay(),
            config.rpc_timeout(),
        );
        Self {
            config,
            wallet,
            level_reader,
            upgrade_flow,
        }
    }
}
