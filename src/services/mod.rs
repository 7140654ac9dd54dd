// All service modules
pub mod level_reader;
pub mod onchain;
pub mod upgrade_flow;

#[cfg(test)]
pub mod testing;

// Re-export for convenience
pub use level_reader::LevelReader;
pub use onchain::{ConfiguredWallet, EthersHammerContract, HammerContract, WalletProvider};
pub use upgrade_flow::UpgradeFlow;
