use std::str::FromStr;
use std::sync::Arc;

use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, PendingTransaction, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, TxHash, U256, U64},
};
use url::Url;

use crate::{
    config::Config,
    error::{AppError, Result, TxFailure},
    models::Account,
};

ethers::contract::abigen!(
    HammerNft,
    r#"[
        function balanceOfBatch(address[] accounts, uint256[] ids) view returns (uint256[])
        function levelPrices(uint256 levelId) view returns (uint256)
        function upgradeNFT(uint256 newLevelId) payable
    ]"#
);

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Confirmed,
    Reverted,
}

/// Remote capabilities of the hammer NFT contract.
#[async_trait::async_trait]
pub trait HammerContract: Send + Sync {
    async fn balance_of_batch(&self, owner: Address, ids: &[U256]) -> Result<Vec<U256>>;

    async fn level_price(&self, level_id: U256) -> Result<U256>;

    /// Sends `upgradeNFT(level_id)` carrying `value` wei.
    async fn upgrade(&self, level_id: U256, value: U256) -> Result<TxHash>;

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ReceiptStatus>;
}

pub trait WalletProvider: Send + Sync {
    fn account(&self) -> Account;
}

// ==================== ETHERS ====================

pub struct EthersHammerContract {
    provider: Arc<Provider<Http>>,
    reader: HammerNft<Provider<Http>>,
    writer: Option<HammerNft<SignerClient>>,
}

impl EthersHammerContract {
    pub fn from_config(config: &Config) -> Result<Self> {
        let rpc_url = Url::parse(config.rpc_url.trim())
            .map_err(|e| AppError::Internal(format!("Invalid RPC URL: {}", e)))?;
        let provider = Arc::new(Provider::new(Http::new(rpc_url)));
        let contract_address = parse_address(&config.nft_contract_address)?;

        let reader = HammerNft::new(contract_address, provider.clone());
        let writer = load_wallet(config)?.map(|wallet| {
            let client = SignerMiddleware::new(provider.as_ref().clone(), wallet);
            HammerNft::new(contract_address, Arc::new(client))
        });

        Ok(Self {
            provider,
            reader,
            writer,
        })
    }
}

#[async_trait::async_trait]
impl HammerContract for EthersHammerContract {
    async fn balance_of_batch(&self, owner: Address, ids: &[U256]) -> Result<Vec<U256>> {
        let owners = vec![owner; ids.len()];
        self.reader
            .balance_of_batch(owners, ids.to_vec())
            .call()
            .await
            .map_err(|e| AppError::BlockchainRPC(e.to_string()))
    }

    async fn level_price(&self, level_id: U256) -> Result<U256> {
        self.reader
            .level_prices(level_id)
            .call()
            .await
            .map_err(|e| AppError::BlockchainRPC(e.to_string()))
    }

    async fn upgrade(&self, level_id: U256, value: U256) -> Result<TxHash> {
        let writer = self.writer.as_ref().ok_or(AppError::UpgradeNotReady)?;
        let call = writer.upgrade_nft(level_id).value(value);
        let pending = call
            .send()
            .await
            .map_err(|e| AppError::Transaction(TxFailure::from(e)))?;
        Ok(pending.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ReceiptStatus> {
        let receipt = PendingTransaction::new(tx_hash, self.provider.as_ref())
            .await
            .map_err(|e| AppError::Transaction(TxFailure::from(e)))?;

        match receipt {
            Some(receipt) if receipt.status == Some(U64::from(1)) => Ok(ReceiptStatus::Confirmed),
            Some(_) => Ok(ReceiptStatus::Reverted),
            None => Err(AppError::Transaction(TxFailure::new(
                "Transaction was dropped before confirmation",
            ))),
        }
    }
}

/// The signing wallet configured for this service.
pub struct ConfiguredWallet {
    address: Option<Address>,
}

impl ConfiguredWallet {
    pub fn from_config(config: &Config) -> Result<Self> {
        let address = load_wallet(config)?.map(|wallet| wallet.address());
        Ok(Self { address })
    }
}

impl WalletProvider for ConfiguredWallet {
    fn account(&self) -> Account {
        match self.address {
            Some(address) => Account::connected(address),
            None => Account::disconnected(),
        }
    }
}

fn load_wallet(config: &Config) -> Result<Option<LocalWallet>> {
    let Some(key) = config.wallet_private_key.as_deref() else {
        return Ok(None);
    };
    let wallet = LocalWallet::from_str(key.trim().trim_start_matches("0x"))
        .map_err(|e| AppError::Internal(format!("Invalid wallet private key: {}", e)))?;
    Ok(Some(wallet.with_chain_id(config.chain_id)))
}

pub fn parse_address(value: &str) -> Result<Address> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("Empty address".to_string()));
    }
    Address::from_str(trimmed)
        .map_err(|e| AppError::BadRequest(format!("Invalid address {}: {}", trimmed, e)))
}

pub fn level_id(level: i8) -> U256 {
    U256::from(level.max(0) as u64)
}
