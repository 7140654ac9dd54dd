// In-memory stand-ins for the contract and wallet, shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use ethers::types::{Address, TxHash, U256};

use crate::{
    error::{AppError, Result, TxFailure},
    models::Account,
    services::onchain::{HammerContract, ReceiptStatus, WalletProvider},
};

pub fn owner() -> Address {
    Address::repeat_byte(0x42)
}

pub fn submitted_hash() -> TxHash {
    TxHash::repeat_byte(0x99)
}

pub struct FakeHammerContract {
    balances: Mutex<Vec<U256>>,
    prices: Mutex<HashMap<U256, U256>>,
    fail_balances: AtomicBool,
    fail_price: AtomicBool,
    upgrade_failure: Mutex<Option<TxFailure>>,
    receipt: Mutex<std::result::Result<ReceiptStatus, TxFailure>>,
    balance_requests: Mutex<Vec<(Address, Vec<U256>)>>,
    price_requests: Mutex<Vec<U256>>,
    upgrades: Mutex<Vec<(U256, U256)>>,
    pub balance_calls: AtomicUsize,
    pub price_calls: AtomicUsize,
    pub receipt_calls: AtomicUsize,
}

impl FakeHammerContract {
    pub fn with_balances(balances: [u64; 3]) -> Self {
        Self {
            balances: Mutex::new(balances.iter().map(|b| U256::from(*b)).collect()),
            prices: Mutex::new(HashMap::new()),
            fail_balances: AtomicBool::new(false),
            fail_price: AtomicBool::new(false),
            upgrade_failure: Mutex::new(None),
            receipt: Mutex::new(Ok(ReceiptStatus::Confirmed)),
            balance_requests: Mutex::new(Vec::new()),
            price_requests: Mutex::new(Vec::new()),
            upgrades: Mutex::new(Vec::new()),
            balance_calls: AtomicUsize::new(0),
            price_calls: AtomicUsize::new(0),
            receipt_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_price(self, level: u64, wei: u64) -> Self {
        self.prices
            .lock()
            .unwrap()
            .insert(U256::from(level), U256::from(wei));
        self
    }

    pub fn fail_balances(&self, fail: bool) {
        self.fail_balances.store(fail, Ordering::SeqCst);
    }

    pub fn fail_price(&self, fail: bool) {
        self.fail_price.store(fail, Ordering::SeqCst);
    }

    pub fn fail_upgrade(&self, failure: TxFailure) {
        *self.upgrade_failure.lock().unwrap() = Some(failure);
    }

    pub fn set_receipt(&self, receipt: std::result::Result<ReceiptStatus, TxFailure>) {
        *self.receipt.lock().unwrap() = receipt;
    }

    pub fn last_balance_request(&self) -> Option<(Address, Vec<U256>)> {
        self.balance_requests.lock().unwrap().last().cloned()
    }

    pub fn price_requests(&self) -> Vec<U256> {
        self.price_requests.lock().unwrap().clone()
    }

    pub fn upgrades(&self) -> Vec<(U256, U256)> {
        self.upgrades.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HammerContract for FakeHammerContract {
    async fn balance_of_batch(&self, owner: Address, ids: &[U256]) -> Result<Vec<U256>> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.balance_requests
            .lock()
            .unwrap()
            .push((owner, ids.to_vec()));
        if self.fail_balances.load(Ordering::SeqCst) {
            return Err(AppError::BlockchainRPC("balanceOfBatch reverted".to_string()));
        }
        Ok(self.balances.lock().unwrap().clone())
    }

    async fn level_price(&self, level_id: U256) -> Result<U256> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        self.price_requests.lock().unwrap().push(level_id);
        if self.fail_price.load(Ordering::SeqCst) {
            return Err(AppError::BlockchainRPC("levelPrices reverted".to_string()));
        }
        Ok(self
            .prices
            .lock()
            .unwrap()
            .get(&level_id)
            .copied()
            .unwrap_or_default())
    }

    async fn upgrade(&self, level_id: U256, value: U256) -> Result<TxHash> {
        self.upgrades.lock().unwrap().push((level_id, value));
        if let Some(failure) = self.upgrade_failure.lock().unwrap().clone() {
            return Err(AppError::Transaction(failure));
        }
        // The contract burns the old hammer and mints the target level.
        let mut balances = self.balances.lock().unwrap();
        for balance in balances.iter_mut() {
            *balance = U256::zero();
        }
        if let Some(slot) = balances.get_mut(level_id.as_usize()) {
            *slot = U256::one();
        }
        Ok(submitted_hash())
    }

    async fn wait_for_receipt(&self, _tx_hash: TxHash) -> Result<ReceiptStatus> {
        self.receipt_calls.fetch_add(1, Ordering::SeqCst);
        self.receipt
            .lock()
            .unwrap()
            .clone()
            .map_err(AppError::Transaction)
    }
}

pub struct StaticWallet(pub Account);

impl WalletProvider for StaticWallet {
    fn account(&self) -> Account {
        self.0
    }
}
