/// Application constants

// Hammer NFT levels (ERC-1155 token ids)
pub const LEVEL_IDS: [u64; 3] = [0, 1, 2];
pub const NO_LEVEL: i8 = -1;
pub const MAX_LEVEL: i8 = 2;

// Score multipliers per owned level
pub const MULTIPLIER_LEVEL_0: u8 = 1;
pub const MULTIPLIER_LEVEL_1: u8 = 2;
pub const MULTIPLIER_LEVEL_2: u8 = 3;

// Chains
pub const DEFAULT_CHAIN_ID: u64 = 8453; // Base mainnet
pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84532;

// Timing
pub const DEFAULT_REFRESH_DELAY_MS: u64 = 1_500;
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 10_000;

// User-facing text
pub const NOTICE_UPGRADE_NOT_READY: &str = "Wallet not connected or price not loaded.";
pub const NOTICE_MINT_REQUIRED: &str = "You must mint a Level 0 Hammer before upgrading.";
pub const PRICE_TEXT_LOADING: &str = "Loading Price...";
pub const PRICE_TEXT_ERROR: &str = "Error Loading Price";
pub const PRICE_TEXT_PENDING: &str = "...";
pub const PRICE_CURRENCY: &str = "ETH";

// API version
pub const API_VERSION: &str = "v1";
