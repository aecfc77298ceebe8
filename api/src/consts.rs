use alloy::primitives::{address, Address};

/// The staking contract. It is also the ERC-20 token that gets staked.
pub const CONTRACT_ADDRESS: Address = address!("0x03720cc99a302c101dbd48489a6c2c8bb52d178d");

/// The chain the contract lives on (Polygon PoS mainnet).
pub const POLYGON_CHAIN_ID: u64 = 137;

/// The decimal precision of the staked token.
pub const TOKEN_DECIMALS: u8 = 18;

/// `currentAPY()` is reported in hundredths of a percent.
pub const APY_SCALE: u64 = 100;

/// Fee the contract withholds on unstake, in basis points (2%).
pub const UNSTAKE_FEE_BPS: u64 = 200;

/// Denominator for fee calculations.
pub const DENOMINATOR_BPS: u64 = 10_000;

/// Infura endpoint for Polygon mainnet. The project key is appended.
pub const INFURA_POLYGON_URL: &str = "https://polygon-mainnet.infura.io/v3/";

/// Where the ABI asset is read from when nothing else is configured.
pub const DEFAULT_ABI_PATH: &str = "abi.json";

/// Every function the client calls. An ABI missing one of these is rejected.
pub const REQUIRED_FUNCTIONS: [&str; 11] = [
    "currentAPY",
    "totalStaked",
    "rewardPool",
    "balanceOf",
    "dogeStakes",
    "calculateReward",
    "approve",
    "stake",
    "unstake",
    "claimReward",
    "donateToPool",
];
