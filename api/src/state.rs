use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::utils::{format_apy, format_token, group_thousands, unstake_fee};

/// Pool-wide figures, readable without a wallet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PublicStats {
    /// `currentAPY()`, in hundredths of a percent.
    pub apy: U256,

    /// `totalStaked()`, in token units.
    pub total_staked: U256,

    /// `rewardPool()`, in token units.
    pub reward_pool: U256,
}

impl PublicStats {
    pub fn apy_display(&self) -> String {
        format_apy(self.apy)
    }

    pub fn total_staked_display(&self) -> String {
        format_token(self.total_staked)
    }

    pub fn reward_pool_display(&self) -> String {
        format_token(self.reward_pool)
    }
}

/// Figures tied to one account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserPosition {
    /// Wallet token balance.
    pub balance: U256,

    /// The `amount` field of the account's stake record.
    pub staked: U256,

    /// Reward claimable right now.
    pub pending_reward: U256,
}

impl UserPosition {
    pub fn balance_display(&self) -> String {
        format_token(self.balance)
    }

    pub fn staked_display(&self) -> String {
        format_token(self.staked)
    }

    pub fn pending_reward_display(&self) -> String {
        format_token(self.pending_reward)
    }
}

/// The part of a `dogeStakes` entry the client reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StakeRecord {
    pub amount: U256,
}

/// Expected outcome of an unstake, before the contract applies its fee.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnstakePreview {
    pub gross: U256,
    pub fee: U256,
    pub net: U256,
}

impl UnstakePreview {
    pub fn new(gross: U256) -> Self {
        let fee = unstake_fee(gross);
        Self {
            gross,
            fee,
            net: gross - fee,
        }
    }
}

/// Everything the dashboard shows, already formatted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayValues {
    pub apy: String,
    pub total_staked: String,
    pub reward_pool: String,
    pub balance: String,
    pub staked: String,
    pub pending_reward: String,
}

impl Default for DisplayValues {
    fn default() -> Self {
        let zero = || "0".to_string();
        Self {
            apy: zero(),
            total_staked: zero(),
            reward_pool: zero(),
            balance: zero(),
            staked: zero(),
            pending_reward: zero(),
        }
    }
}

impl DisplayValues {
    pub fn set_stats(&mut self, stats: &PublicStats) {
        self.apy = stats.apy_display();
        self.total_staked = stats.total_staked_display();
        self.reward_pool = stats.reward_pool_display();
    }

    pub fn set_position(&mut self, position: &UserPosition) {
        self.balance = position.balance_display();
        self.staked = position.staked_display();
        self.pending_reward = position.pending_reward_display();
    }

    /// Copy with thousands separators on every token figure.
    pub fn grouped(&self) -> Self {
        Self {
            apy: self.apy.clone(),
            total_staked: group_thousands(&self.total_staked),
            reward_pool: group_thousands(&self.reward_pool),
            balance: group_thousands(&self.balance),
            staked: group_thousands(&self.staked),
            pending_reward: group_thousands(&self.pending_reward),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const ONE: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_display_starts_at_zero() {
        let display = DisplayValues::default();
        assert_eq!(display.apy, "0");
        assert_eq!(display.pending_reward, "0");
    }

    #[test]
    fn test_set_stats() {
        let mut display = DisplayValues::default();
        display.set_stats(&PublicStats {
            apy: U256::from(30000),
            total_staked: U256::from(ONE),
            reward_pool: U256::from(2_500_000 * ONE),
        });
        assert_eq!(display.apy, "300.00");
        assert_eq!(display.total_staked, "1.0");
        assert_eq!(display.reward_pool, "2500000.0");
        assert_eq!(display.grouped().reward_pool, "2,500,000.0");
        assert_eq!(display.balance, "0");
    }

    #[test]
    fn test_unstake_preview() {
        let preview = UnstakePreview::new(U256::from(50 * ONE));
        assert_eq!(preview.fee, U256::from(ONE));
        assert_eq!(preview.net, U256::from(49 * ONE));
    }

    #[test]
    fn test_display_serializes() {
        let json = serde_json::to_value(DisplayValues::default()).unwrap();
        assert_eq!(json["total_staked"], "0");
    }
}
