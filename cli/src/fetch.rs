use alloy::primitives::Address;
use doge_staking_api::prelude::*;

use crate::contract::StakingContract;

/// Reads the three pool-wide figures concurrently.
pub async fn fetch_public_stats<C: StakingContract>(
    contract: &C,
) -> Result<PublicStats, StakingError> {
    let (apy, total_staked, reward_pool) = tokio::try_join!(
        contract.current_apy(),
        contract.total_staked(),
        contract.reward_pool()
    )?;
    Ok(PublicStats {
        apy,
        total_staked,
        reward_pool,
    })
}

/// Reads balance, stake record and claimable reward for `account` concurrently.
pub async fn fetch_user_position<C: StakingContract>(
    contract: &C,
    account: Address,
) -> Result<UserPosition, StakingError> {
    let (balance, stake, pending_reward) = tokio::try_join!(
        contract.balance_of(account),
        contract.doge_stakes(account),
        contract.calculate_reward(account)
    )?;
    Ok(UserPosition {
        balance,
        staked: stake.amount,
        pending_reward,
    })
}
