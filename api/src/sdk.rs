use alloy::primitives::{Address, U256};

use crate::call::{StakingAction, StakingCall};

pub fn approve(spender: Address, amount: U256) -> StakingCall {
    StakingCall::Approve { spender, amount }
}

pub fn stake(amount: U256) -> StakingCall {
    StakingCall::Stake { amount }
}

/// The contract withholds its unstake fee itself; `amount` is the gross figure.
pub fn unstake(amount: U256) -> StakingCall {
    StakingCall::Unstake { amount }
}

pub fn claim_reward() -> StakingCall {
    StakingCall::ClaimReward
}

pub fn donate_to_pool(amount: U256) -> StakingCall {
    StakingCall::DonateToPool { amount }
}

/// Calls to submit for `action`, in the order they must confirm.
///
/// Stake and donate pull tokens from the caller, so they are preceded by an
/// approval of `contract` for exactly `amount`. `amount` is ignored for claim.
pub fn plan(contract: Address, action: StakingAction, amount: U256) -> Vec<StakingCall> {
    match action {
        StakingAction::Stake => vec![approve(contract, amount), stake(amount)],
        StakingAction::Unstake => vec![unstake(amount)],
        StakingAction::Claim => vec![claim_reward()],
        StakingAction::Donate => vec![approve(contract, amount), donate_to_pool(amount)],
    }
}

#[cfg(test)]
mod tests {
    use alloy::dyn_abi::DynSolValue;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::consts::CONTRACT_ADDRESS;

    #[test_case(StakingAction::Stake, &["approve", "stake"]; "stake approves first")]
    #[test_case(StakingAction::Unstake, &["unstake"]; "unstake is a single call")]
    #[test_case(StakingAction::Claim, &["claimReward"]; "claim takes no approval")]
    #[test_case(StakingAction::Donate, &["approve", "donateToPool"]; "donate approves first")]
    fn test_plan_order(action: StakingAction, expected: &[&str]) {
        let calls = plan(CONTRACT_ADDRESS, action, U256::from(5));
        let names: Vec<&str> = calls.iter().map(|c| c.function()).collect();
        assert_eq!(names, expected);
        assert_eq!(action.needs_approval(), expected.len() == 2);
    }

    #[test]
    fn test_approval_targets_contract_for_exact_amount() {
        let amount = U256::from(1_500_000_000_000_000_000u128);
        let calls = plan(CONTRACT_ADDRESS, StakingAction::Stake, amount);
        assert_eq!(calls[0], approve(CONTRACT_ADDRESS, amount));
        assert_eq!(
            calls[0].args(),
            vec![
                DynSolValue::Address(CONTRACT_ADDRESS),
                DynSolValue::Uint(amount, 256)
            ]
        );
        assert_eq!(calls[1].to_string(), "stake(1.5)");
    }

    #[test]
    fn test_claim_has_no_args() {
        assert!(claim_reward().args().is_empty());
        assert_eq!(claim_reward().to_string(), "claimReward()");
    }

    #[test]
    fn test_action_names() {
        for name in ["stake", "unstake", "claim", "donate"] {
            let action: StakingAction = name.parse().unwrap();
            assert_eq!(action.to_string(), name);
        }
        assert!("withdraw".parse::<StakingAction>().is_err());
        assert_eq!(StakingAction::Donate.refresh(), crate::call::Refresh::RewardPool);
        assert!(!StakingAction::Claim.takes_amount());
    }
}
