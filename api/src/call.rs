use std::fmt;
use std::str::FromStr;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};

use crate::utils::format_token;

/// A state-changing contract call, one transaction each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakingCall {
    Approve { spender: Address, amount: U256 },
    Stake { amount: U256 },
    Unstake { amount: U256 },
    ClaimReward,
    DonateToPool { amount: U256 },
}

impl StakingCall {
    /// Name of the contract function this call invokes.
    pub fn function(&self) -> &'static str {
        match self {
            Self::Approve { .. } => "approve",
            Self::Stake { .. } => "stake",
            Self::Unstake { .. } => "unstake",
            Self::ClaimReward => "claimReward",
            Self::DonateToPool { .. } => "donateToPool",
        }
    }

    /// ABI arguments, in declaration order.
    pub fn args(&self) -> Vec<DynSolValue> {
        match *self {
            Self::Approve { spender, amount } => {
                vec![DynSolValue::Address(spender), DynSolValue::Uint(amount, 256)]
            }
            Self::Stake { amount } | Self::Unstake { amount } | Self::DonateToPool { amount } => {
                vec![DynSolValue::Uint(amount, 256)]
            }
            Self::ClaimReward => vec![],
        }
    }
}

impl fmt::Display for StakingCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approve { spender, amount } => {
                write!(f, "approve({}, {})", spender, format_token(*amount))
            }
            Self::Stake { amount } | Self::Unstake { amount } | Self::DonateToPool { amount } => {
                write!(f, "{}({})", self.function(), format_token(*amount))
            }
            Self::ClaimReward => write!(f, "claimReward()"),
        }
    }
}

/// A user-facing action. Each maps to one or two calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakingAction {
    Stake,
    Unstake,
    Claim,
    Donate,
}

/// What gets re-read after an action confirms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refresh {
    UserPosition,
    RewardPool,
}

impl StakingAction {
    pub fn takes_amount(&self) -> bool {
        !matches!(self, Self::Claim)
    }

    /// Whether the contract must be allowed to pull tokens first.
    pub fn needs_approval(&self) -> bool {
        matches!(self, Self::Stake | Self::Donate)
    }

    pub fn refresh(&self) -> Refresh {
        match self {
            Self::Donate => Refresh::RewardPool,
            _ => Refresh::UserPosition,
        }
    }
}

impl FromStr for StakingAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stake" => Ok(Self::Stake),
            "unstake" => Ok(Self::Unstake),
            "claim" => Ok(Self::Claim),
            "donate" => Ok(Self::Donate),
            other => Err(format!("unknown action {other}")),
        }
    }
}

impl fmt::Display for StakingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stake => "stake",
            Self::Unstake => "unstake",
            Self::Claim => "claim",
            Self::Donate => "donate",
        };
        f.write_str(name)
    }
}
