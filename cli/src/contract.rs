use alloy::contract::{ContractInstance, Interface};
use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::JsonAbi;
use alloy::network::ReceiptResponse;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::DynProvider;
use doge_staking_api::prelude::*;

/// A mined transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub hash: TxHash,
    pub block_number: Option<u64>,
}

/// The staking contract surface the client depends on.
#[allow(async_fn_in_trait)]
pub trait StakingContract {
    fn address(&self) -> Address;

    async fn current_apy(&self) -> Result<U256, StakingError>;

    async fn total_staked(&self) -> Result<U256, StakingError>;

    async fn reward_pool(&self) -> Result<U256, StakingError>;

    async fn balance_of(&self, owner: Address) -> Result<U256, StakingError>;

    async fn doge_stakes(&self, owner: Address) -> Result<StakeRecord, StakingError>;

    async fn calculate_reward(&self, owner: Address) -> Result<U256, StakingError>;

    /// Sends `call` and waits until it is mined. A reverted receipt is an error.
    async fn submit(&self, call: &StakingCall) -> Result<Confirmation, StakingError>;
}

/// Contract binding over JSON-RPC, encoded from the loaded ABI.
///
/// Bound to a read-only provider it serves the view functions only; bound to
/// a wallet provider it can also submit.
pub struct RpcStakingContract {
    instance: ContractInstance<DynProvider>,
    stake_amount_index: usize,
}

impl RpcStakingContract {
    pub fn new(address: Address, abi: JsonAbi, provider: DynProvider) -> Self {
        let stake_amount_index = output_index(&abi, "dogeStakes", "amount");
        Self {
            instance: ContractInstance::new(address, provider, Interface::new(abi)),
            stake_amount_index,
        }
    }

    async fn read(
        &self,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, StakingError> {
        self.instance
            .function(function, args)
            .map_err(StakingError::transaction)?
            .call()
            .await
            .map_err(StakingError::transaction)
    }

    async fn read_uint(
        &self,
        function: &str,
        args: &[DynSolValue],
        index: usize,
    ) -> Result<U256, StakingError> {
        let values = self.read(function, args).await?;
        uint_at(&values, index).ok_or_else(|| {
            StakingError::Transaction(format!("{function} returned no integer at output {index}"))
        })
    }
}

impl StakingContract for RpcStakingContract {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn current_apy(&self) -> Result<U256, StakingError> {
        self.read_uint("currentAPY", &[], 0).await
    }

    async fn total_staked(&self) -> Result<U256, StakingError> {
        self.read_uint("totalStaked", &[], 0).await
    }

    async fn reward_pool(&self) -> Result<U256, StakingError> {
        self.read_uint("rewardPool", &[], 0).await
    }

    async fn balance_of(&self, owner: Address) -> Result<U256, StakingError> {
        self.read_uint("balanceOf", &[DynSolValue::Address(owner)], 0)
            .await
    }

    async fn doge_stakes(&self, owner: Address) -> Result<StakeRecord, StakingError> {
        let amount = self
            .read_uint(
                "dogeStakes",
                &[DynSolValue::Address(owner)],
                self.stake_amount_index,
            )
            .await?;
        Ok(StakeRecord { amount })
    }

    async fn calculate_reward(&self, owner: Address) -> Result<U256, StakingError> {
        self.read_uint("calculateReward", &[DynSolValue::Address(owner)], 0)
            .await
    }

    async fn submit(&self, call: &StakingCall) -> Result<Confirmation, StakingError> {
        let pending = self
            .instance
            .function(call.function(), &call.args())
            .map_err(StakingError::transaction)?
            .send()
            .await
            .map_err(StakingError::transaction)?;
        println!("Transaction submitted: {} ({})", pending.tx_hash(), call);
        let receipt = pending
            .get_receipt()
            .await
            .map_err(StakingError::transaction)?;
        if !receipt.status() {
            return Err(StakingError::Transaction(format!(
                "{} reverted in transaction {}",
                call.function(),
                receipt.transaction_hash
            )));
        }
        Ok(Confirmation {
            hash: receipt.transaction_hash,
            block_number: receipt.block_number,
        })
    }
}

/// Integer at `index`. A struct returned as one tuple yields its first field.
fn uint_at(values: &[DynSolValue], index: usize) -> Option<U256> {
    match values.get(index)? {
        DynSolValue::Tuple(fields) => fields.first()?.as_uint().map(|(value, _)| value),
        value => value.as_uint().map(|(value, _)| value),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_uint_at_flat_outputs() {
        let values = vec![
            DynSolValue::Uint(U256::from(7), 256),
            DynSolValue::Uint(U256::from(9), 256),
        ];
        assert_eq!(uint_at(&values, 1), Some(U256::from(9)));
        assert_eq!(uint_at(&values, 2), None);
    }

    #[test]
    fn test_uint_at_struct_output() {
        let values = vec![DynSolValue::Tuple(vec![
            DynSolValue::Uint(U256::from(42), 256),
            DynSolValue::Uint(U256::from(1_700_000_000), 256),
        ])];
        assert_eq!(uint_at(&values, 0), Some(U256::from(42)));
    }

    #[test]
    fn test_uint_at_wrong_type() {
        let values = vec![DynSolValue::Bool(true)];
        assert_eq!(uint_at(&values, 0), None);
    }
}
