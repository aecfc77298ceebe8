use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, U256};
use doge_staking_api::prelude::*;

use crate::contract::StakingContract;
use crate::fetch::{fetch_public_stats, fetch_user_position};
use crate::wallet::WalletConnector;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// No ABI yet. Nothing else can run.
    Loading,
    Ready,
}

/// Pending user input, one field per amount-taking action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Form {
    pub stake: String,
    pub unstake: String,
    pub donate: String,
}

impl Form {
    pub fn input(&self, action: StakingAction) -> &str {
        match action {
            StakingAction::Stake => &self.stake,
            StakingAction::Unstake => &self.unstake,
            StakingAction::Donate => &self.donate,
            StakingAction::Claim => "",
        }
    }

    pub fn set(&mut self, action: StakingAction, value: impl Into<String>) {
        let value = value.into();
        match action {
            StakingAction::Stake => self.stake = value,
            StakingAction::Unstake => self.unstake = value,
            StakingAction::Donate => self.donate = value,
            StakingAction::Claim => {}
        }
    }

    fn clear(&mut self, action: StakingAction) {
        self.set(action, String::new());
    }
}

/// Set while a connect or an action is in flight. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    #[cfg(test)]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn acquire(&self) -> Result<BusyGuard, StakingError> {
        if self.0.swap(true, Ordering::SeqCst) {
            return Err(StakingError::Busy);
        }
        Ok(BusyGuard(self.clone()))
    }
}

struct BusyGuard(BusyFlag);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        (self.0).0.store(false, Ordering::SeqCst);
    }
}

struct Session<C> {
    contract: C,
    account: Address,
}

/// Client state: loaded ABI, contract handles, the values on display, form
/// input and the last error.
///
/// Every operation reduces its failure to the error line. Display values
/// only change on a successful read.
pub struct App<C> {
    abi: Option<JsonAbi>,
    reader: Option<C>,
    session: Option<Session<C>>,
    display: DisplayValues,
    form: Form,
    busy: BusyFlag,
    error: Option<String>,
}

impl<C: StakingContract> Default for App<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: StakingContract> App<C> {
    pub fn new() -> Self {
        Self {
            abi: None,
            reader: None,
            session: None,
            display: DisplayValues::default(),
            form: Form::default(),
            busy: BusyFlag::default(),
            error: None,
        }
    }

    pub fn stage(&self) -> Stage {
        match self.abi {
            Some(_) => Stage::Ready,
            None => Stage::Loading,
        }
    }

    pub fn abi(&self) -> Option<&JsonAbi> {
        self.abi.as_ref()
    }

    /// Installs the result of the one-time ABI load. On failure the app stays loading.
    pub fn install_abi(&mut self, abi: Result<JsonAbi, StakingError>) -> Option<&JsonAbi> {
        match abi {
            Ok(abi) => {
                self.abi = Some(abi);
                self.abi.as_ref()
            }
            Err(err) => {
                self.fail(err);
                None
            }
        }
    }

    /// Sets the read-only contract handle used for pool stats.
    pub fn attach_reader(&mut self, reader: C) {
        self.reader = Some(reader);
    }

    pub fn account(&self) -> Option<Address> {
        self.session.as_ref().map(|session| session.account)
    }

    pub fn display(&self) -> &DisplayValues {
        &self.display
    }

    #[cfg(test)]
    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn busy(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Records `err` as the message shown to the user.
    pub fn report(&mut self, err: StakingError) {
        self.fail(err);
    }

    fn fail(&mut self, err: StakingError) -> StakingError {
        self.error = Some(err.to_string());
        err
    }

    /// Reads APY, total staked and reward pool. Needs no wallet.
    pub async fn load_stats(&mut self) -> Option<PublicStats> {
        let reader = self.reader.as_ref()?;
        let stats = fetch_public_stats(reader).await;
        match stats {
            Ok(stats) => {
                self.display.set_stats(&stats);
                Some(stats)
            }
            Err(_) => {
                self.fail(StakingError::Stats);
                None
            }
        }
    }

    /// Reads another account's position through the read-only handle.
    /// The display is left untouched.
    pub async fn inspect(&mut self, account: Address) -> Option<UserPosition> {
        let reader = self.reader.as_ref()?;
        let position = fetch_user_position(reader, account).await;
        match position {
            Ok(position) => Some(position),
            Err(_) => {
                self.fail(StakingError::Refresh);
                None
            }
        }
    }

    /// Opens a wallet session and loads the account's position.
    ///
    /// The session is rejected unless the wallet is on Polygon; the account
    /// then stays unset. An error left by an earlier stats read is kept.
    pub async fn connect<W>(&mut self, connector: &W) -> Result<Address, StakingError>
    where
        W: WalletConnector<Contract = C>,
    {
        if self.stage() == Stage::Loading {
            return Err(self.fail(StakingError::AbiLoad));
        }
        let _busy = match self.busy.acquire() {
            Ok(guard) => guard,
            Err(err) => return Err(self.fail(err)),
        };
        let connection = match connector.connect().await {
            Ok(connection) => connection,
            Err(err) => return Err(self.fail(err)),
        };
        if connection.chain_id != POLYGON_CHAIN_ID {
            return Err(self.fail(StakingError::WrongNetwork {
                expected: POLYGON_CHAIN_ID,
                actual: connection.chain_id,
            }));
        }
        let account = connection.account;
        self.session = Some(Session {
            contract: connection.contract,
            account,
        });
        self.refresh_user().await;
        Ok(account)
    }

    /// Re-reads balance, stake and pending reward for the connected account.
    pub async fn refresh_user(&mut self) -> Option<UserPosition> {
        let session = self.session.as_ref()?;
        let position = fetch_user_position(&session.contract, session.account).await;
        match position {
            Ok(position) => {
                self.display.set_position(&position);
                Some(position)
            }
            Err(_) => {
                self.fail(StakingError::Refresh);
                None
            }
        }
    }

    pub async fn stake(&mut self) -> Result<(), StakingError> {
        self.execute(StakingAction::Stake).await
    }

    pub async fn unstake(&mut self) -> Result<(), StakingError> {
        self.execute(StakingAction::Unstake).await
    }

    pub async fn claim(&mut self) -> Result<(), StakingError> {
        self.execute(StakingAction::Claim).await
    }

    pub async fn donate(&mut self) -> Result<(), StakingError> {
        self.execute(StakingAction::Donate).await
    }

    /// Runs `action` with the amount from the form.
    ///
    /// Calls are submitted one at a time, each waiting for its receipt. The
    /// first failure stops the sequence; an approval already mined stays in
    /// effect and the input is kept.
    pub async fn execute(&mut self, action: StakingAction) -> Result<(), StakingError> {
        self.error = None;
        let result = self.dispatch(action).await;
        result.map_err(|err| self.fail(err))
    }

    async fn dispatch(&mut self, action: StakingAction) -> Result<(), StakingError> {
        let _busy = self.busy.acquire()?;
        let session = self.session.as_ref().ok_or(StakingError::NotConnected)?;
        let amount = if action.takes_amount() {
            parse_token(self.form.input(action))?
        } else {
            U256::ZERO
        };

        for call in plan(session.contract.address(), action, amount) {
            let confirmation = session.contract.submit(&call).await?;
            println!(
                "Transaction confirmed: {} (block {})",
                confirmation.hash,
                confirmation
                    .block_number
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "pending".to_string())
            );
        }
        self.form.clear(action);

        match action.refresh() {
            Refresh::UserPosition => {
                self.refresh_user().await;
            }
            Refresh::RewardPool => {
                self.refresh_reward_pool().await;
            }
        }
        Ok(())
    }

    /// Re-reads the reward pool through the session handle after a donation.
    async fn refresh_reward_pool(&mut self) -> Option<U256> {
        let session = self.session.as_ref()?;
        let reward_pool = session.contract.reward_pool().await;
        match reward_pool {
            Ok(reward_pool) => {
                self.display.reward_pool = format_token(reward_pool);
                Some(reward_pool)
            }
            Err(_) => {
                self.fail(StakingError::Refresh);
                None
            }
        }
    }
}
