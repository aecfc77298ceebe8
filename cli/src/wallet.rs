use std::path::PathBuf;

use alloy::json_abi::JsonAbi;
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use doge_staking_api::prelude::*;

use crate::contract::{RpcStakingContract, StakingContract};

/// Where the signing key comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalletSource {
    /// Hex-encoded secp256k1 key, with or without `0x`.
    PrivateKey(String),

    /// Encrypted JSON keystore (geth/web3 secret storage).
    Keystore { path: PathBuf, password: String },
}

/// A resolved signer, not yet bound to any network.
#[derive(Clone, Debug)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    pub async fn init(source: &WalletSource) -> Result<Self, StakingError> {
        let signer = match source {
            WalletSource::PrivateKey(key) => key
                .trim()
                .parse::<PrivateKeySigner>()
                .map_err(|_| StakingError::WalletInit)?,
            WalletSource::Keystore { path, password } => {
                // Keystore decryption runs scrypt, keep it off the runtime threads.
                let (path, password) = (path.clone(), password.clone());
                tokio::task::spawn_blocking(move || {
                    PrivateKeySigner::decrypt_keystore(path, password)
                })
                .await
                .map_err(|_| StakingError::WalletInit)?
                .map_err(|_| StakingError::WalletInit)?
            }
        };
        Ok(Self { signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

/// A signer-bound contract plus what the wallet reported on connect.
pub struct Connection<C> {
    pub contract: C,
    pub account: Address,
    pub chain_id: u64,
}

/// Opens a signing session. Network validation is left to the caller.
#[allow(async_fn_in_trait)]
pub trait WalletConnector {
    type Contract: StakingContract;

    async fn connect(&self) -> Result<Connection<Self::Contract>, StakingError>;
}

/// Connects a local wallet to a JSON-RPC endpoint.
pub struct RpcConnector {
    wallet: Wallet,
    rpc_url: Url,
    contract: Address,
    abi: JsonAbi,
}

impl RpcConnector {
    pub fn new(wallet: Wallet, rpc_url: Url, contract: Address, abi: JsonAbi) -> Self {
        Self {
            wallet,
            rpc_url,
            contract,
            abi,
        }
    }
}

impl WalletConnector for RpcConnector {
    type Contract = RpcStakingContract;

    async fn connect(&self) -> Result<Connection<RpcStakingContract>, StakingError> {
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(self.wallet.signer.clone()))
            .connect_http(self.rpc_url.clone())
            .erased();
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(StakingError::transaction)?;
        Ok(Connection {
            contract: RpcStakingContract::new(self.contract, self.abi.clone(), provider),
            account: self.wallet.address(),
            chain_id,
        })
    }
}
