use std::path::PathBuf;

use alloy::primitives::Address;
use alloy::transports::http::reqwest::Url;
use anyhow::{anyhow, bail};
use doge_staking_api::prelude::*;

use crate::abi::AbiSource;
use crate::wallet::WalletSource;

/// Runtime settings, read from the environment.
///
/// | var | meaning |
/// |---|---|
/// | `RPC` | JSON-RPC endpoint; overrides `INFURA_KEY` |
/// | `INFURA_KEY` | Infura project key for Polygon mainnet |
/// | `ABI` | ABI path or URL, defaults to `abi.json` |
/// | `CONTRACT` | contract address override |
/// | `PRIVATE_KEY` | hex signing key |
/// | `KEYSTORE`, `KEYSTORE_PASSWORD` | encrypted keystore, used when `PRIVATE_KEY` is unset |
/// | `AMOUNT` | decimal token amount for stake, unstake, donate and fee |
/// | `ACCOUNT` | address inspected by `position` instead of the wallet |
/// | `JSON` | `1`/`true` prints the dashboard as JSON |
#[derive(Clone, Debug)]
pub struct Config {
    pub rpc_url: Url,
    pub abi: AbiSource,
    pub contract: Address,
    pub wallet: Option<WalletSource>,
    pub amount: Option<String>,
    pub account: Option<Address>,
    pub json: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let rpc_url = match (var("RPC"), var("INFURA_KEY")) {
            (Some(rpc), _) => rpc,
            (None, Some(key)) => format!("{INFURA_POLYGON_URL}{}", key.trim()),
            (None, None) => bail!("Missing RPC or INFURA_KEY env var"),
        };
        let rpc_url = Url::parse(rpc_url.trim()).map_err(|e| anyhow!("Invalid RPC: {e}"))?;

        let abi = var("ABI")
            .map(|value| AbiSource::parse(value.trim()))
            .unwrap_or_default();

        let contract = match var("CONTRACT") {
            Some(value) => value
                .trim()
                .parse::<Address>()
                .map_err(|e| anyhow!("Invalid CONTRACT: {e}"))?,
            None => CONTRACT_ADDRESS,
        };

        let wallet = match (var("PRIVATE_KEY"), var("KEYSTORE")) {
            (Some(key), _) => Some(WalletSource::PrivateKey(key)),
            (None, Some(path)) => Some(WalletSource::Keystore {
                path: PathBuf::from(path),
                password: lookup("KEYSTORE_PASSWORD").unwrap_or_default(),
            }),
            (None, None) => None,
        };

        let account = match var("ACCOUNT") {
            Some(value) => Some(
                value
                    .trim()
                    .parse::<Address>()
                    .map_err(|e| anyhow!("Invalid ACCOUNT: {e}"))?,
            ),
            None => None,
        };

        let json = var("JSON")
            .map(|s| s == "1" || s.to_lowercase() == "true")
            .unwrap_or(false);

        Ok(Self {
            rpc_url,
            abi,
            contract,
            wallet,
            amount: lookup("AMOUNT"),
            account,
            json,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_infura_key_builds_polygon_url() {
        let config = config(&[("INFURA_KEY", "abc123")]).unwrap();
        assert_eq!(
            config.rpc_url.as_str(),
            "https://polygon-mainnet.infura.io/v3/abc123"
        );
        assert_eq!(config.contract, CONTRACT_ADDRESS);
        assert_eq!(config.abi, AbiSource::default());
        assert_eq!(config.wallet, None);
        assert!(!config.json);
    }

    #[test]
    fn test_rpc_overrides_infura() {
        let config = config(&[("RPC", "http://localhost:8545"), ("INFURA_KEY", "abc")]).unwrap();
        assert_eq!(config.rpc_url.as_str(), "http://localhost:8545/");
    }

    #[test]
    fn test_missing_rpc() {
        let err = config(&[]).unwrap_err();
        assert_eq!(err.to_string(), "Missing RPC or INFURA_KEY env var");
    }

    #[test]
    fn test_wallet_sources() {
        let config_key = config(&[("RPC", "http://localhost:8545"), ("PRIVATE_KEY", "0x01")]).unwrap();
        assert_eq!(
            config_key.wallet,
            Some(WalletSource::PrivateKey("0x01".to_string()))
        );

        let config_keystore = config(&[
            ("RPC", "http://localhost:8545"),
            ("KEYSTORE", "/keys/me.json"),
            ("KEYSTORE_PASSWORD", "pw"),
        ])
        .unwrap();
        assert_eq!(
            config_keystore.wallet,
            Some(WalletSource::Keystore {
                path: PathBuf::from("/keys/me.json"),
                password: "pw".to_string(),
            })
        );
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(config(&[("RPC", "http://localhost:8545"), ("CONTRACT", "0x12")]).is_err());
        assert!(config(&[("RPC", "http://localhost:8545"), ("ACCOUNT", "nope")]).is_err());
        let config = config(&[
            ("RPC", "http://localhost:8545"),
            ("ACCOUNT", "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            ("JSON", "true"),
        ])
        .unwrap();
        assert!(config.account.is_some());
        assert!(config.json);
    }
}
