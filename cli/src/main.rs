mod abi;
mod app;
mod config;
mod contract;
mod fetch;
mod wallet;

use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use anyhow::{anyhow, bail};
use doge_staking_api::prelude::*;

use crate::abi::load_abi;
use crate::app::App;
use crate::config::Config;
use crate::contract::RpcStakingContract;
use crate::wallet::{RpcConnector, Wallet};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let command = std::env::var("COMMAND").map_err(|_| anyhow!("Missing COMMAND env var"))?;
    match command.as_str() {
        "abi" => {
            log_abi(&config).await?;
        }
        "stats" => {
            log_stats(&config).await?;
        }
        "position" => {
            log_position(&config).await?;
        }
        "dashboard" => {
            log_dashboard(&config).await?;
        }
        "fee" => {
            log_fee(&config)?;
        }
        "stake" | "unstake" | "claim" | "donate" => {
            let action = command
                .parse::<StakingAction>()
                .map_err(anyhow::Error::msg)?;
            transact(&config, action).await?;
        }
        _ => bail!("Invalid command"),
    };
    Ok(())
}

/// Loads the ABI and binds a read-only contract handle.
async fn boot(config: &Config) -> anyhow::Result<App<RpcStakingContract>> {
    let mut app = App::new();
    let abi = match app.install_abi(load_abi(&config.abi).await) {
        Some(abi) => abi.clone(),
        None => bail!(app.error().unwrap_or_default().to_string()),
    };
    let provider = ProviderBuilder::new()
        .connect_http(config.rpc_url.clone())
        .erased();
    app.attach_reader(RpcStakingContract::new(config.contract, abi, provider));
    Ok(app)
}

/// Resolves the wallet while the pool stats load, then opens the session.
async fn boot_with_wallet(config: &Config) -> anyhow::Result<App<RpcStakingContract>> {
    let mut app = boot(config).await?;
    let source = config
        .wallet
        .as_ref()
        .ok_or_else(|| anyhow!("Missing PRIVATE_KEY or KEYSTORE env var"))?;
    let (_, wallet) = tokio::join!(app.load_stats(), Wallet::init(source));
    let wallet = match wallet {
        Ok(wallet) => wallet,
        Err(err) => {
            app.report(err.clone());
            return Err(err.into());
        }
    };
    let abi = app.abi().cloned().unwrap_or_default();
    let connector = RpcConnector::new(wallet, config.rpc_url.clone(), config.contract, abi);
    app.connect(&connector).await?;
    Ok(app)
}

async fn log_abi(config: &Config) -> anyhow::Result<()> {
    let abi = load_abi(&config.abi).await?;
    println!("ABI");
    println!("  source: {:?}", config.abi);
    for name in REQUIRED_FUNCTIONS {
        let signature = abi
            .function(name)
            .and_then(|overloads| overloads.first())
            .map(|function| function.signature())
            .unwrap_or_default();
        println!("  {}: {}", name, signature);
    }
    println!(
        "  dogeStakes.amount: output {}",
        output_index(&abi, "dogeStakes", "amount")
    );
    Ok(())
}

async fn log_stats(config: &Config) -> anyhow::Result<()> {
    let mut app = boot(config).await?;
    if app.load_stats().await.is_none() {
        bail!(app.error().unwrap_or_default().to_string());
    }
    let display = app.display().grouped();
    println!("Pool");
    println!("  contract: {}", config.contract);
    println!("  apy: {}%", display.apy);
    println!("  total_staked: {} DOGE", display.total_staked);
    println!("  reward_pool: {} DOGE", display.reward_pool);
    Ok(())
}

async fn log_position(config: &Config) -> anyhow::Result<()> {
    let (account, position) = match config.account {
        Some(account) => {
            let mut app = boot(config).await?;
            match app.inspect(account).await {
                Some(position) => (account, position),
                None => bail!(app.error().unwrap_or_default().to_string()),
            }
        }
        None => {
            let mut app = boot_with_wallet(config).await?;
            let account = app
                .account()
                .ok_or_else(|| anyhow!(StakingError::NotConnected))?;
            match app.refresh_user().await {
                Some(position) => (account, position),
                None => bail!(app.error().unwrap_or_default().to_string()),
            }
        }
    };
    print_position(account, &position);
    Ok(())
}

fn print_position(account: Address, position: &UserPosition) {
    println!("Position");
    println!("  account: {}", account);
    println!(
        "  balance: {} DOGE",
        group_thousands(&position.balance_display())
    );
    println!(
        "  staked: {} DOGE",
        group_thousands(&position.staked_display())
    );
    println!(
        "  pending_reward: {} DOGE",
        group_thousands(&position.pending_reward_display())
    );
}

async fn log_dashboard(config: &Config) -> anyhow::Result<()> {
    let app = match config.wallet {
        Some(_) => boot_with_wallet(config).await?,
        None => {
            let mut app = boot(config).await?;
            app.load_stats().await;
            app
        }
    };
    let display = app.display().grouped();
    if config.json {
        println!("{}", serde_json::to_string_pretty(&display)?);
    } else {
        println!("Dashboard");
        println!("  contract: {}", config.contract);
        if let Some(account) = app.account() {
            println!("  account: {}", account);
        }
        println!("  apy: {}%", display.apy);
        println!("  total_staked: {} DOGE", display.total_staked);
        println!("  reward_pool: {} DOGE", display.reward_pool);
        println!("  balance: {} DOGE", display.balance);
        println!("  staked: {} DOGE", display.staked);
        println!("  pending_reward: {} DOGE", display.pending_reward);
    }
    if let Some(error) = app.error() {
        eprintln!("Error: {}", error);
    }
    Ok(())
}

/// Previews the unstake fee. The contract applies the fee itself.
fn log_fee(config: &Config) -> anyhow::Result<()> {
    let amount = config.amount.as_deref().unwrap_or_default();
    let preview = UnstakePreview::new(parse_token(amount)?);
    println!("Unstake");
    println!("  amount: {} DOGE", format_token(preview.gross));
    println!(
        "  fee: {} DOGE ({}%)",
        format_token(preview.fee),
        UNSTAKE_FEE_BPS as f64 / 100.0
    );
    println!("  received: {} DOGE", format_token(preview.net));
    Ok(())
}

async fn transact(config: &Config, action: StakingAction) -> anyhow::Result<()> {
    let mut app = boot_with_wallet(config).await?;
    if action.takes_amount() {
        let amount = config
            .amount
            .clone()
            .ok_or_else(|| anyhow!("Missing AMOUNT env var"))?;
        app.form_mut().set(action, amount);
    }
    app.execute(action).await?;
    println!("{} confirmed", action);
    let display = app.display().grouped();
    match action.refresh() {
        Refresh::UserPosition => {
            println!("  balance: {} DOGE", display.balance);
            println!("  staked: {} DOGE", display.staked);
            println!("  pending_reward: {} DOGE", display.pending_reward);
        }
        Refresh::RewardPool => {
            println!("  reward_pool: {} DOGE", display.reward_pool);
        }
    }
    if let Some(error) = app.error() {
        eprintln!("Error: {}", error);
    }
    Ok(())
}
