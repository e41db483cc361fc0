//! Storage layout of the Strategy contract.
//!
//! ### Instance storage (contract-wide)
//! - `Manager`, `Factory`, `Handler`: role and collaborator addresses
//! - `DepositOpen`, `WithdrawOpen`: transfer flags
//! - `Utilization`, `Version`: committed table and its update counter
//! - `TotalShares`: Share supply
//! - `Feed(asset)`: value feed registered for an asset
//! - `Permitted(caller)`: aggregators allowed to deposit and withdraw
//!
//! ### Persistent storage (per holder)
//! - `Balance(holder)`: Share balance

use multivault_common::UtilizationEntry;
use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::error::StrategyError;

pub(crate) const DAY_IN_LEDGERS: u32 = 17_280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub(crate) const BALANCE_BUMP_AMOUNT: u32 = 90 * DAY_IN_LEDGERS;
pub(crate) const BALANCE_LIFETIME_THRESHOLD: u32 = BALANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

#[contracttype]
pub enum DataKey {
    Manager,
    Factory,
    Handler,
    DepositOpen,
    WithdrawOpen,
    Utilization,
    Version,
    TotalShares,
    Feed(Address),
    Permitted(Address),
    Balance(Address),
}

pub(crate) fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub(crate) fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Manager)
}

pub(crate) fn read_manager(env: &Env) -> Result<Address, StrategyError> {
    env.storage()
        .instance()
        .get(&DataKey::Manager)
        .ok_or(StrategyError::NotInitialized)
}

pub(crate) fn write_manager(env: &Env, manager: &Address) {
    env.storage().instance().set(&DataKey::Manager, manager);
}

pub(crate) fn read_factory(env: &Env) -> Result<Address, StrategyError> {
    env.storage()
        .instance()
        .get(&DataKey::Factory)
        .ok_or(StrategyError::NotInitialized)
}

/// The factory pointer is written once, by `initialize`.
pub(crate) fn write_factory(env: &Env, factory: &Address) -> Result<(), StrategyError> {
    if env.storage().instance().has(&DataKey::Factory) {
        return Err(StrategyError::AlreadyInitialized);
    }
    env.storage().instance().set(&DataKey::Factory, factory);
    Ok(())
}

pub(crate) fn read_handler(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Handler)
}

pub(crate) fn write_handler(env: &Env, handler: &Address) {
    env.storage().instance().set(&DataKey::Handler, handler);
}

pub(crate) fn is_deposit_open(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::DepositOpen)
        .unwrap_or(false)
}

pub(crate) fn write_deposit_open(env: &Env, open: bool) {
    env.storage().instance().set(&DataKey::DepositOpen, &open);
}

pub(crate) fn is_withdraw_open(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::WithdrawOpen)
        .unwrap_or(false)
}

pub(crate) fn write_withdraw_open(env: &Env, open: bool) {
    env.storage().instance().set(&DataKey::WithdrawOpen, &open);
}

pub(crate) fn read_utilization(env: &Env) -> Vec<UtilizationEntry> {
    env.storage()
        .instance()
        .get(&DataKey::Utilization)
        .unwrap_or_else(|| Vec::new(env))
}

pub(crate) fn write_utilization(env: &Env, table: &Vec<UtilizationEntry>) {
    env.storage().instance().set(&DataKey::Utilization, table);
}

pub(crate) fn read_version(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::Version).unwrap_or(0)
}

pub(crate) fn bump_version(env: &Env) -> u32 {
    let version = read_version(env).wrapping_add(1);
    env.storage().instance().set(&DataKey::Version, &version);
    version
}

pub(crate) fn read_total_shares(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalShares)
        .unwrap_or(0)
}

pub(crate) fn write_total_shares(env: &Env, total: i128) {
    env.storage().instance().set(&DataKey::TotalShares, &total);
}

pub(crate) fn read_feed(env: &Env, asset: &Address) -> Option<Address> {
    env.storage()
        .instance()
        .get(&DataKey::Feed(asset.clone()))
}

pub(crate) fn write_feed(env: &Env, asset: &Address, feed: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::Feed(asset.clone()), feed);
}

pub(crate) fn is_permitted(env: &Env, caller: &Address) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Permitted(caller.clone()))
        .unwrap_or(false)
}

pub(crate) fn write_permitted(env: &Env, caller: &Address, allowed: bool) {
    let key = DataKey::Permitted(caller.clone());
    if allowed {
        env.storage().instance().set(&key, &true);
    } else {
        env.storage().instance().remove(&key);
    }
}

pub(crate) fn read_balance(env: &Env, holder: &Address) -> i128 {
    let key = DataKey::Balance(holder.clone());
    match env.storage().persistent().get::<_, i128>(&key) {
        Some(balance) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, BALANCE_LIFETIME_THRESHOLD, BALANCE_BUMP_AMOUNT);
            balance
        }
        None => 0,
    }
}

pub(crate) fn write_balance(env: &Env, holder: &Address, balance: i128) {
    let key = DataKey::Balance(holder.clone());
    env.storage().persistent().set(&key, &balance);
    env.storage()
        .persistent()
        .extend_ttl(&key, BALANCE_LIFETIME_THRESHOLD, BALANCE_BUMP_AMOUNT);
}
