//! Storage layout of the EMP contract.
//!
//! Instance storage holds roles, the Strategy list, the cached aggregate
//! table with the version stamps it was built from, transfer flags and the
//! Share supply. Share balances live in persistent storage.

use multivault_common::{StrategyAllocation, UtilizationEntry};
use soroban_sdk::{contracttype, Address, Env, Map, Vec};

use crate::error::EmpError;

pub(crate) const DAY_IN_LEDGERS: u32 = 17_280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub(crate) const BALANCE_BUMP_AMOUNT: u32 = 90 * DAY_IN_LEDGERS;
pub(crate) const BALANCE_LIFETIME_THRESHOLD: u32 = BALANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

#[contracttype]
pub enum DataKey {
    Manager,
    Factory,
    Strategies,
    Aggregate,
    Stamps,
    DepositOpen,
    WithdrawOpen,
    TotalShares,
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

pub(crate) fn read_manager(env: &Env) -> Result<Address, EmpError> {
    env.storage()
        .instance()
        .get(&DataKey::Manager)
        .ok_or(EmpError::NotInitialized)
}

pub(crate) fn write_manager(env: &Env, manager: &Address) {
    env.storage().instance().set(&DataKey::Manager, manager);
}

pub(crate) fn read_factory(env: &Env) -> Result<Address, EmpError> {
    env.storage()
        .instance()
        .get(&DataKey::Factory)
        .ok_or(EmpError::NotInitialized)
}

pub(crate) fn write_factory(env: &Env, factory: &Address) -> Result<(), EmpError> {
    if env.storage().instance().has(&DataKey::Factory) {
        return Err(EmpError::AlreadyInitialized);
    }
    env.storage().instance().set(&DataKey::Factory, factory);
    Ok(())
}

pub(crate) fn read_strategies(env: &Env) -> Vec<StrategyAllocation> {
    env.storage()
        .instance()
        .get(&DataKey::Strategies)
        .unwrap_or_else(|| Vec::new(env))
}

pub(crate) fn write_strategies(env: &Env, strategies: &Vec<StrategyAllocation>) {
    env.storage().instance().set(&DataKey::Strategies, strategies);
}

pub(crate) fn read_aggregate(env: &Env) -> Vec<UtilizationEntry> {
    env.storage()
        .instance()
        .get(&DataKey::Aggregate)
        .unwrap_or_else(|| Vec::new(env))
}

pub(crate) fn read_stamps(env: &Env) -> Map<Address, u32> {
    env.storage()
        .instance()
        .get(&DataKey::Stamps)
        .unwrap_or_else(|| Map::new(env))
}

/// Table and stamps are always written together.
pub(crate) fn write_aggregate(env: &Env, table: &Vec<UtilizationEntry>, stamps: &Map<Address, u32>) {
    env.storage().instance().set(&DataKey::Aggregate, table);
    env.storage().instance().set(&DataKey::Stamps, stamps);
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

pub(crate) fn read_total_shares(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalShares)
        .unwrap_or(0)
}

pub(crate) fn write_total_shares(env: &Env, total: i128) {
    env.storage().instance().set(&DataKey::TotalShares, &total);
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
