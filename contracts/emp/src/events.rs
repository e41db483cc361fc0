use multivault_common::{StrategyAllocation, UtilizationEntry};
use soroban_sdk::{contracttype, symbol_short, Address, Env, Vec};

/// Topic `init`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub manager: Address,
    pub factory: Address,
}

/// Topic `strat_upd`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StrategiesUpdatedEvent {
    pub strategies: Vec<StrategyAllocation>,
}

/// Topic `sync`. Carries the rebuilt aggregate table.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyncedEvent {
    pub table: Vec<UtilizationEntry>,
}

/// Topics `dep_open` and `wd_open`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OpenUpdatedEvent {
    pub open: bool,
}

/// Topic `deposit`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub user: Address,
    /// Amounts in aggregate table order
    pub amounts: Vec<i128>,
    pub shares: i128,
}

/// Topic `withdraw`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub user: Address,
    pub shares: i128,
    /// Strategy Shares redeemed per held Strategy
    pub legs: Vec<i128>,
}

/// Topic `manager`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ManagerUpdatedEvent {
    pub old_manager: Address,
    pub new_manager: Address,
}

pub(crate) fn initialized(env: &Env, manager: Address, factory: Address) {
    env.events().publish(
        (symbol_short!("init"),),
        InitializedEvent { manager, factory },
    );
}

pub(crate) fn strategies_updated(env: &Env, strategies: Vec<StrategyAllocation>) {
    env.events().publish(
        (symbol_short!("strat_upd"),),
        StrategiesUpdatedEvent { strategies },
    );
}

pub(crate) fn synced(env: &Env, table: Vec<UtilizationEntry>) {
    env.events()
        .publish((symbol_short!("sync"),), SyncedEvent { table });
}

pub(crate) fn deposit_open_updated(env: &Env, open: bool) {
    env.events()
        .publish((symbol_short!("dep_open"),), OpenUpdatedEvent { open });
}

pub(crate) fn withdraw_open_updated(env: &Env, open: bool) {
    env.events()
        .publish((symbol_short!("wd_open"),), OpenUpdatedEvent { open });
}

pub(crate) fn deposited(env: &Env, user: Address, amounts: Vec<i128>, shares: i128) {
    env.events().publish(
        (symbol_short!("deposit"),),
        DepositEvent { user, amounts, shares },
    );
}

pub(crate) fn withdrawn(env: &Env, user: Address, shares: i128, legs: Vec<i128>) {
    env.events().publish(
        (symbol_short!("withdraw"),),
        WithdrawEvent { user, shares, legs },
    );
}

pub(crate) fn manager_updated(env: &Env, old_manager: Address, new_manager: Address) {
    env.events().publish(
        (symbol_short!("manager"),),
        ManagerUpdatedEvent { old_manager, new_manager },
    );
}
