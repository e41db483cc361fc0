//! Events emitted by the Strategy contract.
//!
//! Every state-changing entry point publishes one event under a short topic
//! symbol so aggregators and indexers can follow table versions, flag flips
//! and share movements.

use multivault_common::UtilizationEntry;
use soroban_sdk::{contracttype, symbol_short, Address, Env, Vec};

/// Topic `init`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub manager: Address,
    pub factory: Address,
}

/// Topic `util_upd`. Carries the committed table and its new version.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UtilizationUpdatedEvent {
    pub version: u32,
    pub table: Vec<UtilizationEntry>,
}

/// Topic `feed_upd`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeedUpdatedEvent {
    pub asset: Address,
    pub feed: Address,
}

/// Topic `handler`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HandlerUpdatedEvent {
    pub old_handler: Option<Address>,
    pub new_handler: Address,
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
    /// Aggregator credited with the Shares
    pub caller: Address,
    /// Account the handler pulled the assets from
    pub from: Address,
    pub amounts: Vec<i128>,
    pub shares: i128,
}

/// Topic `withdraw`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub caller: Address,
    pub receiver: Address,
    pub shares: i128,
    pub payouts: Vec<i128>,
}

/// Topic `manager`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ManagerUpdatedEvent {
    pub old_manager: Address,
    pub new_manager: Address,
}

/// Topic `permit`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PermissionUpdatedEvent {
    pub target: Address,
    pub allowed: bool,
}

pub(crate) fn initialized(env: &Env, manager: Address, factory: Address) {
    env.events().publish(
        (symbol_short!("init"),),
        InitializedEvent { manager, factory },
    );
}

pub(crate) fn utilization_updated(env: &Env, version: u32, table: Vec<UtilizationEntry>) {
    env.events().publish(
        (symbol_short!("util_upd"),),
        UtilizationUpdatedEvent { version, table },
    );
}

pub(crate) fn feed_updated(env: &Env, asset: Address, feed: Address) {
    env.events().publish(
        (symbol_short!("feed_upd"),),
        FeedUpdatedEvent { asset, feed },
    );
}

pub(crate) fn handler_updated(env: &Env, old_handler: Option<Address>, new_handler: Address) {
    env.events().publish(
        (symbol_short!("handler"),),
        HandlerUpdatedEvent { old_handler, new_handler },
    );
}

pub(crate) fn deposit_open_updated(env: &Env, open: bool) {
    env.events()
        .publish((symbol_short!("dep_open"),), OpenUpdatedEvent { open });
}

pub(crate) fn withdraw_open_updated(env: &Env, open: bool) {
    env.events()
        .publish((symbol_short!("wd_open"),), OpenUpdatedEvent { open });
}

pub(crate) fn deposited(env: &Env, caller: Address, from: Address, amounts: Vec<i128>, shares: i128) {
    env.events().publish(
        (symbol_short!("deposit"),),
        DepositEvent { caller, from, amounts, shares },
    );
}

pub(crate) fn withdrawn(
    env: &Env,
    caller: Address,
    receiver: Address,
    shares: i128,
    payouts: Vec<i128>,
) {
    env.events().publish(
        (symbol_short!("withdraw"),),
        WithdrawEvent { caller, receiver, shares, payouts },
    );
}

pub(crate) fn manager_updated(env: &Env, old_manager: Address, new_manager: Address) {
    env.events().publish(
        (symbol_short!("manager"),),
        ManagerUpdatedEvent { old_manager, new_manager },
    );
}

pub(crate) fn permission_updated(env: &Env, target: Address, allowed: bool) {
    env.events().publish(
        (symbol_short!("permit"),),
        PermissionUpdatedEvent { target, allowed },
    );
}
