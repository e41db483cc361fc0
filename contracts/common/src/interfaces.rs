//! Collaborator interfaces.
//!
//! Each trait is turned into a typed client by `#[contractclient]`; the
//! contracts hold the collaborator's address and dispatch through the client.
//! A collaborator that fails aborts the calling invocation.

use soroban_sdk::{contractclient, Address, Env, Vec};

use crate::types::UtilizationEntry;

/// Price oracle for a set of assets.
#[contractclient(name = "ValueFeedClient")]
pub trait ValueFeed {
    /// Unit value of one whole token, 18-decimal fixed point. Zero means the
    /// value could not be computed.
    fn unit_value(env: Env, asset: Address) -> i128;

    /// Decimal precision of the asset's raw amounts.
    fn decimals(env: Env, asset: Address) -> u32;
}

/// Custodian that physically holds a Strategy's assets.
#[contractclient(name = "AssetHandlerClient")]
pub trait AssetHandler {
    fn receive(env: Env, from: Address, asset: Address, amount: i128);

    fn send(env: Env, to: Address, asset: Address, amount: i128);

    /// Live balance, including anything gained or lost outside the vault.
    fn balance_of(env: Env, asset: Address) -> i128;
}

/// The Strategy surface used by an EMP.
#[contractclient(name = "StrategyClient")]
pub trait StrategyInterface {
    fn utilization(env: Env) -> Vec<UtilizationEntry>;

    fn version(env: Env) -> u32;

    fn preview_deposit(env: Env, amounts: Vec<i128>) -> i128;

    fn deposit(env: Env, caller: Address, from: Address, amounts: Vec<i128>) -> i128;

    fn withdraw(env: Env, caller: Address, receiver: Address, share_amount: i128) -> Vec<i128>;

    fn balance(env: Env, holder: Address) -> i128;

    fn total_shares(env: Env) -> i128;
}
