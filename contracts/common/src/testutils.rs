//! Test doubles for the vault collaborators.
//!
//! `MockValueFeed` serves prices set by the test. `MockAssetHandler` keeps a
//! ledger instead of moving tokens, records what it paid out per recipient,
//! and can accrue balance from outside the vault to model yield or donations.

use soroban_sdk::{contract, contractimpl, contracttype, Address, Env};

#[contracttype]
pub enum MockKey {
    Price(Address),
    Decimals(Address),
    Held(Address),
    Paid(Address, Address),
    Received(Address, Address),
}

#[contract]
pub struct MockValueFeed;

#[contractimpl]
impl MockValueFeed {
    pub fn set_price(env: Env, asset: Address, unit_value: i128, decimals: u32) {
        env.storage().instance().set(&MockKey::Price(asset.clone()), &unit_value);
        env.storage().instance().set(&MockKey::Decimals(asset), &decimals);
    }

    pub fn unit_value(env: Env, asset: Address) -> i128 {
        env.storage().instance().get(&MockKey::Price(asset)).unwrap_or(0)
    }

    pub fn decimals(env: Env, asset: Address) -> u32 {
        env.storage().instance().get(&MockKey::Decimals(asset)).unwrap_or(0)
    }
}

#[contract]
pub struct MockAssetHandler;

#[contractimpl]
impl MockAssetHandler {
    pub fn receive(env: Env, from: Address, asset: Address, amount: i128) {
        let held = Self::balance_of(env.clone(), asset.clone());
        env.storage().instance().set(&MockKey::Held(asset.clone()), &(held + amount));

        let key = MockKey::Received(from, asset);
        let received: i128 = env.storage().instance().get(&key).unwrap_or(0);
        env.storage().instance().set(&key, &(received + amount));
    }

    pub fn send(env: Env, to: Address, asset: Address, amount: i128) {
        let held = Self::balance_of(env.clone(), asset.clone());
        assert!(held >= amount, "handler balance too low");
        env.storage().instance().set(&MockKey::Held(asset.clone()), &(held - amount));

        let key = MockKey::Paid(to, asset);
        let paid: i128 = env.storage().instance().get(&key).unwrap_or(0);
        env.storage().instance().set(&key, &(paid + amount));
    }

    pub fn balance_of(env: Env, asset: Address) -> i128 {
        env.storage().instance().get(&MockKey::Held(asset)).unwrap_or(0)
    }

    /// Balance arriving from outside the vault (yield, donations).
    pub fn accrue(env: Env, asset: Address, amount: i128) {
        let held = Self::balance_of(env.clone(), asset.clone());
        env.storage().instance().set(&MockKey::Held(asset), &(held + amount));
    }

    /// Total sent to `to` in `asset` so far.
    pub fn paid(env: Env, to: Address, asset: Address) -> i128 {
        env.storage().instance().get(&MockKey::Paid(to, asset)).unwrap_or(0)
    }

    /// Total pulled from `from` in `asset` so far.
    pub fn received(env: Env, from: Address, asset: Address) -> i128 {
        env.storage().instance().get(&MockKey::Received(from, asset)).unwrap_or(0)
    }
}
