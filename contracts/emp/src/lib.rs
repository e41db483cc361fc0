//! # Multivault EMP Contract
//!
//! The user-facing aggregator. An EMP holds several Strategies, each with an
//! EMP-level allocation, and issues its own Shares. Users deposit and
//! withdraw here; the EMP routes each request through its Strategies as
//! their permitted caller.
//!
//! ## Aggregate Table
//!
//! The EMP caches the weighted union of its Strategies' utilization tables,
//! ordered by asset address and free of duplicates:
//!
//! ```text
//! aggregate[asset] = Σ strategy_row[asset].allocation * emp_allocation[strategy]
//! ```
//!
//! Each Strategy bumps a version counter on every table update. Before any
//! deposit or withdrawal the EMP compares those versions with the stamps the
//! cached table was built from and rebuilds the table when any differ.
//!
//! ## Asset Flow
//!
//! ```text
//! Deposit:  User → [EMP.deposit] → split per Strategy → preview every leg
//!                → mint EMP Shares → Strategy.deposit(EMP, user, leg)
//! Withdraw: User → [EMP.withdraw] → burn EMP Shares
//!                → Strategy.withdraw(EMP, user, proportional Strategy Shares)
//! ```
//!
//! EMP Shares are minted 1:1 with the total value the legs contribute, the
//! same rule a Strategy applies to its own Shares.

#![no_std]

mod access;
mod aggregate;
pub mod error;
pub mod events;
mod storage;

use multivault_common::{
    interfaces::StrategyClient, math, StrategyAllocation, UtilizationEntry,
};
use soroban_sdk::{contract, contractimpl, log, Address, Env, Map, Vec};

pub use error::EmpError;
pub use storage::DataKey;

#[contract]
pub struct EmpContract;

#[contractimpl]
impl EmpContract {
    // ==========================================================================
    // INITIALIZATION
    // ==========================================================================

    /// Initializes the EMP with its manager and factory.
    ///
    /// The factory is expected to register this EMP as a permitted caller on
    /// every Strategy it will hold.
    ///
    /// # Errors
    /// - `AlreadyInitialized` if called a second time
    ///
    /// # Events
    /// Emits `InitializedEvent` under `init`.
    pub fn initialize(env: Env, manager: Address, factory: Address) -> Result<(), EmpError> {
        if storage::is_initialized(&env) {
            return Err(EmpError::AlreadyInitialized);
        }
        storage::write_factory(&env, &factory)?;
        storage::write_manager(&env, &manager);
        storage::write_deposit_open(&env, false);
        storage::write_withdraw_open(&env, false);
        storage::write_total_shares(&env, 0);
        storage::extend_instance(&env);

        events::initialized(&env, manager, factory);
        Ok(())
    }

    // ==========================================================================
    // CONFIGURATION
    // ==========================================================================

    /// Replaces the Strategy list and rebuilds the aggregate table.
    ///
    /// # Arguments
    /// * `caller` - Must be the manager
    /// * `strategies` - Strategy addresses, no duplicates
    /// * `allocations` - EMP-level fraction per Strategy; the sum may not
    ///   exceed ONE
    ///
    /// # Errors
    /// - `NotManager`, `TransfersOpen`
    /// - `PositionsOpen` if a dropped Strategy still holds EMP funds
    /// - `LengthMismatch`, `EmptyInput`, `DuplicateStrategy`,
    ///   `InvalidStrategy`, `InvalidAllocation`, `AllocationSum`
    ///
    /// # Events
    /// Emits `StrategiesUpdatedEvent` under `strat_upd`, then `SyncedEvent`.
    pub fn strategies_update(
        env: Env,
        caller: Address,
        strategies: Vec<Address>,
        allocations: Vec<i128>,
    ) -> Result<(), EmpError> {
        access::require_manager(&env, &caller)?;
        access::require_closed(&env)?;

        let held = aggregate::build_allocations(&env, &strategies, &allocations)?;
        access::require_no_stranded_positions(&env, &storage::read_strategies(&env), &held)?;
        let (table, stamps) = aggregate::build(&env, &held)?;

        storage::write_strategies(&env, &held);
        storage::write_aggregate(&env, &table, &stamps);
        storage::extend_instance(&env);

        events::strategies_updated(&env, held);
        events::synced(&env, table);
        Ok(())
    }

    /// Rebuilds the aggregate table from the Strategies' current tables.
    ///
    /// Calling it with no underlying change reproduces the same table.
    ///
    /// # Returns
    /// The rebuilt table.
    ///
    /// # Errors
    /// - `NotManager` if `caller` is not the manager
    ///
    /// # Events
    /// Emits `SyncedEvent` under `sync`.
    pub fn sync(env: Env, caller: Address) -> Result<Vec<UtilizationEntry>, EmpError> {
        access::require_manager(&env, &caller)?;
        let table = Self::resync(&env)?;
        storage::extend_instance(&env);
        Ok(table)
    }

    /// Opens or closes deposits.
    ///
    /// # Errors
    /// - `NotManager`
    /// - `NoStrategies` when opening with an empty aggregate table
    pub fn deposit_open_update(env: Env, caller: Address, open: bool) -> Result<(), EmpError> {
        access::require_manager(&env, &caller)?;
        if open && storage::read_aggregate(&env).is_empty() {
            return Err(EmpError::NoStrategies);
        }

        storage::write_deposit_open(&env, open);
        storage::extend_instance(&env);

        events::deposit_open_updated(&env, open);
        Ok(())
    }

    /// Opens or closes withdrawals. Same rules as `deposit_open_update`.
    pub fn withdraw_open_update(env: Env, caller: Address, open: bool) -> Result<(), EmpError> {
        access::require_manager(&env, &caller)?;
        if open && storage::read_aggregate(&env).is_empty() {
            return Err(EmpError::NoStrategies);
        }

        storage::write_withdraw_open(&env, open);
        storage::extend_instance(&env);

        events::withdraw_open_updated(&env, open);
        Ok(())
    }

    /// Hands the manager role to `new_manager`.
    pub fn manager_update(env: Env, caller: Address, new_manager: Address) -> Result<(), EmpError> {
        access::require_manager(&env, &caller)?;

        storage::write_manager(&env, &new_manager);
        storage::extend_instance(&env);

        events::manager_updated(&env, caller, new_manager);
        Ok(())
    }

    // ==========================================================================
    // CORE LIFECYCLE - DEPOSIT
    // ==========================================================================

    /// Deposits a vector of asset amounts and mints EMP Shares to `user`.
    ///
    /// `amounts[i]` pairs with row `i` of the aggregate table (see
    /// `aggregate`), refreshed first if any Strategy changed. Every Strategy
    /// leg is previewed before anything is written, and the legs' values must
    /// split exactly by the EMP-level allocations.
    ///
    /// # Arguments
    /// * `user` - Depositor; must authorize
    /// * `amounts` - Raw token amounts in aggregate table order
    ///
    /// # Returns
    /// EMP Shares minted.
    ///
    /// # Errors
    /// - `DepositClosed`, `NoStrategies`
    /// - `LengthMismatch`, `NegativeAmount`, `NonDepositableAmount`
    /// - `RatioMismatch` if an amount targets a row with no allocation, does
    ///   not split into whole Strategy legs, or the legs' values do not
    ///   follow the EMP allocations
    /// - `ZeroValue` if the deposit is worth nothing
    /// - any Strategy error raised while previewing or executing a leg
    ///
    /// # Events
    /// Emits `DepositEvent` under `deposit`.
    pub fn deposit(env: Env, user: Address, amounts: Vec<i128>) -> Result<i128, EmpError> {
        user.require_auth();
        if !storage::is_deposit_open(&env) {
            return Err(EmpError::DepositClosed);
        }
        Self::sync_if_stale(&env)?;

        let table = storage::read_aggregate(&env);
        if table.is_empty() {
            return Err(EmpError::NoStrategies);
        }
        if amounts.len() != table.len() {
            return Err(EmpError::LengthMismatch);
        }

        let mut merged: Map<Address, i128> = Map::new(&env);
        let mut by_asset: Map<Address, i128> = Map::new(&env);
        for (row, amount) in table.iter().zip(amounts.iter()) {
            if amount < 0 {
                return Err(EmpError::NegativeAmount);
            }
            if amount != 0 && !row.deposit {
                return Err(EmpError::NonDepositableAmount);
            }
            if amount != 0 && row.allocation == 0 {
                return Err(EmpError::RatioMismatch);
            }
            merged.set(row.asset.clone(), row.allocation);
            by_asset.set(row.asset, amount);
        }

        let strategies = storage::read_strategies(&env);
        let mut legs: Vec<Vec<i128>> = Vec::new(&env);
        let mut placed: Map<Address, i128> = Map::new(&env);
        for held in strategies.iter() {
            let strategy_table = StrategyClient::new(&env, &held.strategy).utilization();
            let leg = aggregate::split_leg(
                &env,
                &strategy_table,
                held.allocation,
                &merged,
                &by_asset,
            )?;
            aggregate::tally_leg(&mut placed, &strategy_table, &leg)?;
            legs.push_back(leg);
        }
        aggregate::require_fully_placed(&env, &placed, &by_asset)?;

        let mut values: Vec<i128> = Vec::new(&env);
        let mut total: i128 = 0;
        let mut allocated: i128 = 0;
        for (held, leg) in strategies.iter().zip(legs.iter()) {
            let value = if leg.iter().any(|amount| amount > 0) {
                StrategyClient::new(&env, &held.strategy).preview_deposit(&leg)
            } else {
                0
            };

            total = total.checked_add(value).ok_or(EmpError::MathOverflow)?;
            allocated = allocated
                .checked_add(held.allocation)
                .ok_or(EmpError::MathOverflow)?;
            values.push_back(value);
        }

        if total == 0 {
            return Err(EmpError::ZeroValue);
        }
        Self::require_proportional(&env, &strategies, &values, total, allocated)?;

        Self::mint(&env, &user, total)?;
        storage::extend_instance(&env);

        let this = env.current_contract_address();
        for ((held, leg), value) in strategies.iter().zip(legs.iter()).zip(values.iter()) {
            if value > 0 {
                StrategyClient::new(&env, &held.strategy).deposit(&this, &user, &leg);
            }
        }

        events::deposited(&env, user, amounts, total);
        Ok(total)
    }

    // ==========================================================================
    // CORE LIFECYCLE - WITHDRAW
    // ==========================================================================

    /// Burns `share_amount` of `user`'s EMP Shares and redeems the matching
    /// slice of every Strategy position, paid straight to `user`.
    ///
    /// EMP Shares are burned before any Strategy withdrawal is issued.
    ///
    /// # Returns
    /// Strategy Shares redeemed per held Strategy.
    ///
    /// # Errors
    /// - `WithdrawClosed`
    /// - `ZeroAmount` if `share_amount` is not positive
    /// - `InsufficientShares` if `user` holds fewer EMP Shares
    ///
    /// # Events
    /// Emits `WithdrawEvent` under `withdraw`.
    pub fn withdraw(env: Env, user: Address, share_amount: i128) -> Result<Vec<i128>, EmpError> {
        user.require_auth();
        if !storage::is_withdraw_open(&env) {
            return Err(EmpError::WithdrawClosed);
        }
        if share_amount <= 0 {
            return Err(EmpError::ZeroAmount);
        }
        if storage::read_balance(&env, &user) < share_amount {
            return Err(EmpError::InsufficientShares);
        }
        Self::sync_if_stale(&env)?;

        let this = env.current_contract_address();
        let strategies = storage::read_strategies(&env);
        let total_before = storage::read_total_shares(&env);

        let mut legs: Vec<i128> = Vec::new(&env);
        for held in strategies.iter() {
            let position = StrategyClient::new(&env, &held.strategy).balance(&this);
            let leg = math::mul_div(position, share_amount, total_before)
                .ok_or(EmpError::MathOverflow)?;
            legs.push_back(leg);
        }

        Self::burn(&env, &user, share_amount)?;
        storage::extend_instance(&env);

        for (held, leg) in strategies.iter().zip(legs.iter()) {
            if leg > 0 {
                StrategyClient::new(&env, &held.strategy).withdraw(&this, &user, &leg);
            }
        }

        events::withdrawn(&env, user, share_amount, legs.clone());
        Ok(legs)
    }

    // ==========================================================================
    // READ FUNCTIONS
    // ==========================================================================

    pub fn strategies(env: Env) -> Vec<StrategyAllocation> {
        storage::read_strategies(&env)
    }

    /// Returns the cached aggregate table, ordered by asset address.
    pub fn aggregate(env: Env) -> Vec<UtilizationEntry> {
        storage::read_aggregate(&env)
    }

    /// Returns the Strategy table version the cache was built from.
    pub fn stamp(env: Env, strategy: Address) -> Option<u32> {
        storage::read_stamps(&env).get(strategy)
    }

    /// Returns whether any Strategy changed its table since the last sync.
    pub fn is_stale(env: Env) -> bool {
        aggregate::is_stale(
            &env,
            &storage::read_strategies(&env),
            &storage::read_stamps(&env),
        )
    }

    pub fn manager(env: Env) -> Result<Address, EmpError> {
        storage::read_manager(&env)
    }

    pub fn factory(env: Env) -> Result<Address, EmpError> {
        storage::read_factory(&env)
    }

    pub fn is_deposit_open(env: Env) -> bool {
        storage::is_deposit_open(&env)
    }

    pub fn is_withdraw_open(env: Env) -> bool {
        storage::is_withdraw_open(&env)
    }

    pub fn total_shares(env: Env) -> i128 {
        storage::read_total_shares(&env)
    }

    pub fn balance(env: Env, holder: Address) -> i128 {
        storage::read_balance(&env, &holder)
    }

    // ==========================================================================
    // INTERNAL HELPERS
    // ==========================================================================

    fn resync(env: &Env) -> Result<Vec<UtilizationEntry>, EmpError> {
        let (table, stamps) = aggregate::build(env, &storage::read_strategies(env))?;
        storage::write_aggregate(env, &table, &stamps);
        events::synced(env, table.clone());
        Ok(table)
    }

    fn sync_if_stale(env: &Env) -> Result<(), EmpError> {
        let strategies = storage::read_strategies(env);
        if aggregate::is_stale(env, &strategies, &storage::read_stamps(env)) {
            log!(env, "aggregate table stale, resyncing");
            Self::resync(env)?;
        }
        Ok(())
    }

    /// Each leg's value must be exactly its EMP allocation's slice of the
    /// total. No tolerance is applied.
    fn require_proportional(
        env: &Env,
        strategies: &Vec<StrategyAllocation>,
        values: &Vec<i128>,
        total: i128,
        allocated: i128,
    ) -> Result<(), EmpError> {
        for (held, value) in strategies.iter().zip(values.iter()) {
            let expected = math::mul_div(total, held.allocation, allocated)
                .ok_or(EmpError::MathOverflow)?;
            if value != expected {
                log!(
                    env,
                    "leg value mismatch: strategy {}, value {}, expected {}",
                    held.strategy,
                    value,
                    expected
                );
                return Err(EmpError::RatioMismatch);
            }
        }
        Ok(())
    }

    fn mint(env: &Env, to: &Address, shares: i128) -> Result<(), EmpError> {
        let balance = storage::read_balance(env, to)
            .checked_add(shares)
            .ok_or(EmpError::MathOverflow)?;
        let total = storage::read_total_shares(env)
            .checked_add(shares)
            .ok_or(EmpError::MathOverflow)?;
        storage::write_balance(env, to, balance);
        storage::write_total_shares(env, total);
        Ok(())
    }

    fn burn(env: &Env, from: &Address, shares: i128) -> Result<(), EmpError> {
        let balance = storage::read_balance(env, from)
            .checked_sub(shares)
            .ok_or(EmpError::MathOverflow)?;
        let total = storage::read_total_shares(env)
            .checked_sub(shares)
            .ok_or(EmpError::MathOverflow)?;
        if balance < 0 || total < 0 {
            return Err(EmpError::InsufficientShares);
        }
        storage::write_balance(env, from, balance);
        storage::write_total_shares(env, total);
        Ok(())
    }
}
