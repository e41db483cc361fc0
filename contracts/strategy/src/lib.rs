//! # Multivault Strategy Contract
//!
//! A multi-asset vault unit. Depositors contribute a vector of token amounts
//! matching the manager's utilization table and receive Shares equal to the
//! value contributed. Withdrawals burn Shares for a proportional slice of the
//! handler's live balances.
//!
//! ## Roles
//!
//! - **Manager**: edits the utilization table, registers value feeds, sets the
//!   handler and opens/closes transfers. Transferable.
//! - **Factory**: set once at initialization, never changes. Registers the
//!   aggregators (EMPs) permitted to deposit and withdraw.
//! - **Permitted callers**: the factory and the aggregators it registered.
//!   End users never call a Strategy directly.
//!
//! ## Share Accounting Model
//!
//! ```text
//! value_i = amount_i * unit_value_i / 10^decimals_i
//! shares  = Σ value_i                      (deposit, 18-decimal value units)
//! payout_i = live_balance_i * shares / total_shares   (withdraw)
//! ```
//!
//! A deposit is accepted only if every depositable asset's share of the total
//! value equals its allocation fraction exactly.
//!
//! ## Asset Flow
//!
//! ```text
//! Deposit:  EMP → [Strategy.deposit] → validate → mint Shares → Handler.receive(from)
//! Withdraw: EMP → [Strategy.withdraw] → burn Shares → Handler.send(receiver)
//! ```
//!
//! ## Lifecycle
//!
//! The table and the handler can only change while both transfer flags are
//! closed, and a flag can only open once a handler exists and the table sums
//! to ONE. Every table update bumps a version counter that aggregators use to
//! detect a stale cached view.

#![no_std]

mod access;
mod accounting;
mod allocation;
pub mod error;
pub mod events;
mod storage;

use multivault_common::{interfaces::AssetHandlerClient, UtilizationEntry, UtilizationParams};
use soroban_sdk::{contract, contractimpl, Address, Env, Vec};

pub use error::StrategyError;
pub use storage::DataKey;

#[contract]
pub struct StrategyContract;

#[contractimpl]
impl StrategyContract {
    // ==========================================================================
    // INITIALIZATION
    // ==========================================================================

    /// Initializes the Strategy with its manager and factory.
    ///
    /// # Arguments
    /// * `env` - The Soroban environment
    /// * `manager` - Address allowed to configure the Strategy
    /// * `factory` - Deploying factory; immutable once set
    ///
    /// # Errors
    /// - `AlreadyInitialized` if called a second time
    ///
    /// # Events
    /// Emits `InitializedEvent` under `init`.
    pub fn initialize(env: Env, manager: Address, factory: Address) -> Result<(), StrategyError> {
        if storage::is_initialized(&env) {
            return Err(StrategyError::AlreadyInitialized);
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
    // CONFIGURATION - UTILIZATION TABLE
    // ==========================================================================

    /// Replaces the utilization table.
    ///
    /// `assets[i]` is paired with `params[i]`; the committed table keeps this
    /// order, which is also the order deposit amounts must follow.
    ///
    /// # Arguments
    /// * `caller` - Must be the manager
    /// * `assets` - Asset addresses, no duplicates
    /// * `params` - Flags and allocation fraction per asset
    ///
    /// # Returns
    /// The new table version.
    ///
    /// # Errors
    /// - `NotManager` if `caller` is not the manager
    /// - `TransfersOpen` while deposits or withdrawals are open
    /// - `LengthMismatch`, `EmptyInput`, `DuplicateAsset`, `InvalidAsset`,
    ///   `InvalidAllocation` on malformed input
    /// - `FeedNotSet` if an asset has no registered value feed
    /// - `AllocationSum` if depositable allocations do not sum to ONE
    ///
    /// # Events
    /// Emits `UtilizationUpdatedEvent` under `util_upd`.
    pub fn update_utilization(
        env: Env,
        caller: Address,
        assets: Vec<Address>,
        params: Vec<UtilizationParams>,
    ) -> Result<u32, StrategyError> {
        access::require_manager(&env, &caller)?;
        access::require_closed(&env)?;

        let table = allocation::build_table(&env, &assets, &params)?;

        storage::write_utilization(&env, &table);
        let version = storage::bump_version(&env);
        storage::extend_instance(&env);

        events::utilization_updated(&env, version, table);
        Ok(version)
    }

    /// Registers the value feed that prices `asset`.
    ///
    /// # Errors
    /// - `NotManager` if `caller` is not the manager
    /// - `InvalidAsset` if `asset` is this contract
    pub fn value_feed_update(
        env: Env,
        caller: Address,
        asset: Address,
        feed: Address,
    ) -> Result<(), StrategyError> {
        access::require_manager(&env, &caller)?;
        if asset == env.current_contract_address() {
            return Err(StrategyError::InvalidAsset);
        }

        storage::write_feed(&env, &asset, &feed);
        storage::extend_instance(&env);

        events::feed_updated(&env, asset, feed);
        Ok(())
    }

    // ==========================================================================
    // CONFIGURATION - HANDLER AND TRANSFER FLAGS
    // ==========================================================================

    /// Sets the asset handler.
    ///
    /// The handler starts unset and can only be written while both transfer
    /// flags are closed, so custody never moves under open deposits.
    ///
    /// # Errors
    /// - `NotManager` if `caller` is not the manager
    /// - `TransfersOpen` while deposits or withdrawals are open
    ///
    /// # Events
    /// Emits `HandlerUpdatedEvent` under `handler`.
    pub fn handler_update(env: Env, caller: Address, handler: Address) -> Result<(), StrategyError> {
        access::require_manager(&env, &caller)?;
        access::require_closed(&env)?;

        let old_handler = storage::read_handler(&env);
        storage::write_handler(&env, &handler);
        storage::extend_instance(&env);

        events::handler_updated(&env, old_handler, handler);
        Ok(())
    }

    /// Opens or closes deposits.
    ///
    /// # Errors
    /// - `NotManager` if `caller` is not the manager
    /// - `HandlerNotSet` when opening without a handler
    /// - `TableNotCommitted` when opening without a table summing to ONE
    ///
    /// # Events
    /// Emits `OpenUpdatedEvent` under `dep_open`.
    pub fn deposit_open_update(env: Env, caller: Address, open: bool) -> Result<(), StrategyError> {
        access::require_manager(&env, &caller)?;
        if open {
            Self::require_ready(&env)?;
        }

        storage::write_deposit_open(&env, open);
        storage::extend_instance(&env);

        events::deposit_open_updated(&env, open);
        Ok(())
    }

    /// Opens or closes withdrawals. Same rules as `deposit_open_update`.
    ///
    /// # Events
    /// Emits `OpenUpdatedEvent` under `wd_open`.
    pub fn withdraw_open_update(env: Env, caller: Address, open: bool) -> Result<(), StrategyError> {
        access::require_manager(&env, &caller)?;
        if open {
            Self::require_ready(&env)?;
        }

        storage::write_withdraw_open(&env, open);
        storage::extend_instance(&env);

        events::withdraw_open_updated(&env, open);
        Ok(())
    }

    // ==========================================================================
    // ACCESS CONTROL
    // ==========================================================================

    /// Hands the manager role to `new_manager`.
    ///
    /// # Errors
    /// - `NotManager` if `caller` is not the manager
    ///
    /// # Events
    /// Emits `ManagerUpdatedEvent` under `manager`.
    pub fn manager_update(env: Env, caller: Address, new_manager: Address) -> Result<(), StrategyError> {
        access::require_manager(&env, &caller)?;

        storage::write_manager(&env, &new_manager);
        storage::extend_instance(&env);

        events::manager_updated(&env, caller, new_manager);
        Ok(())
    }

    /// Allows or revokes an aggregator's right to deposit and withdraw.
    ///
    /// # Errors
    /// - `NotFactory` if `caller` is not the factory
    ///
    /// # Events
    /// Emits `PermissionUpdatedEvent` under `permit`.
    pub fn caller_permission_update(
        env: Env,
        caller: Address,
        target: Address,
        allowed: bool,
    ) -> Result<(), StrategyError> {
        access::require_factory(&env, &caller)?;

        storage::write_permitted(&env, &target, allowed);
        storage::extend_instance(&env);

        events::permission_updated(&env, target, allowed);
        Ok(())
    }

    // ==========================================================================
    // CORE LIFECYCLE - DEPOSIT
    // ==========================================================================

    /// Values `amounts` against the committed table without touching state.
    ///
    /// Runs the same validation as `deposit` minus the caller and flag
    /// checks. Aggregators use it to validate every leg before mutating
    /// anything.
    ///
    /// # Returns
    /// The Shares `deposit` would mint.
    ///
    /// # Errors
    /// Same validation and arithmetic errors as `deposit`, plus
    /// `TableNotCommitted`.
    pub fn preview_deposit(env: Env, amounts: Vec<i128>) -> Result<i128, StrategyError> {
        let table = storage::read_utilization(&env);
        if !allocation::is_committed(&table) {
            return Err(StrategyError::TableNotCommitted);
        }
        accounting::quote_deposit(&env, &table, &amounts)
    }

    /// Deposits a vector of asset amounts and mints Shares to `caller`.
    ///
    /// `amounts[i]` pairs with row `i` of the committed table. The handler
    /// pulls each non-zero amount from `from`.
    ///
    /// # Arguments
    /// * `caller` - Permitted aggregator credited with the Shares
    /// * `from` - Account funding the deposit
    /// * `amounts` - Raw token amounts in table order
    ///
    /// # Returns
    /// Shares minted, equal to the deposit's total value.
    ///
    /// # Errors
    /// - `NotPermitted` if `caller` is not the factory or a registered aggregator
    /// - `HandlerNotSet`, `DepositClosed`
    /// - `LengthMismatch`, `NegativeAmount`, `NonDepositableAmount`
    /// - `PriceNotComputed` if a feed reports a zero unit value
    /// - `ZeroValue` if the vector is worth nothing
    /// - `RatioMismatch` if the value split differs from the table
    ///
    /// # Events
    /// Emits `DepositEvent` under `deposit`.
    pub fn deposit(
        env: Env,
        caller: Address,
        from: Address,
        amounts: Vec<i128>,
    ) -> Result<i128, StrategyError> {
        access::require_permitted(&env, &caller)?;
        let handler = storage::read_handler(&env).ok_or(StrategyError::HandlerNotSet)?;
        if !storage::is_deposit_open(&env) {
            return Err(StrategyError::DepositClosed);
        }

        let table = storage::read_utilization(&env);
        let shares = accounting::quote_deposit(&env, &table, &amounts)?;

        accounting::mint(&env, &caller, shares)?;
        storage::extend_instance(&env);

        let handler = AssetHandlerClient::new(&env, &handler);
        for (entry, amount) in table.iter().zip(amounts.iter()) {
            if amount > 0 {
                handler.receive(&from, &entry.asset, &amount);
            }
        }

        events::deposited(&env, caller, from, amounts, shares);
        Ok(shares)
    }

    // ==========================================================================
    // CORE LIFECYCLE - WITHDRAW
    // ==========================================================================

    /// Burns `share_amount` of `caller`'s Shares and pays out the
    /// proportional slice of every withdrawable asset to `receiver`.
    ///
    /// Payouts follow the handler's live balances, not the allocation or the
    /// current price. Non-withdrawable assets stay in the handler.
    ///
    /// Shares are burned before any transfer is issued.
    ///
    /// # Returns
    /// Payout per table row; zero for non-withdrawable rows.
    ///
    /// # Errors
    /// - `NotPermitted`, `HandlerNotSet`, `WithdrawClosed`
    /// - `ZeroAmount` if `share_amount` is not positive
    /// - `InsufficientShares` if `caller` holds fewer Shares
    ///
    /// # Events
    /// Emits `WithdrawEvent` under `withdraw`.
    pub fn withdraw(
        env: Env,
        caller: Address,
        receiver: Address,
        share_amount: i128,
    ) -> Result<Vec<i128>, StrategyError> {
        access::require_permitted(&env, &caller)?;
        let handler = storage::read_handler(&env).ok_or(StrategyError::HandlerNotSet)?;
        if !storage::is_withdraw_open(&env) {
            return Err(StrategyError::WithdrawClosed);
        }
        if share_amount <= 0 {
            return Err(StrategyError::ZeroAmount);
        }
        if storage::read_balance(&env, &caller) < share_amount {
            return Err(StrategyError::InsufficientShares);
        }

        let table = storage::read_utilization(&env);
        let total_before = storage::read_total_shares(&env);
        let payouts = accounting::payouts(&env, &handler, &table, share_amount, total_before)?;

        accounting::burn(&env, &caller, share_amount)?;
        storage::extend_instance(&env);

        let handler = AssetHandlerClient::new(&env, &handler);
        for (entry, payout) in table.iter().zip(payouts.iter()) {
            if payout > 0 {
                handler.send(&receiver, &entry.asset, &payout);
            }
        }

        events::withdrawn(&env, caller, receiver, share_amount, payouts.clone());
        Ok(payouts)
    }

    // ==========================================================================
    // READ FUNCTIONS
    // ==========================================================================

    /// Returns the committed utilization table, in commit order.
    pub fn utilization(env: Env) -> Vec<UtilizationEntry> {
        storage::read_utilization(&env)
    }

    /// Returns the table version; bumped on every `update_utilization`.
    pub fn version(env: Env) -> u32 {
        storage::read_version(&env)
    }

    pub fn handler(env: Env) -> Option<Address> {
        storage::read_handler(&env)
    }

    pub fn manager(env: Env) -> Result<Address, StrategyError> {
        storage::read_manager(&env)
    }

    pub fn factory(env: Env) -> Result<Address, StrategyError> {
        storage::read_factory(&env)
    }

    pub fn value_feed(env: Env, asset: Address) -> Option<Address> {
        storage::read_feed(&env, &asset)
    }

    pub fn is_deposit_open(env: Env) -> bool {
        storage::is_deposit_open(&env)
    }

    pub fn is_withdraw_open(env: Env) -> bool {
        storage::is_withdraw_open(&env)
    }

    pub fn is_permitted(env: Env, caller: Address) -> Result<bool, StrategyError> {
        access::is_permitted(&env, &caller)
    }

    pub fn total_shares(env: Env) -> i128 {
        storage::read_total_shares(&env)
    }

    pub fn balance(env: Env, holder: Address) -> i128 {
        storage::read_balance(&env, &holder)
    }

    // ==========================================================================
    // INTERNAL VALIDATION HELPERS
    // ==========================================================================

    /// A flag may only open once custody and a committed table exist.
    fn require_ready(env: &Env) -> Result<(), StrategyError> {
        if storage::read_handler(env).is_none() {
            return Err(StrategyError::HandlerNotSet);
        }
        if !allocation::is_committed(&storage::read_utilization(env)) {
            return Err(StrategyError::TableNotCommitted);
        }
        Ok(())
    }
}

mod test;
