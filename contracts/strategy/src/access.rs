//! Role checks. Each helper authenticates the claimed caller before
//! comparing it against the stored role.

use soroban_sdk::{Address, Env};

use crate::{error::StrategyError, storage};

pub(crate) fn require_manager(env: &Env, caller: &Address) -> Result<(), StrategyError> {
    caller.require_auth();
    if *caller != storage::read_manager(env)? {
        return Err(StrategyError::NotManager);
    }
    Ok(())
}

pub(crate) fn require_factory(env: &Env, caller: &Address) -> Result<(), StrategyError> {
    caller.require_auth();
    if *caller != storage::read_factory(env)? {
        return Err(StrategyError::NotFactory);
    }
    Ok(())
}

/// Deposits and withdrawals are reserved for the factory and the aggregators
/// it registered; end users go through an EMP.
pub(crate) fn require_permitted(env: &Env, caller: &Address) -> Result<(), StrategyError> {
    caller.require_auth();
    if !is_permitted(env, caller)? {
        return Err(StrategyError::NotPermitted);
    }
    Ok(())
}

pub(crate) fn is_permitted(env: &Env, caller: &Address) -> Result<bool, StrategyError> {
    Ok(*caller == storage::read_factory(env)? || storage::is_permitted(env, caller))
}

/// Table and handler changes require both transfer flags to be closed.
pub(crate) fn require_closed(env: &Env) -> Result<(), StrategyError> {
    if storage::is_deposit_open(env) || storage::is_withdraw_open(env) {
        return Err(StrategyError::TransfersOpen);
    }
    Ok(())
}
