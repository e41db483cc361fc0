//! Role checks. The claimed caller is authenticated before it is compared
//! against the stored role.

use multivault_common::{interfaces::StrategyClient, StrategyAllocation};
use soroban_sdk::{Address, Env, Vec};

use crate::{error::EmpError, storage};

pub(crate) fn require_manager(env: &Env, caller: &Address) -> Result<(), EmpError> {
    caller.require_auth();
    if *caller != storage::read_manager(env)? {
        return Err(EmpError::NotManager);
    }
    Ok(())
}

/// The Strategy list only changes while both transfer flags are closed.
pub(crate) fn require_closed(env: &Env) -> Result<(), EmpError> {
    if storage::is_deposit_open(env) || storage::is_withdraw_open(env) {
        return Err(EmpError::TransfersOpen);
    }
    Ok(())
}

/// A Strategy in which the EMP still holds Shares cannot be dropped from the
/// list; withdrawals only reach the Strategies currently held.
pub(crate) fn require_no_stranded_positions(
    env: &Env,
    current: &Vec<StrategyAllocation>,
    next: &Vec<StrategyAllocation>,
) -> Result<(), EmpError> {
    let this = env.current_contract_address();
    for held in current.iter() {
        if next.iter().any(|kept| kept.strategy == held.strategy) {
            continue;
        }
        if StrategyClient::new(env, &held.strategy).balance(&this) > 0 {
            return Err(EmpError::PositionsOpen);
        }
    }
    Ok(())
}
