//! Utilization table validation.

use multivault_common::{UtilizationEntry, UtilizationParams, ONE};
use soroban_sdk::{Address, Env, Map, Vec};

use crate::{error::StrategyError, storage};

/// Builds a table from parallel `assets`/`params` inputs, rejecting anything
/// that could not be committed. Nothing is written.
pub(crate) fn build_table(
    env: &Env,
    assets: &Vec<Address>,
    params: &Vec<UtilizationParams>,
) -> Result<Vec<UtilizationEntry>, StrategyError> {
    if assets.len() != params.len() {
        return Err(StrategyError::LengthMismatch);
    }
    if assets.is_empty() {
        return Err(StrategyError::EmptyInput);
    }

    let this = env.current_contract_address();
    let mut seen: Map<Address, bool> = Map::new(env);
    let mut table = Vec::new(env);

    for (asset, row) in assets.iter().zip(params.iter()) {
        if asset == this {
            return Err(StrategyError::InvalidAsset);
        }
        if seen.contains_key(asset.clone()) {
            return Err(StrategyError::DuplicateAsset);
        }
        seen.set(asset.clone(), true);

        if row.allocation < 0 || row.allocation > ONE {
            return Err(StrategyError::InvalidAllocation);
        }
        if storage::read_feed(env, &asset).is_none() {
            return Err(StrategyError::FeedNotSet);
        }
        table.push_back(UtilizationEntry::new(asset, &row));
    }

    if depositable_sum(&table) != Some(ONE) {
        return Err(StrategyError::AllocationSum);
    }
    Ok(table)
}

/// Sum of allocation fractions over depositable rows. Withdraw-only rows are
/// excluded.
pub(crate) fn depositable_sum(table: &Vec<UtilizationEntry>) -> Option<i128> {
    table
        .iter()
        .filter(|entry| entry.deposit)
        .try_fold(0_i128, |sum, entry| sum.checked_add(entry.allocation))
}

/// A committed table is non-empty and its depositable rows sum to ONE.
pub(crate) fn is_committed(table: &Vec<UtilizationEntry>) -> bool {
    !table.is_empty() && depositable_sum(table) == Some(ONE)
}
