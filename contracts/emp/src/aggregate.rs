//! Aggregate utilization table of an EMP.
//!
//! The EMP's effective asset set is the weighted union of its Strategies'
//! tables. Each depositable row contributes
//! `strategy_row.allocation * emp_allocation` to its asset; rows for an asset
//! shared between Strategies add up. The merged rows are kept in an ordered
//! map keyed by asset, which both deduplicates and fixes the output order.

use multivault_common::{
    interfaces::StrategyClient, math, StrategyAllocation, UtilizationEntry, ONE,
};
use soroban_sdk::{log, Address, Env, Map, Vec};

use crate::error::EmpError;

/// Builds the aggregate table and the version stamps it reflects by reading
/// every Strategy's committed table.
pub(crate) fn build(
    env: &Env,
    strategies: &Vec<StrategyAllocation>,
) -> Result<(Vec<UtilizationEntry>, Map<Address, u32>), EmpError> {
    let mut merged: Map<Address, UtilizationEntry> = Map::new(env);
    let mut stamps: Map<Address, u32> = Map::new(env);

    for held in strategies.iter() {
        let strategy = StrategyClient::new(env, &held.strategy);
        merge_into(&mut merged, &strategy.utilization(), held.allocation)?;
        stamps.set(held.strategy.clone(), strategy.version());
    }

    Ok((merged.values(), stamps))
}

/// Folds one Strategy table, weighted by `allocation`, into `merged`.
///
/// Flags merge by OR. Withdraw-only rows contribute their flags but no
/// allocation.
pub(crate) fn merge_into(
    merged: &mut Map<Address, UtilizationEntry>,
    table: &Vec<UtilizationEntry>,
    allocation: i128,
) -> Result<(), EmpError> {
    for entry in table.iter() {
        let contribution = if entry.deposit {
            math::mul_fixed(entry.allocation, allocation).ok_or(EmpError::MathOverflow)?
        } else {
            0
        };

        let row = match merged.get(entry.asset.clone()) {
            Some(mut row) => {
                row.deposit |= entry.deposit;
                row.withdraw |= entry.withdraw;
                row.allocation = row
                    .allocation
                    .checked_add(contribution)
                    .ok_or(EmpError::MathOverflow)?;
                row
            }
            None => UtilizationEntry {
                asset: entry.asset.clone(),
                deposit: entry.deposit,
                withdraw: entry.withdraw,
                allocation: contribution,
            },
        };
        merged.set(entry.asset, row);
    }
    Ok(())
}

/// True when any Strategy's table version moved past the cached stamp, or
/// the Strategy set no longer matches the stamps.
pub(crate) fn is_stale(
    env: &Env,
    strategies: &Vec<StrategyAllocation>,
    stamps: &Map<Address, u32>,
) -> bool {
    if strategies.len() != stamps.len() {
        return true;
    }
    strategies.iter().any(|held| {
        let version = StrategyClient::new(env, &held.strategy).version();
        stamps.get(held.strategy) != Some(version)
    })
}

/// Validates a new Strategy list and pairs it with its allocations.
pub(crate) fn build_allocations(
    env: &Env,
    strategies: &Vec<Address>,
    allocations: &Vec<i128>,
) -> Result<Vec<StrategyAllocation>, EmpError> {
    if strategies.len() != allocations.len() {
        return Err(EmpError::LengthMismatch);
    }
    if strategies.is_empty() {
        return Err(EmpError::EmptyInput);
    }

    let this = env.current_contract_address();
    let mut seen: Map<Address, bool> = Map::new(env);
    let mut held = Vec::new(env);
    let mut sum: i128 = 0;

    for (strategy, allocation) in strategies.iter().zip(allocations.iter()) {
        if strategy == this {
            return Err(EmpError::InvalidStrategy);
        }
        if seen.contains_key(strategy.clone()) {
            return Err(EmpError::DuplicateStrategy);
        }
        seen.set(strategy.clone(), true);

        if !(0..=ONE).contains(&allocation) {
            return Err(EmpError::InvalidAllocation);
        }
        sum = sum.checked_add(allocation).ok_or(EmpError::MathOverflow)?;
        held.push_back(StrategyAllocation { strategy, allocation });
    }

    if sum > ONE {
        return Err(EmpError::AllocationSum);
    }
    Ok(held)
}

/// Splits the EMP-level `amounts` (keyed by asset) into one Strategy's leg,
/// in that Strategy's table order.
///
/// Each asset is divided between Strategies in proportion to their
/// contribution to the merged allocation.
pub(crate) fn split_leg(
    env: &Env,
    table: &Vec<UtilizationEntry>,
    allocation: i128,
    merged: &Map<Address, i128>,
    amounts: &Map<Address, i128>,
) -> Result<Vec<i128>, EmpError> {
    let mut leg = Vec::new(env);
    for entry in table.iter() {
        if !entry.deposit {
            leg.push_back(0);
            continue;
        }
        let merged_allocation = merged.get(entry.asset.clone()).unwrap_or(0);
        let amount = amounts.get(entry.asset).unwrap_or(0);
        if merged_allocation == 0 || amount == 0 {
            leg.push_back(0);
            continue;
        }
        let contribution =
            math::mul_fixed(entry.allocation, allocation).ok_or(EmpError::MathOverflow)?;
        let part = math::mul_div(amount, contribution, merged_allocation)
            .ok_or(EmpError::MathOverflow)?;
        leg.push_back(part);
    }
    Ok(leg)
}

/// Adds one Strategy leg to the per-asset running total of placed amounts.
pub(crate) fn tally_leg(
    placed: &mut Map<Address, i128>,
    table: &Vec<UtilizationEntry>,
    leg: &Vec<i128>,
) -> Result<(), EmpError> {
    for (entry, amount) in table.iter().zip(leg.iter()) {
        let sum = placed
            .get(entry.asset.clone())
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or(EmpError::MathOverflow)?;
        placed.set(entry.asset, sum);
    }
    Ok(())
}

/// Every submitted amount must be split across the legs without remainder.
/// An amount off the aggregate ratio truncates when split and is rejected
/// here rather than silently left with the user.
pub(crate) fn require_fully_placed(
    env: &Env,
    placed: &Map<Address, i128>,
    amounts: &Map<Address, i128>,
) -> Result<(), EmpError> {
    for (asset, amount) in amounts.iter() {
        let split = placed.get(asset.clone()).unwrap_or(0);
        if split != amount {
            log!(
                env,
                "deposit split remainder: asset {}, amount {}, placed {}",
                asset,
                amount,
                split
            );
            return Err(EmpError::RatioMismatch);
        }
    }
    Ok(())
}
