//! Value-based share issuance and redemption.
//!
//! Shares are minted 1:1 with the 18-decimal value of a deposit at deposit
//! time and redeemed against the handler's live balances, so a later price
//! move never reprices existing Shares.

use multivault_common::{
    interfaces::{AssetHandlerClient, ValueFeedClient},
    math, UtilizationEntry,
};
use soroban_sdk::{log, Address, Env, Vec};

use crate::{error::StrategyError, storage};

/// Values a deposit vector against `table` and checks it matches the table's
/// allocation exactly. Returns the total value, which is also the number of
/// Shares the deposit mints.
///
/// Non-depositable rows and depositable rows with no allocation must carry a
/// zero amount. A vector worth nothing is rejected with `ZeroValue`.
pub(crate) fn quote_deposit(
    env: &Env,
    table: &Vec<UtilizationEntry>,
    amounts: &Vec<i128>,
) -> Result<i128, StrategyError> {
    if amounts.len() != table.len() {
        return Err(StrategyError::LengthMismatch);
    }

    let mut values: Vec<i128> = Vec::new(env);
    let mut total: i128 = 0;
    for (entry, amount) in table.iter().zip(amounts.iter()) {
        if amount < 0 {
            return Err(StrategyError::NegativeAmount);
        }
        if !entry.deposit {
            if amount != 0 {
                return Err(StrategyError::NonDepositableAmount);
            }
            values.push_back(0);
            continue;
        }
        if amount != 0 && entry.allocation == 0 {
            log!(env, "amount for unallocated asset {}", entry.asset.clone());
            return Err(StrategyError::RatioMismatch);
        }
        let value = value_of(env, &entry.asset, amount)?;
        total = total
            .checked_add(value)
            .ok_or(StrategyError::MathOverflow)?;
        values.push_back(value);
    }

    if total == 0 {
        return Err(StrategyError::ZeroValue);
    }

    for (entry, value) in table.iter().zip(values.iter()) {
        if !entry.deposit {
            continue;
        }
        let share = math::ratio(value, total).ok_or(StrategyError::MathOverflow)?;
        if share != entry.allocation {
            log!(
                env,
                "deposit ratio mismatch: asset {}, share {}, allocation {}",
                entry.asset,
                share,
                entry.allocation
            );
            return Err(StrategyError::RatioMismatch);
        }
    }

    Ok(total)
}

/// Prices `amount` of `asset` through its registered feed.
pub(crate) fn value_of(env: &Env, asset: &Address, amount: i128) -> Result<i128, StrategyError> {
    let feed = storage::read_feed(env, asset).ok_or(StrategyError::FeedNotSet)?;
    let feed = ValueFeedClient::new(env, &feed);

    let unit_value = feed.unit_value(asset);
    if unit_value <= 0 {
        log!(env, "value not computed for asset {}", asset.clone());
        return Err(StrategyError::PriceNotComputed);
    }
    let decimals = feed.decimals(asset);

    math::asset_value(amount, unit_value, decimals).ok_or(StrategyError::MathOverflow)
}

/// Per-row payouts for redeeming `share_amount` out of `total_shares`.
///
/// Each withdrawable row pays its proportional slice of the handler's live
/// balance. Non-withdrawable rows pay zero and stay in the handler.
pub(crate) fn payouts(
    env: &Env,
    handler: &Address,
    table: &Vec<UtilizationEntry>,
    share_amount: i128,
    total_shares: i128,
) -> Result<Vec<i128>, StrategyError> {
    let handler = AssetHandlerClient::new(env, handler);
    let mut payouts = Vec::new(env);
    for entry in table.iter() {
        if !entry.withdraw {
            payouts.push_back(0);
            continue;
        }
        let live = handler.balance_of(&entry.asset);
        let payout = math::mul_div(live, share_amount, total_shares)
            .ok_or(StrategyError::MathOverflow)?;
        payouts.push_back(payout);
    }
    Ok(payouts)
}

pub(crate) fn mint(env: &Env, to: &Address, shares: i128) -> Result<(), StrategyError> {
    let balance = storage::read_balance(env, to)
        .checked_add(shares)
        .ok_or(StrategyError::MathOverflow)?;
    let total = storage::read_total_shares(env)
        .checked_add(shares)
        .ok_or(StrategyError::MathOverflow)?;
    storage::write_balance(env, to, balance);
    storage::write_total_shares(env, total);
    Ok(())
}

/// Callers check the balance first; this only fails on corrupted totals.
pub(crate) fn burn(env: &Env, from: &Address, shares: i128) -> Result<(), StrategyError> {
    let balance = storage::read_balance(env, from)
        .checked_sub(shares)
        .ok_or(StrategyError::MathOverflow)?;
    let total = storage::read_total_shares(env)
        .checked_sub(shares)
        .ok_or(StrategyError::MathOverflow)?;
    if balance < 0 || total < 0 {
        return Err(StrategyError::InsufficientShares);
    }
    storage::write_balance(env, from, balance);
    storage::write_total_shares(env, total);
    Ok(())
}
