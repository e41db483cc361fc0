#![cfg(test)]

use super::*;
use crate::events::DepositEvent;
use multivault_common::{
    testutils::{MockAssetHandler, MockAssetHandlerClient, MockValueFeed, MockValueFeedClient},
    ONE,
};
use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    vec, Address, Env, IntoVal, TryFromVal,
};

struct Fixture<'a> {
    env: Env,
    strategy: StrategyContractClient<'a>,
    feed: MockValueFeedClient<'a>,
    handler: MockAssetHandlerClient<'a>,
    manager: Address,
    factory: Address,
    emp: Address,
    user: Address,
}

fn setup<'a>() -> Fixture<'a> {
    let env = Env::default();
    env.mock_all_auths();

    let strategy_id = env.register_contract(None, StrategyContract);
    let feed_id = env.register_contract(None, MockValueFeed);
    let handler_id = env.register_contract(None, MockAssetHandler);

    let strategy = StrategyContractClient::new(&env, &strategy_id);
    let feed = MockValueFeedClient::new(&env, &feed_id);
    let handler = MockAssetHandlerClient::new(&env, &handler_id);

    let manager = Address::generate(&env);
    let factory = Address::generate(&env);
    let emp = Address::generate(&env);
    let user = Address::generate(&env);

    strategy.initialize(&manager, &factory);
    strategy.caller_permission_update(&factory, &emp, &true);

    Fixture { env, strategy, feed, handler, manager, factory, emp, user }
}

impl<'a> Fixture<'a> {
    /// New asset priced by the mock feed and registered with the Strategy.
    fn asset(&self, unit_value: i128, decimals: u32) -> Address {
        let asset = Address::generate(&self.env);
        self.feed.set_price(&asset, &unit_value, &decimals);
        self.strategy
            .value_feed_update(&self.manager, &asset, &self.feed.address);
        asset
    }

    fn params(&self, deposit: bool, withdraw: bool, allocation: i128) -> UtilizationParams {
        UtilizationParams { deposit, withdraw, allocation }
    }

    /// Commits `rows`, installs the handler and opens both flags.
    fn open_with(&self, rows: &[(Address, UtilizationParams)]) {
        let mut assets = Vec::new(&self.env);
        let mut params = Vec::new(&self.env);
        for (asset, row) in rows {
            assets.push_back(asset.clone());
            params.push_back(row.clone());
        }
        self.strategy
            .update_utilization(&self.manager, &assets, &params);
        self.strategy
            .handler_update(&self.manager, &self.handler.address);
        self.strategy.deposit_open_update(&self.manager, &true);
        self.strategy.withdraw_open_update(&self.manager, &true);
    }

    fn close(&self) {
        self.strategy.deposit_open_update(&self.manager, &false);
        self.strategy.withdraw_open_update(&self.manager, &false);
    }
}

// ==========================================================================
// INITIALIZATION AND ACCESS
// ==========================================================================

#[test]
fn test_initialize_sets_roles() {
    let fx = setup();

    assert_eq!(fx.strategy.manager(), fx.manager);
    assert_eq!(fx.strategy.factory(), fx.factory);
    assert_eq!(fx.strategy.handler(), None);
    assert!(!fx.strategy.is_deposit_open());
    assert!(!fx.strategy.is_withdraw_open());
    assert_eq!(fx.strategy.version(), 0);
    assert_eq!(fx.strategy.total_shares(), 0);
}

#[test]
fn test_initialize_twice_rejected() {
    let fx = setup();
    let other = Address::generate(&fx.env);

    assert_eq!(
        fx.strategy.try_initialize(&other, &other),
        Err(Ok(StrategyError::AlreadyInitialized))
    );
    assert_eq!(fx.strategy.factory(), fx.factory);
}

#[test]
fn test_permitted_callers() {
    let fx = setup();
    let stranger = Address::generate(&fx.env);

    assert!(fx.strategy.is_permitted(&fx.factory));
    assert!(fx.strategy.is_permitted(&fx.emp));
    assert!(!fx.strategy.is_permitted(&stranger));

    fx.strategy
        .caller_permission_update(&fx.factory, &fx.emp, &false);
    assert!(!fx.strategy.is_permitted(&fx.emp));
}

#[test]
fn test_only_factory_grants_permission() {
    let fx = setup();
    let stranger = Address::generate(&fx.env);

    assert_eq!(
        fx.strategy
            .try_caller_permission_update(&fx.manager, &stranger, &true),
        Err(Ok(StrategyError::NotFactory))
    );
}

#[test]
fn test_manager_update() {
    let fx = setup();
    let next = Address::generate(&fx.env);

    fx.strategy.manager_update(&fx.manager, &next);
    assert_eq!(fx.strategy.manager(), next);

    let asset = Address::generate(&fx.env);
    assert_eq!(
        fx.strategy
            .try_value_feed_update(&fx.manager, &asset, &fx.feed.address),
        Err(Ok(StrategyError::NotManager))
    );
}

// ==========================================================================
// UTILIZATION TABLE
// ==========================================================================

#[test]
fn test_update_utilization_bumps_version() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    let b = fx.asset(ONE, 7);

    let version = fx.strategy.update_utilization(
        &fx.manager,
        &vec![&fx.env, a.clone()],
        &vec![&fx.env, fx.params(true, true, ONE)],
    );
    assert_eq!(version, 1);

    let version = fx.strategy.update_utilization(
        &fx.manager,
        &vec![&fx.env, b.clone()],
        &vec![&fx.env, fx.params(true, true, ONE)],
    );
    assert_eq!(version, 2);
    assert_eq!(fx.strategy.version(), 2);

    let table = fx.strategy.utilization();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0).unwrap().asset, b);
}

#[test]
fn test_update_utilization_keeps_commit_order() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    let b = fx.asset(ONE, 7);
    let c = fx.asset(ONE, 7);

    fx.strategy.update_utilization(
        &fx.manager,
        &vec![&fx.env, c.clone(), a.clone(), b.clone()],
        &vec![
            &fx.env,
            fx.params(true, true, ONE / 2),
            fx.params(true, true, ONE / 4),
            fx.params(true, true, ONE / 4),
        ],
    );

    let table = fx.strategy.utilization();
    assert_eq!(table.get(0).unwrap().asset, c);
    assert_eq!(table.get(1).unwrap().asset, a);
    assert_eq!(table.get(2).unwrap().asset, b);
}

#[test]
fn test_update_utilization_requires_manager() {
    let fx = setup();
    let a = fx.asset(ONE, 7);

    assert_eq!(
        fx.strategy.try_update_utilization(
            &fx.factory,
            &vec![&fx.env, a],
            &vec![&fx.env, fx.params(true, true, ONE)],
        ),
        Err(Ok(StrategyError::NotManager))
    );
}

#[test]
fn test_update_utilization_length_mismatch() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    let b = fx.asset(ONE, 7);

    assert_eq!(
        fx.strategy.try_update_utilization(
            &fx.manager,
            &vec![&fx.env, a, b],
            &vec![&fx.env, fx.params(true, true, ONE)],
        ),
        Err(Ok(StrategyError::LengthMismatch))
    );
}

#[test]
fn test_update_utilization_empty() {
    let fx = setup();

    assert_eq!(
        fx.strategy
            .try_update_utilization(&fx.manager, &Vec::new(&fx.env), &Vec::new(&fx.env)),
        Err(Ok(StrategyError::EmptyInput))
    );
}

#[test]
fn test_update_utilization_duplicate_asset() {
    let fx = setup();
    let a = fx.asset(ONE, 7);

    assert_eq!(
        fx.strategy.try_update_utilization(
            &fx.manager,
            &vec![&fx.env, a.clone(), a],
            &vec![
                &fx.env,
                fx.params(true, true, ONE / 2),
                fx.params(true, true, ONE / 2),
            ],
        ),
        Err(Ok(StrategyError::DuplicateAsset))
    );
}

#[test]
fn test_update_utilization_rejects_own_address() {
    let fx = setup();

    assert_eq!(
        fx.strategy.try_update_utilization(
            &fx.manager,
            &vec![&fx.env, fx.strategy.address.clone()],
            &vec![&fx.env, fx.params(true, true, ONE)],
        ),
        Err(Ok(StrategyError::InvalidAsset))
    );
}

#[test]
fn test_update_utilization_requires_feed() {
    let fx = setup();
    let unpriced = Address::generate(&fx.env);

    assert_eq!(
        fx.strategy.try_update_utilization(
            &fx.manager,
            &vec![&fx.env, unpriced],
            &vec![&fx.env, fx.params(true, true, ONE)],
        ),
        Err(Ok(StrategyError::FeedNotSet))
    );
}

#[test]
fn test_update_utilization_allocation_out_of_range() {
    let fx = setup();
    let a = fx.asset(ONE, 7);

    assert_eq!(
        fx.strategy.try_update_utilization(
            &fx.manager,
            &vec![&fx.env, a],
            &vec![&fx.env, fx.params(true, true, ONE + 1)],
        ),
        Err(Ok(StrategyError::InvalidAllocation))
    );
}

#[test]
fn test_update_utilization_bad_sum() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    let b = fx.asset(ONE, 7);

    assert_eq!(
        fx.strategy.try_update_utilization(
            &fx.manager,
            &vec![&fx.env, a, b],
            &vec![
                &fx.env,
                fx.params(true, true, 6 * ONE / 10),
                fx.params(true, true, 3 * ONE / 10),
            ],
        ),
        Err(Ok(StrategyError::AllocationSum))
    );
    assert_eq!(fx.strategy.version(), 0);
    assert_eq!(fx.strategy.utilization().len(), 0);
}

#[test]
fn test_withdraw_only_row_excluded_from_sum() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    let reward = fx.asset(ONE, 7);

    fx.strategy.update_utilization(
        &fx.manager,
        &vec![&fx.env, a, reward],
        &vec![
            &fx.env,
            fx.params(true, true, ONE),
            fx.params(false, true, ONE),
        ],
    );
    assert_eq!(fx.strategy.version(), 1);
}

#[test]
fn test_table_frozen_while_open() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    fx.open_with(&[(a.clone(), fx.params(true, true, ONE))]);

    assert_eq!(
        fx.strategy.try_update_utilization(
            &fx.manager,
            &vec![&fx.env, a.clone()],
            &vec![&fx.env, fx.params(true, true, ONE)],
        ),
        Err(Ok(StrategyError::TransfersOpen))
    );
    assert_eq!(
        fx.strategy
            .try_handler_update(&fx.manager, &fx.handler.address),
        Err(Ok(StrategyError::TransfersOpen))
    );

    // one open flag is enough to freeze the table
    fx.strategy.deposit_open_update(&fx.manager, &false);
    assert_eq!(
        fx.strategy
            .try_handler_update(&fx.manager, &fx.handler.address),
        Err(Ok(StrategyError::TransfersOpen))
    );

    fx.close();
    fx.strategy.update_utilization(
        &fx.manager,
        &vec![&fx.env, a],
        &vec![&fx.env, fx.params(true, true, ONE)],
    );
    assert_eq!(fx.strategy.version(), 2);
}

// ==========================================================================
// TRANSFER FLAGS
// ==========================================================================

#[test]
fn test_open_requires_handler() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    fx.strategy.update_utilization(
        &fx.manager,
        &vec![&fx.env, a],
        &vec![&fx.env, fx.params(true, true, ONE)],
    );

    assert_eq!(
        fx.strategy.try_deposit_open_update(&fx.manager, &true),
        Err(Ok(StrategyError::HandlerNotSet))
    );
    assert_eq!(
        fx.strategy.try_withdraw_open_update(&fx.manager, &true),
        Err(Ok(StrategyError::HandlerNotSet))
    );
}

#[test]
fn test_open_requires_committed_table() {
    let fx = setup();
    fx.strategy
        .handler_update(&fx.manager, &fx.handler.address);

    assert_eq!(
        fx.strategy.try_deposit_open_update(&fx.manager, &true),
        Err(Ok(StrategyError::TableNotCommitted))
    );
    // closing never needs a table
    fx.strategy.deposit_open_update(&fx.manager, &false);
}

#[test]
fn test_handler_set_once_then_replaceable_while_closed() {
    let fx = setup();
    let other = Address::generate(&fx.env);

    fx.strategy.handler_update(&fx.manager, &other);
    assert_eq!(fx.strategy.handler(), Some(other));

    fx.strategy
        .handler_update(&fx.manager, &fx.handler.address);
    assert_eq!(fx.strategy.handler(), Some(fx.handler.address.clone()));
}

// ==========================================================================
// DEPOSIT
// ==========================================================================

#[test]
fn test_single_asset_deposit_mints_value() {
    let fx = setup();
    // 6-decimal asset at 2.0
    let a = fx.asset(2 * ONE, 6);
    fx.open_with(&[(a.clone(), fx.params(true, true, ONE))]);

    let shares = fx
        .strategy
        .deposit(&fx.emp, &fx.user, &vec![&fx.env, 5_000_000]);

    assert_eq!(shares, 10 * ONE);
    assert_eq!(fx.strategy.balance(&fx.emp), 10 * ONE);
    assert_eq!(fx.strategy.total_shares(), 10 * ONE);
    assert_eq!(fx.handler.balance_of(&a), 5_000_000);
    assert_eq!(fx.handler.received(&fx.user, &a), 5_000_000);
}

#[test]
fn test_multi_asset_deposit_with_mixed_decimals() {
    let fx = setup();
    let usd = fx.asset(ONE, 6);
    let gold = fx.asset(2 * ONE, 18);
    fx.open_with(&[
        (usd.clone(), fx.params(true, true, ONE / 2)),
        (gold.clone(), fx.params(true, true, ONE / 2)),
    ]);

    // 100 units at 1.0 and 50 units at 2.0
    let amounts = vec![&fx.env, 100_000_000, 50 * ONE];
    assert_eq!(fx.strategy.preview_deposit(&amounts), 200 * ONE);

    let shares = fx.strategy.deposit(&fx.emp, &fx.user, &amounts);
    assert_eq!(shares, 200 * ONE);
    assert_eq!(fx.handler.balance_of(&usd), 100_000_000);
    assert_eq!(fx.handler.balance_of(&gold), 50 * ONE);
}

#[test]
fn test_equal_value_different_precision_mints_equal_shares() {
    let fx = setup();
    let six = fx.asset(ONE, 6);
    let eighteen = fx.asset(ONE, 18);
    fx.open_with(&[
        (six.clone(), fx.params(true, true, ONE / 2)),
        (eighteen.clone(), fx.params(true, true, ONE / 2)),
    ]);

    let shares = fx
        .strategy
        .deposit(&fx.emp, &fx.user, &vec![&fx.env, 1_000_000, ONE]);
    assert_eq!(shares, 2 * ONE);
}

#[test]
fn test_deposit_ratio_mismatch() {
    let fx = setup();
    let usd = fx.asset(ONE, 6);
    let gold = fx.asset(2 * ONE, 18);
    fx.open_with(&[
        (usd.clone(), fx.params(true, true, ONE / 2)),
        (gold.clone(), fx.params(true, true, ONE / 2)),
    ]);

    assert_eq!(
        fx.strategy
            .try_deposit(&fx.emp, &fx.user, &vec![&fx.env, 100_000_000, 49 * ONE]),
        Err(Ok(StrategyError::RatioMismatch))
    );
    assert_eq!(fx.strategy.total_shares(), 0);
    assert_eq!(fx.strategy.balance(&fx.emp), 0);
    assert_eq!(fx.handler.balance_of(&usd), 0);
    assert_eq!(fx.handler.balance_of(&gold), 0);
}

#[test]
fn test_deposit_non_depositable_amount_rejected() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    let reward = fx.asset(ONE, 7);
    fx.open_with(&[
        (a.clone(), fx.params(true, true, ONE)),
        (reward.clone(), fx.params(false, true, 0)),
    ]);

    assert_eq!(
        fx.strategy
            .try_deposit(&fx.emp, &fx.user, &vec![&fx.env, 10_000_000, 1]),
        Err(Ok(StrategyError::NonDepositableAmount))
    );

    let shares = fx
        .strategy
        .deposit(&fx.emp, &fx.user, &vec![&fx.env, 10_000_000, 0]);
    assert_eq!(shares, ONE);
}

#[test]
fn test_deposit_into_unallocated_row_rejected() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    let dust = fx.asset(ONE, 18);
    fx.open_with(&[
        (a.clone(), fx.params(true, true, ONE)),
        (dust.clone(), fx.params(true, true, 0)),
    ]);

    // one raw unit of an 18-decimal asset is worth too little to move the ratio
    assert_eq!(
        fx.strategy
            .try_deposit(&fx.emp, &fx.user, &vec![&fx.env, 10_000_000, 1]),
        Err(Ok(StrategyError::RatioMismatch))
    );
    assert_eq!(fx.handler.balance_of(&dust), 0);
    assert_eq!(fx.strategy.total_shares(), 0);

    let shares = fx
        .strategy
        .deposit(&fx.emp, &fx.user, &vec![&fx.env, 10_000_000, 0]);
    assert_eq!(shares, ONE);
}

#[test]
fn test_deposit_zero_price_not_computed() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    fx.open_with(&[(a.clone(), fx.params(true, true, ONE))]);
    fx.feed.set_price(&a, &0, &7);

    assert_eq!(
        fx.strategy
            .try_deposit(&fx.emp, &fx.user, &vec![&fx.env, 10_000_000]),
        Err(Ok(StrategyError::PriceNotComputed))
    );
}

#[test]
fn test_all_zero_deposit_rejected() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    let b = fx.asset(ONE, 7);
    fx.open_with(&[
        (a, fx.params(true, true, ONE / 2)),
        (b, fx.params(true, true, ONE / 2)),
    ]);

    assert_eq!(
        fx.strategy
            .try_deposit(&fx.emp, &fx.user, &vec![&fx.env, 0, 0]),
        Err(Ok(StrategyError::ZeroValue))
    );
    assert_eq!(fx.strategy.total_shares(), 0);
}

#[test]
fn test_deposit_negative_amount_rejected() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    fx.open_with(&[(a, fx.params(true, true, ONE))]);

    assert_eq!(
        fx.strategy
            .try_deposit(&fx.emp, &fx.user, &vec![&fx.env, -1]),
        Err(Ok(StrategyError::NegativeAmount))
    );
}

#[test]
fn test_deposit_length_mismatch() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    fx.open_with(&[(a, fx.params(true, true, ONE))]);

    assert_eq!(
        fx.strategy
            .try_deposit(&fx.emp, &fx.user, &vec![&fx.env, 1, 1]),
        Err(Ok(StrategyError::LengthMismatch))
    );
}

#[test]
fn test_deposit_requires_permitted_caller() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    fx.open_with(&[(a, fx.params(true, true, ONE))]);

    assert_eq!(
        fx.strategy
            .try_deposit(&fx.user, &fx.user, &vec![&fx.env, 10_000_000]),
        Err(Ok(StrategyError::NotPermitted))
    );
}

#[test]
fn test_deposit_requires_open_flag() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    fx.open_with(&[(a, fx.params(true, true, ONE))]);
    fx.strategy.deposit_open_update(&fx.manager, &false);

    assert_eq!(
        fx.strategy
            .try_deposit(&fx.emp, &fx.user, &vec![&fx.env, 10_000_000]),
        Err(Ok(StrategyError::DepositClosed))
    );
}

#[test]
fn test_deposit_requires_handler() {
    let fx = setup();

    assert_eq!(
        fx.strategy
            .try_deposit(&fx.emp, &fx.user, &vec![&fx.env, 10_000_000]),
        Err(Ok(StrategyError::HandlerNotSet))
    );
}

#[test]
fn test_preview_deposit_does_not_mint() {
    let fx = setup();
    let a = fx.asset(3 * ONE, 7);
    fx.open_with(&[(a.clone(), fx.params(true, true, ONE))]);

    assert_eq!(
        fx.strategy.preview_deposit(&vec![&fx.env, 10_000_000]),
        3 * ONE
    );
    assert_eq!(fx.strategy.total_shares(), 0);
    assert_eq!(fx.handler.balance_of(&a), 0);
}

#[test]
fn test_preview_deposit_requires_committed_table() {
    let fx = setup();

    assert_eq!(
        fx.strategy.try_preview_deposit(&vec![&fx.env, 1]),
        Err(Ok(StrategyError::TableNotCommitted))
    );
}

#[test]
fn test_deposit_event() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    fx.open_with(&[(a, fx.params(true, true, ONE))]);

    let amounts = vec![&fx.env, 10_000_000];
    fx.strategy.deposit(&fx.emp, &fx.user, &amounts);

    let events = fx.env.events().all();
    let (contract, topics, data) = events.last().unwrap();
    assert_eq!(contract, fx.strategy.address);
    assert_eq!(topics, (symbol_short!("deposit"),).into_val(&fx.env));

    let event = DepositEvent::try_from_val(&fx.env, &data).unwrap();
    assert_eq!(event.caller, fx.emp);
    assert_eq!(event.from, fx.user);
    assert_eq!(event.amounts, amounts);
    assert_eq!(event.shares, ONE);
}

// ==========================================================================
// WITHDRAW
// ==========================================================================

#[test]
fn test_round_trip_returns_deposit() {
    let fx = setup();
    let a = fx.asset(1_234_567_891_000_000_000, 9);
    fx.open_with(&[(a.clone(), fx.params(true, true, ONE))]);

    let amount = 777_000_000_123_i128;
    let shares = fx
        .strategy
        .deposit(&fx.emp, &fx.user, &vec![&fx.env, amount]);
    assert_eq!(shares, amount * 1_234_567_891_000_000_000 / 1_000_000_000);

    let payouts = fx.strategy.withdraw(&fx.emp, &fx.user, &shares);
    assert_eq!(payouts, vec![&fx.env, amount]);
    assert_eq!(fx.handler.paid(&fx.user, &a), amount);
    assert_eq!(fx.handler.balance_of(&a), 0);
    assert_eq!(fx.strategy.total_shares(), 0);
    assert_eq!(fx.strategy.balance(&fx.emp), 0);
}

#[test]
fn test_withdraw_independent_of_price_drift() {
    let fx = setup();
    let a = fx.asset(3 * ONE, 7);
    fx.open_with(&[(a.clone(), fx.params(true, true, ONE))]);

    let unit = 10_000_000_i128;
    let first = fx.strategy.deposit(&fx.emp, &fx.user, &vec![&fx.env, unit]);
    assert_eq!(first, 3 * ONE);

    fx.feed.set_price(&a, &(5 * ONE), &7);
    let second = fx.strategy.deposit(&fx.emp, &fx.user, &vec![&fx.env, unit]);
    assert_eq!(second, 5 * ONE);

    let payouts = fx
        .strategy
        .withdraw(&fx.emp, &fx.user, &(first + second));
    assert_eq!(payouts, vec![&fx.env, 2 * unit]);
}

#[test]
fn test_withdraw_pays_from_live_balance() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    fx.open_with(&[(a.clone(), fx.params(true, true, ONE))]);

    let shares = fx
        .strategy
        .deposit(&fx.emp, &fx.user, &vec![&fx.env, 100]);
    fx.strategy
        .deposit(&fx.factory, &fx.user, &vec![&fx.env, 100]);

    // yield lands in the handler outside of any deposit
    fx.handler.accrue(&a, &100);

    let payouts = fx.strategy.withdraw(&fx.emp, &fx.user, &shares);
    assert_eq!(payouts, vec![&fx.env, 150]);
    assert_eq!(fx.handler.balance_of(&a), 150);
}

#[test]
fn test_non_withdrawable_asset_is_never_paid() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    let sink = fx.asset(ONE, 7);
    fx.open_with(&[
        (a.clone(), fx.params(true, true, ONE)),
        (sink.clone(), fx.params(false, false, ONE)),
    ]);

    let baseline = fx.strategy.total_shares();
    let shares = fx
        .strategy
        .deposit(&fx.emp, &fx.user, &vec![&fx.env, 10_000_000, 0]);
    fx.handler.accrue(&sink, &1_000);

    let payouts = fx.strategy.withdraw(&fx.emp, &fx.user, &shares);
    assert_eq!(payouts, vec![&fx.env, 10_000_000, 0]);
    assert_eq!(fx.handler.paid(&fx.user, &sink), 0);
    assert_eq!(fx.handler.balance_of(&sink), 1_000);
    assert_eq!(fx.strategy.total_shares(), baseline);
}

#[test]
fn test_partial_withdraw() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    let b = fx.asset(ONE, 7);
    fx.open_with(&[
        (a.clone(), fx.params(true, true, ONE / 4)),
        (b.clone(), fx.params(true, true, 3 * ONE / 4)),
    ]);

    let shares = fx
        .strategy
        .deposit(&fx.emp, &fx.user, &vec![&fx.env, 1_000, 3_000]);
    let payouts = fx.strategy.withdraw(&fx.emp, &fx.user, &(shares / 2));

    assert_eq!(payouts, vec![&fx.env, 500, 1_500]);
    assert_eq!(fx.strategy.balance(&fx.emp), shares - shares / 2);
    assert_eq!(fx.handler.balance_of(&a), 500);
    assert_eq!(fx.handler.balance_of(&b), 1_500);
}

#[test]
fn test_withdraw_insufficient_shares() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    fx.open_with(&[(a, fx.params(true, true, ONE))]);
    let shares = fx
        .strategy
        .deposit(&fx.emp, &fx.user, &vec![&fx.env, 10_000_000]);

    assert_eq!(
        fx.strategy
            .try_withdraw(&fx.emp, &fx.user, &(shares + 1)),
        Err(Ok(StrategyError::InsufficientShares))
    );
    // the factory holds nothing even though it is permitted
    assert_eq!(
        fx.strategy.try_withdraw(&fx.factory, &fx.user, &1),
        Err(Ok(StrategyError::InsufficientShares))
    );
    assert_eq!(fx.strategy.total_shares(), shares);
}

#[test]
fn test_withdraw_zero_amount() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    fx.open_with(&[(a, fx.params(true, true, ONE))]);

    assert_eq!(
        fx.strategy.try_withdraw(&fx.emp, &fx.user, &0),
        Err(Ok(StrategyError::ZeroAmount))
    );
}

#[test]
fn test_withdraw_requires_open_flag() {
    let fx = setup();
    let a = fx.asset(ONE, 7);
    fx.open_with(&[(a, fx.params(true, true, ONE))]);
    let shares = fx
        .strategy
        .deposit(&fx.emp, &fx.user, &vec![&fx.env, 10_000_000]);
    fx.strategy.withdraw_open_update(&fx.manager, &false);

    assert_eq!(
        fx.strategy.try_withdraw(&fx.emp, &fx.user, &shares),
        Err(Ok(StrategyError::WithdrawClosed))
    );
}
