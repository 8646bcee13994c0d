extern crate std;

use rewarder::{RewarderContract, RewarderContractClient, MULTIPLIER_PRECISION};
use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short,
    testutils::Address as _,
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env, TryIntoVal,
};

use crate::{
    events,
    test::{add_pool, last_event, set_time, setup, Ctx},
    RewardHook, RewarderClient, UserInfo,
};

// ── Hook doubles ─────────────────────────────────────────────────────────────

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum RefusingError {
    Refused = 1,
}

/// Rejects every notification.
#[contract]
pub struct RefusingRewarder;

#[contractimpl]
impl RefusingRewarder {
    pub fn on_reward(
        _env: Env,
        _pid: u32,
        _user: Address,
        _recipient: Address,
        _reward_amount: i128,
        _new_amount: i128,
    ) -> Result<(), RefusingError> {
        Err(RefusingError::Refused)
    }
}

/// Deploys a rewarder bound to the ledger paying a fresh auxiliary token at
/// `multiplier`, funded with `funded` units.
fn deploy_rewarder(ctx: &Ctx, multiplier: i128, funded: i128) -> (Address, Address) {
    let aux_token = ctx
        .env
        .register_stellar_asset_contract_v2(Address::generate(&ctx.env))
        .address();
    let rewarder_id = ctx.env.register(RewarderContract, ());
    RewarderContractClient::new(&ctx.env, &rewarder_id).initialize(
        &ctx.client.address,
        &aux_token,
        &multiplier,
    );
    if funded > 0 {
        StellarAssetClient::new(&ctx.env, &aux_token).mint(&rewarder_id, &funded);
    }
    (rewarder_id, aux_token)
}

fn aux_balance(ctx: &Ctx, aux_token: &Address, account: &Address) -> i128 {
    TokenClient::new(&ctx.env, aux_token).balance(account)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn test_harvest_pays_auxiliary_reward() {
    let ctx = setup(10);
    let (rewarder_id, aux_token) = deploy_rewarder(&ctx, 2 * MULTIPLIER_PRECISION, 1_000_000);
    add_pool(&ctx, 10, &RewardHook::Rewarder(rewarder_id.clone()));
    let user = Address::generate(&ctx.env);
    let recipient = Address::generate(&ctx.env);

    ctx.client.deposit(&ctx.fountain, &0, &1_000, &user);
    assert_eq!(aux_balance(&ctx, &aux_token, &user), 0);

    set_time(&ctx, 1_100);
    let paid = ctx.client.harvest(&ctx.fountain, &0, &user, &recipient);

    assert_eq!(paid, 1_000);
    assert_eq!(aux_balance(&ctx, &aux_token, &recipient), 2_000);
    assert_eq!(ctx.client.pool_hook(&0), RewardHook::Rewarder(rewarder_id));
}

#[test]
fn test_rewarder_quotes_pending_tokens() {
    let ctx = setup(10);
    let (rewarder_id, aux_token) = deploy_rewarder(&ctx, MULTIPLIER_PRECISION / 4, 0);
    add_pool(&ctx, 10, &RewardHook::Rewarder(rewarder_id.clone()));
    let user = Address::generate(&ctx.env);

    ctx.client.deposit(&ctx.fountain, &0, &1_000, &user);
    set_time(&ctx, 1_100);

    let pending = ctx.client.pending_reward(&0, &user);
    let (token, amount) =
        RewarderClient::new(&ctx.env, &rewarder_id).pending_tokens(&0, &user, &pending);

    assert_eq!(token, aux_token);
    assert_eq!(amount, 250);
}

#[test]
fn test_set_without_overwrite_keeps_hook() {
    let ctx = setup(10);
    let (old_rewarder, old_token) = deploy_rewarder(&ctx, MULTIPLIER_PRECISION, 1_000_000);
    let (new_rewarder, new_token) = deploy_rewarder(&ctx, MULTIPLIER_PRECISION, 1_000_000);
    add_pool(&ctx, 10, &RewardHook::Rewarder(old_rewarder.clone()));

    ctx.client.set(
        &ctx.owner,
        &0,
        &20,
        &RewardHook::Rewarder(new_rewarder),
        &false,
    );

    let payload: events::PoolSetEvent = last_event(&ctx.env, symbol_short!("POOL_SET"))
        .unwrap()
        .try_into_val(&ctx.env)
        .unwrap();
    assert_eq!(payload.hook, RewardHook::Rewarder(old_rewarder.clone()));
    assert!(!payload.overwrite);
    assert_eq!(payload.alloc_point, 20);

    assert_eq!(ctx.client.pool_hook(&0), RewardHook::Rewarder(old_rewarder));

    let user = Address::generate(&ctx.env);
    ctx.client.deposit(&ctx.fountain, &0, &1_000, &user);
    set_time(&ctx, 1_100);
    ctx.client.harvest(&ctx.fountain, &0, &user, &user);

    assert_eq!(aux_balance(&ctx, &old_token, &user), 1_000);
    assert_eq!(aux_balance(&ctx, &new_token, &user), 0);
}

#[test]
fn test_set_with_overwrite_replaces_hook() {
    let ctx = setup(10);
    let (old_rewarder, old_token) = deploy_rewarder(&ctx, MULTIPLIER_PRECISION, 1_000_000);
    let (new_rewarder, new_token) = deploy_rewarder(&ctx, MULTIPLIER_PRECISION, 1_000_000);
    add_pool(&ctx, 10, &RewardHook::Rewarder(old_rewarder));

    ctx.client.set(
        &ctx.owner,
        &0,
        &10,
        &RewardHook::Rewarder(new_rewarder.clone()),
        &true,
    );

    let payload: events::PoolSetEvent = last_event(&ctx.env, symbol_short!("POOL_SET"))
        .unwrap()
        .try_into_val(&ctx.env)
        .unwrap();
    assert_eq!(payload.hook, RewardHook::Rewarder(new_rewarder.clone()));
    assert!(payload.overwrite);

    let user = Address::generate(&ctx.env);
    ctx.client.deposit(&ctx.fountain, &0, &1_000, &user);
    set_time(&ctx, 1_100);
    ctx.client.harvest(&ctx.fountain, &0, &user, &user);

    assert_eq!(aux_balance(&ctx, &old_token, &user), 0);
    assert_eq!(aux_balance(&ctx, &new_token, &user), 1_000);
}

#[test]
fn test_overwrite_can_disable_hook() {
    let ctx = setup(10);
    let (rewarder_id, aux_token) = deploy_rewarder(&ctx, MULTIPLIER_PRECISION, 1_000_000);
    add_pool(&ctx, 10, &RewardHook::Rewarder(rewarder_id));

    ctx.client
        .set(&ctx.owner, &0, &10, &RewardHook::Disabled, &true);
    assert_eq!(ctx.client.pool_hook(&0), RewardHook::Disabled);

    let user = Address::generate(&ctx.env);
    ctx.client.deposit(&ctx.fountain, &0, &1_000, &user);
    set_time(&ctx, 1_100);
    assert_eq!(ctx.client.harvest(&ctx.fountain, &0, &user, &user), 1_000);
    assert_eq!(aux_balance(&ctx, &aux_token, &user), 0);
}

#[test]
fn test_underfunded_rewarder_pays_what_it_holds() {
    let ctx = setup(10);
    let (rewarder_id, aux_token) = deploy_rewarder(&ctx, MULTIPLIER_PRECISION, 300);
    add_pool(&ctx, 10, &RewardHook::Rewarder(rewarder_id));
    let user = Address::generate(&ctx.env);

    ctx.client.deposit(&ctx.fountain, &0, &1_000, &user);
    set_time(&ctx, 1_100);

    assert_eq!(ctx.client.harvest(&ctx.fountain, &0, &user, &user), 1_000);
    assert_eq!(aux_balance(&ctx, &aux_token, &user), 300);
}

#[test]
fn test_failing_hook_does_not_block_deposit() {
    let ctx = setup(10);
    let refusing = ctx.env.register(RefusingRewarder, ());
    add_pool(&ctx, 10, &RewardHook::Rewarder(refusing.clone()));
    let user = Address::generate(&ctx.env);

    ctx.client.deposit(&ctx.fountain, &0, &1_000, &user);

    let payload: events::HookFailedEvent = last_event(&ctx.env, symbol_short!("HOOK_FAIL"))
        .unwrap()
        .try_into_val(&ctx.env)
        .unwrap();
    assert_eq!(payload.pid, 0);
    assert_eq!(payload.rewarder, refusing);
    assert_eq!(payload.user, user);

    assert_eq!(ctx.client.user_info(&0, &user).amount, 1_000);
}

#[test]
fn test_failing_hook_does_not_block_harvest() {
    let ctx = setup(10);
    let refusing = ctx.env.register(RefusingRewarder, ());
    add_pool(&ctx, 10, &RewardHook::Rewarder(refusing));
    let user = Address::generate(&ctx.env);

    ctx.client.deposit(&ctx.fountain, &0, &1_000, &user);
    set_time(&ctx, 1_100);

    let paid = ctx.client.harvest(&ctx.fountain, &0, &user, &user);
    assert!(last_event(&ctx.env, symbol_short!("HOOK_FAIL")).is_some());
    assert!(last_event(&ctx.env, symbol_short!("HARVEST")).is_some());

    assert_eq!(paid, 1_000);
    assert_eq!(crate::test::reward_balance_of(&ctx, &user), 1_000);
    assert_eq!(ctx.client.pending_reward(&0, &user), 0);
}

#[test]
fn test_failing_hook_does_not_block_emergency_exit() {
    let ctx = setup(10);
    let refusing = ctx.env.register(RefusingRewarder, ());
    add_pool(&ctx, 10, &RewardHook::Rewarder(refusing));
    let user = Address::generate(&ctx.env);

    ctx.client.deposit(&ctx.fountain, &0, &1_000, &user);
    set_time(&ctx, 1_100);

    assert_eq!(ctx.client.emergency_withdraw(&ctx.fountain, &0, &user), 1_000);
    assert_eq!(ctx.client.user_info(&0, &user), UserInfo::default());
}
