#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

use crate::hook::RewardHook;

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the ledger is bound to its owner, fountain and reward token.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub fountain: Address,
    pub reward_token: Address,
    pub timestamp: u64,
}

/// Fired when a pool is appended to the registry.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pid: u32,
    pub alloc_point: u64,
    pub staked_asset: Address,
    pub hook: RewardHook,
    pub timestamp: u64,
}

/// Fired when a pool is re-weighted. `hook` is the hook stored after the call.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolSetEvent {
    pub pid: u32,
    pub alloc_point: u64,
    pub hook: RewardHook,
    pub overwrite: bool,
    pub timestamp: u64,
}

/// Fired whenever a pool's accumulator is written.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolUpdatedEvent {
    pub pid: u32,
    pub last_reward_time: u64,
    pub total_staked: i128,
    pub acc_reward_per_share: i128,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub pid: u32,
    pub user: Address,
    pub amount: i128,
    pub to: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub pid: u32,
    pub user: Address,
    pub amount: i128,
    pub to: Address,
    pub timestamp: u64,
}

/// Fired when pending primary reward is settled for `user` and paid to `to`.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarvestEvent {
    pub pid: u32,
    pub user: Address,
    pub to: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawEvent {
    pub pid: u32,
    pub user: Address,
    pub amount: i128,
    pub to: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardRateSetEvent {
    pub reward_per_second: i128,
    pub timestamp: u64,
}

/// Fired when the owner tops up the ledger's reward balance.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundedEvent {
    pub from: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when a pool's rewarder rejected a notification.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HookFailedEvent {
    pub pid: u32,
    pub rewarder: Address,
    pub user: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferProposedEvent {
    pub current_owner: Address,
    pub proposed_owner: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferAcceptedEvent {
    pub old_owner: Address,
    pub new_owner: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferCancelledEvent {
    pub owner: Address,
    pub cancelled_proposed: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, owner: Address, fountain: Address, reward_token: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            fountain,
            reward_token,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_added(
    env: &Env,
    pid: u32,
    alloc_point: u64,
    staked_asset: Address,
    hook: RewardHook,
) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), pid),
        PoolAddedEvent {
            pid,
            alloc_point,
            staked_asset,
            hook,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_set(env: &Env, pid: u32, alloc_point: u64, hook: RewardHook, overwrite: bool) {
    env.events().publish(
        (symbol_short!("POOL_SET"), pid),
        PoolSetEvent {
            pid,
            alloc_point,
            hook,
            overwrite,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_updated(
    env: &Env,
    pid: u32,
    last_reward_time: u64,
    total_staked: i128,
    acc_reward_per_share: i128,
) {
    env.events().publish(
        (symbol_short!("POOL_UPD"), pid),
        PoolUpdatedEvent {
            pid,
            last_reward_time,
            total_staked,
            acc_reward_per_share,
        },
    );
}

pub fn publish_deposit(env: &Env, pid: u32, user: Address, amount: i128, to: Address) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), pid, to.clone()),
        DepositEvent {
            pid,
            user,
            amount,
            to,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdraw(env: &Env, pid: u32, user: Address, amount: i128, to: Address) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), pid, to.clone()),
        WithdrawEvent {
            pid,
            user,
            amount,
            to,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_harvest(env: &Env, pid: u32, user: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("HARVEST"), pid, user.clone()),
        HarvestEvent {
            pid,
            user,
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_emergency_withdraw(env: &Env, pid: u32, user: Address, amount: i128, to: Address) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), pid, user.clone()),
        EmergencyWithdrawEvent {
            pid,
            user,
            amount,
            to,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_rate_set(env: &Env, reward_per_second: i128) {
    env.events().publish(
        (symbol_short!("RWD_RATE"),),
        RewardRateSetEvent {
            reward_per_second,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_funded(env: &Env, from: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("FUNDED"), from.clone()),
        FundedEvent {
            from,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_hook_failed(env: &Env, pid: u32, rewarder: Address, user: Address) {
    env.events().publish(
        (symbol_short!("HOOK_FAIL"), pid),
        HookFailedEvent {
            pid,
            rewarder,
            user,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_proposed(env: &Env, current_owner: Address, proposed_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_PROP"), current_owner.clone()),
        OwnerTransferProposedEvent {
            current_owner,
            proposed_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_accepted(env: &Env, old_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_ACPT"), new_owner.clone()),
        OwnerTransferAcceptedEvent {
            old_owner,
            new_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_cancelled(env: &Env, owner: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("OWN_CNCL"), owner.clone()),
        OwnerTransferCancelledEvent {
            owner,
            cancelled_proposed,
            timestamp: env.ledger().timestamp(),
        },
    );
}
