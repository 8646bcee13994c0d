use soroban_sdk::{contracttype, log, symbol_short, Address, Env, Symbol, Vec};

use crate::{events, hook::RewardHook, rewards, ContractError};

// ── Storage keys ────────────────────────────────────────────────────────────

const POOL: Symbol = symbol_short!("POOL");
const POOL_COUNT: Symbol = symbol_short!("POOL_CNT");
const TOTAL_ALLOC: Symbol = symbol_short!("TOT_ALLOC");
const REWARD_RATE: Symbol = symbol_short!("RWD_RATE");

const TTL_THRESHOLD: u32 = 518_400;
const TTL_EXTEND_TO: u32 = 1_036_800;

// ── Types ───────────────────────────────────────────────────────────────────

/// Accrual state and configuration of one pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolInfo {
    /// Asset staked into this pool through the fountain.
    pub staked_asset: Address,
    /// Share of the global emission, relative to `total_alloc_point`.
    pub alloc_point: u64,
    /// Reward per staked unit since inception, scaled by `PRECISION`.
    pub acc_reward_per_share: i128,
    /// Ledger timestamp the accumulator was last brought current.
    pub last_reward_time: u64,
    /// Scaled reward not yet credited to `acc_reward_per_share`, carried into
    /// the next accrual. Always below `total_staked` at the time it was set.
    pub reward_remainder: i128,
    /// Sum of every position's `amount` in this pool.
    pub total_staked: i128,
    /// Secondary-reward hook notified on every settlement.
    pub hook: RewardHook,
}

// ── Registry-level state ────────────────────────────────────────────────────

pub fn pool_length(env: &Env) -> u32 {
    env.storage().instance().get(&POOL_COUNT).unwrap_or(0)
}

pub fn total_alloc_point(env: &Env) -> u64 {
    env.storage().instance().get(&TOTAL_ALLOC).unwrap_or(0)
}

pub fn set_total_alloc_point(env: &Env, total: u64) {
    env.storage().instance().set(&TOTAL_ALLOC, &total);
}

pub fn reward_per_second(env: &Env) -> i128 {
    env.storage().instance().get(&REWARD_RATE).unwrap_or(0)
}

pub fn set_reward_per_second(env: &Env, rate: i128) {
    env.storage().instance().set(&REWARD_RATE, &rate);
}

// ── Pool entries ────────────────────────────────────────────────────────────

fn pool_key(pid: u32) -> (Symbol, u32) {
    (POOL, pid)
}

/// Fail with `InvalidPool` when `pid` is past the end of the registry.
pub fn require_exists(env: &Env, pid: u32) -> Result<(), ContractError> {
    let length = pool_length(env);
    if pid >= length {
        log!(env, "invalid pool", pid, length);
        return Err(ContractError::InvalidPool);
    }
    Ok(())
}

pub fn load(env: &Env, pid: u32) -> Result<PoolInfo, ContractError> {
    require_exists(env, pid)?;
    env.storage()
        .persistent()
        .get(&pool_key(pid))
        .ok_or(ContractError::InvalidPool)
}

pub fn store(env: &Env, pid: u32, pool: &PoolInfo) {
    let key = pool_key(pid);
    env.storage().persistent().set(&key, pool);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Append a pool and return its index.
pub fn append(env: &Env, pool: &PoolInfo) -> Result<u32, ContractError> {
    let pid = pool_length(env);
    let next = pid.checked_add(1).ok_or(ContractError::ArithmeticOverflow)?;
    store(env, pid, pool);
    env.storage().instance().set(&POOL_COUNT, &next);
    Ok(pid)
}

// ── Accrual ─────────────────────────────────────────────────────────────────

/// Compute `pool` as it would be after an accrual at `now`, without writing.
///
/// Both [`update`] and the pending-reward view go through this function, so
/// a view and an update at the same timestamp always agree.
pub fn project(env: &Env, pool: &PoolInfo, now: u64) -> Result<PoolInfo, ContractError> {
    let mut next = pool.clone();
    if now <= pool.last_reward_time {
        return Ok(next);
    }

    if pool.total_staked > 0 {
        let reward = rewards::pool_reward(
            env,
            now - pool.last_reward_time,
            reward_per_second(env),
            pool.alloc_point,
            total_alloc_point(env),
        )?;
        let (acc, remainder) = rewards::accumulate(
            env,
            pool.acc_reward_per_share,
            pool.reward_remainder,
            reward,
            pool.total_staked,
        )?;
        next.acc_reward_per_share = acc;
        next.reward_remainder = remainder;
    }
    next.last_reward_time = now;

    Ok(next)
}

/// Bring pool `pid` current as of the ledger timestamp.
///
/// Repeated calls within one timestamp are no-ops.
pub fn update(env: &Env, pid: u32) -> Result<PoolInfo, ContractError> {
    let pool = load(env, pid)?;
    let now = env.ledger().timestamp();
    if now <= pool.last_reward_time {
        return Ok(pool);
    }

    let updated = project(env, &pool, now)?;
    store(env, pid, &updated);

    events::publish_pool_updated(
        env,
        pid,
        updated.last_reward_time,
        updated.total_staked,
        updated.acc_reward_per_share,
    );

    Ok(updated)
}

/// Update each pid in order, stopping at the first failure.
///
/// Pools before the failing pid have already been written.
pub fn mass_update(env: &Env, pids: &Vec<u32>) -> Result<(), ContractError> {
    for pid in pids.iter() {
        update(env, pid)?;
    }
    Ok(())
}

pub fn update_all(env: &Env) -> Result<(), ContractError> {
    for pid in 0..pool_length(env) {
        update(env, pid)?;
    }
    Ok(())
}
