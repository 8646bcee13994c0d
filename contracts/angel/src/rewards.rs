use soroban_sdk::{Env, I256};

use crate::ContractError;

/// Fixed-point scaling factor for `acc_reward_per_share`.
///
/// Flooring a fold leaves less than one scaled unit per staked unit behind,
/// and that remainder is carried into the next fold (see [`accumulate`]), so
/// no emission is lost whatever the staked supply.
pub const PRECISION: i128 = 1_000_000_000_000_000_000;

// ── Widened arithmetic ──────────────────────────────────────────────────────

/// `a * b / denom` with a 256-bit intermediate.
///
/// The product of two `i128` values always fits in `I256`, so only the final
/// narrowing back to `i128` can fail.
pub fn mul_div(env: &Env, a: i128, b: i128, denom: i128) -> Result<i128, ContractError> {
    if denom == 0 {
        return Err(ContractError::ArithmeticOverflow);
    }
    if a == 0 || b == 0 {
        return Ok(0);
    }

    let product = I256::from_i128(env, a).mul(&I256::from_i128(env, b));
    product
        .div(&I256::from_i128(env, denom))
        .to_i128()
        .ok_or(ContractError::ArithmeticOverflow)
}

// ── Core reward engine ──────────────────────────────────────────────────────

/// Reward emitted to one pool over `elapsed` seconds.
///
/// ```text
/// reward = elapsed × reward_per_second × alloc_point / total_alloc_point
/// ```
///
/// A registry with zero total weight emits nothing.
pub fn pool_reward(
    env: &Env,
    elapsed: u64,
    reward_per_second: i128,
    alloc_point: u64,
    total_alloc_point: u64,
) -> Result<i128, ContractError> {
    if total_alloc_point == 0 || alloc_point == 0 {
        return Ok(0);
    }

    let emitted = reward_per_second
        .checked_mul(i128::from(elapsed))
        .ok_or(ContractError::ArithmeticOverflow)?;

    mul_div(
        env,
        emitted,
        i128::from(alloc_point),
        i128::from(total_alloc_point),
    )
}

/// Fold `reward` into the per-share accumulator.
///
/// ```text
/// scaled    = reward × PRECISION + remainder
/// new_acc   = acc + scaled / total_staked
/// remainder = scaled mod total_staked
/// ```
///
/// Returns `(new_acc, remainder)`. The remainder is scaled reward that could
/// not be credited as a whole per-share unit; it must be passed back on the
/// next fold. With nothing staked both are returned unchanged.
pub fn accumulate(
    env: &Env,
    acc: i128,
    remainder: i128,
    reward: i128,
    total_staked: i128,
) -> Result<(i128, i128), ContractError> {
    if total_staked <= 0 {
        return Ok((acc, remainder));
    }

    let staked = I256::from_i128(env, total_staked);
    let scaled = I256::from_i128(env, reward)
        .mul(&I256::from_i128(env, PRECISION))
        .add(&I256::from_i128(env, remainder));
    let delta = scaled.div(&staked);
    let carried = scaled
        .sub(&delta.mul(&staked))
        .to_i128()
        .ok_or(ContractError::ArithmeticOverflow)?;
    let delta = delta.to_i128().ok_or(ContractError::ArithmeticOverflow)?;

    let acc = acc
        .checked_add(delta)
        .ok_or(ContractError::ArithmeticOverflow)?;
    Ok((acc, carried))
}

/// Total reward a stake of `amount` has accrued against accumulator `acc`.
pub fn accrued(env: &Env, amount: i128, acc: i128) -> Result<i128, ContractError> {
    mul_div(env, amount, acc, PRECISION)
}

/// `amount × acc / PRECISION − reward_debt`.
pub fn pending(
    env: &Env,
    amount: i128,
    acc: i128,
    reward_debt: i128,
) -> Result<i128, ContractError> {
    accrued(env, amount, acc)?
        .checked_sub(reward_debt)
        .ok_or(ContractError::ArithmeticOverflow)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
