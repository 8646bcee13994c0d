#![no_std]

pub mod events;
pub mod hook;
pub mod pool;
pub mod position;
pub mod rewards;

use soroban_sdk::{
    contract, contractimpl, log, symbol_short, token, Address, Env, Symbol, Vec,
};

pub use hook::{RewardHook, RewarderClient, RewarderInterface};
pub use pool::PoolInfo;
pub use position::UserInfo;
pub use rewards::PRECISION;

// ── Storage key constants ────────────────────────────────────────────────────

const OWNER: Symbol = symbol_short!("OWNER");
const PENDING_OWNER: Symbol = symbol_short!("PEND_OWN");
const INITIALIZED: Symbol = symbol_short!("INIT");
const FOUNTAIN: Symbol = symbol_short!("FOUNTAIN");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    /// Caller is not the bound fountain (or not the owner, for admin calls).
    Unauthorized = 3,
    InvalidInput = 4,
    /// Withdrawal exceeds the position's staked amount.
    InsufficientBalance = 5,
    /// Pool index is past the end of the registry.
    InvalidPool = 6,
    ArithmeticOverflow = 7,
    /// The ledger holds less reward token than the harvest owes.
    InsufficientRewardBalance = 8,
    NoPendingOwner = 9,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct AngelContract;

#[contractimpl]
impl AngelContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bind the ledger to its owner, fountain and reward token.
    ///
    /// * `owner`        – may add/set pools, change the emission rate and fund.
    /// * `fountain`     – the only caller allowed to move positions. Immutable.
    /// * `reward_token` – SAC address of the primary reward asset. Immutable.
    pub fn initialize(
        env: Env,
        owner: Address,
        fountain: Address,
        reward_token: Address,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if fountain == reward_token {
            return Err(ContractError::InvalidInput);
        }

        env.storage().instance().set(&OWNER, &owner);
        env.storage().instance().set(&FOUNTAIN, &fountain);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage().instance().set(&INITIALIZED, &true);
        // Emission rate, pool count and total weight start at zero;
        // the pool module reads absent keys as zero.

        events::publish_initialized(&env, owner, fountain, reward_token);

        Ok(())
    }

    // ── Pool administration ─────────────────────────────────────────────────

    /// Append a pool and return its index.
    ///
    /// Other pools are not flushed: call `mass_update_pools` first to settle
    /// their accrual at the old total weight.
    pub fn add(
        env: Env,
        caller: Address,
        alloc_point: u64,
        staked_asset: Address,
        hook: RewardHook,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let total = pool::total_alloc_point(&env)
            .checked_add(alloc_point)
            .ok_or(ContractError::ArithmeticOverflow)?;

        let pid = pool::append(
            &env,
            &PoolInfo {
                staked_asset: staked_asset.clone(),
                alloc_point,
                acc_reward_per_share: 0,
                reward_remainder: 0,
                last_reward_time: env.ledger().timestamp(),
                total_staked: 0,
                hook: hook.clone(),
            },
        )?;
        pool::set_total_alloc_point(&env, total);

        events::publish_pool_added(&env, pid, alloc_point, staked_asset, hook);

        Ok(pid)
    }

    /// Re-weight pool `pid`. The hook is only replaced when `overwrite` is set.
    pub fn set(
        env: Env,
        caller: Address,
        pid: u32,
        alloc_point: u64,
        hook: RewardHook,
        overwrite: bool,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let mut info = pool::load(&env, pid)?;
        let total = pool::total_alloc_point(&env)
            .checked_sub(info.alloc_point)
            .and_then(|t| t.checked_add(alloc_point))
            .ok_or(ContractError::ArithmeticOverflow)?;

        info.alloc_point = alloc_point;
        if overwrite {
            info.hook = hook;
        }
        pool::store(&env, pid, &info);
        pool::set_total_alloc_point(&env, total);

        events::publish_pool_set(&env, pid, alloc_point, info.hook, overwrite);

        Ok(())
    }

    // ── Emission ────────────────────────────────────────────────────────────

    /// Change the primary reward emitted per second across all pools.
    ///
    /// The pools in `flush` are brought current at the old rate first. Pools
    /// left out accrue their unsettled interval at the new rate, so list
    /// every active pool unless one of them cannot be updated.
    pub fn set_reward_per_second(
        env: Env,
        caller: Address,
        reward_per_second: i128,
        flush: Vec<u32>,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        if reward_per_second < 0 {
            return Err(ContractError::InvalidInput);
        }

        pool::mass_update(&env, &flush)?;
        pool::set_reward_per_second(&env, reward_per_second);

        events::publish_reward_rate_set(&env, reward_per_second);

        Ok(())
    }

    /// Pull `amount` reward tokens from `from` into the ledger.
    pub fn fund(env: Env, from: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        from.require_auth();
        Self::require_owner(&env, &from)?;

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let reward_token = Self::reward_token(env.clone())?;
        token::Client::new(&env, &reward_token).transfer(
            &from,
            &env.current_contract_address(),
            &amount,
        );

        events::publish_funded(&env, from, amount);

        Ok(())
    }

    // ── Accrual ─────────────────────────────────────────────────────────────

    /// Bring pool `pid` current and return its state.
    pub fn update_pool(env: Env, pid: u32) -> Result<PoolInfo, ContractError> {
        pool::update(&env, pid)
    }

    /// Update each listed pool in order, stopping at the first invalid pid.
    pub fn mass_update_pools(env: Env, pids: Vec<u32>) -> Result<(), ContractError> {
        pool::mass_update(&env, &pids)
    }

    pub fn update_all_pools(env: Env) -> Result<(), ContractError> {
        pool::update_all(&env)
    }

    // ── Fountain-only position mutations ────────────────────────────────────

    /// Credit `amount` of staked asset to `to`'s position.
    ///
    /// Unharvested reward is kept: the debt grows by exactly the accrual the
    /// new amount would otherwise claim retroactively.
    pub fn deposit(
        env: Env,
        caller: Address,
        pid: u32,
        amount: i128,
        to: Address,
    ) -> Result<(), ContractError> {
        Self::require_fountain(&env, &caller)?;
        pool::require_exists(&env, pid)?;
        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut info = pool::update(&env, pid)?;
        let mut user = position::load(&env, pid, &to);

        let debt_delta = rewards::accrued(&env, amount, info.acc_reward_per_share)?;
        user.amount = user
            .amount
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        user.reward_debt = user
            .reward_debt
            .checked_add(debt_delta)
            .ok_or(ContractError::ArithmeticOverflow)?;
        info.total_staked = info
            .total_staked
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        position::store(&env, pid, &to, &user);
        pool::store(&env, pid, &info);

        hook::notify(&env, pid, &info.hook, &to, &to, 0, user.amount);

        events::publish_deposit(&env, pid, caller, amount, to);

        Ok(())
    }

    /// Debit `amount` from `to`'s position, keeping unharvested reward.
    pub fn withdraw(
        env: Env,
        caller: Address,
        pid: u32,
        amount: i128,
        to: Address,
    ) -> Result<(), ContractError> {
        Self::require_fountain(&env, &caller)?;
        pool::require_exists(&env, pid)?;
        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }
        let mut user = position::load(&env, pid, &to);
        Self::require_balance(&env, pid, &to, &user, amount)?;

        let mut info = pool::update(&env, pid)?;

        let debt_delta = rewards::accrued(&env, amount, info.acc_reward_per_share)?;
        user.reward_debt = user
            .reward_debt
            .checked_sub(debt_delta)
            .ok_or(ContractError::ArithmeticOverflow)?;
        user.amount -= amount;
        info.total_staked = info
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        position::store(&env, pid, &to, &user);
        pool::store(&env, pid, &info);

        hook::notify(&env, pid, &info.hook, &to, &to, 0, user.amount);

        events::publish_withdraw(&env, pid, caller, amount, to);

        Ok(())
    }

    /// Pay `from`'s pending reward to `to` and return the amount paid.
    pub fn harvest(
        env: Env,
        caller: Address,
        pid: u32,
        from: Address,
        to: Address,
    ) -> Result<i128, ContractError> {
        Self::require_fountain(&env, &caller)?;

        let info = pool::update(&env, pid)?;
        let mut user = position::load(&env, pid, &from);

        let accumulated = rewards::accrued(&env, user.amount, info.acc_reward_per_share)?;
        let pending = Self::positive(
            accumulated
                .checked_sub(user.reward_debt)
                .ok_or(ContractError::ArithmeticOverflow)?,
        );
        user.reward_debt = accumulated;

        position::store(&env, pid, &from, &user);
        Self::pay_reward(&env, &to, pending)?;

        hook::notify(&env, pid, &info.hook, &from, &to, pending, user.amount);

        events::publish_harvest(&env, pid, from, to, pending);

        Ok(pending)
    }

    /// Withdraw `amount` from `to`'s position and pay all pending reward to
    /// `to` in one step. Returns the reward paid.
    pub fn withdraw_and_harvest(
        env: Env,
        caller: Address,
        pid: u32,
        amount: i128,
        to: Address,
    ) -> Result<i128, ContractError> {
        Self::require_fountain(&env, &caller)?;
        pool::require_exists(&env, pid)?;
        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }
        let mut user = position::load(&env, pid, &to);
        Self::require_balance(&env, pid, &to, &user, amount)?;

        let mut info = pool::update(&env, pid)?;

        let accumulated = rewards::accrued(&env, user.amount, info.acc_reward_per_share)?;
        let pending = Self::positive(
            accumulated
                .checked_sub(user.reward_debt)
                .ok_or(ContractError::ArithmeticOverflow)?,
        );
        let withdrawn_share = rewards::accrued(&env, amount, info.acc_reward_per_share)?;
        user.reward_debt = accumulated
            .checked_sub(withdrawn_share)
            .ok_or(ContractError::ArithmeticOverflow)?;
        user.amount -= amount;
        info.total_staked = info
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        position::store(&env, pid, &to, &user);
        pool::store(&env, pid, &info);
        Self::pay_reward(&env, &to, pending)?;

        hook::notify(&env, pid, &info.hook, &to, &to, pending, user.amount);

        events::publish_withdraw(&env, pid, caller, amount, to.clone());
        events::publish_harvest(&env, pid, to.clone(), to, pending);

        Ok(pending)
    }

    /// Exit `to`'s whole position without touching reward accounting.
    ///
    /// Returns the staked amount released. Pending reward is forfeited.
    pub fn emergency_withdraw(
        env: Env,
        caller: Address,
        pid: u32,
        to: Address,
    ) -> Result<i128, ContractError> {
        Self::require_fountain(&env, &caller)?;

        let mut info = pool::load(&env, pid)?;
        let user = position::load(&env, pid, &to);
        let amount = user.amount;

        info.total_staked = info.total_staked.saturating_sub(amount);
        position::store(&env, pid, &to, &UserInfo::default());
        pool::store(&env, pid, &info);

        hook::notify(&env, pid, &info.hook, &to, &to, 0, 0);

        events::publish_emergency_withdraw(&env, pid, caller, amount, to);

        Ok(amount)
    }

    // ── View functions ──────────────────────────────────────────────────────

    /// Reward `account` could harvest from pool `pid` right now.
    pub fn pending_reward(env: Env, pid: u32, account: Address) -> Result<i128, ContractError> {
        let info = pool::load(&env, pid)?;
        let projected = pool::project(&env, &info, env.ledger().timestamp())?;
        let user = position::load(&env, pid, &account);

        let pending = rewards::pending(
            &env,
            user.amount,
            projected.acc_reward_per_share,
            user.reward_debt,
        )?;
        Ok(Self::positive(pending))
    }

    pub fn pool_length(env: Env) -> u32 {
        pool::pool_length(&env)
    }

    pub fn pool_info(env: Env, pid: u32) -> Result<PoolInfo, ContractError> {
        pool::load(&env, pid)
    }

    pub fn staked_asset(env: Env, pid: u32) -> Result<Address, ContractError> {
        Ok(pool::load(&env, pid)?.staked_asset)
    }

    pub fn pool_hook(env: Env, pid: u32) -> Result<RewardHook, ContractError> {
        Ok(pool::load(&env, pid)?.hook)
    }

    pub fn user_info(env: Env, pid: u32, account: Address) -> Result<UserInfo, ContractError> {
        pool::require_exists(&env, pid)?;
        Ok(position::load(&env, pid, &account))
    }

    pub fn total_alloc_point(env: Env) -> u64 {
        pool::total_alloc_point(&env)
    }

    pub fn reward_per_second(env: Env) -> i128 {
        pool::reward_per_second(&env)
    }

    /// Reward tokens currently held by the ledger.
    pub fn reward_balance(env: Env) -> Result<i128, ContractError> {
        let reward_token = Self::reward_token(env.clone())?;
        Ok(token::Client::new(&env, &reward_token).balance(&env.current_contract_address()))
    }

    pub fn fountain(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&FOUNTAIN)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn reward_token(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn owner(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&OWNER)
            .ok_or(ContractError::NotInitialized)
    }

    // ── Ownership transfer (two-step) ───────────────────────────────────────

    /// Propose a new owner. The proposed address completes the handover with
    /// `accept_owner`.
    pub fn propose_owner(
        env: Env,
        current_owner: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_owner.require_auth();
        Self::require_owner(&env, &current_owner)?;

        env.storage().instance().set(&PENDING_OWNER, &new_owner);

        events::publish_owner_transfer_proposed(&env, current_owner, new_owner);

        Ok(())
    }

    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_owner.require_auth();

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_OWNER)
            .ok_or(ContractError::NoPendingOwner)?;
        if new_owner != pending {
            return Err(ContractError::Unauthorized);
        }

        let old_owner = Self::owner(env.clone())?;
        env.storage().instance().set(&OWNER, &new_owner);
        env.storage().instance().remove(&PENDING_OWNER);

        events::publish_owner_transfer_accepted(&env, old_owner, new_owner);

        Ok(())
    }

    pub fn cancel_owner_transfer(env: Env, current_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_owner.require_auth();
        Self::require_owner(&env, &current_owner)?;

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_OWNER)
            .ok_or(ContractError::NoPendingOwner)?;
        env.storage().instance().remove(&PENDING_OWNER);

        events::publish_owner_transfer_cancelled(&env, current_owner, pending);

        Ok(())
    }

    pub fn pending_owner(env: Env) -> Option<Address> {
        env.storage().instance().get(&PENDING_OWNER)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let owner = Self::owner(env.clone())?;
        if *caller != owner {
            log!(env, "caller is not owner", caller.clone());
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Guard for every position mutation: `caller` must be the bound fountain
    /// and must have authorised this invocation.
    fn require_fountain(env: &Env, caller: &Address) -> Result<(), ContractError> {
        Self::require_initialized(env)?;
        caller.require_auth();

        let fountain = Self::fountain(env.clone())?;
        if *caller != fountain {
            log!(env, "not called by correct fountain", caller.clone());
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn require_balance(
        env: &Env,
        pid: u32,
        account: &Address,
        user: &UserInfo,
        amount: i128,
    ) -> Result<(), ContractError> {
        if user.amount < amount {
            log!(env, "withdraw exceeds stake", pid, account.clone(), user.amount, amount);
            return Err(ContractError::InsufficientBalance);
        }
        Ok(())
    }

    /// Rounding can leave a settled position one unit below its baseline;
    /// that is reported as nothing owed.
    fn positive(pending: i128) -> i128 {
        pending.max(0)
    }

    fn pay_reward(env: &Env, to: &Address, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Ok(());
        }

        let reward_token = Self::reward_token(env.clone())?;
        let client = token::Client::new(env, &reward_token);
        let ledger = env.current_contract_address();
        let balance = client.balance(&ledger);
        if balance < amount {
            log!(env, "reward balance too low", balance, amount);
            return Err(ContractError::InsufficientRewardBalance);
        }
        client.transfer(&ledger, to, &amount);

        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_hook;
