use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

const USER: Symbol = symbol_short!("USER");

const TTL_THRESHOLD: u32 = 518_400;
const TTL_EXTEND_TO: u32 = 1_036_800;

/// A staker's position in one pool.
///
/// `reward_debt` is signed: a withdrawal keeps unharvested reward owed by
/// lowering the baseline, which can take it below zero.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserInfo {
    pub amount: i128,
    pub reward_debt: i128,
}

fn user_key(pid: u32, account: &Address) -> (Symbol, u32, Address) {
    (USER, pid, account.clone())
}

/// Load a position; accounts that never touched the pool read as empty.
pub fn load(env: &Env, pid: u32, account: &Address) -> UserInfo {
    env.storage()
        .persistent()
        .get(&user_key(pid, account))
        .unwrap_or_default()
}

pub fn store(env: &Env, pid: u32, account: &Address, info: &UserInfo) {
    let key = user_key(pid, account);
    env.storage().persistent().set(&key, info);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
