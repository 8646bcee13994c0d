use soroban_sdk::{contractclient, contracttype, log, Address, Env};

use crate::events;

/// Secondary-reward hook attached to a pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RewardHook {
    /// No auxiliary reward for this pool.
    Disabled,
    /// Contract implementing [`RewarderInterface`].
    Rewarder(Address),
}

/// Interface a secondary-reward contract exposes to the ledger.
///
/// `on_reward` is invoked after every settlement with the position owner,
/// the recipient of any auxiliary payout, the primary reward paid in this
/// settlement and the owner's staked amount after it.
#[contractclient(name = "RewarderClient")]
pub trait RewarderInterface {
    fn on_reward(
        env: Env,
        pid: u32,
        user: Address,
        recipient: Address,
        reward_amount: i128,
        new_amount: i128,
    );

    fn pending_tokens(env: Env, pid: u32, user: Address, reward_amount: i128) -> (Address, i128);
}

/// Notify the pool's hook, if any.
///
/// The call is isolated: a failing hook has its own writes discarded by the
/// host, a `HOOK_FAIL` event is published, and the settlement that triggered
/// it still completes.
pub fn notify(
    env: &Env,
    pid: u32,
    hook: &RewardHook,
    user: &Address,
    recipient: &Address,
    reward_amount: i128,
    new_amount: i128,
) {
    let RewardHook::Rewarder(rewarder) = hook else {
        return;
    };

    let result = RewarderClient::new(env, rewarder).try_on_reward(
        &pid,
        user,
        recipient,
        &reward_amount,
        &new_amount,
    );

    if !matches!(result, Ok(Ok(()))) {
        log!(env, "rewarder hook failed", pid, rewarder.clone(), user.clone());
        events::publish_hook_failed(env, pid, rewarder.clone(), user.clone());
    }
}
