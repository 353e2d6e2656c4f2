#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, Symbol};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the ledger is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub stake_token: Address,
    pub reward_end_time: u64,
    pub timestamp: u64,
}

/// Fired on every deposit or lock extension.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub lock_option: u32,
    pub staked_amount: i128,
    pub unlock_time: u64,
    pub accumulated_rewards: i128,
    pub timestamp: u64,
}

/// Fired when stake tokens leave the ledger.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub amount: i128,
    pub staked_amount: i128,
    pub accumulated_rewards: i128,
    pub timestamp: u64,
}

/// Fired when settled rewards are paid out as reward tokens.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimedEvent {
    pub staker: Address,
    pub rewards: i128,
    pub reward_tokens: i128,
    pub timestamp: u64,
}

/// Fired when a predecessor balance is credited here.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsMigratedEvent {
    pub user: Address,
    pub predecessor: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired on the predecessor when a successor zeroes a balance.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsBurnedEvent {
    pub user: Address,
    pub burner: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when an admin changes a reward-program parameter.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigChangedEvent {
    pub admin: Address,
    pub field: Symbol,
    pub timestamp: u64,
}

/// Fired when the reward token is replaced or disabled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardTokenSetEvent {
    pub admin: Address,
    pub reward_token: Option<Address>,
    pub returned_balance: i128,
    pub timestamp: u64,
}

/// Fired when stray tokens are swept back to an admin.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensRecoveredEvent {
    pub admin: Address,
    pub token: Address,
    pub amount: i128,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, admin: Address, stake_token: Address, reward_end_time: u64) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            stake_token,
            reward_end_time,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(
    env: &Env,
    staker: Address,
    amount: i128,
    lock_option: u32,
    staked_amount: i128,
    unlock_time: u64,
    accumulated_rewards: i128,
) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            lock_option,
            staked_amount,
            unlock_time,
            accumulated_rewards,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(
    env: &Env,
    staker: Address,
    amount: i128,
    staked_amount: i128,
    accumulated_rewards: i128,
) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), staker.clone()),
        WithdrawnEvent {
            staker,
            amount,
            staked_amount,
            accumulated_rewards,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_claimed(env: &Env, staker: Address, rewards: i128, reward_tokens: i128) {
    env.events().publish(
        (symbol_short!("CLAIMED"), staker.clone()),
        ClaimedEvent {
            staker,
            rewards,
            reward_tokens,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_migrated(env: &Env, user: Address, predecessor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("MIGRATED"), user.clone()),
        RewardsMigratedEvent {
            user,
            predecessor,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_burned(env: &Env, user: Address, burner: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RWD_BURN"), user.clone()),
        RewardsBurnedEvent {
            user,
            burner,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_config_changed(env: &Env, admin: Address, field: Symbol) {
    env.events().publish(
        (symbol_short!("CFG_SET"), field.clone()),
        ConfigChangedEvent {
            admin,
            field,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_token_set(
    env: &Env,
    admin: Address,
    reward_token: Option<Address>,
    returned_balance: i128,
) {
    env.events().publish(
        (symbol_short!("RWD_TOK"),),
        RewardTokenSetEvent {
            admin,
            reward_token,
            returned_balance,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_tokens_recovered(env: &Env, admin: Address, token: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RECOVER"), token.clone()),
        TokensRecoveredEvent {
            admin,
            token,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}
