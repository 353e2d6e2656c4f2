use soroban_sdk::{contracttype, symbol_short, vec, Address, Env, Symbol, Vec};

use crate::rewards::{RewardRates, RATE_SCALE};
use crate::ContractError;

pub(crate) const CONFIG: Symbol = symbol_short!("CONFIG");

const DAY: u64 = 24 * 60 * 60;

/// Default lock durations offered at initialization; index 0 means "no lock".
const DEFAULT_LOCK_DAYS: [u64; 8] = [0, 7, 14, 30, 60, 90, 180, 365];

/// One reward token per 1000 staked tokens per day.
pub const DEFAULT_STAKE_REWARD_FACTOR: i128 = 1_000 * DAY as i128;

const INSTANCE_TTL_THRESHOLD: u32 = 17_280; // ~1 day
const INSTANCE_TTL_EXTEND_TO: u32 = 518_400; // ~30 days

/// A lock duration a user may choose and the rate premium it earns.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockOption {
    pub duration: u64,
    /// Numerator over `RATE_SCALE`.
    pub reward_factor: i128,
}

/// Reward-program parameters shared by every position.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GlobalConfig {
    pub lock_options: Vec<LockOption>,
    pub unlocked_rewards_factor: i128,
    pub locked_rewards_enabled: bool,
    pub reward_end_time: u64,
    /// Reward units that convert into one reward token on claim.
    pub stake_reward_factor: i128,
    /// `0` disables staking.
    pub max_stake_per_user: i128,
    pub predecessor: Option<Address>,
}

impl GlobalConfig {
    pub fn new(env: &Env, now: u64) -> Self {
        let mut lock_options = Vec::new(env);
        for days in DEFAULT_LOCK_DAYS {
            lock_options.push_back(LockOption {
                duration: days * DAY,
                reward_factor: RATE_SCALE,
            });
        }

        Self {
            lock_options,
            unlocked_rewards_factor: RATE_SCALE,
            locked_rewards_enabled: false,
            reward_end_time: now.saturating_add(365 * DAY),
            stake_reward_factor: DEFAULT_STAKE_REWARD_FACTOR,
            max_stake_per_user: 0,
            predecessor: None,
        }
    }

    pub fn rates(&self) -> RewardRates {
        RewardRates {
            locked_rewards_enabled: self.locked_rewards_enabled,
            unlocked_rewards_factor: self.unlocked_rewards_factor,
        }
    }

    pub fn lock_option(&self, index: u32) -> Result<LockOption, ContractError> {
        self.lock_options
            .get(index)
            .ok_or(ContractError::InvalidLockOption)
    }

    /// Replace the lock options. An empty `reward_factors` resets every
    /// option to `RATE_SCALE`.
    pub fn set_lock_options(
        &mut self,
        env: &Env,
        durations: Vec<u64>,
        reward_factors: Vec<i128>,
    ) -> Result<(), ContractError> {
        if durations.is_empty() {
            return Err(ContractError::InvalidConfig);
        }
        if !reward_factors.is_empty() && reward_factors.len() != durations.len() {
            return Err(ContractError::InvalidConfig);
        }

        let mut options = Vec::new(env);
        for (i, duration) in durations.iter().enumerate() {
            let reward_factor = if reward_factors.is_empty() {
                RATE_SCALE
            } else {
                reward_factors
                    .get(i as u32)
                    .ok_or(ContractError::InvalidConfig)?
            };
            if reward_factor < 0 {
                return Err(ContractError::InvalidConfig);
            }
            options.push_back(LockOption {
                duration,
                reward_factor,
            });
        }
        self.lock_options = options;
        Ok(())
    }

    pub fn set_unlocked_rewards_factor(&mut self, factor: i128) -> Result<(), ContractError> {
        if !(0..=RATE_SCALE).contains(&factor) {
            return Err(ContractError::InvalidConfig);
        }
        self.unlocked_rewards_factor = factor;
        Ok(())
    }

    pub fn set_reward_end_time(&mut self, end_time: u64, now: u64) -> Result<(), ContractError> {
        if end_time < now {
            return Err(ContractError::InvalidConfig);
        }
        self.reward_end_time = end_time;
        Ok(())
    }

    pub fn set_stake_reward_factor(&mut self, factor: i128) -> Result<(), ContractError> {
        if factor <= 0 {
            return Err(ContractError::InvalidConfig);
        }
        self.stake_reward_factor = factor;
        Ok(())
    }

    pub fn set_max_stake_per_user(&mut self, max: i128) -> Result<(), ContractError> {
        if max < 0 {
            return Err(ContractError::InvalidConfig);
        }
        self.max_stake_per_user = max;
        Ok(())
    }

    /// The predecessor link is write-once.
    pub fn set_predecessor(
        &mut self,
        predecessor: Address,
        this_contract: &Address,
    ) -> Result<(), ContractError> {
        if self.predecessor.is_some() {
            return Err(ContractError::PredecessorAlreadySet);
        }
        if predecessor == *this_contract {
            return Err(ContractError::InvalidConfig);
        }
        self.predecessor = Some(predecessor);
        Ok(())
    }

    pub fn durations(&self, env: &Env) -> Vec<u64> {
        let mut out = vec![env];
        for option in self.lock_options.iter() {
            out.push_back(option.duration);
        }
        out
    }

    pub fn reward_factors(&self, env: &Env) -> Vec<i128> {
        let mut out = vec![env];
        for option in self.lock_options.iter() {
            out.push_back(option.reward_factor);
        }
        out
    }
}

// ── Storage ─────────────────────────────────────────────────────────────────

pub fn load(env: &Env) -> Result<GlobalConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

pub fn save(env: &Env, config: &GlobalConfig) {
    env.storage().instance().set(&CONFIG, config);
    extend_instance_ttl(env);
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND_TO);
}
