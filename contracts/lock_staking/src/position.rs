use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::config::GlobalConfig;
use crate::rewards::{self, AccrualMode};
use crate::ContractError;

// Per-user persistent storage uses tuple keys: (prefix, user_address)
const USER_POSITION: Symbol = symbol_short!("POS");
const USER_MIGRATED: Symbol = symbol_short!("MIGRATED");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

/// A user's stake and settled reward balance.
///
/// `stake_time` is the last settlement point, not the time of the first
/// deposit: every mutation folds the reward earned so far into
/// `accumulated_rewards` and restarts accrual from "now".
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserPosition {
    pub staked_amount: i128,
    pub stake_time: u64,
    pub unlock_time: u64,
    pub accumulated_rewards: i128,
    /// Rate multiplier of the lock option the position earns under.
    pub reward_factor: i128,
}

impl UserPosition {
    pub fn is_active(&self) -> bool {
        self.staked_amount > 0
    }

    /// Nothing staked and nothing owed; the record can be dropped.
    pub fn is_empty(&self) -> bool {
        self.staked_amount == 0 && self.accumulated_rewards == 0
    }

    /// A reward too large for an `i128` is reported as `InvalidAmount`.
    fn accrual(
        &self,
        config: &GlobalConfig,
        now: u64,
        mode: AccrualMode,
    ) -> Result<i128, ContractError> {
        rewards::accrual(
            self.staked_amount,
            self.stake_time,
            self.unlock_time,
            now,
            config.reward_end_time,
            config.rates(),
            mode,
            self.reward_factor,
        )
        .ok_or(ContractError::InvalidAmount)
    }

    /// Unsettled reward, counting the full locked period up to unlock.
    pub fn claimable_rewards(&self, config: &GlobalConfig, now: u64) -> Result<i128, ContractError> {
        self.accrual(config, now, AccrualMode::Projected)
    }

    pub fn total_rewards(&self, config: &GlobalConfig, now: u64) -> Result<i128, ContractError> {
        self.accumulated_rewards
            .checked_add(self.claimable_rewards(config, now)?)
            .ok_or(ContractError::InvalidAmount)
    }

    pub fn remaining_lock_period(&self, now: u64) -> u64 {
        self.unlock_time.saturating_sub(now)
    }

    /// Fold the reward earned up to `now` into `accumulated_rewards` and make
    /// `now` the new settlement point. Must run before any field that feeds
    /// the calculator changes.
    pub fn settle(&mut self, config: &GlobalConfig, now: u64) -> Result<i128, ContractError> {
        let earned = self.accrual(config, now, AccrualMode::Elapsed)?;
        self.credit_rewards(earned)?;
        self.stake_time = now;
        // An expired lock stays expired; keeps unlock_time >= stake_time.
        if self.unlock_time < now {
            self.unlock_time = now;
        }
        Ok(earned)
    }

    /// Deposit `amount` and/or extend the lock with option `option_index`.
    ///
    /// `amount == 0` is a pure lock extension and needs an active position
    /// and an option other than 0. An active position whose lock has expired
    /// cannot be topped up or extended.
    ///
    /// The lock never shortens. An opening stake earns the chosen option's
    /// factor; afterwards the factor changes only when the option pushes
    /// `unlock_time` later, so a shorter option cannot re-rate a longer lock.
    ///
    /// A deposit whose reward up to `reward_end_time` would not fit in an
    /// `i128` is rejected with `InvalidAmount`, so every accepted position
    /// can still be settled at the end of the program.
    pub fn stake(
        &mut self,
        config: &GlobalConfig,
        now: u64,
        amount: i128,
        option_index: u32,
    ) -> Result<(), ContractError> {
        if amount < 0 {
            return Err(ContractError::InvalidAmount);
        }
        let option = config.lock_option(option_index)?;
        let was_active = self.is_active();

        if amount == 0 && (option_index == 0 || !was_active) {
            return Err(ContractError::InvalidAmount);
        }
        if was_active && now >= self.unlock_time {
            return Err(ContractError::LockExpired);
        }

        let new_staked = self
            .staked_amount
            .checked_add(amount)
            .ok_or(ContractError::InvalidAmount)?;
        if amount > 0 && new_staked > config.max_stake_per_user {
            return Err(ContractError::CapExceeded);
        }

        let mut next = self.clone();
        next.settle(config, now)?;

        let requested_unlock = now.saturating_add(option.duration);
        if !was_active || (option_index > 0 && requested_unlock > next.unlock_time) {
            next.reward_factor = option.reward_factor;
        }
        next.staked_amount = new_staked;
        next.unlock_time = next.unlock_time.max(requested_unlock);
        next.total_rewards(config, config.reward_end_time.max(now))?;

        *self = next;
        Ok(())
    }

    pub fn withdraw(
        &mut self,
        config: &GlobalConfig,
        now: u64,
        amount: i128,
    ) -> Result<(), ContractError> {
        if amount <= 0 || amount > self.staked_amount {
            return Err(ContractError::InvalidAmount);
        }
        if now < self.unlock_time {
            return Err(ContractError::StillLocked);
        }

        self.settle(config, now)?;
        self.staked_amount -= amount;
        Ok(())
    }

    /// Settle, then take the whole accumulated balance.
    pub fn take_rewards(&mut self, config: &GlobalConfig, now: u64) -> Result<i128, ContractError> {
        self.settle(config, now)?;
        if self.accumulated_rewards <= 0 {
            return Err(ContractError::NothingToClaim);
        }
        let amount = self.accumulated_rewards;
        self.accumulated_rewards = 0;
        Ok(amount)
    }

    pub fn credit_rewards(&mut self, amount: i128) -> Result<(), ContractError> {
        self.accumulated_rewards = self
            .accumulated_rewards
            .checked_add(amount)
            .ok_or(ContractError::InvalidAmount)?;
        Ok(())
    }

    /// Zero the settled balance, returning what was there.
    pub fn burn_rewards(&mut self) -> i128 {
        core::mem::take(&mut self.accumulated_rewards)
    }
}

// ── Storage ─────────────────────────────────────────────────────────────────

fn extend_ttl(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn load(env: &Env, user: &Address) -> UserPosition {
    let key = (USER_POSITION, user.clone());
    let position: Option<UserPosition> = env.storage().persistent().get(&key);
    match position {
        Some(p) => {
            extend_ttl(env, &key);
            p
        }
        None => UserPosition::default(),
    }
}

/// Persist `position`, dropping the record once it is empty.
pub fn save(env: &Env, user: &Address, position: &UserPosition) {
    let key = (USER_POSITION, user.clone());
    if position.is_empty() {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, position);
        extend_ttl(env, &key);
    }
}

/// Kept apart from the position so that dropping an empty position never
/// clears it.
pub fn is_migrated(env: &Env, user: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&(USER_MIGRATED, user.clone()))
        .unwrap_or(false)
}

pub fn mark_migrated(env: &Env, user: &Address) {
    let key = (USER_MIGRATED, user.clone());
    env.storage().persistent().set(&key, &true);
    extend_ttl(env, &key);
}
