#![no_std]

pub mod config;
pub mod events;
pub mod migration;
pub mod position;
pub mod rewards;

use common::access::{self, AdminTier};
use soroban_sdk::{contract, contractimpl, symbol_short, token, Address, Env, Symbol, Vec};

pub use config::{GlobalConfig, LockOption};
pub use migration::{PredecessorLedger, PredecessorLedgerClient};
pub use position::UserPosition;
pub use rewards::RATE_SCALE;

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const STAKE_TOKEN: Symbol = symbol_short!("STK_TOK");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const TOTAL_STAKED: Symbol = symbol_short!("TOT_STK");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    CapExceeded = 5,
    StillLocked = 6,
    LockExpired = 7,
    NothingToClaim = 8,
    MigrationUnavailable = 9,
    InvalidLockOption = 10,
    InvalidConfig = 11,
    TokensIdentical = 12,
    RewardTokenNotSet = 13,
    PredecessorAlreadySet = 14,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct LockStakingContract;

#[contractimpl]
impl LockStakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the ledger with the default reward program.
    ///
    /// Staking stays disabled (`max_stake_per_user == 0`) and no reward token
    /// is set until an admin configures them. `admin` becomes `SuperAdmin`.
    pub fn initialize(env: Env, admin: Address, stake_token: Address) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        let cfg = GlobalConfig::new(&env, env.ledger().timestamp());
        config::save(&env, &cfg);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&STAKE_TOKEN, &stake_token);

        access::set_super_admin(&env, &admin);

        events::publish_initialized(&env, admin, stake_token, cfg.reward_end_time);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens under lock option `lock_option`.
    ///
    /// Index 0 keeps the current lock and rate; any other index extends the
    /// lock to at least `now + duration` and switches to that option's rate.
    /// Rewards earned so far are settled before anything changes.
    pub fn stake(
        env: Env,
        user: Address,
        amount: i128,
        lock_option: u32,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        let now = env.ledger().timestamp();
        let cfg = config::load(&env)?;

        let mut pos = position::load(&env, &user);
        pos.stake(&cfg, now, amount, lock_option)?;
        position::save(&env, &user, &pos);
        config::extend_instance_ttl(&env);

        if amount > 0 {
            Self::add_total_staked(&env, amount);
            token::Client::new(&env, &Self::stake_token(&env)?).transfer(
                &user,
                &env.current_contract_address(),
                &amount,
            );
        }

        events::publish_staked(
            &env,
            user,
            amount,
            lock_option,
            pos.staked_amount,
            pos.unlock_time,
            pos.accumulated_rewards,
        );

        Ok(())
    }

    /// Add to an active stake without touching its lock.
    pub fn top_up(env: Env, user: Address, amount: i128) -> Result<(), ContractError> {
        Self::stake(env, user, amount, 0)
    }

    /// Extend the lock of an active stake without depositing.
    pub fn extend_lock(env: Env, user: Address, lock_option: u32) -> Result<(), ContractError> {
        Self::stake(env, user, 0, lock_option)
    }

    /// Withdraw `amount` stake tokens once the lock has expired.
    pub fn withdraw(env: Env, user: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        let now = env.ledger().timestamp();
        let cfg = config::load(&env)?;

        let mut pos = position::load(&env, &user);
        pos.withdraw(&cfg, now, amount)?;
        position::save(&env, &user, &pos);
        Self::add_total_staked(&env, -amount);
        config::extend_instance_ttl(&env);

        token::Client::new(&env, &Self::stake_token(&env)?).transfer(
            &env.current_contract_address(),
            &user,
            &amount,
        );

        events::publish_withdrawn(
            &env,
            user,
            amount,
            pos.staked_amount,
            pos.accumulated_rewards,
        );

        Ok(())
    }

    /// Withdraw the whole stake. Returns the amount withdrawn.
    pub fn withdraw_all(env: Env, user: Address) -> Result<i128, ContractError> {
        let staked = position::load(&env, &user).staked_amount;
        Self::withdraw(env, user, staked)?;
        Ok(staked)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Settle and pay out the accumulated reward balance as reward tokens.
    ///
    /// Pays `accumulated / stake_reward_factor` tokens; the remainder below
    /// one token is forfeited along with the balance. Returns the number of
    /// reward tokens transferred.
    pub fn claim(env: Env, user: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        let now = env.ledger().timestamp();
        let cfg = config::load(&env)?;

        let mut pos = position::load(&env, &user);
        let rewards = pos.take_rewards(&cfg, now)?;
        let reward_token: Address = env
            .storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::RewardTokenNotSet)?;

        // Mark as claimed before transfer (checks-effects-interactions).
        position::save(&env, &user, &pos);
        config::extend_instance_ttl(&env);

        let reward_tokens = rewards / cfg.stake_reward_factor;
        if reward_tokens > 0 {
            token::Client::new(&env, &reward_token).transfer(
                &env.current_contract_address(),
                &user,
                &reward_tokens,
            );
        }

        events::publish_claimed(&env, user, rewards, reward_tokens);

        Ok(reward_tokens)
    }

    /// Pull the user's settled balance from the predecessor ledger, once.
    pub fn migrate_rewards(env: Env, user: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        let amount = migration::migrate_rewards(&env, &user)?;
        config::extend_instance_ttl(&env);
        Ok(amount)
    }

    /// Called by a successor ledger holding the rewards-burner grant.
    pub fn zero_accumulated_rewards(
        env: Env,
        caller: Address,
        user: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        migration::burn_rewards(&env, &caller, &user)?;
        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Unsettled reward, counting the whole locked period up to unlock even
    /// where it has not elapsed yet.
    pub fn claimable_rewards(env: Env, user: Address) -> Result<i128, ContractError> {
        let cfg = config::load(&env)?;
        let now = env.ledger().timestamp();
        position::load(&env, &user).claimable_rewards(&cfg, now)
    }

    /// Settled, unclaimed reward balance.
    pub fn accumulated_rewards(env: Env, user: Address) -> i128 {
        position::load(&env, &user).accumulated_rewards
    }

    pub fn total_rewards(env: Env, user: Address) -> Result<i128, ContractError> {
        let cfg = config::load(&env)?;
        let now = env.ledger().timestamp();
        position::load(&env, &user).total_rewards(&cfg, now)
    }

    /// Reward tokens `total_rewards` would convert into at the current factor.
    pub fn earned_reward_tokens(env: Env, user: Address) -> Result<i128, ContractError> {
        let cfg = config::load(&env)?;
        let now = env.ledger().timestamp();
        Ok(position::load(&env, &user).total_rewards(&cfg, now)? / cfg.stake_reward_factor)
    }

    pub fn get_position(env: Env, user: Address) -> UserPosition {
        position::load(&env, &user)
    }

    pub fn get_staked(env: Env, user: Address) -> i128 {
        position::load(&env, &user).staked_amount
    }

    pub fn get_unlock_time(env: Env, user: Address) -> u64 {
        position::load(&env, &user).unlock_time
    }

    /// Seconds until the user's lock expires, 0 once it has.
    pub fn remaining_lock_period(env: Env, user: Address) -> u64 {
        position::load(&env, &user).remaining_lock_period(env.ledger().timestamp())
    }

    /// Return the sum of all currently staked tokens.
    pub fn get_total_staked(env: Env) -> i128 {
        env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0)
    }

    /// Reward tokens held by the ledger, 0 when no reward token is set.
    pub fn get_reward_token_balance(env: Env) -> i128 {
        let reward_token: Option<Address> = env.storage().instance().get(&REWARD_TOKEN);
        match reward_token {
            Some(t) => token::Client::new(&env, &t).balance(&env.current_contract_address()),
            None => 0,
        }
    }

    pub fn is_rewards_migrated(env: Env, user: Address) -> bool {
        position::is_migrated(&env, &user)
    }

    pub fn is_rewards_burner(env: Env, address: Address) -> bool {
        access::is_rewards_burner(&env, &address)
    }

    pub fn get_config(env: Env) -> Result<GlobalConfig, ContractError> {
        config::load(&env)
    }

    pub fn get_lock_options(env: Env) -> Result<Vec<LockOption>, ContractError> {
        Ok(config::load(&env)?.lock_options)
    }

    /// Lock durations in seconds, indexed by option.
    pub fn get_lock_durations(env: Env) -> Result<Vec<u64>, ContractError> {
        Ok(config::load(&env)?.durations(&env))
    }

    /// Reward factors, indexed by option, in the shape `set_lock_options` takes.
    pub fn get_lock_reward_factors(env: Env) -> Result<Vec<i128>, ContractError> {
        Ok(config::load(&env)?.reward_factors(&env))
    }

    pub fn get_stake_token(env: Env) -> Result<Address, ContractError> {
        Self::stake_token(&env)
    }

    pub fn get_reward_token(env: Env) -> Option<Address> {
        env.storage().instance().get(&REWARD_TOKEN)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    // ── Admin functions ──────────────────────────────────────────────────────
    //
    // Parameter changes apply to unsettled time of every position, not only
    // to future stakes. All setters require at least `ConfigAdmin`.

    /// Replace the lock options. An empty `reward_factors` gives every
    /// option the base rate.
    pub fn set_lock_options(
        env: Env,
        caller: Address,
        durations: Vec<u64>,
        reward_factors: Vec<i128>,
    ) -> Result<(), ContractError> {
        Self::update_config(&env, &caller, symbol_short!("LOCK_OPTS"), |cfg, _| {
            cfg.set_lock_options(&env, durations, reward_factors)
        })
    }

    pub fn set_locked_rewards_enabled(
        env: Env,
        caller: Address,
        enabled: bool,
    ) -> Result<(), ContractError> {
        Self::update_config(&env, &caller, symbol_short!("LOCKED_ON"), |cfg, _| {
            cfg.locked_rewards_enabled = enabled;
            Ok(())
        })
    }

    /// `factor` is a numerator over `RATE_SCALE`, at most `RATE_SCALE`.
    pub fn set_unlocked_rewards_factor(
        env: Env,
        caller: Address,
        factor: i128,
    ) -> Result<(), ContractError> {
        Self::update_config(&env, &caller, symbol_short!("UNLK_FCTR"), |cfg, _| {
            cfg.set_unlocked_rewards_factor(factor)
        })
    }

    pub fn set_reward_end_time(
        env: Env,
        caller: Address,
        end_time: u64,
    ) -> Result<(), ContractError> {
        Self::update_config(&env, &caller, symbol_short!("END_TIME"), |cfg, now| {
            cfg.set_reward_end_time(end_time, now)
        })
    }

    pub fn set_stake_reward_factor(
        env: Env,
        caller: Address,
        factor: i128,
    ) -> Result<(), ContractError> {
        Self::update_config(&env, &caller, symbol_short!("STK_FCTR"), |cfg, _| {
            cfg.set_stake_reward_factor(factor)
        })
    }

    /// `0` disables new deposits.
    pub fn set_max_stake_per_user(
        env: Env,
        caller: Address,
        max: i128,
    ) -> Result<(), ContractError> {
        Self::update_config(&env, &caller, symbol_short!("MAX_STAKE"), |cfg, _| {
            cfg.set_max_stake_per_user(max)
        })
    }

    /// Link the ledger this one migrates rewards from. Can only be set once.
    pub fn set_predecessor(
        env: Env,
        caller: Address,
        predecessor: Address,
    ) -> Result<(), ContractError> {
        let this_contract = env.current_contract_address();
        Self::update_config(&env, &caller, symbol_short!("PREDECSR"), |cfg, _| {
            cfg.set_predecessor(predecessor, &this_contract)
        })
    }

    /// Replace or clear the reward token.
    ///
    /// Whatever the ledger holds of the previous reward token is sent to
    /// `caller`.
    pub fn set_reward_token(
        env: Env,
        caller: Address,
        reward_token: Option<Address>,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin_tier(&env, &caller, &AdminTier::ConfigAdmin)?;

        if reward_token.as_ref() == Some(&Self::stake_token(&env)?) {
            return Err(ContractError::TokensIdentical);
        }

        let previous: Option<Address> = env.storage().instance().get(&REWARD_TOKEN);
        match &reward_token {
            Some(t) => env.storage().instance().set(&REWARD_TOKEN, t),
            None => env.storage().instance().remove(&REWARD_TOKEN),
        }
        config::extend_instance_ttl(&env);

        let mut returned_balance = 0;
        if let Some(old) = previous.filter(|old| Some(old) != reward_token.as_ref()) {
            returned_balance = Self::sweep(&env, &old, &caller);
        }

        events::publish_reward_token_set(&env, caller, reward_token, returned_balance);

        Ok(())
    }

    /// Send the ledger's whole balance of `token` to `caller`. The stake
    /// token can never be recovered. Returns the amount sent.
    pub fn recover_tokens(env: Env, caller: Address, token: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin_tier(&env, &caller, &AdminTier::ConfigAdmin)?;

        if token == Self::stake_token(&env)? {
            return Err(ContractError::TokensIdentical);
        }

        let amount = Self::sweep(&env, &token, &caller);

        events::publish_tokens_recovered(&env, caller, token, amount);

        Ok(amount)
    }

    // ── Admin tier management ────────────────────────────────────────────────

    /// Promotes or assigns a target address to the specified admin tier.
    ///
    /// Only a `SuperAdmin` may call this.
    pub fn promote_admin(
        env: Env,
        caller: Address,
        target: Address,
        tier: AdminTier,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !access::promote_admin(&env, &caller, &target, tier) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Removes the admin tier from the target address entirely.
    ///
    /// Only a `SuperAdmin` may call this.
    pub fn demote_admin(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !access::demote_admin(&env, &caller, &target) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Returns the admin tier of the given address, if any.
    pub fn get_admin_tier(env: Env, admin: Address) -> Option<AdminTier> {
        access::get_admin_tier(&env, &admin)
    }

    /// Allow a successor ledger to zero reward balances held here.
    pub fn grant_rewards_burner(
        env: Env,
        caller: Address,
        burner: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !access::grant_rewards_burner(&env, &caller, &burner) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    pub fn revoke_rewards_burner(
        env: Env,
        caller: Address,
        burner: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !access::revoke_rewards_burner(&env, &caller, &burner) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: revert if `caller` does not hold at least `min_tier`.
    fn require_admin_tier(
        env: &Env,
        caller: &Address,
        min_tier: &AdminTier,
    ) -> Result<(), ContractError> {
        if !access::require_tier(env, caller, min_tier) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Shared path of the config setters: auth, tier check, apply `update`
    /// to the loaded config, persist and announce which field changed.
    fn update_config<F>(
        env: &Env,
        caller: &Address,
        field: Symbol,
        update: F,
    ) -> Result<(), ContractError>
    where
        F: FnOnce(&mut GlobalConfig, u64) -> Result<(), ContractError>,
    {
        Self::require_initialized(env)?;
        caller.require_auth();
        Self::require_admin_tier(env, caller, &AdminTier::ConfigAdmin)?;

        let mut cfg = config::load(env)?;
        update(&mut cfg, env.ledger().timestamp())?;
        config::save(env, &cfg);

        events::publish_config_changed(env, caller.clone(), field);

        Ok(())
    }

    fn stake_token(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&STAKE_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    fn add_total_staked(env: &Env, delta: i128) {
        let prev: i128 = env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0);
        env.storage()
            .instance()
            .set(&TOTAL_STAKED, &prev.saturating_add(delta));
    }

    /// Transfer the ledger's whole balance of `token` to `to`.
    fn sweep(env: &Env, token: &Address, to: &Address) -> i128 {
        let client = token::Client::new(env, token);
        let this_contract = env.current_contract_address();
        let balance = client.balance(&this_contract);
        if balance > 0 {
            client.transfer(&this_contract, to, &balance);
        }
        balance
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────



#[cfg(test)]
mod test_migration;
