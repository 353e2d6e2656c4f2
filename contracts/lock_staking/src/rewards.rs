/// Fixed-point denominator for every rate multiplier.
///
/// A lock option's `reward_factor` of `RATE_SCALE` pays exactly one reward
/// unit per staked unit per second; `RATE_SCALE / 2` pays half of that.
pub const RATE_SCALE: i128 = 1_000_000;

/// Program-wide rate settings the calculator needs from the config.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RewardRates {
    /// When `false` the lock schedule is ignored and the whole span accrues
    /// at the unlocked rate.
    pub locked_rewards_enabled: bool,
    /// Fraction of the full rate paid after unlock, `0..=RATE_SCALE`.
    pub unlocked_rewards_factor: i128,
}

/// How far the locked segment may reach.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccrualMode {
    /// Count the whole locked period up to `unlock_time`, including the part
    /// that has not elapsed yet. Used by the read-only views.
    Projected,
    /// Count only time that has actually elapsed. Used when settling before
    /// a position is mutated.
    Elapsed,
}

/// Reward earned by one position.
///
/// The span from `stake_time` is split into two clamped segments measured
/// against the horizon `E = min(now, end_time)`:
///
/// ```text
/// L        = stake_time                        if locked rewards are off
///          = min(unlock_time, now, end_time)   in Elapsed mode
///          = min(unlock_time, end_time)        in Projected mode
/// locked   = staked × (L − stake_time) × reward_factor / RATE_SCALE
/// unlocked = staked × (E − L) × unlocked_factor / RATE_SCALE
///                             × reward_factor / RATE_SCALE     (only if L < E)
/// ```
///
/// Every division floors. Returns `Some(0)` when nothing is staked, when
/// `now` is not after `stake_time`, when `unlock_time < stake_time`, or when
/// the program ended at or before `stake_time`. The result does not depend
/// on the order of the four timestamps beyond these clamps.
///
/// Only `staked × span` is formed whole; rate multiplications are split so
/// they cannot overflow before the result does. Returns `None` when either
/// of those does not fit in an `i128`.
#[allow(clippy::arithmetic_side_effects, clippy::too_many_arguments)]
pub fn accrual(
    staked_amount: i128,
    stake_time: u64,
    unlock_time: u64,
    now: u64,
    end_time: u64,
    rates: RewardRates,
    mode: AccrualMode,
    reward_factor: i128,
) -> Option<i128> {
    if staked_amount <= 0
        || now <= stake_time
        || unlock_time < stake_time
        || end_time <= stake_time
    {
        return Some(0);
    }

    let horizon = now.min(end_time);
    let locked_end = if !rates.locked_rewards_enabled {
        stake_time
    } else {
        match mode {
            AccrualMode::Projected => unlock_time.min(end_time),
            AccrualMode::Elapsed => unlock_time.min(now).min(end_time),
        }
    };

    // locked_end >= stake_time: unlock_time, now and end_time all are.
    let locked_weight = staked_amount.checked_mul(i128::from(locked_end - stake_time))?;
    let locked = scale(locked_weight, reward_factor)?;

    let unlocked = if locked_end < horizon {
        let weight = staked_amount.checked_mul(i128::from(horizon - locked_end))?;
        scale(scale(weight, rates.unlocked_rewards_factor)?, reward_factor)?
    } else {
        0
    };

    locked.checked_add(unlocked)
}

/// `value × factor / RATE_SCALE`, floored, for non-negative operands.
///
/// Splits `value` on `RATE_SCALE` so the product is never formed whole:
/// `(q × S + r) × f / S = q × f + r × f / S` with `r < S`.
#[allow(clippy::arithmetic_side_effects)]
fn scale(value: i128, factor: i128) -> Option<i128> {
    let whole = (value / RATE_SCALE).checked_mul(factor)?;
    let part = (value % RATE_SCALE).checked_mul(factor)? / RATE_SCALE;
    whole.checked_add(part)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure-math tests with no Soroban environment dependency.
