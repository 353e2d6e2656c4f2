use soroban_sdk::{contractclient, Address, Env};

use crate::{config, events, position, ContractError};

/// Read and burn surface a successor ledger needs from its predecessor.
///
/// `LockStakingContract` exposes the same three functions, so any earlier
/// deployment of this ledger can act as a predecessor once it has granted
/// the successor the rewards-burner right.
#[contractclient(name = "PredecessorLedgerClient")]
pub trait PredecessorLedger {
    /// Settled, unclaimed reward balance of `user`.
    fn accumulated_rewards(env: Env, user: Address) -> i128;

    /// Unsettled reward of `user`; must be zero before migrating.
    fn claimable_rewards(env: Env, user: Address) -> i128;

    /// Zero the settled balance of `user`. Only a granted burner may call.
    fn zero_accumulated_rewards(env: Env, caller: Address, user: Address);
}

/// Move `user`'s settled rewards from the predecessor into this ledger.
///
/// Local state (credit + replay flag) is written before the predecessor is
/// asked to burn, so a failing burn traps and rolls both back.
pub fn migrate_rewards(env: &Env, user: &Address) -> Result<i128, ContractError> {
    let cfg = config::load(env)?;
    let predecessor = cfg
        .predecessor
        .ok_or(ContractError::MigrationUnavailable)?;

    if position::is_migrated(env, user) {
        return Err(ContractError::MigrationUnavailable);
    }

    let client = PredecessorLedgerClient::new(env, &predecessor);
    if client.claimable_rewards(user) != 0 {
        return Err(ContractError::MigrationUnavailable);
    }
    let amount = client.accumulated_rewards(user);
    if amount <= 0 {
        return Err(ContractError::MigrationUnavailable);
    }

    let mut pos = position::load(env, user);
    pos.credit_rewards(amount)?;
    position::save(env, user, &pos);
    position::mark_migrated(env, user);

    client.zero_accumulated_rewards(&env.current_contract_address(), user);

    events::publish_rewards_migrated(env, user.clone(), predecessor, amount);

    Ok(amount)
}

/// Predecessor side of the migration: zero `user`'s settled balance on
/// behalf of an authorized successor.
pub fn burn_rewards(env: &Env, burner: &Address, user: &Address) -> Result<i128, ContractError> {
    if !common::access::is_rewards_burner(env, burner) {
        return Err(ContractError::Unauthorized);
    }

    let mut pos = position::load(env, user);
    let amount = pos.burn_rewards();
    position::save(env, user, &pos);

    events::publish_rewards_burned(env, user.clone(), burner.clone(), amount);

    Ok(amount)
}
