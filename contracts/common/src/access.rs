use soroban_sdk::{contracttype, Address, Env};

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Storage Keys ─────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug)]
enum AccessKey {
    /// Primary super admin set at initialization.
    SuperAdmin,
    /// Tier held by an address.
    Tier(Address),
    /// Ledger allowed to zero reward balances held by this contract.
    RewardsBurner(Address),
}

// ── Admin Tier Enum ──────────────────────────────────────────────────────────

/// Two-tier admin hierarchy.
///
/// - `ConfigAdmin` – May tune the reward program: lock options, rate
///                   factors, end time, stake cap and token settings.
/// - `SuperAdmin`  – Everything a `ConfigAdmin` can do, plus promoting and
///                   demoting admins and granting rewards-burner rights.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AdminTier {
    ConfigAdmin = 1,
    SuperAdmin = 2,
}

impl AdminTier {
    /// Returns true if this tier is at least as high as `min_tier`.
    pub fn has_at_least(&self, min_tier: &AdminTier) -> bool {
        (*self as u32) >= (*min_tier as u32)
    }
}

fn extend_ttl(env: &Env, key: &AccessKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Tiers ────────────────────────────────────────────────────────────────────

/// Assigns an admin tier to the given address.
/// Callers must verify authorization beforehand.
pub fn set_admin_tier(env: &Env, admin: &Address, tier: AdminTier) {
    let key = AccessKey::Tier(admin.clone());
    env.storage().persistent().set(&key, &tier);
    extend_ttl(env, &key);
}

/// Retrieves the admin tier of a given address, if any.
pub fn get_admin_tier(env: &Env, admin: &Address) -> Option<AdminTier> {
    let key = AccessKey::Tier(admin.clone());
    let tier: Option<AdminTier> = env.storage().persistent().get(&key);
    if tier.is_some() {
        extend_ttl(env, &key);
    }
    tier
}

/// Returns `true` if `caller` holds at least `min_tier`.
pub fn require_tier(env: &Env, caller: &Address, min_tier: &AdminTier) -> bool {
    get_admin_tier(env, caller).is_some_and(|tier| tier.has_at_least(min_tier))
}

/// Records the bootstrap admin and gives it the `SuperAdmin` tier.
pub fn set_super_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&AccessKey::SuperAdmin, admin);
    set_admin_tier(env, admin, AdminTier::SuperAdmin);
}

/// Returns the bootstrap super admin, if set.
pub fn get_super_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&AccessKey::SuperAdmin)
}

/// Promotes or assigns `target` to `tier`.
///
/// Returns `false` without writing if `caller` is not a `SuperAdmin`.
/// The caller must already have passed `require_auth()`.
pub fn promote_admin(env: &Env, caller: &Address, target: &Address, tier: AdminTier) -> bool {
    if !require_tier(env, caller, &AdminTier::SuperAdmin) {
        return false;
    }
    set_admin_tier(env, target, tier);
    true
}

/// Removes the tier of `target`.
///
/// The bootstrap super admin cannot be demoted, so the contract always keeps
/// one address able to manage tiers.
pub fn demote_admin(env: &Env, caller: &Address, target: &Address) -> bool {
    if !require_tier(env, caller, &AdminTier::SuperAdmin) {
        return false;
    }
    if get_super_admin(env).as_ref() == Some(target) {
        return false;
    }
    env.storage()
        .persistent()
        .remove(&AccessKey::Tier(target.clone()));
    true
}

// ── Rewards burner ───────────────────────────────────────────────────────────

/// Allows `burner` (a successor ledger) to zero reward balances.
pub fn grant_rewards_burner(env: &Env, caller: &Address, burner: &Address) -> bool {
    if !require_tier(env, caller, &AdminTier::SuperAdmin) {
        return false;
    }
    let key = AccessKey::RewardsBurner(burner.clone());
    env.storage().persistent().set(&key, &true);
    extend_ttl(env, &key);
    true
}

pub fn revoke_rewards_burner(env: &Env, caller: &Address, burner: &Address) -> bool {
    if !require_tier(env, caller, &AdminTier::SuperAdmin) {
        return false;
    }
    env.storage()
        .persistent()
        .remove(&AccessKey::RewardsBurner(burner.clone()));
    true
}

pub fn is_rewards_burner(env: &Env, address: &Address) -> bool {
    let key = AccessKey::RewardsBurner(address.clone());
    let granted = env.storage().persistent().get(&key).unwrap_or(false);
    if granted {
        extend_ttl(env, &key);
    }
    granted
}
