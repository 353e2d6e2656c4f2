extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    vec, Address, Env,
};

use crate::{ContractError, LockStakingContract, LockStakingContractClient, RATE_SCALE};

const DAY: u64 = 86_400;
const T0: u64 = 1_700_000_000;
const LOCKED_REWARD: i128 = 1_000 * 7 * DAY as i128;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Deploy an initialized ledger with a 7-day lock option and staking open.
fn deploy(env: &Env, admin: &Address, stake_token: &Address) -> LockStakingContractClient<'static> {
    let client = LockStakingContractClient::new(env, &env.register(LockStakingContract, ()));
    client.initialize(admin, stake_token);
    client.set_lock_options(
        admin,
        &vec![env, 0u64, 7 * DAY],
        &vec![env, RATE_SCALE, RATE_SCALE],
    );
    client.set_locked_rewards_enabled(admin, &true);
    client.set_unlocked_rewards_factor(admin, &0);
    client.set_max_stake_per_user(admin, &1_000_000);
    client
}

/// Two ledgers over one stake token. `user` has earned `LOCKED_REWARD` in
/// `v1` and fully withdrawn; `v2` names `v1` as predecessor.
fn setup() -> (
    Env,
    LockStakingContractClient<'static>, // v1
    LockStakingContractClient<'static>, // v2
    Address,                            // admin
    Address,                            // user
) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(T0);

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let admin = Address::generate(&env);
    let v1 = deploy(&env, &admin, &stake_token);
    let v2 = deploy(&env, &admin, &stake_token);

    let user = Address::generate(&env);
    StellarAssetClient::new(&env, &stake_token).mint(&user, &1_000);
    v1.stake(&user, &1_000, &1);
    env.ledger().set_timestamp(T0 + 8 * DAY);
    v1.withdraw_all(&user);

    v2.set_predecessor(&admin, &v1.address);

    (env, v1, v2, admin, user)
}

// ── Migration ─────────────────────────────────────────────────────────────────

#[test]
fn test_migrate_moves_settled_balance_once() {
    let (_env, v1, v2, admin, user) = setup();
    v1.grant_rewards_burner(&admin, &v2.address);

    assert_eq!(v1.accumulated_rewards(&user), LOCKED_REWARD);
    assert!(!v2.is_rewards_migrated(&user));

    assert_eq!(v2.migrate_rewards(&user), LOCKED_REWARD);

    assert_eq!(v2.accumulated_rewards(&user), LOCKED_REWARD);
    assert_eq!(v1.accumulated_rewards(&user), 0);
    assert_eq!(v1.get_position(&user), crate::UserPosition::default());
    assert!(v2.is_rewards_migrated(&user));

    match v2.try_migrate_rewards(&user) {
        Err(Ok(e)) => assert_eq!(e, ContractError::MigrationUnavailable),
        _ => unreachable!("Expected MigrationUnavailable error"),
    }
    assert_eq!(v2.accumulated_rewards(&user), LOCKED_REWARD);
}

#[test]
fn test_migrated_flag_survives_claim() {
    let (env, v1, v2, admin, user) = setup();
    v1.grant_rewards_burner(&admin, &v2.address);
    v2.migrate_rewards(&user);

    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    v2.set_reward_token(&admin, &Some(reward_token.clone()));
    StellarAssetClient::new(&env, &reward_token).mint(&v2.address, &100);

    assert_eq!(v2.claim(&user), 7);
    assert_eq!(TokenClient::new(&env, &reward_token).balance(&user), 7);
    // The position is gone but the replay guard is not.
    assert_eq!(v2.get_position(&user), crate::UserPosition::default());
    assert!(v2.is_rewards_migrated(&user));
    match v2.try_migrate_rewards(&user) {
        Err(Ok(e)) => assert_eq!(e, ContractError::MigrationUnavailable),
        _ => unreachable!("Expected MigrationUnavailable error"),
    }
}

#[test]
fn test_migrate_without_burner_grant_rolls_back() {
    let (_env, v1, v2, _admin, user) = setup();

    assert!(v2.try_migrate_rewards(&user).is_err());

    assert_eq!(v2.accumulated_rewards(&user), 0);
    assert!(!v2.is_rewards_migrated(&user));
    assert_eq!(v1.accumulated_rewards(&user), LOCKED_REWARD);
}

#[test]
fn test_migrate_without_predecessor_fails() {
    let (env, v1, _v2, admin, user) = setup();
    let stake_token = v1.get_stake_token();
    let v3 = deploy(&env, &admin, &stake_token);

    match v3.try_migrate_rewards(&user) {
        Err(Ok(e)) => assert_eq!(e, ContractError::MigrationUnavailable),
        _ => unreachable!("Expected MigrationUnavailable error"),
    }
}

#[test]
fn test_migrate_with_unsettled_predecessor_rewards_fails() {
    let (env, v1, v2, admin, _) = setup();
    v1.grant_rewards_burner(&admin, &v2.address);

    let staker = Address::generate(&env);
    StellarAssetClient::new(&env, &v1.get_stake_token()).mint(&staker, &500);
    v1.stake(&staker, &500, &1);
    env.ledger().set_timestamp(T0 + 9 * DAY);
    assert!(v1.claimable_rewards(&staker) > 0);

    match v2.try_migrate_rewards(&staker) {
        Err(Ok(e)) => assert_eq!(e, ContractError::MigrationUnavailable),
        _ => unreachable!("Expected MigrationUnavailable error"),
    }
}

#[test]
fn test_migrate_with_empty_predecessor_balance_fails() {
    let (env, v1, v2, admin, _) = setup();
    v1.grant_rewards_burner(&admin, &v2.address);
    let newcomer = Address::generate(&env);

    match v2.try_migrate_rewards(&newcomer) {
        Err(Ok(e)) => assert_eq!(e, ContractError::MigrationUnavailable),
        _ => unreachable!("Expected MigrationUnavailable error"),
    }
    // A rejected attempt does not consume the guard.
    assert!(!v2.is_rewards_migrated(&newcomer));
}

#[test]
fn test_revoked_burner_cannot_zero_balances() {
    let (_env, v1, v2, admin, user) = setup();
    v1.grant_rewards_burner(&admin, &v2.address);
    v1.revoke_rewards_burner(&admin, &v2.address);

    match v1.try_zero_accumulated_rewards(&v2.address, &user) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(v1.accumulated_rewards(&user), LOCKED_REWARD);
}
