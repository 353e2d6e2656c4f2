#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lock_staking::{LockStakingContract, LockStakingContractClient, RATE_SCALE};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    vec, Address, Env,
};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { amount: u32, option: u8 },
    TopUp { amount: u32 },
    ExtendLock { option: u8 },
    Withdraw { amount: u32 },
    WithdrawAll,
    Claim,
    Wait { seconds: u32 },
    SetUnlockedFactor { factor: u32 },
    SetLockedRewards { enabled: bool },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_700_000_000);

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(LockStakingContract, ());
    let client = LockStakingContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &stake_token);
    client.set_lock_options(
        &admin,
        &vec![&env, 0u64, 3_600, 86_400],
        &vec![&env, RATE_SCALE, RATE_SCALE, 2 * RATE_SCALE],
    );
    client.set_max_stake_per_user(&admin, &i128::from(u32::MAX));
    client.set_reward_token(&admin, &Some(reward_token.clone()));
    client.set_stake_reward_factor(&admin, &1);
    StellarAssetClient::new(&env, &reward_token).mint(&contract_id, &i128::MAX);

    let mut users = std::vec![admin.clone()];
    for _ in 0..3 {
        users.push(Address::generate(&env));
    }
    let sac = StellarAssetClient::new(&env, &stake_token);
    for user in users.iter() {
        sac.mint(user, &i128::from(u32::MAX));
    }

    // Settled rewards may only go down through a claim.
    let mut last = std::vec![0i128; users.len()];

    for (i, action) in actions.into_iter().enumerate() {
        let idx = i % last.len();
        let caller = &users[idx];
        let mut claimed = false;
        match action {
            FuzzAction::Stake { amount, option } => {
                let _ = client.try_stake(caller, &i128::from(amount), &u32::from(option % 4));
            }
            FuzzAction::TopUp { amount } => {
                let _ = client.try_top_up(caller, &i128::from(amount));
            }
            FuzzAction::ExtendLock { option } => {
                let _ = client.try_extend_lock(caller, &u32::from(option % 4));
            }
            FuzzAction::Withdraw { amount } => {
                let _ = client.try_withdraw(caller, &i128::from(amount));
            }
            FuzzAction::WithdrawAll => {
                let _ = client.try_withdraw_all(caller);
            }
            FuzzAction::Claim => {
                claimed = client.try_claim(caller).is_ok();
            }
            FuzzAction::Wait { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now.saturating_add(u64::from(seconds)));
            }
            FuzzAction::SetUnlockedFactor { factor } => {
                let _ = client.try_set_unlocked_rewards_factor(&admin, &i128::from(factor));
            }
            FuzzAction::SetLockedRewards { enabled } => {
                let _ = client.try_set_locked_rewards_enabled(&admin, &enabled);
            }
        }

        let acc = client.accumulated_rewards(caller);
        if claimed {
            assert_eq!(acc, 0);
        } else {
            assert!(acc >= last[idx], "accumulated rewards decreased without a claim");
        }
        last[idx] = acc;
    }
});
