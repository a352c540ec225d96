//! # Storage
//!
//! Typed helpers over the contract's instance storage. The ledger is a
//! singleton, so everything lives in the instance tier:
//!
//! | Key           | Type      | Description                                |
//! |---------------|-----------|--------------------------------------------|
//! | `Owner`       | `Address` | Settlement recipient, written once at init |
//! | `Token`       | `Address` | Funding-asset contract, written once       |
//! | `TotalAmount` | `i128`    | Accumulated donations since last settlement|
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day
//! remaining, on every read and write.

use soroban_sdk::{contracttype, panic_with_error, Address, Env};

use crate::Error;

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// All contract storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Recipient of threshold settlements (Instance).
    Owner,
    /// Funding-asset token contract (Instance).
    Token,
    /// Accumulated balance since the last settlement (Instance).
    TotalAmount,
}

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// `true` once `init` has written the configuration.
pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

/// Write the immutable configuration and zero the running total.
/// Called exactly once, from `init`.
pub fn save_config(env: &Env, owner: &Address, token: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
    env.storage().instance().set(&DataKey::Token, token);
    env.storage().instance().set(&DataKey::TotalAmount, &0i128);
    bump_instance(env);
}

/// Settlement recipient. Fails with `NotInitialized` before `init`.
pub fn get_owner(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

/// Funding-asset contract. Fails with `NotInitialized` before `init`.
pub fn get_token(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

/// Accumulated donations since the last settlement.
pub fn get_total_amount(env: &Env) -> i128 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::TotalAmount)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

/// Overwrite the running total (post-deposit or settlement reset).
pub fn set_total_amount(env: &Env, total: i128) {
    env.storage().instance().set(&DataKey::TotalAmount, &total);
    bump_instance(env);
}
