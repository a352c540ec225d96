//! # Charity Fund Contract
//!
//! A single-owner donation ledger. Donors deposit a fixed funding asset;
//! once the accumulated total reaches [`THRESHOLD`], the contract sweeps its
//! entire held balance to the owner in the same call and starts accumulating
//! again from zero.
//!
//! | Phase     | Entry Point(s)                                        |
//! |-----------|-------------------------------------------------------|
//! | Bootstrap | [`CharityFund::init`]                                 |
//! | Funding   | [`CharityFund::deposit`]                              |
//! | Queries   | `get_contract_balance`, `owner`, `threshold`, `total_amount` |
//!
//! ## Architecture
//!
//! Storage access is fully delegated to [`storage`]; event payloads and
//! publishing live in [`events`]. This file contains only the public entry
//! points and the settlement rule.
//!
//! The contract has exactly two logical states: *accumulating*
//! (`total_amount < threshold`) and the instantaneous settlement transition
//! back to accumulating. There is no terminal state.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, panic_with_error, token, Address, Env};

mod events;
mod storage;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use events::{FundDeposited, FundsTransferred};

/// Settlement threshold: 0.05 units of the 7-decimal funding asset.
pub const THRESHOLD: i128 = 500_000;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized     = 2,
    InvalidAmount      = 3,
}

#[contract]
pub struct CharityFund;

#[contractimpl]
impl CharityFund {
    /// Initialise the contract: set the settlement recipient and the funding
    /// asset.
    ///
    /// Must be called exactly once immediately after deployment. Subsequent
    /// calls fail with `Error::AlreadyInitialized`. Both addresses are
    /// immutable afterwards.
    ///
    /// - `owner` receives every threshold settlement and must sign the call.
    /// - `token` is the funding-asset contract donations are denominated in.
    pub fn init(env: Env, owner: Address, token: Address) {
        owner.require_auth();
        if storage::is_initialized(&env) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        storage::save_config(&env, &owner, &token);
    }

    /// Donate `amount` of the funding asset.
    ///
    /// Moves `amount` from `donor` to the contract, adds it to the running
    /// total, and emits [`FundDeposited`]. If the total has reached
    /// [`THRESHOLD`], the contract's entire held balance is transferred to
    /// the owner, the total resets to zero, and [`FundsTransferred`] is
    /// emitted, all within the same transaction; the settlement either fully
    /// applies or not at all.
    ///
    /// Non-positive amounts fail with `Error::InvalidAmount`. Any account
    /// may deposit; there is no allow-list.
    pub fn deposit(env: Env, donor: Address, amount: i128) {
        donor.require_auth();

        if amount <= 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }

        let owner = storage::get_owner(&env);
        let funding_token = storage::get_token(&env);
        let token_client = token::Client::new(&env, &funding_token);

        token_client.transfer(&donor, &env.current_contract_address(), &amount);

        let total = storage::get_total_amount(&env) + amount;
        storage::set_total_amount(&env, total);

        events::fund_deposited(&env, &donor, amount);

        if total >= THRESHOLD {
            // Sweep the full held balance, not just the bookkept total:
            // funds sent to the contract address outside `deposit` ride
            // along with the next settlement.
            let held = token_client.balance(&env.current_contract_address());
            token_client.transfer(&env.current_contract_address(), &owner, &held);
            storage::set_total_amount(&env, 0);
            events::funds_transferred(&env, &owner, held);
        }
    }

    /// Funding-asset balance actually held by the contract.
    ///
    /// Equals `total_amount` unless someone transferred tokens to the
    /// contract address directly; the difference is swept at the next
    /// settlement.
    pub fn get_contract_balance(env: Env) -> i128 {
        let funding_token = storage::get_token(&env);
        token::Client::new(&env, &funding_token).balance(&env.current_contract_address())
    }

    /// Recipient of threshold settlements.
    pub fn owner(env: Env) -> Address {
        storage::get_owner(&env)
    }

    /// The settlement threshold, in stroops of the funding asset.
    pub fn threshold(_env: Env) -> i128 {
        THRESHOLD
    }

    /// Accumulated donations since the last settlement.
    pub fn total_amount(env: Env) -> i128 {
        storage::get_total_amount(&env)
    }
}
