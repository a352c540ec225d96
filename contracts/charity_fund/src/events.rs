//! Contract events published by the charity fund.
//!
//! Both events carry a typed `#[contracttype]` payload so off-chain
//! consumers decode them back into structs instead of picking positional
//! tuple fields apart.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

/// Published on every accepted donation (`deposited` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundDeposited {
    pub donor: Address,
    pub amount: i128,
}

/// Published when a settlement sweeps the held balance to the owner
/// (`transferred` topic).
///
/// `amount` is the swept balance, which can exceed the bookkept total if
/// tokens were sent to the contract address out of band.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsTransferred {
    pub recipient: Address,
    pub amount: i128,
}

pub fn fund_deposited(env: &Env, donor: &Address, amount: i128) {
    let data = FundDeposited {
        donor: donor.clone(),
        amount,
    };
    env.events().publish((symbol_short!("deposited"),), data);
}

pub fn funds_transferred(env: &Env, recipient: &Address, amount: i128) {
    let data = FundsTransferred {
        recipient: recipient.clone(),
        amount,
    };
    env.events()
        .publish((Symbol::new(env, "transferred"),), data);
}
