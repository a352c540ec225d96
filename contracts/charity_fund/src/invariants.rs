#![allow(dead_code)]

extern crate std;

/// Ledger invariant: absent out-of-band transfers, the held token balance
/// equals the bookkept running total after every externally observable call.
pub fn assert_balance_matches_total(held: i128, total: i128) {
    assert_eq!(
        held, total,
        "held balance {} diverged from total_amount {}",
        held, total
    );
}

/// Accumulation invariant: a sub-threshold deposit of `amount` grows the
/// total by exactly `amount`.
pub fn assert_accumulates(total_before: i128, total_after: i128, amount: i128) {
    assert_eq!(
        total_after,
        total_before + amount,
        "accumulation broken: {} + {} != {}",
        total_before,
        amount,
        total_after
    );
}

/// Settlement invariant: after a settlement the total is zero and the owner
/// gained exactly the pre-reset sum.
pub fn assert_settled(total_after: i128, owner_gain: i128, expected_payout: i128) {
    assert_eq!(total_after, 0, "total_amount not reset by settlement");
    assert_eq!(
        owner_gain, expected_payout,
        "owner gained {} instead of the swept {}",
        owner_gain, expected_payout
    );
}
