#![allow(dead_code)]

extern crate std;

use soroban_sdk::{token, Address, BytesN};

use crate::types::{Campaign, Gift, GiftStatus};
use crate::GiftLedgerClient;

/// INV-1: the custody counter matches what the token contract says the
/// ledger holds.
pub fn assert_custody_matches_balance(client: &GiftLedgerClient, token: &token::Client) {
    let counted = client.get_custody(&token.address);
    let held = token.balance(&client.address);
    assert_eq!(
        counted, held,
        "INV-1 violated: custody counter {} != token balance {}",
        counted, held
    );
}

/// INV-2: custody equals pending gifts + pools + unwithdrawn campaign funds.
pub fn assert_custody_conserved(
    client: &GiftLedgerClient,
    token: &token::Client,
    gifts: &[BytesN<32>],
    pools: &[BytesN<32>],
    campaigns: &[BytesN<32>],
) {
    let pending: i128 = gifts
        .iter()
        .map(|id| client.get_gift(id))
        .filter(|gift| gift.status == GiftStatus::Pending)
        .map(|gift| gift.amount)
        .sum();
    let pooled: i128 = pools
        .iter()
        .map(|hash| client.get_pool_total(hash, &token.address))
        .sum();
    let raised: i128 = campaigns
        .iter()
        .map(|id| client.get_campaign(id))
        .filter(|campaign| !campaign.withdrawn)
        .map(|campaign| campaign.raised_amount)
        .sum();

    let held = token.balance(&client.address);
    assert_eq!(
        held,
        pending + pooled + raised,
        "INV-2 violated: held {} != pending {} + pooled {} + raised {}",
        held,
        pending,
        pooled,
        raised
    );
    assert_custody_matches_balance(client, token);
}

/// INV-3: only `Pending -> Successful` and `Pending -> Reclaimed` exist.
pub fn assert_valid_status_transition(from: &GiftStatus, to: &GiftStatus) {
    let valid = matches!(
        (from, to),
        (GiftStatus::None, GiftStatus::Pending)
            | (GiftStatus::Pending, GiftStatus::Successful)
            | (GiftStatus::Pending, GiftStatus::Reclaimed)
    );
    assert!(
        valid,
        "INV-3 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// INV-4: a gift's creation-time fields never change.
pub fn assert_gift_immutable_fields(original: &Gift, current: &Gift) {
    assert_eq!(original.gift_id, current.gift_id, "INV-4 violated: gift_id changed");
    assert_eq!(original.token, current.token, "INV-4 violated: token changed");
    assert_eq!(original.amount, current.amount, "INV-4 violated: amount changed");
    assert_eq!(original.message, current.message, "INV-4 violated: message changed");
    assert_eq!(original.expiry, current.expiry, "INV-4 violated: expiry changed");
    assert_eq!(
        original.time_created, current.time_created,
        "INV-4 violated: time_created changed"
    );
    assert_eq!(original.creator, current.creator, "INV-4 violated: creator changed");
}

/// INV-5: contributor balances never exceed the pool total, and rounding
/// leaves less than one token per contributor unassigned. `contributors`
/// must list everyone who holds units in the pool.
pub fn assert_pool_consistent(
    client: &GiftLedgerClient,
    creator_hash: &BytesN<32>,
    token: &Address,
    contributors: &[Address],
) {
    let balances: i128 = contributors
        .iter()
        .map(|who| client.get_contributor_balance(creator_hash, token, who))
        .sum();
    let total = client.get_pool_total(creator_hash, token);
    assert!(
        balances <= total,
        "INV-5 violated: balances {} exceed pool total {}",
        balances,
        total
    );
    assert!(
        total - balances < contributors.len().max(1) as i128,
        "INV-5 violated: pool total {} leaves {} unassigned",
        total,
        total - balances
    );
}

/// INV-6: a campaign never raises more than its goal.
pub fn assert_goal_ceiling(campaign: &Campaign) {
    assert!(
        campaign.raised_amount <= campaign.goal,
        "INV-6 violated: raised {} exceeds goal {}",
        campaign.raised_amount,
        campaign.goal
    );
}

/// INV-7: `claimed` is set exactly when the gift has left `Pending`.
pub fn assert_claimed_flag(gift: &Gift) {
    assert_eq!(
        gift.claimed,
        gift.status.is_terminal(),
        "INV-7 violated: claimed={} with status {:?}",
        gift.claimed,
        gift.status
    );
}
