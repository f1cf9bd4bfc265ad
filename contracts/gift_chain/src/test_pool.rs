extern crate std;

use soroban_sdk::{testutils::Address as _, Address, BytesN};

use crate::invariants::{assert_custody_conserved, assert_pool_consistent};
use crate::test_setup::{advance, create_token, gift_id, setup, text, zero_address, Setup, DAY};
use crate::{Error, GiftStatus};

fn relay(s: &Setup, creator: &Address, secret: &str, amount: i128) -> BytesN<32> {
    let id = gift_id(&s.env, secret);
    s.client.create_gift(
        &s.relayer,
        &s.token.address,
        &amount,
        &(s.env.ledger().timestamp() + DAY),
        &text(&s.env, "From all of us"),
        &id,
        &s.creator_hash(creator),
    );
    id
}

#[test]
fn test_pool_covers_gift_without_relayer_funds() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let friend = Address::generate(&s.env);
    let hash = s.creator_hash(&creator);
    s.sac.mint(&friend, &200);

    assert_eq!(s.client.contribute(&friend, &s.token.address, &200, &hash), 200);
    let id = relay(&s, &creator, "office-card", 150);

    assert_eq!(s.client.get_pool_total(&hash, &s.token.address), 50);
    assert_eq!(s.token.balance(&s.relayer), 0);
    assert_eq!(s.client.get_gift(&id).amount, 150);
    assert_pool_consistent(&s.client, &hash, &s.token.address, &[friend]);
    assert_custody_conserved(&s.client, &s.token, &[id], &[hash], &[]);
}

#[test]
fn test_relayer_tops_up_partial_pool() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let friend = Address::generate(&s.env);
    let hash = s.creator_hash(&creator);
    s.sac.mint(&friend, &100);
    s.sac.mint(&s.relayer, &150);

    s.client.contribute(&friend, &s.token.address, &100, &hash);
    let id = relay(&s, &creator, "wedding", 250);

    assert_eq!(s.client.get_pool_total(&hash, &s.token.address), 0);
    assert_eq!(s.client.get_contributor_balance(&hash, &s.token.address, &friend), 0);
    assert_eq!(s.token.balance(&s.relayer), 0);
    assert_eq!(s.ledger_balance(), 250);
    assert_custody_conserved(&s.client, &s.token, &[id], &[hash], &[]);
}

#[test]
fn test_unfunded_top_up_leaves_pool_untouched() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let friend = Address::generate(&s.env);
    let hash = s.creator_hash(&creator);
    s.sac.mint(&friend, &100);
    s.client.contribute(&friend, &s.token.address, &100, &hash);

    let id = gift_id(&s.env, "too-big");
    let res = s.client.try_create_gift(
        &s.relayer,
        &s.token.address,
        &500,
        &(s.env.ledger().timestamp() + DAY),
        &text(&s.env, "From all of us"),
        &id,
        &hash,
    );
    assert_eq!(res, Err(Ok(Error::TransferFailed)));
    assert_eq!(s.client.get_pool_total(&hash, &s.token.address), 100);
    assert_eq!(s.client.get_contributor_balance(&hash, &s.token.address, &friend), 100);
    assert_eq!(s.client.get_gift_status(&id), GiftStatus::None);
}

#[test]
fn test_draw_is_shared_in_proportion() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let alice = Address::generate(&s.env);
    let bob = Address::generate(&s.env);
    let hash = s.creator_hash(&creator);
    s.sac.mint(&alice, &30);
    s.sac.mint(&bob, &50);

    s.client.contribute(&alice, &s.token.address, &30, &hash);
    s.client.contribute(&bob, &s.token.address, &50, &hash);
    relay(&s, &creator, "team-lunch", 60);

    // 20 left over 80 units: alice 7.5 and bob 12.5, rounded down.
    assert_eq!(s.client.get_pool_total(&hash, &s.token.address), 20);
    assert_eq!(s.client.get_contributor_balance(&hash, &s.token.address, &alice), 7);
    assert_eq!(s.client.get_contributor_balance(&hash, &s.token.address, &bob), 12);
    assert_pool_consistent(&s.client, &hash, &s.token.address, &[alice.clone(), bob.clone()]);

    let res = s.client.try_withdraw_contribution(&alice, &hash, &s.token.address, &8);
    assert_eq!(res, Err(Ok(Error::InsufficientBalance)));
    assert_eq!(s.client.withdraw_contribution(&alice, &hash, &s.token.address, &7), 13);
    assert_eq!(s.client.get_contributor_balance(&hash, &s.token.address, &bob), 12);
    assert_eq!(s.client.withdraw_contribution(&bob, &hash, &s.token.address, &12), 1);
    assert_pool_consistent(&s.client, &hash, &s.token.address, &[alice.clone(), bob.clone()]);

    assert_eq!(s.token.balance(&alice), 7);
    assert_eq!(s.token.balance(&bob), 12);
    assert_custody_conserved(&s.client, &s.token, &[], &[hash], &[]);
}

#[test]
fn test_emptied_pool_starts_fresh() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let alice = Address::generate(&s.env);
    let carol = Address::generate(&s.env);
    let hash = s.creator_hash(&creator);
    s.sac.mint(&alice, &40);
    s.sac.mint(&carol, &10);

    s.client.contribute(&alice, &s.token.address, &40, &hash);
    relay(&s, &creator, "drains-pool", 40);
    assert_eq!(s.client.get_pool_total(&hash, &s.token.address), 0);

    // Alice's old units must not claim any part of a later deposit.
    s.client.contribute(&carol, &s.token.address, &10, &hash);
    assert_eq!(s.client.get_contributor_balance(&hash, &s.token.address, &alice), 0);
    assert_eq!(s.client.get_contributor_balance(&hash, &s.token.address, &carol), 10);
    assert_eq!(
        s.client.try_withdraw_contribution(&alice, &hash, &s.token.address, &1),
        Err(Ok(Error::InsufficientBalance))
    );

    s.sac.mint(&alice, &10);
    s.client.contribute(&alice, &s.token.address, &10, &hash);
    assert_eq!(s.client.get_contributor_balance(&hash, &s.token.address, &alice), 10);
    assert_pool_consistent(&s.client, &hash, &s.token.address, &[alice, carol]);
}

#[test]
fn test_dust_contributors_do_not_grow_gift_footprint() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let friend = Address::generate(&s.env);
    let hash = s.creator_hash(&creator);
    s.sac.mint(&friend, &1_000);
    s.client.contribute(&friend, &s.token.address, &1_000, &hash);

    relay(&s, &creator, "before-dust", 50);
    let before = s.env.cost_estimate().resources();

    let mut spammers = std::vec::Vec::new();
    for _ in 0..400 {
        let spammer = Address::generate(&s.env);
        s.sac.mint(&spammer, &1);
        s.client.contribute(&spammer, &s.token.address, &1, &hash);
        spammers.push(spammer);
    }

    let id = gift_id(&s.env, "after-dust");
    let res = s.client.try_create_gift(
        &s.relayer,
        &s.token.address,
        &50,
        &(s.env.ledger().timestamp() + DAY),
        &text(&s.env, "From all of us"),
        &id,
        &hash,
    );
    assert!(matches!(res, Ok(Ok(_))));
    let after = s.env.cost_estimate().resources();

    assert_eq!(after.read_entries, before.read_entries);
    assert_eq!(after.write_entries, before.write_entries);
    assert_eq!(s.client.get_pool_total(&hash, &s.token.address), 1_300);
    assert_eq!(s.token.balance(&s.relayer), 0);

    spammers.push(friend);
    assert_pool_consistent(&s.client, &hash, &s.token.address, &spammers);
}

#[test]
fn test_withdraw_own_share() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let friend = Address::generate(&s.env);
    let stranger = Address::generate(&s.env);
    let hash = s.creator_hash(&creator);
    s.sac.mint(&friend, &100);

    s.client.contribute(&friend, &s.token.address, &100, &hash);
    assert_eq!(s.client.withdraw_contribution(&friend, &hash, &s.token.address, &40), 60);
    assert_eq!(s.token.balance(&friend), 40);

    assert_eq!(
        s.client.try_withdraw_contribution(&friend, &hash, &s.token.address, &61),
        Err(Ok(Error::InsufficientBalance))
    );
    assert_eq!(
        s.client.try_withdraw_contribution(&friend, &hash, &s.token.address, &0),
        Err(Ok(Error::InvalidAmount))
    );
    assert_eq!(
        s.client.try_withdraw_contribution(&stranger, &hash, &s.token.address, &1),
        Err(Ok(Error::InsufficientBalance))
    );

    assert_eq!(s.client.withdraw_contribution(&friend, &hash, &s.token.address, &60), 0);
    assert_eq!(s.token.balance(&friend), 100);
    assert_custody_conserved(&s.client, &s.token, &[], &[hash], &[]);
}

#[test]
fn test_contribute_validation() {
    let s = setup();
    let friend = Address::generate(&s.env);
    let hash = s.creator_hash(&Address::generate(&s.env));
    s.sac.mint(&friend, &10);

    assert_eq!(
        s.client.try_contribute(&friend, &s.token.address, &0, &hash),
        Err(Ok(Error::InvalidAmount))
    );
    assert_eq!(
        s.client.try_contribute(&friend, &s.token.address, &-1, &hash),
        Err(Ok(Error::InvalidAmount))
    );
    assert_eq!(
        s.client.try_contribute(&friend, &zero_address(&s.env), &5, &hash),
        Err(Ok(Error::InvalidAddress))
    );
    assert_eq!(
        s.client.try_contribute(&friend, &s.token.address, &11, &hash),
        Err(Ok(Error::TransferFailed))
    );
    assert_eq!(s.client.get_pool_total(&hash, &s.token.address), 0);
    assert_eq!(s.token.balance(&friend), 10);
}

#[test]
fn test_pools_are_separate_per_token() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let friend = Address::generate(&s.env);
    let hash = s.creator_hash(&creator);
    let (other, other_sac) = create_token(&s.env);
    s.sac.mint(&friend, &100);
    other_sac.mint(&friend, &100);
    s.sac.mint(&s.relayer, &70);

    s.client.contribute(&friend, &other.address, &100, &hash);
    let id = relay(&s, &creator, "other-token", 70);

    assert_eq!(s.client.get_pool_total(&hash, &other.address), 100);
    assert_eq!(s.client.get_pool_total(&hash, &s.token.address), 0);
    assert_eq!(s.token.balance(&s.relayer), 0);
    assert_eq!(s.client.get_custody(&other.address), 100);
    assert_custody_conserved(&s.client, &s.token, &[id], &[hash.clone()], &[]);
    assert_custody_conserved(&s.client, &other, &[], &[hash], &[]);
}

#[test]
fn test_pool_funded_gift_pays_out_in_full() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let friend = Address::generate(&s.env);
    let recipient = Address::generate(&s.env);
    let hash = s.creator_hash(&creator);
    s.sac.mint(&friend, &300);
    s.client.contribute(&friend, &s.token.address, &300, &hash);

    let claimed = relay(&s, &creator, "first", 100);
    let reclaimed = relay(&s, &creator, "second", 120);

    s.client.claim_gift(&recipient, &claimed);
    advance(&s.env, DAY);
    s.client.reclaim_gift(&creator, &reclaimed);

    assert_eq!(s.token.balance(&recipient), 100);
    assert_eq!(s.token.balance(&creator), 120);
    assert_eq!(s.client.get_pool_total(&hash, &s.token.address), 80);
    assert_custody_conserved(&s.client, &s.token, &[claimed, reclaimed], &[hash], &[]);
}
