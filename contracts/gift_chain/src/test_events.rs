extern crate std;

use soroban_sdk::{
    symbol_short, testutils::Address as _, vec, Address, Env, IntoVal, Symbol, TryIntoVal, Val,
    Vec,
};

use crate::events::{
    CampaignCreated, ContributionAdded, ContributionRemoved, ContributionWithdrawn,
    DonationReceived, GiftClaimed, GiftCreated, GiftReclaimed, PoolDrawn,
};
use crate::test_setup::{advance, events_from, id, setup, text, START_TIME, DAY};
use crate::GiftStatus;

/// The most recent event the ledger published under `name`.
fn last_named(env: &Env, contract: &Address, name: Symbol) -> (Vec<Val>, Val) {
    events_from(env, contract)
        .into_iter()
        .filter(|(topics, _)| {
            let leading: Symbol = topics.get(0).unwrap().try_into_val(env).unwrap();
            leading == name
        })
        .last()
        .expect("No matching event found")
}

#[test]
fn test_gift_created_event() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let gift_id = s.relayed_gift(&creator, "party", 500, DAY);

    let (topics, data) = last_named(&s.env, &s.client.address, symbol_short!("created"));

    // Topic: (symbol_short!("created"), gift_id)
    let expected_topics: Vec<Val> = vec![
        &s.env,
        symbol_short!("created").into_val(&s.env),
        gift_id.into_val(&s.env),
    ];
    assert_eq!(topics, expected_topics);

    let event: GiftCreated = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        event,
        GiftCreated {
            gift_id,
            creator: s.client.creator_hash_of(&creator),
            token: s.token.address.clone(),
            message: text(&s.env, "Happy Birthday!"),
            amount: 500,
            expiry: START_TIME + DAY,
            time_created: START_TIME,
            status: GiftStatus::Pending,
        }
    );
}

#[test]
fn test_gift_claimed_event() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let recipient = Address::generate(&s.env);
    let gift_id = s.relayed_gift(&creator, "party", 500, DAY);

    s.client.claim_gift(&recipient, &gift_id);

    let (topics, data) = last_named(&s.env, &s.client.address, symbol_short!("claimed"));
    let expected_topics: Vec<Val> = vec![
        &s.env,
        symbol_short!("claimed").into_val(&s.env),
        gift_id.into_val(&s.env),
    ];
    assert_eq!(topics, expected_topics);

    let event: GiftClaimed = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        event,
        GiftClaimed {
            gift_id,
            recipient,
            amount: 500,
            status: GiftStatus::Successful,
        }
    );
}

#[test]
fn test_gift_reclaimed_event() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let gift_id = s.relayed_gift(&creator, "party", 500, DAY);
    advance(&s.env, DAY);

    s.client.reclaim_gift(&creator, &gift_id);

    let (topics, data) = last_named(&s.env, &s.client.address, symbol_short!("reclaimed"));
    let expected_topics: Vec<Val> = vec![
        &s.env,
        symbol_short!("reclaimed").into_val(&s.env),
        gift_id.into_val(&s.env),
    ];
    assert_eq!(topics, expected_topics);

    let event: GiftReclaimed = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        event,
        GiftReclaimed {
            gift_id,
            creator,
            amount: 500,
        }
    );
}

#[test]
fn test_pool_events() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let friend = Address::generate(&s.env);
    let hash = s.creator_hash(&creator);
    s.sac.mint(&friend, &300);

    s.client.contribute(&friend, &s.token.address, &300, &hash);
    let (topics, data) = last_named(&s.env, &s.client.address, symbol_short!("contrib"));
    let expected_topics: Vec<Val> = vec![
        &s.env,
        symbol_short!("contrib").into_val(&s.env),
        hash.into_val(&s.env),
    ];
    assert_eq!(topics, expected_topics);
    let added: ContributionAdded = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        added,
        ContributionAdded {
            creator_hash: hash.clone(),
            contributor: friend.clone(),
            token: s.token.address.clone(),
            amount: 300,
            pool_total: 300,
        }
    );

    s.client.withdraw_contribution(&friend, &hash, &s.token.address, &100);
    let (_, data) = last_named(&s.env, &s.client.address, symbol_short!("contr_out"));
    let removed: ContributionRemoved = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        removed,
        ContributionRemoved {
            creator_hash: hash.clone(),
            contributor: friend.clone(),
            token: s.token.address.clone(),
            amount: 100,
            pool_total: 200,
        }
    );

    let gift_id = id(&s.env, 9);
    s.client.create_gift(
        &s.relayer,
        &s.token.address,
        &150,
        &(START_TIME + DAY),
        &text(&s.env, "From the team"),
        &gift_id,
        &hash,
    );
    let (topics, data) = last_named(&s.env, &s.client.address, symbol_short!("pool_draw"));
    let expected_topics: Vec<Val> = vec![
        &s.env,
        symbol_short!("pool_draw").into_val(&s.env),
        hash.into_val(&s.env),
    ];
    assert_eq!(topics, expected_topics);
    let drawn: PoolDrawn = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        drawn,
        PoolDrawn {
            creator_hash: hash,
            gift_id,
            token: s.token.address.clone(),
            amount: 150,
        }
    );
}

#[test]
fn test_campaign_events() {
    let s = setup();
    let creator = Address::generate(&s.env);
    let donor = Address::generate(&s.env);
    let campaign_id = id(&s.env, 3);
    s.sac.mint(&donor, &80);

    s.client.create_campaign(
        &creator,
        &text(&s.env, "Shelter roof"),
        &text(&s.env, ""),
        &s.token.address,
        &100,
        &(START_TIME + DAY),
        &campaign_id,
    );
    let (topics, data) = last_named(&s.env, &s.client.address, symbol_short!("camp_new"));
    let expected_topics: Vec<Val> = vec![
        &s.env,
        symbol_short!("camp_new").into_val(&s.env),
        campaign_id.into_val(&s.env),
    ];
    assert_eq!(topics, expected_topics);
    let created: CampaignCreated = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        created,
        CampaignCreated {
            campaign_id: campaign_id.clone(),
            creator: creator.clone(),
            token: s.token.address.clone(),
            goal: 100,
            deadline: START_TIME + DAY,
        }
    );

    s.client.donate_to_campaign(&donor, &campaign_id, &80);
    let (_, data) = last_named(&s.env, &s.client.address, symbol_short!("donated"));
    let donated: DonationReceived = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        donated,
        DonationReceived {
            campaign_id: campaign_id.clone(),
            donor,
            amount: 80,
            raised_amount: 80,
        }
    );

    advance(&s.env, DAY);
    s.client.withdraw_campaign_funds(&creator, &campaign_id);
    let (_, data) = last_named(&s.env, &s.client.address, symbol_short!("withdrawn"));
    let withdrawn: ContributionWithdrawn = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        withdrawn,
        ContributionWithdrawn {
            campaign_id,
            creator,
            amount: 80,
        }
    );
}
