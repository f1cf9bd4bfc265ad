//! # Events
//!
//! Every state transition publishes exactly one event with topics
//! `(symbol, id)` and one of the structs below as data. The indexer in
//! `backend/indexer` decodes these by their leading symbol.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env, String, Symbol};

use crate::types::GiftStatus;

pub const GIFT_CREATED: Symbol = symbol_short!("created");
pub const GIFT_CLAIMED: Symbol = symbol_short!("claimed");
pub const GIFT_RECLAIMED: Symbol = symbol_short!("reclaimed");
pub const CONTRIBUTION_ADDED: Symbol = symbol_short!("contrib");
pub const CONTRIBUTION_REMOVED: Symbol = symbol_short!("contr_out");
pub const POOL_DRAWN: Symbol = symbol_short!("pool_draw");
pub const CAMPAIGN_CREATED: Symbol = symbol_short!("camp_new");
pub const DONATION_RECEIVED: Symbol = symbol_short!("donated");
pub const CONTRIBUTION_WITHDRAWN: Symbol = symbol_short!("withdrawn");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GiftCreated {
    pub gift_id: BytesN<32>,
    pub creator: BytesN<32>,
    pub token: Address,
    pub message: String,
    pub amount: i128,
    pub expiry: u64,
    pub time_created: u64,
    pub status: GiftStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GiftClaimed {
    pub gift_id: BytesN<32>,
    pub recipient: Address,
    pub amount: i128,
    pub status: GiftStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GiftReclaimed {
    pub gift_id: BytesN<32>,
    pub creator: Address,
    pub amount: i128,
}

/// Published for deposits into a pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionAdded {
    pub creator_hash: BytesN<32>,
    pub contributor: Address,
    pub token: Address,
    pub amount: i128,
    /// Pool total after the deposit.
    pub pool_total: i128,
}

/// Published when a contributor takes their share back out.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionRemoved {
    pub creator_hash: BytesN<32>,
    pub contributor: Address,
    pub token: Address,
    pub amount: i128,
    pub pool_total: i128,
}

/// Published when `create_gift` funds a gift from a pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolDrawn {
    pub creator_hash: BytesN<32>,
    pub gift_id: BytesN<32>,
    pub token: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignCreated {
    pub campaign_id: BytesN<32>,
    pub creator: Address,
    pub token: Address,
    pub goal: i128,
    pub deadline: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationReceived {
    pub campaign_id: BytesN<32>,
    pub donor: Address,
    pub amount: i128,
    pub raised_amount: i128,
}

/// Published when a campaign creator withdraws the raised funds.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionWithdrawn {
    pub campaign_id: BytesN<32>,
    pub creator: Address,
    pub amount: i128,
}

pub fn gift_created(env: &Env, event: GiftCreated) {
    env.events()
        .publish((GIFT_CREATED, event.gift_id.clone()), event);
}

pub fn gift_claimed(env: &Env, event: GiftClaimed) {
    env.events()
        .publish((GIFT_CLAIMED, event.gift_id.clone()), event);
}

pub fn gift_reclaimed(env: &Env, event: GiftReclaimed) {
    env.events()
        .publish((GIFT_RECLAIMED, event.gift_id.clone()), event);
}

pub fn contribution_added(env: &Env, event: ContributionAdded) {
    env.events()
        .publish((CONTRIBUTION_ADDED, event.creator_hash.clone()), event);
}

pub fn contribution_removed(env: &Env, event: ContributionRemoved) {
    env.events()
        .publish((CONTRIBUTION_REMOVED, event.creator_hash.clone()), event);
}

pub fn pool_drawn(env: &Env, event: PoolDrawn) {
    env.events()
        .publish((POOL_DRAWN, event.creator_hash.clone()), event);
}

pub fn campaign_created(env: &Env, event: CampaignCreated) {
    env.events()
        .publish((CAMPAIGN_CREATED, event.campaign_id.clone()), event);
}

pub fn donation_received(env: &Env, event: DonationReceived) {
    env.events()
        .publish((DONATION_RECEIVED, event.campaign_id.clone()), event);
}

pub fn contribution_withdrawn(env: &Env, event: ContributionWithdrawn) {
    env.events()
        .publish((CONTRIBUTION_WITHDRAWN, event.campaign_id.clone()), event);
}
