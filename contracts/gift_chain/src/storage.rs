//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the ledger.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key       | Type      | Description                         |
//! |-----------|-----------|-------------------------------------|
//! | `Relayer` | `Address` | Trusted relayer, set by constructor |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                                  | Type             | Description                          |
//! |--------------------------------------|------------------|--------------------------------------|
//! | `GiftConf(id)`                       | `GiftConfig`     | Immutable gift fields                |
//! | `GiftState(id)`                      | `GiftState`      | Status, claimed flag, recipient      |
//! | `CampConf(id)`                       | `CampaignConfig` | Immutable campaign fields            |
//! | `CampState(id)`                      | `CampaignState`  | Raised amount, withdrawn flag        |
//! | `Donation(campaign, donor)`          | `i128`           | Running total per donor              |
//! | `Pool(creator_hash, token)`          | `PoolState`      | Pooled balance and issued units      |
//! | `PoolShare(creator_hash, token, who)`| `PoolShare`      | One contributor's units              |
//! | `Custody(token)`                     | `i128`           | Tokens held by the ledger            |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.

use soroban_sdk::{contracttype, Address, BytesN, Env};

use crate::errors::Error;
use crate::types::{CampaignConfig, CampaignState, GiftConfig, GiftState, PoolShare, PoolState};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Trusted relayer address (Instance).
    Relayer,
    GiftConf(BytesN<32>),
    GiftState(BytesN<32>),
    CampConf(BytesN<32>),
    CampState(BytesN<32>),
    Donation(BytesN<32>, Address),
    Pool(BytesN<32>, Address),
    PoolShare(BytesN<32>, Address, Address),
    Custody(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn set_relayer(env: &Env, relayer: &Address) {
    env.storage().instance().set(&DataKey::Relayer, relayer);
    bump_instance(env);
}

/// The relayer is written by the constructor, so it is present on every
/// deployed instance.
pub fn get_relayer(env: &Env) -> Option<Address> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Relayer)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn read<T>(env: &Env, key: &DataKey) -> Option<T>
where
    T: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
{
    let value = env.storage().persistent().get(key);
    if value.is_some() {
        bump_persistent(env, key);
    }
    value
}

fn write<T>(env: &Env, key: &DataKey, value: &T)
where
    T: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(key, value);
    bump_persistent(env, key);
}

fn remove(env: &Env, key: &DataKey) {
    env.storage().persistent().remove(key);
}

// ── Gifts ────────────────────────────────────────────────────────────

pub fn has_gift(env: &Env, gift_id: &BytesN<32>) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::GiftConf(gift_id.clone()))
}

/// Write both entries of a new gift.
pub fn save_gift(env: &Env, config: &GiftConfig, state: &GiftState) {
    write(env, &DataKey::GiftConf(config.gift_id.clone()), config);
    write(env, &DataKey::GiftState(config.gift_id.clone()), state);
}

pub fn load_gift_config(env: &Env, gift_id: &BytesN<32>) -> Option<GiftConfig> {
    read(env, &DataKey::GiftConf(gift_id.clone()))
}

pub fn load_gift_state(env: &Env, gift_id: &BytesN<32>) -> Option<GiftState> {
    read(env, &DataKey::GiftState(gift_id.clone()))
}

pub fn save_gift_state(env: &Env, gift_id: &BytesN<32>, state: &GiftState) {
    write(env, &DataKey::GiftState(gift_id.clone()), state);
}

// ── Campaigns ────────────────────────────────────────────────────────

pub fn has_campaign(env: &Env, campaign_id: &BytesN<32>) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::CampConf(campaign_id.clone()))
}

pub fn save_campaign(env: &Env, config: &CampaignConfig, state: &CampaignState) {
    write(env, &DataKey::CampConf(config.campaign_id.clone()), config);
    write(env, &DataKey::CampState(config.campaign_id.clone()), state);
}

pub fn load_campaign_config(env: &Env, campaign_id: &BytesN<32>) -> Option<CampaignConfig> {
    read(env, &DataKey::CampConf(campaign_id.clone()))
}

pub fn load_campaign_state(env: &Env, campaign_id: &BytesN<32>) -> Option<CampaignState> {
    read(env, &DataKey::CampState(campaign_id.clone()))
}

pub fn save_campaign_state(env: &Env, campaign_id: &BytesN<32>, state: &CampaignState) {
    write(env, &DataKey::CampState(campaign_id.clone()), state);
}

pub fn get_donation(env: &Env, campaign_id: &BytesN<32>, donor: &Address) -> i128 {
    read(env, &DataKey::Donation(campaign_id.clone(), donor.clone())).unwrap_or(0)
}

pub fn set_donation(env: &Env, campaign_id: &BytesN<32>, donor: &Address, total: i128) {
    write(env, &DataKey::Donation(campaign_id.clone(), donor.clone()), &total);
}

// ── Contribution pools ───────────────────────────────────────────────

pub fn get_pool(env: &Env, creator_hash: &BytesN<32>, token: &Address) -> PoolState {
    read(env, &DataKey::Pool(creator_hash.clone(), token.clone())).unwrap_or_default()
}

pub fn set_pool(env: &Env, creator_hash: &BytesN<32>, token: &Address, pool: &PoolState) {
    write(env, &DataKey::Pool(creator_hash.clone(), token.clone()), pool);
}

pub fn get_pool_share(
    env: &Env,
    creator_hash: &BytesN<32>,
    token: &Address,
    contributor: &Address,
) -> Option<PoolShare> {
    read(
        env,
        &DataKey::PoolShare(creator_hash.clone(), token.clone(), contributor.clone()),
    )
}

/// Store a contributor's units; an empty share removes the entry.
pub fn set_pool_share(
    env: &Env,
    creator_hash: &BytesN<32>,
    token: &Address,
    contributor: &Address,
    share: &PoolShare,
) {
    let key = DataKey::PoolShare(creator_hash.clone(), token.clone(), contributor.clone());
    if share.units == 0 {
        remove(env, &key);
    } else {
        write(env, &key, share);
    }
}

// ── Custody ──────────────────────────────────────────────────────────

pub fn get_custody(env: &Env, token: &Address) -> i128 {
    read(env, &DataKey::Custody(token.clone())).unwrap_or(0)
}

/// Apply a signed change to the custody counter of `token`.
pub fn adjust_custody(env: &Env, token: &Address, delta: i128) -> Result<(), Error> {
    let next = get_custody(env, token)
        .checked_add(delta)
        .ok_or(Error::InvalidAmount)?;
    write(env, &DataKey::Custody(token.clone()), &next);
    Ok(())
}
