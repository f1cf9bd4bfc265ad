//! # GiftChain Ledger Contract
//!
//! Root crate of **GiftChain**: token gifts locked behind a secret code,
//! claimable by whoever presents the code before expiry and reclaimable by the
//! creator afterwards. Two smaller subsystems share the ledger: contribution
//! pools that pre-fund a creator's gifts, and goal-capped campaigns.
//!
//! | Phase         | Entry Point(s)                                                  |
//! |---------------|-----------------------------------------------------------------|
//! | Bootstrap     | `__constructor` (sets the relayer, permanently)                 |
//! | Gifts         | [`GiftLedger::create_gift`], [`GiftLedger::create_bulk_gifts`]  |
//! | Redemption    | `claim_gift`, `claim_gift_with_code`, `reclaim_gift`, `reclaim_gift_with_code`, `validate_gift` |
//! | Pools         | `contribute`, `withdraw_contribution`                           |
//! | Campaigns     | `create_campaign`, `donate_to_campaign`, `withdraw_campaign_funds` |
//! | Queries       | `get_gift`, `get_gift_status`, `get_campaign`, `get_pool_total`, ... |
//!
//! ## Architecture
//!
//! This file holds only entry points: each one authenticates its principal
//! and hands off to [`gift`], [`bulk`], [`pool`] or [`campaign`]. Storage
//! access lives in `storage`, token movement in `token`.

#![no_std]

use soroban_sdk::{contract, contractimpl, Address, Bytes, BytesN, Env, String, Vec};

mod bulk;
mod campaign;
mod constants;
pub mod errors;
pub mod events;
mod gift;
pub mod identity;
mod pool;
mod storage;
mod token;
pub mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_pool;

pub use errors::Error;
pub use identity::CreatorId;
pub use types::{Campaign, Gift, GiftStatus};

#[contract]
pub struct GiftLedger;

#[contractimpl]
impl GiftLedger {
    // ─────────────────────────────────────────────────────────
    // Bootstrap
    // ─────────────────────────────────────────────────────────

    /// Deploy with the single trusted relayer. There is no rotation.
    pub fn __constructor(env: Env, relayer: Address) {
        storage::set_relayer(&env, &relayer);
    }

    pub fn get_relayer(env: Env) -> Option<Address> {
        storage::get_relayer(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Gift creation
    // ─────────────────────────────────────────────────────────

    /// Create a gift on behalf of the creator committed to by `creator_hash`.
    ///
    /// Only the relayer may call this. The gift is funded from the creator's
    /// pool for `token` first and the rest is pulled from the relayer.
    #[allow(clippy::too_many_arguments)]
    pub fn create_gift(
        env: Env,
        relayer: Address,
        token: Address,
        amount: i128,
        expiry: u64,
        message: String,
        gift_id: BytesN<32>,
        creator_hash: BytesN<32>,
    ) -> Result<Gift, Error> {
        relayer.require_auth();
        gift::create(
            &env,
            &relayer,
            &token,
            amount,
            expiry,
            &message,
            &gift_id,
            &creator_hash,
        )
    }

    /// Create five or more gifts paid for by `creator` in one all-or-nothing
    /// batch. `creator` must hash to `creator_hash`. Returns the number of
    /// gifts created.
    #[allow(clippy::too_many_arguments)]
    pub fn create_bulk_gifts(
        env: Env,
        creator: Address,
        token: Address,
        amounts: Vec<i128>,
        expiries: Vec<u64>,
        messages: Vec<String>,
        gift_ids: Vec<BytesN<32>>,
        creator_hash: BytesN<32>,
    ) -> Result<u32, Error> {
        creator.require_auth();
        bulk::create_bulk(
            &env,
            &creator,
            &token,
            &amounts,
            &expiries,
            &messages,
            &gift_ids,
            &creator_hash,
        )
    }

    // ─────────────────────────────────────────────────────────
    // Redemption
    // ─────────────────────────────────────────────────────────

    /// Claim a pending, unexpired gift; its tokens go to `recipient`.
    pub fn claim_gift(env: Env, recipient: Address, gift_id: BytesN<32>) -> Result<Gift, Error> {
        recipient.require_auth();
        gift::claim(&env, &recipient, &gift_id)
    }

    /// Same as [`GiftLedger::claim_gift`], keyed by the secret code itself.
    pub fn claim_gift_with_code(
        env: Env,
        recipient: Address,
        raw_code: Bytes,
    ) -> Result<Gift, Error> {
        recipient.require_auth();
        let gift_id = identity::commit_code(&env, &raw_code);
        gift::claim(&env, &recipient, &gift_id)
    }

    /// Return an expired, pending gift to its creator.
    pub fn reclaim_gift(env: Env, creator: Address, gift_id: BytesN<32>) -> Result<Gift, Error> {
        creator.require_auth();
        gift::reclaim(&env, &creator, &gift_id)
    }

    /// Same as [`GiftLedger::reclaim_gift`], keyed by the secret code itself.
    pub fn reclaim_gift_with_code(
        env: Env,
        creator: Address,
        raw_code: Bytes,
    ) -> Result<Gift, Error> {
        creator.require_auth();
        let gift_id = identity::commit_code(&env, &raw_code);
        gift::reclaim(&env, &creator, &gift_id)
    }

    /// `true` if the code names a pending gift, otherwise the terminal reason.
    pub fn validate_gift(env: Env, raw_code: Bytes) -> Result<bool, Error> {
        gift::validate(&env, &raw_code)
    }

    // ─────────────────────────────────────────────────────────
    // Contribution pools
    // ─────────────────────────────────────────────────────────

    /// Deposit into the pool that funds `creator_hash`'s gifts in `token`.
    /// Returns the new pool total.
    pub fn contribute(
        env: Env,
        contributor: Address,
        token: Address,
        amount: i128,
        creator_hash: BytesN<32>,
    ) -> Result<i128, Error> {
        contributor.require_auth();
        pool::contribute(&env, &contributor, &token, amount, &creator_hash)
    }

    /// Withdraw up to the caller's own share of a pool.
    /// Returns the new pool total.
    pub fn withdraw_contribution(
        env: Env,
        contributor: Address,
        creator_hash: BytesN<32>,
        token: Address,
        amount: i128,
    ) -> Result<i128, Error> {
        contributor.require_auth();
        pool::withdraw(&env, &contributor, &creator_hash, &token, amount)
    }

    // ─────────────────────────────────────────────────────────
    // Campaigns
    // ─────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub fn create_campaign(
        env: Env,
        creator: Address,
        title: String,
        description: String,
        token: Address,
        goal: i128,
        deadline: u64,
        campaign_id: BytesN<32>,
    ) -> Result<Campaign, Error> {
        creator.require_auth();
        campaign::create(
            &env,
            &creator,
            &title,
            &description,
            &token,
            goal,
            deadline,
            &campaign_id,
        )
    }

    pub fn donate_to_campaign(
        env: Env,
        donor: Address,
        campaign_id: BytesN<32>,
        amount: i128,
    ) -> Result<Campaign, Error> {
        donor.require_auth();
        campaign::donate(&env, &donor, &campaign_id, amount)
    }

    /// Pay out everything raised. Creator only, once, at or after the deadline.
    pub fn withdraw_campaign_funds(
        env: Env,
        creator: Address,
        campaign_id: BytesN<32>,
    ) -> Result<i128, Error> {
        creator.require_auth();
        campaign::withdraw(&env, &creator, &campaign_id)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_gift(env: Env, gift_id: BytesN<32>) -> Result<Gift, Error> {
        gift::get(&env, &gift_id)
    }

    /// `GiftStatus::None` for ids that were never used.
    pub fn get_gift_status(env: Env, gift_id: BytesN<32>) -> GiftStatus {
        gift::status(&env, &gift_id)
    }

    pub fn is_gift_expired(env: Env, gift_id: BytesN<32>) -> Result<bool, Error> {
        gift::is_expired(&env, &gift_id)
    }

    /// The gift id a secret code commits to.
    pub fn gift_id_from_code(env: Env, raw_code: Bytes) -> BytesN<32> {
        identity::commit_code(&env, &raw_code)
    }

    /// The commitment stored as `Gift::creator` for gifts made by `address`.
    pub fn creator_hash_of(env: Env, address: Address) -> BytesN<32> {
        identity::commit_address(&env, &address)
    }

    pub fn get_campaign(env: Env, campaign_id: BytesN<32>) -> Result<Campaign, Error> {
        campaign::get(&env, &campaign_id)
    }

    pub fn get_donation(env: Env, campaign_id: BytesN<32>, donor: Address) -> i128 {
        campaign::donation_of(&env, &campaign_id, &donor)
    }

    pub fn get_pool_total(env: Env, creator_hash: BytesN<32>, token: Address) -> i128 {
        pool::pool_total(&env, &creator_hash, &token)
    }

    pub fn get_contributor_balance(
        env: Env,
        creator_hash: BytesN<32>,
        token: Address,
        contributor: Address,
    ) -> i128 {
        pool::contributor_balance(&env, &creator_hash, &token, &contributor)
    }

    /// Amount of `token` the ledger holds across gifts, pools and campaigns.
    pub fn get_custody(env: Env, token: Address) -> i128 {
        storage::get_custody(&env, &token)
    }
}
