//! # Types
//!
//! Records owned by the ledger.
//!
//! ## Config / State split
//!
//! Gifts and campaigns are each stored as two ledger entries:
//!
//! - a *config* entry written once at creation and never mutated;
//! - a *state* entry holding the handful of fields that transitions touch.
//!
//! The public API returns the reconstructed [`Gift`] and [`Campaign`].
//!
//! ## Gift lifecycle
//!
//! ```text
//! None ──► Pending ──► Successful
//!              └─────► Reclaimed
//! ```
//!
//! `None` is never stored; it is what a lookup of an unknown id reports.
//! `Successful` and `Reclaimed` are terminal.

use soroban_sdk::{contracttype, Address, BytesN, String};

use crate::identity::CreatorId;

/// Lifecycle status of a gift.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GiftStatus {
    /// No gift has been created under this id.
    None,
    /// Funds are held and the gift can be claimed or, after expiry, reclaimed.
    Pending,
    /// Claimed by the holder of the code.
    Successful,
    /// Returned to the creator after expiry.
    Reclaimed,
}

impl GiftStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GiftStatus::Successful | GiftStatus::Reclaimed)
    }
}

/// Immutable part of a gift.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GiftConfig {
    pub gift_id: BytesN<32>,
    pub token: Address,
    pub amount: i128,
    pub message: String,
    pub expiry: u64,
    pub time_created: u64,
    pub creator: BytesN<32>,
}

impl GiftConfig {
    pub fn creator_id(&self) -> CreatorId {
        CreatorId::Commitment(self.creator.clone())
    }
}

/// Mutable part of a gift.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GiftState {
    pub status: GiftStatus,
    pub claimed: bool,
    pub recipient: Option<Address>,
}

/// A gift as returned by the public API.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Gift {
    /// Commitment of the secret code (`keccak256(code)`).
    pub gift_id: BytesN<32>,
    /// Token held for this gift.
    pub token: Address,
    /// Amount held, in the token's smallest unit.
    pub amount: i128,
    /// Greeting attached by the creator.
    pub message: String,
    /// Ledger timestamp from which the gift can no longer be claimed.
    pub expiry: u64,
    /// Ledger timestamp of creation.
    pub time_created: u64,
    /// Commitment of the creator's address, not the address itself.
    pub creator: BytesN<32>,
    pub status: GiftStatus,
    /// Set once the gift leaves `Pending`, by claim or reclaim.
    pub claimed: bool,
    /// Address that claimed the gift, if any.
    pub recipient: Option<Address>,
}

impl Gift {
    pub fn from_parts(config: GiftConfig, state: GiftState) -> Self {
        Gift {
            gift_id: config.gift_id,
            token: config.token,
            amount: config.amount,
            message: config.message,
            expiry: config.expiry,
            time_created: config.time_created,
            creator: config.creator,
            status: state.status,
            claimed: state.claimed,
            recipient: state.recipient,
        }
    }

    pub fn creator_id(&self) -> CreatorId {
        CreatorId::Commitment(self.creator.clone())
    }
}

/// Immutable part of a campaign.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignConfig {
    pub campaign_id: BytesN<32>,
    pub creator: Address,
    pub token: Address,
    pub title: String,
    pub description: String,
    pub goal: i128,
    pub deadline: u64,
}

impl CampaignConfig {
    pub fn creator_id(&self) -> CreatorId {
        CreatorId::Raw(self.creator.clone())
    }
}

/// Mutable part of a campaign, written on every donation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignState {
    pub raised_amount: i128,
    pub withdrawn: bool,
    pub donor_count: u32,
}

/// A campaign as returned by the public API.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Campaign {
    pub campaign_id: BytesN<32>,
    /// Raw address of the creator (campaigns do not hash identities).
    pub creator: Address,
    pub token: Address,
    pub title: String,
    pub description: String,
    /// Hard ceiling on `raised_amount`.
    pub goal: i128,
    /// Donations are accepted strictly before this timestamp; withdrawal at or after it.
    pub deadline: u64,
    pub raised_amount: i128,
    pub withdrawn: bool,
    /// Number of distinct donors.
    pub donor_count: u32,
}

impl Campaign {
    pub fn from_parts(config: CampaignConfig, state: CampaignState) -> Self {
        Campaign {
            campaign_id: config.campaign_id,
            creator: config.creator,
            token: config.token,
            title: config.title,
            description: config.description,
            goal: config.goal,
            deadline: config.deadline,
            raised_amount: state.raised_amount,
            withdrawn: state.withdrawn,
            donor_count: state.donor_count,
        }
    }

    pub fn creator_id(&self) -> CreatorId {
        CreatorId::Raw(self.creator.clone())
    }
}

/// Aggregate of one contribution pool.
///
/// Contributors hold `units`; a unit is worth `total / units` tokens. A pool
/// drawn down to nothing moves to the next `epoch`, which voids every
/// earlier unit.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolState {
    pub total: i128,
    pub units: i128,
    pub epoch: u32,
}

/// One contributor's units, valid only in the epoch they were minted in.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolShare {
    pub units: i128,
    pub epoch: u32,
}
