//! Canonical event types emitted by the GiftChain ledger contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/gift_chain/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the GiftChain contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A gift was locked (`created` topic).
    GiftCreated,
    /// A gift was claimed by a recipient (`claimed` topic).
    GiftClaimed,
    /// An expired gift went back to its creator (`reclaimed` topic).
    GiftReclaimed,
    /// Someone deposited into a creator's pool (`contrib` topic).
    ContributionAdded,
    /// A contributor took part of their share back (`contr_out` topic).
    ContributionRemoved,
    /// A gift was funded from a pool (`pool_draw` topic).
    PoolDrawn,
    /// A campaign was opened (`camp_new` topic).
    CampaignCreated,
    /// A donation was made to a campaign (`donated` topic).
    DonationReceived,
    /// A campaign creator withdrew the raised funds (`withdrawn` topic).
    ContributionWithdrawn,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::GiftCreated,
            "claimed" => Self::GiftClaimed,
            "reclaimed" => Self::GiftReclaimed,
            "contrib" => Self::ContributionAdded,
            "contr_out" => Self::ContributionRemoved,
            "pool_draw" => Self::PoolDrawn,
            "camp_new" => Self::CampaignCreated,
            "donated" => Self::DonationReceived,
            "withdrawn" => Self::ContributionWithdrawn,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GiftCreated => "gift_created",
            Self::GiftClaimed => "gift_claimed",
            Self::GiftReclaimed => "gift_reclaimed",
            Self::ContributionAdded => "contribution_added",
            Self::ContributionRemoved => "contribution_removed",
            Self::PoolDrawn => "pool_drawn",
            Self::CampaignCreated => "campaign_created",
            Self::DonationReceived => "donation_received",
            Self::ContributionWithdrawn => "contribution_withdrawn",
            Self::Unknown => "unknown",
        }
    }

    /// What the second topic identifies.
    pub fn subject(&self) -> Subject {
        match self {
            Self::GiftCreated | Self::GiftClaimed | Self::GiftReclaimed => Subject::Gift,
            Self::ContributionAdded | Self::ContributionRemoved | Self::PoolDrawn => Subject::Pool,
            Self::CampaignCreated | Self::DonationReceived | Self::ContributionWithdrawn => {
                Subject::Campaign
            }
            Self::Unknown => Subject::Unknown,
        }
    }
}

/// The kind of on-chain object an event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Gift,
    Pool,
    Campaign,
    Unknown,
}

impl Subject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gift => "gift",
            Self::Pool => "pool",
            Self::Campaign => "campaign",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded GiftChain event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftChainEvent {
    pub event_type: String,
    pub subject_kind: String,
    /// Lower-case hex of the id topic (gift id, creator hash or campaign id).
    pub subject_id: Option<String>,
    /// Gift id for `pool_drawn` events.
    pub related_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub subject_kind: String,
    pub subject_id: Option<String>,
    pub related_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

/// Gift lifecycle as reconstructed from indexed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexedGiftStatus {
    Pending,
    Successful,
    Reclaimed,
}

/// Fold a gift's events (in ledger order) into its current status.
///
/// `None` until a `gift_created` event has been seen. Once a gift is
/// terminal, later events do not move it.
pub fn fold_gift_status(events: &[EventRecord]) -> Option<IndexedGiftStatus> {
    events.iter().fold(None, |status, ev| {
        match (status, ev.event_type.as_str()) {
            (None, "gift_created") => Some(IndexedGiftStatus::Pending),
            (Some(IndexedGiftStatus::Pending), "gift_claimed") => {
                Some(IndexedGiftStatus::Successful)
            }
            (Some(IndexedGiftStatus::Pending), "gift_reclaimed") => {
                Some(IndexedGiftStatus::Reclaimed)
            }
            (current, _) => current,
        }
    })
}
