//! # Errors
//!
//! Every rejection the ledger can produce. Variants are grouped by the kind of
//! check that raises them; the discriminants are part of the contract ABI and
//! must never be renumbered.

use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ── Authorization ───────────────────────────────────────
    /// `create_gift` called by anyone but the configured relayer.
    OnlyRelayerHasAccess = 1,
    /// Bulk creator's address does not hash to the supplied creator hash.
    CreatorMismatch = 2,
    /// Campaign withdrawal attempted by someone other than its creator.
    NotAuthorizedToWithdraw = 3,
    /// Reclaim attempted by someone other than the gift creator.
    NotCreator = 4,

    // ── Validation ──────────────────────────────────────────
    InvalidAddress = 5,
    InvalidAmount = 6,
    InvalidTitle = 7,
    InvalidDescription = 8,
    /// Gift message must be 3 to 50 printable characters.
    InvalidMessageLength = 9,
    ExpiryNotInFuture = 10,
    /// Bulk vectors differ in length or hold fewer than five items.
    BulkTooSmall = 11,

    // ── State conflicts ─────────────────────────────────────
    GiftAlreadyExists = 12,
    CampaignAlreadyExists = 13,
    GiftNotFound = 14,
    CampaignNotFound = 15,
    GiftAlreadyRedeemed = 16,
    GiftAlreadyReclaimed = 17,
    InvalidGiftStatus = 18,
    FundsAlreadyWithdrawn = 19,

    // ── Temporal ────────────────────────────────────────────
    GiftExpired = 20,
    GiftNotExpired = 21,
    CampaignExpired = 22,
    CampaignNotEnded = 23,

    // ── Resources ───────────────────────────────────────────
    InsufficientBalance = 24,
    TransferFailed = 25,
    ExceedsCampaignGoal = 26,

    // ── Batch ───────────────────────────────────────────────
    /// Any item of a bulk creation failed; nothing from the batch persists.
    BulkCreationFailed = 27,
}
