//! # Gift lifecycle
//!
//! Creation, claim, reclaim and validation of single gifts. Each transition
//! runs its guards first, then writes the new state, then moves tokens. A
//! token failure returns an error and the host discards the whole call, so a
//! half-applied transition is never observable.

use soroban_sdk::{log, Address, Bytes, BytesN, Env, String};

use crate::constants::{MAX_MESSAGE_BYTES, MAX_MESSAGE_LEN, MIN_MESSAGE_LEN};
use crate::errors::Error;
use crate::events::{self, GiftClaimed, GiftCreated, GiftReclaimed};
use crate::identity::commit_code;
use crate::pool;
use crate::storage;
use crate::token;
use crate::types::{Gift, GiftConfig, GiftState, GiftStatus};

/// Check a gift message: 3 to 50 characters of UTF-8, none of them control
/// characters. Length is counted in characters, not bytes.
pub fn validate_message(message: &String) -> Result<(), Error> {
    let len = message.len();
    if len < MIN_MESSAGE_LEN || len > MAX_MESSAGE_BYTES {
        return Err(Error::InvalidMessageLength);
    }
    let mut buf = [0u8; MAX_MESSAGE_BYTES as usize];
    let bytes = &mut buf[..len as usize];
    message.copy_into_slice(bytes);
    let text = core::str::from_utf8(bytes).map_err(|_| Error::InvalidMessageLength)?;

    let mut chars = 0u32;
    for c in text.chars() {
        if c.is_control() {
            return Err(Error::InvalidMessageLength);
        }
        chars += 1;
    }
    if !(MIN_MESSAGE_LEN..=MAX_MESSAGE_LEN).contains(&chars) {
        return Err(Error::InvalidMessageLength);
    }
    Ok(())
}

/// Validate one prospective gift and build its config.
///
/// The token is checked by the caller since a batch shares one token.
pub(crate) fn stage(
    env: &Env,
    token: &Address,
    amount: i128,
    expiry: u64,
    message: &String,
    gift_id: &BytesN<32>,
    creator_hash: &BytesN<32>,
) -> Result<GiftConfig, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    let now = env.ledger().timestamp();
    if expiry <= now {
        return Err(Error::ExpiryNotInFuture);
    }
    validate_message(message)?;
    if storage::has_gift(env, gift_id) {
        return Err(Error::GiftAlreadyExists);
    }

    Ok(GiftConfig {
        gift_id: gift_id.clone(),
        token: token.clone(),
        amount,
        message: message.clone(),
        expiry,
        time_created: now,
        creator: creator_hash.clone(),
    })
}

/// Persist a staged gift as `Pending` and announce it.
pub(crate) fn commit(env: &Env, config: GiftConfig) -> Gift {
    let state = GiftState {
        status: GiftStatus::Pending,
        claimed: false,
        recipient: None,
    };
    storage::save_gift(env, &config, &state);

    events::gift_created(
        env,
        GiftCreated {
            gift_id: config.gift_id.clone(),
            creator: config.creator.clone(),
            token: config.token.clone(),
            message: config.message.clone(),
            amount: config.amount,
            expiry: config.expiry,
            time_created: config.time_created,
            status: GiftStatus::Pending,
        },
    );

    Gift::from_parts(config, state)
}

/// Relayer-only single gift creation.
///
/// Funding comes from the creator's contribution pool first; only the
/// remainder is pulled from the relayer.
#[allow(clippy::too_many_arguments)]
pub fn create(
    env: &Env,
    relayer: &Address,
    token: &Address,
    amount: i128,
    expiry: u64,
    message: &String,
    gift_id: &BytesN<32>,
    creator_hash: &BytesN<32>,
) -> Result<Gift, Error> {
    let configured = storage::get_relayer(env).ok_or(Error::OnlyRelayerHasAccess)?;
    if *relayer != configured {
        return Err(Error::OnlyRelayerHasAccess);
    }
    token::require_valid_token(env, token)?;

    let config = stage(env, token, amount, expiry, message, gift_id, creator_hash)?;
    let gift = commit(env, config);

    let from_pool = pool::draw(env, creator_hash, token, amount, gift_id)?;
    let shortfall = amount - from_pool;
    token::pull(env, token, relayer, shortfall)?;

    Ok(gift)
}

fn load(env: &Env, gift_id: &BytesN<32>) -> Result<(GiftConfig, GiftState), Error> {
    let config = storage::load_gift_config(env, gift_id).ok_or(Error::GiftNotFound)?;
    let state = storage::load_gift_state(env, gift_id).ok_or(Error::GiftNotFound)?;
    Ok((config, state))
}

pub fn get(env: &Env, gift_id: &BytesN<32>) -> Result<Gift, Error> {
    let (config, state) = load(env, gift_id)?;
    Ok(Gift::from_parts(config, state))
}

pub fn status(env: &Env, gift_id: &BytesN<32>) -> GiftStatus {
    storage::load_gift_state(env, gift_id)
        .map(|state| state.status)
        .unwrap_or(GiftStatus::None)
}

pub fn is_expired(env: &Env, gift_id: &BytesN<32>) -> Result<bool, Error> {
    let config = storage::load_gift_config(env, gift_id).ok_or(Error::GiftNotFound)?;
    Ok(env.ledger().timestamp() >= config.expiry)
}

/// Hand the gift's tokens to `recipient`. Anyone holding the id may claim,
/// including the creator, as long as the gift is pending and unexpired.
pub fn claim(env: &Env, recipient: &Address, gift_id: &BytesN<32>) -> Result<Gift, Error> {
    let (config, mut state) = load(env, gift_id)?;

    match state.status {
        GiftStatus::Pending => {}
        GiftStatus::Successful => return Err(Error::InvalidGiftStatus),
        GiftStatus::Reclaimed => return Err(Error::GiftAlreadyReclaimed),
        GiftStatus::None => return Err(Error::GiftNotFound),
    }

    if env.ledger().timestamp() >= config.expiry {
        log!(env, "claim after expiry", config.expiry);
        return Err(Error::GiftExpired);
    }

    state.status = GiftStatus::Successful;
    state.claimed = true;
    state.recipient = Some(recipient.clone());
    storage::save_gift_state(env, gift_id, &state);

    token::push(env, &config.token, recipient, config.amount)?;

    events::gift_claimed(
        env,
        GiftClaimed {
            gift_id: gift_id.clone(),
            recipient: recipient.clone(),
            amount: config.amount,
            status: GiftStatus::Successful,
        },
    );

    Ok(Gift::from_parts(config, state))
}

/// Return an expired, unclaimed gift to its creator.
///
/// Status is checked before identity and time so that a gift in a terminal
/// state rejects every reclaim with the same error.
pub fn reclaim(env: &Env, creator: &Address, gift_id: &BytesN<32>) -> Result<Gift, Error> {
    let (config, mut state) = load(env, gift_id)?;

    match state.status {
        GiftStatus::Pending => {}
        GiftStatus::Successful => return Err(Error::GiftAlreadyRedeemed),
        GiftStatus::Reclaimed => return Err(Error::GiftAlreadyReclaimed),
        GiftStatus::None => return Err(Error::GiftNotFound),
    }

    if !config.creator_id().is_held_by(env, creator) {
        return Err(Error::NotCreator);
    }

    if env.ledger().timestamp() < config.expiry {
        return Err(Error::GiftNotExpired);
    }

    state.status = GiftStatus::Reclaimed;
    state.claimed = true;
    storage::save_gift_state(env, gift_id, &state);

    token::push(env, &config.token, creator, config.amount)?;

    events::gift_reclaimed(
        env,
        GiftReclaimed {
            gift_id: gift_id.clone(),
            creator: creator.clone(),
            amount: config.amount,
        },
    );

    Ok(Gift::from_parts(config, state))
}

/// `true` when the code names a pending gift; otherwise the reason it does not.
/// Expiry is not considered.
pub fn validate(env: &Env, raw_code: &Bytes) -> Result<bool, Error> {
    let gift_id = commit_code(env, raw_code);
    match status(env, &gift_id) {
        GiftStatus::Pending => Ok(true),
        GiftStatus::Successful => Err(Error::GiftAlreadyRedeemed),
        GiftStatus::Reclaimed => Err(Error::GiftAlreadyReclaimed),
        GiftStatus::None => Err(Error::GiftNotFound),
    }
}
