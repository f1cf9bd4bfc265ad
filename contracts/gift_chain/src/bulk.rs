//! # Bulk creation
//!
//! A batch is all-or-nothing. Every item is validated into a staging vector
//! before anything is written; any rejected item fails the whole batch with
//! [`Error::BulkCreationFailed`]. Only a fully staged batch is committed, and
//! its total is pulled from the creator in one transfer afterwards. If that
//! transfer fails the call errors and the host discards the committed gifts
//! along with it.

use soroban_sdk::{log, Address, BytesN, Env, Map, String, Vec};

use crate::constants::MIN_BULK_SIZE;
use crate::errors::Error;
use crate::gift;
use crate::identity::commit_address;
use crate::token;
use crate::types::GiftConfig;

#[allow(clippy::too_many_arguments)]
pub fn create_bulk(
    env: &Env,
    creator: &Address,
    token: &Address,
    amounts: &Vec<i128>,
    expiries: &Vec<u64>,
    messages: &Vec<String>,
    gift_ids: &Vec<BytesN<32>>,
    creator_hash: &BytesN<32>,
) -> Result<u32, Error> {
    if commit_address(env, creator) != *creator_hash {
        return Err(Error::CreatorMismatch);
    }

    let count = gift_ids.len();
    if amounts.len() != count
        || expiries.len() != count
        || messages.len() != count
        || count < MIN_BULK_SIZE
    {
        return Err(Error::BulkTooSmall);
    }
    token::require_valid_token(env, token)?;

    let (staged, total) = stage_batch(env, token, amounts, expiries, messages, gift_ids, creator_hash)
        .map_err(|err| {
            log!(env, "bulk item rejected", err as u32);
            Error::BulkCreationFailed
        })?;

    for config in staged.iter() {
        gift::commit(env, config);
    }

    token::pull(env, token, creator, total).map_err(|_| Error::BulkCreationFailed)?;

    Ok(count)
}

/// Validate every item; returns the staged configs in input order and the
/// amount the batch needs in custody.
#[allow(clippy::too_many_arguments)]
fn stage_batch(
    env: &Env,
    token: &Address,
    amounts: &Vec<i128>,
    expiries: &Vec<u64>,
    messages: &Vec<String>,
    gift_ids: &Vec<BytesN<32>>,
    creator_hash: &BytesN<32>,
) -> Result<(Vec<GiftConfig>, i128), Error> {
    let mut staged: Vec<GiftConfig> = Vec::new(env);
    let mut seen: Map<BytesN<32>, bool> = Map::new(env);
    let mut total: i128 = 0;

    for i in 0..gift_ids.len() {
        let gift_id = gift_ids.get(i).ok_or(Error::BulkTooSmall)?;
        let amount = amounts.get(i).ok_or(Error::BulkTooSmall)?;
        let expiry = expiries.get(i).ok_or(Error::BulkTooSmall)?;
        let message = messages.get(i).ok_or(Error::BulkTooSmall)?;

        if seen.contains_key(gift_id.clone()) {
            return Err(Error::GiftAlreadyExists);
        }
        seen.set(gift_id.clone(), true);

        let config = gift::stage(env, token, amount, expiry, &message, &gift_id, creator_hash)?;
        total = total.checked_add(amount).ok_or(Error::InvalidAmount)?;
        staged.push_back(config);
    }

    Ok((staged, total))
}
