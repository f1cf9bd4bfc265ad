//! # Contribution pools
//!
//! Anyone may pre-fund a creator's future gifts. A pool is keyed by the
//! creator's address commitment and the token it holds.
//!
//! Contributors own units of a pool rather than fixed amounts, and a unit is
//! worth `total / units` tokens. A gift drawing from the pool only lowers the
//! total, so every contributor's balance falls in proportion to their units.
//! Contributing, withdrawing and drawing each touch a fixed number of ledger
//! entries however many contributors a pool has.
//!
//! Balances round down. Their sum can trail the total by less than one token
//! per contributor, and that remainder stays in the pool for the next gift.
//! When a pool is drawn down to nothing it moves to a new epoch and units from
//! earlier epochs are worth nothing.

use soroban_sdk::{Address, BytesN, Env, I256};

use crate::errors::Error;
use crate::events::{self, ContributionAdded, ContributionRemoved, PoolDrawn};
use crate::storage;
use crate::token;
use crate::types::{PoolShare, PoolState};

/// `a * b / c` with a 256-bit intermediate, rounded down or up.
fn mul_div(env: &Env, a: i128, b: i128, c: i128, round_up: bool) -> Result<i128, Error> {
    if c <= 0 {
        return Err(Error::InvalidAmount);
    }
    let divisor = I256::from_i128(env, c);
    let mut product = I256::from_i128(env, a).mul(&I256::from_i128(env, b));
    if round_up {
        product = product.add(&I256::from_i128(env, c - 1));
    }
    product.div(&divisor).to_i128().ok_or(Error::InvalidAmount)
}

/// The contributor's units in the pool's current epoch.
fn current_share(
    env: &Env,
    pool: &PoolState,
    creator_hash: &BytesN<32>,
    token: &Address,
    contributor: &Address,
) -> PoolShare {
    match storage::get_pool_share(env, creator_hash, token, contributor) {
        Some(share) if share.epoch == pool.epoch => share,
        _ => PoolShare {
            units: 0,
            epoch: pool.epoch,
        },
    }
}

fn balance_of(env: &Env, pool: &PoolState, share: &PoolShare) -> Result<i128, Error> {
    if share.epoch != pool.epoch || share.units == 0 || pool.units == 0 {
        return Ok(0);
    }
    mul_div(env, share.units, pool.total, pool.units, false)
}

/// An emptied pool starts a new epoch with no units issued.
fn settle(pool: &mut PoolState) {
    if pool.total == 0 && pool.units != 0 {
        pool.units = 0;
        pool.epoch += 1;
    }
}

/// Deposit into a pool. Returns the pool total afterwards.
pub fn contribute(
    env: &Env,
    contributor: &Address,
    token: &Address,
    amount: i128,
    creator_hash: &BytesN<32>,
) -> Result<i128, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    token::require_valid_token(env, token)?;

    let mut pool = storage::get_pool(env, creator_hash, token);
    let mut share = current_share(env, &pool, creator_hash, token, contributor);

    let minted = if pool.units == 0 {
        amount
    } else {
        mul_div(env, amount, pool.units, pool.total, false)?
    };
    if minted <= 0 {
        return Err(Error::InvalidAmount);
    }

    share.units = share.units.checked_add(minted).ok_or(Error::InvalidAmount)?;
    pool.units = pool.units.checked_add(minted).ok_or(Error::InvalidAmount)?;
    pool.total = pool.total.checked_add(amount).ok_or(Error::InvalidAmount)?;

    storage::set_pool_share(env, creator_hash, token, contributor, &share);
    storage::set_pool(env, creator_hash, token, &pool);

    token::pull(env, token, contributor, amount)?;

    events::contribution_added(
        env,
        ContributionAdded {
            creator_hash: creator_hash.clone(),
            contributor: contributor.clone(),
            token: token.clone(),
            amount,
            pool_total: pool.total,
        },
    );

    Ok(pool.total)
}

/// Take part or all of a contributor's own balance back out.
/// Returns the pool total afterwards.
pub fn withdraw(
    env: &Env,
    contributor: &Address,
    creator_hash: &BytesN<32>,
    token: &Address,
    amount: i128,
) -> Result<i128, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let mut pool = storage::get_pool(env, creator_hash, token);
    let mut share = current_share(env, &pool, creator_hash, token, contributor);
    if amount > balance_of(env, &pool, &share)? {
        return Err(Error::InsufficientBalance);
    }

    // Burning rounds up so the units left never claim more than is left.
    let burned = mul_div(env, amount, pool.units, pool.total, true)?.min(share.units);
    share.units -= burned;
    pool.units -= burned;
    pool.total -= amount;
    settle(&mut pool);
    if share.epoch != pool.epoch {
        share.units = 0;
    }

    storage::set_pool_share(env, creator_hash, token, contributor, &share);
    storage::set_pool(env, creator_hash, token, &pool);

    token::push(env, token, contributor, amount)?;

    events::contribution_removed(
        env,
        ContributionRemoved {
            creator_hash: creator_hash.clone(),
            contributor: contributor.clone(),
            token: token.clone(),
            amount,
            pool_total: pool.total,
        },
    );

    Ok(pool.total)
}

/// Move up to `wanted` from the pool into the gift `gift_id`.
///
/// The tokens are already in ledger custody, so nothing is transferred; only
/// the pool total changes. Returns how much the pool covered.
pub(crate) fn draw(
    env: &Env,
    creator_hash: &BytesN<32>,
    token: &Address,
    wanted: i128,
    gift_id: &BytesN<32>,
) -> Result<i128, Error> {
    let mut pool = storage::get_pool(env, creator_hash, token);
    if pool.total <= 0 || wanted <= 0 {
        return Ok(0);
    }
    let taken = pool.total.min(wanted);
    pool.total -= taken;
    settle(&mut pool);
    storage::set_pool(env, creator_hash, token, &pool);

    events::pool_drawn(
        env,
        PoolDrawn {
            creator_hash: creator_hash.clone(),
            gift_id: gift_id.clone(),
            token: token.clone(),
            amount: taken,
        },
    );

    Ok(taken)
}

pub fn pool_total(env: &Env, creator_hash: &BytesN<32>, token: &Address) -> i128 {
    storage::get_pool(env, creator_hash, token).total
}

/// What `contributor` could withdraw right now.
pub fn contributor_balance(
    env: &Env,
    creator_hash: &BytesN<32>,
    token: &Address,
    contributor: &Address,
) -> i128 {
    let pool = storage::get_pool(env, creator_hash, token);
    let share = current_share(env, &pool, creator_hash, token, contributor);
    balance_of(env, &pool, &share).unwrap_or(0)
}
