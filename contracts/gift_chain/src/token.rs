//! # Token movements
//!
//! Every transfer into or out of the ledger goes through [`pull`] or [`push`].
//! A token call that panics or returns an error is reported uniformly as
//! [`Error::TransferFailed`], and the per-token custody counter is kept in
//! step with what actually moved.

use soroban_sdk::{log, token::TokenClient, Address, Env};

use crate::errors::Error;
use crate::identity::is_zero_address;
use crate::storage;

/// Reject the zero address and the ledger's own address as a token.
pub fn require_valid_token(env: &Env, token: &Address) -> Result<(), Error> {
    if is_zero_address(env, token) || *token == env.current_contract_address() {
        return Err(Error::InvalidAddress);
    }
    Ok(())
}

/// Move `amount` of `token` from `from` into ledger custody.
pub fn pull(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<(), Error> {
    move_tokens(env, token, from, &env.current_contract_address(), amount)?;
    storage::adjust_custody(env, token, amount)
}

/// Release `amount` of `token` from ledger custody to `to`.
pub fn push(env: &Env, token: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    move_tokens(env, token, &env.current_contract_address(), to, amount)?;
    let released = amount.checked_neg().ok_or(Error::InvalidAmount)?;
    storage::adjust_custody(env, token, released)
}

fn move_tokens(
    env: &Env,
    token: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), Error> {
    if amount == 0 {
        return Ok(());
    }
    let client = TokenClient::new(env, token);
    match client.try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => {
            log!(env, "token transfer failed", token.clone(), from.clone(), amount);
            Err(Error::TransferFailed)
        }
    }
}
