//! # Identity
//!
//! Gifts and campaigns identify their creators differently: a gift stores
//! `keccak256(xdr(address))`, a campaign stores the address itself. Both are
//! carried as a [`CreatorId`] so that ownership checks go through one place
//! while each subsystem keeps its own convention.
//!
//! Gift ids follow the same commitment scheme: the id of a gift is
//! `keccak256(code)` where `code` is the secret handed to the recipient.

use soroban_sdk::{contracttype, xdr::ToXdr, Address, Bytes, BytesN, Env};

/// Who created a gift or campaign.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CreatorId {
    /// The creator's address, as stored by campaigns.
    Raw(Address),
    /// `keccak256` of the creator's XDR-encoded address, as stored by gifts.
    Commitment(BytesN<32>),
}

impl CreatorId {
    /// True when `caller` is the principal this id refers to.
    pub fn is_held_by(&self, env: &Env, caller: &Address) -> bool {
        match self {
            CreatorId::Raw(address) => address == caller,
            CreatorId::Commitment(hash) => commit_address(env, caller) == *hash,
        }
    }
}

/// Commitment of an address, as stored in `Gift::creator`.
pub fn commit_address(env: &Env, address: &Address) -> BytesN<32> {
    env.crypto().keccak256(&address.clone().to_xdr(env)).to_bytes()
}

/// Commitment of a secret gift code, i.e. the gift id.
pub fn commit_code(env: &Env, raw_code: &Bytes) -> BytesN<32> {
    env.crypto().keccak256(raw_code).to_bytes()
}

// ScVal::Address(ScAddress::Contract([0; 32])) in XDR.
const ZERO_ADDRESS_PREFIX: [u8; 8] = [0, 0, 0, 18, 0, 0, 0, 1];

/// XDR encoding of the all-zero contract address.
pub fn zero_address_xdr(env: &Env) -> Bytes {
    let mut xdr = Bytes::from_array(env, &ZERO_ADDRESS_PREFIX);
    xdr.extend_from_array(&[0u8; 32]);
    xdr
}

pub fn is_zero_address(env: &Env, address: &Address) -> bool {
    address.clone().to_xdr(env) == zero_address_xdr(env)
}
