//! # Campaigns
//!
//! Goal-capped crowdfunding. Donations are taken strictly before the deadline
//! and never push `raised_amount` past the goal; a donation that would is
//! rejected whole. After the deadline the creator withdraws once.

use soroban_sdk::{Address, BytesN, Env, String};

use crate::constants::{MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};
use crate::errors::Error;
use crate::events::{self, CampaignCreated, ContributionWithdrawn, DonationReceived};
use crate::storage;
use crate::token;
use crate::types::{Campaign, CampaignConfig, CampaignState};

#[allow(clippy::too_many_arguments)]
pub fn create(
    env: &Env,
    creator: &Address,
    title: &String,
    description: &String,
    token: &Address,
    goal: i128,
    deadline: u64,
    campaign_id: &BytesN<32>,
) -> Result<Campaign, Error> {
    if title.is_empty() || title.len() > MAX_TITLE_LEN {
        return Err(Error::InvalidTitle);
    }
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(Error::InvalidDescription);
    }
    if goal <= 0 {
        return Err(Error::InvalidAmount);
    }
    if deadline <= env.ledger().timestamp() {
        return Err(Error::ExpiryNotInFuture);
    }
    token::require_valid_token(env, token)?;
    if storage::has_campaign(env, campaign_id) {
        return Err(Error::CampaignAlreadyExists);
    }

    let config = CampaignConfig {
        campaign_id: campaign_id.clone(),
        creator: creator.clone(),
        token: token.clone(),
        title: title.clone(),
        description: description.clone(),
        goal,
        deadline,
    };
    let state = CampaignState {
        raised_amount: 0,
        withdrawn: false,
        donor_count: 0,
    };
    storage::save_campaign(env, &config, &state);

    events::campaign_created(
        env,
        CampaignCreated {
            campaign_id: campaign_id.clone(),
            creator: creator.clone(),
            token: token.clone(),
            goal,
            deadline,
        },
    );

    Ok(Campaign::from_parts(config, state))
}

fn load(env: &Env, campaign_id: &BytesN<32>) -> Result<(CampaignConfig, CampaignState), Error> {
    let config = storage::load_campaign_config(env, campaign_id).ok_or(Error::CampaignNotFound)?;
    let state = storage::load_campaign_state(env, campaign_id).ok_or(Error::CampaignNotFound)?;
    Ok((config, state))
}

pub fn get(env: &Env, campaign_id: &BytesN<32>) -> Result<Campaign, Error> {
    let (config, state) = load(env, campaign_id)?;
    Ok(Campaign::from_parts(config, state))
}

pub fn donate(
    env: &Env,
    donor: &Address,
    campaign_id: &BytesN<32>,
    amount: i128,
) -> Result<Campaign, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    let (config, mut state) = load(env, campaign_id)?;

    let raised = state
        .raised_amount
        .checked_add(amount)
        .ok_or(Error::ExceedsCampaignGoal)?;
    if raised > config.goal {
        return Err(Error::ExceedsCampaignGoal);
    }
    if env.ledger().timestamp() >= config.deadline {
        return Err(Error::CampaignExpired);
    }

    let previous = storage::get_donation(env, campaign_id, donor);
    if previous == 0 {
        state.donor_count += 1;
    }
    storage::set_donation(env, campaign_id, donor, previous + amount);
    state.raised_amount = raised;
    storage::save_campaign_state(env, campaign_id, &state);

    token::pull(env, &config.token, donor, amount)?;

    events::donation_received(
        env,
        DonationReceived {
            campaign_id: campaign_id.clone(),
            donor: donor.clone(),
            amount,
            raised_amount: raised,
        },
    );

    Ok(Campaign::from_parts(config, state))
}

/// Pay the raised amount out to the creator. Returns the amount paid.
pub fn withdraw(env: &Env, creator: &Address, campaign_id: &BytesN<32>) -> Result<i128, Error> {
    let (config, mut state) = load(env, campaign_id)?;

    if env.ledger().timestamp() < config.deadline {
        return Err(Error::CampaignNotEnded);
    }
    if !config.creator_id().is_held_by(env, creator) {
        return Err(Error::NotAuthorizedToWithdraw);
    }
    if state.withdrawn {
        return Err(Error::FundsAlreadyWithdrawn);
    }

    state.withdrawn = true;
    storage::save_campaign_state(env, campaign_id, &state);

    token::push(env, &config.token, creator, state.raised_amount)?;

    events::contribution_withdrawn(
        env,
        ContributionWithdrawn {
            campaign_id: campaign_id.clone(),
            creator: creator.clone(),
            amount: state.raised_amount,
        },
    );

    Ok(state.raised_amount)
}

pub fn donation_of(env: &Env, campaign_id: &BytesN<32>, donor: &Address) -> i128 {
    storage::get_donation(env, campaign_id, donor)
}
