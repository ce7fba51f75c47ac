//! Role-indexed rule tables for the negotiation workflow
//!
//! Two independent lookups guard every state change: which actions a role may
//! take from a state, and which states a role may move the offer into. The
//! tables are plain `match` expressions so they are fixed at compile time.
use super::error::NegotiationError;
use super::types::{Action, Role, State};
use tracing::debug;

use Action::*;
use State::*;

/// Actions `role` may perform while the offer is in `state`.
pub fn permitted_actions(state: State, role: Role) -> &'static [Action] {
    match (state, role) {
        (AwaitingSellerAcceptance, Role::Buyer) => &[Withdraw, Cancel, UpdatePrivateData],
        (AwaitingSellerAcceptance, Role::Seller) => {
            &[Accept, Cancel, ProposeUpdate, UpdatePrivateData]
        }
        (AwaitingBuyerAcceptance, Role::Buyer) => &[Accept, Cancel, ProposeUpdate, UpdatePrivateData],
        (AwaitingBuyerAcceptance, Role::Seller) => &[Withdraw, Cancel, UpdatePrivateData],
        (WithdrawnBySeller, Role::Buyer) => &[Cancel, UpdatePrivateData],
        (WithdrawnBySeller, Role::Seller) => &[Cancel, ProposeUpdate, UpdatePrivateData],
        (WithdrawnByBuyer, Role::Buyer) => &[Cancel, ProposeUpdate, UpdatePrivateData],
        (WithdrawnByBuyer, Role::Seller) => &[Cancel, UpdatePrivateData],
        (Accepted, _) | (Cancelled, _) => &[UpdatePrivateData],
    }
}

/// States `role` may move the offer into from `state`.
pub fn permitted_transitions(state: State, role: Role) -> &'static [State] {
    match (state, role) {
        (AwaitingSellerAcceptance, Role::Buyer) => &[WithdrawnByBuyer, Cancelled],
        (AwaitingSellerAcceptance, Role::Seller) => {
            &[Accepted, Cancelled, AwaitingBuyerAcceptance]
        }
        (AwaitingBuyerAcceptance, Role::Buyer) => {
            &[Accepted, Cancelled, AwaitingSellerAcceptance]
        }
        (AwaitingBuyerAcceptance, Role::Seller) => &[WithdrawnBySeller, Cancelled],
        (Accepted, _) | (Cancelled, _) => &[],
        (WithdrawnByBuyer, Role::Buyer) => &[AwaitingSellerAcceptance, Cancelled],
        (WithdrawnByBuyer, Role::Seller) => &[Cancelled],
        (WithdrawnBySeller, Role::Buyer) => &[Cancelled],
        (WithdrawnBySeller, Role::Seller) => &[AwaitingBuyerAcceptance, Cancelled],
    }
}

pub fn is_action_permitted(state: State, action: Action, role: Role) -> bool {
    permitted_actions(state, role).contains(&action)
}

pub fn is_transition_permitted(state: State, next: State, role: Role) -> bool {
    permitted_transitions(state, role).contains(&next)
}

/// Fails with [`NegotiationError::ActionNotPermitted`] when `action` is outside
/// the role's permitted set for `state`.
pub fn check_action(state: State, action: Action, role: Role) -> Result<(), NegotiationError> {
    if !is_action_permitted(state, action, role) {
        return Err(NegotiationError::ActionNotPermitted { action, state });
    }
    debug!(%state, %action, %role, "action permitted");
    Ok(())
}

/// Fails with [`NegotiationError::IllegalStateTransition`] when `next` is outside
/// the role's allowed destinations from `state`.
pub fn check_transition(state: State, next: State, role: Role) -> Result<(), NegotiationError> {
    if !is_transition_permitted(state, next, role) {
        return Err(NegotiationError::IllegalStateTransition {
            from: state,
            to: next,
        });
    }
    debug!(from = %state, to = %next, %role, "transition permitted");
    Ok(())
}
