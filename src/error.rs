use crate::types::{Action, State};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NegotiationError {
    #[error("Invalid user id: {0:?}")]
    InvalidUser(String),
    #[error("No offer found for user {0}")]
    OfferNotFound(String),
    #[error("Invalid offer details: {0}")]
    InvalidOfferDetails(String),
    #[error("Cannot perform {action} from current state: {state}")]
    ActionNotPermitted { action: Action, state: State },
    #[error("Illegal state transition from {from} to {to}")]
    IllegalStateTransition { from: State, to: State },
    #[error("Invalid version {requested}, offer has {available} versions")]
    InvalidVersion { requested: usize, available: usize },
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
    #[error("Failed to generate offer id: {0}")]
    IdGeneration(String),
}
