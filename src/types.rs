//! Closed vocabularies of the negotiation workflow: offer states, actions and roles
use std::fmt;

/// Where an offer currently sits in the negotiation.
#[derive(
    minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum State {
    #[n(0)]
    AwaitingSellerAcceptance,
    #[n(1)]
    AwaitingBuyerAcceptance,
    #[n(2)]
    Accepted,
    #[n(3)]
    Cancelled,
    #[n(4)]
    WithdrawnByBuyer,
    #[n(5)]
    WithdrawnBySeller,
}

#[derive(
    minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum Action {
    #[n(0)]
    Submit,
    #[n(1)]
    Accept,
    #[n(2)]
    Cancel,
    #[n(3)]
    ProposeUpdate,
    #[n(4)]
    Withdraw,
    #[n(5)]
    UpdatePrivateData,
}

/// The side an actor takes on a given offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Buyer,
    Seller,
}

impl State {
    pub const ALL: [State; 6] = [
        State::AwaitingSellerAcceptance,
        State::AwaitingBuyerAcceptance,
        State::Accepted,
        State::Cancelled,
        State::WithdrawnByBuyer,
        State::WithdrawnBySeller,
    ];

    /// Accepted and Cancelled have no outgoing transitions for either role.
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Accepted | State::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            State::AwaitingSellerAcceptance => "AWAITING_SELLER_ACCEPTANCE",
            State::AwaitingBuyerAcceptance => "AWAITING_BUYER_ACCEPTANCE",
            State::Accepted => "ACCEPTED",
            State::Cancelled => "CANCELLED",
            State::WithdrawnByBuyer => "WITHDRAWN_BY_BUYER",
            State::WithdrawnBySeller => "WITHDRAWN_BY_SELLER",
        }
    }
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Submit,
        Action::Accept,
        Action::Cancel,
        Action::ProposeUpdate,
        Action::Withdraw,
        Action::UpdatePrivateData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Submit => "SUBMIT",
            Action::Accept => "ACCEPT",
            Action::Cancel => "CANCEL",
            Action::ProposeUpdate => "PROPOSE_UPDATE",
            Action::Withdraw => "WITHDRAW",
            Action::UpdatePrivateData => "UPDATE_PRIVATE_DATA",
        }
    }
}

impl Role {
    pub fn from_is_buyer(is_buyer: bool) -> Self {
        if is_buyer { Role::Buyer } else { Role::Seller }
    }

    /// State an offer moves to when this role proposes new terms.
    pub fn proposal_target(&self) -> State {
        match self {
            Role::Buyer => State::AwaitingSellerAcceptance,
            Role::Seller => State::AwaitingBuyerAcceptance,
        }
    }

    /// State an offer moves to when this role withdraws.
    pub fn withdrawal_target(&self) -> State {
        match self {
            Role::Buyer => State::WithdrawnByBuyer,
            Role::Seller => State::WithdrawnBySeller,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Buyer => f.write_str("buyer"),
            Role::Seller => f.write_str("seller"),
        }
    }
}
