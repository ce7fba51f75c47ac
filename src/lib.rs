//! Two-party offer negotiation with a versioned audit trail
pub mod config;
pub mod dashboard;
pub mod details;
pub mod error;
pub mod offer;
pub mod rules;
pub mod service;
pub mod types;
pub mod utils;

pub use dashboard::{DashboardRow, DashboardService};
pub use details::OfferDetails;
pub use error::NegotiationError;
pub use offer::{HistoryEntry, Offer, PrivateData};
pub use service::NegotiationService;
pub use types::{Action, Role, State};
