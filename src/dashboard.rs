//! Read-only, versioned view over an offer's history
use super::error::NegotiationError;
use super::offer::{HistoryEntry, Offer};
use super::service::NegotiationService;
use super::types::{Action, State};
use tracing::debug;

/// One version of an offer as presented on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRow {
    pub version: usize,
    pub action: Action,
    pub actor_id: String, // who recorded this version
    pub state: State,
    pub product_name: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub total_price: f64,
}

impl DashboardRow {
    fn from_entry(version: usize, entry: &HistoryEntry, offer: &Offer) -> Self {
        Self {
            version,
            action: entry.action,
            actor_id: entry.actor_id.clone(),
            state: entry.state,
            product_name: entry.offer_details.product_name().to_string(),
            buyer_id: offer.buyer_id().to_string(),
            seller_id: offer.seller_id().to_string(),
            total_price: entry.offer_details.total_price(),
        }
    }
}

pub struct DashboardService<'a> {
    negotiation: &'a NegotiationService,
}

impl<'a> DashboardService<'a> {
    pub fn new(negotiation: &'a NegotiationService) -> Self {
        Self { negotiation }
    }

    fn check_version(offer: &Offer, version: usize) -> Result<(), NegotiationError> {
        if version < 1 || version > offer.version() {
            return Err(NegotiationError::InvalidVersion {
                requested: version,
                available: offer.version(),
            });
        }
        Ok(())
    }

    /// Every version of the actor's offer, oldest first.
    pub fn get_history(&self, actor_id: &str) -> Result<Vec<DashboardRow>, NegotiationError> {
        let offer = self.negotiation.offer_for(actor_id)?;
        debug!(offer_id = %offer.id(), versions = offer.version(), "building dashboard");

        Ok(offer
            .history()
            .iter()
            .enumerate()
            .map(|(idx, entry)| DashboardRow::from_entry(idx + 1, entry, offer))
            .collect())
    }

    /// A single 1-indexed version of the actor's offer.
    pub fn get_history_version(
        &self,
        actor_id: &str,
        version: usize,
    ) -> Result<DashboardRow, NegotiationError> {
        let offer = self.negotiation.offer_for(actor_id)?;
        Self::check_version(offer, version)?;

        offer
            .entry(version)
            .map(|entry| DashboardRow::from_entry(version, entry, offer))
            .ok_or(NegotiationError::InvalidVersion {
                requested: version,
                available: offer.version(),
            })
    }

    /// Comparison of two versions. Reserved; no diff format is defined yet, so
    /// a well-formed request is rejected with [`NegotiationError::NotImplemented`].
    pub fn get_difference(
        &self,
        actor_id: &str,
        version1: usize,
        version2: usize,
    ) -> Result<(), NegotiationError> {
        let offer = self.negotiation.offer_for(actor_id)?;
        Self::check_version(offer, version1)?;
        Self::check_version(offer, version2)?;

        Err(NegotiationError::NotImplemented("get_difference"))
    }
}
