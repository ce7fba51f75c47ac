//! The offer aggregate and its append-only history
use super::details::{OfferDetails, TimeStamp};
use super::error::NegotiationError;
use super::rules;
use super::types::{Action, Role, State};
use super::utils::IdGenerator;
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Annotations an actor attaches to an offer. Replaced wholesale on update.
pub type PrivateData = BTreeMap<String, String>;

/// One version of an offer. Never modified once appended.
#[derive(Debug, Clone, PartialEq, minicbor::Encode, minicbor::Decode)]
pub struct HistoryEntry {
    #[n(0)]
    pub offer_details: OfferDetails,
    #[n(1)]
    pub state: State,
    #[n(2)]
    pub action: Action,
    #[n(3)]
    pub actor_id: String,
    #[n(4)]
    pub private_data: PrivateData,
    #[n(5)]
    pub recorded_at: TimeStamp<Utc>, // issued when the entry is appended
}

#[derive(Debug)]
pub struct Offer {
    id: String,
    buyer_id: String,
    seller_id: String,
    current_state: State,
    history: Vec<HistoryEntry>, // index + 1 is the version
}

impl HistoryEntry {
    pub fn new(
        offer_details: OfferDetails,
        state: State,
        action: Action,
        actor_id: String,
        private_data: PrivateData,
    ) -> Self {
        Self {
            offer_details,
            state,
            action,
            actor_id,
            private_data,
            recorded_at: TimeStamp::new(),
        }
    }
    /// Encodes the entry into CBOR and returns it alongside its sha256 digest.
    pub fn build(&self) -> anyhow::Result<(String, Vec<u8>)> {
        let cbor = minicbor::to_vec(self)?;
        let hash = sha256::digest(cbor.as_slice());

        Ok((hash, cbor))
    }
}

impl Offer {
    /// Validates `details`, draws a fresh id and seeds the history with the submit entry.
    pub fn create(
        id_generator: &dyn IdGenerator,
        buyer_id: &str,
        seller_id: &str,
        details: OfferDetails,
    ) -> Result<Self, NegotiationError> {
        details.validate()?;

        let id = id_generator
            .next_id()
            .map_err(|err| NegotiationError::IdGeneration(err.to_string()))?;

        let submit = HistoryEntry::new(
            details,
            State::AwaitingSellerAcceptance,
            Action::Submit,
            buyer_id.to_string(),
            PrivateData::new(),
        );

        info!(offer_id = %id, buyer_id, seller_id, "offer created");

        Ok(Self {
            id,
            buyer_id: buyer_id.to_string(),
            seller_id: seller_id.to_string(),
            current_state: State::AwaitingSellerAcceptance,
            history: vec![submit],
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn buyer_id(&self) -> &str {
        &self.buyer_id
    }
    pub fn seller_id(&self) -> &str {
        &self.seller_id
    }
    pub fn current_state(&self) -> State {
        self.current_state
    }
    pub fn is_buyer(&self, actor_id: &str) -> bool {
        self.buyer_id == actor_id
    }
    pub fn role_of(&self, actor_id: &str) -> Role {
        Role::from_is_buyer(self.is_buyer(actor_id))
    }
    /// Read-only view of every version, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
    /// Number of versions recorded so far.
    pub fn version(&self) -> usize {
        self.history.len()
    }
    /// 1-indexed lookup of a single version.
    pub fn entry(&self, version: usize) -> Option<&HistoryEntry> {
        version.checked_sub(1).and_then(|idx| self.history.get(idx))
    }
    pub fn latest(&self) -> &HistoryEntry {
        // history is seeded on creation and only ever grows
        &self.history[self.history.len() - 1]
    }
    pub fn latest_details(&self) -> &OfferDetails {
        &self.latest().offer_details
    }
    pub fn private_data(&self) -> &PrivateData {
        &self.latest().private_data
    }

    /// Moves the offer to `target` after checking the action table and then the
    /// transition table for `role`. Nothing is recorded unless both pass.
    pub fn transition(
        &mut self,
        target: State,
        action: Action,
        actor_id: &str,
        details: OfferDetails,
        role: Role,
    ) -> Result<(), NegotiationError> {
        rules::check_action(self.current_state, action, role)?;
        rules::check_transition(self.current_state, target, role)?;
        details.validate()?;

        let entry = HistoryEntry::new(
            details,
            target,
            action,
            actor_id.to_string(),
            self.private_data().clone(),
        );

        info!(
            offer_id = %self.id,
            from = %self.current_state,
            to = %target,
            %action,
            actor_id,
            "offer transitioned"
        );

        self.history.push(entry);
        self.current_state = target;

        Ok(())
    }

    /// Appends a copy of the latest version with `data` as its private data.
    /// Permitted from every state; the offer's state is left untouched.
    pub fn update_private_data(&mut self, actor_id: &str, data: PrivateData) {
        debug_assert!(rules::is_action_permitted(
            self.current_state,
            Action::UpdatePrivateData,
            self.role_of(actor_id)
        ));

        let latest = self.latest();
        let entry = HistoryEntry::new(
            latest.offer_details.clone(),
            latest.state,
            Action::UpdatePrivateData,
            actor_id.to_string(),
            data,
        );

        debug!(offer_id = %self.id, actor_id, keys = entry.private_data.len(), "private data replaced");

        self.history.push(entry);
    }

    /// CBOR encoding and digest of every version, in order, for archival.
    pub fn export_history(&self) -> anyhow::Result<Vec<(String, Vec<u8>)>> {
        self.history.iter().map(HistoryEntry::build).collect()
    }
}
