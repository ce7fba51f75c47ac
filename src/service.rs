//! Service layer API for offer negotiation operations
use super::config::NegotiationConfig;
use super::details::OfferDetails;
use super::error::NegotiationError;
use super::offer::{Offer, PrivateData};
use super::types::{Action, Role, State};
use super::utils::{Bech32IdGenerator, IdGenerator};
use std::collections::HashMap;
use tracing::{info, warn};

pub struct NegotiationService {
    id_generator: Box<dyn IdGenerator + Send + Sync>,
    offers: HashMap<String, Offer>,
    buyer_to_offer: HashMap<String, String>,
    seller_to_offer: HashMap<String, String>,
}

impl NegotiationService {
    /// Service with the default configuration.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(NegotiationConfig::default())
    }

    pub fn with_config(config: NegotiationConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let generator = Bech32IdGenerator::new(&config.offer_id_prefix)?;
        Ok(Self::with_id_generator(generator))
    }

    pub fn with_id_generator(id_generator: impl IdGenerator + Send + Sync + 'static) -> Self {
        Self {
            id_generator: Box::new(id_generator),
            offers: HashMap::new(),
            buyer_to_offer: HashMap::new(),
            seller_to_offer: HashMap::new(),
        }
    }

    fn validate_user(user_id: &str) -> Result<(), NegotiationError> {
        if user_id.is_empty() {
            warn!("rejected request with an empty user id");
            return Err(NegotiationError::InvalidUser(user_id.to_string()));
        }
        Ok(())
    }

    /// Offer by the id returned from [`submit`](Self::submit).
    pub fn offer(&self, offer_id: &str) -> Option<&Offer> {
        self.offers.get(offer_id)
    }

    /// Resolves `actor_id` as a buyer first, then as a seller.
    pub fn offer_for(&self, actor_id: &str) -> Result<&Offer, NegotiationError> {
        Self::validate_user(actor_id)?;
        let offer_id = self.resolve_offer_id(actor_id)?;

        self.offers
            .get(offer_id)
            .ok_or_else(|| NegotiationError::OfferNotFound(actor_id.to_string()))
    }

    fn resolve_offer_id(&self, actor_id: &str) -> Result<&str, NegotiationError> {
        self.buyer_to_offer
            .get(actor_id)
            .or_else(|| self.seller_to_offer.get(actor_id))
            .map(String::as_str)
            .ok_or_else(|| {
                warn!(actor_id, "no offer registered for user");
                NegotiationError::OfferNotFound(actor_id.to_string())
            })
    }

    fn offer_for_mut(&mut self, actor_id: &str) -> Result<&mut Offer, NegotiationError> {
        Self::validate_user(actor_id)?;
        let offer_id = self.resolve_offer_id(actor_id)?.to_string();

        self.offers
            .get_mut(&offer_id)
            .ok_or_else(|| NegotiationError::OfferNotFound(actor_id.to_string()))
    }

    /// Opens a new offer from `buyer_id` to `seller_id` and returns its id.
    ///
    /// Both users are (re)registered against the new offer, replacing any
    /// offer they were previously mapped to.
    pub fn submit(
        &mut self,
        buyer_id: &str,
        seller_id: &str,
        details: OfferDetails,
    ) -> Result<String, NegotiationError> {
        details.validate()?;
        Self::validate_user(buyer_id)?;
        Self::validate_user(seller_id)?;

        let offer = Offer::create(&*self.id_generator, buyer_id, seller_id, details)?;
        let offer_id = offer.id().to_string();

        if let Some(previous) = self.buyer_to_offer.get(buyer_id) {
            info!(buyer_id, previous = %previous, "buyer re-registered to a new offer");
        }
        if let Some(previous) = self.seller_to_offer.get(seller_id) {
            info!(seller_id, previous = %previous, "seller re-registered to a new offer");
        }

        self.buyer_to_offer
            .insert(buyer_id.to_string(), offer_id.clone());
        self.seller_to_offer
            .insert(seller_id.to_string(), offer_id.clone());
        self.offers.insert(offer_id.clone(), offer);

        Ok(offer_id)
    }

    // Shared path for every state-changing operation. The destination is derived
    // from the actor's role before either table is consulted.
    fn apply(
        &mut self,
        actor_id: &str,
        action: Action,
        target: impl FnOnce(Role) -> State,
        details: Option<OfferDetails>,
    ) -> Result<(), NegotiationError> {
        let offer = self.offer_for_mut(actor_id)?;
        let role = offer.role_of(actor_id);
        let target = target(role);
        let details = details.unwrap_or_else(|| offer.latest_details().clone());
        let offer_id = offer.id().to_string();

        offer
            .transition(target, action, actor_id, details, role)
            .inspect_err(|err| {
                warn!(%offer_id, actor_id, %action, %role, %err, "operation rejected")
            })
    }

    pub fn accept(&mut self, actor_id: &str) -> Result<(), NegotiationError> {
        self.apply(actor_id, Action::Accept, |_| State::Accepted, None)
    }

    pub fn cancel(&mut self, actor_id: &str) -> Result<(), NegotiationError> {
        self.apply(actor_id, Action::Cancel, |_| State::Cancelled, None)
    }

    /// Counter-proposes new terms, handing the decision to the other side.
    pub fn propose_update(
        &mut self,
        actor_id: &str,
        details: OfferDetails,
    ) -> Result<(), NegotiationError> {
        self.apply(
            actor_id,
            Action::ProposeUpdate,
            |role| role.proposal_target(),
            Some(details),
        )
    }

    pub fn withdraw(&mut self, actor_id: &str) -> Result<(), NegotiationError> {
        self.apply(
            actor_id,
            Action::Withdraw,
            |role| role.withdrawal_target(),
            None,
        )
    }

    /// Replaces the offer's private data. Allowed in every state, including terminal ones.
    pub fn update_private_data(
        &mut self,
        actor_id: &str,
        data: PrivateData,
    ) -> Result<(), NegotiationError> {
        let offer = self.offer_for_mut(actor_id)?;
        offer.update_private_data(actor_id, data);
        Ok(())
    }
}
