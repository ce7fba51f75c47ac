//! Service configuration
use anyhow::Context;

pub const DEFAULT_OFFER_ID_PREFIX: &str = "offer_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationConfig {
    /// bech32 human readable prefix of generated offer ids
    pub offer_id_prefix: String,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            offer_id_prefix: DEFAULT_OFFER_ID_PREFIX.to_string(),
        }
    }
}

impl NegotiationConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_offer_id_prefix(mut self, prefix: &str) -> Self {
        self.offer_id_prefix = prefix.to_string();
        self
    }
    pub fn validate(&self) -> anyhow::Result<()> {
        bech32::Hrp::parse(&self.offer_id_prefix).with_context(|| {
            format!(
                "offer id prefix {:?} is not a valid bech32 prefix",
                self.offer_id_prefix
            )
        })?;
        Ok(())
    }
}
