//! Offer terms and timestamps
use super::error::NegotiationError;
use chrono::{DateTime, TimeZone, Utc};

// The commercial terms of an offer. Constructed freely, validated when the
// offer is created or a new proposal is made.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Default, Clone, PartialEq)]
pub struct OfferDetails {
    #[n(0)]
    product_name: String,
    #[n(1)]
    quantity: i64,
    #[n(2)]
    price: f64, // unit price
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl OfferDetails {
    pub fn new(product_name: &str, quantity: i64, price: f64) -> Self {
        Self {
            product_name: product_name.to_string(),
            quantity,
            price,
        }
    }
    pub fn set_product_name(mut self, product_name: &str) -> Self {
        self.product_name = product_name.to_string();
        self
    }
    pub fn set_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }
    pub fn set_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }
    pub fn product_name(&self) -> &str {
        &self.product_name
    }
    pub fn quantity(&self) -> i64 {
        self.quantity
    }
    pub fn price(&self) -> f64 {
        self.price
    }
    pub fn total_price(&self) -> f64 {
        self.quantity as f64 * self.price
    }
    /// Rejects an empty product name, a negative quantity, or a negative or non-finite price.
    pub fn validate(&self) -> Result<(), NegotiationError> {
        if self.product_name.trim().is_empty() {
            return Err(NegotiationError::InvalidOfferDetails(
                "Product name cannot be empty".into(),
            ));
        }
        if self.quantity < 0 {
            return Err(NegotiationError::InvalidOfferDetails(format!(
                "Product quantity cannot be a negative value: {}",
                self.quantity
            )));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(NegotiationError::InvalidOfferDetails(format!(
                "Product price must be a non-negative number: {}",
                self.price
            )));
        }
        Ok(())
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}
impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}
impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}
