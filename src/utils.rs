//! Unique id generation for offers

use bech32::Bech32m;
use uuid7::uuid7;

// construct a unique id then encode using bech32
pub fn new_uuid_to_bech32(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}

/// Source of globally unique, opaque offer ids.
pub trait IdGenerator {
    fn next_id(&self) -> anyhow::Result<String>;
}

/// Time-ordered uuid7 ids, bech32m encoded under a fixed prefix.
#[derive(Debug, Clone)]
pub struct Bech32IdGenerator {
    hrp: String,
}

impl Bech32IdGenerator {
    pub fn new(hrp: &str) -> anyhow::Result<Self> {
        bech32::Hrp::parse(hrp)?;
        Ok(Self {
            hrp: hrp.to_string(),
        })
    }
}

impl IdGenerator for Bech32IdGenerator {
    fn next_id(&self) -> anyhow::Result<String> {
        new_uuid_to_bech32(&self.hrp)
    }
}
