//! End-of-contents marker

use crate::ber::types::BerTag;
use std::fmt;

/// Two-octet `00 00` marker closing an indefinite-length value
///
/// Carries no content. The decoder consumes it while scanning indefinite
/// values and never yields it as a node; it exists for building trees by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Asn1Eoc;

impl Asn1Eoc {
    pub const ENCODED: [u8; 2] = [0x00, 0x00];

    pub fn new() -> Self {
        Self
    }

    pub fn identifier(&self) -> BerTag {
        BerTag::eoc()
    }

    pub fn encode(&self) -> [u8; 2] {
        Self::ENCODED
    }
}

impl fmt::Display for Asn1Eoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - [0]", BerTag::eoc())
    }
}
