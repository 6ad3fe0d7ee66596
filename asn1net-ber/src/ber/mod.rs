//! BER/DER framing for ASN.1
//!
//! Every ASN.1 value is encoded as a TLV (Tag-Length-Value) triplet:
//!
//! ```text
//! [Identifier] [Length] [Value]
//! ```
//!
//! ## Identifier Encoding
//!
//! ```text
//! Bits: 8 7 6 5 4 3 2 1
//!       C C P T T T T T
//! ```
//! - CC = Class (00=Universal, 01=Application, 10=Context, 11=Private)
//! - P = Primitive (0) or Constructed (1)
//! - TTTTT = Tag number (0-30), or 11111 followed by base-128 digits
//!
//! ## Length Encoding
//!
//! - **Short form**: one octet, lengths 0-127
//! - **Long form**: `0x80 | k`, then k big-endian octets
//! - **Indefinite**: `0x80`, then the children, then end-of-contents `00 00`.
//!   Constructed values only, and BER only.
//!
//! # Strictness
//!
//! Both directions carry an explicit [`EncodingRules`](asn1net_core::EncodingRules).
//! Under DER the decoder rejects non-minimal identifiers and lengths,
//! indefinite lengths and segmented strings, and the encoder never produces them.

pub mod decoder;
pub mod encoder;
pub mod types;


pub use decoder::{BerDecoder, Frame};
pub use encoder::BerEncoder;
pub use types::{BerLength, BerTag, BerTagClass, UniversalTag};
