//! BER/DER encoding engine for asn1net
//!
//! This crate provides the framing layer, the lazy object model and the type
//! catalogue:
//!
//! - [`window`]: byte windows over shared input buffers
//! - [`ber`]: identifier/length octets, the encoder and the decoder
//! - [`object`]: the generic [`Asn1Object`] and the per-type [`Asn1Type`] rules
//! - [`types`]: the supported ASN.1 types
//! - [`node`]: the closed [`Asn1Node`] enum the encoder and decoder exchange
//!
//! # TODO
//!
//! - [ ] BIT STRING, ENUMERATED, UTCTime/GeneralizedTime and BMPString content
//!   types (their tags currently decode as opaque values)

pub mod ber;
pub mod node;
pub mod object;
pub mod types;
pub mod window;

pub use ber::{BerDecoder, BerEncoder, BerLength, BerTag, BerTagClass, Frame, UniversalTag};
pub use node::Asn1Node;
pub use object::{Asn1Object, Asn1Type, ContentState, DecodeContext, Form, UniversalType};
pub use types::*;
pub use window::ByteWindow;
