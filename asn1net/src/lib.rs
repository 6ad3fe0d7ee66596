//! asn1net - ASN.1 BER/DER codec with lazy decoding
//!
//! Converts between a typed in-memory tree of ASN.1 values and the BER/DER
//! byte stream used by X.509, LDAP, Kerberos and similar protocols.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `asn1net-core`: error type and codec configuration
//! - `asn1net-ber`: byte windows, identifier/length octets, object model,
//!   type catalogue, encoder and decoder
//! - `asn1net`: this facade
//!
//! # Lazy Decoding
//!
//! [`decode`] only frames the input. Every node keeps a window over its value
//! octets and interprets them on the first content access, so a malformed
//! value surfaces when it is read, not when the document is decoded.
//!
//! # Limitations
//!
//! INTEGER content is an `i64`. A value wider than eight octets decodes and
//! frames normally, but reading it fails with [`Asn1Error::OutOfRange`], and
//! so does re-encoding any tree that contains it. To write such a value,
//! build an [`Asn1Opaque`] with the `UNIVERSAL 2` identifier and the
//! two's-complement octets.
//!
//! # Usage
//!
//! ```rust
//! use asn1net::{Asn1Boolean, Asn1Integer, Asn1Sequence};
//!
//! let sequence = Asn1Sequence::new(vec![
//!     Asn1Integer::new(5).into(),
//!     Asn1Boolean::new(true).into(),
//! ]);
//! let bytes = asn1net::encode(&sequence.into())?;
//! assert_eq!(bytes, vec![0x30, 0x06, 0x02, 0x01, 0x05, 0x01, 0x01, 0xFF]);
//!
//! let mut nodes = asn1net::decode(bytes)?;
//! let children = nodes[0].children_mut()?;
//! assert_eq!(children[0].as_i64()?, 5);
//! # Ok::<(), asn1net::Asn1Error>(())
//! ```

// Re-export core types
pub use asn1net_core::{
    Asn1Error, Asn1Result, DecoderConfig, EncoderConfig, EncodingRules, LengthForm,
    DEFAULT_MAX_DEPTH,
};

// Re-export the encoding engine
pub use asn1net_ber::ber::{BerDecoder, BerEncoder, BerLength, BerTag, BerTagClass, UniversalTag};
pub use asn1net_ber::node::Asn1Node;
pub use asn1net_ber::object::{Asn1Object, ContentState};
pub use asn1net_ber::types::{
    Asn1Boolean, Asn1Eoc, Asn1Ia5String, Asn1Integer, Asn1Null, Asn1ObjectIdentifier,
    Asn1OctetString, Asn1Opaque, Asn1PrintableString, Asn1Sequence, Asn1Set, Asn1T61String,
    Asn1Tagged, Asn1Utf8String,
};
pub use asn1net_ber::window::ByteWindow;

use bytes::Bytes;

/// Encode one node as DER
pub fn encode(node: &Asn1Node) -> Asn1Result<Vec<u8>> {
    encode_with(node, EncoderConfig::default())
}

/// Encode one node under explicit rules and length form
pub fn encode_with(node: &Asn1Node, config: EncoderConfig) -> Asn1Result<Vec<u8>> {
    let mut encoder = BerEncoder::with_config(config);
    encoder.write_node(node)?;
    Ok(encoder.into_bytes())
}

/// Frame every top-level value in `data` with lenient BER rules
pub fn decode(data: impl Into<Bytes>) -> Asn1Result<Vec<Asn1Node>> {
    decode_with(data, DecoderConfig::default())
}

/// Frame every top-level value in `data` under explicit rules
///
/// # Errors
/// `MalformedEncoding` for the first framing error. Value octets are not
/// interpreted here; their errors surface on content access.
pub fn decode_with(data: impl Into<Bytes>, config: DecoderConfig) -> Asn1Result<Vec<Asn1Node>> {
    let data = data.into();
    log::debug!(
        "Decoding {} bytes under {:?} (max depth {})",
        data.len(),
        config.rules,
        config.max_depth
    );
    BerDecoder::with_config(data, config).read_all()
}
