//! BER/DER encoder
//!
//! # Usage Example
//!
//! ```rust
//! use asn1net_ber::ber::BerEncoder;
//! use asn1net_ber::types::Asn1Integer;
//!
//! let mut encoder = BerEncoder::new();
//! encoder.write_node(&Asn1Integer::new(12345).into())?;
//! assert_eq!(encoder.into_bytes(), vec![0x02, 0x02, 0x30, 0x39]);
//! # Ok::<(), asn1net_core::Asn1Error>(())
//! ```

use crate::ber::types::{BerLength, BerTag};
use crate::node::Asn1Node;
use crate::types::Asn1Eoc;
use asn1net_core::{Asn1Error, Asn1Result, EncoderConfig, LengthForm};

/// Encoder writing nodes as TLV triplets into a growing buffer
///
/// # Error Handling
///
/// A node that fails to encode leaves the buffer as it was before the call,
/// so earlier writes stay usable.
#[derive(Debug, Clone, Default)]
pub struct BerEncoder {
    buffer: Vec<u8>,
    config: EncoderConfig,
}

impl BerEncoder {
    /// Create a DER encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder with explicit rules and length form
    pub fn with_config(config: EncoderConfig) -> Self {
        Self {
            buffer: Vec::new(),
            config,
        }
    }

    /// Create a DER encoder with initial capacity
    ///
    /// # Arguments
    /// * `capacity` - Initial buffer capacity in bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            config: EncoderConfig::default(),
        }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Append identifier octets
    pub fn write_tag(&mut self, tag: &BerTag) {
        self.buffer.extend_from_slice(&tag.encode());
    }

    /// Append length octets for a value under `tag`
    ///
    /// # Errors
    /// `Format` for an indefinite length on a primitive tag or under DER.
    pub fn write_length(&mut self, length: BerLength, tag: &BerTag) -> Asn1Result<()> {
        if length.is_indefinite() {
            check_indefinite(tag, &self.config)?;
        }
        self.buffer.extend_from_slice(&length.encode());
        Ok(())
    }

    /// Encode a TLV (Tag-Length-Value) triplet with a definite length
    ///
    /// # Arguments
    /// * `tag` - BER tag
    /// * `value` - Value bytes (already encoded)
    pub fn encode_tlv(&mut self, tag: &BerTag, value: &[u8]) {
        self.write_tag(tag);
        self.buffer
            .extend_from_slice(&BerLength::new(value.len()).encode());
        self.buffer.extend_from_slice(value);
    }

    /// Encode one node
    ///
    /// # Encoding Process
    /// 1. Encode the value octets (children first, for constructed values)
    /// 2. Append identifier, length and value
    ///
    /// Constructed values use the indefinite form (`0x80 ... 00 00`) when the
    /// config asks for it; everything else gets a definite length.
    ///
    /// # Errors
    /// - `Format` if the node's form is illegal for its type, or an indefinite
    ///   length is requested under DER
    /// - `Argument` for invalid content such as a malformed OID
    /// - whatever decoding a pending node's content raises
    pub fn write_node(&mut self, node: &Asn1Node) -> Asn1Result<()> {
        if node.is_eoc() {
            self.buffer.extend_from_slice(&Asn1Eoc::ENCODED);
            return Ok(());
        }

        let identifier = node.output_identifier();
        let value = node.value_octets(&self.config)?;
        let indefinite =
            identifier.is_constructed() && self.config.length_form == LengthForm::Indefinite;
        if indefinite {
            check_indefinite(&identifier, &self.config)?;
        }

        log::trace!(
            "Encoding {} with {} value octets{}",
            identifier,
            value.len(),
            if indefinite { " (indefinite)" } else { "" }
        );

        if indefinite {
            self.write_tag(&identifier);
            self.buffer
                .extend_from_slice(&BerLength::Indefinite.encode());
            self.buffer.extend_from_slice(&value);
            self.buffer.extend_from_slice(&Asn1Eoc::ENCODED);
        } else {
            self.encode_tlv(&identifier, &value);
        }
        Ok(())
    }

    /// Encode nodes one after another
    ///
    /// Stops at the first failing node; nodes written before it are kept.
    pub fn write_all(&mut self, nodes: &[Asn1Node]) -> Asn1Result<()> {
        nodes.iter().try_for_each(|node| self.write_node(node))
    }

    /// Get the encoded bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Get a reference to the encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Clear the encoder buffer, keeping the config
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

fn check_indefinite(tag: &BerTag, config: &EncoderConfig) -> Asn1Result<()> {
    if config.rules.is_strict() {
        return Err(Asn1Error::format(format!(
            "Indefinite length is not allowed under DER ({})",
            tag
        )));
    }
    if !tag.is_constructed() {
        return Err(Asn1Error::format(format!(
            "Indefinite length requires the constructed form ({})",
            tag
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Asn1Boolean, Asn1Integer, Asn1Null, Asn1OctetString, Asn1Sequence, Asn1T61String,
    };
    use asn1net_core::EncodingRules;
    use bytes::Bytes;

    #[test]
    fn test_encode_tlv() {
        let mut encoder = BerEncoder::new();
        encoder.encode_tlv(&BerTag::universal(false, 4), b"Hello");
        assert_eq!(
            encoder.as_bytes(),
            &[0x04, 0x05, b'H', b'e', b'l', b'l', b'o']
        );
    }

    #[test]
    fn test_long_form_length() {
        let mut encoder = BerEncoder::new();
        let content = Bytes::from(vec![0xABu8; 200]);
        encoder
            .write_node(&Asn1OctetString::new(content).into())
            .unwrap();
        let bytes = encoder.into_bytes();
        assert_eq!(&bytes[..3], &[0x04, 0x81, 0xC8]);
        assert_eq!(bytes.len(), 203);
    }

    #[test]
    fn test_indefinite_sequence() {
        let mut encoder = BerEncoder::with_config(EncoderConfig::ber(LengthForm::Indefinite));
        let sequence = Asn1Sequence::new(vec![
            Asn1Integer::new(1).into(),
            Asn1Null::null().into(),
        ]);
        encoder.write_node(&sequence.into()).unwrap();
        assert_eq!(
            encoder.into_bytes(),
            vec![0x30, 0x80, 0x02, 0x01, 0x01, 0x05, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_indefinite_rejected() {
        let config = EncoderConfig {
            rules: EncodingRules::Der,
            length_form: LengthForm::Indefinite,
        };
        let mut encoder = BerEncoder::with_config(config);
        let result = encoder.write_node(&Asn1Sequence::new(Vec::new()).into());
        assert!(matches!(result, Err(Asn1Error::Format(_))));
        assert!(encoder.as_bytes().is_empty());

        let mut encoder = BerEncoder::with_config(EncoderConfig::ber(LengthForm::Definite));
        assert!(
            encoder
                .write_length(BerLength::Indefinite, &BerTag::universal(false, 4))
                .is_err()
        );
    }

    #[test]
    fn test_failed_node_leaves_buffer_untouched() {
        let mut encoder = BerEncoder::new();
        let nodes: Vec<Asn1Node> = vec![
            Asn1Boolean::new(true).into(),
            Asn1T61String::with_form("hello".to_string(), true).into(),
        ];
        assert!(matches!(
            encoder.write_all(&nodes),
            Err(Asn1Error::Format(_))
        ));
        assert_eq!(encoder.as_bytes(), &[0x01, 0x01, 0xFF]);
    }

    #[test]
    fn test_eoc_node() {
        let mut encoder = BerEncoder::new();
        encoder.write_node(&Asn1Eoc::new().into()).unwrap();
        assert_eq!(encoder.into_bytes(), vec![0x00, 0x00]);
    }

    #[test]
    fn test_eoc_child_rejected() {
        let children: Vec<Asn1Node> = vec![
            Asn1Integer::new(1).into(),
            Asn1Eoc::new().into(),
            Asn1Integer::new(2).into(),
        ];
        for config in [EncoderConfig::der(), EncoderConfig::ber(LengthForm::Indefinite)] {
            let mut encoder = BerEncoder::with_config(config);
            let sequence = Asn1Sequence::new(children.clone());
            assert!(matches!(
                encoder.write_node(&sequence.into()),
                Err(Asn1Error::Format(_))
            ));
            assert!(encoder.as_bytes().is_empty());
        }
    }

    #[test]
    fn test_clear_keeps_config() {
        let mut encoder = BerEncoder::with_config(EncoderConfig::ber(LengthForm::Indefinite));
        encoder.write_node(&Asn1Integer::new(0).into()).unwrap();
        encoder.clear();
        assert!(encoder.as_bytes().is_empty());
        assert_eq!(encoder.config().length_form, LengthForm::Indefinite);
    }
}
