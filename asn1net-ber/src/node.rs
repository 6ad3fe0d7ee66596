//! Closed set of node variants
//!
//! [`Asn1Node`] is what the decoder yields and what the encoder walks. Each
//! variant wraps the [`Asn1Object`](crate::object::Asn1Object) of one catalogue
//! type; the enum dispatches identity, encoding and diagnostics to it.

use crate::ber::decoder::Frame;
use crate::ber::types::{BerTag, BerTagClass, UniversalTag};
use crate::object::{Asn1Object, Asn1Type, DecodeContext};
use crate::types::*;
use asn1net_core::{Asn1Error, Asn1Result, DecoderConfig, EncoderConfig};
use bytes::Bytes;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Asn1Node {
    Eoc(Asn1Eoc),
    Boolean(Asn1Boolean),
    Integer(Asn1Integer),
    OctetString(Asn1OctetString),
    Null(Asn1Null),
    ObjectIdentifier(Asn1ObjectIdentifier),
    Utf8String(Asn1Utf8String),
    PrintableString(Asn1PrintableString),
    T61String(Asn1T61String),
    Ia5String(Asn1Ia5String),
    Sequence(Asn1Sequence),
    Set(Asn1Set),
    Tagged(Asn1Tagged),
    Opaque(Asn1Opaque),
}

/// Apply `$body` to the object inside every variant except `Eoc`
macro_rules! with_object {
    ($node:expr, $object:ident => $body:expr, eoc => $eoc:expr) => {
        match $node {
            Asn1Node::Eoc(_) => $eoc,
            Asn1Node::Boolean($object) => $body,
            Asn1Node::Integer($object) => $body,
            Asn1Node::OctetString($object) => $body,
            Asn1Node::Null($object) => $body,
            Asn1Node::ObjectIdentifier($object) => $body,
            Asn1Node::Utf8String($object) => $body,
            Asn1Node::PrintableString($object) => $body,
            Asn1Node::T61String($object) => $body,
            Asn1Node::Ia5String($object) => $body,
            Asn1Node::Sequence($object) => $body,
            Asn1Node::Set($object) => $body,
            Asn1Node::Tagged($object) => $body,
            Asn1Node::Opaque($object) => $body,
        }
    };
}

/// Pending object for a frame, after checking the type's form rule
fn pending<T: Asn1Type>(frame: Frame, context: DecodeContext) -> Asn1Result<Asn1Object<T>> {
    T::FORM.check_read(&context.identifier, &context.config)?;
    Ok(Asn1Object::pending(frame.value, context))
}

impl Asn1Node {
    /// Match a framed value to its catalogue variant
    ///
    /// Nothing is decoded here; the variant holds the frame's value window
    /// until its content is read.
    pub(crate) fn from_frame(frame: Frame, config: DecoderConfig, depth: usize) -> Asn1Result<Self> {
        let identifier = frame.identifier;
        let context = DecodeContext {
            identifier,
            config,
            depth,
        };

        let node = match identifier.universal_tag() {
            Some(UniversalTag::Eoc) => {
                return Err(Asn1Error::malformed(format!(
                    "Unexpected end-of-contents ({})",
                    identifier
                )));
            }
            Some(UniversalTag::Boolean) => Asn1Node::Boolean(pending(frame, context)?),
            Some(UniversalTag::Integer) => Asn1Node::Integer(pending(frame, context)?),
            Some(UniversalTag::OctetString) => Asn1Node::OctetString(pending(frame, context)?),
            Some(UniversalTag::Null) => Asn1Node::Null(pending(frame, context)?),
            Some(UniversalTag::ObjectIdentifier) => {
                Asn1Node::ObjectIdentifier(pending(frame, context)?)
            }
            Some(UniversalTag::Utf8String) => Asn1Node::Utf8String(pending(frame, context)?),
            Some(UniversalTag::PrintableString) => {
                Asn1Node::PrintableString(pending(frame, context)?)
            }
            Some(UniversalTag::T61String) => Asn1Node::T61String(pending(frame, context)?),
            Some(UniversalTag::Ia5String) => Asn1Node::Ia5String(pending(frame, context)?),
            Some(UniversalTag::Sequence) => Asn1Node::Sequence(pending(frame, context)?),
            Some(UniversalTag::Set) => Asn1Node::Set(pending(frame, context)?),
            _ if identifier.is_constructed() => Asn1Node::Tagged(pending(frame, context)?),
            _ => Asn1Node::Opaque(pending(frame, context)?),
        };
        Ok(node)
    }

    pub fn identifier(&self) -> BerTag {
        with_object!(self, object => object.identifier(), eoc => BerTag::eoc())
    }

    /// Identifier the encoder writes; see [`Asn1Object::output_identifier`]
    pub fn output_identifier(&self) -> BerTag {
        with_object!(self, object => object.output_identifier(), eoc => BerTag::eoc())
    }

    pub fn class(&self) -> BerTagClass {
        self.identifier().class()
    }

    pub fn is_constructed(&self) -> bool {
        self.identifier().is_constructed()
    }

    pub fn is_eoc(&self) -> bool {
        matches!(self, Asn1Node::Eoc(_))
    }

    /// Whether the content is materialized (always true for nodes built for encoding)
    pub fn is_decoded(&self) -> bool {
        with_object!(self, object => object.is_decoded(), eoc => true)
    }

    /// Length of the value octets the node was decoded from
    pub fn raw_len(&self) -> Option<usize> {
        with_object!(self, object => object.raw_len(), eoc => Some(0))
    }

    /// Value octets under `config` (no identifier or length)
    pub fn value_octets(&self, config: &EncoderConfig) -> Asn1Result<Vec<u8>> {
        with_object!(self, object => object.value_octets(config), eoc => Ok(Vec::new()))
    }

    /// Materialize this node's content, leaving children of constructed values pending
    pub fn materialize(&mut self) -> Asn1Result<()> {
        with_object!(self, object => object.content().map(|_| ()), eoc => Ok(()))
    }

    /// Children of a constructed node, framing them on first access
    ///
    /// # Errors
    /// `Argument` for primitive variants.
    pub fn children_mut(&mut self) -> Asn1Result<&mut Vec<Asn1Node>> {
        match self {
            Asn1Node::Sequence(object) => object.content_mut(),
            Asn1Node::Set(object) => object.content_mut(),
            Asn1Node::Tagged(object) => object.content_mut(),
            other => Err(Asn1Error::argument(format!(
                "{} has no children",
                other.identifier()
            ))),
        }
    }

    pub fn as_bool(&mut self) -> Asn1Result<bool> {
        match self {
            Asn1Node::Boolean(object) => object.content().copied(),
            other => Err(other.wrong_variant("BOOLEAN")),
        }
    }

    pub fn as_i64(&mut self) -> Asn1Result<i64> {
        match self {
            Asn1Node::Integer(object) => object.content().copied(),
            other => Err(other.wrong_variant("INTEGER")),
        }
    }

    /// Content of any character string variant
    pub fn as_str(&mut self) -> Asn1Result<&str> {
        match self {
            Asn1Node::Utf8String(object) => object.content().map(String::as_str),
            Asn1Node::PrintableString(object) => object.content().map(String::as_str),
            Asn1Node::T61String(object) => object.content().map(String::as_str),
            Asn1Node::Ia5String(object) => object.content().map(String::as_str),
            other => Err(other.wrong_variant("character string")),
        }
    }

    /// Octets of an OCTET STRING or an opaque primitive value
    pub fn as_octets(&mut self) -> Asn1Result<Bytes> {
        match self {
            Asn1Node::OctetString(object) => object.content().cloned(),
            Asn1Node::Opaque(object) => object.content().cloned(),
            other => Err(other.wrong_variant("OCTET STRING")),
        }
    }

    pub fn as_oid(&mut self) -> Asn1Result<&[u32]> {
        match self {
            Asn1Node::ObjectIdentifier(object) => object.content().map(Vec::as_slice),
            other => Err(other.wrong_variant("OBJECT IDENTIFIER")),
        }
    }

    fn wrong_variant(&self, expected: &str) -> Asn1Error {
        Asn1Error::argument(format!("Expected {}, found {}", expected, self.identifier()))
    }
}

impl fmt::Display for Asn1Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        with_object!(self, object => fmt::Display::fmt(object, f), eoc => fmt::Display::fmt(&Asn1Eoc::new(), f))
    }
}

impl From<Asn1Eoc> for Asn1Node {
    fn from(eoc: Asn1Eoc) -> Self {
        Asn1Node::Eoc(eoc)
    }
}

macro_rules! impl_from_object {
    ($($variant:ident => $object:ty),* $(,)?) => {
        $(
            impl From<$object> for Asn1Node {
                fn from(object: $object) -> Self {
                    Asn1Node::$variant(object)
                }
            }
        )*
    };
}

impl_from_object! {
    Boolean => Asn1Boolean,
    Integer => Asn1Integer,
    OctetString => Asn1OctetString,
    Null => Asn1Null,
    ObjectIdentifier => Asn1ObjectIdentifier,
    Utf8String => Asn1Utf8String,
    PrintableString => Asn1PrintableString,
    T61String => Asn1T61String,
    Ia5String => Asn1Ia5String,
    Sequence => Asn1Sequence,
    Set => Asn1Set,
    Tagged => Asn1Tagged,
    Opaque => Asn1Opaque,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_of_built_nodes() {
        let node: Asn1Node = Asn1T61String::new("hello".to_string()).into();
        assert_eq!(node.identifier(), BerTag::universal(false, 20));
        assert!(node.is_decoded());
        assert_eq!(node.raw_len(), None);

        let node: Asn1Node = Asn1Sequence::new(Vec::new()).into();
        assert_eq!(node.identifier(), BerTag::universal(true, 16));
        assert_eq!(Asn1Node::from(Asn1Eoc::new()).identifier(), BerTag::eoc());
    }

    #[test]
    fn test_typed_accessors() {
        let mut node: Asn1Node = Asn1Integer::new(-7).into();
        assert_eq!(node.as_i64().unwrap(), -7);
        assert!(matches!(node.as_bool(), Err(Asn1Error::Argument(_))));
        assert!(node.children_mut().is_err());

        let mut node: Asn1Node = Asn1Ia5String::new("abc".to_string()).into();
        assert_eq!(node.as_str().unwrap(), "abc");
    }

    #[test]
    fn test_display_delegates() {
        let node: Asn1Node = Asn1Boolean::new(true).into();
        assert_eq!(node.to_string(), "UNIVERSAL|(P)|BOOLEAN - [] - true");
        let node: Asn1Node = Asn1ObjectIdentifier::new(vec![2, 5, 4, 3]).into();
        assert_eq!(
            node.to_string(),
            "UNIVERSAL|(P)|OBJECTIDENTIFIER - [] - 2.5.4.3"
        );
    }
}
