//! Values outside the catalogue
//!
//! Application, context-specific and private tags, and universal tags the
//! catalogue has no entry for, are kept generically: constructed ones as a list
//! of children ([`TaggedType`]), primitive ones as raw octets ([`OpaqueType`]).

use crate::node::Asn1Node;
use crate::object::{Asn1Object, Asn1Type, DecodeContext, Form};
use crate::types::constructed::{read_children, summarize_children, write_children};
use crate::window::ByteWindow;
use asn1net_core::{Asn1Result, EncoderConfig};
use bytes::Bytes;

/// Constructed value under a caller-chosen tag, e.g. an explicit `[0]` wrapper
pub struct TaggedType;

pub type Asn1Tagged = Asn1Object<TaggedType>;

impl Asn1Type for TaggedType {
    type Content = Vec<Asn1Node>;
    const FORM: Form = Form::Constructed;

    fn write_value(content: &Vec<Asn1Node>, config: &EncoderConfig) -> Asn1Result<Vec<u8>> {
        write_children(content, config)
    }

    fn read_value(window: &ByteWindow, context: &DecodeContext) -> Asn1Result<Vec<Asn1Node>> {
        read_children(window, context)
    }

    fn summary(content: &Vec<Asn1Node>) -> String {
        summarize_children(content)
    }
}

/// Primitive value whose octets are not interpreted
pub struct OpaqueType;

pub type Asn1Opaque = Asn1Object<OpaqueType>;

impl Asn1Type for OpaqueType {
    type Content = Bytes;
    const FORM: Form = Form::Primitive;

    fn write_value(content: &Bytes, _config: &EncoderConfig) -> Asn1Result<Vec<u8>> {
        Ok(content.to_vec())
    }

    fn read_value(window: &ByteWindow, _context: &DecodeContext) -> Asn1Result<Bytes> {
        Ok(window.to_bytes())
    }

    fn summary(content: &Bytes) -> String {
        content.iter().map(|b| format!("{:02X}", b)).collect()
    }
}
