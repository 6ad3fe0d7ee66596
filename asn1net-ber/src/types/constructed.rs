//! SEQUENCE and SET
//!
//! Content is the ordered list of child nodes. Children of a decoded value
//! are framed when the parent's content is first read, and each child's own
//! content stays pending until it is read in turn.

use crate::ber::decoder::BerDecoder;
use crate::ber::encoder::BerEncoder;
use crate::ber::types::UniversalTag;
use crate::node::Asn1Node;
use crate::object::{Asn1Object, Asn1Type, DecodeContext, Form, UniversalType};
use crate::window::ByteWindow;
use asn1net_core::{Asn1Error, Asn1Result, EncoderConfig};

/// Concatenated encodings of `children`
///
/// # Errors
/// `Format` for an end-of-contents child; the marker is only written by the
/// encoder itself to close an indefinite length.
pub(crate) fn write_children(
    children: &[Asn1Node],
    config: &EncoderConfig,
) -> Asn1Result<Vec<u8>> {
    let mut encoder = BerEncoder::with_config(*config);
    for (index, child) in children.iter().enumerate() {
        if child.is_eoc() {
            return Err(Asn1Error::format(format!(
                "End-of-contents cannot be a child value (index {})",
                index
            )));
        }
        encoder.write_node(child)?;
    }
    Ok(encoder.into_bytes())
}

/// Frame every child inside a constructed value
pub(crate) fn read_children(
    window: &ByteWindow,
    context: &DecodeContext,
) -> Asn1Result<Vec<Asn1Node>> {
    let mut window = window.clone();
    window.rewind();
    BerDecoder::nested(window, context.config, context.depth + 1).read_all()
}

pub(crate) fn summarize_children(children: &[Asn1Node]) -> String {
    format!("{} element(s)", children.len())
}

pub struct SequenceType;

pub type Asn1Sequence = Asn1Object<SequenceType>;

impl Asn1Type for SequenceType {
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

impl UniversalType for SequenceType {
    const TAG: UniversalTag = UniversalTag::Sequence;
}

/// SET / SET OF
///
/// Children are written in the order given; DER's sorted SET OF ordering is
/// left to the caller.
pub struct SetType;

pub type Asn1Set = Asn1Object<SetType>;

impl Asn1Type for SetType {
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

impl UniversalType for SetType {
    const TAG: UniversalTag = UniversalTag::Set;
}
