//! OCTET STRING

use crate::ber::types::UniversalTag;
use crate::object::{Asn1Object, Asn1Type, DecodeContext, Form, UniversalType};
use crate::types::segmented_octets;
use crate::window::ByteWindow;
use asn1net_core::{Asn1Result, EncoderConfig};
use bytes::Bytes;

pub struct OctetStringType;

pub type Asn1OctetString = Asn1Object<OctetStringType>;

impl Asn1Type for OctetStringType {
    type Content = Bytes;
    const FORM: Form = Form::Segmentable;

    fn write_value(content: &Bytes, _config: &EncoderConfig) -> Asn1Result<Vec<u8>> {
        Ok(content.to_vec())
    }

    /// Shares the input buffer for primitive values
    fn read_value(window: &ByteWindow, context: &DecodeContext) -> Asn1Result<Bytes> {
        segmented_octets(window, context)
    }

    fn summary(content: &Bytes) -> String {
        content.iter().map(|b| format!("{:02X}", b)).collect()
    }
}

impl UniversalType for OctetStringType {
    const TAG: UniversalTag = UniversalTag::OctetString;
}
