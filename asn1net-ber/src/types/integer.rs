//! INTEGER

use crate::ber::types::UniversalTag;
use crate::object::{Asn1Object, Asn1Type, DecodeContext, Form, UniversalType};
use crate::window::ByteWindow;
use asn1net_core::{Asn1Error, Asn1Result, EncoderConfig};

pub struct IntegerType;

pub type Asn1Integer = Asn1Object<IntegerType>;

impl Asn1Type for IntegerType {
    type Content = i64;
    const FORM: Form = Form::Primitive;

    /// Minimal big-endian two's complement
    ///
    /// Leading `00` octets are dropped unless the next octet has bit 8 set,
    /// leading `FF` octets unless the next octet has bit 8 clear. 127 is `7F`,
    /// 128 is `00 80`, -128 is `80`, -129 is `FF 7F`.
    fn write_value(content: &i64, _config: &EncoderConfig) -> Asn1Result<Vec<u8>> {
        let bytes = content.to_be_bytes();
        let mut start = 0;
        while start < bytes.len() - 1 {
            let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
                || (bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0);
            if !redundant {
                break;
            }
            start += 1;
        }
        Ok(bytes[start..].to_vec())
    }

    fn read_value(window: &ByteWindow, context: &DecodeContext) -> Asn1Result<i64> {
        let bytes = window.as_slice();
        if bytes.is_empty() {
            return Err(Asn1Error::malformed("Empty INTEGER encoding"));
        }
        if bytes.len() > 1 && context.config.rules.is_strict() {
            let redundant = (bytes[0] == 0x00 && bytes[1] & 0x80 == 0)
                || (bytes[0] == 0xFF && bytes[1] & 0x80 != 0);
            if redundant {
                return Err(Asn1Error::malformed("Non-minimal INTEGER encoding"));
            }
        }
        if bytes.len() > 8 {
            return Err(Asn1Error::out_of_range(format!(
                "INTEGER of {} bytes does not fit in i64",
                bytes.len()
            )));
        }

        // Sign-extend into eight octets
        let fill = if bytes[0] & 0x80 != 0 { 0xFF } else { 0x00 };
        let mut be = [fill; 8];
        be[8 - bytes.len()..].copy_from_slice(bytes);
        Ok(i64::from_be_bytes(be))
    }
}

impl UniversalType for IntegerType {
    const TAG: UniversalTag = UniversalTag::Integer;
}
