//! BOOLEAN

use crate::ber::types::UniversalTag;
use crate::object::{Asn1Object, Asn1Type, DecodeContext, Form, UniversalType};
use crate::window::ByteWindow;
use asn1net_core::{Asn1Error, Asn1Result, EncoderConfig};

pub struct BooleanType;

pub type Asn1Boolean = Asn1Object<BooleanType>;

impl Asn1Type for BooleanType {
    type Content = bool;
    const FORM: Form = Form::Primitive;

    /// `FF` for true, `00` for false (the DER form, also valid BER)
    fn write_value(content: &bool, _config: &EncoderConfig) -> Asn1Result<Vec<u8>> {
        Ok(vec![if *content { 0xFF } else { 0x00 }])
    }

    /// Exactly one octet. BER reads any non-zero octet as true; DER accepts
    /// only `00` and `FF`.
    fn read_value(window: &ByteWindow, context: &DecodeContext) -> Asn1Result<bool> {
        let octet = match window.as_slice() {
            [octet] => *octet,
            other => {
                return Err(Asn1Error::malformed(format!(
                    "BOOLEAN needs exactly one value octet, got {}",
                    other.len()
                )));
            }
        };

        match octet {
            0x00 => Ok(false),
            0xFF => Ok(true),
            _ if context.config.rules.is_strict() => Err(Asn1Error::malformed(format!(
                "Non-canonical BOOLEAN octet 0x{:02X}",
                octet
            ))),
            _ => {
                log::warn!("Accepting non-canonical BOOLEAN octet 0x{:02X} as true", octet);
                Ok(true)
            }
        }
    }
}

impl UniversalType for BooleanType {
    const TAG: UniversalTag = UniversalTag::Boolean;
}
