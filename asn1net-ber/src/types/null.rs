//! NULL

use crate::ber::types::UniversalTag;
use crate::object::{Asn1Object, Asn1Type, DecodeContext, Form, UniversalType};
use crate::window::ByteWindow;
use asn1net_core::{Asn1Error, Asn1Result, EncoderConfig};

pub struct NullType;

pub type Asn1Null = Asn1Object<NullType>;

impl Asn1Null {
    pub fn null() -> Self {
        Self::new(())
    }
}

impl Asn1Type for NullType {
    type Content = ();
    const FORM: Form = Form::Primitive;

    fn write_value(_content: &(), _config: &EncoderConfig) -> Asn1Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn read_value(window: &ByteWindow, _context: &DecodeContext) -> Asn1Result<()> {
        if window.is_empty() {
            Ok(())
        } else {
            Err(Asn1Error::malformed(format!(
                "NULL with {} value octets",
                window.len()
            )))
        }
    }

    fn summary(_content: &()) -> String {
        "NULL".to_string()
    }
}

impl UniversalType for NullType {
    const TAG: UniversalTag = UniversalTag::Null;
}
