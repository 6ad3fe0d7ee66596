//! Character string types
//!
//! All character strings are segmentable: they are always written in the
//! primitive form, and BER input may deliver them as constructed segments.
//! Content is held as a Rust `String`. T61String uses UTF-8 on the wire in
//! place of the T.61 code table.

use crate::ber::types::UniversalTag;
use crate::object::{Asn1Object, Asn1Type, DecodeContext, Form, UniversalType};
use crate::types::segmented_octets;
use crate::window::ByteWindow;
use asn1net_core::{Asn1Error, Asn1Result, EncoderConfig};

/// Characters allowed in a PrintableString besides letters and digits
const PRINTABLE_PUNCTUATION: &[u8] = b" '()+,-./:=?";

fn is_printable(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || PRINTABLE_PUNCTUATION.contains(&byte)
}

fn check_charset(
    content: &str,
    name: &str,
    allowed: fn(u8) -> bool,
    error: fn(String) -> Asn1Error,
) -> Asn1Result<()> {
    match content.bytes().find(|&b| !allowed(b)) {
        Some(byte) => Err(error(format!(
            "Character 0x{:02X} is not allowed in {}",
            byte, name
        ))),
        None => Ok(()),
    }
}

fn read_utf8(window: &ByteWindow, context: &DecodeContext) -> Asn1Result<String> {
    let octets = segmented_octets(window, context)?;
    String::from_utf8(octets.to_vec())
        .map_err(|e| Asn1Error::malformed(format!("{}: {}", context.identifier, e)))
}

pub struct Utf8StringType;

pub type Asn1Utf8String = Asn1Object<Utf8StringType>;

impl Asn1Type for Utf8StringType {
    type Content = String;
    const FORM: Form = Form::Segmentable;

    fn write_value(content: &String, _config: &EncoderConfig) -> Asn1Result<Vec<u8>> {
        Ok(content.as_bytes().to_vec())
    }

    fn read_value(window: &ByteWindow, context: &DecodeContext) -> Asn1Result<String> {
        read_utf8(window, context)
    }
}

impl UniversalType for Utf8StringType {
    const TAG: UniversalTag = UniversalTag::Utf8String;
}

pub struct PrintableStringType;

pub type Asn1PrintableString = Asn1Object<PrintableStringType>;

impl Asn1Type for PrintableStringType {
    type Content = String;
    const FORM: Form = Form::Segmentable;

    fn write_value(content: &String, _config: &EncoderConfig) -> Asn1Result<Vec<u8>> {
        check_charset(content, "PrintableString", is_printable, Asn1Error::Format)?;
        Ok(content.as_bytes().to_vec())
    }

    fn read_value(window: &ByteWindow, context: &DecodeContext) -> Asn1Result<String> {
        let value = read_utf8(window, context)?;
        check_charset(
            &value,
            "PrintableString",
            is_printable,
            Asn1Error::MalformedEncoding,
        )?;
        Ok(value)
    }
}

impl UniversalType for PrintableStringType {
    const TAG: UniversalTag = UniversalTag::PrintableString;
}

pub struct T61StringType;

pub type Asn1T61String = Asn1Object<T61StringType>;

impl Asn1Type for T61StringType {
    type Content = String;
    const FORM: Form = Form::Segmentable;

    fn write_value(content: &String, _config: &EncoderConfig) -> Asn1Result<Vec<u8>> {
        Ok(content.as_bytes().to_vec())
    }

    /// Reads the whole window from its start
    fn read_value(window: &ByteWindow, context: &DecodeContext) -> Asn1Result<String> {
        read_utf8(window, context)
    }
}

impl UniversalType for T61StringType {
    const TAG: UniversalTag = UniversalTag::T61String;
}

pub struct Ia5StringType;

pub type Asn1Ia5String = Asn1Object<Ia5StringType>;

impl Asn1Type for Ia5StringType {
    type Content = String;
    const FORM: Form = Form::Segmentable;

    fn write_value(content: &String, _config: &EncoderConfig) -> Asn1Result<Vec<u8>> {
        check_charset(content, "IA5String", |b| b.is_ascii(), Asn1Error::Format)?;
        Ok(content.as_bytes().to_vec())
    }

    fn read_value(window: &ByteWindow, context: &DecodeContext) -> Asn1Result<String> {
        let value = read_utf8(window, context)?;
        check_charset(
            &value,
            "IA5String",
            |b| b.is_ascii(),
            Asn1Error::MalformedEncoding,
        )?;
        Ok(value)
    }
}

impl UniversalType for Ia5StringType {
    const TAG: UniversalTag = UniversalTag::Ia5String;
}
