//! BER identifier and length octets

use crate::window::ByteWindow;
use asn1net_core::{Asn1Error, Asn1Result, EncodingRules};
use std::fmt;

/// Largest tag number that fits in the identifier octet's low 5 bits
pub const MAX_SHORT_TAG: u32 = 30;

/// BER Tag Class
///
/// ASN.1 defines four tag classes:
/// - **Universal**: Standard ASN.1 types (INTEGER, OCTET STRING, etc.)
/// - **Application**: Application-specific types
/// - **Context-specific**: Context-dependent types (used in SEQUENCE/SET)
/// - **Private**: Private/implementation-specific types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerTagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    ContextSpecific = 2,
    /// Private class (11)
    Private = 3,
}

impl BerTagClass {
    /// Get tag class from bits 8-7 of an identifier octet
    pub fn from_bits(bits: u8) -> Self {
        match (bits >> 6) & 0x03 {
            0 => BerTagClass::Universal,
            1 => BerTagClass::Application,
            2 => BerTagClass::ContextSpecific,
            _ => BerTagClass::Private,
        }
    }

    /// Convert tag class to bits (for encoding)
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }
}

impl fmt::Display for BerTagClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BerTagClass::Universal => "UNIVERSAL",
            BerTagClass::Application => "APPLICATION",
            BerTagClass::ContextSpecific => "CONTEXTSPECIFIC",
            BerTagClass::Private => "PRIVATE",
        };
        f.write_str(name)
    }
}

/// Universal tag numbers known to the type catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniversalTag {
    Eoc = 0,
    Boolean = 1,
    Integer = 2,
    BitString = 3,
    OctetString = 4,
    Null = 5,
    ObjectIdentifier = 6,
    Enumerated = 10,
    Utf8String = 12,
    Sequence = 16,
    Set = 17,
    PrintableString = 19,
    T61String = 20,
    Ia5String = 22,
    UtcTime = 23,
    GeneralizedTime = 24,
    BmpString = 30,
}

impl UniversalTag {
    pub fn from_number(number: u32) -> Option<Self> {
        let tag = match number {
            0 => UniversalTag::Eoc,
            1 => UniversalTag::Boolean,
            2 => UniversalTag::Integer,
            3 => UniversalTag::BitString,
            4 => UniversalTag::OctetString,
            5 => UniversalTag::Null,
            6 => UniversalTag::ObjectIdentifier,
            10 => UniversalTag::Enumerated,
            12 => UniversalTag::Utf8String,
            16 => UniversalTag::Sequence,
            17 => UniversalTag::Set,
            19 => UniversalTag::PrintableString,
            20 => UniversalTag::T61String,
            22 => UniversalTag::Ia5String,
            23 => UniversalTag::UtcTime,
            24 => UniversalTag::GeneralizedTime,
            30 => UniversalTag::BmpString,
            _ => return None,
        };
        Some(tag)
    }

    pub fn number(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            UniversalTag::Eoc => "EOC",
            UniversalTag::Boolean => "BOOLEAN",
            UniversalTag::Integer => "INTEGER",
            UniversalTag::BitString => "BITSTRING",
            UniversalTag::OctetString => "OCTETSTRING",
            UniversalTag::Null => "NULL",
            UniversalTag::ObjectIdentifier => "OBJECTIDENTIFIER",
            UniversalTag::Enumerated => "ENUMERATED",
            UniversalTag::Utf8String => "UTF8STRING",
            UniversalTag::Sequence => "SEQUENCE",
            UniversalTag::Set => "SET",
            UniversalTag::PrintableString => "PRINTABLESTRING",
            UniversalTag::T61String => "T61STRING",
            UniversalTag::Ia5String => "IA5STRING",
            UniversalTag::UtcTime => "UTCTIME",
            UniversalTag::GeneralizedTime => "GENERALIZEDTIME",
            UniversalTag::BmpString => "BMPSTRING",
        }
    }
}

/// BER Tag (identifier octets)
///
/// A BER tag identifies the type of an ASN.1 value. It consists of:
/// - **Class**: Universal, Application, Context-specific, or Private
/// - **Constructed/Primitive**: Whether the value contains nested TLVs
/// - **Tag Number**: 0-30 in the first octet, larger numbers in base-128
///
/// # Encoding Format
///
/// Short form (tag number 0-30):
/// ```text
/// Bits: 8 7 6 5 4 3 2 1
///       C C P T T T T T
/// ```
///
/// Long form (tag number > 30):
/// ```text
/// First byte:      C C P 1 1 1 1 1
/// Following bytes: 1 T T T T T T T  (last byte has bit 8 = 0)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BerTag {
    class: BerTagClass,
    constructed: bool,
    number: u32,
}

impl BerTag {
    pub fn new(class: BerTagClass, constructed: bool, number: u32) -> Self {
        Self {
            class,
            constructed,
            number,
        }
    }

    /// Create a Universal class tag
    pub fn universal(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Universal, constructed, number)
    }

    /// Create an Application class tag
    pub fn application(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Application, constructed, number)
    }

    /// Create a Context-specific class tag
    pub fn context_specific(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::ContextSpecific, constructed, number)
    }

    /// Create a Private class tag
    pub fn private(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Private, constructed, number)
    }

    /// The end-of-contents identifier (`00`)
    pub fn eoc() -> Self {
        Self::universal(false, UniversalTag::Eoc.number())
    }

    pub fn class(&self) -> BerTagClass {
        self.class
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Catalogue entry for universal tags, `None` for other classes
    pub fn universal_tag(&self) -> Option<UniversalTag> {
        match self.class {
            BerTagClass::Universal => UniversalTag::from_number(self.number),
            _ => None,
        }
    }

    pub fn is_eoc(&self) -> bool {
        *self == Self::eoc()
    }

    /// Encode identifier octets
    pub fn encode(&self) -> Vec<u8> {
        let class_bits = self.class.to_bits();
        let constructed_bit = if self.constructed { 0x20 } else { 0x00 };

        if self.number <= MAX_SHORT_TAG {
            return vec![class_bits | constructed_bit | self.number as u8];
        }

        // Base-128 digits, least significant first
        let mut digits = Vec::with_capacity(5);
        let mut remaining = self.number;
        while remaining > 0 {
            digits.push((remaining & 0x7F) as u8);
            remaining >>= 7;
        }

        let mut result = Vec::with_capacity(1 + digits.len());
        result.push(class_bits | constructed_bit | 0x1F);
        let last = digits.len() - 1;
        for (i, &digit) in digits.iter().rev().enumerate() {
            result.push(if i < last { digit | 0x80 } else { digit });
        }
        result
    }

    /// Decode identifier octets at the window cursor
    ///
    /// # Errors
    /// Returns `MalformedEncoding` if the window ends inside the identifier or
    /// the tag number overflows `u32`. Under DER the long form must be
    /// minimal: no leading `0x80` octet and no long form for numbers <= 30.
    pub fn decode(window: &mut ByteWindow, rules: EncodingRules) -> Asn1Result<Self> {
        let first = window
            .read_byte()
            .map_err(|_| Asn1Error::malformed("Truncated identifier octet"))?;
        let class = BerTagClass::from_bits(first);
        let constructed = (first & 0x20) != 0;
        let low_bits = first & 0x1F;

        if low_bits < 0x1F {
            return Ok(Self::new(class, constructed, low_bits as u32));
        }

        let mut number = 0u32;
        let mut first_digit = true;
        loop {
            let byte = window
                .read_byte()
                .map_err(|_| Asn1Error::malformed("Incomplete long-form tag"))?;
            if first_digit && byte == 0x80 && rules.is_strict() {
                return Err(Asn1Error::malformed(
                    "Long-form tag has a leading zero digit",
                ));
            }
            first_digit = false;
            if number > (u32::MAX >> 7) {
                return Err(Asn1Error::malformed("Tag number overflows u32"));
            }
            number = (number << 7) | (byte & 0x7F) as u32;
            if (byte & 0x80) == 0 {
                break;
            }
        }

        if number <= MAX_SHORT_TAG && rules.is_strict() {
            return Err(Asn1Error::malformed(format!(
                "Tag number {} must use the short form",
                number
            )));
        }

        Ok(Self::new(class, constructed, number))
    }
}

impl fmt::Display for BerTag {
    /// `CLASS|(C)|NAME` for universal tags, `CLASS|(P)|(n)` otherwise
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = if self.constructed { "(C)" } else { "(P)" };
        match self.universal_tag() {
            Some(tag) => write!(f, "{}|{}|{}", self.class, form, tag.name()),
            None => write!(f, "{}|{}|({})", self.class, form, self.number),
        }
    }
}

/// BER Length octets
///
/// - **Short form**: lengths 0-127 in one octet, bit 8 clear
/// - **Long form**: `0x80 | k` followed by k big-endian length octets
/// - **Indefinite**: `0x80` alone, constructed values only; the contents are
///   closed by an end-of-contents marker (`00 00`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerLength {
    Definite(usize),
    Indefinite,
}

impl BerLength {
    pub fn new(length: usize) -> Self {
        BerLength::Definite(length)
    }

    /// Definite length value, `None` for indefinite
    pub fn value(&self) -> Option<usize> {
        match self {
            BerLength::Definite(len) => Some(*len),
            BerLength::Indefinite => None,
        }
    }

    pub fn is_indefinite(&self) -> bool {
        matches!(self, BerLength::Indefinite)
    }

    /// Encode length octets
    pub fn encode(&self) -> Vec<u8> {
        match *self {
            BerLength::Indefinite => vec![0x80],
            BerLength::Definite(length) if length < 0x80 => vec![length as u8],
            BerLength::Definite(length) => {
                let be = length.to_be_bytes();
                let skip = be.iter().take_while(|&&b| b == 0).count();
                let octets = &be[skip..];

                let mut result = Vec::with_capacity(1 + octets.len());
                result.push(0x80 | octets.len() as u8);
                result.extend_from_slice(octets);
                result
            }
        }
    }

    /// Decode length octets at the window cursor
    ///
    /// # Errors
    /// Returns `MalformedEncoding` if:
    /// - the window ends before the length octets do
    /// - the reserved initial octet `0xFF` is used
    /// - the long form needs more octets than a `usize` holds
    /// - under DER, the long form is not minimal
    pub fn decode(window: &mut ByteWindow, rules: EncodingRules) -> Asn1Result<Self> {
        let first = window
            .read_byte()
            .map_err(|_| Asn1Error::malformed("Truncated length octet"))?;

        if (first & 0x80) == 0 {
            return Ok(BerLength::Definite(first as usize));
        }

        let num_bytes = (first & 0x7F) as usize;
        if num_bytes == 0 {
            return Ok(BerLength::Indefinite);
        }
        if first == 0xFF {
            return Err(Asn1Error::malformed("Reserved length octet 0xFF"));
        }
        if num_bytes > window.remaining() {
            return Err(Asn1Error::malformed(format!(
                "Long-form length needs {} octets, {} remain",
                num_bytes,
                window.remaining()
            )));
        }

        let octets = window.read(num_bytes);
        let significant = octets.iter().skip_while(|&&b| b == 0).count();
        if significant > std::mem::size_of::<usize>() {
            return Err(Asn1Error::malformed(format!(
                "Length of {} octets does not fit in usize",
                significant
            )));
        }

        let length = octets
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize);

        if rules.is_strict() && (significant != num_bytes || length < 0x80) {
            return Err(Asn1Error::malformed(format!(
                "Non-minimal long-form length {}",
                length
            )));
        }

        Ok(BerLength::Definite(length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_tag(bytes: &'static [u8], rules: EncodingRules) -> Asn1Result<BerTag> {
        BerTag::decode(&mut ByteWindow::from_bytes(bytes), rules)
    }

    fn decode_length(bytes: &'static [u8], rules: EncodingRules) -> Asn1Result<BerLength> {
        BerLength::decode(&mut ByteWindow::from_bytes(bytes), rules)
    }

    #[test]
    fn test_ber_tag_short_form() {
        for number in 0..=30 {
            let encoded = BerTag::universal(false, number).encode();
            assert_eq!(encoded, vec![number as u8]);
        }
        assert_eq!(BerTag::application(true, 0).encode(), vec![0x60]);
        assert_eq!(BerTag::context_specific(true, 3).encode(), vec![0xA3]);
        assert_eq!(BerTag::private(false, 1).encode(), vec![0xC1]);
    }

    #[test]
    fn test_ber_tag_long_form() {
        assert_eq!(BerTag::universal(false, 31).encode(), vec![0x1F, 0x1F]);
        assert_eq!(BerTag::universal(false, 128).encode(), vec![0x1F, 0x81, 0x00]);
        assert_eq!(
            BerTag::context_specific(true, 16384).encode(),
            vec![0xBF, 0x81, 0x80, 0x00]
        );
    }

    #[test]
    fn test_ber_tag_decode() {
        let tag = decode_tag(&[0x02], EncodingRules::Der).unwrap();
        assert_eq!(tag.class(), BerTagClass::Universal);
        assert!(!tag.is_constructed());
        assert_eq!(tag.number(), 2);

        let tag = decode_tag(&[0xBF, 0x81, 0x00], EncodingRules::Der).unwrap();
        assert_eq!(tag, BerTag::context_specific(true, 128));
    }

    #[test]
    fn test_ber_tag_decode_malformed() {
        assert!(matches!(
            decode_tag(&[0x1F, 0x81], EncodingRules::Ber),
            Err(Asn1Error::MalformedEncoding(_))
        ));
        assert!(matches!(
            decode_tag(&[0x1F, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F], EncodingRules::Ber),
            Err(Asn1Error::MalformedEncoding(_))
        ));
        assert!(decode_tag(&[], EncodingRules::Ber).is_err());
    }

    #[test]
    fn test_ber_tag_decode_non_minimal() {
        // Tag 5 in long form and tag 31 with a leading zero digit
        assert_eq!(
            decode_tag(&[0x1F, 0x05], EncodingRules::Ber).unwrap().number(),
            5
        );
        assert!(decode_tag(&[0x1F, 0x05], EncodingRules::Der).is_err());
        assert!(decode_tag(&[0x1F, 0x80, 0x1F], EncodingRules::Der).is_err());
        assert_eq!(
            decode_tag(&[0x1F, 0x80, 0x1F], EncodingRules::Ber).unwrap().number(),
            31
        );
    }

    #[test]
    fn test_ber_tag_display() {
        assert_eq!(
            BerTag::universal(false, 1).to_string(),
            "UNIVERSAL|(P)|BOOLEAN"
        );
        assert_eq!(
            BerTag::context_specific(true, 0).to_string(),
            "CONTEXTSPECIFIC|(C)|(0)"
        );
    }

    #[test]
    fn test_ber_length_encode() {
        assert_eq!(BerLength::new(0).encode(), vec![0x00]);
        assert_eq!(BerLength::new(127).encode(), vec![0x7F]);
        assert_eq!(BerLength::new(128).encode(), vec![0x81, 0x80]);
        assert_eq!(BerLength::new(256).encode(), vec![0x82, 0x01, 0x00]);
        assert_eq!(BerLength::new(65536).encode(), vec![0x83, 0x01, 0x00, 0x00]);
        assert_eq!(BerLength::Indefinite.encode(), vec![0x80]);
    }

    #[test]
    fn test_ber_length_decode() {
        assert_eq!(
            decode_length(&[100], EncodingRules::Der).unwrap(),
            BerLength::Definite(100)
        );
        assert_eq!(
            decode_length(&[0x82, 0x01, 0x00], EncodingRules::Der).unwrap(),
            BerLength::Definite(256)
        );
        assert_eq!(
            decode_length(&[0x80], EncodingRules::Ber).unwrap(),
            BerLength::Indefinite
        );
    }

    #[test]
    fn test_ber_length_decode_malformed() {
        for bytes in [&[0xFFu8, 0x00][..], &[0x82, 0x01][..], &[][..]] {
            let result = BerLength::decode(&mut ByteWindow::from_bytes(bytes.to_vec()), EncodingRules::Ber);
            assert!(matches!(result, Err(Asn1Error::MalformedEncoding(_))));
        }
        assert!(
            decode_length(&[0x89, 1, 0, 0, 0, 0, 0, 0, 0, 0], EncodingRules::Ber).is_err()
        );
    }

    #[test]
    fn test_ber_length_non_minimal() {
        assert_eq!(
            decode_length(&[0x81, 0x05], EncodingRules::Ber).unwrap(),
            BerLength::Definite(5)
        );
        assert!(decode_length(&[0x81, 0x05], EncodingRules::Der).is_err());
        assert!(decode_length(&[0x82, 0x00, 0x80], EncodingRules::Der).is_err());
        assert_eq!(
            decode_length(&[0x82, 0x00, 0x80], EncodingRules::Ber).unwrap(),
            BerLength::Definite(128)
        );
    }
}
