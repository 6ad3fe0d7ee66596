//! OBJECT IDENTIFIER

use crate::ber::types::UniversalTag;
use crate::object::{Asn1Object, Asn1Type, DecodeContext, Form, UniversalType};
use crate::window::ByteWindow;
use asn1net_core::{Asn1Error, Asn1Result, EncoderConfig};

pub struct ObjectIdentifierType;

pub type Asn1ObjectIdentifier = Asn1Object<ObjectIdentifierType>;

/// Append `value` in base-128, continuation bit on all but the last octet
fn push_base128(out: &mut Vec<u8>, value: u64) {
    let mut digits = [0u8; 10];
    let mut count = 0;
    let mut remaining = value;
    loop {
        digits[count] = (remaining & 0x7F) as u8;
        count += 1;
        remaining >>= 7;
        if remaining == 0 {
            break;
        }
    }
    for i in (0..count).rev() {
        out.push(if i > 0 { digits[i] | 0x80 } else { digits[i] });
    }
}

impl Asn1Type for ObjectIdentifierType {
    type Content = Vec<u32>;
    const FORM: Form = Form::Primitive;

    /// # OID Encoding Rules
    /// - The first two arcs X.Y are packed into one sub-identifier `40*X + Y`
    /// - Every sub-identifier is base-128, bit 8 set on all but its last octet
    ///
    /// # Errors
    /// `Argument` if there are fewer than two arcs, the first arc exceeds 2, or
    /// the second arc is 40 or more under a first arc of 0 or 1.
    fn write_value(content: &Vec<u32>, _config: &EncoderConfig) -> Asn1Result<Vec<u8>> {
        let (first, second) = match content.as_slice() {
            [first, second, ..] => (*first, *second),
            _ => {
                return Err(Asn1Error::argument(
                    "Object identifier must have at least 2 components",
                ));
            }
        };
        if first > 2 {
            return Err(Asn1Error::argument(format!(
                "First OID arc must be 0, 1 or 2, got {}",
                first
            )));
        }
        if first < 2 && second >= 40 {
            return Err(Asn1Error::argument(format!(
                "Second OID arc must be below 40 under arc {}, got {}",
                first, second
            )));
        }

        let mut bytes = Vec::with_capacity(content.len() * 2);
        push_base128(&mut bytes, 40 * first as u64 + second as u64);
        for &arc in &content[2..] {
            push_base128(&mut bytes, arc as u64);
        }
        Ok(bytes)
    }

    fn read_value(window: &ByteWindow, context: &DecodeContext) -> Asn1Result<Vec<u32>> {
        let bytes = window.as_slice();
        if bytes.is_empty() {
            return Err(Asn1Error::malformed("Empty object identifier encoding"));
        }

        let mut subidentifiers = Vec::new();
        let mut value = 0u64;
        let mut start_of_subidentifier = true;
        for &byte in bytes {
            if start_of_subidentifier && byte == 0x80 && context.config.rules.is_strict() {
                return Err(Asn1Error::malformed(
                    "OID sub-identifier has a leading 0x80 octet",
                ));
            }
            if value > (u32::MAX as u64) << 1 {
                return Err(Asn1Error::malformed("OID component overflow"));
            }
            value = (value << 7) | (byte & 0x7F) as u64;
            start_of_subidentifier = byte & 0x80 == 0;
            if start_of_subidentifier {
                subidentifiers.push(value);
                value = 0;
            }
        }
        if !start_of_subidentifier {
            return Err(Asn1Error::malformed("Truncated OID sub-identifier"));
        }

        let mut oid = Vec::with_capacity(subidentifiers.len() + 1);
        let first = subidentifiers[0];
        let (x, y) = match first {
            0..=39 => (0, first),
            40..=79 => (1, first - 40),
            _ => (2, first - 80),
        };
        oid.push(x);
        oid.push(y);
        oid.extend(subidentifiers[1..].iter().copied());

        oid.into_iter()
            .map(|arc| {
                u32::try_from(arc).map_err(|_| Asn1Error::malformed("OID component overflow"))
            })
            .collect()
    }

    fn summary(content: &Vec<u32>) -> String {
        content
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl UniversalType for ObjectIdentifierType {
    const TAG: UniversalTag = UniversalTag::ObjectIdentifier;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::types::BerTag;
    use asn1net_core::DecoderConfig;

    fn read(octets: &'static [u8], config: DecoderConfig) -> Asn1Result<Vec<u32>> {
        let context = DecodeContext {
            identifier: BerTag::universal(false, 6),
            config,
            depth: 0,
        };
        ObjectIdentifierType::read_value(&ByteWindow::from_bytes(octets), &context)
    }

    #[test]
    fn test_encode_rsa_oid() {
        let bytes =
            ObjectIdentifierType::write_value(&vec![1, 2, 840, 113549], &EncoderConfig::der())
                .unwrap();
        assert_eq!(bytes, vec![0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D]);
    }

    #[test]
    fn test_large_first_subidentifier() {
        // 2.999.3 packs 1079 into two octets
        let bytes =
            ObjectIdentifierType::write_value(&vec![2, 999, 3], &EncoderConfig::der()).unwrap();
        assert_eq!(bytes, vec![0x88, 0x37, 0x03]);
        assert_eq!(
            read(&[0x88, 0x37, 0x03], DecoderConfig::strict()).unwrap(),
            vec![2, 999, 3]
        );
    }

    #[test]
    fn test_invalid_arcs() {
        let config = EncoderConfig::der();
        for arcs in [vec![1], vec![3, 1], vec![1, 40]] {
            assert!(matches!(
                ObjectIdentifierType::write_value(&arcs, &config),
                Err(Asn1Error::Argument(_))
            ));
        }
    }

    #[test]
    fn test_decode_malformed() {
        assert!(read(&[], DecoderConfig::lenient()).is_err());
        assert!(read(&[0x2A, 0x86], DecoderConfig::lenient()).is_err());
        assert!(read(&[0x2A, 0x80, 0x01], DecoderConfig::strict()).is_err());
        assert_eq!(
            read(&[0x2A, 0x80, 0x01], DecoderConfig::lenient()).unwrap(),
            vec![1, 2, 1]
        );
        assert!(read(&[0x2A, 0x90, 0x80, 0x80, 0x80, 0x00], DecoderConfig::lenient()).is_err());
    }
}
