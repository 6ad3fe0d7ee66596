//! Type catalogue
//!
//! One [`Asn1Type`](crate::object::Asn1Type) implementation per supported
//! ASN.1 type, with an `Asn1*` alias for the matching
//! [`Asn1Object`](crate::object::Asn1Object).

pub mod boolean;
pub mod constructed;
pub mod eoc;
pub mod integer;
pub mod null;
pub mod octet_string;
pub mod oid;
pub mod strings;
pub mod tagged;

pub use boolean::{Asn1Boolean, BooleanType};
pub use constructed::{Asn1Sequence, Asn1Set, SequenceType, SetType};
pub use eoc::Asn1Eoc;
pub use integer::{Asn1Integer, IntegerType};
pub use null::{Asn1Null, NullType};
pub use octet_string::{Asn1OctetString, OctetStringType};
pub use oid::{Asn1ObjectIdentifier, ObjectIdentifierType};
pub use strings::{
    Asn1Ia5String, Asn1PrintableString, Asn1T61String, Asn1Utf8String, Ia5StringType,
    PrintableStringType, T61StringType, Utf8StringType,
};
pub use tagged::{Asn1Opaque, Asn1Tagged, OpaqueType, TaggedType};

use crate::ber::decoder::BerDecoder;
use crate::object::DecodeContext;
use crate::window::ByteWindow;
use asn1net_core::{Asn1Error, Asn1Result};
use bytes::{Bytes, BytesMut};

/// Value octets of a segmentable type
///
/// A primitive value is returned as-is. A constructed (BER) value is the
/// concatenation of its segments, which must carry the same universal tag and
/// may themselves be constructed.
pub(crate) fn segmented_octets(window: &ByteWindow, context: &DecodeContext) -> Asn1Result<Bytes> {
    if !context.identifier.is_constructed() {
        let mut window = window.clone();
        window.rewind();
        return Ok(window.read_to_end());
    }

    log::debug!(
        "Reassembling constructed {} from BER segments",
        context.identifier
    );
    let mut octets = BytesMut::with_capacity(window.len());
    collect_segments(window, context, &mut octets)?;
    Ok(octets.freeze())
}

fn collect_segments(
    window: &ByteWindow,
    context: &DecodeContext,
    octets: &mut BytesMut,
) -> Asn1Result<()> {
    let mut decoder = BerDecoder::nested(window.clone(), context.config, context.depth + 1);
    while decoder.has_remaining() {
        let frame = decoder.read_frame()?;
        if frame.identifier.class() != context.identifier.class()
            || frame.identifier.number() != context.identifier.number()
        {
            return Err(Asn1Error::malformed(format!(
                "Segment {} inside {}",
                frame.identifier, context.identifier
            )));
        }
        if frame.identifier.is_constructed() {
            let nested = DecodeContext {
                identifier: frame.identifier,
                config: context.config,
                depth: context.depth + 1,
            };
            collect_segments(&frame.value, &nested, octets)?;
        } else {
            octets.extend_from_slice(frame.value.as_slice());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::types::BerTag;
    use asn1net_core::DecoderConfig;
    use std::sync::{Mutex, Once};

    /// Records every log call made in this test binary
    struct RecordingLogger {
        records: Mutex<Vec<(log::Level, String)>>,
    }

    impl log::Log for RecordingLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut records) = self.records.lock() {
                records.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: RecordingLogger = RecordingLogger {
        records: Mutex::new(Vec::new()),
    };
    static INIT: Once = Once::new();

    fn recorded(needle: &str) -> Vec<log::Level> {
        INIT.call_once(|| {
            log::set_logger(&LOGGER).unwrap();
            log::set_max_level(log::LevelFilter::Trace);
        });
        LOGGER
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, message)| message.contains(needle))
            .map(|(level, _)| *level)
            .collect()
    }

    #[test]
    fn test_segment_reassembly_logs_at_debug() {
        recorded("");
        // [UNIVERSAL 4] constructed, segments "A", "B" and a nested "C"
        let octets: &'static [u8] = &[
            0x04, 0x01, 0x41, 0x04, 0x01, 0x42, 0x24, 0x03, 0x04, 0x01, 0x43,
        ];
        let context = DecodeContext {
            identifier: BerTag::universal(true, 4),
            config: DecoderConfig::lenient(),
            depth: 0,
        };
        let value = segmented_octets(&ByteWindow::from_bytes(octets), &context).unwrap();
        assert_eq!(&value[..], b"ABC");

        let levels = recorded("from BER segments");
        assert!(!levels.is_empty());
        assert!(levels.iter().all(|level| *level == log::Level::Debug));
    }
}
