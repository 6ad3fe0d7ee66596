//! BER/DER decoder
//!
//! The decoder frames TLV triplets and hands each one out as a pending
//! [`Asn1Node`]: identifier and length are parsed and checked, the value
//! octets are only windowed. Content is decoded when it is first read.
//!
//! # Usage Example
//!
//! ```rust
//! use asn1net_ber::ber::BerDecoder;
//!
//! let mut decoder = BerDecoder::new(vec![0x02u8, 0x02, 0x30, 0x39]);
//! let mut node = decoder.read_node()?;
//! assert_eq!(node.as_i64()?, 12345);
//! # Ok::<(), asn1net_core::Asn1Error>(())
//! ```

use crate::ber::types::{BerLength, BerTag};
use crate::node::Asn1Node;
use crate::window::ByteWindow;
use asn1net_core::{Asn1Error, Asn1Result, DecoderConfig};
use bytes::Bytes;
use std::io::SeekFrom;

/// One framed TLV triplet
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub identifier: BerTag,
    pub length: BerLength,
    /// Value octets; for an indefinite length, the children without the
    /// closing end-of-contents marker
    pub value: ByteWindow,
    /// Number of identifier and length octets
    pub header_len: usize,
}

/// Decoder over a buffer of concatenated BER/DER values
///
/// # Position Tracking
///
/// The decoder keeps a cursor that advances past each framed value, so
/// siblings are read one after another from the same buffer.
///
/// # Error Handling
///
/// Framing errors are reported as `MalformedEncoding`. As an [`Iterator`] the
/// decoder yields the error once and then stops; nodes yielded before it stay
/// valid.
#[derive(Debug, Clone)]
pub struct BerDecoder {
    window: ByteWindow,
    config: DecoderConfig,
    depth: usize,
    failed: bool,
}

impl BerDecoder {
    /// Create a lenient (BER) decoder over `data`
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self::with_config(data, DecoderConfig::default())
    }

    /// Create a decoder with explicit rules and depth limit
    pub fn with_config(data: impl Into<Bytes>, config: DecoderConfig) -> Self {
        Self::nested(ByteWindow::from_bytes(data), config, 0)
    }

    /// Decoder over the value octets of a constructed node at `depth - 1`
    pub(crate) fn nested(mut window: ByteWindow, config: DecoderConfig, depth: usize) -> Self {
        window.rewind();
        Self {
            window,
            config,
            depth,
            failed: false,
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Nesting depth of the nodes this decoder yields
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Get current position in the buffer
    pub fn position(&self) -> usize {
        self.window.position()
    }

    /// Get remaining bytes
    pub fn remaining(&self) -> usize {
        self.window.remaining()
    }

    /// Check if there is more data to decode
    pub fn has_remaining(&self) -> bool {
        self.window.has_remaining()
    }

    /// Frame the next TLV triplet
    ///
    /// # Decoding Process
    /// 1. Decode identifier and length octets under the configured rules
    /// 2. Definite length: window the value and skip past it
    /// 3. Indefinite length: scan the children up to the matching
    ///    end-of-contents marker, window them, and skip past the marker
    ///
    /// # Errors
    /// `MalformedEncoding` if:
    /// - the depth limit is exceeded
    /// - identifier or length octets are truncated or, under DER, not minimal
    /// - the value overruns the buffer
    /// - an end-of-contents marker appears outside an indefinite value
    /// - an indefinite length is used on a primitive value, under DER, or is
    ///   never closed
    pub fn read_frame(&mut self) -> Asn1Result<Frame> {
        self.check_depth(self.depth)?;

        let start = self.window.position();
        let identifier = BerTag::decode(&mut self.window, self.config.rules)?;
        let length = BerLength::decode(&mut self.window, self.config.rules)?;
        let header_len = self.window.position() - start;

        if identifier.is_eoc() {
            return Err(Asn1Error::malformed(format!(
                "Unexpected end-of-contents at offset {}",
                start
            )));
        }

        let value = match length {
            BerLength::Definite(len) => {
                if len > self.window.remaining() {
                    return Err(Asn1Error::malformed(format!(
                        "{} value of {} octets overruns the {} remaining",
                        identifier,
                        len,
                        self.window.remaining()
                    )));
                }
                let value = self.window.sub_window(self.window.position(), len)?;
                self.window.seek(SeekFrom::Current(len as i64))?;
                value
            }
            BerLength::Indefinite => {
                if !identifier.is_constructed() {
                    return Err(Asn1Error::malformed(format!(
                        "Indefinite length on primitive {}",
                        identifier
                    )));
                }
                if self.config.rules.is_strict() {
                    return Err(Asn1Error::malformed(format!(
                        "Indefinite length is not allowed under DER ({})",
                        identifier
                    )));
                }
                let content_start = self.window.position();
                let content_end = self.scan_indefinite()?;
                log::debug!(
                    "Indefinite {} spans {} content octets",
                    identifier,
                    content_end - content_start
                );
                self.window
                    .sub_window(content_start, content_end - content_start)?
            }
        };

        log::trace!(
            "Framed {} at offset {} ({} header + {} value octets)",
            identifier,
            start,
            header_len,
            value.len()
        );

        Ok(Frame {
            identifier,
            length,
            value,
            header_len,
        })
    }

    /// Frame the next value as a pending node
    pub fn read_node(&mut self) -> Asn1Result<Asn1Node> {
        let frame = self.read_frame()?;
        Asn1Node::from_frame(frame, self.config, self.depth)
    }

    /// Frame every remaining value
    ///
    /// # Errors
    /// Stops at the first framing error.
    pub fn read_all(&mut self) -> Asn1Result<Vec<Asn1Node>> {
        self.by_ref().collect()
    }

    /// Skip the children of an indefinite value at the cursor
    ///
    /// Returns the position where the closing end-of-contents marker starts;
    /// the cursor is left after the marker.
    fn scan_indefinite(&mut self) -> Asn1Result<usize> {
        loop {
            if !self.window.has_remaining() {
                return Err(Asn1Error::malformed(
                    "Missing end-of-contents for indefinite length",
                ));
            }
            let element_start = self.window.position();
            if self.skip_element(self.depth + 1)? {
                return Ok(element_start);
            }
        }
    }

    /// Skip one element at `depth`
    ///
    /// Returns `true` if the element was an end-of-contents marker.
    fn skip_element(&mut self, depth: usize) -> Asn1Result<bool> {
        let identifier = BerTag::decode(&mut self.window, self.config.rules)?;
        let length = BerLength::decode(&mut self.window, self.config.rules)?;

        if identifier.is_eoc() {
            if length != BerLength::Definite(0) {
                return Err(Asn1Error::malformed(
                    "End-of-contents marker with non-zero length",
                ));
            }
            return Ok(true);
        }
        self.check_depth(depth)?;

        match length {
            BerLength::Definite(len) => {
                if len > self.window.remaining() {
                    return Err(Asn1Error::malformed(format!(
                        "{} value of {} octets overruns the {} remaining",
                        identifier,
                        len,
                        self.window.remaining()
                    )));
                }
                self.window.seek(SeekFrom::Current(len as i64))?;
            }
            BerLength::Indefinite => {
                if !identifier.is_constructed() {
                    return Err(Asn1Error::malformed(format!(
                        "Indefinite length on primitive {}",
                        identifier
                    )));
                }
                loop {
                    if !self.window.has_remaining() {
                        return Err(Asn1Error::malformed(
                            "Missing end-of-contents for indefinite length",
                        ));
                    }
                    if self.skip_element(depth + 1)? {
                        break;
                    }
                }
            }
        }
        Ok(false)
    }

    fn check_depth(&self, depth: usize) -> Asn1Result<()> {
        if depth > self.config.max_depth {
            return Err(Asn1Error::malformed(format!(
                "Nesting depth {} exceeds the limit of {}",
                depth, self.config.max_depth
            )));
        }
        Ok(())
    }
}

impl Iterator for BerDecoder {
    type Item = Asn1Result<Asn1Node>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.has_remaining() {
            return None;
        }
        let result = self.read_node();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::types::BerTagClass;

    fn lenient(data: &'static [u8]) -> BerDecoder {
        BerDecoder::new(Bytes::from_static(data))
    }

    fn strict(data: &'static [u8]) -> BerDecoder {
        BerDecoder::with_config(Bytes::from_static(data), DecoderConfig::strict())
    }

    #[test]
    fn test_read_frame() {
        let mut decoder = lenient(&[0x04, 0x03, 0x01, 0x02, 0x03, 0x05, 0x00]);
        let frame = decoder.read_frame().unwrap();
        assert_eq!(frame.identifier, BerTag::universal(false, 4));
        assert_eq!(frame.length, BerLength::Definite(3));
        assert_eq!(frame.value.as_slice(), &[0x01, 0x02, 0x03]);
        assert_eq!(frame.header_len, 2);
        assert_eq!(decoder.position(), 5);
        assert_eq!(decoder.remaining(), 2);
    }

    #[test]
    fn test_siblings_in_order() {
        let nodes = lenient(&[0x01, 0x01, 0xFF, 0x02, 0x01, 0x07, 0x05, 0x00])
            .read_all()
            .unwrap();
        let numbers: Vec<u32> = nodes.iter().map(|n| n.identifier().number()).collect();
        assert_eq!(numbers, vec![1, 2, 5]);
        assert!(nodes.iter().all(|n| !n.is_decoded()));
    }

    #[test]
    fn test_overrun_is_malformed() {
        let result = lenient(&[0x04, 0x05, 0x01]).read_frame();
        assert!(matches!(result, Err(Asn1Error::MalformedEncoding(_))));
    }

    #[test]
    fn test_indefinite_matches_definite() {
        let indefinite = lenient(&[0x30, 0x80, 0x02, 0x01, 0x05, 0x00, 0x00])
            .read_all()
            .unwrap();
        let definite = lenient(&[0x30, 0x03, 0x02, 0x01, 0x05]).read_all().unwrap();
        assert_eq!(indefinite, definite);
    }

    #[test]
    fn test_indefinite_frame_excludes_eoc() {
        let mut decoder = lenient(&[0x30, 0x80, 0x02, 0x01, 0x05, 0x00, 0x00, 0x05, 0x00]);
        let frame = decoder.read_frame().unwrap();
        assert!(frame.length.is_indefinite());
        assert_eq!(frame.value.as_slice(), &[0x02, 0x01, 0x05]);
        assert_eq!(decoder.position(), 7);
    }

    #[test]
    fn test_nested_indefinite() {
        let mut nodes = lenient(&[
            0x30, 0x80, 0xA0, 0x80, 0x02, 0x01, 0x01, 0x00, 0x00, 0x01, 0x01, 0x00, 0x00,
            0x00,
        ])
        .read_all()
        .unwrap();
        assert_eq!(nodes.len(), 1);

        let children = nodes[0].children_mut().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].class(), BerTagClass::ContextSpecific);
        assert!(!children[1].as_bool().unwrap());

        let inner = children[0].children_mut().unwrap();
        assert_eq!(inner[0].as_i64().unwrap(), 1);
    }

    #[test]
    fn test_missing_eoc() {
        let result = lenient(&[0x30, 0x80, 0x02, 0x01, 0x05]).read_frame();
        assert!(matches!(result, Err(Asn1Error::MalformedEncoding(_))));
    }

    #[test]
    fn test_indefinite_rejected() {
        assert!(strict(&[0x30, 0x80, 0x00, 0x00]).read_frame().is_err());
        assert!(lenient(&[0x04, 0x80, 0x00, 0x00]).read_frame().is_err());
    }

    #[test]
    fn test_stray_eoc() {
        let mut decoder = lenient(&[0x05, 0x00, 0x00, 0x00, 0x05, 0x00]);
        assert!(decoder.next().unwrap().is_ok());
        assert!(matches!(
            decoder.next(),
            Some(Err(Asn1Error::MalformedEncoding(_)))
        ));
        assert!(decoder.next().is_none());
    }

    #[test]
    fn test_depth_limit_on_indefinite_scan() {
        let data = &[
            0x30, 0x80, 0x30, 0x80, 0x30, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        let config = DecoderConfig::lenient().with_max_depth(1);
        let result = BerDecoder::with_config(Bytes::from_static(data), config).read_frame();
        assert!(matches!(result, Err(Asn1Error::MalformedEncoding(_))));

        let config = DecoderConfig::lenient().with_max_depth(2);
        assert!(
            BerDecoder::with_config(Bytes::from_static(data), config)
                .read_frame()
                .is_ok()
        );
    }

    #[test]
    fn test_depth_limit_on_lazy_children() {
        let data = &[0x30, 0x06, 0x30, 0x04, 0x30, 0x02, 0x30, 0x00];
        let config = DecoderConfig::lenient().with_max_depth(1);
        let mut root = BerDecoder::with_config(Bytes::from_static(data), config)
            .read_node()
            .unwrap();
        let level1 = &mut root.children_mut().unwrap()[0];
        assert!(matches!(
            level1.children_mut(),
            Err(Asn1Error::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_strict_rejects_non_minimal_length() {
        assert!(strict(&[0x04, 0x81, 0x01, 0xAA]).read_frame().is_err());
        assert!(lenient(&[0x04, 0x81, 0x01, 0xAA]).read_frame().is_ok());
    }
}
