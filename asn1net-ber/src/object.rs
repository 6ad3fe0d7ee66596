//! ASN.1 object model
//!
//! An [`Asn1Object`] pairs an identifier with content in one of two states:
//!
//! - **Pending**: built by the decoder. Only a [`ByteWindow`] over the value
//!   octets is held; nothing has been interpreted yet.
//! - **Decoded**: the typed content is materialized. Objects built for encoding
//!   start here; decoded objects move here on the first successful
//!   [`Asn1Object::content`] call and never go back.
//!
//! The per-type rules live in [`Asn1Type`] implementations; the object itself
//! only handles the state transition and framing legality.

use crate::ber::types::{BerTag, UniversalTag};
use crate::window::ByteWindow;
use asn1net_core::{Asn1Error, Asn1Result, DecoderConfig, EncoderConfig};
use std::fmt;

/// Which identifier forms a type may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// Always primitive
    Primitive,
    /// Always constructed
    Constructed,
    /// Written primitive; BER input may split the value into constructed
    /// segments (octet strings and restricted character strings)
    Segmentable,
}

impl Form {
    /// Legality check applied before a value is encoded
    pub fn check_write(self, identifier: &BerTag) -> Asn1Result<()> {
        match (self, identifier.is_constructed()) {
            (Form::Constructed, false) => Err(Asn1Error::format(format!(
                "{} must use the constructed form",
                identifier
            ))),
            (Form::Primitive, true) => Err(Asn1Error::format(format!(
                "{} must use the primitive form",
                identifier
            ))),
            (Form::Segmentable, true) => Err(Asn1Error::format(
                "For bit string, octet string and restricted character string types, \
                 the constructed form of encoding shall not be used",
            )),
            _ => Ok(()),
        }
    }

    /// Legality check applied when a frame is matched to a type
    pub fn check_read(self, identifier: &BerTag, config: &DecoderConfig) -> Asn1Result<()> {
        let legal = match (self, identifier.is_constructed()) {
            (Form::Constructed, constructed) => constructed,
            (Form::Primitive, constructed) => !constructed,
            (Form::Segmentable, constructed) => !constructed || !config.rules.is_strict(),
        };
        if legal {
            Ok(())
        } else {
            Err(Asn1Error::malformed(format!(
                "{} is not a legal form under {:?}",
                identifier, config.rules
            )))
        }
    }
}

/// What the decoder knew when it framed a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeContext {
    pub identifier: BerTag,
    pub config: DecoderConfig,
    /// Nesting depth of the node; top-level nodes are at 0
    pub depth: usize,
}

/// Per-type encode/decode rules
pub trait Asn1Type {
    /// Materialized content
    type Content: Clone + PartialEq + fmt::Debug;

    /// Identifier forms the type may use
    const FORM: Form;

    /// Encode content into value octets (no identifier or length)
    fn write_value(content: &Self::Content, config: &EncoderConfig) -> Asn1Result<Vec<u8>>;

    /// Decode content from the value octets of a framed node
    fn read_value(window: &ByteWindow, context: &DecodeContext) -> Asn1Result<Self::Content>;

    /// Short content description for diagnostics
    fn summary(content: &Self::Content) -> String {
        format!("{:?}", content)
    }
}

/// A type with a fixed universal tag
pub trait UniversalType: Asn1Type {
    const TAG: UniversalTag;
}

/// Lazy content state
#[derive(Debug, Clone, PartialEq)]
pub enum ContentState<C> {
    Pending {
        window: ByteWindow,
        context: DecodeContext,
    },
    Decoded {
        value: C,
        /// Value octets the content came from, kept for diagnostics
        raw: Option<ByteWindow>,
    },
}

/// Generic ASN.1 object: identifier plus lazily decoded content
pub struct Asn1Object<T: Asn1Type> {
    identifier: BerTag,
    state: ContentState<T::Content>,
}

impl<T: UniversalType> Asn1Object<T> {
    /// Create an object for encoding, using the type's default form
    pub fn new(content: T::Content) -> Self {
        Self::with_form(content, T::FORM == Form::Constructed)
    }

    /// Create an object for encoding with an explicit constructed flag
    ///
    /// The flag is checked against the type's form rule when encoding, not here.
    pub fn with_form(content: T::Content, constructed: bool) -> Self {
        Self::with_identifier(BerTag::universal(constructed, T::TAG.number()), content)
    }
}

impl<T: Asn1Type> Asn1Object<T> {
    /// Create an object for encoding under an arbitrary identifier
    pub fn with_identifier(identifier: BerTag, content: T::Content) -> Self {
        Self {
            identifier,
            state: ContentState::Decoded {
                value: content,
                raw: None,
            },
        }
    }

    /// Create a pending object over the value octets of a framed node
    pub(crate) fn pending(window: ByteWindow, context: DecodeContext) -> Self {
        Self {
            identifier: context.identifier,
            state: ContentState::Pending { window, context },
        }
    }

    pub fn identifier(&self) -> BerTag {
        self.identifier
    }

    pub fn state(&self) -> &ContentState<T::Content> {
        &self.state
    }

    /// Whether the content has been materialized
    pub fn is_decoded(&self) -> bool {
        matches!(self.state, ContentState::Decoded { .. })
    }

    /// Value octets of a decoded object, `None` for objects built for encoding
    pub fn raw_window(&self) -> Option<&ByteWindow> {
        match &self.state {
            ContentState::Pending { window, .. } => Some(window),
            ContentState::Decoded { raw, .. } => raw.as_ref(),
        }
    }

    /// Length of the value octets the object was decoded from
    pub fn raw_len(&self) -> Option<usize> {
        self.raw_window().map(ByteWindow::len)
    }

    /// Materialized content, decoding it on first access
    ///
    /// # Errors
    /// Propagates the type's decode error. A failed decode leaves the object
    /// pending, so a later call reports the same error.
    pub fn content(&mut self) -> Asn1Result<&T::Content> {
        self.materialize()?;
        match &self.state {
            ContentState::Decoded { value, .. } => Ok(value),
            ContentState::Pending { .. } => Err(Asn1Error::argument(
                "Content requested on an object with no decoded value",
            )),
        }
    }

    /// Mutable access to the materialized content
    ///
    /// Needed to reach the lazily decoded children of constructed values.
    pub fn content_mut(&mut self) -> Asn1Result<&mut T::Content> {
        self.materialize()?;
        match &mut self.state {
            ContentState::Decoded { value, .. } => Ok(value),
            ContentState::Pending { .. } => Err(Asn1Error::argument(
                "Content requested on an object with no decoded value",
            )),
        }
    }

    pub fn into_content(mut self) -> Asn1Result<T::Content> {
        self.materialize()?;
        match self.state {
            ContentState::Decoded { value, .. } => Ok(value),
            ContentState::Pending { .. } => Err(Asn1Error::argument(
                "Content requested on an object with no decoded value",
            )),
        }
    }

    fn materialize(&mut self) -> Asn1Result<()> {
        if let ContentState::Pending { window, context } = &self.state {
            let value = T::read_value(window, context)?;
            log::debug!(
                "Materialized {} from {} value octets at depth {}",
                self.identifier,
                window.len(),
                context.depth
            );
            let raw = Some(window.clone());
            self.state = ContentState::Decoded { value, raw };
        }
        Ok(())
    }

    /// Identifier the object is written under
    ///
    /// Segmented strings read from BER input go back out in the primitive form.
    pub fn output_identifier(&self) -> BerTag {
        if T::FORM == Form::Segmentable && self.raw_window().is_some() {
            BerTag::new(self.identifier.class(), false, self.identifier.number())
        } else {
            self.identifier
        }
    }

    /// Value octets for encoding under `config`
    ///
    /// A pending object is decoded into a temporary (the cache is left alone)
    /// and re-encoded, so BER input comes out in the writer's form.
    pub fn value_octets(&self, config: &EncoderConfig) -> Asn1Result<Vec<u8>> {
        T::FORM.check_write(&self.output_identifier())?;
        match &self.state {
            ContentState::Decoded { value, .. } => T::write_value(value, config),
            ContentState::Pending { window, context } => {
                let value = T::read_value(window, context)?;
                T::write_value(&value, config)
            }
        }
    }
}

impl<T: Asn1Type> Clone for Asn1Object<T> {
    fn clone(&self) -> Self {
        Self {
            identifier: self.identifier,
            state: self.state.clone(),
        }
    }
}

impl<T: Asn1Type> PartialEq for Asn1Object<T> {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier && self.state == other.state
    }
}

impl<T: Asn1Type> fmt::Debug for Asn1Object<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asn1Object")
            .field("identifier", &self.identifier)
            .field("state", &self.state)
            .finish()
    }
}

impl<T: Asn1Type> fmt::Display for Asn1Object<T> {
    /// `CLASS|(P)|TAG - [rawlen]`, followed by ` - content` once decoded
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - [", self.identifier)?;
        if let Some(len) = self.raw_len() {
            write!(f, "{}", len)?;
        }
        f.write_str("]")?;
        if let ContentState::Decoded { value, .. } = &self.state {
            write!(f, " - {}", T::summary(value))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    thread_local! {
        static READS: Cell<usize> = const { Cell::new(0) };
    }

    /// Counts decode calls and fails on a value octet of 0xEE
    struct CountingType;

    impl Asn1Type for CountingType {
        type Content = u8;
        const FORM: Form = Form::Primitive;

        fn write_value(content: &u8, _config: &EncoderConfig) -> Asn1Result<Vec<u8>> {
            Ok(vec![*content])
        }

        fn read_value(window: &ByteWindow, _context: &DecodeContext) -> Asn1Result<u8> {
            READS.with(|reads| reads.set(reads.get() + 1));
            match window.as_slice() {
                [0xEE] => Err(Asn1Error::malformed("poisoned value")),
                [value] => Ok(*value),
                _ => Err(Asn1Error::malformed("expected one octet")),
            }
        }
    }

    impl UniversalType for CountingType {
        const TAG: UniversalTag = UniversalTag::Integer;
    }

    fn pending(octets: &'static [u8]) -> Asn1Object<CountingType> {
        let identifier = BerTag::universal(false, 2);
        let context = DecodeContext {
            identifier,
            config: DecoderConfig::default(),
            depth: 0,
        };
        Asn1Object::pending(ByteWindow::from_bytes(octets), context)
    }

    #[test]
    fn test_content_decodes_once() {
        READS.with(|reads| reads.set(0));
        let mut object = pending(&[7]);
        assert!(!object.is_decoded());
        assert_eq!(READS.with(Cell::get), 0);

        assert_eq!(*object.content().unwrap(), 7);
        assert_eq!(*object.content().unwrap(), 7);
        assert!(object.is_decoded());
        assert_eq!(READS.with(Cell::get), 1);
        assert_eq!(object.raw_len(), Some(1));
    }

    #[test]
    fn test_failed_decode_stays_pending() {
        let mut object = pending(&[0xEE]);
        assert!(matches!(
            object.content(),
            Err(Asn1Error::MalformedEncoding(_))
        ));
        assert!(!object.is_decoded());
        assert!(object.content().is_err());
    }

    #[test]
    fn test_value_octets_does_not_cache() {
        READS.with(|reads| reads.set(0));
        let object = pending(&[9]);
        assert_eq!(object.value_octets(&EncoderConfig::der()).unwrap(), vec![9]);
        assert!(!object.is_decoded());
        assert_eq!(READS.with(Cell::get), 1);
    }

    #[test]
    fn test_built_object_has_no_raw_window() {
        let object = Asn1Object::<CountingType>::new(3);
        assert!(object.is_decoded());
        assert_eq!(object.raw_len(), None);
        assert_eq!(object.to_string(), "UNIVERSAL|(P)|INTEGER - [] - 3");
    }

    #[test]
    fn test_form_rules() {
        let strict = DecoderConfig::strict();
        let lenient = DecoderConfig::lenient();
        let constructed = BerTag::universal(true, 4);
        let primitive = BerTag::universal(false, 4);

        assert!(matches!(
            Form::Segmentable.check_write(&constructed),
            Err(Asn1Error::Format(_))
        ));
        assert!(Form::Segmentable.check_write(&primitive).is_ok());
        assert!(Form::Segmentable.check_read(&constructed, &lenient).is_ok());
        assert!(Form::Segmentable.check_read(&constructed, &strict).is_err());
        assert!(Form::Constructed.check_write(&primitive).is_err());
        assert!(Form::Primitive.check_read(&constructed, &lenient).is_err());
    }
}
