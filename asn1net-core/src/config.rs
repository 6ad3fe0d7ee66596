//! Codec configuration
//!
//! Strictness is an explicit option rather than something inferred per type:
//! every decoder and encoder carries the [`EncodingRules`] it applies.

use serde::{Deserialize, Serialize};

/// Default cap on constructed-value nesting while decoding
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Encoding rule set
///
/// - **Ber**: permissive. Non-canonical booleans, indefinite lengths, segmented
///   strings and non-minimal length/tag octets are accepted on input.
/// - **Der**: canonical. Any encoding that is not the unique DER form is
///   rejected on input and never produced on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EncodingRules {
    #[default]
    Ber,
    Der,
}

impl EncodingRules {
    /// Whether DER canonical-form checks apply
    pub fn is_strict(self) -> bool {
        self == EncodingRules::Der
    }
}

/// Decoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Rule set used to validate framing and values
    pub rules: EncodingRules,
    /// Maximum nesting of constructed values; top-level nodes sit at depth 0
    pub max_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            rules: EncodingRules::Ber,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecoderConfig {
    /// Lenient BER decoding
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Strict DER decoding
    pub fn strict() -> Self {
        Self {
            rules: EncodingRules::Der,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Length form used for constructed values when encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LengthForm {
    #[default]
    Definite,
    /// `0x80` followed by the children and a closing end-of-contents marker.
    /// BER only.
    Indefinite,
}

/// Encoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    pub rules: EncodingRules,
    pub length_form: LengthForm,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            rules: EncodingRules::Der,
            length_form: LengthForm::Definite,
        }
    }
}

impl EncoderConfig {
    /// DER output, definite lengths only
    pub fn der() -> Self {
        Self::default()
    }

    /// BER output with the given length form for constructed values
    pub fn ber(length_form: LengthForm) -> Self {
        Self {
            rules: EncodingRules::Ber,
            length_form,
        }
    }
}
