use thiserror::Error;

/// Main error type for asn1net operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Asn1Error {
    /// Framing or value octets violate the BER/DER wire format
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// A type's legality rule was violated while encoding
    #[error("Format error: {0}")]
    Format(String),

    /// Caller supplied arguments that no encoding can represent
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Seek or read outside the bounds of a byte window
    #[error("Out of range: {0}")]
    OutOfRange(String),
}

impl Asn1Error {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Asn1Error::MalformedEncoding(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Asn1Error::Format(msg.into())
    }

    pub fn argument(msg: impl Into<String>) -> Self {
        Asn1Error::Argument(msg.into())
    }

    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Asn1Error::OutOfRange(msg.into())
    }
}

impl From<Asn1Error> for std::io::Error {
    fn from(err: Asn1Error) -> Self {
        let kind = match err {
            Asn1Error::OutOfRange(_) => std::io::ErrorKind::UnexpectedEof,
            _ => std::io::ErrorKind::InvalidData,
        };
        std::io::Error::new(kind, err)
    }
}

/// Result type alias for asn1net operations
pub type Asn1Result<T> = Result<T, Asn1Error>;
