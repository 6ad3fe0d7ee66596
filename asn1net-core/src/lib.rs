//! Core types for the asn1net BER/DER codec
//!
//! This crate provides the error type and codec configuration shared by the
//! encoding engine and the facade crate.

pub mod config;
pub mod error;

pub use config::{DecoderConfig, EncoderConfig, EncodingRules, LengthForm, DEFAULT_MAX_DEPTH};
pub use error::{Asn1Error, Asn1Result};
