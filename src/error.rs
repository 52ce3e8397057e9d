//! Core error types and result handling
//!
//! All fallible operations in this crate return [`Plc5Result`]. Protocol
//! failures are never silently retried here; retry policy belongs to the
//! transport layer.

use thiserror::Error;

use crate::constants::MIN_RESPONSE_LEN;

/// Result type used throughout the crate.
pub type Plc5Result<T> = Result<T, Plc5Error>;

/// Errors produced by the PLC-5 protocol driver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Plc5Error {
    /// An encode step would overflow the destination buffer.
    #[error("out of bounds: needed {needed} bytes, {capacity} available")]
    OutOfBounds { needed: usize, capacity: usize },

    /// Response shorter than the minimum PCCC header.
    #[error("response too small: {len} bytes (minimum {MIN_RESPONSE_LEN})")]
    TooSmallResponse { len: usize },

    /// Wrong command byte, or a nonzero controller status.
    #[error("bad reply: {message}")]
    BadReply { message: String },

    /// Operation or attribute not supported by this controller family.
    #[error("unsupported: {what}")]
    Unsupported { what: String },

    /// Tag geometry that cannot be transferred on this channel.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// A read or write was issued while another operation is in flight.
    #[error("another operation is already in flight")]
    Busy,

    /// Failure reported by the underlying transport.
    #[error("transport error: {message}")]
    Transport { message: String },
}

impl Plc5Error {
    /// Create a bad-reply error.
    pub fn bad_reply(message: impl Into<String>) -> Self {
        Plc5Error::BadReply {
            message: message.into(),
        }
    }

    /// Create an unsupported-operation error.
    pub fn unsupported(what: impl Into<String>) -> Self {
        Plc5Error::Unsupported { what: what.into() }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Plc5Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Plc5Error::Transport {
            message: message.into(),
        }
    }
}
