//! # ab-plc5 - Allen-Bradley PLC-5 Data-File Protocol Driver
//!
//! A pure-Rust driver for the PCCC word-range services used to read and
//! write named data-file values on Allen-Bradley PLC-5 controllers.
//!
//! ## Features
//!
//! - **Chunked transfers**: values larger than one exchange are split into
//!   whole-element chunks and reassembled in order
//! - **Bounds-checked codec**: every encode and decode step is checked
//!   against remaining buffer capacity before it happens
//! - **Compact addressing**: the variable-width three-level logical address
//!   encoding, covering the full 16-bit file/element range
//! - **Transport-agnostic**: exchanges are driven by any [`Transport`]
//!   implementation; the driver owns protocol state only
//! - **DF1 fault decoding**: controller status bytes are translated into
//!   human-readable reasons
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ab_plc5::{ControllerTag, DataFileType, LogicalAddress, Plc5Tag, TagStatus, Transport};
//!
//! fn read_counts(plc: Arc<dyn Transport>) -> ab_plc5::Plc5Result<()> {
//!     // N7:0, ten 16-bit integers
//!     let address = LogicalAddress::new(DataFileType::Integer, 7, 0);
//!     let tag = Plc5Tag::new(plc, address, 10)?;
//!
//!     // Starts the chunked read; the transport drives it to completion.
//!     tag.read()?;
//!
//!     // Poll for the result.
//!     while tag.status() == TagStatus::Pending {
//!         std::thread::yield_now();
//!     }
//!     println!("value bytes: {:?}", tag.value());
//!     Ok(())
//! }
//! ```
//!
//! ## Scope
//!
//! The request/response transport, the address-string parser, and the
//! multi-family tag container live outside this crate. This crate supplies
//! the protocol engine: wire encoding, response validation, chunk planning,
//! and the per-tag transfer state machines.

// ============================================================================
// Core modules
// ============================================================================

/// Core error types and result handling
pub mod error;

/// PCCC protocol constants for the word-range services
pub mod constants;

/// Bounds-checked frame buffer and read cursor
pub mod frame;

/// Logical addresses and their variable-width encoding
pub mod address;

/// Chunk planning for multi-round transfers
pub mod chunk;

/// Response validation and DF1 fault decoding
pub mod response;

/// Consumed transport interface
pub mod transport;

/// Tag value object and transfer state machines
pub mod tag;

// ============================================================================
// Re-exports for convenience
// ============================================================================

// === Error handling ===
pub use error::{Plc5Error, Plc5Result};

// === Core types ===
pub use address::{DataFileType, LogicalAddress};
pub use frame::{PcccFrame, ReadCursor};
pub use response::{decode_fault, decode_response, PcccResponse};
pub use tag::{ControllerTag, Plc5Tag, TagStatus};
pub use transport::{Exchange, Outcome, Transport};

// === Protocol limits (commonly needed constants) ===
pub use constants::{MAX_READ_PAYLOAD, MAX_WRITE_PAYLOAD, PCCC_TYPED_CMD, PCCC_TYPED_CMD_OK};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn info() -> String {
    format!("ab-plc5 v{VERSION} - Allen-Bradley PLC-5 PCCC data-file protocol driver")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_contains_version() {
        assert!(info().contains(VERSION));
    }
}
