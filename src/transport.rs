//! Consumed transport interface
//!
//! The driver does not move bytes itself. It is handed a [`Transport`] that
//! owns the connection to the controller, assigns transfer sequence numbers,
//! and performs any network-layer retries. The driver contributes
//! [`Exchange`] objects: two-phase request/response state that the transport
//! drives at its own pace.
//!
//! # Exchange protocol
//!
//! For one queued exchange the transport repeatedly:
//!
//! 1. calls [`Exchange::build`] and sends the returned bytes,
//! 2. waits for the matching response,
//! 3. calls [`Exchange::apply`] with the response bytes.
//!
//! [`Outcome::Continue`] asks for another round with the same exchange;
//! [`Outcome::Done`] releases it. An error from either phase abandons the
//! exchange — retry policy belongs to the transport, not the driver.
//!
//! Rounds are strictly sequential: the transport must not call `build` for
//! the next chunk until `apply` for the previous one has returned.

use bytes::Bytes;

use crate::error::Plc5Result;

/// What the transport should do after applying a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// More chunks remain; run another build/apply round.
    Continue,
    /// The logical operation is complete.
    Done,
}

/// A multi-round request/response exchange owned by one tag operation.
pub trait Exchange: Send {
    /// Build the request bytes for the next chunk.
    fn build(&mut self) -> Plc5Result<Bytes>;

    /// Validate and consume the response to the chunk built last.
    fn apply(&mut self, response: &[u8]) -> Plc5Result<Outcome>;
}

/// Request/response transport connected to a PLC-5 controller.
///
/// Implementations serialize exchanges however they see fit; the driver only
/// assumes the sequencing rule documented at the module level.
pub trait Transport: Send + Sync {
    /// Queue an exchange for execution.
    fn begin_exchange(&self, exchange: Box<dyn Exchange>) -> Plc5Result<()>;

    /// Drop any queued or in-flight exchange. No-op when idle.
    fn cancel_exchange(&self);

    /// Current transfer sequence number for the next request header.
    ///
    /// The driver calls this outside its own tag-state lock, so an
    /// implementation is free to consult the tag from here.
    fn sequence_token(&self) -> Plc5Result<u16>;
}
