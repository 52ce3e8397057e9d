//! PLC-5 tag value object and chunked transfer state machines
//!
//! A [`Plc5Tag`] binds a logical address and element geometry to an owned
//! value buffer. `read` and `write` start a multi-round exchange with the
//! transport; each round moves one chunk of the value, and progress happens
//! only inside the transport's build/apply calls. The caller polls
//! [`ControllerTag::status`] for the result.
//!
//! # Request layout
//!
//! | Bytes | Field |
//! |---------|-----------------------------------------|
//! | 0 | typed command (0x06) |
//! | 1 | status, always 0 |
//! | 2..3 | transfer sequence number, LE |
//! | 4 | function: 0x01 read, 0x00 write |
//! | 5..6 | transfer offset in 16-bit words, LE |
//! | 7..8 | total value size in 16-bit words, LE |
//! | 9.. | encoded logical address |
//! | last | read: chunk size in bytes |
//! | tail | write: chunk value bytes |

use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use tracing::{debug, warn};

use crate::address::LogicalAddress;
use crate::chunk::plan_chunk;
use crate::constants::{
    FUNC_WORD_RANGE_READ, FUNC_WORD_RANGE_WRITE, MAX_READ_PAYLOAD, MAX_WRITE_PAYLOAD,
    PCCC_TYPED_CMD,
};
use crate::error::{Plc5Error, Plc5Result};
use crate::frame::PcccFrame;
use crate::response::decode_response;
use crate::transport::{Exchange, Outcome, Transport};

/// Result of the most recent tag operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagStatus {
    /// No operation has been started yet.
    Idle,
    /// A read or write is in flight.
    Pending,
    /// The last operation completed successfully.
    Ok,
    /// The last operation failed.
    Error(Plc5Error),
}

/// Capability interface shared by all controller-family tag drivers.
///
/// The external tag framework dispatches through this trait; other families
/// (SLC-500, MicroLogix) implement the same surface.
pub trait ControllerTag: Send {
    /// Cancel any in-flight exchange. No-op when idle.
    fn abort(&self) -> Plc5Result<()>;

    /// Start a read of the whole value. Returns [`TagStatus::Pending`]
    /// immediately; the result is observed later via [`ControllerTag::status`].
    fn read(&self) -> Plc5Result<TagStatus>;

    /// Start a write of the whole value. Symmetric to [`ControllerTag::read`].
    fn write(&self) -> Plc5Result<TagStatus>;

    /// Current operation status.
    fn status(&self) -> TagStatus;

    /// Periodic background work. The PLC-5 driver needs none, so this always
    /// fails with [`Plc5Error::Unsupported`].
    fn tickler(&self) -> Plc5Result<()>;

    /// Read an integer attribute, or `default_value` for an unknown name.
    /// An unknown name is also recorded on the tag status.
    fn get_int_attr(&self, name: &str, default_value: i32) -> i32;

    /// Write an integer attribute. No PLC-5 attribute is writable.
    fn set_int_attr(&self, name: &str, value: i32) -> Plc5Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Read,
    Write,
}

/// State shared between the tag handle and its in-flight exchange.
struct TagState {
    address: LogicalAddress,
    element_size: usize,
    value: Vec<u8>,
    transfer_cursor: usize,
    last_tsn: u16,
    status: TagStatus,
    active: Option<Operation>,
}

impl TagState {
    fn value_size(&self) -> usize {
        self.value.len()
    }

    fn fail(&mut self, err: &Plc5Error) {
        self.status = TagStatus::Error(err.clone());
        self.active = None;
    }
}

/// A named data-file value on a PLC-5 controller.
///
/// The tag owns the value buffer; reads fill it, writes drain it. The
/// transport handle is shared so an in-flight exchange keeps it alive for as
/// long as it needs.
pub struct Plc5Tag {
    state: Arc<Mutex<TagState>>,
    plc: Arc<dyn Transport>,
}

impl Plc5Tag {
    /// Bind a tag using the element size implied by the address's file type.
    pub fn new(
        plc: Arc<dyn Transport>,
        address: LogicalAddress,
        element_count: u16,
    ) -> Plc5Result<Self> {
        let element_size = address.file_type.element_size();
        Self::with_element_size(plc, address, element_size, element_count)
    }

    /// Bind a tag with an explicit element size in bytes.
    ///
    /// Fails with [`Plc5Error::Configuration`] if the geometry cannot be
    /// transferred: zero sizes, a value size that is not a whole number of
    /// 16-bit words, or an element too large for either payload window.
    pub fn with_element_size(
        plc: Arc<dyn Transport>,
        address: LogicalAddress,
        element_size: u16,
        element_count: u16,
    ) -> Plc5Result<Self> {
        if element_size == 0 || element_count == 0 {
            return Err(Plc5Error::configuration(
                "element size and count must be positive",
            ));
        }

        let element_size = element_size as usize;
        let value_size = element_size * element_count as usize;

        // Offsets and sizes go on the wire in 16-bit words.
        if value_size % 2 != 0 {
            return Err(Plc5Error::configuration(format!(
                "value size {value_size} is not a whole number of 16-bit words"
            )));
        }

        // The size-in-words field is 16 bits wide; a larger value cannot be
        // requested without silently truncating the header.
        if value_size / 2 > u16::MAX as usize {
            return Err(Plc5Error::configuration(format!(
                "value size {value_size} exceeds the 16-bit word range of the wire format"
            )));
        }

        // One element must fit both payload windows or no chunk can ever
        // be planned. The write window loses the encoded address bytes.
        plan_chunk(value_size, MAX_READ_PAYLOAD, element_size)?;
        plan_chunk(
            value_size,
            MAX_WRITE_PAYLOAD.saturating_sub(address.encoded_len()),
            element_size,
        )?;

        debug!(
            ?address,
            element_size, element_count, value_size, "created PLC-5 tag"
        );

        Ok(Self {
            state: Arc::new(Mutex::new(TagState {
                address,
                element_size,
                value: vec![0; value_size],
                transfer_cursor: 0,
                last_tsn: 0,
                status: TagStatus::Idle,
                active: None,
            })),
            plc,
        })
    }

    fn lock(&self) -> MutexGuard<'_, TagState> {
        self.state.lock().expect("tag state mutex poisoned")
    }

    /// Bytes per element.
    pub fn element_size(&self) -> usize {
        self.lock().element_size
    }

    /// Number of elements in the value.
    pub fn element_count(&self) -> usize {
        let state = self.lock();
        state.value_size() / state.element_size
    }

    /// Total value size in bytes.
    pub fn value_size(&self) -> usize {
        self.lock().value_size()
    }

    /// Copy of the current value buffer.
    pub fn value(&self) -> Vec<u8> {
        self.lock().value.clone()
    }

    /// Replace the value buffer ahead of a write.
    ///
    /// `bytes` must be exactly the value size; fails with [`Plc5Error::Busy`]
    /// while an operation is in flight.
    pub fn set_value(&self, bytes: &[u8]) -> Plc5Result<()> {
        let mut state = self.lock();
        if state.active.is_some() {
            return Err(Plc5Error::Busy);
        }
        if bytes.len() != state.value_size() {
            return Err(Plc5Error::configuration(format!(
                "value is {} bytes, tag holds {}",
                bytes.len(),
                state.value_size()
            )));
        }
        state.value.copy_from_slice(bytes);
        Ok(())
    }

    fn start(&self, op: Operation) -> Plc5Result<TagStatus> {
        {
            let mut state = self.lock();
            if state.active.is_some() {
                return Err(Plc5Error::Busy);
            }
            state.active = Some(op);
            state.transfer_cursor = 0;
            state.status = TagStatus::Pending;
        }

        let exchange: Box<dyn Exchange> = match op {
            Operation::Read => Box::new(ReadExchange {
                state: Arc::clone(&self.state),
                plc: Arc::clone(&self.plc),
            }),
            Operation::Write => Box::new(WriteExchange {
                state: Arc::clone(&self.state),
                plc: Arc::clone(&self.plc),
            }),
        };

        if let Err(err) = self.plc.begin_exchange(exchange) {
            warn!(%err, ?op, "unable to start exchange");
            self.lock().fail(&err);
            return Err(err);
        }

        Ok(TagStatus::Pending)
    }
}

impl ControllerTag for Plc5Tag {
    fn abort(&self) -> Plc5Result<()> {
        debug!("aborting in-flight exchange");
        self.plc.cancel_exchange();
        let mut state = self.lock();
        state.active = None;
        // An aborted operation never completes, so a lingering Pending would
        // be polled forever. The cursor is deliberately left alone: read and
        // write reset it at start, so a stopped transfer restarts cleanly
        // from offset 0.
        if state.status == TagStatus::Pending {
            state.status = TagStatus::Idle;
        }
        Ok(())
    }

    fn read(&self) -> Plc5Result<TagStatus> {
        self.start(Operation::Read)
    }

    fn write(&self) -> Plc5Result<TagStatus> {
        self.start(Operation::Write)
    }

    fn status(&self) -> TagStatus {
        self.lock().status.clone()
    }

    fn tickler(&self) -> Plc5Result<()> {
        Err(Plc5Error::unsupported("tickler"))
    }

    fn get_int_attr(&self, name: &str, default_value: i32) -> i32 {
        let mut state = self.lock();
        match name.to_ascii_lowercase().as_str() {
            "elem_size" => state.element_size as i32,
            "elem_count" => (state.value_size() / state.element_size) as i32,
            other => {
                warn!(attr = other, "unsupported attribute name");
                state.status =
                    TagStatus::Error(Plc5Error::unsupported(format!("attribute {other:?}")));
                default_value
            }
        }
    }

    fn set_int_attr(&self, name: &str, _value: i32) -> Plc5Result<()> {
        warn!(attr = name, "attempt to write unsupported attribute");
        let err = Plc5Error::unsupported(format!("writing attribute {name:?}"));
        self.lock().status = TagStatus::Error(err.clone());
        Err(err)
    }
}

impl Drop for Plc5Tag {
    fn drop(&mut self) {
        // Releasing the tag must drop any exchange still referencing it.
        self.plc.cancel_exchange();
    }
}

/// Encode the request header shared by read and write chunks.
fn encode_header(
    frame: &mut PcccFrame,
    function: u8,
    tsn: u16,
    state: &TagState,
) -> Plc5Result<()> {
    frame.push_u8(PCCC_TYPED_CMD)?;
    frame.push_u8(0)?;
    frame.push_u16_le(tsn)?;
    frame.push_u8(function)?;
    frame.push_u16_le((state.transfer_cursor / 2) as u16)?;
    frame.push_u16_le((state.value_size() / 2) as u16)?;
    state.address.encode(frame)?;
    Ok(())
}

/// Read transfer state machine.
///
/// Each round requests the next chunk and copies the response payload into
/// the value buffer at the cursor.
struct ReadExchange {
    state: Arc<Mutex<TagState>>,
    plc: Arc<dyn Transport>,
}

impl ReadExchange {
    fn try_build(&self, state: &mut TagState, tsn: u16) -> Plc5Result<Bytes> {
        state.last_tsn = tsn;

        let mut frame = PcccFrame::new();
        encode_header(&mut frame, FUNC_WORD_RANGE_READ, tsn, state)?;

        let remaining = state.value_size() - state.transfer_cursor;
        let chunk = plan_chunk(remaining, MAX_READ_PAYLOAD, state.element_size)?;
        frame.push_u8(chunk as u8)?;

        debug!(
            tsn,
            cursor = state.transfer_cursor,
            chunk, "built read chunk request"
        );

        Ok(frame.freeze())
    }

    fn try_apply(&self, state: &mut TagState, response: &[u8]) -> Plc5Result<Outcome> {
        let resp = decode_response(response)?;
        if resp.tsn != state.last_tsn {
            debug!(
                got = resp.tsn,
                expected = state.last_tsn,
                "response TSN does not match last request"
            );
        }

        let copied = resp.payload.len();
        let remaining = state.value_size() - state.transfer_cursor;
        if copied == 0 {
            return Err(Plc5Error::bad_reply("read response carries no data"));
        }
        if copied > remaining {
            return Err(Plc5Error::bad_reply(format!(
                "read response carries {copied} bytes but only {remaining} remain"
            )));
        }

        let at = state.transfer_cursor;
        state.value[at..at + copied].copy_from_slice(resp.payload);
        state.transfer_cursor += copied;

        debug!(copied, cursor = state.transfer_cursor, "applied read chunk");

        if state.transfer_cursor < state.value_size() {
            Ok(Outcome::Continue)
        } else {
            state.transfer_cursor = 0;
            state.status = TagStatus::Ok;
            state.active = None;
            Ok(Outcome::Done)
        }
    }
}

impl Exchange for ReadExchange {
    fn build(&mut self) -> Plc5Result<Bytes> {
        // The token is fetched before the state lock is taken, so a
        // transport may consult the tag from sequence_token().
        let token = self.plc.sequence_token();
        let mut state = self.state.lock().expect("tag state mutex poisoned");
        token
            .and_then(|tsn| self.try_build(&mut state, tsn))
            .inspect_err(|err| {
                warn!(%err, "unable to build read request");
                state.fail(err);
            })
    }

    fn apply(&mut self, response: &[u8]) -> Plc5Result<Outcome> {
        let mut state = self.state.lock().expect("tag state mutex poisoned");
        self.try_apply(&mut state, response).inspect_err(|err| {
            warn!(%err, "error handling read response");
            state.fail(err);
        })
    }
}

/// Write transfer state machine.
///
/// The mirror of [`ReadExchange`]: chunk bytes travel in the request and the
/// cursor advances at build time, so progress is tracked optimistically at
/// send time rather than at response time.
struct WriteExchange {
    state: Arc<Mutex<TagState>>,
    plc: Arc<dyn Transport>,
}

impl WriteExchange {
    fn try_build(&self, state: &mut TagState, tsn: u16) -> Plc5Result<Bytes> {
        state.last_tsn = tsn;

        let mut frame = PcccFrame::new();
        encode_header(&mut frame, FUNC_WORD_RANGE_WRITE, tsn, state)?;

        // The encoded address spends part of the write payload budget.
        let max_payload = MAX_WRITE_PAYLOAD.saturating_sub(state.address.encoded_len());
        let remaining = state.value_size() - state.transfer_cursor;
        let chunk = plan_chunk(remaining, max_payload, state.element_size)?;

        let at = state.transfer_cursor;
        frame.extend(&state.value[at..at + chunk])?;
        state.transfer_cursor += chunk;

        debug!(
            tsn,
            chunk,
            cursor = state.transfer_cursor,
            "built write chunk request"
        );

        Ok(frame.freeze())
    }

    fn try_apply(&self, state: &mut TagState, response: &[u8]) -> Plc5Result<Outcome> {
        let resp = decode_response(response)?;
        if resp.tsn != state.last_tsn {
            debug!(
                got = resp.tsn,
                expected = state.last_tsn,
                "response TSN does not match last request"
            );
        }

        if state.transfer_cursor < state.value_size() {
            debug!(cursor = state.transfer_cursor, "write chunk acknowledged");
            Ok(Outcome::Continue)
        } else {
            state.transfer_cursor = 0;
            state.status = TagStatus::Ok;
            state.active = None;
            Ok(Outcome::Done)
        }
    }
}

impl Exchange for WriteExchange {
    fn build(&mut self) -> Plc5Result<Bytes> {
        // Token fetch stays outside the state lock, as for reads.
        let token = self.plc.sequence_token();
        let mut state = self.state.lock().expect("tag state mutex poisoned");
        token
            .and_then(|tsn| self.try_build(&mut state, tsn))
            .inspect_err(|err| {
                warn!(%err, "unable to build write request");
                state.fail(err);
            })
    }

    fn apply(&mut self, response: &[u8]) -> Plc5Result<Outcome> {
        let mut state = self.state.lock().expect("tag state mutex poisoned");
        self.try_apply(&mut state, response).inspect_err(|err| {
            warn!(%err, "error handling write response");
            state.fail(err);
        })
    }
}
