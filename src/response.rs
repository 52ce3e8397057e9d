//! PCCC response validation and DF1 fault decoding
//!
//! Every word-range reply starts with the same four bytes: the echoed
//! command with the reply flag set, the controller status, and the transfer
//! sequence number. A nonzero status means the controller rejected the
//! request; the status codes come from the DF1 reference and split into
//! local (link-layer) and remote (processor) faults.

use tracing::warn;

use crate::constants::{MIN_RESPONSE_LEN, PCCC_TYPED_CMD_OK};
use crate::error::{Plc5Error, Plc5Result};
use crate::frame::ReadCursor;

/// A validated PCCC response.
#[derive(Debug, PartialEq, Eq)]
pub struct PcccResponse<'a> {
    /// Transfer sequence number echoed by the controller.
    pub tsn: u16,
    /// Payload bytes following the header: value bytes for a read, empty
    /// for a write acknowledgement.
    pub payload: &'a [u8],
}

/// Validate a raw response and extract its payload.
///
/// Checks the 4-byte minimum length, the command byte, and the controller
/// status. A nonzero status is decoded through the DF1 fault table and
/// surfaced as [`Plc5Error::BadReply`].
pub fn decode_response(data: &[u8]) -> Plc5Result<PcccResponse<'_>> {
    if data.len() < MIN_RESPONSE_LEN {
        warn!(len = data.len(), "unexpectedly short PCCC response");
        return Err(Plc5Error::TooSmallResponse { len: data.len() });
    }

    let mut cursor = ReadCursor::new(data);
    let cmd = cursor.read_u8()?;
    let status = cursor.read_u8()?;
    let tsn = cursor.read_u16_le()?;
    let payload = cursor.take_rest();

    if cmd != PCCC_TYPED_CMD_OK {
        warn!(cmd, "unexpected PCCC response command byte");
        return Err(Plc5Error::bad_reply(format!(
            "unexpected response command byte 0x{cmd:02X} (expected 0x{PCCC_TYPED_CMD_OK:02X})"
        )));
    }

    if status != 0 {
        // With STS 0xF0 the real code is in the EXT STS byte that follows
        // the TSN.
        let ext_status = if status == 0xF0 {
            payload.first().copied()
        } else {
            None
        };
        let reason = decode_fault(status, ext_status);
        warn!(status, reason, "controller rejected request");
        return Err(Plc5Error::bad_reply(format!(
            "controller fault 0x{status:02X}: {reason}"
        )));
    }

    Ok(PcccResponse { tsn, payload })
}

/// Decode a DF1 status byte into a human-readable reason.
///
/// The low nibble carries local (link-layer) errors, the high nibble remote
/// (processor) errors; 0xF0 defers to the extended status byte.
pub fn decode_fault(status: u8, ext_status: Option<u8>) -> &'static str {
    match status {
        // local errors
        0x01 => "destination node is out of buffer space",
        0x02 => "cannot guarantee delivery, link layer did not receive an ACK",
        0x03 => "duplicate token holder detected",
        0x04 => "local port is disconnected",
        0x05 => "application layer timed out waiting for a response",
        0x06 => "duplicate node detected",
        0x07 => "station is offline",
        0x08 => "hardware fault",

        // remote errors
        0x10 => "illegal command or format",
        0x20 => "host has a problem and will not communicate",
        0x30 => "remote node host is missing, disconnected, or shut down",
        0x40 => "host could not complete function due to hardware fault",
        0x50 => "addressing problem or memory protect rungs",
        0x60 => "function not allowed due to command protection selection",
        0x70 => "processor is in program mode",
        0x80 => "compatibility mode file missing or communication zone problem",
        0x90 => "remote node cannot buffer command",
        0xA0 => "wait ACK, remote node problem",
        0xB0 => "remote node problem due to download",
        0xC0 => "wait ACK, 1775-KA buffer full",

        0xF0 => decode_extended_fault(ext_status),

        _ => "unknown status code",
    }
}

fn decode_extended_fault(ext_status: Option<u8>) -> &'static str {
    let Some(ext) = ext_status else {
        return "extended status indicated but EXT STS byte missing";
    };

    match ext {
        0x01 => "a field has an illegal value",
        0x02 => "fewer levels specified in address than minimum for any address",
        0x03 => "more levels specified in address than system supports",
        0x04 => "symbol not found",
        0x05 => "symbol is of improper format",
        0x06 => "address does not point to something usable",
        0x07 => "file is wrong size",
        0x08 => "cannot complete request, situation has changed since start of command",
        0x09 => "data or file is too large",
        0x0A => "transaction size plus word address is too large",
        0x0B => "access denied, improper privilege",
        0x0C => "condition cannot be generated, resource is not available",
        0x0D => "condition already exists, resource is already available",
        0x0E => "command cannot be executed",
        0x0F => "histogram overflow",
        0x10 => "no access",
        0x11 => "illegal data type",
        0x12 => "invalid parameter or invalid data",
        _ => "unknown extended status code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ok_response() {
        let data = [0x46, 0x00, 0x34, 0x12, 0xAA, 0xBB];
        let resp = decode_response(&data).unwrap();
        assert_eq!(resp.tsn, 0x1234);
        assert_eq!(resp.payload, &[0xAA, 0xBB]);
    }

    #[test]
    fn test_decode_empty_ack() {
        let data = [0x46, 0x00, 0x01, 0x00];
        let resp = decode_response(&data).unwrap();
        assert!(resp.payload.is_empty());
    }

    #[test]
    fn test_too_small_response() {
        let err = decode_response(&[0x46, 0x00, 0x01]).unwrap_err();
        assert_eq!(err, Plc5Error::TooSmallResponse { len: 3 });
    }

    #[test]
    fn test_wrong_command_byte() {
        let err = decode_response(&[0x06, 0x00, 0x01, 0x00]).unwrap_err();
        match err {
            Plc5Error::BadReply { message } => {
                assert!(message.contains("0x06"));
            }
            other => panic!("expected BadReply, got {other:?}"),
        }
    }

    #[test]
    fn test_controller_fault() {
        let err = decode_response(&[0x46, 0x10, 0x01, 0x00]).unwrap_err();
        match err {
            Plc5Error::BadReply { message } => {
                assert!(message.contains("illegal command or format"));
            }
            other => panic!("expected BadReply, got {other:?}"),
        }
    }

    #[test]
    fn test_extended_fault_uses_ext_sts_byte() {
        let err = decode_response(&[0x46, 0xF0, 0x01, 0x00, 0x07]).unwrap_err();
        match err {
            Plc5Error::BadReply { message } => {
                assert!(message.contains("file is wrong size"));
            }
            other => panic!("expected BadReply, got {other:?}"),
        }
    }

    #[test]
    fn test_fault_table() {
        assert_eq!(decode_fault(0x70, None), "processor is in program mode");
        assert_eq!(decode_fault(0x04, None), "local port is disconnected");
        assert_eq!(decode_fault(0xDD, None), "unknown status code");
        assert_eq!(
            decode_fault(0xF0, None),
            "extended status indicated but EXT STS byte missing"
        );
    }
}
