//! PCCC protocol constants for the PLC-5 word-range services
//!
//! These values come from the DF1 protocol reference (Allen-Bradley
//! publication 1770-6.5.16): the typed read/write commands carried inside a
//! PCCC envelope, and the payload ceilings of the word-range functions.

// ============================================================================
// Command and Function Codes
// ============================================================================

/// PCCC typed command byte, first byte of every request.
pub const PCCC_TYPED_CMD: u8 = 0x06;

/// Reply flag OR-ed into the command byte of a response.
pub const PCCC_CMD_OK: u8 = 0x40;

/// Command byte expected in every successful response.
pub const PCCC_TYPED_CMD_OK: u8 = PCCC_TYPED_CMD | PCCC_CMD_OK;

/// Word-range read function code.
pub const FUNC_WORD_RANGE_READ: u8 = 0x01;

/// Word-range write function code.
pub const FUNC_WORD_RANGE_WRITE: u8 = 0x00;

// ============================================================================
// Payload Limits
// ============================================================================

/// Maximum data bytes returned by a single word-range read.
///
/// The DF1 reference gives 244 bytes for the full-duplex typed read reply.
/// Treat this as a conservative ceiling; some gateways negotiate less.
pub const MAX_READ_PAYLOAD: usize = 244;

/// Maximum request bytes following the command header for a word-range write.
///
/// The encoded logical address shares this budget with the value bytes, so
/// the usable chunk size is `MAX_WRITE_PAYLOAD` minus the address length.
pub const MAX_WRITE_PAYLOAD: usize = 244;

// ============================================================================
// Frame Geometry
// ============================================================================

/// Minimum length of a valid PCCC response: CMD, STS, and the 2-byte TSN.
pub const MIN_RESPONSE_LEN: usize = 4;

/// Offset of the first payload byte in a response.
pub const RESPONSE_DATA_OFFSET: usize = 4;

/// Request frame buffer capacity.
///
/// Header (9 bytes) + worst-case encoded address (10 bytes) + count byte +
/// a full write payload, rounded up to a power of two.
pub const MAX_FRAME_SIZE: usize = 512;

// ============================================================================
// Logical Address Encoding
// ============================================================================

/// Level mask selecting file number and element (levels 1-2).
pub const ADDR_LEVELS_TWO: u8 = 0x06;

/// Level mask selecting file number, element, and sub-element (levels 1-3).
pub const ADDR_LEVELS_THREE: u8 = 0x0E;

/// Sentinel marking an extended (16-bit little-endian) address level.
pub const ADDR_EXTENDED_LEVEL: u8 = 0xFF;

/// Largest address level value that fits the compact single-byte form.
pub const ADDR_MAX_COMPACT: u16 = 0xFE;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_codes() {
        assert_eq!(PCCC_TYPED_CMD, 0x06);
        assert_eq!(PCCC_TYPED_CMD_OK, 0x46);
        assert_ne!(FUNC_WORD_RANGE_READ, FUNC_WORD_RANGE_WRITE);
    }

    #[test]
    fn test_frame_geometry() {
        // Worst case request: 9-byte header, three extended levels (1 + 3*3),
        // count byte, and a full write payload must fit the frame.
        let worst_case = 9 + 10 + 1 + MAX_WRITE_PAYLOAD;
        assert!(worst_case <= MAX_FRAME_SIZE);
        assert_eq!(MIN_RESPONSE_LEN, RESPONSE_DATA_OFFSET);
    }
}
