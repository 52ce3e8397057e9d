//! PLC-5 logical addresses and their variable-width wire encoding
//!
//! A data-table location is addressed by up to three levels: data file
//! number, element index, and an optional sub-element index. On the wire the
//! address starts with a level mask byte, then each selected level is either
//! one compact byte (values up to 0xFE) or the 0xFF sentinel followed by the
//! full 16-bit value little-endian:
//!
//! | Level value | Encoding |
//! |-------------|--------------------------|
//! | `<= 0xFE` | `[value]` |
//! | `> 0xFE` | `[0xFF, low, high]` |
//!
//! Common small addresses stay compact while the full 16-bit range remains
//! reachable.

use crate::constants::{
    ADDR_EXTENDED_LEVEL, ADDR_LEVELS_THREE, ADDR_LEVELS_TWO, ADDR_MAX_COMPACT,
};
use crate::error::{Plc5Error, Plc5Result};
use crate::frame::{PcccFrame, ReadCursor};

/// PLC-5 data file types.
///
/// The file type never appears in the encoded address; it is carried so the
/// tag layer can derive element geometry for a parsed address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFileType {
    /// O — outputs
    Output,
    /// I — inputs
    Input,
    /// S — processor status
    Status,
    /// B — bits
    Bit,
    /// T — timers
    Timer,
    /// C — counters
    Counter,
    /// R — control structures
    Control,
    /// N — 16-bit integers
    Integer,
    /// F — 32-bit floats
    Float,
    /// ST — strings
    String,
    /// A — ASCII bytes packed two per word
    Ascii,
    /// D — BCD values
    Bcd,
}

impl DataFileType {
    /// Default element size in bytes for this file type.
    ///
    /// Timer, counter, and control elements are three-word structures;
    /// strings are an 82-character body plus a length word.
    pub fn element_size(&self) -> u16 {
        match self {
            DataFileType::Float => 4,
            DataFileType::Timer | DataFileType::Counter | DataFileType::Control => 6,
            DataFileType::String => 84,
            _ => 2,
        }
    }
}

/// A three-level logical address into a PLC-5 data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalAddress {
    /// Data file type, e.g. [`DataFileType::Integer`] for `N7:0`.
    pub file_type: DataFileType,
    /// Data file number.
    pub file_number: u16,
    /// Element index within the file.
    pub element: u16,
    /// Optional sub-element index. `Some(0)` is a real sub-element address
    /// and selects the three-level encoding.
    pub sub_element: Option<u16>,
}

impl LogicalAddress {
    /// Address a whole element, e.g. `N7:0`.
    pub fn new(file_type: DataFileType, file_number: u16, element: u16) -> Self {
        Self {
            file_type,
            file_number,
            element,
            sub_element: None,
        }
    }

    /// Address a sub-element, e.g. `T4:0.ACC`.
    pub fn with_sub_element(mut self, sub_element: u16) -> Self {
        self.sub_element = Some(sub_element);
        self
    }

    /// Number of bytes this address occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        fn level_len(value: u16) -> usize {
            if value <= ADDR_MAX_COMPACT {
                1
            } else {
                3
            }
        }

        let mut len = 1 + level_len(self.file_number) + level_len(self.element);
        if let Some(sub) = self.sub_element {
            len += level_len(sub);
        }
        len
    }

    /// Encode the address into `frame`.
    ///
    /// Fails with [`Plc5Error::OutOfBounds`] if the frame cannot hold the
    /// encoded form; the caller discards the frame on failure.
    pub fn encode(&self, frame: &mut PcccFrame) -> Plc5Result<()> {
        // Level mask counts from the low bit: 0x06 selects levels 1-2,
        // 0x0E adds level 3 (the sub-element).
        if self.sub_element.is_some() {
            frame.push_u8(ADDR_LEVELS_THREE)?;
        } else {
            frame.push_u8(ADDR_LEVELS_TWO)?;
        }

        encode_level(frame, self.file_number)?;
        encode_level(frame, self.element)?;

        if let Some(sub) = self.sub_element {
            encode_level(frame, sub)?;
        }

        Ok(())
    }

    /// Decode an address previously produced by [`LogicalAddress::encode`].
    ///
    /// The wire form does not carry the file type, so the caller supplies it.
    pub fn decode(cursor: &mut ReadCursor<'_>, file_type: DataFileType) -> Plc5Result<Self> {
        let mask = cursor.read_u8()?;

        let has_sub_element = match mask {
            ADDR_LEVELS_TWO => false,
            ADDR_LEVELS_THREE => true,
            other => {
                return Err(Plc5Error::bad_reply(format!(
                    "unknown address level mask 0x{other:02X}"
                )))
            }
        };

        let file_number = decode_level(cursor)?;
        let element = decode_level(cursor)?;
        let sub_element = if has_sub_element {
            Some(decode_level(cursor)?)
        } else {
            None
        };

        Ok(Self {
            file_type,
            file_number,
            element,
            sub_element,
        })
    }
}

fn encode_level(frame: &mut PcccFrame, value: u16) -> Plc5Result<()> {
    if value <= ADDR_MAX_COMPACT {
        frame.push_u8(value as u8)
    } else {
        frame.push_u8(ADDR_EXTENDED_LEVEL)?;
        frame.push_u16_le(value)
    }
}

fn decode_level(cursor: &mut ReadCursor<'_>) -> Plc5Result<u16> {
    let byte = cursor.read_u8()?;
    if byte == ADDR_EXTENDED_LEVEL {
        cursor.read_u16_le()
    } else {
        Ok(u16::from(byte))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encode_to_vec(addr: &LogicalAddress) -> Vec<u8> {
        let mut frame = PcccFrame::new();
        addr.encode(&mut frame).unwrap();
        frame.as_slice().to_vec()
    }

    #[test]
    fn test_compact_two_level_encoding() {
        let addr = LogicalAddress::new(DataFileType::Integer, 7, 0);
        assert_eq!(encode_to_vec(&addr), vec![0x06, 7, 0]);
        assert_eq!(addr.encoded_len(), 3);
    }

    #[test]
    fn test_compact_boundary() {
        let addr = LogicalAddress::new(DataFileType::Integer, 0xFE, 0xFE);
        assert_eq!(encode_to_vec(&addr), vec![0x06, 0xFE, 0xFE]);
    }

    #[test]
    fn test_extended_levels() {
        // 0xFF itself already needs the extended form.
        let addr = LogicalAddress::new(DataFileType::Integer, 0xFF, 0x1234);
        assert_eq!(
            encode_to_vec(&addr),
            vec![0x06, 0xFF, 0xFF, 0x00, 0xFF, 0x34, 0x12]
        );
        assert_eq!(addr.encoded_len(), 7);
    }

    #[test]
    fn test_sub_element_selects_three_levels() {
        let addr = LogicalAddress::new(DataFileType::Timer, 4, 2).with_sub_element(1);
        assert_eq!(encode_to_vec(&addr), vec![0x0E, 4, 2, 1]);
    }

    #[test]
    fn test_sub_element_zero_is_present() {
        // Sub-element 0 is a real address level, not "absent".
        let addr = LogicalAddress::new(DataFileType::Timer, 4, 2).with_sub_element(0);
        let encoded = encode_to_vec(&addr);
        assert_eq!(encoded[0], 0x0E);
        assert_eq!(encoded, vec![0x0E, 4, 2, 0]);
    }

    #[test]
    fn test_decode_rejects_unknown_mask() {
        let data = [0x07, 1, 2];
        let mut cursor = ReadCursor::new(&data);
        let err = LogicalAddress::decode(&mut cursor, DataFileType::Integer).unwrap_err();
        assert!(matches!(err, Plc5Error::BadReply { .. }));
    }

    #[test]
    fn test_decode_truncated_extended_level() {
        let data = [0x06, 0xFF, 0x34];
        let mut cursor = ReadCursor::new(&data);
        assert!(LogicalAddress::decode(&mut cursor, DataFileType::Integer).is_err());
    }

    #[test]
    fn test_element_sizes() {
        assert_eq!(DataFileType::Integer.element_size(), 2);
        assert_eq!(DataFileType::Float.element_size(), 4);
        assert_eq!(DataFileType::Timer.element_size(), 6);
        assert_eq!(DataFileType::String.element_size(), 84);
    }

    proptest! {
        #[test]
        fn prop_address_round_trip(
            file_number in 0u16..=0xFFFF,
            element in 0u16..=0xFFFF,
            sub_element in proptest::option::of(0u16..=0xFFFF),
        ) {
            let mut addr = LogicalAddress::new(DataFileType::Integer, file_number, element);
            if let Some(sub) = sub_element {
                addr = addr.with_sub_element(sub);
            }

            let encoded = encode_to_vec(&addr);
            prop_assert_eq!(encoded.len(), addr.encoded_len());

            let mut cursor = ReadCursor::new(&encoded);
            let decoded = LogicalAddress::decode(&mut cursor, DataFileType::Integer).unwrap();
            prop_assert_eq!(decoded, addr);
            prop_assert_eq!(cursor.remaining(), 0);
        }
    }
}
