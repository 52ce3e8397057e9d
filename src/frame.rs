//! Bounds-checked PCCC frame buffer
//!
//! Request frames use a fixed-size stack array to avoid heap allocation while
//! a chunk is being assembled. Every write is checked against remaining
//! capacity before it happens, so an oversized encode fails with
//! [`Plc5Error::OutOfBounds`] instead of clobbering memory.

use bytes::Bytes;

use crate::constants::MAX_FRAME_SIZE;
use crate::error::{Plc5Error, Plc5Result};

/// Outgoing PCCC request frame with a stack-allocated fixed buffer.
#[derive(Debug, Clone)]
pub struct PcccFrame {
    /// Fixed-size buffer (stack)
    data: [u8; MAX_FRAME_SIZE],
    /// Actual data length
    len: usize,
}

impl PcccFrame {
    /// Create an empty frame.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: [0; MAX_FRAME_SIZE],
            len: 0,
        }
    }

    /// Append a single byte.
    #[inline]
    pub fn push_u8(&mut self, byte: u8) -> Plc5Result<()> {
        if self.len >= MAX_FRAME_SIZE {
            return Err(Plc5Error::OutOfBounds {
                needed: 1,
                capacity: 0,
            });
        }
        self.data[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Append a u16 in little-endian order, the PCCC wire convention.
    #[inline]
    pub fn push_u16_le(&mut self, value: u16) -> Plc5Result<()> {
        if self.len + 2 > MAX_FRAME_SIZE {
            return Err(Plc5Error::OutOfBounds {
                needed: 2,
                capacity: MAX_FRAME_SIZE - self.len,
            });
        }
        self.data[self.len] = (value & 0xFF) as u8;
        self.data[self.len + 1] = (value >> 8) as u8;
        self.len += 2;
        Ok(())
    }

    /// Append a byte slice.
    #[inline]
    pub fn extend(&mut self, data: &[u8]) -> Plc5Result<()> {
        if self.len + data.len() > MAX_FRAME_SIZE {
            return Err(Plc5Error::OutOfBounds {
                needed: data.len(),
                capacity: MAX_FRAME_SIZE - self.len,
            });
        }
        self.data[self.len..self.len + data.len()].copy_from_slice(data);
        self.len += data.len();
        Ok(())
    }

    /// Get immutable data slice.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Get current length.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clear the frame.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Freeze the frame into shared bytes for the transport.
    #[inline]
    pub fn freeze(self) -> Bytes {
        Bytes::copy_from_slice(self.as_slice())
    }
}

impl Default for PcccFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounds-checked reader over a received byte slice.
///
/// Mirror of [`PcccFrame`] for the decode direction: every read is checked
/// against the remaining input before it happens.
#[derive(Debug)]
pub struct ReadCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ReadCursor<'a> {
    /// Create a cursor at the start of `data`.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Plc5Result<u8> {
        if self.remaining() < 1 {
            return Err(Plc5Error::OutOfBounds {
                needed: 1,
                capacity: 0,
            });
        }
        let byte = self.data[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Read a little-endian u16.
    #[inline]
    pub fn read_u16_le(&mut self) -> Plc5Result<u16> {
        if self.remaining() < 2 {
            return Err(Plc5Error::OutOfBounds {
                needed: 2,
                capacity: self.remaining(),
            });
        }
        let value = u16::from_le_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        Ok(value)
    }

    /// Consume all remaining bytes.
    #[inline]
    pub fn take_rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_basic_operations() {
        let mut frame = PcccFrame::new();
        assert_eq!(frame.len(), 0);
        assert!(frame.is_empty());

        frame.push_u8(0x06).unwrap();
        frame.push_u16_le(0x1234).unwrap();

        assert_eq!(frame.len(), 3);
        assert_eq!(frame.as_slice(), &[0x06, 0x34, 0x12]);
    }

    #[test]
    fn test_frame_extend() {
        let mut frame = PcccFrame::new();
        frame.extend(&[1, 2, 3]).unwrap();
        frame.push_u8(4).unwrap();
        assert_eq!(frame.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_frame_overflow() {
        let mut frame = PcccFrame::new();
        frame.extend(&[0u8; MAX_FRAME_SIZE]).unwrap();

        let err = frame.push_u8(0).unwrap_err();
        assert!(matches!(err, Plc5Error::OutOfBounds { .. }));

        let err = frame.push_u16_le(0).unwrap_err();
        assert_eq!(
            err,
            Plc5Error::OutOfBounds {
                needed: 2,
                capacity: 0
            }
        );
    }

    #[test]
    fn test_frame_freeze() {
        let mut frame = PcccFrame::new();
        frame.push_u16_le(0xBEEF).unwrap();
        let bytes = frame.freeze();
        assert_eq!(&bytes[..], &[0xEF, 0xBE]);
    }

    #[test]
    fn test_read_cursor() {
        let data = [0x46, 0x00, 0x34, 0x12, 0xAA];
        let mut cursor = ReadCursor::new(&data);

        assert_eq!(cursor.read_u8().unwrap(), 0x46);
        assert_eq!(cursor.read_u8().unwrap(), 0x00);
        assert_eq!(cursor.read_u16_le().unwrap(), 0x1234);
        assert_eq!(cursor.take_rest(), &[0xAA]);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_read_cursor_underflow() {
        let data = [0x01];
        let mut cursor = ReadCursor::new(&data);
        cursor.read_u8().unwrap();
        assert!(cursor.read_u8().is_err());
        assert!(cursor.read_u16_le().is_err());
    }
}
