//! Chunk planning for multi-round transfers
//!
//! A logical value can exceed the payload of a single PCCC exchange, so the
//! transfer is split into chunks. A chunk must be a whole number of elements;
//! an element is never split across two exchanges.

use tracing::trace;

use crate::error::{Plc5Error, Plc5Result};

/// Compute the size in bytes of the next transfer chunk.
///
/// Takes the smaller of `remaining_bytes` and `max_payload_bytes`, then
/// rounds down to a whole multiple of `element_size`.
///
/// Fails with [`Plc5Error::Configuration`] if not even one element fits the
/// window; such a value cannot be transferred on this channel at all.
///
/// # Example
///
/// ```rust
/// use ab_plc5::chunk::plan_chunk;
///
/// // 500 bytes of 2-byte elements through a 244-byte window: 122 elements.
/// assert_eq!(plan_chunk(500, 244, 2).unwrap(), 244);
/// ```
pub fn plan_chunk(
    remaining_bytes: usize,
    max_payload_bytes: usize,
    element_size: usize,
) -> Plc5Result<usize> {
    if element_size == 0 {
        return Err(Plc5Error::configuration("element size must be positive"));
    }

    let window = remaining_bytes.min(max_payload_bytes);
    let num_elements = window / element_size;
    let chunk_bytes = num_elements * element_size;

    trace!(window, num_elements, chunk_bytes, "planned transfer chunk");

    if chunk_bytes == 0 {
        return Err(Plc5Error::configuration(format!(
            "element size {element_size} does not fit the {window}-byte transfer window"
        )));
    }

    Ok(chunk_bytes)
}
