#![no_main]

use ab_plc5::decode_response;
use libfuzzer_sys::fuzz_target;

// Decoding arbitrary bytes must never panic or read out of bounds; a
// successful decode must reference only bytes past the 4-byte header.
fuzz_target!(|data: &[u8]| {
    if let Ok(resp) = decode_response(data) {
        assert_eq!(resp.payload.len(), data.len() - 4);
    }
});
