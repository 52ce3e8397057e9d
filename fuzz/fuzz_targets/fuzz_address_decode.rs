#![no_main]

use ab_plc5::{DataFileType, LogicalAddress, PcccFrame, ReadCursor};
use libfuzzer_sys::fuzz_target;

// Decoding arbitrary bytes must never panic. Any address that decodes must
// survive a re-encode/re-decode cycle unchanged. Byte-level comparison is
// deliberately avoided: the extended form can carry values that the encoder
// would emit compactly.
fuzz_target!(|data: &[u8]| {
    let mut cursor = ReadCursor::new(data);
    if let Ok(addr) = LogicalAddress::decode(&mut cursor, DataFileType::Integer) {
        let mut frame = PcccFrame::new();
        addr.encode(&mut frame).unwrap();

        let mut cursor = ReadCursor::new(frame.as_slice());
        let redecoded = LogicalAddress::decode(&mut cursor, DataFileType::Integer).unwrap();
        assert_eq!(redecoded, addr);
    }
});
