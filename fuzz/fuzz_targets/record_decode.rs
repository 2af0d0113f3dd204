#![no_main]

use cfreg::{decode_record, encode_record};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Anything the decoder accepts must re-encode to the same bytes.
    if let Ok(record) = decode_record(data) {
        assert_eq!(encode_record(&record), data);
    }
});
