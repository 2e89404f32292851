#![no_main]

use libfuzzer_sys::fuzz_target;
use stream::ByteReader;

fuzz_target!(|data: &[u8]| {
    let mut reader = ByteReader::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 8;
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_u8();
            }
            1 => {
                let _ = reader.read_u32();
            }
            2 => {
                let _ = reader.read_u64();
            }
            3 => {
                let _ = reader.read_varu32();
            }
            4 => {
                let _ = reader.read_vars64();
            }
            5 => {
                let _ = reader.read_str();
            }
            6 => {
                let _ = reader.read_len_prefixed();
            }
            _ => {
                let len = data[idx.saturating_sub(1)] as usize % 16;
                let _ = reader.skip(len);
            }
        }
    }
});
