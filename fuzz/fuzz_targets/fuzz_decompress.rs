#![no_main]

use libfuzzer_sys::fuzz_target;
use zfilter::Decompressor;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes, fed whole and in small chunks, must never panic.
    let _ = zfilter::decompress(data);

    let mut d = match Decompressor::new(None) {
        Ok(d) => d,
        Err(_) => return,
    };
    for chunk in data.chunks(17) {
        if d.transform(Some(chunk), None).is_err() {
            break;
        }
        if d.is_closed() {
            break;
        }
    }
});
