#![no_main]

use libfuzzer_sys::fuzz_target;
use zfilter::{Compressor, Decompressor, Flush};

fuzz_target!(|data: &[u8]| {
    // First byte picks the chunk size so the corpus explores call patterns.
    let (chunk_size, payload) = match data.split_first() {
        Some((first, rest)) => ((usize::from(*first) % 256) + 1, rest),
        None => return,
    };

    let mut c = Compressor::new(None, None).expect("compressor init");
    let mut packed = Vec::new();
    for chunk in payload.chunks(chunk_size) {
        packed.extend(
            c.transform(Some(chunk), Some(Flush::None))
                .expect("compress")
                .output,
        );
    }
    let last = c.transform(None, Some(Flush::Finish)).expect("finish");
    assert!(last.finished);
    packed.extend(last.output);

    let mut d = Decompressor::new(None).expect("decompressor init");
    let step = d.transform(Some(&packed[..]), None).expect("decompress");
    assert!(step.finished);
    assert_eq!(step.output, payload);
});
