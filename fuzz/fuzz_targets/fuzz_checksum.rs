#![no_main]

use libfuzzer_sys::fuzz_target;
use zfilter::{combine, Checksum, ChecksumInput, ChecksumKind};

fuzz_target!(|data: &[u8]| {
    let split = data.len() / 2;
    let (first, second) = data.split_at(split);

    for kind in [ChecksumKind::Adler32, ChecksumKind::Crc32] {
        let mut whole = Checksum::new(kind);
        whole.update(ChecksumInput::Buffer(data)).expect("update");

        let mut a = Checksum::new(kind);
        a.update(ChecksumInput::Buffer(first)).expect("update");
        let mut b = Checksum::new(kind);
        b.update(ChecksumInput::Buffer(second)).expect("update");

        let merged = combine(kind, a.query().0, b.query().0, second.len() as u64);
        assert_eq!(merged, whole.query().0);
    }
});
