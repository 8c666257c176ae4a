#![no_main]

use digestrs::{HashOptions, Hasher, hash};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (Vec<u8>, Vec<u8>)| {
    let (data, splits) = input;

    for algorithm in ["md5", "sha1", "sha256", "sha3-256", "shake128", "blake3"] {
        let whole = hash(algorithm, &data).unwrap();

        // Chunking invariance: split the input at fuzz-chosen points.
        let mut chunked = Hasher::new(algorithm).unwrap();
        let mut offset = 0usize;
        for &split in &splits {
            let end = offset + (split as usize % (data.len() - offset + 1));
            chunked.update(&data[offset..end]).unwrap();
            offset = end;
        }
        chunked.update(&data[offset..]).unwrap();
        assert_eq!(chunked.digest().unwrap(), whole);

        // Buffering transparency: eager path agrees with one-shot.
        let mut eager =
            Hasher::with_options(algorithm, HashOptions::default().with_buffering_disabled())
                .unwrap();
        eager.update(&data[..]).unwrap();
        assert_eq!(eager.digest().unwrap(), whole);

        // Clone independence: a copy taken mid-stream finishes as if
        // the original had stopped there.
        let mut original = Hasher::new(algorithm).unwrap();
        original.update(&data[..]).unwrap();
        let mut copy = original.copy().unwrap();
        original.update(b"divergence").unwrap();
        assert_eq!(copy.digest().unwrap(), whole);
    }
});
