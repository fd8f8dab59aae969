#![no_main]

use libfuzzer_sys::fuzz_target;
use marisol::Collection;

fuzz_target!(|data: &[u8]| {
    let mut collection = Collection::new("FZ", 6, 1);

    // Garbage must be rejected without moving the running offset.
    if collection.append_bytes(data, None).is_err() {
        assert_eq!(collection.next_start(), 1);
        assert!(collection.is_empty());
    } else {
        let pages = collection.page_count() as u64;
        assert_eq!(collection.next_start(), 1 + pages);
    }
});
