#![no_main]

use libfuzzer_sys::fuzz_target;
use marisol::bates::{format_bates, parse_number};

fuzz_target!(|data: (&str, u8, u64)| {
    let (prefix, fill, number) = data;
    let fill = usize::from(fill % 20);

    let bates = format_bates(prefix, fill, number);
    assert_eq!(parse_number(&bates, prefix), Some(number));
    assert!(bates.len() >= prefix.len() + fill);
});
