#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let parsed = lark_parser::parse(data);
    // diagnostics may point at the endmarker, one line past the input
    for err in &parsed.errors {
        assert!((err.pos.line as usize) <= parsed.lines.len());
    }
});
