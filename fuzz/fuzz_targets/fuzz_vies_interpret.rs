#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let status = u16::from_le_bytes([data[0], data[1]]);
    if let Ok(body) = std::str::from_utf8(&data[2..]) {
        // Must not panic — any outcome is fine, panics are bugs.
        let _ = vatcheck::vies::interpret(status, body);
    }
});
