#![no_main]

use libfuzzer_sys::fuzz_target;
use vatcheck::transport::RemoteResponse;

fuzz_target!(|data: &[u8]| {
    if let Ok(body) = std::str::from_utf8(data) {
        let _ = vatcheck::hmrc::interpret(&RemoteResponse::new(200, body));
    }
});
