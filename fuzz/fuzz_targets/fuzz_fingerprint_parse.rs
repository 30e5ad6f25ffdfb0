#![no_main]

use libfuzzer_sys::fuzz_target;
use modcheck_core::Fingerprint;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic; accepted values are canonical and reparse to themselves.
        if let Ok(fp) = Fingerprint::parse(s) {
            assert_eq!(fp.as_str(), fp.as_str().to_ascii_lowercase());
            assert_eq!(Fingerprint::parse(fp.as_str()).ok(), Some(fp));
        }
    }
});
