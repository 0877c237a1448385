#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let features = phishguard::extract(&text);
    assert!(features.entropy.is_finite());
    assert!(features.url_length <= 8192);
    let _ = features.numeric_vector();
});
