#![no_main]

use keyczar_core::{KeyMaterial, KeyType};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Try parsing as each key type - should never panic
    for key_type in KeyType::ALL {
        let _ = KeyMaterial::from_record(key_type, data);
    }
    let _ = data.parse::<KeyType>();
});
