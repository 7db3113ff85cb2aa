#![no_main]

use std::sync::OnceLock;

use keyczar_core::{parse_header, DecryptKey, MacKey, SymmetricKey, VerifyKey};
use libfuzzer_sys::fuzz_target;

fn key() -> &'static SymmetricKey {
    static KEY: OnceLock<SymmetricKey> = OnceLock::new();
    KEY.get_or_init(|| {
        let mac = MacKey::from_bytes(vec![0x42; 32]).expect("mac key");
        SymmetricKey::new(vec![0x24; 16], mac).expect("aes key")
    })
}

fuzz_target!(|data: &[u8]| {
    let _ = parse_header(data);
    let _ = key().decrypt(data);
    if let Some((tag, message)) = data.split_first_chunk::<20>() {
        let _ = key().mac_key().verify(message, tag);
    }
});
