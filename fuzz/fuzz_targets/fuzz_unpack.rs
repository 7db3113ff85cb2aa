#![no_main]

use keyczar_core::core::operations::pack::len_prefix_unpack;
use keyczar_core::SymmetricKey;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Should never panic or over-allocate on a hostile count
    let _ = len_prefix_unpack(data);
    let _ = SymmetricKey::from_packed_keys(data);
});
