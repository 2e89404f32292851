#![no_main]

use codec::{load_module, CodecLimits, CompiledBlob, LoadMode, WireLimits};
use libfuzzer_sys::fuzz_target;
use vm::{execute, Context, VmLimits};

fuzz_target!(|data: &[u8]| {
    let blob = CompiledBlob::new(data.to_vec());
    let wire_limits = WireLimits::for_testing();
    let limits = CodecLimits::for_testing();

    for mode in [LoadMode::Default, LoadMode::Eager, LoadMode::Lazy] {
        let Ok(module) = load_module(&blob, mode, &wire_limits, &limits) else {
            continue;
        };
        // Forcing every pending body must fail cleanly, never panic.
        let _ = module.materialize_all();
        let _ = execute(&module, &mut Context::with_limits(VmLimits::for_testing()));
    }

    // Every handle is gone, so nothing may still point at the bytes.
    assert_eq!(blob.outstanding_refs(), 0);
});
