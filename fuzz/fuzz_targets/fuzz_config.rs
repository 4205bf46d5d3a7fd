#![no_main]

use descriptor_validation::EngineConfig;
use descriptor_validation::engine::messages::BundleInterpolator;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    if let Ok(config) = EngineConfig::from_yaml(&s) {
        let _ = BundleInterpolator::from_config(&config);
    }
});
