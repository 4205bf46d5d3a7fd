#![no_main]

use descriptor_validation::EngineConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let config = match EngineConfig::from_yaml(&s) {
        Ok(c) => c,
        Err(_) => return,
    };

    let yaml = match config.to_yaml() {
        Ok(y) => y,
        Err(_) => return,
    };

    match EngineConfig::from_yaml(&yaml) {
        Ok(reparsed) => assert_eq!(reparsed, config, "config changed across a roundtrip"),
        Err(e) => panic!(
            "Roundtrip failure: to_yaml produced YAML that cannot be re-parsed: {}\n\
             Input (lossy): {:?}\n\
             Serialized YAML:\n{}",
            e,
            s.get(..200).unwrap_or(&s),
            yaml.get(..500).unwrap_or(&yaml),
        ),
    }
});
