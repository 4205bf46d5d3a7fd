use descriptor_validation::{ConfigErrorKind, EngineConfig, Locale};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Catalog entries survive to_yaml/from_yaml unchanged.
    #[test]
    fn config_roundtrips(
        language in prop_oneof![Just("en"), Just("de"), Just("fr"), Just("it")],
        key in "constraints\\.[A-Z][a-z]{1,8}\\.message",
        template in "must [a-z]{1,8}( [a-z]{1,8}){0,2}",
    ) {
        let entry = format!("    \"{key}\": \"{template}\"\n");
        let yaml = format!("default_locale: \"{language}\"\nmessages:\n  \"{language}\":\n{entry}");
        let config = EngineConfig::from_yaml(&yaml).unwrap();
        let locale = Locale::parse(language).unwrap();
        prop_assert_eq!(&config.default_locale, &locale);
        let stored = config.messages[&locale].get(&key).map(String::as_str);
        prop_assert_eq!(stored, Some(template.as_str()));

        let reparsed = EngineConfig::from_yaml(&config.to_yaml().unwrap()).unwrap();
        prop_assert_eq!(reparsed, config);
    }

    // Any unknown top-level key is rejected with its name as the path.
    #[test]
    fn unknown_keys_rejected(key in "x[a-z]{2,9}") {
        let err = EngineConfig::from_yaml(&format!("{key}: 1\n")).unwrap_err();
        prop_assert_eq!(err.kind, ConfigErrorKind::TypeMismatch);
        prop_assert_eq!(err.path.as_deref(), Some(key.as_str()));
    }
}
