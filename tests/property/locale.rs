use descriptor_validation::Locale;
use proptest::prelude::*;

/// Strategy for tags in any case with either separator.
fn arb_tag() -> impl Strategy<Value = (String, Option<String>, char)> {
    (
        "[a-zA-Z]{2,3}",
        proptest::option::of("[a-zA-Z]{2}"),
        prop_oneof![Just('-'), Just('_')],
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // Display output parses back to the same locale.
    #[test]
    fn display_roundtrips((language, region, sep) in arb_tag()) {
        let tag = match &region {
            Some(r) => format!("{}{}{}", language, sep, r),
            None => language.clone(),
        };
        let locale = Locale::parse(&tag).unwrap();
        prop_assert_eq!(locale.language(), language.to_ascii_lowercase());
        let expected_region = region.map(|r| r.to_ascii_uppercase());
        prop_assert_eq!(locale.region().map(str::to_string), expected_region);
        let reparsed = Locale::parse(&locale.to_string()).unwrap();
        prop_assert_eq!(reparsed, locale);
    }

    // Fallback chain starts at the locale itself and ends at its bare language.
    #[test]
    fn fallbacks_end_at_language((language, region, sep) in arb_tag()) {
        let tag = match &region {
            Some(r) => format!("{}{}{}", language, sep, r),
            None => language.clone(),
        };
        let locale = Locale::parse(&tag).unwrap();
        let chain = locale.fallbacks();
        prop_assert_eq!(&chain[0], &locale);
        let last = chain.last().unwrap();
        prop_assert_eq!(last.region(), None);
        prop_assert_eq!(last.language(), locale.language());
        prop_assert_eq!(chain.len(), if region.is_some() { 2 } else { 1 });
    }

    // Anything with characters outside the tag alphabet is rejected.
    #[test]
    fn garbage_is_rejected(tag in "[a-z]{2}[!@#$%^&*. ][a-z]{2}") {
        prop_assert!(Locale::parse(&tag).is_err());
    }
}
