use crate::common::{Entity01, entity01_constraints, entity01_model};
use descriptor_validation::{BeanValidator, EntityValidator, Locale};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // One violation per invalid field, reported on the same properties in
    // every locale.
    #[test]
    fn violation_count_matches_invalid_fields(
        value in proptest::option::of("[a-z]{0,4}"),
        check_item in any::<bool>(),
        some_list in proptest::collection::vec("[a-z]{1,3}", 0..3),
    ) {
        let model = entity01_model();
        let validator = BeanValidator::with_registry(entity01_constraints());
        let mut entity = Entity01::default();
        entity.value = value.clone();
        entity.embedded.check_item = check_item;
        entity.some_list = some_list;

        let value_invalid = value.as_deref().is_none_or(str::is_empty);
        let expected = usize::from(value_invalid) + usize::from(!check_item);

        let mut reported = Vec::new();
        for locale in [None, Some(Locale::english()), Some(Locale::german())] {
            let violations =
                validator.validate_entity_in(&model, &entity, locale.as_ref()).unwrap();
            prop_assert_eq!(violations.len(), expected);
            let mut names: Vec<String> =
                violations.iter().map(|v| v.property().name().to_string()).collect();
            names.sort();
            reported.push(names);
        }
        prop_assert!(reported.windows(2).all(|w| w[0] == w[1]));
    }
}
