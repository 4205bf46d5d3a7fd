#![no_main]

use descriptor_validation::engine::constraints::{
    ConstraintKind, ConstraintRegistry, EntityConstraints,
};
use descriptor_validation::{BeanValidator, EntityDescriptor, Locale, ValueValidator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    let model = EntityDescriptor::builder("Fuzz").property("field", "Any").build();
    let validator = BeanValidator::with_registry(ConstraintRegistry::new().register(
        EntityConstraints::new("Fuzz").property(
            "field",
            [
                ConstraintKind::NotNull,
                ConstraintKind::Size { min: 1, max: 4 },
                ConstraintKind::Pattern("[a-z]+".to_string()),
            ],
        ),
    ));
    let Some(property) = model.property("field") else {
        return;
    };

    // Engine errors for unsupported value types are fine; panics are not.
    let english = validator.validate_value_in(property, &value, Some(&Locale::english()));
    let german = validator.validate_value_in(property, &value, Some(&Locale::german()));
    if let (Ok(english), Ok(german)) = (english, german) {
        assert_eq!(english.len(), german.len());
    }
});
