//! In-process constraint engine over `serde_json::Value` instances.

use super::constraints::{
    ConstraintDeclaration, ConstraintRegistry, EntityConstraints, PropertyConstraints,
};
use super::messages::BundleInterpolator;
use super::{
    ConstraintViolation, Instance, MessageContext, MessageInterpolator, Node, Path, Validator,
    ValidatorFactory,
};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::model::{Group, OperationRef};
use serde_json::Value;
use std::sync::Arc;

/// Factory for [`ReferenceValidator`]s sharing one immutable registry.
pub struct ReferenceValidatorFactory {
    registry: Arc<ConstraintRegistry>,
    interpolator: Arc<BundleInterpolator>,
}

impl ReferenceValidatorFactory {
    pub fn new(registry: ConstraintRegistry) -> Self {
        Self::with_config(registry, &EngineConfig::default())
    }

    pub fn with_config(registry: ConstraintRegistry, config: &EngineConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            interpolator: Arc::new(BundleInterpolator::from_config(config)),
        }
    }

    pub fn registry(&self) -> &ConstraintRegistry {
        &self.registry
    }
}

impl ValidatorFactory for ReferenceValidatorFactory {
    fn message_interpolator(&self) -> Arc<dyn MessageInterpolator> {
        self.interpolator.clone()
    }

    fn validator_with(
        &self,
        interpolator: Option<Arc<dyn MessageInterpolator>>,
    ) -> Box<dyn Validator> {
        Box::new(ReferenceValidator {
            registry: self.registry.clone(),
            interpolator: interpolator.unwrap_or_else(|| self.message_interpolator()),
        })
    }
}

/// Evaluates registered constraints and renders messages with its
/// interpolator.
pub struct ReferenceValidator {
    registry: Arc<ConstraintRegistry>,
    interpolator: Arc<dyn MessageInterpolator>,
}

/// Where a dotted property path lands: the owning type's declaration, the
/// current value (if walking an instance) and the full path.
struct Resolved<'r, 'v> {
    property: &'r PropertyConstraints,
    value: &'v Value,
    path: Path,
}

impl ReferenceValidator {
    fn check(
        &self,
        root_type: &str,
        constraints: &[ConstraintDeclaration],
        value: &Value,
        path: &Path,
        groups: &[Group],
        out: &mut Vec<ConstraintViolation>,
    ) -> Result<(), EngineError> {
        for decl in constraints.iter().filter(|d| d.applies_to(groups)) {
            let valid = decl.is_valid(value)?;
            log::trace!("{} at '{}' on {}: valid={}", decl.kind().name(), path, root_type, valid);
            if valid {
                continue;
            }
            let constraint = decl.descriptor();
            let context = MessageContext {
                constraint: &constraint,
                validated_value: value,
            };
            let message = self.interpolator.interpolate(&constraint.message_template, &context);
            out.push(ConstraintViolation {
                message,
                message_template: constraint.message_template.clone(),
                path: path.clone(),
                root_type: root_type.to_string(),
                invalid_value: value.clone(),
                constraint,
            });
        }
        Ok(())
    }

    fn validate_bean(
        &self,
        root_type: &str,
        entity: &EntityConstraints,
        value: &Value,
        prefix: &Path,
        groups: &[Group],
        out: &mut Vec<ConstraintViolation>,
    ) -> Result<(), EngineError> {
        for property in &entity.properties {
            let property_value = value.get(&property.name).unwrap_or(&Value::Null);
            let path = prefix.clone().with_node(Node::property(&property.name));
            self.check(root_type, &property.constraints, property_value, &path, groups, out)?;

            if let Some(cascade_type) = &property.cascade {
                if !property_value.is_object() {
                    continue;
                }
                if let Some(nested) = self.registry.entity(cascade_type) {
                    self.validate_bean(root_type, nested, property_value, &path, groups, out)?;
                }
            }
        }
        Ok(())
    }

    /// Walks `property_path` through cascaded properties starting at
    /// `entity_type`, following `value` alongside.
    fn resolve<'v>(
        &self,
        entity_type: &str,
        property_path: &str,
        value: &'v Value,
    ) -> Result<Resolved<'_, 'v>, EngineError> {
        let unknown = || EngineError::unknown_property(entity_type, property_path);
        let segments: Vec<&str> = property_path.split('.').collect();
        let (last, parents) = segments.split_last().ok_or_else(unknown)?;

        let mut current = self.registry.entity(entity_type).ok_or_else(unknown)?;
        let mut current_value = value;
        let mut path = Path::new();
        for segment in parents {
            let property = current.find_property(segment).ok_or_else(unknown)?;
            let cascade = property.cascade.as_deref().ok_or_else(unknown)?;
            current = self.registry.entity(cascade).ok_or_else(unknown)?;
            current_value = current_value.get(*segment).unwrap_or(&Value::Null);
            path = path.with_node(Node::property(*segment));
        }

        let property = current.find_property(last).ok_or_else(unknown)?;
        Ok(Resolved {
            property,
            value: current_value.get(*last).unwrap_or(&Value::Null),
            path: path.with_node(Node::property(*last)),
        })
    }
}

impl Validator for ReferenceValidator {
    fn validate(
        &self,
        instance: Instance<'_>,
        groups: &[Group],
    ) -> Result<Vec<ConstraintViolation>, EngineError> {
        let mut out = Vec::new();
        // Types without registered constraints are valid.
        if let Some(entity) = self.registry.entity(instance.entity_type) {
            self.validate_bean(
                instance.entity_type,
                entity,
                instance.value,
                &Path::new(),
                groups,
                &mut out,
            )?;
        }
        Ok(out)
    }

    fn validate_property(
        &self,
        instance: Instance<'_>,
        property: &str,
        groups: &[Group],
    ) -> Result<Vec<ConstraintViolation>, EngineError> {
        let resolved = self.resolve(instance.entity_type, property, instance.value)?;
        let mut out = Vec::new();
        self.check(
            instance.entity_type,
            &resolved.property.constraints,
            resolved.value,
            &resolved.path,
            groups,
            &mut out,
        )?;
        Ok(out)
    }

    fn validate_value(
        &self,
        entity_type: &str,
        property: &str,
        value: &Value,
        groups: &[Group],
    ) -> Result<Vec<ConstraintViolation>, EngineError> {
        let resolved = self.resolve(entity_type, property, &Value::Null)?;
        let mut out = Vec::new();
        self.check(
            entity_type,
            &resolved.property.constraints,
            value,
            &resolved.path,
            groups,
            &mut out,
        )?;
        Ok(out)
    }

    fn validate_parameters(
        &self,
        target: Instance<'_>,
        operation: &OperationRef,
        arguments: &[Option<Value>],
    ) -> Result<Vec<ConstraintViolation>, EngineError> {
        let declared = self
            .registry
            .entity(&operation.entity_type)
            .and_then(|e| e.operations.get(&operation.name))
            .ok_or_else(|| {
                EngineError::unknown_operation(&operation.entity_type, &operation.name)
            })?;

        if declared.parameters.len() != arguments.len() {
            return Err(EngineError::ArgumentCount {
                operation: operation.name.clone(),
                expected: declared.parameters.len(),
                actual: arguments.len(),
            });
        }

        let mut out = Vec::new();
        let parameters = declared.parameters.iter().zip(arguments);
        for (index, (parameter, argument)) in parameters.enumerate() {
            let path = Path::new()
                .with_node(Node::method(&operation.name))
                .with_node(Node::parameter(&parameter.name, index));
            let value = argument.as_ref().unwrap_or(&Value::Null);
            self.check(
                target.entity_type,
                &parameter.constraints,
                value,
                &path,
                &[Group::DEFAULT],
                &mut out,
            )?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NodeKind;
    use crate::engine::constraints::{ConstraintKind, OperationConstraints};
    use crate::interpolator::LocaleDelegatingInterpolator;
    use crate::locale::Locale;
    use serde_json::json;

    fn factory() -> ReferenceValidatorFactory {
        let registry = ConstraintRegistry::new()
            .register(
                EntityConstraints::new("Outer")
                    .property("name", [ConstraintKind::NotEmpty])
                    .property(
                        "tags",
                        [ConstraintDeclaration::new(ConstraintKind::NotEmpty)
                            .in_groups([Group::new("Strict")])],
                    )
                    .cascade("inner", "Inner")
                    .operation(
                        OperationConstraints::new("rename")
                            .parameter("name", [ConstraintKind::NotBlank])
                            .parameter("force", Vec::<ConstraintDeclaration>::new()),
                    ),
            )
            .register(
                EntityConstraints::new("Inner").property("flag", [ConstraintKind::AssertTrue]),
            );
        ReferenceValidatorFactory::new(registry)
    }

    #[test]
    fn validate_cascades_with_dotted_paths() {
        let f = factory();
        let value = json!({"name": "", "inner": {"flag": false}});
        let violations = f
            .validator()
            .validate(Instance::new("Outer", &value), &[Group::DEFAULT])
            .unwrap();
        let mut paths: Vec<String> = violations.iter().map(|v| v.path.to_string()).collect();
        paths.sort();
        assert_eq!(paths, vec!["inner.flag", "name"]);
        assert!(violations.iter().all(|v| v.root_type == "Outer"));
    }

    #[test]
    fn missing_embedded_object_is_not_cascaded() {
        let f = factory();
        let value = json!({"name": "x"});
        let violations = f
            .validator()
            .validate(Instance::new("Outer", &value), &[Group::DEFAULT])
            .unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn groups_filter_constraints() {
        let f = factory();
        let value = json!({"name": "x", "tags": []});
        let v = f.validator();
        assert!(v.validate(Instance::new("Outer", &value), &[Group::DEFAULT]).unwrap().is_empty());
        let strict = v.validate(Instance::new("Outer", &value), &[Group::new("Strict")]).unwrap();
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].path.to_string(), "tags");
    }

    #[test]
    fn unconstrained_type_is_valid() {
        let f = factory();
        let value = json!({});
        let violations = f
            .validator()
            .validate(Instance::new("Nobody", &value), &[Group::DEFAULT])
            .unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn validate_property_follows_cascade() {
        let f = factory();
        let value = json!({"name": "x", "inner": {"flag": false}});
        let violations = f
            .validator()
            .validate_property(Instance::new("Outer", &value), "inner.flag", &[Group::DEFAULT])
            .unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path.to_string(), "inner.flag");
        assert_eq!(violations[0].message, "must be true");
    }

    #[test]
    fn validate_property_unknown_is_error() {
        let f = factory();
        let value = json!({});
        let err = f
            .validator()
            .validate_property(Instance::new("Outer", &value), "nope", &[Group::DEFAULT])
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownProperty { .. }));
        let err = f
            .validator()
            .validate_property(Instance::new("Outer", &value), "name.deeper", &[Group::DEFAULT])
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownProperty { .. }));
    }

    #[test]
    fn validate_value_uses_given_value() {
        let f = factory();
        let v = f.validator();
        let default = [Group::DEFAULT];
        assert_eq!(v.validate_value("Outer", "name", &json!(""), &default).unwrap().len(), 1);
        assert!(v.validate_value("Outer", "name", &json!("ok"), &default).unwrap().is_empty());
        let flag = v.validate_value("Outer", "inner.flag", &json!(false), &default).unwrap();
        assert_eq!(flag.len(), 1);
    }

    #[test]
    fn validate_parameters_paths() {
        let f = factory();
        let target = json!({});
        let op = OperationRef {
            entity_type: "Outer".to_string(),
            name: "rename".to_string(),
        };
        let violations = f
            .validator()
            .validate_parameters(Instance::new("Outer", &target), &op, &[Some(json!(" ")), None])
            .unwrap();
        assert_eq!(violations.len(), 1);
        let nodes = violations[0].path.nodes();
        assert_eq!(*nodes[0].kind(), NodeKind::Method);
        assert_eq!(*nodes[1].kind(), NodeKind::Parameter { index: 0 });
    }

    #[test]
    fn validate_parameters_checks_arity_and_operation() {
        let f = factory();
        let target = json!({});
        let v = f.validator();
        let op = OperationRef {
            entity_type: "Outer".to_string(),
            name: "rename".to_string(),
        };
        let err = v.validate_parameters(Instance::new("Outer", &target), &op, &[None]).unwrap_err();
        assert!(matches!(err, EngineError::ArgumentCount { expected: 2, actual: 1, .. }));

        let missing = OperationRef {
            entity_type: "Outer".to_string(),
            name: "delete".to_string(),
        };
        let err = v
            .validate_parameters(Instance::new("Outer", &target), &missing, &[])
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownOperation { .. }));
    }

    #[test]
    fn context_interpolator_overrides_default() {
        let f = factory();
        let german =
            LocaleDelegatingInterpolator::new(f.message_interpolator()).locale(Locale::german());
        let v = f.validator_with(Some(Arc::new(german)));
        let violations = v.validate_value("Outer", "name", &json!(""), &[Group::DEFAULT]).unwrap();
        assert_eq!(violations[0].message, "darf nicht leer sein");
    }

    #[test]
    fn invalid_pattern_fails_even_for_null() {
        let registry = ConstraintRegistry::new().register(
            EntityConstraints::new("Broken")
                .property("code", [ConstraintKind::Pattern("(".to_string())]),
        );
        let f = ReferenceValidatorFactory::new(registry);
        let value = json!({});
        let err = f
            .validator()
            .validate(Instance::new("Broken", &value), &[Group::DEFAULT])
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConstraint { .. }));
    }
}
