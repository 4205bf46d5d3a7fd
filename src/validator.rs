//! The validation dispatcher.
//!
//! [`BeanValidator`] turns the four validation use-cases into engine calls and
//! maps the engine's path-keyed violations back onto model descriptors:
//!
//! ```text
//! validate_entity     → Validator::validate           → path string → entity.property(path)
//! validate_property   → Validator::validate_property  → the given property
//! validate_value      → Validator::validate_value     → the given property
//! validate_invocation → Validator::validate_parameters → path node #2 → operation.parameter(index)
//! ```
//!
//! Each call picks exactly one group context: the descriptor's qualifier
//! groups when it exposes them, the default group otherwise.

use crate::engine::constraints::ConstraintRegistry;
use crate::engine::reference::ReferenceValidatorFactory;
use crate::engine::{ConstraintViolation, Instance, Validator, ValidatorContext, ValidatorFactory};
use crate::error::{ENTITY_NULL, Error, INVOCATION_NULL};
use crate::interpolator::LocaleDelegatingInterpolator;
use crate::invocation::OperationInvocation;
use crate::locale::Locale;
use crate::model::{Adaptable, EntityDescriptor, Group, PropertyDescriptor};
use crate::parameter_path::resolve_parameter;
use crate::violation::{ParameterViolation, PropertyViolation};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

// ─── Validation traits ──────────────────────────────────────────────────────

/// Validates whole entities.
pub trait EntityValidator {
    fn validate_entity_in<E: Serialize + ?Sized>(
        &self,
        descriptor: &EntityDescriptor,
        entity: &E,
        locale: Option<&Locale>,
    ) -> Result<HashSet<PropertyViolation>, Error>;

    fn validate_entity<E: Serialize + ?Sized>(
        &self,
        descriptor: &EntityDescriptor,
        entity: &E,
    ) -> Result<HashSet<PropertyViolation>, Error> {
        self.validate_entity_in(descriptor, entity, None)
    }
}

/// Validates a single property of an entity.
pub trait PropertyValidator {
    fn validate_property_in<E: Serialize + ?Sized>(
        &self,
        property: &Arc<PropertyDescriptor>,
        entity: &E,
        locale: Option<&Locale>,
    ) -> Result<HashSet<PropertyViolation>, Error>;

    fn validate_property<E: Serialize + ?Sized>(
        &self,
        property: &Arc<PropertyDescriptor>,
        entity: &E,
    ) -> Result<HashSet<PropertyViolation>, Error> {
        self.validate_property_in(property, entity, None)
    }
}

/// Validates a candidate value for a property without an entity.
pub trait ValueValidator {
    fn validate_value_in<P: Serialize + ?Sized>(
        &self,
        property: &Arc<PropertyDescriptor>,
        value: &P,
        locale: Option<&Locale>,
    ) -> Result<HashSet<PropertyViolation>, Error>;

    fn validate_value<P: Serialize + ?Sized>(
        &self,
        property: &Arc<PropertyDescriptor>,
        value: &P,
    ) -> Result<HashSet<PropertyViolation>, Error> {
        self.validate_value_in(property, value, None)
    }
}

/// Validates the parameters of an operation invocation.
pub trait InvocationValidator {
    fn validate_invocation_in(
        &self,
        invocation: &OperationInvocation,
        locale: Option<&Locale>,
    ) -> Result<HashSet<ParameterViolation>, Error>;

    fn validate_invocation(
        &self,
        invocation: &OperationInvocation,
    ) -> Result<HashSet<ParameterViolation>, Error> {
        self.validate_invocation_in(invocation, None)
    }
}

/// Outcome of invocation validation including what could not be mapped.
#[derive(Clone, Debug, Default)]
pub struct InvocationReport {
    pub violations: HashSet<ParameterViolation>,
    /// Engine violations whose path does not name a declared parameter.
    pub dropped: usize,
}

// ─── BeanValidator ──────────────────────────────────────────────────────────

/// Dispatcher over a constraint engine. Stateless apart from the factory
/// handle; safe to share across threads.
#[derive(Clone)]
pub struct BeanValidator {
    factory: Arc<dyn ValidatorFactory>,
}

impl BeanValidator {
    pub fn new(factory: Arc<dyn ValidatorFactory>) -> Self {
        Self { factory }
    }

    /// A validator backed by the reference engine with default settings.
    pub fn with_registry(registry: ConstraintRegistry) -> Self {
        Self::new(Arc::new(ReferenceValidatorFactory::new(registry)))
    }

    pub fn factory(&self) -> &Arc<dyn ValidatorFactory> {
        &self.factory
    }

    /// Like [`InvocationValidator::validate_invocation_in`], also reporting
    /// how many engine violations were dropped as unrepresentable.
    pub fn invocation_report(
        &self,
        invocation: &OperationInvocation,
        locale: Option<&Locale>,
    ) -> Result<InvocationReport, Error> {
        log::debug!(
            "Validating with locale {:?} invocation of {}",
            locale,
            invocation.operation().name()
        );
        let target = invocation.target_value().ok_or(Error::Precondition(INVOCATION_NULL))?;
        let operation = invocation.operation();
        let arguments = invocation.positional_arguments();

        let reference = operation.operation_reference();
        let violations = self.create_validator(locale).validate_parameters(
            Instance::new(&reference.entity_type, target),
            reference,
            &arguments,
        )?;

        let mut report = InvocationReport::default();
        for violation in violations {
            let Some(parameter) = resolve_parameter(&violation.path, operation) else {
                log::debug!(
                    "Dropping violation at '{}' of {}: no parameter node",
                    violation.path,
                    operation.name()
                );
                report.dropped += 1;
                continue;
            };
            let built = ParameterViolation::builder()
                .parameter(parameter)
                .violation(Arc::new(violation))
                .build()?;
            report.violations.insert(built);
        }
        Ok(report)
    }

    /// A validator for one call. With a locale, messages are rendered by
    /// the factory's interpolator forced to that locale.
    fn create_validator(&self, locale: Option<&Locale>) -> Box<dyn Validator> {
        let mut context = ValidatorContext::new(self.factory.as_ref());
        if let Some(locale) = locale {
            let delegate = self.factory.message_interpolator();
            let interpolator = LocaleDelegatingInterpolator::new(delegate).locale(locale.clone());
            context = context.message_interpolator(Arc::new(interpolator));
        }
        context.validator()
    }
}

/// The reference engine with an empty registry and default configuration.
impl Default for BeanValidator {
    fn default() -> Self {
        Self::with_registry(ConstraintRegistry::new())
    }
}

/// Qualifier groups of `descriptor` if it exposes any, otherwise the default
/// group. Never both. A qualifier context without groups means the default
/// group.
fn groups_for(descriptor: &impl Adaptable) -> Vec<Group> {
    match descriptor.qualifier_selected() {
        Some(selected) if !selected.qualifier().is_empty() => selected.qualifier().to_vec(),
        _ => vec![Group::DEFAULT],
    }
}

fn entity_value<E: Serialize + ?Sized>(entity: &E) -> Result<Value, Error> {
    match serde_json::to_value(entity)? {
        Value::Null => Err(Error::Precondition(ENTITY_NULL)),
        value => Ok(value),
    }
}

fn convert_entity_violations(
    descriptor: &EntityDescriptor,
    violations: Vec<ConstraintViolation>,
) -> Result<HashSet<PropertyViolation>, Error> {
    violations
        .into_iter()
        .map(|violation| {
            let path = violation.path.to_string();
            let property = descriptor
                .property(&path)
                .cloned()
                .ok_or_else(|| Error::UnresolvedProperty {
                    entity: descriptor.entity_type().to_string(),
                    path,
                })?;
            PropertyViolation::builder()
                .property(property)
                .violation(Arc::new(violation))
                .build()
        })
        .collect()
}

fn convert_property_violations(
    property: &Arc<PropertyDescriptor>,
    violations: Vec<ConstraintViolation>,
) -> Result<HashSet<PropertyViolation>, Error> {
    violations
        .into_iter()
        .map(|violation| {
            PropertyViolation::builder()
                .property(property.clone())
                .violation(Arc::new(violation))
                .build()
        })
        .collect()
}

impl EntityValidator for BeanValidator {
    fn validate_entity_in<E: Serialize + ?Sized>(
        &self,
        descriptor: &EntityDescriptor,
        entity: &E,
        locale: Option<&Locale>,
    ) -> Result<HashSet<PropertyViolation>, Error> {
        log::debug!(
            "Validating with locale {:?} entity of type {}",
            locale,
            descriptor.entity_type()
        );
        let value = entity_value(entity)?;
        let groups = groups_for(descriptor);
        let violations = self
            .create_validator(locale)
            .validate(Instance::new(descriptor.entity_type(), &value), &groups)?;
        convert_entity_violations(descriptor, violations)
    }
}

impl PropertyValidator for BeanValidator {
    fn validate_property_in<E: Serialize + ?Sized>(
        &self,
        property: &Arc<PropertyDescriptor>,
        entity: &E,
        locale: Option<&Locale>,
    ) -> Result<HashSet<PropertyViolation>, Error> {
        log::debug!(
            "Validating with locale {:?} property: {}, entity of type {}",
            locale,
            property.name(),
            property.entity_type()
        );
        let value = entity_value(entity)?;
        let groups = groups_for(&**property);
        let violations = self.create_validator(locale).validate_property(
            Instance::new(property.entity_type(), &value),
            property.name(),
            &groups,
        )?;
        convert_property_violations(property, violations)
    }
}

impl ValueValidator for BeanValidator {
    fn validate_value_in<P: Serialize + ?Sized>(
        &self,
        property: &Arc<PropertyDescriptor>,
        value: &P,
        locale: Option<&Locale>,
    ) -> Result<HashSet<PropertyViolation>, Error> {
        let value = serde_json::to_value(value)?;
        log::debug!(
            "Validating with locale {:?} property: {}, with value {}",
            locale,
            property.name(),
            value
        );
        let groups = groups_for(&**property);
        let violations = self.create_validator(locale).validate_value(
            property.entity_type(),
            property.name(),
            &value,
            &groups,
        )?;
        convert_property_violations(property, violations)
    }
}

impl InvocationValidator for BeanValidator {
    fn validate_invocation_in(
        &self,
        invocation: &OperationInvocation,
        locale: Option<&Locale>,
    ) -> Result<HashSet<ParameterViolation>, Error> {
        self.invocation_report(invocation, locale).map(|report| report.violations)
    }
}
