//! Constraint engine contract.
//!
//! The validator talks to an engine only through these traits:
//!
//! ```text
//! ValidatorFactory ─ message_interpolator() ─→ default MessageInterpolator
//!        │
//!        └─ ValidatorContext (optional interpolator override) ─→ Validator
//!                                                                  │
//!                          validate / validate_property / validate_value /
//!                          validate_parameters ─→ Vec<ConstraintViolation>
//! ```
//!
//! [`reference`] provides an in-process implementation over
//! `serde_json::Value` instances.

pub mod constraints;
pub mod messages;
pub mod path;
pub mod reference;

use crate::error::EngineError;
use crate::locale::Locale;
use crate::model::{Group, OperationRef};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

pub use path::{Node, NodeKind, Path};

/// An instance handed to the engine together with its type name.
#[derive(Clone, Copy, Debug)]
pub struct Instance<'a> {
    pub entity_type: &'a str,
    pub value: &'a Value,
}

impl<'a> Instance<'a> {
    pub fn new(entity_type: &'a str, value: &'a Value) -> Self {
        Self { entity_type, value }
    }
}

/// Metadata of the constraint that produced a violation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDescriptor {
    /// Constraint kind name, e.g. `NotEmpty`.
    pub kind: String,
    pub message_template: String,
    pub groups: Vec<Group>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

/// One failed constraint as reported by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    /// Interpolated message.
    pub message: String,
    pub message_template: String,
    pub path: Path,
    /// Type name of the validated root (entity or invocation target).
    pub root_type: String,
    pub invalid_value: Value,
    pub constraint: ConstraintDescriptor,
}

/// Data available to a message interpolator while rendering one message.
#[derive(Clone, Copy, Debug)]
pub struct MessageContext<'a> {
    pub constraint: &'a ConstraintDescriptor,
    pub validated_value: &'a Value,
}

/// Renders constraint message templates.
///
/// The two operations are distinct so that an implementation can route the
/// locale-less form to a locale of its own choosing.
pub trait MessageInterpolator: Send + Sync {
    /// Renders `template` with the interpolator's own locale.
    fn interpolate(&self, template: &str, context: &MessageContext<'_>) -> String;

    /// Renders `template` with `locale`; `None` means the engine default.
    fn interpolate_for_locale(
        &self,
        template: &str,
        context: &MessageContext<'_>,
        locale: Option<&Locale>,
    ) -> String;
}

/// A validator instance. Obtained per call from a [`ValidatorFactory`].
pub trait Validator {
    /// Validates every constraint of `instance` in `groups`, cascading into
    /// embedded objects.
    fn validate(
        &self,
        instance: Instance<'_>,
        groups: &[Group],
    ) -> Result<Vec<ConstraintViolation>, EngineError>;

    /// Validates the constraints declared on one property of `instance`.
    fn validate_property(
        &self,
        instance: Instance<'_>,
        property: &str,
        groups: &[Group],
    ) -> Result<Vec<ConstraintViolation>, EngineError>;

    /// Validates `value` against the constraints of `property` on
    /// `entity_type` without an instance.
    fn validate_value(
        &self,
        entity_type: &str,
        property: &str,
        value: &Value,
        groups: &[Group],
    ) -> Result<Vec<ConstraintViolation>, EngineError>;

    /// Validates positional `arguments` of `operation` invoked on `target`.
    fn validate_parameters(
        &self,
        target: Instance<'_>,
        operation: &OperationRef,
        arguments: &[Option<Value>],
    ) -> Result<Vec<ConstraintViolation>, EngineError>;
}

/// Entry point to an engine. Must be shareable across threads.
pub trait ValidatorFactory: Send + Sync {
    /// The engine's default interpolator.
    fn message_interpolator(&self) -> Arc<dyn MessageInterpolator>;

    /// Creates a validator, optionally rendering messages with `interpolator`
    /// instead of the default one.
    fn validator_with(
        &self,
        interpolator: Option<Arc<dyn MessageInterpolator>>,
    ) -> Box<dyn Validator>;

    fn validator(&self) -> Box<dyn Validator> {
        self.validator_with(None)
    }
}

/// Scoped validator configuration: overrides apply to the one validator
/// created from this context.
pub struct ValidatorContext<'f> {
    factory: &'f dyn ValidatorFactory,
    interpolator: Option<Arc<dyn MessageInterpolator>>,
}

impl<'f> ValidatorContext<'f> {
    pub fn new(factory: &'f dyn ValidatorFactory) -> Self {
        Self {
            factory,
            interpolator: None,
        }
    }

    pub fn message_interpolator(mut self, interpolator: Arc<dyn MessageInterpolator>) -> Self {
        self.interpolator = Some(interpolator);
        self
    }

    pub fn validator(self) -> Box<dyn Validator> {
        self.factory.validator_with(self.interpolator)
    }
}
