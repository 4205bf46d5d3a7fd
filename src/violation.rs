//! Descriptor-keyed violations.
//!
//! A violation pairs one model descriptor with one engine violation. Equality
//! and hashing are by identity of both halves, so two distinct engine
//! violations on the same property stay two members of a result set.

use crate::engine::ConstraintViolation;
use crate::error::{Error, PARAMETER_DESCRIPTOR_UNSET, PROPERTY_DESCRIPTOR_UNSET, VIOLATION_UNSET};
use crate::model::{ParameterDescriptor, PropertyDescriptor};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Descriptors a violation can be keyed by.
pub trait ViolationTarget {
    /// Builder precondition message when the descriptor is unset.
    const UNSET: &'static str;
    const LABEL: &'static str;

    fn describe(&self) -> String;
}

impl ViolationTarget for PropertyDescriptor {
    const UNSET: &'static str = PROPERTY_DESCRIPTOR_UNSET;
    const LABEL: &'static str = "Property";

    fn describe(&self) -> String {
        self.name().to_string()
    }
}

impl ViolationTarget for ParameterDescriptor {
    const UNSET: &'static str = PARAMETER_DESCRIPTOR_UNSET;
    const LABEL: &'static str = "Parameter";

    fn describe(&self) -> String {
        self.index().to_string()
    }
}

/// An engine violation attached to a descriptor.
#[derive(Debug)]
pub struct Violation<D> {
    descriptor: Arc<D>,
    violation: Arc<ConstraintViolation>,
}

/// A violation of a property constraint.
pub type PropertyViolation = Violation<PropertyDescriptor>;
/// A violation of a parameter constraint.
pub type ParameterViolation = Violation<ParameterDescriptor>;

impl<D: ViolationTarget> Violation<D> {
    pub fn builder() -> ViolationBuilder<D> {
        ViolationBuilder {
            descriptor: None,
            violation: None,
        }
    }

    /// The rendered message.
    pub fn message(&self) -> &str {
        &self.violation.message
    }

    pub fn descriptor(&self) -> &Arc<D> {
        &self.descriptor
    }

    /// The underlying engine violation.
    pub fn violation(&self) -> &Arc<ConstraintViolation> {
        &self.violation
    }
}

impl PropertyViolation {
    pub fn property(&self) -> &Arc<PropertyDescriptor> {
        &self.descriptor
    }
}

impl ParameterViolation {
    pub fn parameter(&self) -> &Arc<ParameterDescriptor> {
        &self.descriptor
    }
}

impl<D> Clone for Violation<D> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            violation: self.violation.clone(),
        }
    }
}

impl<D> PartialEq for Violation<D> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.descriptor, &other.descriptor)
            && Arc::ptr_eq(&self.violation, &other.violation)
    }
}

impl<D> Eq for Violation<D> {}

impl<D> Hash for Violation<D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.descriptor).hash(state);
        Arc::as_ptr(&self.violation).hash(state);
    }
}

impl<D: ViolationTarget> fmt::Display for Violation<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Violation[{}: {}, message: {}]",
            D::LABEL,
            D::LABEL,
            self.descriptor.describe(),
            self.violation.message
        )
    }
}

/// Two-field builder; both fields are required.
pub struct ViolationBuilder<D> {
    descriptor: Option<Arc<D>>,
    violation: Option<Arc<ConstraintViolation>>,
}

impl<D: ViolationTarget> ViolationBuilder<D> {
    pub fn descriptor(mut self, descriptor: Arc<D>) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    pub fn violation(mut self, violation: Arc<ConstraintViolation>) -> Self {
        self.violation = Some(violation);
        self
    }

    pub fn build(self) -> Result<Violation<D>, Error> {
        let descriptor = self.descriptor.ok_or(Error::Precondition(D::UNSET))?;
        let violation = self.violation.ok_or(Error::Precondition(VIOLATION_UNSET))?;
        Ok(Violation {
            descriptor,
            violation,
        })
    }
}

impl ViolationBuilder<PropertyDescriptor> {
    pub fn property(self, property: Arc<PropertyDescriptor>) -> Self {
        self.descriptor(property)
    }
}

impl ViolationBuilder<ParameterDescriptor> {
    pub fn parameter(self, parameter: Arc<ParameterDescriptor>) -> Self {
        self.descriptor(parameter)
    }
}
