use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Precondition message: entity instance absent.
pub const ENTITY_NULL: &str = "Entity may not be null.";
/// Precondition message: invocation absent or without a target.
pub const INVOCATION_NULL: &str = "Invocation may not be null.";
/// Precondition message: builder built without a property descriptor.
pub const PROPERTY_DESCRIPTOR_UNSET: &str = "Property descriptor was null.";
/// Precondition message: builder built without a parameter descriptor.
pub const PARAMETER_DESCRIPTOR_UNSET: &str = "Parameter descriptor was null.";
/// Precondition message: builder built without a native violation.
pub const VIOLATION_UNSET: &str = "Violation was null.";

/// Errors surfaced by the validation dispatcher.
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was missing. Raised before the engine is called.
    #[error("{0}")]
    Precondition(&'static str),

    /// The engine reported a path the entity descriptor does not know.
    #[error("entity '{entity}' has no property for path '{path}'")]
    UnresolvedProperty { entity: String, path: String },

    /// A typed entity or value could not be represented for the engine.
    #[error("could not convert value for validation: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failure inside the constraint engine, passed through untouched.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl Error {
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::Precondition(_))
    }
}

/// Errors raised by a constraint engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown property '{property}' on type '{entity_type}'")]
    UnknownProperty {
        entity_type: String,
        property: String,
    },

    #[error("unknown operation '{operation}' on type '{entity_type}'")]
    UnknownOperation {
        entity_type: String,
        operation: String,
    },

    #[error("operation '{operation}' declares {expected} parameters, got {actual}")]
    ArgumentCount {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid constraint '{constraint}': {message}")]
    InvalidConstraint { constraint: String, message: String },
}

impl EngineError {
    pub fn unknown_property(entity_type: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            entity_type: entity_type.into(),
            property: property.into(),
        }
    }

    pub fn unknown_operation(entity_type: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnknownOperation {
            entity_type: entity_type.into(),
            operation: operation.into(),
        }
    }

    pub fn invalid_constraint(constraint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConstraint {
            constraint: constraint.into(),
            message: message.into(),
        }
    }
}

/// Error kind for configuration load failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigErrorKind {
    Syntax,
    TypeMismatch,
    InvalidLocale,
}

/// Produced when an engine configuration document cannot be loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ConfigError {
    pub(crate) fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: None,
        }
    }

    pub(crate) fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ConfigError {}
