//! Constraint validation for reflective descriptor models.
//!
//! A descriptor model describes entities, properties, operations and
//! parameters independently of any validation technology. This crate runs a
//! constraint engine against model instances and reports every failure keyed
//! by the model's own descriptors:
//!
//! ```text
//! validate_entity(entity, instance)       → HashSet<PropertyViolation>
//! validate_property(property, instance)   → HashSet<PropertyViolation>
//! validate_value(property, value)         → HashSet<PropertyViolation>
//! validate_invocation(invocation)         → HashSet<ParameterViolation>
//! ```
//!
//! Each operation has an `_in` form taking an optional [`Locale`] for
//! message rendering.
//!
//! # Quick Start
//!
//! ```rust
//! use descriptor_validation::engine::constraints::{
//!     ConstraintKind, ConstraintRegistry, EntityConstraints,
//! };
//! use descriptor_validation::{BeanValidator, EntityDescriptor, EntityValidator, Locale};
//! use serde_json::json;
//!
//! let model = EntityDescriptor::builder("Contact")
//!     .property("email", "String")
//!     .build();
//!
//! let validator = BeanValidator::with_registry(ConstraintRegistry::new().register(
//!     EntityConstraints::new("Contact").property("email", [ConstraintKind::NotEmpty]),
//! ));
//!
//! let violations = validator
//!     .validate_entity_in(&model, &json!({ "email": "" }), Some(&Locale::german()))
//!     .expect("engine is configured");
//! let violation = violations.iter().next().unwrap();
//! assert_eq!(violation.property().name(), "email");
//! assert_eq!(violation.message(), "darf nicht leer sein");
//! ```
//!
//! # Engines
//!
//! The validator talks to an engine through [`engine::ValidatorFactory`].
//! [`engine::reference`] ships an in-process engine over `serde_json::Value`
//! instances with English and German message catalogs; see [`EngineConfig`]
//! for adding catalogs.

pub mod config;
pub mod engine;
pub mod error;
pub mod interpolator;
pub mod invocation;
pub mod locale;
pub mod model;
pub mod parameter_path;
pub mod validator;
pub mod violation;

pub use config::EngineConfig;
pub use error::{ConfigError, ConfigErrorKind, EngineError, Error};
pub use interpolator::LocaleDelegatingInterpolator;
pub use invocation::OperationInvocation;
pub use locale::Locale;
pub use model::{
    Adaptable, Capability, CapabilityKind, EntityDescriptor, Group, OperationDescriptor,
    OperationRef, ParameterDescriptor, PropertyDescriptor, QualifierSelected,
};
pub use parameter_path::resolve_parameter;
pub use validator::{
    BeanValidator, EntityValidator, InvocationReport, InvocationValidator, PropertyValidator,
    ValueValidator,
};
pub use violation::{ParameterViolation, PropertyViolation, Violation};
