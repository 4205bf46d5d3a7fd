//! Shared fixtures: the Entity01 model with its constraints, and a scripted
//! engine that records what the validator asked for.

#![allow(dead_code)]

use descriptor_validation::engine::constraints::{
    ConstraintDeclaration, ConstraintKind, ConstraintRegistry, EntityConstraints,
    OperationConstraints,
};
use descriptor_validation::engine::{
    ConstraintDescriptor, ConstraintViolation, Instance, MessageContext, MessageInterpolator, Path,
    Validator, ValidatorFactory,
};
use descriptor_validation::{EngineError, EntityDescriptor, Group, Locale, OperationRef};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn qualifier01() -> Group {
    Group::new("Qualifier01")
}

// ─── Entity01 fixture ───────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize)]
pub struct Entity02 {
    pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity03 {
    pub check_item: bool,
    pub constant_value: String,
    pub identity: Option<String>,
}

impl Default for Entity03 {
    fn default() -> Self {
        Self {
            check_item: false,
            constant_value: "testConstant".to_string(),
            identity: None,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity01 {
    pub embedded: Entity03,
    pub entity_list: Vec<Entity02>,
    pub some_list: Vec<String>,
    pub value: Option<String>,
}

pub fn entity01_model() -> Arc<EntityDescriptor> {
    EntityDescriptor::builder("Entity01")
        .property("embedded", "Entity03")
        .property("entityList", "Vec<Entity02>")
        .property("someList", "Vec<String>")
        .property("value", "String")
        .property("embedded.checkItem", "bool")
        .property("embedded.constantValue", "String")
        .property("embedded.identity", "String")
        .operation("method", [("param", "String")])
        .qualifier(qualifier01())
        .build()
}

pub fn entity01_constraints() -> ConstraintRegistry {
    ConstraintRegistry::new()
        .register(
            EntityConstraints::new("Entity01")
                .cascade("embedded", "Entity03")
                .unconstrained("entityList")
                .property(
                    "someList",
                    [ConstraintDeclaration::new(ConstraintKind::NotEmpty)
                        .in_groups([qualifier01()])],
                )
                .property("value", [ConstraintKind::NotEmpty])
                .operation(
                    OperationConstraints::new("method")
                        .parameter("param", [ConstraintKind::NotEmpty]),
                ),
        )
        .register(
            EntityConstraints::new("Entity03")
                .property("checkItem", [ConstraintKind::AssertTrue])
                .unconstrained("constantValue")
                .unconstrained("identity"),
        )
        .register(EntityConstraints::new("Entity02").unconstrained("name"))
}

// ─── Scripted engine ────────────────────────────────────────────────────────

/// What the validator asked the engine to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Validate {
        entity_type: String,
        groups: Vec<Group>,
    },
    Property {
        entity_type: String,
        property: String,
        groups: Vec<Group>,
    },
    Value {
        entity_type: String,
        property: String,
        value: Value,
        groups: Vec<Group>,
    },
    Parameters {
        operation: OperationRef,
        arguments: Vec<Option<Value>>,
    },
}

/// Renders `template|locale`, `platform` when no locale is given.
pub struct TaggingInterpolator;

impl MessageInterpolator for TaggingInterpolator {
    fn interpolate(&self, template: &str, context: &MessageContext<'_>) -> String {
        self.interpolate_for_locale(template, context, None)
    }

    fn interpolate_for_locale(
        &self,
        template: &str,
        _context: &MessageContext<'_>,
        locale: Option<&Locale>,
    ) -> String {
        match locale {
            Some(locale) => format!("{}|{}", template, locale),
            None => format!("{}|platform", template),
        }
    }
}

/// Engine returning a fixed list of violations for every call.
#[derive(Default)]
pub struct ScriptedFactory {
    script: Vec<ConstraintViolation>,
    fail: bool,
    pub calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedFactory {
    pub fn returning(script: Vec<ConstraintViolation>) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl ValidatorFactory for ScriptedFactory {
    fn message_interpolator(&self) -> Arc<dyn MessageInterpolator> {
        Arc::new(TaggingInterpolator)
    }

    fn validator_with(
        &self,
        interpolator: Option<Arc<dyn MessageInterpolator>>,
    ) -> Box<dyn Validator> {
        Box::new(ScriptedValidator {
            script: self.script.clone(),
            fail: self.fail,
            calls: self.calls.clone(),
            interpolator: interpolator.unwrap_or_else(|| self.message_interpolator()),
        })
    }
}

struct ScriptedValidator {
    script: Vec<ConstraintViolation>,
    fail: bool,
    calls: Arc<Mutex<Vec<Call>>>,
    interpolator: Arc<dyn MessageInterpolator>,
}

impl ScriptedValidator {
    fn respond(&self, call: Call) -> Result<Vec<ConstraintViolation>, EngineError> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(EngineError::invalid_constraint("Scripted", "engine failure"));
        }
        Ok(self
            .script
            .iter()
            .map(|v| {
                let context = MessageContext {
                    constraint: &v.constraint,
                    validated_value: &v.invalid_value,
                };
                ConstraintViolation {
                    message: self.interpolator.interpolate(&v.message_template, &context),
                    ..v.clone()
                }
            })
            .collect())
    }
}

impl Validator for ScriptedValidator {
    fn validate(
        &self,
        instance: Instance<'_>,
        groups: &[Group],
    ) -> Result<Vec<ConstraintViolation>, EngineError> {
        self.respond(Call::Validate {
            entity_type: instance.entity_type.to_string(),
            groups: groups.to_vec(),
        })
    }

    fn validate_property(
        &self,
        instance: Instance<'_>,
        property: &str,
        groups: &[Group],
    ) -> Result<Vec<ConstraintViolation>, EngineError> {
        self.respond(Call::Property {
            entity_type: instance.entity_type.to_string(),
            property: property.to_string(),
            groups: groups.to_vec(),
        })
    }

    fn validate_value(
        &self,
        entity_type: &str,
        property: &str,
        value: &Value,
        groups: &[Group],
    ) -> Result<Vec<ConstraintViolation>, EngineError> {
        self.respond(Call::Value {
            entity_type: entity_type.to_string(),
            property: property.to_string(),
            value: value.clone(),
            groups: groups.to_vec(),
        })
    }

    fn validate_parameters(
        &self,
        _target: Instance<'_>,
        operation: &OperationRef,
        arguments: &[Option<Value>],
    ) -> Result<Vec<ConstraintViolation>, EngineError> {
        self.respond(Call::Parameters {
            operation: operation.clone(),
            arguments: arguments.to_vec(),
        })
    }
}

/// A native violation at `path` with message template `template`.
pub fn native(path: Path, template: &str) -> ConstraintViolation {
    ConstraintViolation {
        message: String::new(),
        message_template: template.to_string(),
        path,
        root_type: "Entity01".to_string(),
        invalid_value: Value::Null,
        constraint: ConstraintDescriptor {
            kind: "NotEmpty".to_string(),
            message_template: template.to_string(),
            groups: vec![Group::DEFAULT],
            attributes: Map::new(),
        },
    }
}
