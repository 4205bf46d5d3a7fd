//! Constraint kinds and declarations for the reference engine.
//!
//! Null handling follows bean validation: only `NotNull`, `NotEmpty` and
//! `NotBlank` reject `null`; every other kind treats it as valid.

use super::ConstraintDescriptor;
use crate::error::EngineError;
use crate::model::Group;
use regex::Regex;
use serde_json::{Map, Number, Value, json};
use std::cmp::Ordering;
use std::collections::HashMap;

/// The built-in constraint kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstraintKind {
    NotNull,
    NotEmpty,
    NotBlank,
    AssertTrue,
    AssertFalse,
    Size { min: usize, max: usize },
    Min(i64),
    Max(i64),
    /// Full-match regular expression.
    Pattern(String),
}

impl ConstraintKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintKind::NotNull => "NotNull",
            ConstraintKind::NotEmpty => "NotEmpty",
            ConstraintKind::NotBlank => "NotBlank",
            ConstraintKind::AssertTrue => "AssertTrue",
            ConstraintKind::AssertFalse => "AssertFalse",
            ConstraintKind::Size { .. } => "Size",
            ConstraintKind::Min(_) => "Min",
            ConstraintKind::Max(_) => "Max",
            ConstraintKind::Pattern(_) => "Pattern",
        }
    }

    /// Catalog reference used when a declaration has no explicit message.
    pub fn default_message(&self) -> String {
        format!("{{constraints.{}.message}}", self.name())
    }

    pub fn attributes(&self) -> Map<String, Value> {
        let mut attrs = Map::new();
        match self {
            ConstraintKind::Size { min, max } => {
                attrs.insert("min".to_string(), json!(min));
                attrs.insert("max".to_string(), json!(max));
            }
            ConstraintKind::Min(v) | ConstraintKind::Max(v) => {
                attrs.insert("value".to_string(), json!(v));
            }
            ConstraintKind::Pattern(p) => {
                attrs.insert("regexp".to_string(), json!(p));
            }
            _ => {}
        }
        attrs
    }

    /// Checks `value`. Applying a kind to a JSON type it does not support
    /// is an engine error, not a violation.
    ///
    /// A `Pattern` is compiled on every call; [`ConstraintDeclaration`]
    /// compiles it once.
    pub fn is_valid(&self, value: &Value) -> Result<bool, EngineError> {
        let pattern = self.compile().map_err(|e| self.invalid_pattern(&e))?;
        self.check(value, pattern.as_ref())
    }

    fn compile(&self) -> Result<Option<Regex>, regex::Error> {
        match self {
            ConstraintKind::Pattern(pattern) => Regex::new(&format!("^(?:{})$", pattern)).map(Some),
            _ => Ok(None),
        }
    }

    fn invalid_pattern(&self, error: &regex::Error) -> EngineError {
        EngineError::invalid_constraint(self.name(), error.to_string())
    }

    fn check(&self, value: &Value, pattern: Option<&Regex>) -> Result<bool, EngineError> {
        match self {
            ConstraintKind::NotNull => Ok(!value.is_null()),
            ConstraintKind::NotEmpty => match value {
                Value::Null => Ok(false),
                _ => Ok(self.length(value)? > 0),
            },
            ConstraintKind::NotBlank => match value {
                Value::Null => Ok(false),
                Value::String(s) => Ok(!s.trim().is_empty()),
                other => Err(self.unsupported(other)),
            },
            ConstraintKind::AssertTrue | ConstraintKind::AssertFalse => match value {
                Value::Null => Ok(true),
                Value::Bool(b) => Ok(*b == matches!(self, ConstraintKind::AssertTrue)),
                other => Err(self.unsupported(other)),
            },
            ConstraintKind::Size { min, max } => match value {
                Value::Null => Ok(true),
                _ => {
                    let len = self.length(value)?;
                    Ok(len >= *min && len <= *max)
                }
            },
            ConstraintKind::Min(bound) => match value {
                Value::Null => Ok(true),
                Value::Number(n) => {
                    Ok(compare_to_bound(n, *bound).is_some_and(|o| o != Ordering::Less))
                }
                other => Err(self.unsupported(other)),
            },
            ConstraintKind::Max(bound) => match value {
                Value::Null => Ok(true),
                Value::Number(n) => {
                    Ok(compare_to_bound(n, *bound).is_some_and(|o| o != Ordering::Greater))
                }
                other => Err(self.unsupported(other)),
            },
            ConstraintKind::Pattern(_) => match (value, pattern) {
                (Value::Null, _) => Ok(true),
                (Value::String(s), Some(re)) => Ok(re.is_match(s)),
                (Value::String(_), None) => {
                    Err(EngineError::invalid_constraint(self.name(), "expression not compiled"))
                }
                (other, _) => Err(self.unsupported(other)),
            },
        }
    }

    fn length(&self, value: &Value) -> Result<usize, EngineError> {
        match value {
            Value::String(s) => Ok(s.chars().count()),
            Value::Array(a) => Ok(a.len()),
            Value::Object(o) => Ok(o.len()),
            other => Err(self.unsupported(other)),
        }
    }

    fn unsupported(&self, value: &Value) -> EngineError {
        let json_type = match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };
        EngineError::invalid_constraint(self.name(), format!("not applicable to {}", json_type))
    }
}

/// Orders a JSON number against an integer bound. Integers are compared
/// exactly; floats by their whole part, then their fraction.
fn compare_to_bound(n: &Number, bound: i64) -> Option<Ordering> {
    if let Some(i) = n.as_i64() {
        return Some(i.cmp(&bound));
    }
    if n.is_u64() {
        // Above i64::MAX.
        return Some(Ordering::Greater);
    }
    let f = n.as_f64()?;
    if f.is_nan() {
        return None;
    }
    // i64 spans [-2^63, 2^63).
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f >= LIMIT {
        return Some(Ordering::Greater);
    }
    if f < -LIMIT {
        return Some(Ordering::Less);
    }
    let whole = f.trunc();
    match (whole as i64).cmp(&bound) {
        Ordering::Equal => (f - whole).partial_cmp(&0.0),
        other => Some(other),
    }
}

/// A constraint declared on a property or parameter.
#[derive(Clone, Debug)]
pub struct ConstraintDeclaration {
    kind: ConstraintKind,
    groups: Vec<Group>,
    message: Option<String>,
    /// `Pattern` expression compiled once, or why it failed to compile.
    pattern: Result<Option<Regex>, regex::Error>,
}

impl ConstraintDeclaration {
    /// Declares `kind`. An invalid `Pattern` expression is reported by every
    /// check of this declaration; use [`try_new`](Self::try_new) to reject it
    /// up front.
    pub fn new(kind: ConstraintKind) -> Self {
        let pattern = kind.compile();
        Self {
            kind,
            groups: Vec::new(),
            message: None,
            pattern,
        }
    }

    /// Like [`new`](Self::new), failing on an invalid `Pattern` expression.
    pub fn try_new(kind: ConstraintKind) -> Result<Self, EngineError> {
        let declaration = Self::new(kind);
        if let Err(e) = &declaration.pattern {
            return Err(declaration.kind.invalid_pattern(e));
        }
        Ok(declaration)
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    /// Checks `value` with the precompiled expression.
    pub fn is_valid(&self, value: &Value) -> Result<bool, EngineError> {
        let pattern = self.pattern.as_ref().map_err(|e| self.kind.invalid_pattern(e))?;
        self.kind.check(value, pattern.as_ref())
    }

    pub fn in_groups(mut self, groups: impl IntoIterator<Item = Group>) -> Self {
        self.groups.extend(groups);
        self
    }

    pub fn message(mut self, template: impl Into<String>) -> Self {
        self.message = Some(template.into());
        self
    }

    /// Declared groups; a declaration without groups is in the default group.
    pub fn groups(&self) -> Vec<Group> {
        if self.groups.is_empty() {
            vec![Group::DEFAULT]
        } else {
            self.groups.clone()
        }
    }

    pub fn applies_to(&self, requested: &[Group]) -> bool {
        let declared = self.groups();
        requested.iter().any(|g| declared.contains(g))
    }

    pub fn message_template(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| self.kind.default_message())
    }

    pub fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            kind: self.kind.name().to_string(),
            message_template: self.message_template(),
            groups: self.groups(),
            attributes: self.kind.attributes(),
        }
    }
}

impl From<ConstraintKind> for ConstraintDeclaration {
    fn from(kind: ConstraintKind) -> Self {
        ConstraintDeclaration::new(kind)
    }
}

// ─── Registry ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub(crate) struct PropertyConstraints {
    pub name: String,
    pub constraints: Vec<ConstraintDeclaration>,
    /// Entity type to cascade into, for embedded objects.
    pub cascade: Option<String>,
}

#[derive(Clone, Debug)]
pub(crate) struct ParameterConstraints {
    pub name: String,
    pub constraints: Vec<ConstraintDeclaration>,
}

/// Parameter constraints of one operation.
#[derive(Clone, Debug)]
pub struct OperationConstraints {
    pub(crate) name: String,
    pub(crate) parameters: Vec<ParameterConstraints>,
}

impl OperationConstraints {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    /// Appends the next positional parameter.
    pub fn parameter<I, C>(mut self, name: impl Into<String>, constraints: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ConstraintDeclaration>,
    {
        self.parameters.push(ParameterConstraints {
            name: name.into(),
            constraints: constraints.into_iter().map(Into::into).collect(),
        });
        self
    }
}

/// Constraints of one entity type.
#[derive(Clone, Debug)]
pub struct EntityConstraints {
    pub(crate) entity_type: String,
    pub(crate) properties: Vec<PropertyConstraints>,
    pub(crate) operations: HashMap<String, OperationConstraints>,
}

impl EntityConstraints {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            properties: Vec::new(),
            operations: HashMap::new(),
        }
    }

    /// Declares a property. Properties without constraints are still known
    /// to the engine.
    pub fn property<I, C>(mut self, name: impl Into<String>, constraints: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ConstraintDeclaration>,
    {
        let name = name.into();
        let constraints = constraints.into_iter().map(Into::into);
        match self.properties.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.constraints.extend(constraints),
            None => self.properties.push(PropertyConstraints {
                name,
                constraints: constraints.collect(),
                cascade: None,
            }),
        }
        self
    }

    pub fn unconstrained(self, name: impl Into<String>) -> Self {
        self.property(name, Vec::<ConstraintDeclaration>::new())
    }

    /// Marks `name` as an embedded object validated as `entity_type`.
    pub fn cascade(mut self, name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        let name = name.into();
        let entity_type = entity_type.into();
        match self.properties.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.cascade = Some(entity_type),
            None => self.properties.push(PropertyConstraints {
                name,
                constraints: Vec::new(),
                cascade: Some(entity_type),
            }),
        }
        self
    }

    pub fn operation(mut self, operation: OperationConstraints) -> Self {
        self.operations.insert(operation.name.clone(), operation);
        self
    }

    pub(crate) fn find_property(&self, name: &str) -> Option<&PropertyConstraints> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// All constraints known to a reference engine. Immutable once built.
#[derive(Clone, Debug, Default)]
pub struct ConstraintRegistry {
    entities: HashMap<String, EntityConstraints>,
}

impl ConstraintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, entity: EntityConstraints) -> Self {
        self.entities.insert(entity.entity_type.clone(), entity);
        self
    }

    pub fn entity(&self, entity_type: &str) -> Option<&EntityConstraints> {
        self.entities.get(entity_type)
    }
}
