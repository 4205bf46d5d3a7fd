//! Descriptor model consumed by the validator.
//!
//! Descriptors are shared through [`Arc`]; two descriptors are the same
//! descriptor only when they are the same allocation. Qualifier variants of
//! an entity carry their own property descriptors.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

// ─── Groups and capabilities ────────────────────────────────────────────────

/// A validation group marker.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group(Cow<'static, str>);

impl Group {
    /// The engine's default group.
    pub const DEFAULT: Group = Group(Cow::Borrowed("Default"));

    pub fn new(name: impl Into<String>) -> Self {
        Group(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT.0
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Qualifier context: the groups to validate with instead of the default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QualifierSelected {
    groups: Vec<Group>,
}

impl QualifierSelected {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    pub fn qualifier(&self) -> &[Group] {
        &self.groups
    }
}

/// Optional capabilities a descriptor may expose.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Capability {
    QualifierSelected(QualifierSelected),
}

impl Capability {
    pub fn kind(&self) -> CapabilityKind {
        match self {
            Capability::QualifierSelected(_) => CapabilityKind::QualifierSelected,
        }
    }
}

/// Discriminant of [`Capability`], used for probing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    QualifierSelected,
}

/// Capability lookup shared by entity and property descriptors.
pub trait Adaptable {
    fn capabilities(&self) -> &[Capability];

    /// Whether the descriptor currently exposes `kind`.
    fn supports(&self, kind: CapabilityKind) -> bool {
        self.capabilities().iter().any(|c| c.kind() == kind)
    }

    /// Adapts the descriptor to its qualifier context, if it has one.
    fn qualifier_selected(&self) -> Option<&QualifierSelected> {
        self.capabilities().iter().find_map(|c| match c {
            Capability::QualifierSelected(q) => Some(q),
        })
    }
}

// ─── Properties ─────────────────────────────────────────────────────────────

/// A named property of an entity type.
#[derive(Clone, Debug)]
pub struct PropertyDescriptor {
    name: String,
    value_type: String,
    entity_type: String,
    capabilities: Vec<Capability>,
}

impl PropertyDescriptor {
    pub fn new(
        name: impl Into<String>,
        value_type: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value_type: value_type.into(),
            entity_type: entity_type.into(),
            capabilities: Vec::new(),
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    /// Type name of the entity that owns this property.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }
}

impl Adaptable for PropertyDescriptor {
    fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }
}

// ─── Operations ─────────────────────────────────────────────────────────────

/// An indexed parameter of an operation.
#[derive(Clone, Debug)]
pub struct ParameterDescriptor {
    index: usize,
    name: String,
    value_type: String,
}

impl ParameterDescriptor {
    pub fn new(index: usize, name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            value_type: value_type.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &str {
        &self.value_type
    }
}

/// Engine-facing handle to an operation: owning type plus operation name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationRef {
    pub entity_type: String,
    pub name: String,
}

/// An operation declared on an entity.
#[derive(Clone, Debug)]
pub struct OperationDescriptor {
    reference: OperationRef,
    parameters: Vec<Arc<ParameterDescriptor>>,
}

impl OperationDescriptor {
    /// Creates an operation; parameters are indexed in the order given.
    pub fn new<I, N, T>(
        entity_type: impl Into<String>,
        name: impl Into<String>,
        parameters: I,
    ) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        let parameters = parameters
            .into_iter()
            .enumerate()
            .map(|(index, (name, value_type))| {
                Arc::new(ParameterDescriptor::new(index, name, value_type))
            })
            .collect();
        Self {
            reference: OperationRef {
                entity_type: entity_type.into(),
                name: name.into(),
            },
            parameters,
        }
    }

    pub fn name(&self) -> &str {
        &self.reference.name
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn parameter(&self, index: usize) -> Option<&Arc<ParameterDescriptor>> {
        self.parameters.get(index)
    }

    pub fn parameters(&self) -> &[Arc<ParameterDescriptor>] {
        &self.parameters
    }

    pub fn operation_reference(&self) -> &OperationRef {
        &self.reference
    }
}

// ─── Entities ───────────────────────────────────────────────────────────────

/// An entity type with its properties and operations.
#[derive(Debug)]
pub struct EntityDescriptor {
    entity_type: String,
    properties: Vec<Arc<PropertyDescriptor>>,
    operations: Vec<Arc<OperationDescriptor>>,
    capabilities: Vec<Capability>,
    qualified: Vec<(Group, Arc<EntityDescriptor>)>,
}

impl EntityDescriptor {
    pub fn builder(entity_type: impl Into<String>) -> EntityDescriptorBuilder {
        EntityDescriptorBuilder {
            entity_type: entity_type.into(),
            properties: Vec::new(),
            operations: Vec::new(),
            qualifiers: Vec::new(),
        }
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Looks up a property by name. Embedded properties use their
    /// flattened name, e.g. `embedded.checkItem`.
    pub fn property(&self, name: &str) -> Option<&Arc<PropertyDescriptor>> {
        self.properties.iter().find(|p| p.name() == name)
    }

    pub fn properties(&self) -> &[Arc<PropertyDescriptor>] {
        &self.properties
    }

    pub fn operation(&self, name: &str) -> Option<&Arc<OperationDescriptor>> {
        self.operations.iter().find(|o| o.name() == name)
    }

    /// The variant of this entity bound to `qualifier`, if declared.
    pub fn qualifier_entity(&self, qualifier: &Group) -> Option<&Arc<EntityDescriptor>> {
        self.qualified
            .iter()
            .find(|(group, _)| group == qualifier)
            .map(|(_, entity)| entity)
    }
}

impl Adaptable for EntityDescriptor {
    fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }
}

/// Builder for [`EntityDescriptor`].
pub struct EntityDescriptorBuilder {
    entity_type: String,
    properties: Vec<(String, String)>,
    operations: Vec<OperationDescriptor>,
    qualifiers: Vec<Group>,
}

impl EntityDescriptorBuilder {
    pub fn property(mut self, name: impl Into<String>, value_type: impl Into<String>) -> Self {
        self.properties.push((name.into(), value_type.into()));
        self
    }

    pub fn operation<I, N, T>(mut self, name: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        let op = OperationDescriptor::new(self.entity_type.clone(), name, parameters);
        self.operations.push(op);
        self
    }

    /// Declares a qualifier variant of the entity.
    pub fn qualifier(mut self, group: Group) -> Self {
        self.qualifiers.push(group);
        self
    }

    pub fn build(self) -> Arc<EntityDescriptor> {
        let operations: Vec<Arc<OperationDescriptor>> =
            self.operations.into_iter().map(Arc::new).collect();

        let qualified = self
            .qualifiers
            .iter()
            .map(|group| {
                let selected =
                    Capability::QualifierSelected(QualifierSelected::new(vec![group.clone()]));
                let variant = EntityDescriptor {
                    entity_type: self.entity_type.clone(),
                    properties: self
                        .properties
                        .iter()
                        .map(|(name, value_type)| {
                            Arc::new(
                                PropertyDescriptor::new(name, value_type, &self.entity_type)
                                    .with_capability(selected.clone()),
                            )
                        })
                        .collect(),
                    operations: operations.clone(),
                    capabilities: vec![selected],
                    qualified: Vec::new(),
                };
                (group.clone(), Arc::new(variant))
            })
            .collect();

        let properties = self
            .properties
            .iter()
            .map(|(name, value_type)| {
                Arc::new(PropertyDescriptor::new(name, value_type, &self.entity_type))
            })
            .collect();

        Arc::new(EntityDescriptor {
            entity_type: self.entity_type,
            properties,
            operations,
            capabilities: Vec::new(),
            qualified,
        })
    }
}
