use crate::model::{OperationDescriptor, ParameterDescriptor};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// A pending call of an operation: its target and the parameter values
/// supplied so far.
#[derive(Clone, Debug)]
pub struct OperationInvocation {
    operation: Arc<OperationDescriptor>,
    target: Option<Value>,
    parameters: Vec<(Arc<ParameterDescriptor>, Value)>,
}

impl OperationInvocation {
    pub fn new(operation: Arc<OperationDescriptor>) -> Self {
        Self {
            operation,
            target: None,
            parameters: Vec::new(),
        }
    }

    /// Sets the instance the operation is invoked on.
    pub fn target<T: Serialize + ?Sized>(mut self, target: &T) -> Result<Self, serde_json::Error> {
        self.target = Some(serde_json::to_value(target)?);
        Ok(self)
    }

    /// Supplies a parameter value. Supplying the same parameter again
    /// replaces the earlier value.
    pub fn parameter<T: Serialize + ?Sized>(
        mut self,
        parameter: &Arc<ParameterDescriptor>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_value(value)?;
        self.parameters.retain(|(p, _)| !Arc::ptr_eq(p, parameter));
        self.parameters.push((parameter.clone(), value));
        Ok(self)
    }

    pub fn operation(&self) -> &Arc<OperationDescriptor> {
        &self.operation
    }

    pub fn target_value(&self) -> Option<&Value> {
        self.target.as_ref()
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&Arc<ParameterDescriptor>, &Value)> {
        self.parameters.iter().map(|(p, v)| (p, v))
    }

    /// Values laid out by parameter index, sized to the operation's
    /// parameter count. Unsupplied positions are `None`.
    pub fn positional_arguments(&self) -> Vec<Option<Value>> {
        let mut arguments = vec![None; self.operation.parameter_count()];
        for (parameter, value) in &self.parameters {
            if let Some(slot) = arguments.get_mut(parameter.index()) {
                *slot = Some(value.clone());
            }
        }
        arguments
    }
}
