//! Maps parameter-validation paths back to parameter descriptors.
//!
//! Parameter violations are located by `[method, parameter, ...]`. The first
//! node names the operation and is skipped; the second must be a parameter
//! node whose index names a declared parameter. Anything else (cross-parameter
//! or return-value nodes, truncated paths, out-of-range indices) has no
//! descriptor to map to.

use crate::engine::Path;
use crate::model::{OperationDescriptor, ParameterDescriptor};
use std::sync::Arc;

/// Resolves `path` to the parameter of `operation` it points at, or `None`
/// when the path cannot be represented by a parameter descriptor.
pub fn resolve_parameter(
    path: &Path,
    operation: &OperationDescriptor,
) -> Option<Arc<ParameterDescriptor>> {
    let mut nodes = path.iter();
    nodes.next()?;
    let index = nodes.next()?.parameter_index()?;
    operation.parameter(index).cloned()
}
