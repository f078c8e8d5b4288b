//! Bidirectional slice codecs applied around serialization

use serde_json::Value;
use statevault_core::{VaultError, VaultResult};

/// A transform step: `(value, key) -> value`, fallible, with `Ok(None)` as
/// the explicit "do not persist / omit this value" signal.
pub type TransformFn = Box<dyn Fn(Value, &str) -> VaultResult<Option<Value>> + Send + Sync>;

/// A named bidirectional codec applied to a slice before write (`inbound`)
/// and after read (`outbound`), e.g. compression or encryption.
pub struct Transform {
    name: String,
    inbound: TransformFn,
    outbound: TransformFn,
}

impl Transform {
    pub fn new(name: impl Into<String>, inbound: TransformFn, outbound: TransformFn) -> Self {
        Self {
            name: name.into(),
            inbound,
            outbound,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform").field("name", &self.name).finish()
    }
}

/// An ordered transform pipeline.
///
/// Writes fold inbound functions in registration order; reads fold outbound
/// functions in exactly inverse order, which is what guarantees round-trip
/// correctness when each transform is a true inverse pair.
#[derive(Debug, Default)]
pub struct TransformPipeline {
    transforms: Vec<Transform>,
}

impl TransformPipeline {
    pub fn new(transforms: Vec<Transform>) -> Self {
        Self { transforms }
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Apply all inbound transforms in registration order.
    pub fn apply_write(&self, value: Value, key: &str) -> VaultResult<Option<Value>> {
        let mut current = value;
        for transform in &self.transforms {
            match run_step(&transform.inbound, &transform.name, current, key)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Apply all outbound transforms in reverse registration order.
    pub fn apply_read(&self, value: Value, key: &str) -> VaultResult<Option<Value>> {
        let mut current = value;
        for transform in self.transforms.iter().rev() {
            match run_step(&transform.outbound, &transform.name, current, key)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}

fn run_step(
    step: &TransformFn,
    name: &str,
    value: Value,
    key: &str,
) -> VaultResult<Option<Value>> {
    step(value, key).map_err(|e| match e {
        already @ VaultError::Transform { .. } => already,
        other => VaultError::Transform {
            name: name.to_string(),
            key: key.to_string(),
            detail: other.to_string(),
        },
    })
}
