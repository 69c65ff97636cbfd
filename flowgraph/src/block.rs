use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl PortDefinition {
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProcessContext {
    pub tick: u64,
    pub sample_rate: f64,
}

impl Default for ProcessContext {
    fn default() -> Self {
        Self {
            tick: 0,
            sample_rate: 1000.0,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum BlockError {
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error("{0}")]
    Process(String),
}

/// A runtime flowgraph node.
///
/// `inputs` holds one slice per declared input port, in declaration order;
/// unconnected inputs are empty. `outputs` holds one buffer per declared output
/// port and is cleared by the executor before every call.
pub trait Block: Send {
    fn name(&self) -> &str;

    fn type_name(&self) -> &str;

    fn configure(&mut self, _parameters: &serde_json::Value) -> Result<(), BlockError> {
        Ok(())
    }

    fn process(
        &mut self,
        ctx: &ProcessContext,
        inputs: &[&[f32]],
        outputs: &mut [Vec<f32>],
    ) -> Result<(), BlockError>;

    /// Samples recorded by sink-like blocks, oldest first.
    fn history(&self) -> Option<&[f32]> {
        None
    }
}

pub(crate) fn parameter_f64(
    parameters: &serde_json::Value,
    name: &str,
    default: f64,
) -> Result<f64, BlockError> {
    match parameters.get(name) {
        None | Some(serde_json::Value::Null) => Ok(default),
        Some(value) => value.as_f64().ok_or_else(|| BlockError::InvalidParameter {
            name: name.to_string(),
            reason: "expected a number".to_string(),
        }),
    }
}

pub(crate) fn parameter_usize(
    parameters: &serde_json::Value,
    name: &str,
    default: usize,
) -> Result<usize, BlockError> {
    match parameters.get(name) {
        None | Some(serde_json::Value::Null) => Ok(default),
        Some(value) => value
            .as_u64()
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| BlockError::InvalidParameter {
                name: name.to_string(),
                reason: "expected a non-negative integer".to_string(),
            }),
    }
}
