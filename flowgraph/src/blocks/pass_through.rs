use crate::block::{Block, BlockError, ProcessContext};

/// Runtime stand-in for block types loaded from manifests: copies the first
/// input to every output.
pub struct PassThroughBlock {
    name: String,
    type_name: String,
}

impl PassThroughBlock {
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
        }
    }
}

impl Block for PassThroughBlock {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        inputs: &[&[f32]],
        outputs: &mut [Vec<f32>],
    ) -> Result<(), BlockError> {
        let source = inputs.first().copied().unwrap_or(&[]);
        for out in outputs.iter_mut() {
            out.extend_from_slice(source);
        }
        Ok(())
    }
}
