use crate::block::{Block, BlockError, ProcessContext};

/// Adds two signals sample by sample; a shorter or missing input counts as zero.
pub struct SumBlock {
    name: String,
    type_name: String,
}

impl SumBlock {
    pub const TYPE_NAME: &'static str = "sum sigs";

    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
        }
    }
}

impl Block for SumBlock {
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
        let Some(out) = outputs.first_mut() else {
            return Ok(());
        };
        let len = inputs.iter().map(|input| input.len()).max().unwrap_or(0);
        out.resize(len, 0.0);
        for input in inputs {
            for (acc, value) in out.iter_mut().zip(input.iter()) {
                *acc += value;
            }
        }
        Ok(())
    }
}
