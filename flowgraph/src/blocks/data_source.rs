use crate::block::{parameter_f64, parameter_usize, Block, BlockError, ProcessContext};
use crate::registry::BlockType;
use std::f64::consts::TAU;

/// Largest number of samples a source may emit per tick.
pub const MAX_CHUNK: usize = 65_536;

/// Sine generator producing `chunk` samples per tick.
///
/// Parameters: `frequency` (Hz, default 1.0), `amplitude` (default 1.0),
/// `chunk` (default 16, at most [`MAX_CHUNK`]). Phase is continuous across ticks.
pub struct DataSource {
    name: String,
    frequency: f64,
    amplitude: f64,
    chunk: usize,
    sample_index: u64,
}

impl DataSource {
    pub const TYPE_NAME: &'static str = "data source";

    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            frequency: 1.0,
            amplitude: 1.0,
            chunk: 16,
            sample_index: 0,
        }
    }

    pub fn block_type() -> BlockType {
        BlockType::new(Self::TYPE_NAME)
            .with_output("out", "float")
            .with_factory(|name, _| Box::new(DataSource::new(name)))
    }
}

impl Block for DataSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn configure(&mut self, parameters: &serde_json::Value) -> Result<(), BlockError> {
        let frequency = parameter_f64(parameters, "frequency", 1.0)?;
        if !frequency.is_finite() || frequency < 0.0 {
            return Err(BlockError::InvalidParameter {
                name: "frequency".to_string(),
                reason: "must be a finite, non-negative number".to_string(),
            });
        }
        self.frequency = frequency;
        self.amplitude = parameter_f64(parameters, "amplitude", 1.0)?;
        let chunk = parameter_usize(parameters, "chunk", 16)?;
        if chunk > MAX_CHUNK {
            return Err(BlockError::InvalidParameter {
                name: "chunk".to_string(),
                reason: format!("must not exceed {MAX_CHUNK} samples"),
            });
        }
        self.chunk = chunk;
        Ok(())
    }

    fn process(
        &mut self,
        ctx: &ProcessContext,
        _inputs: &[&[f32]],
        outputs: &mut [Vec<f32>],
    ) -> Result<(), BlockError> {
        let Some(out) = outputs.first_mut() else {
            return Ok(());
        };
        let sample_rate = if ctx.sample_rate > 0.0 {
            ctx.sample_rate
        } else {
            return Err(BlockError::Process(
                "sample rate must be positive".to_string(),
            ));
        };
        out.reserve(self.chunk);
        for _ in 0..self.chunk {
            let t = self.sample_index as f64 / sample_rate;
            out.push((self.amplitude * (TAU * self.frequency * t).sin()) as f32);
            self.sample_index += 1;
        }
        Ok(())
    }
}
