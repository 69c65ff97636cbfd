use crate::block::{parameter_usize, Block, BlockError, ProcessContext};
use crate::registry::BlockType;

const DEFAULT_CAPACITY: usize = 1024;

fn record(history: &mut Vec<f32>, capacity: usize, samples: &[f32]) {
    history.extend_from_slice(samples);
    if history.len() > capacity {
        let excess = history.len() - capacity;
        history.drain(..excess);
    }
}

/// Terminal block keeping the most recent `capacity` samples for plotting.
pub struct DataSink {
    name: String,
    capacity: usize,
    history: Vec<f32>,
}

impl DataSink {
    pub const TYPE_NAME: &'static str = "data sink";

    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            capacity: DEFAULT_CAPACITY,
            history: Vec::new(),
        }
    }

    pub fn block_type() -> BlockType {
        BlockType::new(Self::TYPE_NAME)
            .with_input("in", "float")
            .with_factory(|name, _| Box::new(DataSink::new(name)))
    }
}

impl Block for DataSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn configure(&mut self, parameters: &serde_json::Value) -> Result<(), BlockError> {
        self.capacity = parameter_usize(parameters, "capacity", DEFAULT_CAPACITY)?.max(1);
        Ok(())
    }

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        inputs: &[&[f32]],
        _outputs: &mut [Vec<f32>],
    ) -> Result<(), BlockError> {
        if let Some(samples) = inputs.first() {
            record(&mut self.history, self.capacity, samples);
        }
        Ok(())
    }

    fn history(&self) -> Option<&[f32]> {
        Some(&self.history)
    }
}

/// A sink that also re-exports what it records, so other blocks can consume
/// a signal that is shown on a dashboard.
pub struct DataSinkSource {
    name: String,
    capacity: usize,
    history: Vec<f32>,
}

impl DataSinkSource {
    pub const TYPE_NAME: &'static str = "data sink source";

    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            capacity: DEFAULT_CAPACITY,
            history: Vec::new(),
        }
    }

    pub fn block_type() -> BlockType {
        BlockType::new(Self::TYPE_NAME)
            .with_input("in", "float")
            .with_output("out", "float")
            .with_factory(|name, _| Box::new(DataSinkSource::new(name)))
    }
}

impl Block for DataSinkSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn configure(&mut self, parameters: &serde_json::Value) -> Result<(), BlockError> {
        self.capacity = parameter_usize(parameters, "capacity", DEFAULT_CAPACITY)?.max(1);
        Ok(())
    }

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        inputs: &[&[f32]],
        outputs: &mut [Vec<f32>],
    ) -> Result<(), BlockError> {
        let samples = inputs.first().copied().unwrap_or(&[]);
        record(&mut self.history, self.capacity, samples);
        if let Some(out) = outputs.first_mut() {
            out.extend_from_slice(samples);
        }
        Ok(())
    }

    fn history(&self) -> Option<&[f32]> {
        Some(&self.history)
    }
}
