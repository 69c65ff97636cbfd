use crate::block::{Block, PortDefinition};
use crate::blocks::{DataSink, DataSinkSource, DataSource, FftBlock, PassThroughBlock, SumBlock};
use crate::FlowgraphError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Builds a runtime block from an instance name and the type it belongs to.
pub type BlockFactory = Arc<dyn Fn(&str, &BlockType) -> Box<dyn Block> + Send + Sync>;

pub struct BlockType {
    pub name: String,
    pub inputs: Vec<PortDefinition>,
    pub outputs: Vec<PortDefinition>,
    factory: BlockFactory,
}

impl fmt::Debug for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockType")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

impl BlockType {
    /// A type with no ports whose instances forward their first input.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            factory: Arc::new(pass_through_factory),
        }
    }

    pub fn with_input(mut self, name: &str, type_name: &str) -> Self {
        self.inputs.push(PortDefinition::new(name, type_name));
        self
    }

    pub fn with_output(mut self, name: &str, type_name: &str) -> Self {
        self.outputs.push(PortDefinition::new(name, type_name));
        self
    }

    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str, &BlockType) -> Box<dyn Block> + Send + Sync + 'static,
    {
        self.factory = Arc::new(factory);
        self
    }

    pub fn create_block(&self, name: &str) -> Box<dyn Block> {
        (self.factory)(name, self)
    }

    pub fn input_index(&self, port: &str) -> Option<usize> {
        self.inputs.iter().position(|p| p.name == port)
    }

    pub fn output_index(&self, port: &str) -> Option<usize> {
        self.outputs.iter().position(|p| p.name == port)
    }
}

fn pass_through_factory(name: &str, block_type: &BlockType) -> Box<dyn Block> {
    Box::new(PassThroughBlock::new(name, &block_type.name))
}

/// On-disk description of a block type; instances are pass-through blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockTypeManifest {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<PortDefinition>,
    #[serde(default)]
    pub outputs: Vec<PortDefinition>,
}

impl From<BlockTypeManifest> for BlockType {
    fn from(manifest: BlockTypeManifest) -> Self {
        let mut block_type = BlockType::new(&manifest.name);
        block_type.inputs = manifest.inputs;
        block_type.outputs = manifest.outputs;
        block_type
    }
}

#[derive(Debug, Default)]
pub struct BlockRegistry {
    types: BTreeMap<String, Arc<BlockType>>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the blocks every build of the application ships with.
    pub fn with_builtin_blocks() -> Self {
        let mut registry = Self::new();
        registry.add_block_type(DataSource::block_type());
        registry.add_block_type(DataSink::block_type());
        registry.add_block_type(DataSinkSource::block_type());
        registry.add_block_type(
            BlockType::new(SumBlock::TYPE_NAME)
                .with_input("in1", "float")
                .with_input("in2", "float")
                .with_output("out", "float")
                .with_factory(|name, block_type| {
                    Box::new(SumBlock::new(name, &block_type.name))
                }),
        );
        registry.add_block_type(
            BlockType::new(FftBlock::TYPE_NAME)
                .with_input("in1", "float")
                .with_output("out", "float")
                .with_factory(|name, block_type| {
                    Box::new(FftBlock::new(name, &block_type.name))
                }),
        );
        registry
    }

    /// Registers `block_type`, replacing any type with the same name.
    pub fn add_block_type(&mut self, block_type: BlockType) {
        let name = block_type.name.clone();
        if self
            .types
            .insert(name.clone(), Arc::new(block_type))
            .is_some()
        {
            log::debug!("block type '{name}' re-registered");
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<BlockType>> {
        self.types.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn types(&self) -> impl Iterator<Item = &Arc<BlockType>> {
        self.types.values()
    }

    /// Registers every `*.json` block manifest in `dir`.
    ///
    /// Files that fail to parse are skipped with a warning; the count of
    /// registered types is returned.
    pub fn load_block_definitions(&mut self, dir: &Path) -> Result<usize, FlowgraphError> {
        let mut loaded = 0;
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect();
        paths.sort();
        for path in paths {
            let manifest = std::fs::read(&path)
                .map_err(FlowgraphError::from)
                .and_then(|data| {
                    serde_json::from_slice::<BlockTypeManifest>(&data).map_err(FlowgraphError::from)
                });
            match manifest {
                Ok(manifest) => {
                    self.add_block_type(manifest.into());
                    loaded += 1;
                }
                Err(err) => {
                    log::warn!("skipping block definition {}: {err}", path.display());
                }
            }
        }
        Ok(loaded)
    }
}
