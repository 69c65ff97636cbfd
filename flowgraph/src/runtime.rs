use crate::block::{Block, ProcessContext};
use crate::registry::{BlockRegistry, BlockType};
use crate::{order_blocks_for_execution, FlowgraphDefinition, FlowgraphError};
use std::collections::HashMap;
use std::sync::Arc;

struct Node {
    id: u64,
    block_type: Arc<BlockType>,
    block: Box<dyn Block>,
    /// Per input port: (node index, output port index) of the upstream block.
    sources: Vec<Option<(usize, usize)>>,
    outputs: Vec<Vec<f32>>,
}

/// Instantiated flowgraph, executed one tick at a time on the caller's thread.
pub struct Flowgraph {
    definition: FlowgraphDefinition,
    nodes: Vec<Node>,
    ctx: ProcessContext,
}

impl Flowgraph {
    pub fn empty() -> Self {
        Self {
            definition: FlowgraphDefinition::default(),
            nodes: Vec::new(),
            ctx: ProcessContext::default(),
        }
    }

    /// Validates `definition` and creates one block instance per definition,
    /// stored in execution order.
    pub fn new(
        definition: FlowgraphDefinition,
        registry: &BlockRegistry,
    ) -> Result<Self, FlowgraphError> {
        definition.validate(registry)?;

        let ordered = order_blocks_for_execution(&definition.blocks, &definition.connections);
        let mut nodes = Vec::with_capacity(ordered.len());
        for def in &ordered {
            let block_type =
                registry
                    .get(&def.type_name)
                    .ok_or_else(|| FlowgraphError::UnknownBlockType {
                        block: def.name.clone(),
                        type_name: def.type_name.clone(),
                    })?;
            let mut block = block_type.create_block(&def.name);
            block
                .configure(&def.parameters)
                .map_err(|source| FlowgraphError::Block {
                    name: def.name.clone(),
                    source,
                })?;
            nodes.push(Node {
                id: def.id,
                sources: vec![None; block_type.inputs.len()],
                outputs: vec![Vec::new(); block_type.outputs.len()],
                block_type,
                block,
            });
        }

        let index_of: HashMap<u64, usize> = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id, index))
            .collect();
        for conn in &definition.connections {
            let (Some(&from), Some(&to)) =
                (index_of.get(&conn.from_block), index_of.get(&conn.to_block))
            else {
                continue;
            };
            let from_port = nodes[from].block_type.output_index(&conn.from_port);
            let to_port = nodes[to].block_type.input_index(&conn.to_port);
            if let (Some(from_port), Some(to_port)) = (from_port, to_port) {
                nodes[to].sources[to_port] = Some((from, from_port));
            }
        }

        log::debug!("flowgraph instantiated with {} blocks", nodes.len());
        Ok(Self {
            definition,
            nodes,
            ctx: ProcessContext::default(),
        })
    }

    pub fn definition(&self) -> &FlowgraphDefinition {
        &self.definition
    }

    pub fn block_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn tick(&self) -> u64 {
        self.ctx.tick
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.ctx.sample_rate = sample_rate;
    }

    /// Block instances in execution order.
    pub fn blocks(&self) -> impl Iterator<Item = &dyn Block> {
        self.nodes.iter().map(|node| node.block.as_ref())
    }

    pub fn block(&self, name: &str) -> Option<&dyn Block> {
        self.blocks().find(|block| block.name() == name)
    }

    pub fn output(&self, block_id: u64, port: &str) -> Option<&[f32]> {
        let node = self.nodes.iter().find(|node| node.id == block_id)?;
        let index = node.block_type.output_index(port)?;
        node.outputs.get(index).map(Vec::as_slice)
    }

    /// Recorded samples of the sink-like block called `name`.
    pub fn history(&self, name: &str) -> Option<&[f32]> {
        self.block(name).and_then(|block| block.history())
    }

    /// Runs every block once in execution order.
    pub fn process(&mut self) -> Result<(), FlowgraphError> {
        for index in 0..self.nodes.len() {
            let (before, rest) = self.nodes.split_at_mut(index);
            let Some((node, after)) = rest.split_first_mut() else {
                break;
            };
            let inputs: Vec<&[f32]> = node
                .sources
                .iter()
                .map(|source| match *source {
                    Some((from, port)) if from < index => before[from].outputs[port].as_slice(),
                    Some((from, port)) if from > index => {
                        after[from - index - 1].outputs[port].as_slice()
                    }
                    _ => &[],
                })
                .collect();
            for out in node.outputs.iter_mut() {
                out.clear();
            }
            node.block
                .process(&self.ctx, &inputs, &mut node.outputs)
                .map_err(|source| FlowgraphError::Block {
                    name: node.block.name().to_string(),
                    source,
                })?;
        }
        self.ctx.tick += 1;
        Ok(())
    }
}

impl Default for Flowgraph {
    fn default() -> Self {
        Self::empty()
    }
}
