use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub mod block;
pub mod blocks;
pub mod execution;
pub mod registry;
pub mod runtime;

pub use block::{Block, BlockError, PortDefinition, ProcessContext};
pub use execution::order_blocks_for_execution;
pub use registry::{BlockFactory, BlockRegistry, BlockType, BlockTypeManifest};
pub use runtime::Flowgraph;

/// Every input port accepts a single upstream connection.
pub const MAX_CONNECTIONS_PER_INPUT: usize = 1;

/// Serialized form of a dashboard file: a flowgraph plus the plots laid out over it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub flowgraph: FlowgraphDefinition,
    #[serde(default)]
    pub plots: Vec<PlotDefinition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlowgraphDefinition {
    #[serde(default)]
    pub blocks: Vec<BlockDefinition>,
    #[serde(default)]
    pub connections: Vec<ConnectionDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockDefinition {
    pub id: u64,
    #[serde(rename = "type")]
    pub type_name: String,
    pub name: String,
    #[serde(default)]
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionDefinition {
    pub from_block: u64,
    pub from_port: String,
    pub to_block: u64,
    pub to_port: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlotDefinition {
    pub name: String,
    /// Names of the sink blocks drawn on this plot.
    #[serde(default)]
    pub sinks: Vec<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum FlowgraphError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("block '{block}' has unknown type '{type_name}'")]
    UnknownBlockType { block: String, type_name: String },
    #[error("duplicate block id {0}")]
    DuplicateBlockId(u64),
    #[error("no block with id {0}")]
    MissingBlock(u64),
    #[error("block '{block}' has no port '{port}'")]
    UnknownPort { block: String, port: String },
    #[error("port type mismatch: '{from}' cannot feed '{to}'")]
    PortTypeMismatch { from: String, to: String },
    #[error("invalid connection: {0}")]
    Connection(#[from] ConnectionRuleError),
    #[error("block '{name}' failed: {source}")]
    Block {
        name: String,
        #[source]
        source: BlockError,
    },
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConnectionRuleError {
    #[error("self connections are not allowed")]
    SelfConnection,
    #[error("input already has max connections")]
    InputLimitExceeded,
    #[error("connection between these blocks already exists")]
    DuplicateConnection,
}

pub fn validate_connection(
    connections: &[ConnectionDefinition],
    from_block: u64,
    to_block: u64,
    to_port: &str,
    max_per_input: usize,
) -> Result<(), ConnectionRuleError> {
    if from_block == to_block {
        return Err(ConnectionRuleError::SelfConnection);
    }
    let existing_count = connections
        .iter()
        .filter(|conn| conn.to_block == to_block && conn.to_port == to_port)
        .count();
    if existing_count >= max_per_input {
        return Err(ConnectionRuleError::InputLimitExceeded);
    }
    Ok(())
}

pub fn add_connection(
    connections: &mut Vec<ConnectionDefinition>,
    connection: ConnectionDefinition,
    max_per_input: usize,
) -> Result<(), ConnectionRuleError> {
    validate_connection(
        connections,
        connection.from_block,
        connection.to_block,
        &connection.to_port,
        max_per_input,
    )?;

    // The same output may not feed two inputs of one downstream block.
    if connections.iter().any(|conn| {
        conn.from_block == connection.from_block
            && conn.from_port == connection.from_port
            && conn.to_block == connection.to_block
    }) {
        return Err(ConnectionRuleError::DuplicateConnection);
    }

    connections.push(connection);
    Ok(())
}

impl FlowgraphDefinition {
    pub fn block(&self, id: u64) -> Option<&BlockDefinition> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn block_by_name(&self, name: &str) -> Option<&BlockDefinition> {
        self.blocks.iter().find(|block| block.name == name)
    }

    pub fn next_block_id(&self) -> u64 {
        self.blocks.iter().map(|b| b.id).max().map_or(1, |max| max + 1)
    }

    pub fn add_block(
        &mut self,
        type_name: &str,
        name: &str,
        parameters: serde_json::Value,
    ) -> u64 {
        let id = self.next_block_id();
        self.blocks.push(BlockDefinition {
            id,
            type_name: type_name.to_string(),
            name: name.to_string(),
            parameters,
        });
        id
    }

    /// Removes the block and every connection touching it.
    pub fn remove_block(&mut self, id: u64) -> Option<BlockDefinition> {
        let index = self.blocks.iter().position(|block| block.id == id)?;
        self.connections
            .retain(|conn| conn.from_block != id && conn.to_block != id);
        Some(self.blocks.remove(index))
    }

    pub fn connect(
        &mut self,
        registry: &BlockRegistry,
        connection: ConnectionDefinition,
    ) -> Result<(), FlowgraphError> {
        self.check_connection_ports(registry, &connection)?;
        add_connection(
            &mut self.connections,
            connection,
            MAX_CONNECTIONS_PER_INPUT,
        )?;
        Ok(())
    }

    /// Checks block ids, block types, ports and connection rules against `registry`.
    pub fn validate(&self, registry: &BlockRegistry) -> Result<(), FlowgraphError> {
        let mut ids = HashSet::new();
        for block in &self.blocks {
            if !ids.insert(block.id) {
                return Err(FlowgraphError::DuplicateBlockId(block.id));
            }
            if registry.get(&block.type_name).is_none() {
                return Err(FlowgraphError::UnknownBlockType {
                    block: block.name.clone(),
                    type_name: block.type_name.clone(),
                });
            }
        }

        let mut accepted: Vec<ConnectionDefinition> = Vec::with_capacity(self.connections.len());
        for connection in &self.connections {
            self.check_connection_ports(registry, connection)?;
            add_connection(
                &mut accepted,
                connection.clone(),
                MAX_CONNECTIONS_PER_INPUT,
            )?;
        }
        Ok(())
    }

    fn check_connection_ports(
        &self,
        registry: &BlockRegistry,
        connection: &ConnectionDefinition,
    ) -> Result<(), FlowgraphError> {
        let from = self
            .block(connection.from_block)
            .ok_or(FlowgraphError::MissingBlock(connection.from_block))?;
        let to = self
            .block(connection.to_block)
            .ok_or(FlowgraphError::MissingBlock(connection.to_block))?;
        let from_port = port_of(registry, from, &connection.from_port, false)?;
        let to_port = port_of(registry, to, &connection.to_port, true)?;
        if from_port.type_name != to_port.type_name {
            return Err(FlowgraphError::PortTypeMismatch {
                from: format!("{}.{} ({})", from.name, from_port.name, from_port.type_name),
                to: format!("{}.{} ({})", to.name, to_port.name, to_port.type_name),
            });
        }
        Ok(())
    }
}

fn port_of(
    registry: &BlockRegistry,
    block: &BlockDefinition,
    port: &str,
    input: bool,
) -> Result<PortDefinition, FlowgraphError> {
    let block_type =
        registry
            .get(&block.type_name)
            .ok_or_else(|| FlowgraphError::UnknownBlockType {
                block: block.name.clone(),
                type_name: block.type_name.clone(),
            })?;
    let ports = if input {
        &block_type.inputs
    } else {
        &block_type.outputs
    };
    ports
        .iter()
        .find(|p| p.name == port)
        .cloned()
        .ok_or_else(|| FlowgraphError::UnknownPort {
            block: block.name.clone(),
            port: port.to_string(),
        })
}

impl DashboardDefinition {
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            flowgraph: FlowgraphDefinition::default(),
            plots: Vec::new(),
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), FlowgraphError> {
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, FlowgraphError> {
        let data = fs::read(path)?;
        let definition = serde_json::from_slice(&data)?;
        Ok(definition)
    }
}
