use flowgraph::{
    BlockDefinition, BlockRegistry, BlockType, ConnectionDefinition, ConnectionRuleError,
    DashboardDefinition, Flowgraph, FlowgraphDefinition, FlowgraphError, PlotDefinition,
};

fn block(id: u64, type_name: &str, name: &str) -> BlockDefinition {
    BlockDefinition {
        id,
        type_name: type_name.to_string(),
        name: name.to_string(),
        parameters: serde_json::Value::Null,
    }
}

fn connection(from: u64, from_port: &str, to: u64, to_port: &str) -> ConnectionDefinition {
    ConnectionDefinition {
        from_block: from,
        from_port: from_port.to_string(),
        to_block: to,
        to_port: to_port.to_string(),
    }
}

#[test]
fn save_and_load_dashboard_definition() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scope.json");

    let mut definition = DashboardDefinition::empty("scope");
    definition.description = "desc".to_string();
    definition.flowgraph.blocks.push(block(1, "data source", "source"));
    definition.flowgraph.blocks.push(block(2, "data sink", "sink 1"));
    definition
        .flowgraph
        .connections
        .push(connection(1, "out", 2, "in"));
    definition.plots.push(PlotDefinition {
        name: "plot".to_string(),
        sinks: vec!["sink 1".to_string()],
    });

    definition.save_to_file(&path).unwrap();
    let loaded = DashboardDefinition::load_from_file(&path).unwrap();

    assert_eq!(loaded, definition);
}

#[test]
fn missing_sections_default_to_empty() {
    let loaded: DashboardDefinition = serde_json::from_str(r#"{"name": "bare"}"#).unwrap();
    assert_eq!(loaded.name, "bare");
    assert!(loaded.flowgraph.blocks.is_empty());
    assert!(loaded.plots.is_empty());
}

#[test]
fn connection_rules() {
    let mut connections = vec![connection(1, "out", 2, "in1")];

    let err = flowgraph::validate_connection(&connections, 2, 2, "in1", 1).unwrap_err();
    assert_eq!(err, ConnectionRuleError::SelfConnection);

    let err = flowgraph::validate_connection(&connections, 3, 2, "in1", 1).unwrap_err();
    assert_eq!(err, ConnectionRuleError::InputLimitExceeded);

    let err =
        flowgraph::add_connection(&mut connections, connection(1, "out", 2, "in2"), 1).unwrap_err();
    assert_eq!(err, ConnectionRuleError::DuplicateConnection);

    flowgraph::add_connection(&mut connections, connection(3, "out", 2, "in2"), 1).unwrap();
    assert_eq!(connections.len(), 2);
}

#[test]
fn validate_rejects_unknown_types_and_ports() {
    let registry = BlockRegistry::with_builtin_blocks();

    let mut definition = FlowgraphDefinition::default();
    definition.blocks.push(block(1, "oscilloscope", "scope"));
    assert!(matches!(
        definition.validate(&registry),
        Err(FlowgraphError::UnknownBlockType { .. })
    ));

    let mut definition = FlowgraphDefinition::default();
    definition.blocks.push(block(1, "data source", "source"));
    definition.blocks.push(block(2, "data sink", "sink"));
    definition.connections.push(connection(1, "out", 2, "input"));
    assert!(matches!(
        definition.validate(&registry),
        Err(FlowgraphError::UnknownPort { .. })
    ));

    let mut definition = FlowgraphDefinition::default();
    definition.blocks.push(block(1, "data source", "a"));
    definition.blocks.push(block(1, "data sink", "b"));
    assert!(matches!(
        definition.validate(&registry),
        Err(FlowgraphError::DuplicateBlockId(1))
    ));
}

#[test]
fn connect_checks_port_types() {
    let mut registry = BlockRegistry::with_builtin_blocks();
    registry.add_block_type(BlockType::new("complex source").with_output("out", "complex"));

    let mut definition = FlowgraphDefinition::default();
    let source = definition.add_block("complex source", "iq", serde_json::Value::Null);
    let sink = definition.add_block("data sink", "sink", serde_json::Value::Null);

    let err = definition
        .connect(&registry, connection(source, "out", sink, "in"))
        .unwrap_err();
    assert!(matches!(err, FlowgraphError::PortTypeMismatch { .. }));
    assert!(definition.connections.is_empty());
}

#[test]
fn remove_block_drops_its_connections() {
    let mut definition = FlowgraphDefinition::default();
    let a = definition.add_block("data source", "a", serde_json::Value::Null);
    let b = definition.add_block("data sink", "b", serde_json::Value::Null);
    definition.connections.push(connection(a, "out", b, "in"));

    assert_eq!(b, a + 1);
    assert!(definition.remove_block(a).is_some());
    assert!(definition.connections.is_empty());
    assert!(definition.remove_block(a).is_none());
}

#[test]
fn order_blocks_for_execution_follows_connections_then_id() {
    let blocks = vec![
        block(1, "data sink", "sink"),
        block(2, "FFT", "fft"),
        block(3, "data source", "source"),
        block(4, "data source", "other"),
    ];
    let connections = vec![connection(3, "out", 2, "in1"), connection(2, "out", 1, "in")];
    let ordered = flowgraph::order_blocks_for_execution(&blocks, &connections);
    let ids: Vec<u64> = ordered.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![3, 2, 1, 4]);
}

#[test]
fn order_blocks_for_execution_keeps_cycles() {
    let blocks = vec![block(1, "sum sigs", "a"), block(2, "sum sigs", "b")];
    let connections = vec![connection(1, "out", 2, "in1"), connection(2, "out", 1, "in1")];
    let ordered = flowgraph::order_blocks_for_execution(&blocks, &connections);
    assert_eq!(ordered.len(), 2);
}

#[test]
fn builtin_registry_holds_the_standard_blocks() {
    let registry = BlockRegistry::with_builtin_blocks();
    for name in ["data source", "data sink", "data sink source", "sum sigs", "FFT"] {
        assert!(registry.contains(name), "missing {name}");
    }
    let sum = registry.get("sum sigs").unwrap();
    assert_eq!(sum.inputs.len(), 2);
    assert_eq!(sum.outputs.len(), 1);
    assert_eq!(sum.inputs[0].type_name, "float");
    let block = sum.create_block("adder");
    assert_eq!(block.name(), "adder");
    assert_eq!(block.type_name(), "sum sigs");
}

#[test]
fn load_block_definitions_registers_manifests() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("gain.json"),
        r#"{"name": "gain", "inputs": [{"name": "in", "type": "float"}], "outputs": [{"name": "out", "type": "float"}]}"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("broken.json"), "{").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let mut registry = BlockRegistry::new();
    let loaded = registry.load_block_definitions(dir.path()).unwrap();
    assert_eq!(loaded, 1);
    let gain = registry.get("gain").unwrap();
    assert_eq!(gain.inputs[0].name, "in");
}

#[test]
fn empty_flowgraph_has_no_blocks() {
    let registry = BlockRegistry::with_builtin_blocks();
    let mut graph = Flowgraph::new(FlowgraphDefinition::default(), &registry).unwrap();
    assert_eq!(graph.block_count(), 0);
    graph.process().unwrap();
    assert_eq!(graph.tick(), 1);
}

#[test]
fn sum_of_two_sources_reaches_sink() {
    let registry = BlockRegistry::with_builtin_blocks();
    let mut definition = FlowgraphDefinition::default();
    let params = serde_json::json!({"frequency": 0.0, "chunk": 4});
    let a = definition.add_block("data source", "a", params.clone());
    let b = definition.add_block("data source", "b", params);
    let sum = definition.add_block("sum sigs", "sum", serde_json::Value::Null);
    let sink = definition.add_block("data sink", "sink 1", serde_json::json!({"capacity": 6}));
    definition.connect(&registry, connection(a, "out", sum, "in1")).unwrap();
    definition.connect(&registry, connection(b, "out", sum, "in2")).unwrap();
    definition.connect(&registry, connection(sum, "out", sink, "in")).unwrap();

    let mut graph = Flowgraph::new(definition, &registry).unwrap();
    graph.process().unwrap();
    graph.process().unwrap();

    assert_eq!(graph.output(sum, "out").map(|o| o.len()), Some(4));
    let history = graph.history("sink 1").unwrap();
    assert_eq!(history.len(), 6);
    assert!(history.iter().all(|v| *v == 0.0));
}

#[test]
fn fft_block_outputs_spectrum_of_source_chunk() {
    let registry = BlockRegistry::with_builtin_blocks();
    let mut definition = FlowgraphDefinition::default();
    let source = definition.add_block(
        "data source",
        "source",
        serde_json::json!({"frequency": 125.0, "chunk": 16}),
    );
    let fft = definition.add_block("FFT", "fft", serde_json::Value::Null);
    definition
        .connect(&registry, connection(source, "out", fft, "in1"))
        .unwrap();

    let mut graph = Flowgraph::new(definition, &registry).unwrap();
    graph.process().unwrap();

    // 125 Hz at the default 1 kHz sample rate lands in bin 2 of a 16 point FFT.
    let spectrum = graph.output(fft, "out").unwrap();
    assert_eq!(spectrum.len(), 9);
    let peak = spectrum
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i);
    assert_eq!(peak, Some(2));
}

#[test]
fn invalid_parameters_fail_instantiation() {
    let registry = BlockRegistry::with_builtin_blocks();
    let mut definition = FlowgraphDefinition::default();
    definition.add_block(
        "data source",
        "source",
        serde_json::json!({"frequency": "fast"}),
    );
    assert!(matches!(
        Flowgraph::new(definition, &registry),
        Err(FlowgraphError::Block { .. })
    ));

    let mut oversized = FlowgraphDefinition::default();
    oversized.add_block(
        "data source",
        "source",
        serde_json::json!({"chunk": u64::MAX}),
    );
    assert!(matches!(
        Flowgraph::new(oversized, &registry),
        Err(FlowgraphError::Block { .. })
    ));

    let mut largest = FlowgraphDefinition::default();
    largest.add_block(
        "data source",
        "source",
        serde_json::json!({"chunk": flowgraph::blocks::MAX_CHUNK}),
    );
    assert!(Flowgraph::new(largest, &registry).is_ok());
}
