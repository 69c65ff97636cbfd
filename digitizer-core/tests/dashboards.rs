use digitizer_core::dashboard::scan_dashboard_entries;
use digitizer_core::{
    Dashboard, DashboardController, DashboardDescription, DashboardError, DashboardSource,
    DashboardState, FlowgraphItem, SourceRegistry,
};
use flowgraph::{BlockRegistry, ConnectionDefinition, DashboardDefinition};
use std::path::Path;
use std::sync::Arc;

fn scope_definition(name: &str) -> DashboardDefinition {
    let registry = BlockRegistry::with_builtin_blocks();
    let mut definition = DashboardDefinition::empty(name);
    let fg = &mut definition.flowgraph;
    let source = fg.add_block("data source", "source", serde_json::Value::Null);
    let sink = fg.add_block("data sink", "sink 1", serde_json::Value::Null);
    fg.connect(
        &registry,
        ConnectionDefinition {
            from_block: source,
            from_port: "out".to_string(),
            to_block: sink,
            to_port: "in".to_string(),
        },
    )
    .unwrap();
    definition
}

fn write_dashboard(dir: &Path, file_name: &str, definition: &DashboardDefinition) {
    definition.save_to_file(dir.join(file_name)).unwrap();
}

#[test]
fn close_on_empty_is_a_no_op() {
    let mut controller = DashboardController::new();
    let mut fg_item = FlowgraphItem::new();
    assert_eq!(controller.state(), DashboardState::Empty);
    assert!(!controller.close(&mut fg_item));
    assert_eq!(controller.state(), DashboardState::Empty);
    assert_eq!(controller.generation(), 0);
}

#[test]
fn replacing_a_dashboard_clears_view_state() {
    let registry = BlockRegistry::with_builtin_blocks();
    let mut controller = DashboardController::new();
    let mut fg_item = FlowgraphItem::new();

    let a = Arc::new(DashboardDescription::new(scope_definition("A")));
    controller.load(a, &registry, &mut fg_item).unwrap();
    assert_eq!(fg_item.bound_dashboard(), Some("A"));
    assert_eq!(fg_item.positions().len(), 2);
    fg_item.select(Some(1));
    assert_eq!(fg_item.selected(), Some(1));

    controller
        .load(DashboardDescription::create_empty("B"), &registry, &mut fg_item)
        .unwrap();
    assert_eq!(controller.state(), DashboardState::Active);
    assert_eq!(controller.dashboard().map(Dashboard::name), Some("B"));
    assert_eq!(fg_item.bound_dashboard(), Some("B"));
    assert!(fg_item.positions().is_empty());
    assert_eq!(fg_item.selected(), None);
}

#[test]
fn invalid_description_leaves_current_dashboard_alone() {
    let registry = BlockRegistry::with_builtin_blocks();
    let mut controller = DashboardController::new();
    let mut fg_item = FlowgraphItem::new();
    let a = Arc::new(DashboardDescription::new(scope_definition("A")));
    controller.load(a, &registry, &mut fg_item).unwrap();

    let mut broken = DashboardDefinition::empty("broken");
    broken
        .flowgraph
        .add_block("oscilloscope", "scope", serde_json::Value::Null);
    let err = controller
        .load(
            Arc::new(DashboardDescription::new(broken)),
            &registry,
            &mut fg_item,
        )
        .unwrap_err();
    assert!(matches!(err, DashboardError::Invalid(_)));
    assert_eq!(controller.dashboard().map(Dashboard::name), Some("A"));
    assert_eq!(fg_item.bound_dashboard(), Some("A"));
}

#[test]
fn rejected_block_parameters_restore_previous_dashboard() {
    let registry = BlockRegistry::with_builtin_blocks();
    let mut controller = DashboardController::new();
    let mut fg_item = FlowgraphItem::new();
    let a = Arc::new(DashboardDescription::new(scope_definition("A")));
    controller.load(a, &registry, &mut fg_item).unwrap();
    fg_item.select(Some(1));
    let positions = fg_item.positions().clone();
    let pending = controller.begin_load();
    let generation = controller.generation();

    let mut broken = DashboardDefinition::empty("broken");
    broken
        .flowgraph
        .add_block("data source", "src", serde_json::json!({"frequency": -1.0}));
    let err = controller
        .load(
            Arc::new(DashboardDescription::new(broken)),
            &registry,
            &mut fg_item,
        )
        .unwrap_err();
    assert!(matches!(err, DashboardError::Invalid(_)));

    assert_eq!(controller.state(), DashboardState::Active);
    assert_eq!(controller.dashboard().map(Dashboard::name), Some("A"));
    assert_eq!(fg_item.bound_dashboard(), Some("A"));
    assert_eq!(fg_item.selected(), Some(1));
    assert_eq!(fg_item.positions(), &positions);
    assert_eq!(controller.generation(), generation);
    assert!(controller.finish_load(pending));
}

#[test]
fn stale_load_tickets_are_rejected() {
    let registry = BlockRegistry::with_builtin_blocks();
    let mut controller = DashboardController::new();
    let mut fg_item = FlowgraphItem::new();

    let first = controller.begin_load();
    assert_eq!(controller.state(), DashboardState::Loading);
    let second = controller.begin_load();
    assert!(!controller.finish_load(first));
    assert!(controller.finish_load(second));
    assert_eq!(controller.state(), DashboardState::Empty);

    let pending = controller.begin_load();
    controller
        .load(DashboardDescription::create_empty("sync"), &registry, &mut fg_item)
        .unwrap();
    assert!(!controller.finish_load(pending));

    let pending = controller.begin_load();
    assert!(controller.close(&mut fg_item));
    assert!(!controller.finish_load(pending));
    assert_eq!(controller.state(), DashboardState::Empty);
}

#[test]
fn dashboard_ticks_its_flowgraph() {
    let registry = BlockRegistry::with_builtin_blocks();
    let mut dashboard = Dashboard::new(Arc::new(DashboardDescription::new(scope_definition(
        "scope",
    ))));
    assert!(!dashboard.is_loaded());
    dashboard.load(&registry).unwrap();
    dashboard.tick().unwrap();
    assert_eq!(dashboard.flowgraph().tick(), 1);
    assert_eq!(dashboard.flowgraph().history("sink 1").map(|h| h.len()), Some(16));
}

#[test]
fn save_requires_a_source() {
    let dashboard = Dashboard::new(DashboardDescription::create_empty("scratch"));
    assert!(matches!(dashboard.save(), Err(DashboardError::NoSource)));
}

#[test]
fn save_writes_back_to_the_source_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_dashboard(dir.path(), "scope.json", &scope_definition("scope"));
    let source = Arc::new(DashboardSource::new(dir.path().to_path_buf()));

    let description = DashboardDescription::load_from(&source, "scope.json").unwrap();
    assert_eq!(description.path(), Some(dir.path().join("scope.json")));

    let mut dashboard = Dashboard::new(Arc::new(description));
    dashboard.add_plot("spectrum", vec!["sink 1".to_string()]);
    let path = dashboard.save().unwrap();

    let reloaded = DashboardDefinition::load_from_file(&path).unwrap();
    assert_eq!(reloaded.plots.len(), 1);
    assert_eq!(reloaded.flowgraph.blocks.len(), 2);
}

#[test]
fn load_from_missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = Arc::new(DashboardSource::new(dir.path().to_path_buf()));
    let err = DashboardDescription::load_from(&source, "missing.json").unwrap_err();
    match err {
        DashboardError::Load { path, .. } => assert!(path.ends_with("missing.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn source_registry_shares_one_source_per_path() {
    let mut sources = SourceRegistry::new();
    let a = sources.get("/tmp/dashboards");
    let b = sources.get("/tmp/dashboards");
    let c = sources.get("/tmp/other");
    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(sources.len(), 2);
    assert_eq!(a.name, "dashboards");
}

#[test]
fn scan_lists_parseable_dashboards_sorted_by_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_dashboard(dir.path(), "b.json", &scope_definition("beta"));
    write_dashboard(dir.path(), "a.json", &DashboardDefinition::empty("alpha"));
    std::fs::write(dir.path().join("broken.json"), "not json").unwrap();
    std::fs::write(dir.path().join("opendigitizer_settings.json"), "{}").unwrap();
    std::fs::write(dir.path().join("readme.txt"), "hello").unwrap();

    let entries = scan_dashboard_entries(dir.path());
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);
    assert_eq!(entries[1].blocks, 2);
    assert_eq!(entries[1].file_name, "b.json");
}
