use digitizer_core::{AppSettings, DashboardState, ShellEvent};
use digitizer_gui::{GuiApp, GuiConfig, StartupOptions, Tab};
use flowgraph::DashboardDefinition;
use std::time::{Duration, Instant};

const NO_EVENTS: [ShellEvent; 0] = [];

#[test]
fn gui_config_defaults() {
    let config = GuiConfig::default();
    assert_eq!(config.title, "OpenDigitizer");
    assert_eq!(config.width, 1280.0);
    assert_eq!(config.height, 720.0);
}

#[test]
fn gui_config_uses_window_size_from_settings() {
    let settings = AppSettings {
        window_width: 800.0,
        window_height: 600.0,
        ..AppSettings::default()
    };
    let config = GuiConfig::from_settings(&settings);
    assert_eq!(config.width, 800.0);
    assert_eq!(config.height, 600.0);
}

#[test]
fn file_tab_is_forced_without_a_dashboard() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut gui = GuiApp::new(StartupOptions {
        dashboards_dir: dir.path().to_path_buf(),
        ..StartupOptions::default()
    });
    gui.sync_tab();
    assert_eq!(gui.tab(), Tab::File);

    gui.shell_mut().app_mut().load_empty_dashboard().unwrap();
    gui.sync_tab();
    assert_eq!(gui.tab(), Tab::View);

    gui.shell_mut().app_mut().close_dashboard();
    gui.sync_tab();
    assert_eq!(gui.tab(), Tab::File);
}

#[test]
fn startup_locator_and_block_definitions_are_loaded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocks_dir = dir.path().join("blocks");
    std::fs::create_dir_all(&blocks_dir).unwrap();
    std::fs::write(
        blocks_dir.join("gain.json"),
        r#"{"name": "gain", "inputs": [{"name": "in", "type": "float"}], "outputs": [{"name": "out", "type": "float"}]}"#,
    )
    .unwrap();

    let mut definition = DashboardDefinition::empty("startup");
    definition
        .flowgraph
        .add_block("gain", "g", serde_json::Value::Null);
    let path = dir.path().join("startup.json");
    definition.save_to_file(&path).unwrap();

    let mut gui = GuiApp::new(StartupOptions {
        locator: Some(path.to_string_lossy().into_owned()),
        dashboards_dir: dir.path().to_path_buf(),
        blocks_dir: Some(blocks_dir),
        ..StartupOptions::default()
    });
    assert!(gui.shell().app().registry().contains("gain"));
    assert_eq!(gui.shell().app().open_dashboard_page.entries().len(), 1);

    let deadline = Instant::now() + Duration::from_secs(5);
    while gui.shell().app().is_loading() {
        assert!(Instant::now() < deadline, "startup load timed out");
        gui.shell_mut().frame(NO_EVENTS);
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(gui.shell().app().state(), DashboardState::Active);
    assert_eq!(gui.shell().app().dashboard().unwrap().name(), "startup");
}
