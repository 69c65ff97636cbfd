use clap::Parser;
use digitizer_core::AppSettings;
use digitizer_gui::{run_gui, GuiConfig, StartupOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "opendigitizer", version, about = "OpenDigitizer flowgraph dashboards")]
struct Cli {
    /// Dashboard to open at startup, as `<directory>/<file>.json`
    locator: Option<String>,
    /// Directory holding dashboards and the settings file
    #[arg(long, default_value = "dashboards")]
    dashboards_dir: PathBuf,
    /// Directory of block type definitions to register
    #[arg(long, default_value = "blocks")]
    blocks_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    std::fs::create_dir_all(&cli.dashboards_dir)?;
    let (settings, settings_path) = AppSettings::load_or_create(&cli.dashboards_dir);
    let config = GuiConfig::from_settings(&settings);
    let startup = StartupOptions {
        locator: cli.locator,
        blocks_dir: cli.blocks_dir.is_dir().then_some(cli.blocks_dir),
        dashboards_dir: cli.dashboards_dir,
        settings,
        settings_path: Some(settings_path),
        executable: std::env::current_exe().ok(),
    };

    if let Err(err) = run_gui(config, startup) {
        log::error!("{err}");
        std::process::exit(1);
    }
    Ok(())
}
