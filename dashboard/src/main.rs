// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use tempmon_dashboard::App;
use tempmon_model::SimulationConfig;

/// A minimal main function that loads the configuration, builds the App and runs it.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = SimulationConfig::load()?;
    log::info!("Simulating a sensor tick every {:?}", config.tick_interval());

    let app = App::new(&config)?;

    app.run()
}
