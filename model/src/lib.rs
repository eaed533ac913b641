//! Simulation core of the temperature monitoring dashboard.
//!
//! The crate knows nothing about the UI toolkit: the front end installs a
//! [`Scheduler`] and a listener on a [`SensorLoop`] and renders the
//! [`DisplayState`] it receives.

pub mod config;
pub mod monitor;
pub mod reference;
pub mod schedule;
pub mod sensor_loop;
pub mod source;
pub mod state;
pub mod temperature;
pub mod window;

pub use config::{ConfigError, SimulationConfig};
pub use monitor::{DisplayState, Monitor};
pub use schedule::{ManualScheduler, Scheduler, TickCallback};
pub use sensor_loop::SensorLoop;
pub use state::{update, Event, LogEntry, MonitorState};
pub use temperature::{Adjustment, GaugeArc, GaugeLevel, Temperature};

#[test]
fn test_package_metadata() {
    assert_eq!(env!("CARGO_PKG_NAME"), "tempmon-model");
    assert_eq!(env!("CARGO_PKG_AUTHORS"), "The tempmon developers");
}
