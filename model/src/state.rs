use chrono::NaiveTime;

use crate::config::SimulationConfig;
use crate::temperature::Temperature;
use crate::window::SlidingWindow;

/// One line of the serial monitor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogEntry {
    pub at: NaiveTime,
    pub temperature: Temperature,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] Temperature: {}°C",
            self.at.format("%H:%M:%S"),
            self.temperature
        )
    }
}

/// Everything the simulated sensor loop owns.
#[derive(Clone, Debug, PartialEq)]
pub struct MonitorState {
    pub temperature: Temperature,
    pub running: bool,
    /// Samples produced by ticks, oldest first.
    pub history: SlidingWindow<Temperature>,
    pub log: SlidingWindow<LogEntry>,
}

impl MonitorState {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            temperature: Temperature::new(config.initial_temperature),
            running: config.start_running,
            history: SlidingWindow::new(config.history_capacity),
            log: SlidingWindow::new(config.log_capacity),
        }
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new(&SimulationConfig::default())
    }
}

/// Inputs to [`update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// A timer tick carrying the random perturbation and the time it fired.
    Tick { delta: f32, at: NaiveTime },
    /// Start/stop button.
    Toggle,
    /// Manual nudge by `delta` °C.
    Adjust(f32),
}

/// Applies `event` to `state` and returns the new state.
///
/// Ticks are ignored while stopped. Manual adjustments only move the current
/// temperature; history and log grow on the next tick.
pub fn update(mut state: MonitorState, event: Event) -> MonitorState {
    match event {
        Event::Tick { delta, at } => {
            if !state.running {
                return state;
            }

            let temperature = state.temperature.adjusted(delta);
            state.temperature = temperature;
            state.history.push(temperature);
            state.log.push(LogEntry { at, temperature });
        }
        Event::Toggle => state.running = !state.running,
        Event::Adjust(delta) => state.temperature = state.temperature.adjusted(delta),
    }

    state
}
