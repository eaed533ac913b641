use crate::config::SimulationConfig;
use crate::source::{Clock, DeltaSource, LocalClock, RandomDelta};
use crate::state::{update, Event, MonitorState};
use crate::temperature::{GaugeArc, GaugeLevel, Temperature};

pub type DeltaSourcePointer = Box<dyn DeltaSource>;
pub type ClockPointer = Box<dyn Clock>;

/// The simulated sensor: its state plus the noise and time sources feeding it.
pub struct Monitor {
    state: MonitorState,
    source: DeltaSourcePointer,
    clock: ClockPointer,
}

impl Monitor {
    pub fn new(state: MonitorState, source: DeltaSourcePointer, clock: ClockPointer) -> Self {
        Self {
            state,
            source,
            clock,
        }
    }

    /// A monitor with random noise and the local clock, as shown on the dashboard.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(
            MonitorState::new(config),
            Box::new(RandomDelta::from_optional_seed(config.seed, config.max_step)),
            Box::new(LocalClock),
        )
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn apply(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        self.state = update(state, event);
    }

    /// Produces one sample. Returns `false` without drawing noise while stopped.
    pub fn tick(&mut self) -> bool {
        if !self.state.running {
            return false;
        }

        let delta = self.source.next_delta();
        let at = self.clock.now();
        self.apply(Event::Tick { delta, at });

        log::debug!("Tick: {}°C (delta {delta:+.2})", self.state.temperature);
        true
    }

    pub fn toggle(&mut self) {
        self.apply(Event::Toggle);
        log::info!(
            "Monitoring {}",
            if self.state.running { "started" } else { "stopped" }
        );
    }

    pub fn adjust(&mut self, delta: f32) {
        self.apply(Event::Adjust(delta));
        log::info!("Temperature adjusted by {delta:+}°C to {}°C", self.state.temperature);
    }

    pub fn display(&self) -> DisplayState {
        DisplayState::from(&self.state)
    }
}

/// What the view shows, derived from a [`MonitorState`].
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayState {
    pub temperature: Temperature,
    /// Current temperature with one decimal, e.g. `25.0`.
    pub temperature_text: String,
    pub running: bool,
    /// `RUNNING` or `STOPPED`.
    pub status_text: &'static str,
    pub toggle_label: &'static str,
    /// The two rows of the 16x2 LCD.
    pub lcd_lines: [String; 2],
    pub gauge_level: GaugeLevel,
    pub gauge_arc: GaugeArc,
    pub history: Vec<f32>,
    pub log_lines: Vec<String>,
}

impl From<&MonitorState> for DisplayState {
    fn from(state: &MonitorState) -> Self {
        let status_text = if state.running { "RUNNING" } else { "STOPPED" };

        Self {
            temperature: state.temperature,
            temperature_text: state.temperature.to_string(),
            running: state.running,
            status_text,
            toggle_label: if state.running {
                "Stop Monitoring"
            } else {
                "Start Monitoring"
            },
            lcd_lines: [
                format!("Temp: {}°C", state.temperature),
                format!("Status: {status_text}"),
            ],
            gauge_level: state.temperature.level(),
            gauge_arc: GaugeArc::new(state.temperature),
            history: state.history.iter().map(|t| t.celsius()).collect(),
            log_lines: state.log.iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FixedClock, FixedDelta};
    use chrono::NaiveTime;

    fn monitor(deltas: &[f32]) -> Monitor {
        Monitor::new(
            MonitorState::default(),
            Box::new(FixedDelta::new(deltas)),
            Box::new(FixedClock(NaiveTime::from_hms_opt(9, 30, 0).unwrap())),
        )
    }

    #[test]
    fn tick_draws_from_sources() {
        let mut monitor = monitor(&[0.0]);

        assert!(monitor.tick());

        let display = monitor.display();
        assert_eq!(display.temperature_text, "25.0");
        assert_eq!(display.history, vec![25.0]);
        assert_eq!(display.log_lines, vec!["[09:30:00] Temperature: 25.0°C"]);
    }

    #[test]
    fn stopped_monitor_does_not_tick() {
        let mut monitor = monitor(&[1.0]);
        monitor.toggle();

        for _ in 0..5 {
            assert!(!monitor.tick());
        }
        assert_eq!(monitor.state(), &{
            let mut expected = MonitorState::default();
            expected.running = false;
            expected
        });
    }

    #[test]
    fn display_texts() {
        let mut monitor = monitor(&[]);
        monitor.adjust(8.2);

        let running = monitor.display();
        assert_eq!(running.lcd_lines[0], "Temp: 33.2°C");
        assert_eq!(running.lcd_lines[1], "Status: RUNNING");
        assert_eq!(running.toggle_label, "Stop Monitoring");
        assert_eq!(running.gauge_level, GaugeLevel::Hot);

        monitor.toggle();
        let stopped = monitor.display();
        assert_eq!(stopped.status_text, "STOPPED");
        assert_eq!(stopped.toggle_label, "Start Monitoring");
    }

    #[test]
    fn seeded_config_is_reproducible() {
        let config = SimulationConfig {
            seed: Some(1234),
            ..SimulationConfig::default()
        };
        let mut a = Monitor::from_config(&config);
        let mut b = Monitor::from_config(&config);

        for _ in 0..30 {
            a.tick();
            b.tick();
            assert_eq!(a.state().temperature, b.state().temperature);
        }
        assert_eq!(a.state().history.len(), 20);
    }
}
