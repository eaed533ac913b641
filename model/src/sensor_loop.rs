use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::monitor::{DisplayState, Monitor};
use crate::schedule::Scheduler;

pub type Listener = Box<dyn FnMut(&DisplayState) + 'static>;

struct Shared {
    monitor: Monitor,
    listener: Option<Listener>,
}

impl Shared {
    // The listener must not call back into the loop.
    fn publish(&mut self) {
        let display = self.monitor.display();
        if let Some(listener) = self.listener.as_mut() {
            listener(&display);
        }
    }
}

/// Drives a [`Monitor`] from a [`Scheduler`] and republishes every change.
///
/// The scheduler only runs while the monitor is running, and is cancelled
/// when the loop is dropped.
pub struct SensorLoop<S: Scheduler> {
    shared: Rc<RefCell<Shared>>,
    scheduler: S,
    period: Duration,
}

impl<S: Scheduler> SensorLoop<S> {
    /// Shortest tick period; smaller periods are raised to it.
    pub const MIN_PERIOD: Duration = Duration::from_millis(1);

    pub fn new(monitor: Monitor, scheduler: S, period: Duration) -> Self {
        let running = monitor.is_running();
        if period < Self::MIN_PERIOD {
            log::warn!("Tick period {period:?} too short, using {:?}", Self::MIN_PERIOD);
        }
        let period = period.max(Self::MIN_PERIOD);
        let sensor_loop = Self {
            shared: Rc::new(RefCell::new(Shared {
                monitor,
                listener: None,
            })),
            scheduler,
            period,
        };

        if running {
            sensor_loop.schedule();
        }

        sensor_loop
    }

    /// Installs the display callback and publishes the current state to it.
    pub fn set_listener(&self, listener: Listener) {
        let mut shared = self.shared.borrow_mut();
        shared.listener = Some(listener);
        shared.publish();
    }

    pub fn toggle(&self) {
        let running = {
            let mut shared = self.shared.borrow_mut();
            shared.monitor.toggle();
            shared.publish();
            shared.monitor.is_running()
        };

        if running {
            self.schedule();
        } else {
            self.scheduler.stop();
        }
    }

    pub fn adjust(&self, delta: f32) {
        let mut shared = self.shared.borrow_mut();
        shared.monitor.adjust(delta);
        shared.publish();
    }

    pub fn display(&self) -> DisplayState {
        self.shared.borrow().monitor.display()
    }

    pub fn is_running(&self) -> bool {
        self.shared.borrow().monitor.is_running()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn schedule(&self) {
        let shared = Rc::downgrade(&self.shared);

        log::debug!("Scheduling sensor ticks every {:?}", self.period);
        self.scheduler.start(
            self.period,
            Box::new(move || {
                let Some(shared) = shared.upgrade() else {
                    return;
                };
                let mut shared = shared.borrow_mut();
                if shared.monitor.tick() {
                    shared.publish();
                }
            }),
        );
    }
}

impl<S: Scheduler> Drop for SensorLoop<S> {
    fn drop(&mut self) {
        log::debug!("Sensor loop torn down");
        self.scheduler.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualScheduler;
    use crate::source::{FixedClock, FixedDelta};
    use crate::state::MonitorState;
    use chrono::NaiveTime;
    use std::cell::Cell;

    const PERIOD: Duration = Duration::from_millis(1000);

    fn sensor_loop(deltas: &[f32]) -> (SensorLoop<ManualScheduler>, ManualScheduler) {
        let monitor = Monitor::new(
            MonitorState::default(),
            Box::new(FixedDelta::new(deltas)),
            Box::new(FixedClock(NaiveTime::from_hms_opt(18, 4, 59).unwrap())),
        );
        let scheduler = ManualScheduler::new();

        (SensorLoop::new(monitor, scheduler.clone(), PERIOD), scheduler)
    }

    #[test]
    fn ticks_while_running() {
        let (sensor_loop, scheduler) = sensor_loop(&[0.0]);
        assert!(scheduler.is_running());

        scheduler.advance(PERIOD);

        let display = sensor_loop.display();
        assert_eq!(display.temperature_text, "25.0");
        assert_eq!(display.history, vec![25.0]);
        assert_eq!(display.log_lines.len(), 1);
        assert!(display.log_lines[0].contains("25.0°C"));
    }

    #[test]
    fn buffers_stay_bounded() {
        let (sensor_loop, scheduler) = sensor_loop(&[0.5, -0.5]);

        assert_eq!(scheduler.advance(PERIOD * 100), 100);

        let display = sensor_loop.display();
        assert_eq!(display.history.len(), 20);
        assert_eq!(display.log_lines.len(), 11);
    }

    #[test]
    fn stop_freezes_everything() {
        let (sensor_loop, scheduler) = sensor_loop(&[0.75]);
        scheduler.advance(PERIOD * 3);

        sensor_loop.toggle();
        let frozen = sensor_loop.display();
        assert!(!scheduler.is_running());

        assert_eq!(scheduler.advance(PERIOD * 10), 0);
        let after = sensor_loop.display();
        assert_eq!(after.temperature, frozen.temperature);
        assert_eq!(after.history, frozen.history);
        assert_eq!(after.log_lines, frozen.log_lines);

        sensor_loop.toggle();
        assert!(scheduler.is_running());
        assert_eq!(scheduler.advance(PERIOD), 1);
        assert_eq!(sensor_loop.display().history.len(), 4);
    }

    #[test]
    fn adjust_publishes_without_recording() {
        let (sensor_loop, _scheduler) = sensor_loop(&[0.0]);
        let published = Rc::new(RefCell::new(Vec::new()));
        let sink = published.clone();
        sensor_loop.set_listener(Box::new(move |display| {
            sink.borrow_mut().push(display.temperature_text.clone())
        }));

        sensor_loop.adjust(-5.0);
        sensor_loop.adjust(-1.0);

        assert_eq!(*published.borrow(), vec!["25.0", "20.0", "19.0"]);
        assert!(sensor_loop.display().history.is_empty());
    }

    #[test]
    fn every_tick_is_published() {
        let (sensor_loop, scheduler) = sensor_loop(&[1.0]);
        let count = Rc::new(Cell::new(0));
        let sink = count.clone();
        sensor_loop.set_listener(Box::new(move |_| sink.set(sink.get() + 1)));

        scheduler.advance(PERIOD * 4);

        // One publish on install plus one per tick.
        assert_eq!(count.get(), 5);
        assert_eq!(sensor_loop.display().temperature_text, "29.0");
    }

    #[test]
    fn teardown_cancels_the_timer() {
        let (sensor_loop, scheduler) = sensor_loop(&[1.0]);
        let count = Rc::new(Cell::new(0));
        let sink = count.clone();
        sensor_loop.set_listener(Box::new(move |_| sink.set(sink.get() + 1)));

        drop(sensor_loop);

        assert!(!scheduler.is_running());
        assert_eq!(scheduler.advance(PERIOD * 5), 0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn zero_period_is_raised() {
        let monitor = Monitor::new(
            MonitorState::default(),
            Box::new(FixedDelta::constant(0.0)),
            Box::new(FixedClock(NaiveTime::from_hms_opt(0, 0, 0).unwrap())),
        );
        let scheduler = ManualScheduler::new();
        let sensor_loop = SensorLoop::new(monitor, scheduler.clone(), Duration::ZERO);

        assert_eq!(scheduler.advance(Duration::from_millis(5)), 5);
        assert_eq!(sensor_loop.display().history.len(), 5);
    }

    #[test]
    fn starts_stopped_when_configured() {
        let mut state = MonitorState::default();
        state.running = false;
        let monitor = Monitor::new(
            state,
            Box::new(FixedDelta::constant(1.0)),
            Box::new(FixedClock(NaiveTime::from_hms_opt(0, 0, 0).unwrap())),
        );
        let scheduler = ManualScheduler::new();
        let sensor_loop = SensorLoop::new(monitor, scheduler.clone(), PERIOD);

        assert!(!sensor_loop.is_running());
        assert_eq!(scheduler.advance(PERIOD * 3), 0);
    }
}
