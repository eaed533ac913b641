slint::include_modules!();

use std::rc::Rc;
use std::time::Duration;

use slint::{ModelRc, SharedString, VecModel};
use tempmon_model::reference::{FIRMWARE_LISTING, PARTS, WIRING};
use tempmon_model::{
    Adjustment, DisplayState, GaugeArc, Monitor, Scheduler, SensorLoop, SimulationConfig,
    Temperature, TickCallback,
};

/// Runs sensor ticks on the Slint event loop.
#[derive(Default)]
pub struct TimerScheduler(slint::Timer);

impl Scheduler for TimerScheduler {
    fn start(&self, period: Duration, callback: TickCallback) {
        self.0.start(slint::TimerMode::Repeated, period, callback);
    }

    fn stop(&self) {
        self.0.stop();
    }

    fn is_running(&self) -> bool {
        self.0.running()
    }
}

/// Our App struct that holds the UI and the simulated sensor loop.
///
/// The sensor loop ticks on a Slint timer and pushes every new
/// `DisplayState` into the `ViewModel` global. Dropping the App drops the
/// loop, which cancels the timer.
pub struct App {
    ui: AppWindow,
    sensor_loop: Rc<SensorLoop<TimerScheduler>>,
}

impl App {
    /// Create a new App struct.
    ///
    /// Builds the window, fills in the static reference panels and wires the
    /// buttons to the sensor loop.
    pub fn new(config: &SimulationConfig) -> anyhow::Result<Self> {
        let ui = AppWindow::new()?;

        // Shared models for the history trace and the serial monitor
        let history: Rc<VecModel<HistorySample>> = Rc::default();
        let log_lines: Rc<VecModel<SharedString>> = Rc::default();

        let view_model = ui.global::<ViewModel>();
        view_model.set_history(ModelRc::from(history.clone()));
        view_model.set_log_lines(ModelRc::from(log_lines.clone()));
        view_model.set_adjustments(adjustment_model());
        Self::set_reference(&ui);

        let sensor_loop = Rc::new(SensorLoop::new(
            Monitor::from_config(config),
            TimerScheduler::default(),
            config.tick_interval(),
        ));

        // Get the handle to the UI as a weak reference, the listener must not keep it alive.
        let ui_handle = ui.as_weak();
        sensor_loop.set_listener(Box::new(move |display| {
            if let Some(ui) = ui_handle.upgrade() {
                present(&ui, display, &history, &log_lines);
            }
        }));

        let toggle_loop = Rc::downgrade(&sensor_loop);
        view_model.on_toggle_running(move || {
            if let Some(sensor_loop) = toggle_loop.upgrade() {
                sensor_loop.toggle();
            }
        });

        let adjust_loop = Rc::downgrade(&sensor_loop);
        view_model.on_adjust(move |delta| {
            let Some(sensor_loop) = adjust_loop.upgrade() else {
                return;
            };
            match Adjustment::from_delta(delta) {
                Some(adjustment) => sensor_loop.adjust(adjustment.delta()),
                None => log::warn!("Ignoring unknown adjustment of {delta}°C"),
            }
        });

        Ok(Self { ui, sensor_loop })
    }

    /// Run the App until the window is closed.
    pub fn run(&self) -> anyhow::Result<()> {
        log::info!(
            "Dashboard up, monitoring {}",
            if self.sensor_loop.is_running() { "running" } else { "stopped" }
        );

        // Run the UI (and map an error to an anyhow::Error).
        self.ui.run().map_err(|e| e.into())
    }

    fn set_reference(ui: &AppWindow) {
        let view_model = ui.global::<ViewModel>();

        let parts: Vec<SharedString> = PARTS.iter().map(|part| SharedString::from(*part)).collect();
        view_model.set_parts(ModelRc::new(VecModel::from(parts)));

        let wiring: Vec<WiringRow> = WIRING
            .iter()
            .map(|note| WiringRow {
                title: note.title.into(),
                detail: note.detail.into(),
            })
            .collect();
        view_model.set_wiring(ModelRc::new(VecModel::from(wiring)));

        view_model.set_firmware(FIRMWARE_LISTING.into());
    }
}

fn adjustment_model() -> ModelRc<AdjustButton> {
    let buttons: Vec<AdjustButton> = Adjustment::ALL
        .iter()
        .map(|adjustment| AdjustButton {
            label: adjustment.label().into(),
            delta: adjustment.delta(),
            warming: adjustment.delta() > 0.0,
        })
        .collect();

    ModelRc::new(VecModel::from(buttons))
}

/// Copies a display state into the view model.
fn present(
    ui: &AppWindow,
    display: &DisplayState,
    history: &VecModel<HistorySample>,
    log_lines: &VecModel<SharedString>,
) {
    let view_model = ui.global::<ViewModel>();

    view_model.set_temperature_text(display.temperature_text.as_str().into());
    view_model.set_running(display.running);
    view_model.set_status_text(display.status_text.into());
    view_model.set_toggle_label(display.toggle_label.into());
    view_model.set_lcd_top(display.lcd_lines[0].as_str().into());
    view_model.set_lcd_bottom(display.lcd_lines[1].as_str().into());
    let (start_x, start_y) = GaugeArc::start();
    view_model.set_gauge(GaugeData {
        fraction: display.gauge_arc.fraction,
        start_x,
        start_y,
        end_x: display.gauge_arc.end_x,
        end_y: display.gauge_arc.end_y,
        large_arc: display.gauge_arc.large_arc,
        color: slint::Color::from_argb_encoded(display.gauge_level.color_argb()),
    });

    history.set_vec(history_samples(display));
    log_lines.set_vec(
        display
            .log_lines
            .iter()
            .map(|line| SharedString::from(line.as_str()))
            .collect::<Vec<_>>(),
    );
}

/// History bars coloured with the same bands as the gauge.
fn history_samples(display: &DisplayState) -> Vec<HistorySample> {
    display
        .history
        .iter()
        .map(|&value| HistorySample {
            value,
            color: slint::Color::from_argb_encoded(Temperature::new(value).level().color_argb()),
        })
        .collect()
}

#[cfg(any(target_arch = "wasm32", test))]
thread_local! {
    static KEEP_ALIVE: std::cell::RefCell<Vec<Box<dyn std::any::Any>>> =
        const { std::cell::RefCell::new(Vec::new()) };
}

/// Parks `value` until the thread exits.
///
/// In the browser `run()` returns once the event loop is handed over, and
/// dropping the App there would cancel the sensor timer.
#[cfg(any(target_arch = "wasm32", test))]
fn keep_alive<T: 'static>(value: T) {
    KEEP_ALIVE.with(|kept| kept.borrow_mut().push(Box::new(value)));
}

/// Browser entry point. A broken configuration falls back to the defaults
/// instead of leaving a blank page.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() -> Result<(), wasm_bindgen::JsValue> {
    console_error_panic_hook::set_once();

    let config = SimulationConfig::load().unwrap_or_else(|err| {
        log::warn!("Using default simulation config: {err}");
        SimulationConfig::default()
    });

    let app = App::new(&config).map_err(|e| wasm_bindgen::JsValue::from_str(&e.to_string()))?;
    let result = app
        .run()
        .map_err(|e| wasm_bindgen::JsValue::from_str(&e.to_string()));
    keep_alive(app);

    result
}
