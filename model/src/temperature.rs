use serde::{Deserialize, Serialize};

/// Lowest temperature the simulated sensor can report.
pub const MIN_CELSIUS: f32 = 0.0;

/// Highest temperature the simulated sensor can report.
pub const MAX_CELSIUS: f32 = 50.0;

/// A temperature in degrees Celsius, always inside `[MIN_CELSIUS, MAX_CELSIUS]`.
///
/// Out-of-range values are saturated at the bounds instead of being rejected.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, PartialOrd)]
#[serde(from = "f32", into = "f32")]
pub struct Temperature(f32);

impl Temperature {
    /// Creates a temperature, clamping `celsius` into the sensor range.
    pub fn new(celsius: f32) -> Self {
        if celsius.is_nan() {
            return Self(MIN_CELSIUS);
        }

        Self(celsius.clamp(MIN_CELSIUS, MAX_CELSIUS))
    }

    /// The raw value in degrees Celsius.
    pub fn celsius(self) -> f32 {
        self.0
    }

    /// Returns `clamp(self + delta)`.
    pub fn adjusted(self, delta: f32) -> Self {
        Self::new(self.0 + delta)
    }

    /// Share of the full scale, in `[0, 1]`.
    pub fn fraction(self) -> f32 {
        (self.0 - MIN_CELSIUS) / (MAX_CELSIUS - MIN_CELSIUS)
    }

    pub fn level(self) -> GaugeLevel {
        GaugeLevel::from(self)
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self(25.0)
    }
}

impl From<f32> for Temperature {
    fn from(celsius: f32) -> Self {
        Self::new(celsius)
    }
}

impl From<Temperature> for f32 {
    fn from(temperature: Temperature) -> Self {
        temperature.0
    }
}

impl std::fmt::Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// The manual nudges offered by the control panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjustment {
    MinusFive,
    MinusOne,
    PlusOne,
    PlusFive,
}

impl Adjustment {
    /// All adjustments in the order the buttons are laid out.
    pub const ALL: [Adjustment; 4] = [
        Adjustment::MinusFive,
        Adjustment::MinusOne,
        Adjustment::PlusOne,
        Adjustment::PlusFive,
    ];

    pub fn delta(self) -> f32 {
        match self {
            Adjustment::MinusFive => -5.0,
            Adjustment::MinusOne => -1.0,
            Adjustment::PlusOne => 1.0,
            Adjustment::PlusFive => 5.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Adjustment::MinusFive => "-5°C",
            Adjustment::MinusOne => "-1°C",
            Adjustment::PlusOne => "+1°C",
            Adjustment::PlusFive => "+5°C",
        }
    }

    /// Maps a raw delta coming from the view back onto a known button.
    pub fn from_delta(delta: f32) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.delta() == delta)
    }
}

/// Colour band of the gauge and the history trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GaugeLevel {
    /// At or below 20°C.
    Cool,
    /// Above 20°C, at or below 30°C.
    Warm,
    /// Above 30°C.
    Hot,
}

impl GaugeLevel {
    const WARM_ABOVE: f32 = 20.0;
    const HOT_ABOVE: f32 = 30.0;

    /// Colour as `0xAARRGGBB`, ready for `slint::Color::from_argb_encoded`.
    pub fn color_argb(self) -> u32 {
        match self {
            GaugeLevel::Cool => 0xff3b82f6,
            GaugeLevel::Warm => 0xfff59e0b,
            GaugeLevel::Hot => 0xffef4444,
        }
    }
}

impl From<Temperature> for GaugeLevel {
    fn from(temperature: Temperature) -> Self {
        let celsius = temperature.celsius();
        if celsius > Self::HOT_ABOVE {
            GaugeLevel::Hot
        } else if celsius > Self::WARM_ABOVE {
            GaugeLevel::Warm
        } else {
            GaugeLevel::Cool
        }
    }
}

/// Geometry of the radial gauge, drawn on a square viewbox.
///
/// The arc starts at 12 o'clock and runs clockwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaugeArc {
    pub fraction: f32,
    pub end_x: f32,
    pub end_y: f32,
    pub large_arc: bool,
}

impl GaugeArc {
    pub const VIEWBOX: f32 = 200.0;
    pub const RADIUS: f32 = 80.0;

    // A full turn would put the end point on top of the start point.
    const MAX_FRACTION: f32 = 0.9999;

    pub fn new(temperature: Temperature) -> Self {
        let fraction = temperature.fraction();
        let angle = fraction.min(Self::MAX_FRACTION) * std::f32::consts::TAU;
        let center = Self::VIEWBOX / 2.0;

        Self {
            fraction,
            end_x: center + Self::RADIUS * angle.sin(),
            end_y: center - Self::RADIUS * angle.cos(),
            large_arc: fraction > 0.5,
        }
    }

    /// Start point of the arc (top of the circle).
    pub fn start() -> (f32, f32) {
        (Self::VIEWBOX / 2.0, Self::VIEWBOX / 2.0 - Self::RADIUS)
    }
}
