use chrono::NaiveTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies the random perturbation applied on every tick.
pub trait DeltaSource {
    fn next_delta(&mut self) -> f32;
}

/// Uniform noise in `[-max_step, +max_step)` from a seedable generator.
pub struct RandomDelta {
    rng: StdRng,
    max_step: f32,
}

impl RandomDelta {
    pub fn new(seed: u64, max_step: f32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_step: max_step.abs(),
        }
    }

    /// Uses `seed` when given, otherwise a seed derived from the wall clock.
    pub fn from_optional_seed(seed: Option<u64>, max_step: f32) -> Self {
        let seed = seed.unwrap_or_else(clock_seed);
        log::debug!("Sensor noise seeded with {seed}");

        Self::new(seed, max_step)
    }
}

impl DeltaSource for RandomDelta {
    fn next_delta(&mut self) -> f32 {
        if self.max_step == 0.0 {
            return 0.0;
        }

        self.rng.random_range(-self.max_step..self.max_step)
    }
}

// The browser build has no OS entropy source wired up, the clock works everywhere.
fn clock_seed() -> u64 {
    let now = chrono::Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_millis()) as u64
}

/// Replays a fixed sequence of deltas, repeating the last one once exhausted.
#[derive(Clone, Debug, Default)]
pub struct FixedDelta {
    deltas: Vec<f32>,
    next: usize,
}

impl FixedDelta {
    pub fn new(deltas: impl Into<Vec<f32>>) -> Self {
        Self {
            deltas: deltas.into(),
            next: 0,
        }
    }

    /// Always yields `delta`.
    pub fn constant(delta: f32) -> Self {
        Self::new(vec![delta])
    }
}

impl DeltaSource for FixedDelta {
    fn next_delta(&mut self) -> f32 {
        let delta = match self.deltas.get(self.next) {
            Some(delta) => *delta,
            None => self.deltas.last().copied().unwrap_or(0.0),
        };
        self.next = (self.next + 1).min(self.deltas.len());

        delta
    }
}

/// Supplies the local wall-clock time used to stamp log lines.
pub trait Clock {
    fn now(&self) -> NaiveTime;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveTime {
        chrono::Local::now().time()
    }
}

/// A clock frozen at one instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}
