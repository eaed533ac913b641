use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub type TickCallback = Box<dyn FnMut() + 'static>;

/// A repeating task with explicit start and cancel.
///
/// Implementations must not invoke the callback after `stop` returns.
pub trait Scheduler {
    /// Calls `callback` every `period`, replacing any previously started callback.
    fn start(&self, period: Duration, callback: TickCallback);

    fn stop(&self);

    fn is_running(&self) -> bool;
}

#[derive(Default)]
struct ManualTask {
    period: Option<Duration>,
    elapsed: Duration,
    callback: Option<TickCallback>,
    // Bumped on every start/stop so a callback that restarts the task is not overwritten.
    generation: u64,
}

/// A scheduler driven by virtual time through [`ManualScheduler::advance`].
///
/// Clones share the same task, so a test can keep a handle after handing one
/// over to its owner.
#[derive(Clone, Default)]
pub struct ManualScheduler(Rc<RefCell<ManualTask>>);

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves virtual time forward by `by` and fires the callback once per
    /// elapsed period. Returns how many times it fired. A zero period never fires.
    pub fn advance(&self, by: Duration) -> usize {
        let mut fired = 0;
        self.0.borrow_mut().elapsed += by;

        loop {
            let (mut callback, generation) = {
                let mut task = self.0.borrow_mut();
                let Some(period) = task.period else {
                    return fired;
                };
                if period.is_zero() || task.elapsed < period {
                    return fired;
                }
                task.elapsed -= period;

                match task.callback.take() {
                    Some(callback) => (callback, task.generation),
                    None => return fired,
                }
            };

            callback();
            fired += 1;

            let mut task = self.0.borrow_mut();
            if task.generation == generation {
                task.callback = Some(callback);
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn start(&self, period: Duration, callback: TickCallback) {
        let mut task = self.0.borrow_mut();
        task.period = Some(period);
        task.elapsed = Duration::ZERO;
        task.callback = Some(callback);
        task.generation += 1;
    }

    fn stop(&self) {
        let mut task = self.0.borrow_mut();
        task.period = None;
        task.elapsed = Duration::ZERO;
        task.callback = None;
        task.generation += 1;
    }

    fn is_running(&self) -> bool {
        self.0.borrow().period.is_some()
    }
}
