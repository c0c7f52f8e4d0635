//! Spin engine: the decelerating slot-machine tick loop.
//!
//! A [`SpinSession`] is created with its final item already chosen, so the
//! animation is purely cosmetic. The session is a pull-based generator
//! (`next_step`) and [`SpinSession::run`] drives it with a [`Timer`], awaiting
//! each delay so that tick N is rendered before tick N+1 is scheduled.
//!
//! Delay arithmetic: tick 1 renders immediately; after tick `k < total` the
//! delay grows by `delay_step` and the engine waits the grown delay, so the
//! waits are `delay_start + k * delay_step` for `k = 1..total`.

use crate::error::SpinError;
use crate::rng::LuckRng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::rc::Rc;

/// Step range and delay curve of one widget's spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinConfig {
    pub steps_min: u32,
    pub steps_max: u32,
    /// Base delay in milliseconds.
    pub delay_start: u32,
    /// Added to the delay after every tick.
    pub delay_step: u32,
}

impl SpinConfig {
    pub const fn new(steps_min: u32, steps_max: u32, delay_start: u32, delay_step: u32) -> Self {
        Self { steps_min, steps_max, delay_start, delay_step }
    }

    pub fn validate(&self) -> Result<(), SpinError> {
        if self.steps_min == 0 || self.steps_min > self.steps_max {
            return Err(SpinError::InvalidSteps { min: self.steps_min, max: self.steps_max });
        }
        Ok(())
    }
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self::new(18, 28, 35, 7)
    }
}

/// Source of the waits between ticks.
pub trait Timer {
    type Delay: Future<Output = ()>;

    fn delay(&self, ms: u32) -> Self::Delay;
}

/// `setTimeout`-backed timer for the browser.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

#[cfg(target_arch = "wasm32")]
impl Timer for BrowserTimer {
    type Delay = gloo_timers::future::TimeoutFuture;

    fn delay(&self, ms: u32) -> Self::Delay {
        gloo_timers::future::TimeoutFuture::new(ms)
    }
}

/// One unit of work yielded by a session.
#[derive(Debug, PartialEq, Eq)]
pub enum Step<'a, T> {
    /// Show `item`, then wait `wait` ms before the next step (none after the last tick).
    Tick { item: &'a T, step: u32, wait: Option<u32> },
    /// Show the final item. Always the last step.
    Settle(&'a T),
}

/// Ephemeral state of one spin.
#[derive(Debug)]
pub struct SpinSession<T> {
    candidates: Rc<[T]>,
    current_index: usize,
    step_count: u32,
    total_steps: u32,
    delay: u32,
    delay_step: u32,
    final_item: T,
    settled: bool,
}

impl<T> SpinSession<T> {
    /// Start a session. `select_final` runs exactly once, here, before any tick.
    pub fn new<F>(
        candidates: Rc<[T]>,
        config: &SpinConfig,
        rng: &mut LuckRng,
        select_final: F,
    ) -> Result<Self, SpinError>
    where
        F: FnOnce(&mut LuckRng) -> T,
    {
        if candidates.is_empty() {
            return Err(SpinError::EmptyCandidates);
        }
        config.validate()?;

        let total_steps = rng.gen_inclusive(config.steps_min, config.steps_max);
        let current_index = rng.gen_range(candidates.len());
        let final_item = select_final(rng);

        Ok(Self {
            candidates,
            current_index,
            step_count: 0,
            total_steps,
            delay: config.delay_start,
            delay_step: config.delay_step,
            final_item,
            settled: false,
        })
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn current_delay(&self) -> u32 {
        self.delay
    }

    /// The committed outcome; fixed since construction.
    pub fn final_item(&self) -> &T {
        &self.final_item
    }

    /// Advance the generator. Returns `None` once settled.
    pub fn next_step(&mut self) -> Option<Step<'_, T>> {
        if self.step_count < self.total_steps {
            self.step_count += 1;
            self.current_index = (self.current_index + 1) % self.candidates.len();
            let wait = if self.step_count < self.total_steps {
                self.delay += self.delay_step;
                Some(self.delay)
            } else {
                None
            };
            return Some(Step::Tick {
                item: &self.candidates[self.current_index],
                step: self.step_count,
                wait,
            });
        }
        if !self.settled {
            self.settled = true;
            return Some(Step::Settle(&self.final_item));
        }
        None
    }

    /// Play the whole animation and hand back the final item.
    pub async fn run<M, R>(mut self, timer: &M, mut render_tick: R) -> T
    where
        M: Timer,
        R: FnMut(&T),
    {
        while let Some(step) = self.next_step() {
            match step {
                Step::Tick { item, wait, .. } => {
                    render_tick(item);
                    if let Some(ms) = wait {
                        timer.delay(ms).await;
                    }
                }
                Step::Settle(item) => render_tick(item),
            }
        }
        log::debug!("spin settled after {} ticks", self.step_count);
        self.final_item
    }
}

/// Spin over `candidates`, settle on whatever `select_final` returns, then
/// call `on_complete` with it.
pub async fn spin<T, M, R, F, C>(
    candidates: Rc<[T]>,
    config: &SpinConfig,
    rng: &mut LuckRng,
    timer: &M,
    render_tick: R,
    select_final: F,
    on_complete: C,
) -> Result<(), SpinError>
where
    M: Timer,
    R: FnMut(&T),
    F: FnOnce(&mut LuckRng) -> T,
    C: FnOnce(T),
{
    let session = SpinSession::new(candidates, config, rng, select_final)?;
    let final_item = session.run(timer, render_tick).await;
    on_complete(final_item);
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Timer;
    use std::cell::RefCell;
    use std::future::{ready, Ready};
    use std::rc::Rc;

    /// Resolves every delay at once and records what was asked for.
    #[derive(Clone, Default)]
    pub struct RecordingTimer {
        pub waits: Rc<RefCell<Vec<u32>>>,
    }

    impl Timer for RecordingTimer {
        type Delay = Ready<()>;

        fn delay(&self, ms: u32) -> Self::Delay {
            self.waits.borrow_mut().push(ms);
            ready(())
        }
    }
}
