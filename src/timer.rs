use gloo::timers::callback::Timeout;

use ln_tip_jar_core::{FeedbackTimer, TimerGuard};

/// `setTimeout` through gloo. The guard owns the `Timeout`, so dropping it
/// clears the pending callback.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimer;

impl FeedbackTimer for BrowserTimer {
    fn schedule(&self, delay_ms: u32, revert: Box<dyn FnOnce()>) -> TimerGuard {
        TimerGuard::new(Timeout::new(delay_ms, revert))
    }
}
