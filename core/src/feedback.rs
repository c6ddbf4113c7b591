use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::markup::{COPIED_LABEL, COPIED_TEXT, COPY_LABEL, COPY_TEXT};

pub const COPY_FEEDBACK_MS: u32 = 2000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeedbackPhase {
    #[default]
    Idle,
    Copied,
}

impl FeedbackPhase {
    pub fn text(self) -> &'static str {
        match self {
            FeedbackPhase::Idle => COPY_TEXT,
            FeedbackPhase::Copied => COPIED_TEXT,
        }
    }

    pub fn aria_label(self) -> &'static str {
        match self {
            FeedbackPhase::Idle => COPY_LABEL,
            FeedbackPhase::Copied => COPIED_LABEL,
        }
    }
}

/// Handed out by [`CopyFeedback::show`]; redeem it once the delay elapsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeedbackTicket {
    generation: u64,
    pub delay_ms: u32,
}

/// "Copied" acknowledgment on the copy button.
#[derive(Clone, Debug, Default)]
pub struct CopyFeedback {
    generation: u64,
    copied: bool,
}

impl CopyFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self) -> FeedbackTicket {
        self.generation = self.generation.wrapping_add(1);
        self.copied = true;
        FeedbackTicket {
            generation: self.generation,
            delay_ms: COPY_FEEDBACK_MS,
        }
    }

    /// Reverts to idle if `ticket` belongs to the latest `show`. A ticket from
    /// an earlier copy returns `false` and leaves the newer feedback running.
    pub fn expire(&mut self, ticket: FeedbackTicket) -> bool {
        if ticket.generation != self.generation || !self.copied {
            return false;
        }
        self.copied = false;
        true
    }

    pub fn phase(&self) -> FeedbackPhase {
        if self.copied {
            FeedbackPhase::Copied
        } else {
            FeedbackPhase::Idle
        }
    }

    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.copied = false;
    }
}

/// Keeps a scheduled revert alive. Dropping it cancels the revert.
pub struct TimerGuard {
    _handle: Box<dyn Any>,
}

impl TimerGuard {
    pub fn new<H: 'static>(handle: H) -> Self {
        Self {
            _handle: Box::new(handle),
        }
    }
}

/// Clock the feedback revert runs on.
pub trait FeedbackTimer {
    fn schedule(&self, delay_ms: u32, revert: Box<dyn FnOnce()>) -> TimerGuard;
}

/// Shows the copied state through `present` and schedules the revert on
/// `timer`. A revert superseded by a newer show or a reset does nothing.
pub fn show_copied<T>(
    feedback: &Rc<RefCell<CopyFeedback>>,
    timer: &T,
    present: Rc<dyn Fn(FeedbackPhase)>,
) -> TimerGuard
where
    T: FeedbackTimer + ?Sized,
{
    let ticket = feedback.borrow_mut().show();
    present(FeedbackPhase::Copied);
    let weak = Rc::downgrade(feedback);
    timer.schedule(
        ticket.delay_ms,
        Box::new(move || {
            let Some(feedback) = weak.upgrade() else {
                return;
            };
            let expired = feedback.borrow_mut().expire(ticket);
            if expired {
                present(FeedbackPhase::Idle);
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_hands_out_the_fixed_delay() {
        let mut feedback = CopyFeedback::new();
        assert_eq!(feedback.phase(), FeedbackPhase::Idle);

        let ticket = feedback.show();
        assert_eq!(ticket.delay_ms, COPY_FEEDBACK_MS);
        assert_eq!(feedback.phase(), FeedbackPhase::Copied);
        assert!(feedback.expire(ticket));
        assert_eq!(feedback.phase(), FeedbackPhase::Idle);
    }

    #[test]
    fn older_ticket_cannot_cut_newer_feedback_short() {
        let mut feedback = CopyFeedback::new();
        let first = feedback.show();
        let second = feedback.show();
        assert!(!feedback.expire(first));
        assert_eq!(feedback.phase(), FeedbackPhase::Copied);
        assert!(feedback.expire(second));
        assert_eq!(feedback.phase(), FeedbackPhase::Idle);
        assert!(!feedback.expire(second));
    }

    #[test]
    fn reset_invalidates_outstanding_ticket() {
        let mut feedback = CopyFeedback::new();
        let ticket = feedback.show();
        feedback.reset();
        assert_eq!(feedback.phase(), FeedbackPhase::Idle);
        assert!(!feedback.expire(ticket));
    }

    #[test]
    fn phase_labels_match_button_copy() {
        assert_eq!(FeedbackPhase::Idle.text(), "Copy");
        assert_eq!(FeedbackPhase::Copied.text(), "Copied!");
        assert_eq!(FeedbackPhase::Copied.aria_label(), "Address copied!");
        assert_eq!(
            FeedbackPhase::Idle.aria_label(),
            "Copy Lightning Address to clipboard"
        );
    }
}
