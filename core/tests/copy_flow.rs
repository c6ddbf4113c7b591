use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::block_on;
use ln_tip_jar_core::{
    copy_text, show_copied, ClipboardAccess, ClipboardError, CopyFeedback, CopyRoute,
    FeedbackPhase, FeedbackTimer, LocalFuture, TimerGuard, COPY_FEEDBACK_MS,
};

#[derive(Clone, Copy)]
enum Primary {
    Missing,
    Accepts,
    Rejects,
}

struct FakeClipboard {
    primary: Primary,
    legacy_works: bool,
    written: RefCell<Vec<String>>,
    legacy_calls: RefCell<Vec<String>>,
}

impl FakeClipboard {
    fn new(primary: Primary, legacy_works: bool) -> Self {
        Self {
            primary,
            legacy_works,
            written: RefCell::new(Vec::new()),
            legacy_calls: RefCell::new(Vec::new()),
        }
    }
}

impl ClipboardAccess for FakeClipboard {
    fn write_text(&self, text: &str) -> Option<LocalFuture<'static, Result<(), ClipboardError>>> {
        match self.primary {
            Primary::Missing => None,
            Primary::Accepts => {
                self.written.borrow_mut().push(text.to_string());
                Some(Box::pin(async { Ok(()) }))
            }
            Primary::Rejects => Some(Box::pin(async {
                Err(ClipboardError::Rejected("NotAllowedError".to_string()))
            })),
        }
    }

    fn legacy_copy(&self, text: &str) -> Result<(), ClipboardError> {
        self.legacy_calls.borrow_mut().push(text.to_string());
        if self.legacy_works {
            Ok(())
        } else {
            Err(ClipboardError::Command("execCommand returned false".to_string()))
        }
    }
}

#[test]
fn primary_clipboard_is_preferred() {
    let clipboard = FakeClipboard::new(Primary::Accepts, true);
    let report = block_on(copy_text(&clipboard, "alice@example.com"));
    assert_eq!(report.route, CopyRoute::Clipboard);
    assert_eq!(report.primary_error, None);
    assert_eq!(clipboard.written.borrow().as_slice(), ["alice@example.com"]);
    assert!(clipboard.legacy_calls.borrow().is_empty());
}

#[test]
fn missing_clipboard_falls_back_to_legacy_copy() {
    let clipboard = FakeClipboard::new(Primary::Missing, true);
    let report = block_on(copy_text(&clipboard, "alice@example.com"));
    assert_eq!(report.route, CopyRoute::Legacy);
    assert_eq!(report.primary_error, Some(ClipboardError::Unavailable));
    assert_eq!(report.legacy_error, None);
    assert_eq!(clipboard.legacy_calls.borrow().as_slice(), ["alice@example.com"]);
}

#[test]
fn rejected_write_falls_back_and_failed_command_is_still_reported() {
    let clipboard = FakeClipboard::new(Primary::Rejects, false);
    let report = block_on(copy_text(&clipboard, "alice@example.com"));
    assert_eq!(report.route, CopyRoute::Legacy);
    assert!(matches!(report.primary_error, Some(ClipboardError::Rejected(_))));
    assert!(matches!(report.legacy_error, Some(ClipboardError::Command(_))));
    assert_eq!(clipboard.legacy_calls.borrow().len(), 1);
}

/// Collects scheduled reverts so the test decides when they fire.
#[derive(Default)]
struct ManualTimer {
    pending: RefCell<Vec<(u32, Box<dyn FnOnce()>)>>,
}

impl ManualTimer {
    fn delays(&self) -> Vec<u32> {
        self.pending.borrow().iter().map(|(delay, _)| *delay).collect()
    }

    fn fire(&self, index: usize) {
        let (_, revert) = self.pending.borrow_mut().remove(index);
        revert();
    }
}

impl FeedbackTimer for ManualTimer {
    fn schedule(&self, delay_ms: u32, revert: Box<dyn FnOnce()>) -> TimerGuard {
        self.pending.borrow_mut().push((delay_ms, revert));
        TimerGuard::new(())
    }
}

fn recorder() -> (Rc<RefCell<Vec<FeedbackPhase>>>, Rc<dyn Fn(FeedbackPhase)>) {
    let shown = Rc::new(RefCell::new(Vec::new()));
    let sink = shown.clone();
    let present: Rc<dyn Fn(FeedbackPhase)> =
        Rc::new(move |phase: FeedbackPhase| sink.borrow_mut().push(phase));
    (shown, present)
}

#[test]
fn successful_copy_shows_feedback_reverted_by_the_timer() {
    let clipboard = FakeClipboard::new(Primary::Accepts, true);
    let feedback = Rc::new(RefCell::new(CopyFeedback::new()));
    let timer = ManualTimer::default();
    let (shown, present) = recorder();

    block_on(copy_text(&clipboard, "alice@example.com"));
    let _guard = show_copied(&feedback, &timer, present);

    assert_eq!(timer.delays(), [COPY_FEEDBACK_MS]);
    assert_eq!(shown.borrow().as_slice(), [FeedbackPhase::Copied]);
    assert_eq!(feedback.borrow().phase().text(), "Copied!");

    timer.fire(0);
    assert_eq!(
        shown.borrow().as_slice(),
        [FeedbackPhase::Copied, FeedbackPhase::Idle]
    );
    assert_eq!(feedback.borrow().phase().text(), "Copy");
}

#[test]
fn earlier_revert_does_not_cut_a_second_copy_short() {
    let feedback = Rc::new(RefCell::new(CopyFeedback::new()));
    let timer = ManualTimer::default();
    let (shown, present) = recorder();

    let _first = show_copied(&feedback, &timer, present.clone());
    let _second = show_copied(&feedback, &timer, present);
    assert_eq!(timer.delays(), [COPY_FEEDBACK_MS, COPY_FEEDBACK_MS]);

    timer.fire(0);
    assert_eq!(feedback.borrow().phase(), FeedbackPhase::Copied);
    assert_eq!(shown.borrow().last(), Some(&FeedbackPhase::Copied));

    timer.fire(0);
    assert_eq!(feedback.borrow().phase(), FeedbackPhase::Idle);
    assert_eq!(shown.borrow().last(), Some(&FeedbackPhase::Idle));
}

#[test]
fn revert_after_reset_leaves_the_button_alone() {
    let feedback = Rc::new(RefCell::new(CopyFeedback::new()));
    let timer = ManualTimer::default();
    let (shown, present) = recorder();

    let _guard = show_copied(&feedback, &timer, present);
    feedback.borrow_mut().reset();
    timer.fire(0);
    assert_eq!(shown.borrow().as_slice(), [FeedbackPhase::Copied]);
}
