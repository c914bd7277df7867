//! Debounced callbacks on browser timers.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use web_time::Instant;

use quire_editor_core::Debouncer;

type Callback = Box<dyn FnOnce()>;

struct Shared {
    debouncer: Debouncer<Callback>,
    timer: Option<Timeout>,
    /// The timer whose callback ran last. Its closure may still be on the
    /// stack, so it is only freed by the next firing.
    fired: Option<Timeout>,
}

/// Runs the most recently scheduled callback once the delay passes quietly.
///
/// Dropping the last clone cancels anything pending.
#[derive(Clone)]
pub struct TimerDebounce {
    shared: Rc<RefCell<Shared>>,
}

impl TimerDebounce {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                debouncer: Debouncer::from_millis(delay_ms),
                timer: None,
                fired: None,
            })),
        }
    }

    /// Replace whatever is pending with `callback`.
    pub fn schedule(&self, callback: impl FnOnce() + 'static) {
        let delay = {
            let mut shared = self.shared.borrow_mut();
            shared.debouncer.schedule(Instant::now(), Box::new(callback));
            shared.debouncer.delay()
        };
        self.arm(delay.as_millis() as u32);
    }

    pub fn cancel(&self) {
        let mut shared = self.shared.borrow_mut();
        shared.debouncer.cancel();
        // dropping a Timeout clears it
        shared.timer = None;
    }

    pub fn is_pending(&self) -> bool {
        self.shared.borrow().debouncer.is_pending()
    }

    fn arm(&self, millis: u32) {
        let weak = Rc::downgrade(&self.shared);
        let timer = Timeout::new(millis, move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let now = Instant::now();
            let (due, remaining, finished) = {
                let mut inner = shared.borrow_mut();
                let running = inner.timer.take();
                let finished = std::mem::replace(&mut inner.fired, running);
                let due = inner.debouncer.poll(now);
                let remaining = inner
                    .debouncer
                    .deadline()
                    .map(|deadline| deadline.saturating_duration_since(now));
                (due, remaining, finished)
            };
            drop(finished);
            if let Some(callback) = due {
                callback();
                // the callback dropped the last handle; don't free our own closure
                if Rc::strong_count(&shared) == 1 {
                    if let Some(running) = shared.borrow_mut().fired.take() {
                        running.forget();
                    }
                }
            } else if let Some(remaining) = remaining {
                // timers can fire a little early
                TimerDebounce { shared }.arm(remaining.as_millis() as u32 + 1);
            }
        });
        self.shared.borrow_mut().timer = Some(timer);
    }
}
