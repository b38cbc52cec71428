use std::time::{Duration, Instant};

/// Trailing-edge debounce: one pending item, replaced by every newer event.
///
/// Time is supplied by the caller so a tick loop (or a test) decides when the
/// deadline is checked.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Zero delay means events should be handled as they arrive.
    pub fn is_immediate(&self) -> bool {
        self.delay.is_zero()
    }

    pub fn schedule(&mut self, now: Instant, item: T) {
        self.pending = Some((now + self.delay, item));
    }

    /// Take the pending item once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((deadline, _)) if deadline <= now => self.pending.take().map(|(_, item)| item),
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
