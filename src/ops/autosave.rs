use std::time::{Duration, Instant};

/// Default spacing between throttled saves while typing.
pub const THROTTLE_INTERVAL: Duration = Duration::from_secs(5);
/// Default quiet period after the last change before the final save.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_secs(5);

/// Coalesces a stream of text changes into occasional saves.
///
/// Throttle: while changes keep coming, at most one save per
/// `throttle` interval. Debounce: once changes stop for `debounce`, the
/// latest text is saved. There is no timer thread; the owner calls
/// [`Autosave::poll`] from its event loop and writes whatever text is handed
/// back. The latest text always wins, and text equal to what was last
/// handed out is never returned again.
#[derive(Debug, Clone)]
pub struct Autosave {
    throttle: Duration,
    debounce: Duration,
    last_throttle: Option<Instant>,
    last_change: Option<Instant>,
    pending: Option<String>,
    saved: Option<String>,
}

impl Default for Autosave {
    fn default() -> Self {
        Autosave::new(THROTTLE_INTERVAL, DEBOUNCE_INTERVAL)
    }
}

impl Autosave {
    pub fn new(throttle: Duration, debounce: Duration) -> Self {
        Autosave {
            throttle,
            debounce,
            last_throttle: None,
            last_change: None,
            pending: None,
            saved: None,
        }
    }

    /// Start from text that is already persisted.
    pub fn with_saved(mut self, text: impl Into<String>) -> Self {
        self.saved = Some(text.into());
        self
    }

    /// Record a change. Returns the text to save right away when the
    /// throttle interval has elapsed since the last throttled save.
    pub fn on_change(&mut self, text: &str, now: Instant) -> Option<String> {
        self.pending = Some(text.to_string());
        self.last_change = Some(now);
        let due = self
            .last_throttle
            .is_none_or(|t| now.duration_since(t) >= self.throttle);
        if due {
            self.last_throttle = Some(now);
            return self.take("throttle");
        }
        None
    }

    /// Returns the pending text once no change arrived for the debounce
    /// interval.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let quiet = self
            .last_change
            .is_some_and(|t| now.duration_since(t) >= self.debounce);
        if quiet { self.take("debounce") } else { None }
    }

    /// Hand out the pending text regardless of timing (e.g. on exit).
    pub fn flush(&mut self) -> Option<String> {
        self.take("flush")
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn take(&mut self, reason: &str) -> Option<String> {
        let text = self.pending.take()?;
        if self.saved.as_deref() == Some(text.as_str()) {
            return None;
        }
        tracing::debug!("[{}] notes due for saving ({} bytes)", reason, text.len());
        self.saved = Some(text.clone());
        Some(text)
    }
}
