//! Typewriter reveal cursor.
//!
//! A [`RevealCursor`] is a progress counter over the characters of one
//! disclosure node. It waits for a short pre-delay, then exposes one more
//! character every `per_char` interval until the whole text is visible.
//!
//! The cursor owns no timer. Callers drive it with [`RevealCursor::advance`]
//! and ask [`RevealCursor::next_deadline`] how long to wait before the next
//! tick, which turns the reveal into a self-rescheduling chain: each tick
//! schedules the next one, and the chain ends when `next_deadline` returns
//! `None`. Cancelling a reveal is just dropping the cursor.
//!
//! ```text
//! elapsed:   0 ........ delay ... +per_char ... +2·per_char ... total·per_char
//! visible:   0            0          1              2              total
//! ```

use crate::config::TypewriterConfig;
use std::time::Duration;

/// Default pause before the first character appears.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);
/// Default interval between characters.
pub const DEFAULT_PER_CHAR: Duration = Duration::from_millis(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTiming {
    pub delay: Duration,
    pub per_char: Duration,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            per_char: DEFAULT_PER_CHAR,
        }
    }
}

impl RevealTiming {
    /// A zero speed falls back to the default; a stalled cursor would never
    /// complete.
    pub fn from_config(config: &TypewriterConfig) -> Self {
        let per_char = if config.speed_ms > 0 {
            Duration::from_millis(config.speed_ms)
        } else {
            DEFAULT_PER_CHAR
        };
        Self {
            delay: Duration::from_millis(config.delay_ms),
            per_char,
        }
    }

    /// Total time from start until `chars` characters are visible.
    pub fn duration_for(&self, chars: usize) -> Duration {
        self.delay + self.per_char.saturating_mul(chars.min(u32::MAX as usize) as u32)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealCursor {
    total: usize,
    visible: usize,
    elapsed: Duration,
    timing: RevealTiming,
}

impl RevealCursor {
    pub fn new(total: usize, timing: RevealTiming) -> Self {
        Self {
            total,
            visible: 0,
            elapsed: Duration::ZERO,
            timing,
        }
    }

    /// Cursor sized to the character count of `text`.
    pub fn for_text(text: &str, timing: RevealTiming) -> Self {
        Self::new(text.chars().count(), timing)
    }

    /// Move the clock forward by `dt`. The visible count never decreases.
    pub fn advance(&mut self, dt: Duration) {
        if self.is_complete() {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        self.visible = self.visible.max(self.visible_at(self.elapsed));
    }

    /// Skip straight to the end.
    pub fn finish(&mut self) {
        self.elapsed = self.elapsed.max(self.timing.duration_for(self.total));
        self.visible = self.total;
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn timing(&self) -> RevealTiming {
        self.timing
    }

    pub fn has_started(&self) -> bool {
        self.elapsed >= self.timing.delay
    }

    pub fn is_complete(&self) -> bool {
        self.has_started() && self.visible >= self.total
    }

    /// Time until the next character appears, or `None` once complete.
    pub fn next_deadline(&self) -> Option<Duration> {
        if self.is_complete() {
            return None;
        }
        let next_at = self.timing.duration_for(self.visible + 1);
        let target = if self.total == 0 {
            self.timing.delay
        } else {
            next_at
        };
        Some(target.saturating_sub(self.elapsed))
    }

    fn visible_at(&self, elapsed: Duration) -> usize {
        let Some(typing) = elapsed.checked_sub(self.timing.delay) else {
            return 0;
        };
        if self.timing.per_char.is_zero() {
            return self.total;
        }
        let typed = typing.as_nanos() / self.timing.per_char.as_nanos();
        usize::try_from(typed).unwrap_or(usize::MAX).min(self.total)
    }
}
