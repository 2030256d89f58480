//! Poll suppression guards.
//!
//! Explicit instance state rather than module-level globals, so the
//! engine stays testable and `reset` has a documented lifecycle
//! (reconnect/logout). The spacing check is shared by every consumer of
//! one engine, which is what keeps two concurrently-open views from
//! double-fetching. It is a timestamp comparison, not a mutex: under
//! pathological latency two fetches can overlap.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

pub const POLL_INTERVAL: Duration = Duration::from_secs(12);
pub const MIN_FETCH_SPACING: Duration = Duration::from_secs(8);
pub const POST_MOVE_QUIET: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    DragInProgress,
    NotVisible,
    RecentMove,
    RecentFetch,
}

#[derive(Debug, Default)]
struct GuardTimes {
    last_fetch: Option<Instant>,
    last_move: Option<Instant>,
}

#[derive(Debug)]
pub struct SyncGuards {
    times: Mutex<GuardTimes>,
    dragging: AtomicBool,
    visible: AtomicBool,
}

impl SyncGuards {
    pub fn new() -> Self {
        Self {
            times: Mutex::new(GuardTimes::default()),
            dragging: AtomicBool::new(false),
            visible: AtomicBool::new(true),
        }
    }

    /// Decide whether a fetch may proceed. A forced fetch bypasses the
    /// visibility, quiet-period, and spacing checks but never the drag
    /// check.
    pub fn should_skip(&self, now: Instant, forced: bool) -> Option<SkipReason> {
        if self.dragging.load(Ordering::Acquire) {
            return Some(SkipReason::DragInProgress);
        }
        if forced {
            return None;
        }
        if !self.visible.load(Ordering::Acquire) {
            return Some(SkipReason::NotVisible);
        }

        let times = self.times.lock();
        if let Some(moved) = times.last_move {
            if now.duration_since(moved) < POST_MOVE_QUIET {
                return Some(SkipReason::RecentMove);
            }
        }
        if let Some(fetched) = times.last_fetch {
            if now.duration_since(fetched) < MIN_FETCH_SPACING {
                return Some(SkipReason::RecentFetch);
            }
        }
        None
    }

    pub fn note_fetch(&self, now: Instant) {
        self.times.lock().last_fetch = Some(now);
    }

    pub fn note_move(&self, now: Instant) {
        self.times.lock().last_move = Some(now);
    }

    pub fn set_dragging(&self, dragging: bool) {
        self.dragging.store(dragging, Ordering::Release);
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.load(Ordering::Acquire)
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Release);
    }

    /// Clear all history. Call on reconnect or logout.
    pub fn reset(&self) {
        *self.times.lock() = GuardTimes::default();
        self.dragging.store(false, Ordering::Release);
        self.visible.store(true, Ordering::Release);
    }
}

impl Default for SyncGuards {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_guards_allow_fetch() {
        let guards = SyncGuards::new();
        assert_eq!(guards.should_skip(Instant::now(), false), None);
    }

    #[test]
    fn test_spacing_guard() {
        let guards = SyncGuards::new();
        let base = Instant::now();

        guards.note_fetch(base);
        assert_eq!(
            guards.should_skip(base + Duration::from_secs(5), false),
            Some(SkipReason::RecentFetch)
        );
        assert_eq!(guards.should_skip(base + Duration::from_secs(8), false), None);
    }

    #[test]
    fn test_forced_bypasses_spacing_but_not_drag() {
        let guards = SyncGuards::new();
        let base = Instant::now();
        guards.note_fetch(base);

        assert_eq!(guards.should_skip(base + Duration::from_secs(1), true), None);

        guards.set_dragging(true);
        assert_eq!(
            guards.should_skip(base + Duration::from_secs(1), true),
            Some(SkipReason::DragInProgress)
        );
    }

    #[test]
    fn test_post_move_quiet_period() {
        let guards = SyncGuards::new();
        let base = Instant::now();

        guards.note_move(base);
        assert_eq!(
            guards.should_skip(base + Duration::from_secs(1), false),
            Some(SkipReason::RecentMove)
        );
        assert_eq!(guards.should_skip(base + Duration::from_secs(2), false), None);
    }

    #[test]
    fn test_visibility() {
        let guards = SyncGuards::new();
        guards.set_visible(false);
        assert_eq!(
            guards.should_skip(Instant::now(), false),
            Some(SkipReason::NotVisible)
        );

        guards.set_visible(true);
        assert_eq!(guards.should_skip(Instant::now(), false), None);
    }

    #[test]
    fn test_reset_clears_history() {
        let guards = SyncGuards::new();
        let base = Instant::now();
        guards.note_fetch(base);
        guards.note_move(base);
        guards.set_dragging(true);

        guards.reset();
        assert_eq!(guards.should_skip(base, false), None);
    }
}
