//! Hand state handed from the detection loop to the render loop.
//!
//! The two loops run independently.  The detection side owns the only
//! [`SnapshotWriter`] and replaces the whole [`HandSnapshot`] at once; the
//! render side copies the latest record with [`SnapshotReader::load`].  A
//! reader may see a record that is one detection frame old, never a torn one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::gesture::Gesture;

// ════════════════════════════════════════════════════════════════════════════
// HandSnapshot
// ════════════════════════════════════════════════════════════════════════════

/// Normalized image position of the wrist, `(0.5, 0.5)` is frame centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandPosition {
    pub x: f32,
    pub y: f32,
}

impl Default for HandPosition {
    fn default() -> Self {
        HandPosition { x: 0.5, y: 0.5 }
    }
}

/// Whether the landmark source has come up yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrackingStatus {
    /// Source not open (still starting, or failed to open).
    #[default]
    Loading,
    Live,
}

/// Everything the integrator needs from the detector for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandSnapshot {
    pub gesture:  Gesture,
    /// Last seen hand position; kept as-is while no hand is visible.
    pub hand:     HandPosition,
    pub tracking: TrackingStatus,
    /// Number of detection frames processed so far.
    pub frame:    u64,
}

impl HandSnapshot {
    pub fn is_live(&self) -> bool {
        self.tracking == TrackingStatus::Live
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Cell
// ════════════════════════════════════════════════════════════════════════════

struct Shared<T> {
    value: Mutex<T>,
}

impl<T: Copy> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, T> {
        // T is plain data, a panicked writer cannot leave it half-written
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The single writing end.  Not `Clone`.
pub struct SnapshotWriter<T> {
    shared: Arc<Shared<T>>,
}

/// A reading end.  Cheap to clone.
pub struct SnapshotReader<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for SnapshotReader<T> {
    fn clone(&self) -> Self {
        SnapshotReader { shared: Arc::clone(&self.shared) }
    }
}

/// Create a cell holding `initial`.
pub fn snapshot_cell<T: Copy>(initial: T) -> (SnapshotWriter<T>, SnapshotReader<T>) {
    let shared = Arc::new(Shared { value: Mutex::new(initial) });
    (
        SnapshotWriter { shared: Arc::clone(&shared) },
        SnapshotReader { shared },
    )
}

impl<T: Copy> SnapshotWriter<T> {
    /// Replace the published record.
    pub fn publish(&self, value: T) {
        *self.shared.lock() = value;
    }

    /// The record most recently published.
    pub fn current(&self) -> T {
        *self.shared.lock()
    }

    /// Read, modify and republish in one step.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut guard = self.shared.lock();
        f(&mut *guard);
    }
}

impl<T: Copy> SnapshotReader<T> {
    pub fn load(&self) -> T {
        *self.shared.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn reader_sees_initial_value() {
        let (_w, r) = snapshot_cell(HandSnapshot::default());
        let s = r.load();
        assert_eq!(s.gesture, Gesture::None);
        assert_eq!(s.hand, HandPosition { x: 0.5, y: 0.5 });
        assert!(!s.is_live());
    }

    #[test]
    fn publish_replaces_whole_record() {
        let (w, r) = snapshot_cell(HandSnapshot::default());
        w.publish(HandSnapshot {
            gesture:  Gesture::Open,
            hand:     HandPosition { x: 0.1, y: 0.9 },
            tracking: TrackingStatus::Live,
            frame:    3,
        });
        let s = r.load();
        assert_eq!(s.gesture, Gesture::Open);
        assert_eq!(s.frame, 3);
        assert!(s.is_live());
    }

    #[test]
    fn update_keeps_untouched_fields() {
        let (w, r) = snapshot_cell(HandSnapshot::default());
        w.update(|s| s.hand = HandPosition { x: 0.2, y: 0.3 });
        w.update(|s| s.gesture = Gesture::Closed);
        let s = r.load();
        assert_eq!(s.hand, HandPosition { x: 0.2, y: 0.3 });
        assert_eq!(s.gesture, Gesture::Closed);
    }

    #[test]
    fn cross_thread_publish() {
        let (w, r) = snapshot_cell(0u64);
        let t = thread::spawn(move || {
            for i in 1..=1000 { w.publish(i); }
        });
        t.join().unwrap();
        assert_eq!(r.load(), 1000);
    }
}
