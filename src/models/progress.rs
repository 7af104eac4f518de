//! Progress snapshot shared between a background operation and the dialog
//! callback.
//!
//! The background task writes whatever it wants shown; the notification
//! callback reads the snapshot on dialog creation and on every timer tick and
//! pushes the non-empty fields to the dialog elements. Fields left as `None`
//! are never pushed, so the dialog keeps its initial text until the producer
//! has something to say.

use std::sync::{Arc, RwLock};

/// Progress bar range and position.
///
/// `min <= max` and `min <= position <= max` by convention; the dialog clamps
/// out-of-range positions itself, so the invariant is not enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressBarInfo {
    pub min: i32,
    pub max: i32,
    pub position: i32,
}

impl ProgressBarInfo {
    pub fn new(min: i32, max: i32, position: i32) -> Self {
        Self { min, max, position }
    }
}

/// What the dialog should currently display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Replacement for the main instruction, if any.
    pub main_instruction: Option<String>,
    /// Replacement for the content text, if any.
    pub content: Option<String>,
    /// Determinate progress bar state, if any.
    pub progress_bar: Option<ProgressBarInfo>,
}

/// Thread-safe handle to a [`ProgressSnapshot`].
///
/// Cloned into the background task as the writer side and borrowed by the
/// callback session as the reader side. Reads take a whole-snapshot clone
/// under the lock so one timer tick never observes a half-written update.
#[derive(Debug, Clone, Default)]
pub struct SharedProgress {
    inner: Arc<RwLock<ProgressSnapshot>>,
}

impl SharedProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole snapshot.
    pub fn set(&self, snapshot: ProgressSnapshot) {
        *self.inner.write().unwrap() = snapshot;
    }

    /// Mutate the snapshot in place under the lock.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut ProgressSnapshot),
    {
        let mut guard = self.inner.write().unwrap();
        f(&mut guard);
    }

    pub fn set_main_instruction(&self, text: impl Into<String>) {
        self.update(|s| s.main_instruction = Some(text.into()));
    }

    pub fn set_content(&self, text: impl Into<String>) {
        self.update(|s| s.content = Some(text.into()));
    }

    pub fn set_progress_bar(&self, min: i32, max: i32, position: i32) {
        self.update(|s| s.progress_bar = Some(ProgressBarInfo::new(min, max, position)));
    }

    /// Point-in-time copy of the current snapshot.
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.inner.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_empty() {
        let progress = SharedProgress::new();
        let snapshot = progress.snapshot();

        assert!(snapshot.main_instruction.is_none());
        assert!(snapshot.content.is_none());
        assert!(snapshot.progress_bar.is_none());
    }

    #[test]
    fn test_field_updates_are_visible_through_clones() {
        let progress = SharedProgress::new();
        let writer = progress.clone();

        writer.set_content("Copying files...");
        writer.set_progress_bar(0, 100, 50);

        let snapshot = progress.snapshot();
        assert_eq!(snapshot.content.as_deref(), Some("Copying files..."));
        assert_eq!(snapshot.progress_bar, Some(ProgressBarInfo::new(0, 100, 50)));
        assert!(snapshot.main_instruction.is_none());
    }

    #[test]
    fn test_set_replaces_whole_snapshot() {
        let progress = SharedProgress::new();
        progress.set_main_instruction("Working");

        progress.set(ProgressSnapshot {
            content: Some("Done".to_string()),
            ..ProgressSnapshot::default()
        });

        let snapshot = progress.snapshot();
        assert!(snapshot.main_instruction.is_none());
        assert_eq!(snapshot.content.as_deref(), Some("Done"));
    }
}
