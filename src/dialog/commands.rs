//! Command surface of a live dialog.
//!
//! While the modal call is blocked, the only way to mutate the dialog is
//! through the small set of control messages the native layer accepts. This
//! trait abstracts that surface so the notification handlers can be driven
//! against a recording implementation in tests, with the real
//! `SendMessageW`-backed instance living in the native layer.

use crate::models::{DialogResult, WindowHandle};

/// Dialog text element addressable by the update command.
///
/// Values match the native `TDE_*` element ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogElement {
    Content = 0,
    ExpandedInformation = 1,
    Footer = 2,
    MainInstruction = 3,
}

/// Visual state of the determinate progress bar.
///
/// Values match the native `PBST_*` states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBarState {
    Normal = 1,
    Error = 2,
    Paused = 3,
}

/// Commands available against a live dialog window.
///
/// An implementation is created fresh for each notification-callback
/// invocation and must not outlive it; the underlying window handle is only
/// valid while the dialog exists.
pub trait DialogCommands {
    /// Raw handle of the dialog window.
    fn window(&self) -> WindowHandle;

    /// Switch the progress bar into indeterminate marquee animation.
    fn start_marquee(&self);

    /// Stop the marquee animation.
    fn stop_marquee(&self);

    /// Set the determinate progress bar range.
    fn set_progress_range(&self, min: i32, max: i32);

    /// Set the determinate progress bar position.
    fn set_progress_position(&self, position: i32);

    /// Set the progress bar visual state.
    fn set_progress_state(&self, state: ProgressBarState);

    /// Replace the text of a dialog element.
    fn update_element_text(&self, element: DialogElement, text: &str);

    /// Simulate the user clicking a button, dismissing the dialog if the
    /// click is not vetoed.
    fn click_button(&self, button: DialogResult);
}
