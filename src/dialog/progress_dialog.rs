//! Task-bound modal dialog orchestrator.
//!
//! Decides whether a dialog is shown at all, binds the background operation
//! into the notification state machine while it is, and unwraps the
//! operation's outcome afterward.

use std::time::Duration;

use crate::dialog::DialogError;
use crate::models::{SharedProgress, WindowHandle};
use crate::operation::{CancelSource, Operation, OperationStatus, Outcome, StatusProbe};

#[cfg(windows)]
use crate::dialog::callback::{ProgressSession, handle_progress_notification};

/// How long a value-yielding presentation waits for near-immediate completion
/// before bothering to show a dialog.
const GRACE_PERIOD: Duration = Duration::from_millis(200);

/// One background operation plus its optional collaborators, bound to exactly
/// one dialog presentation.
pub struct OperationBinding<T> {
    pub operation: Operation<T>,
    pub cancel: Option<CancelSource>,
    pub progress: Option<SharedProgress>,
}

impl<T> OperationBinding<T> {
    pub fn new(operation: Operation<T>) -> Self {
        Self {
            operation,
            cancel: None,
            progress: None,
        }
    }

    /// Attach the cancellation sink the cancel button signals.
    pub fn with_cancel(mut self, cancel: CancelSource) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Attach the progress snapshot pushed to the dialog on timer ticks.
    pub fn with_progress(mut self, progress: SharedProgress) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// A modal progress dialog bound to a background operation.
///
/// The dialog shows a cancel button and either a marquee or a determinate
/// progress bar, and dismisses itself once the operation reaches a terminal
/// state. Clicking cancel signals the bound [`CancelSource`] and keeps the
/// dialog open until the operation actually stops.
pub struct ProgressDialog {
    parent: WindowHandle,
    main_instruction: String,
    content: String,

    /// Window title; defaults to the parent window's title when unset.
    pub window_title: Option<String>,
    /// Enable hyperlinks in the dialog text areas.
    pub enable_hyperlinks: bool,
    /// Marquee (indeterminate) progress bar instead of a ranged one.
    pub marquee: bool,
    /// Mirror the dialog layout for right-to-left reading order.
    pub rtl_layout: bool,

    hyperlink_clicked: Option<Box<dyn FnMut(&str)>>,
}

impl ProgressDialog {
    pub fn new(
        parent: WindowHandle,
        main_instruction: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            parent,
            main_instruction: main_instruction.into(),
            content: content.into(),
            window_title: None,
            enable_hyperlinks: false,
            marquee: true,
            rtl_layout: false,
            hyperlink_clicked: None,
        }
    }

    /// Install the hyperlink observer. Only invoked when
    /// [`enable_hyperlinks`](Self::enable_hyperlinks) is set.
    pub fn on_hyperlink_clicked<F>(&mut self, observer: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.hyperlink_clicked = Some(Box::new(observer));
    }

    /// Present the dialog for an operation without a produced value.
    ///
    /// When the operation already finished, no dialog is shown; a preserved
    /// fault or cancellation is surfaced immediately.
    ///
    /// # Errors
    /// - [`DialogError::Operation`] carrying the operation's original error
    /// - [`DialogError::Canceled`] when the operation ended canceled
    /// - [`DialogError::NativeCall`] / [`DialogError::Unsupported`] from the
    ///   native boundary
    pub fn show(&mut self, binding: OperationBinding<()>) -> Result<(), DialogError> {
        let OperationBinding {
            operation,
            cancel,
            progress,
        } = binding;

        if operation.is_finished() {
            tracing::debug!("operation already finished, skipping progress dialog");
            return unwrap_outcome(operation.join()).map(|_| ());
        }

        self.present(&operation, cancel.as_ref(), progress.as_ref())?;

        match operation.status() {
            // Dismissed without the operation finishing (native layer closed
            // the dialog on its own); nothing to unwrap.
            OperationStatus::Running => Ok(()),
            _ => unwrap_outcome(operation.join()).map(|_| ()),
        }
    }

    /// Present the dialog for an operation producing a value, returning that
    /// value once the operation finishes.
    ///
    /// The dialog is skipped when the operation already finished, and a
    /// short grace period (200 ms) is granted before presenting so
    /// near-immediate completions never flash a dialog.
    ///
    /// # Errors
    /// Same taxonomy as [`show`](Self::show); a faulted operation's error
    /// comes back with its original identity intact.
    pub fn show_with_result<T>(&mut self, binding: OperationBinding<T>) -> Result<T, DialogError> {
        let OperationBinding {
            operation,
            cancel,
            progress,
        } = binding;

        if operation.is_finished() {
            tracing::debug!("operation already finished, skipping progress dialog");
            return unwrap_outcome(operation.join());
        }

        // Don't display the dialog only to immediately close it again.
        if operation.wait_timeout(GRACE_PERIOD) {
            tracing::debug!("operation finished within grace period, skipping progress dialog");
            return unwrap_outcome(operation.join());
        }

        self.present(&operation, cancel.as_ref(), progress.as_ref())?;

        unwrap_outcome(operation.join())
    }

    #[cfg(windows)]
    fn present<T>(
        &mut self,
        operation: &Operation<T>,
        cancel: Option<&CancelSource>,
        progress: Option<&SharedProgress>,
    ) -> Result<(), DialogError> {
        use crate::models::{CommonButtons, DialogDescriptor, DialogFlags};

        let mut descriptor = DialogDescriptor::new(
            self.parent,
            self.main_instruction.clone(),
            self.content.clone(),
        );
        descriptor.window_title = self.window_title.clone();
        descriptor.common_buttons = CommonButtons::CANCEL;
        descriptor.enable_hyperlinks = self.enable_hyperlinks;
        descriptor.rtl_layout = self.rtl_layout;

        let mut extra = DialogFlags::CALLBACK_TIMER;
        extra |= if self.marquee {
            DialogFlags::SHOW_MARQUEE_PROGRESS_BAR
        } else {
            DialogFlags::SHOW_PROGRESS_BAR
        };

        tracing::debug!(marquee = self.marquee, "showing progress dialog");

        let mut session = ProgressSession {
            operation,
            cancel,
            progress,
            marquee: self.marquee,
            hyperlink: self.hyperlink_clicked.as_deref_mut(),
        };
        let mut handler = |dlg: &dyn crate::dialog::DialogCommands,
                           notification: &crate::dialog::Notification| {
            handle_progress_notification(dlg, notification, &mut session)
        };

        crate::native::show_modal(&descriptor, extra, &mut handler)?;
        tracing::debug!("progress dialog dismissed");
        Ok(())
    }

    #[cfg(not(windows))]
    fn present<T>(
        &mut self,
        _operation: &Operation<T>,
        _cancel: Option<&CancelSource>,
        _progress: Option<&SharedProgress>,
    ) -> Result<(), DialogError> {
        tracing::debug!(
            parent = self.parent.0,
            main_instruction = %self.main_instruction,
            content = %self.content,
            "progress dialog unavailable on this platform"
        );
        Err(DialogError::Unsupported)
    }
}

/// Map a terminal outcome to the presentation result, preserving the
/// original fault value.
fn unwrap_outcome<T>(outcome: Outcome<T>) -> Result<T, DialogError> {
    match outcome {
        Outcome::Completed(value) => Ok(value),
        Outcome::Faulted(e) => Err(DialogError::Operation(e)),
        Outcome::Canceled => Err(DialogError::Canceled),
    }
}
