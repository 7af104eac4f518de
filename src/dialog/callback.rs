//! Notification-callback state machine.
//!
//! The native dialog invokes its callback synchronously, on the thread that
//! is blocked inside the modal call, for every event the dialog produces.
//! The handlers here are pure functions over an explicit session object, so
//! the whole protocol can be tested without a dialog window: the native
//! trampoline decodes the raw `(msg, wparam, lparam)` triple into a
//! [`Notification`], calls the handler, and translates the returned
//! [`CallbackStatus`] back into an HRESULT.
//!
//! Two contracts matter on this path:
//! - the handler must never block waiting on the background operation (the
//!   operation may itself need the calling thread's cooperation), so
//!   cancellation is requested here and only observed on later timer ticks;
//! - the "is the operation finished" question is answered by one
//!   [`StatusProbe::status`] snapshot per notification, which both the timer
//!   completion check and the cancel veto read.

use crate::dialog::commands::{DialogCommands, DialogElement};
use crate::models::{DialogResult, ProgressSnapshot, SharedProgress};
use crate::operation::{CancelSource, OperationStatus, StatusProbe};

/// Decoded dialog notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Created,
    Navigated,
    /// A button was clicked; the dialog closes with this id unless vetoed.
    ButtonClicked(i32),
    /// A hyperlink in one of the text areas was activated.
    HyperlinkClicked(String),
    /// Periodic tick; milliseconds since creation or the last timer reset.
    Timer(u32),
    Destroyed,
    RadioButtonClicked(i32),
    DialogConstructed,
    VerificationClicked(bool),
    Help,
    ExpandoButtonClicked(bool),
    /// Anything this crate does not model; always ignored.
    Other(i32),
}

/// Handler verdict returned across the native boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackStatus {
    /// `S_OK`: let the dialog continue with its default handling.
    Proceed,
    /// `S_FALSE`: veto a close-triggering event, keeping the dialog open.
    Veto,
}

impl CallbackStatus {
    pub fn as_hresult(self) -> i32 {
        match self {
            CallbackStatus::Proceed => 0, // S_OK
            CallbackStatus::Veto => 1,    // S_FALSE
        }
    }
}

/// Observer invoked with the raw link text of a clicked hyperlink.
pub type HyperlinkObserver<'a> = &'a mut dyn FnMut(&str);

/// Mutable state of one task-bound dialog session.
///
/// Borrowed by the native trampoline for the duration of the modal call and
/// passed by reference into [`handle_progress_notification`] on every event.
pub struct ProgressSession<'a> {
    /// The bound background operation.
    pub operation: &'a dyn StatusProbe,
    /// Cancellation sink signaled by the cancel button, if any.
    pub cancel: Option<&'a CancelSource>,
    /// Live progress snapshot pushed to the dialog elements, if any.
    pub progress: Option<&'a SharedProgress>,
    /// Whether the dialog was configured with a marquee progress bar.
    pub marquee: bool,
    /// Hyperlink observer, if hyperlinks are enabled.
    pub hyperlink: Option<HyperlinkObserver<'a>>,
}

/// Drive one notification through the task-bound state machine.
pub fn handle_progress_notification(
    dlg: &dyn DialogCommands,
    notification: &Notification,
    session: &mut ProgressSession<'_>,
) -> CallbackStatus {
    // Element updates ride on creation and on every timer tick, independent
    // of the completion bookkeeping below.
    if matches!(notification, Notification::Created | Notification::Timer(_)) {
        if let Some(progress) = session.progress {
            push_progress(dlg, &progress.snapshot());
        }
    }

    match notification {
        Notification::Created => {
            if session.marquee {
                dlg.start_marquee();
            }
            CallbackStatus::Proceed
        }

        Notification::Timer(_) => {
            let status = session.operation.status();
            if status.is_terminal() {
                // Dismiss by simulating a click; the ButtonClicked handler
                // decides whether the close is allowed.
                let button = if status == OperationStatus::Canceled {
                    DialogResult::Cancel
                } else {
                    // Completed or faulted; the outcome is unwrapped after
                    // the modal call returns.
                    DialogResult::Ok
                };
                tracing::trace!(?status, ?button, "operation finished, dismissing dialog");
                dlg.click_button(button);
            } else if session.marquee {
                // Cosmetic reset keeps the marquee animation alive.
                dlg.set_progress_position(0);
            }
            CallbackStatus::Proceed
        }

        Notification::ButtonClicked(id) if *id == DialogResult::Cancel.raw() => {
            if session.operation.status() == OperationStatus::Canceled {
                CallbackStatus::Proceed
            } else {
                if let Some(cancel) = session.cancel {
                    cancel.request();
                }
                // Keep the dialog open until the operation actually stops; a
                // later timer tick observes the terminal state and clicks
                // cancel again.
                CallbackStatus::Veto
            }
        }

        Notification::HyperlinkClicked(link) => {
            tracing::debug!(link, "hyperlink clicked");
            if let Some(observer) = session.hyperlink.as_mut() {
                observer(link);
            }
            CallbackStatus::Proceed
        }

        _ => CallbackStatus::Proceed,
    }
}

/// Drive one notification through the static-dialog handler, which only
/// relays hyperlink clicks.
pub fn handle_plain_notification(
    notification: &Notification,
    hyperlink: Option<&mut dyn FnMut(&str)>,
) -> CallbackStatus {
    if let Notification::HyperlinkClicked(link) = notification {
        tracing::debug!(link, "hyperlink clicked");
        if let Some(observer) = hyperlink {
            observer(link);
        }
    }
    CallbackStatus::Proceed
}

/// Push the set fields of a snapshot to the dialog elements.
///
/// Range is always sent before position so the position lands inside the
/// freshly established range.
fn push_progress(dlg: &dyn DialogCommands, snapshot: &ProgressSnapshot) {
    if let Some(text) = &snapshot.main_instruction {
        dlg.update_element_text(DialogElement::MainInstruction, text);
    }
    if let Some(text) = &snapshot.content {
        dlg.update_element_text(DialogElement::Content, text);
    }
    if let Some(bar) = &snapshot.progress_bar {
        dlg.set_progress_range(bar.min, bar.max);
        dlg.set_progress_position(bar.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_hresult() {
        assert_eq!(CallbackStatus::Proceed.as_hresult(), 0);
        assert_eq!(CallbackStatus::Veto.as_hresult(), 1);
    }

    #[test]
    fn test_plain_handler_relays_hyperlinks_only() {
        let mut seen = Vec::new();
        let mut observer = |link: &str| seen.push(link.to_string());

        let status = handle_plain_notification(
            &Notification::HyperlinkClicked("https://example.com".to_string()),
            Some(&mut observer),
        );
        assert_eq!(status, CallbackStatus::Proceed);

        let status = handle_plain_notification(&Notification::Created, Some(&mut observer));
        assert_eq!(status, CallbackStatus::Proceed);

        assert_eq!(seen, vec!["https://example.com".to_string()]);
    }

    #[test]
    fn test_plain_handler_without_observer_is_noop() {
        let status = handle_plain_notification(
            &Notification::HyperlinkClicked("link".to_string()),
            None,
        );
        assert_eq!(status, CallbackStatus::Proceed);
    }
}
