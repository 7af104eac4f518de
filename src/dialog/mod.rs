//! Dialog presenters and the notification state machine.
//!
//! Two presenters share one callback shape:
//! - [`TaskDialog`]: static modal dialog built from a
//!   [`DialogDescriptor`](crate::models::DialogDescriptor), relaying
//!   hyperlink clicks to an observer and returning the selection.
//! - [`ProgressDialog`]: modal dialog bound to a background
//!   [`Operation`](crate::operation::Operation), auto-dismissing on
//!   completion and propagating cancellation from the cancel button.

pub mod callback;
pub mod commands;
pub mod progress_dialog;
pub mod task_dialog;

pub use callback::{CallbackStatus, Notification, ProgressSession};
pub use commands::{DialogCommands, DialogElement, ProgressBarState};
pub use progress_dialog::{OperationBinding, ProgressDialog};
pub use task_dialog::TaskDialog;

use thiserror::Error;

/// Errors surfaced to presentation callers.
#[derive(Error, Debug)]
pub enum DialogError {
    /// The descriptor violates an invariant the native call cannot recover
    /// from; raised before any native resources are touched.
    #[error("invalid dialog configuration: {0}")]
    InvalidDescriptor(String),

    /// The native dialog call itself failed.
    #[error("native task dialog call failed with HRESULT {0:#010x}")]
    NativeCall(i32),

    /// The bound operation ended canceled. Distinct from a fault.
    #[error("background operation was canceled")]
    Canceled,

    /// The bound operation faulted; this is the operation's original error
    /// value, moved and never wrapped, so downcasts keep working.
    #[error(transparent)]
    Operation(anyhow::Error),

    /// Task dialogs only exist on Windows.
    #[error("task dialogs are not supported on this platform")]
    Unsupported,
}
