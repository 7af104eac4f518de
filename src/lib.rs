// XTaskDialog - Modal Win32 task dialogs bound to cancellable background operations
//
// This is the library crate; the native Windows boundary lives under
// src/native and everything else is platform-independent.

pub mod dialog;
pub mod logging;
pub mod models;
pub mod native;
pub mod operation;

// Re-export commonly used types for convenience
pub use dialog::{
    CallbackStatus, DialogCommands, DialogElement, DialogError, Notification, OperationBinding,
    ProgressBarState, ProgressDialog, ProgressSession, TaskDialog,
};
pub use models::{
    CommonButtons, CustomButton, DialogDescriptor, DialogFlags, DialogIcon, DialogResult,
    DialogSelection, ProgressBarInfo, ProgressSnapshot, RadioButton, SharedProgress, WindowHandle,
};
pub use operation::{
    CancelSource, CancelToken, Operation, OperationStatus, Outcome, StatusProbe,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
