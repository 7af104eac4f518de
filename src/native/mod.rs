//! Native boundary: serialization of the dialog descriptor into the Win32
//! call shape, the live-dialog message commands, and the theming activation
//! scope.
//!
//! Everything FFI-touching is Windows-only; [`wire`] keeps the pure packing
//! rules portable so they stay under test everywhere.

pub mod wire;

#[cfg(windows)]
mod config;
#[cfg(windows)]
mod instance;
#[cfg(windows)]
mod theming;

#[cfg(windows)]
pub(crate) use config::show_modal;
#[cfg(windows)]
pub use instance::NativeDialogInstance;
