//! Data models for the task dialog presenters.
//!
//! This module contains the plain data the rest of the crate moves around:
//! - [`DialogDescriptor`]: the complete, validated dialog configuration
//! - [`DialogSelection`] / [`DialogResult`]: what a dismissed dialog reported
//! - [`DialogIcon`]: tagged icon selection resolved at the native boundary
//! - [`ProgressSnapshot`] / [`SharedProgress`]: producer/consumer progress state
//!
//! # Architecture Note
//!
//! The models carry no platform dependencies. The native layer consumes them
//! read-only when serializing the dialog configuration, and the callback
//! state machine consumes [`SharedProgress`] read-only on timer ticks.

pub mod descriptor;
pub mod progress;

pub use descriptor::{
    CommonButtons, CustomButton, DialogDescriptor, DialogFlags, DialogIcon, DialogResult,
    DialogSelection, RadioButton, WindowHandle,
};
pub use progress::{ProgressBarInfo, ProgressSnapshot, SharedProgress};
