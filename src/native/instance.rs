//! Live dialog handle backed by the native control messages.

use windows_sys::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows_sys::Win32::UI::Controls::{
    TDM_CLICK_BUTTON, TDM_SET_ELEMENT_TEXT, TDM_SET_MARQUEE_PROGRESS_BAR,
    TDM_SET_PROGRESS_BAR_POS, TDM_SET_PROGRESS_BAR_RANGE, TDM_SET_PROGRESS_BAR_STATE,
};
use windows_sys::Win32::UI::WindowsAndMessaging::SendMessageW;

use crate::dialog::commands::{DialogCommands, DialogElement, ProgressBarState};
use crate::models::{DialogResult, WindowHandle};
use crate::native::wire;

/// [`DialogCommands`] implementation over the dialog's window handle.
///
/// Created fresh for each notification-callback invocation; the handle is
/// only valid while the dialog window exists, so instances never outlive the
/// callback that received them.
pub struct NativeDialogInstance {
    hwnd: HWND,
}

impl NativeDialogInstance {
    pub(crate) fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }

    fn send(&self, msg: i32, wparam: WPARAM, lparam: LPARAM) {
        // All TDM messages are fire-and-forget; the dialog processes them
        // synchronously inside this SendMessageW call.
        unsafe {
            SendMessageW(self.hwnd, msg as u32, wparam, lparam);
        }
    }
}

impl DialogCommands for NativeDialogInstance {
    fn window(&self) -> WindowHandle {
        WindowHandle(self.hwnd as isize)
    }

    fn start_marquee(&self) {
        self.send(TDM_SET_MARQUEE_PROGRESS_BAR, 1, 0);
    }

    fn stop_marquee(&self) {
        self.send(TDM_SET_MARQUEE_PROGRESS_BAR, 0, 0);
    }

    fn set_progress_range(&self, min: i32, max: i32) {
        self.send(
            TDM_SET_PROGRESS_BAR_RANGE,
            0,
            wire::pack_progress_range(min, max),
        );
    }

    fn set_progress_position(&self, position: i32) {
        self.send(TDM_SET_PROGRESS_BAR_POS, position as WPARAM, 0);
    }

    fn set_progress_state(&self, state: ProgressBarState) {
        self.send(TDM_SET_PROGRESS_BAR_STATE, state as WPARAM, 0);
    }

    fn update_element_text(&self, element: DialogElement, text: &str) {
        let wide = wire::to_wide(text);
        // The dialog copies the string before SendMessageW returns, so the
        // buffer only has to live for the duration of the call.
        self.send(TDM_SET_ELEMENT_TEXT, element as WPARAM, wide.as_ptr() as LPARAM);
    }

    fn click_button(&self, button: DialogResult) {
        self.send(TDM_CLICK_BUTTON, button.raw() as WPARAM, 0);
    }
}
