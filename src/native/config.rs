//! Descriptor serialization and the modal dialog call.
//!
//! Translates a validated [`DialogDescriptor`] into the exact
//! `TASKDIALOGCONFIG` layout, invokes `TaskDialogIndirect`, and routes every
//! native notification through the caller's handler. All heap storage the
//! native call borrows (UTF-16 strings, button arrays) is owned by a
//! [`ConfigArena`] on this stack frame, so it is released on every exit path
//! by ownership alone.

use std::panic::{AssertUnwindSafe, catch_unwind};

use windows_sys::core::PCWSTR;
use windows_sys::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows_sys::Win32::UI::Controls::{
    TASKDIALOG_BUTTON, TASKDIALOGCONFIG, TDN_BUTTON_CLICKED, TDN_CREATED, TDN_DESTROYED,
    TDN_DIALOG_CONSTRUCTED, TDN_EXPANDO_BUTTON_CLICKED, TDN_HELP, TDN_HYPERLINK_CLICKED,
    TDN_NAVIGATED, TDN_RADIO_BUTTON_CLICKED, TDN_TIMER, TDN_VERIFICATION_CLICKED,
    TaskDialogIndirect,
};
use windows_sys::Win32::UI::WindowsAndMessaging::{GetWindowTextLengthW, GetWindowTextW};

use crate::dialog::callback::{CallbackStatus, Notification};
use crate::dialog::commands::DialogCommands;
use crate::dialog::DialogError;
use crate::models::{DialogDescriptor, DialogFlags, DialogIcon, DialogResult, DialogSelection, WindowHandle};
use crate::native::instance::NativeDialogInstance;
use crate::native::theming::ThemingScope;
use crate::native::wire;

const S_OK: i32 = 0;

/// Owns every buffer the native config points into.
///
/// Interned strings stay pinned because only the inner buffers are borrowed;
/// growing the outer vectors moves the `Vec` headers, not the heap data.
/// Button arrays must be fully populated before their pointer is taken.
#[derive(Default)]
struct ConfigArena {
    strings: Vec<Vec<u16>>,
    custom_buttons: Vec<TASKDIALOG_BUTTON>,
    radio_buttons: Vec<TASKDIALOG_BUTTON>,
}

impl ConfigArena {
    fn intern(&mut self, text: &str) -> PCWSTR {
        self.strings.push(wire::to_wide(text));
        self.strings.last().unwrap().as_ptr()
    }

    fn intern_opt(&mut self, text: Option<&str>) -> PCWSTR {
        match text {
            Some(text) => self.intern(text),
            None => std::ptr::null(),
        }
    }
}

struct CallbackCtx<'a> {
    handler: &'a mut dyn FnMut(&dyn DialogCommands, &Notification) -> CallbackStatus,
}

/// Show the dialog modally, blocking until dismissal.
///
/// `extra_flags` carries the session-level bits the presenters add on top of
/// the descriptor (callback timer, progress bar mode).
pub(crate) fn show_modal(
    descriptor: &DialogDescriptor,
    extra_flags: DialogFlags,
    handler: &mut dyn FnMut(&dyn DialogCommands, &Notification) -> CallbackStatus,
) -> Result<DialogSelection, DialogError> {
    let mut arena = ConfigArena::default();

    // The struct layout is fixed; cbSize mismatches make the native call
    // reject the config outright.
    let mut config: TASKDIALOGCONFIG = unsafe { std::mem::zeroed() };
    config.cbSize = std::mem::size_of::<TASKDIALOGCONFIG>() as u32;
    config.hwndParent = descriptor.parent.0 as HWND;
    config.dwCommonButtons = descriptor.common_buttons.bits() as i32;
    config.nDefaultButton = descriptor.default_button;

    let title = match &descriptor.window_title {
        Some(title) => title.clone(),
        None => parent_window_title(descriptor.parent),
    };
    config.pszWindowTitle = arena.intern(&title);
    config.pszMainInstruction = arena.intern(&descriptor.main_instruction);
    config.pszContent = arena.intern(&descriptor.content);

    // Icon union: only one interpretation is valid at a time; the matching
    // USE_HICON flag comes out of descriptor.flags().
    match descriptor.icon {
        DialogIcon::None => {}
        DialogIcon::ResourceId(id) => config.Anonymous1.pszMainIcon = make_int_resource(id),
        DialogIcon::Handle(handle) => config.Anonymous1.hMainIcon = handle as _,
    }

    // Optional sections: text pointers and their dependent fields are only
    // written when the section exists, matching the flag assembly.
    config.pszVerificationText = arena.intern_opt(descriptor.verification_text.as_deref());

    if let Some(footer) = &descriptor.footer_text {
        config.pszFooter = arena.intern(footer);
        match descriptor.footer_icon {
            DialogIcon::None => {}
            DialogIcon::ResourceId(id) => config.Anonymous2.pszFooterIcon = make_int_resource(id),
            DialogIcon::Handle(handle) => config.Anonymous2.hFooterIcon = handle as _,
        }
    }

    if let Some(info) = &descriptor.expanded_information {
        config.pszExpandedInformation = arena.intern(info);
        config.pszExpandedControlText = arena.intern_opt(descriptor.expanded_text.as_deref());
        config.pszCollapsedControlText = arena.intern_opt(descriptor.collapsed_text.as_deref());
    }

    if !descriptor.custom_buttons.is_empty() {
        for button in &descriptor.custom_buttons {
            let caption = arena.intern(&button.caption);
            arena.custom_buttons.push(TASKDIALOG_BUTTON {
                nButtonID: button.id,
                pszButtonText: caption,
            });
        }
        config.cButtons = arena.custom_buttons.len() as u32;
        config.pButtons = arena.custom_buttons.as_ptr();
    }

    if !descriptor.radio_buttons.is_empty() {
        for button in &descriptor.radio_buttons {
            let caption = arena.intern(&button.caption);
            arena.radio_buttons.push(TASKDIALOG_BUTTON {
                nButtonID: button.id,
                pszButtonText: caption,
            });
        }
        config.cRadioButtons = arena.radio_buttons.len() as u32;
        config.pRadioButtons = arena.radio_buttons.as_ptr();
    }

    config.dwFlags = (descriptor.flags() | extra_flags).bits() as i32;

    let mut ctx = CallbackCtx { handler };
    config.pfCallback = Some(notification_trampoline);
    config.lpCallbackData = &mut ctx as *mut CallbackCtx as isize;

    let mut button = 0i32;
    let mut radio_button = 0i32;
    let mut verification_checked = 0i32;

    let hr = {
        let _theming = ThemingScope::activate();
        unsafe {
            TaskDialogIndirect(
                &config,
                &mut button,
                &mut radio_button,
                &mut verification_checked,
            )
        }
    };

    if hr < 0 {
        tracing::warn!(hresult = format_args!("{hr:#010x}"), "TaskDialogIndirect failed");
        return Err(DialogError::NativeCall(hr));
    }

    Ok(DialogSelection {
        result: DialogResult::from_raw(button),
        radio_button: (radio_button != 0).then_some(radio_button),
        verification_checked: verification_checked != 0,
    })
}

/// The raw callback handed to the native dialog.
///
/// Decodes the notification, routes it through the session handler, and
/// converts any panic into a plain S_OK so no unwind ever crosses the
/// native boundary.
unsafe extern "system" fn notification_trampoline(
    hwnd: HWND,
    msg: i32,
    wparam: WPARAM,
    lparam: LPARAM,
    refdata: isize,
) -> i32 {
    let status = catch_unwind(AssertUnwindSafe(|| {
        let ctx = unsafe { &mut *(refdata as *mut CallbackCtx) };
        let instance = NativeDialogInstance::new(hwnd);
        let notification = unsafe { decode_notification(msg, wparam, lparam) };
        (ctx.handler)(&instance, &notification).as_hresult()
    }));

    match status {
        Ok(hr) => hr,
        Err(_) => {
            tracing::error!("dialog notification handler panicked");
            S_OK
        }
    }
}

unsafe fn decode_notification(msg: i32, wparam: WPARAM, lparam: LPARAM) -> Notification {
    match msg {
        TDN_CREATED => Notification::Created,
        TDN_NAVIGATED => Notification::Navigated,
        TDN_BUTTON_CLICKED => Notification::ButtonClicked(wparam as i32),
        TDN_HYPERLINK_CLICKED => {
            Notification::HyperlinkClicked(unsafe { wide_ptr_to_string(lparam as *const u16) })
        }
        TDN_TIMER => Notification::Timer(wparam as u32),
        TDN_DESTROYED => Notification::Destroyed,
        TDN_RADIO_BUTTON_CLICKED => Notification::RadioButtonClicked(wparam as i32),
        TDN_DIALOG_CONSTRUCTED => Notification::DialogConstructed,
        TDN_VERIFICATION_CLICKED => Notification::VerificationClicked(wparam != 0),
        TDN_HELP => Notification::Help,
        TDN_EXPANDO_BUTTON_CLICKED => Notification::ExpandoButtonClicked(wparam != 0),
        other => Notification::Other(other),
    }
}

unsafe fn wide_ptr_to_string(ptr: *const u16) -> String {
    if ptr.is_null() {
        return String::new();
    }
    let mut len = 0usize;
    while unsafe { *ptr.add(len) } != 0 {
        len += 1;
    }
    String::from_utf16_lossy(unsafe { std::slice::from_raw_parts(ptr, len) })
}

/// MAKEINTRESOURCE: a resource id smuggled through a string pointer.
fn make_int_resource(id: i32) -> PCWSTR {
    id as u16 as usize as PCWSTR
}

fn parent_window_title(parent: WindowHandle) -> String {
    if parent.is_null() {
        return String::new();
    }
    let hwnd = parent.0 as HWND;
    let len = unsafe { GetWindowTextLengthW(hwnd) };
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u16; len as usize + 1];
    let copied = unsafe { GetWindowTextW(hwnd, buf.as_mut_ptr(), buf.len() as i32) };
    if copied <= 0 {
        return String::new();
    }
    String::from_utf16_lossy(&buf[..copied as usize])
}
