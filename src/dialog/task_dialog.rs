//! Static modal dialog presenter.

use crate::dialog::DialogError;
use crate::models::{CommonButtons, DialogDescriptor, DialogSelection, WindowHandle};

#[cfg(windows)]
use crate::dialog::callback::handle_plain_notification;

/// A modal task dialog without a bound background operation.
///
/// Configure the public [`descriptor`](Self::descriptor) fields, optionally
/// attach a hyperlink observer, then call [`show`](Self::show). The call
/// blocks the current thread until the dialog is dismissed.
///
/// # Example
/// ```ignore
/// let mut dlg = TaskDialog::new(WindowHandle::NULL, "Update available", "Install now?");
/// dlg.descriptor.common_buttons = CommonButtons::YES | CommonButtons::NO;
/// let selection = dlg.show()?;
/// ```
pub struct TaskDialog {
    /// Dialog configuration, immutable once `show` is entered.
    pub descriptor: DialogDescriptor,

    /// Observer for hyperlink clicks, invoked synchronously on the
    /// presenting thread while the dialog is open.
    hyperlink_clicked: Option<Box<dyn FnMut(&str)>>,
}

impl TaskDialog {
    pub fn new(
        parent: WindowHandle,
        main_instruction: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            descriptor: DialogDescriptor::new(parent, main_instruction, content),
            hyperlink_clicked: None,
        }
    }

    /// Install the hyperlink observer. Only invoked when
    /// `descriptor.enable_hyperlinks` is set.
    pub fn on_hyperlink_clicked<F>(&mut self, observer: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.hyperlink_clicked = Some(Box::new(observer));
    }

    /// One-call convenience for a plain instruction/content dialog.
    pub fn show_simple(
        parent: WindowHandle,
        main_instruction: impl Into<String>,
        content: impl Into<String>,
        buttons: CommonButtons,
    ) -> Result<DialogSelection, DialogError> {
        let mut dlg = TaskDialog::new(parent, main_instruction, content);
        dlg.descriptor.common_buttons = buttons;
        dlg.show()
    }

    /// Present the dialog modally and return what the user selected.
    ///
    /// # Errors
    /// - [`DialogError::InvalidDescriptor`] before any native call when the
    ///   descriptor violates the button-id invariants
    /// - [`DialogError::NativeCall`] when the native dialog call fails
    /// - [`DialogError::Unsupported`] on non-Windows platforms
    pub fn show(&mut self) -> Result<DialogSelection, DialogError> {
        self.descriptor.validate()?;
        tracing::debug!(
            title = self.descriptor.window_title.as_deref().unwrap_or(""),
            custom_buttons = self.descriptor.custom_buttons.len(),
            radio_buttons = self.descriptor.radio_buttons.len(),
            "showing task dialog"
        );
        self.present()
    }

    #[cfg(windows)]
    fn present(&mut self) -> Result<DialogSelection, DialogError> {
        use crate::models::DialogFlags;

        let observer = &mut self.hyperlink_clicked;
        let mut handler = |_dlg: &dyn crate::dialog::DialogCommands,
                           notification: &crate::dialog::Notification| {
            handle_plain_notification(notification, observer.as_deref_mut())
        };

        let selection =
            crate::native::show_modal(&self.descriptor, DialogFlags::NONE, &mut handler)?;
        tracing::debug!(result = ?selection.result, "task dialog dismissed");
        Ok(selection)
    }

    #[cfg(not(windows))]
    fn present(&mut self) -> Result<DialogSelection, DialogError> {
        Err(DialogError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CustomButton;

    #[test]
    fn test_show_rejects_invalid_descriptor_before_presenting() {
        let mut dlg = TaskDialog::new(WindowHandle::NULL, "Title", "Body");
        dlg.descriptor.custom_buttons =
            vec![CustomButton::new(100, "A"), CustomButton::new(100, "B")];

        match dlg.show() {
            Err(DialogError::InvalidDescriptor(_)) => {}
            other => panic!("expected InvalidDescriptor, got {other:?}"),
        }
    }
}
