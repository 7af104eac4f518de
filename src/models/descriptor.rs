//! Dialog descriptor: everything the native task dialog call needs, expressed
//! as plain owned data.
//!
//! The descriptor is immutable at call time. Presenters
//! ([`TaskDialog`](crate::dialog::TaskDialog) and
//! [`ProgressDialog`](crate::dialog::ProgressDialog)) assemble one, validate
//! it, and hand it to the native layer, which resolves it into the exact
//! `TASKDIALOGCONFIG` wire shape. Nothing in this module touches the FFI
//! boundary, so flag assembly and validation are unit-testable on any
//! platform.

use crate::dialog::DialogError;

/// Opaque parent window handle.
///
/// Stored as the raw pointer-sized value so the descriptor stays portable;
/// the native layer reinterprets it as an `HWND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    /// No parent window (the dialog centers on the monitor).
    pub const NULL: WindowHandle = WindowHandle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Predefined push buttons, combinable as a flag set.
///
/// Values match the native `TDCBF_*` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommonButtons(u32);

impl CommonButtons {
    pub const NONE: CommonButtons = CommonButtons(0);
    pub const OK: CommonButtons = CommonButtons(0x0001);
    pub const YES: CommonButtons = CommonButtons(0x0002);
    pub const NO: CommonButtons = CommonButtons(0x0004);
    pub const CANCEL: CommonButtons = CommonButtons(0x0008);
    pub const RETRY: CommonButtons = CommonButtons(0x0010);
    pub const CLOSE: CommonButtons = CommonButtons(0x0020);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: CommonButtons) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for CommonButtons {
    type Output = CommonButtons;

    fn bitor(self, rhs: CommonButtons) -> CommonButtons {
        CommonButtons(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for CommonButtons {
    fn bitor_assign(&mut self, rhs: CommonButtons) {
        self.0 |= rhs.0;
    }
}

/// Result code of a dismissed dialog.
///
/// The reserved codes double as the button ids of the predefined buttons;
/// custom button ids must stay clear of them (see
/// [`DialogDescriptor::validate`]), so a caller-defined button comes back as
/// [`Custom`](Self::Custom) carrying its descriptor id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResult {
    None,
    Ok,
    Cancel,
    Retry,
    Yes,
    No,
    Close,
    /// A caller-defined button, identified by the id from its
    /// [`CustomButton`] definition.
    Custom(i32),
}

impl DialogResult {
    /// Highest reserved button id; custom ids must be greater.
    pub const MAX_RESERVED_ID: i32 = 8;

    pub fn raw(self) -> i32 {
        match self {
            DialogResult::None => 0,
            DialogResult::Ok => 1,
            DialogResult::Cancel => 2,
            DialogResult::Retry => 4,
            DialogResult::Yes => 6,
            DialogResult::No => 7,
            DialogResult::Close => 8,
            DialogResult::Custom(id) => id,
        }
    }

    /// Map a native button code back to a result. Codes above the reserved
    /// range are custom button ids and come back verbatim; the remaining
    /// unassigned codes collapse to `None`.
    pub fn from_raw(code: i32) -> DialogResult {
        match code {
            1 => DialogResult::Ok,
            2 => DialogResult::Cancel,
            4 => DialogResult::Retry,
            6 => DialogResult::Yes,
            7 => DialogResult::No,
            8 => DialogResult::Close,
            id if id > Self::MAX_RESERVED_ID => DialogResult::Custom(id),
            _ => DialogResult::None,
        }
    }
}

/// Everything the dialog reported back at dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogSelection {
    /// Which button dismissed the dialog.
    pub result: DialogResult,
    /// Selected radio button id, if the descriptor carried any radio buttons.
    pub radio_button: Option<i32>,
    /// Verification checkbox state at dismissal.
    pub verification_checked: bool,
}

/// Icon selection as a tagged variant.
///
/// The native config stores icons in an overlapping union slot (resource id
/// vs. icon handle), selected by flags. Keeping the choice explicit here
/// means only the serialization boundary ever deals with the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogIcon {
    #[default]
    None,
    /// A predefined or module icon resource id.
    ResourceId(i32),
    /// A raw `HICON` supplied by the caller.
    Handle(isize),
}

impl DialogIcon {
    // Stock comctl32 icon resource ids.
    pub const WARNING: DialogIcon = DialogIcon::ResourceId(-1);
    pub const ERROR: DialogIcon = DialogIcon::ResourceId(-2);
    pub const INFORMATION: DialogIcon = DialogIcon::ResourceId(-3);
    pub const SHIELD: DialogIcon = DialogIcon::ResourceId(-4);

    pub fn is_none(self) -> bool {
        self == DialogIcon::None
    }

    /// True when the native layer must set the corresponding `USE_HICON`
    /// flag for this icon.
    pub fn is_handle(self) -> bool {
        matches!(self, DialogIcon::Handle(_))
    }
}

/// A caller-defined push button or command link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomButton {
    pub id: i32,
    pub caption: String,
}

impl CustomButton {
    pub fn new(id: i32, caption: impl Into<String>) -> Self {
        Self {
            id,
            caption: caption.into(),
        }
    }
}

/// One entry of the mutually exclusive radio button group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioButton {
    pub id: i32,
    pub caption: String,
}

impl RadioButton {
    pub fn new(id: i32, caption: impl Into<String>) -> Self {
        Self {
            id,
            caption: caption.into(),
        }
    }
}

/// Behavioral flag bits, matching the native `TDF_*` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DialogFlags(u32);

impl DialogFlags {
    pub const NONE: DialogFlags = DialogFlags(0);
    pub const ENABLE_HYPERLINKS: DialogFlags = DialogFlags(0x0001);
    pub const USE_HICON_MAIN: DialogFlags = DialogFlags(0x0002);
    pub const USE_HICON_FOOTER: DialogFlags = DialogFlags(0x0004);
    pub const ALLOW_DIALOG_CANCELLATION: DialogFlags = DialogFlags(0x0008);
    pub const USE_COMMAND_LINKS: DialogFlags = DialogFlags(0x0010);
    pub const USE_COMMAND_LINKS_NO_ICON: DialogFlags = DialogFlags(0x0020);
    pub const EXPAND_FOOTER_AREA: DialogFlags = DialogFlags(0x0040);
    pub const EXPANDED_BY_DEFAULT: DialogFlags = DialogFlags(0x0080);
    pub const VERIFICATION_FLAG_CHECKED: DialogFlags = DialogFlags(0x0100);
    pub const SHOW_PROGRESS_BAR: DialogFlags = DialogFlags(0x0200);
    pub const SHOW_MARQUEE_PROGRESS_BAR: DialogFlags = DialogFlags(0x0400);
    pub const CALLBACK_TIMER: DialogFlags = DialogFlags(0x0800);
    pub const POSITION_RELATIVE_TO_WINDOW: DialogFlags = DialogFlags(0x1000);
    pub const RTL_LAYOUT: DialogFlags = DialogFlags(0x2000);
    pub const NO_DEFAULT_RADIO_BUTTON: DialogFlags = DialogFlags(0x4000);
    pub const CAN_BE_MINIMIZED: DialogFlags = DialogFlags(0x8000);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: DialogFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for DialogFlags {
    type Output = DialogFlags;

    fn bitor(self, rhs: DialogFlags) -> DialogFlags {
        DialogFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for DialogFlags {
    fn bitor_assign(&mut self, rhs: DialogFlags) {
        self.0 |= rhs.0;
    }
}

/// Complete dialog configuration, immutable once presentation starts.
///
/// Optional sections (verification, footer, expanded information) are plain
/// `Option`s; the flag assembly in [`flags()`](Self::flags) only raises the
/// corresponding bits when the section is actually present, because the
/// native layer faults on null pointers where captions are expected.
#[derive(Debug, Clone, Default)]
pub struct DialogDescriptor {
    pub parent: WindowHandle,
    pub window_title: Option<String>,
    pub main_instruction: String,
    pub content: String,
    pub icon: DialogIcon,
    pub common_buttons: CommonButtons,
    pub custom_buttons: Vec<CustomButton>,
    pub radio_buttons: Vec<RadioButton>,
    /// Button id focused initially; 0 lets the dialog pick.
    pub default_button: i32,
    pub verification_text: Option<String>,
    pub verification_checked: bool,
    pub footer_text: Option<String>,
    pub footer_icon: DialogIcon,
    pub expanded_information: Option<String>,
    /// Caption shown while the expanded area is visible.
    pub expanded_text: Option<String>,
    /// Caption shown while the expanded area is collapsed.
    pub collapsed_text: Option<String>,
    pub enable_hyperlinks: bool,
    pub allow_dialog_cancellation: bool,
    pub expand_footer_area: bool,
    pub expanded_by_default: bool,
    pub position_relative_to_window: bool,
    pub use_command_links: bool,
    pub use_command_links_no_icon: bool,
    pub rtl_layout: bool,
    pub no_default_radio_button: bool,
}

impl DialogDescriptor {
    pub fn new(parent: WindowHandle, main_instruction: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            parent,
            main_instruction: main_instruction.into(),
            content: content.into(),
            common_buttons: CommonButtons::OK,
            ..Self::default()
        }
    }

    /// Check the invariants the native call cannot recover from.
    ///
    /// Custom button and radio button ids must be unique positive integers
    /// outside the reserved result-code range, otherwise a click could be
    /// indistinguishable from a predefined button. Violations fail here,
    /// before any native resources are allocated.
    pub fn validate(&self) -> Result<(), DialogError> {
        let mut seen = std::collections::HashSet::new();

        let buttons = self
            .custom_buttons
            .iter()
            .map(|b| ("custom button", b.id))
            .chain(self.radio_buttons.iter().map(|b| ("radio button", b.id)));

        for (kind, id) in buttons {
            if id <= 0 {
                return Err(DialogError::InvalidDescriptor(format!(
                    "{kind} id {id} is not a positive integer"
                )));
            }
            if id <= DialogResult::MAX_RESERVED_ID {
                return Err(DialogError::InvalidDescriptor(format!(
                    "{kind} id {id} collides with a reserved result code (1..=8)"
                )));
            }
            if !seen.insert(id) {
                return Err(DialogError::InvalidDescriptor(format!(
                    "duplicate {kind} id {id}"
                )));
            }
        }

        Ok(())
    }

    /// Assemble the behavioral flag word from the descriptor state.
    ///
    /// Section-dependent flags (`VERIFICATION_FLAG_CHECKED`, the `USE_HICON`
    /// pair) are only set when their section exists; plain boolean options
    /// map one to one.
    pub fn flags(&self) -> DialogFlags {
        let mut flags = DialogFlags::NONE;

        if self.verification_text.is_some() && self.verification_checked {
            flags |= DialogFlags::VERIFICATION_FLAG_CHECKED;
        }
        if self.icon.is_handle() {
            flags |= DialogFlags::USE_HICON_MAIN;
        }
        if self.footer_text.is_some() && self.footer_icon.is_handle() {
            flags |= DialogFlags::USE_HICON_FOOTER;
        }
        if self.enable_hyperlinks {
            flags |= DialogFlags::ENABLE_HYPERLINKS;
        }
        if self.allow_dialog_cancellation {
            flags |= DialogFlags::ALLOW_DIALOG_CANCELLATION;
        }
        if self.expand_footer_area {
            flags |= DialogFlags::EXPAND_FOOTER_AREA;
        }
        if self.expanded_by_default {
            flags |= DialogFlags::EXPANDED_BY_DEFAULT;
        }
        if self.position_relative_to_window {
            flags |= DialogFlags::POSITION_RELATIVE_TO_WINDOW;
        }
        if self.use_command_links {
            flags |= DialogFlags::USE_COMMAND_LINKS;
        }
        if self.use_command_links_no_icon {
            flags |= DialogFlags::USE_COMMAND_LINKS_NO_ICON;
        }
        if self.rtl_layout {
            flags |= DialogFlags::RTL_LAYOUT;
        }
        if self.no_default_radio_button {
            flags |= DialogFlags::NO_DEFAULT_RADIO_BUTTON;
        }

        flags
    }
}
