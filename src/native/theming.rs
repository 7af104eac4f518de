//! Scoped comctl32 v6 activation context.
//!
//! The task dialog only exists in version 6 of the common controls, which
//! hosts without an application manifest never load. Activating an explicit
//! activation context around the dialog call fixes that; every failure on
//! this path is cosmetic and degrades silently to default rendering.

use std::sync::Mutex;

use windows_sys::Win32::Foundation::{HANDLE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::System::ApplicationInstallationAndServicing::{
    ACTCTXW, ActivateActCtx, CreateActCtxW, DeactivateActCtx,
};

use crate::native::wire;

const COMMON_CONTROLS_MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<assembly xmlns="urn:schemas-microsoft-com:asm.v1" manifestVersion="1.0">
  <dependency>
    <dependentAssembly>
      <assemblyIdentity type="win32" name="Microsoft.Windows.Common-Controls" version="6.0.0.0" processorArchitecture="*" publicKeyToken="6595b64144ccf1df" language="*"/>
    </dependentAssembly>
  </dependency>
</assembly>
"#;

struct ContextHandle(HANDLE);

// The activation context handle is process-wide and only ever passed back
// into ActivateActCtx.
unsafe impl Send for ContextHandle {}
unsafe impl Sync for ContextHandle {}

/// Process-wide activation context, created lazily under the mutex and
/// cached after the first success. Failed creation is retried on the next
/// presentation.
static CONTEXT: Mutex<Option<ContextHandle>> = Mutex::new(None);

fn ensure_context() -> Option<HANDLE> {
    let mut guard = CONTEXT.lock().unwrap();
    if guard.is_none() {
        *guard = create_context();
    }
    guard.as_ref().map(|ctx| ctx.0)
}

fn create_context() -> Option<ContextHandle> {
    // CreateActCtxW reads the manifest from a file, so materialize the
    // embedded manifest in the temp directory for the duration of the call.
    let path = std::env::temp_dir().join(format!("xtaskdialog-{}.manifest", std::process::id()));
    if let Err(e) = std::fs::write(&path, COMMON_CONTROLS_MANIFEST) {
        tracing::debug!(error = %e, "failed to write theming manifest, using default rendering");
        return None;
    }

    let source = wire::to_wide(path.to_string_lossy().as_ref());
    let mut actctx: ACTCTXW = unsafe { std::mem::zeroed() };
    actctx.cbSize = std::mem::size_of::<ACTCTXW>() as u32;
    actctx.lpSource = source.as_ptr();

    let handle = unsafe { CreateActCtxW(&actctx) };
    let _ = std::fs::remove_file(&path);

    if handle == INVALID_HANDLE_VALUE {
        tracing::debug!("activation context creation failed, using default rendering");
        None
    } else {
        Some(ContextHandle(handle))
    }
}

/// RAII activation of the theming context.
///
/// Activate before the modal call, deactivate on drop on every exit path.
/// When activation fails the scope is inert and the dialog simply renders
/// unthemed.
pub(crate) struct ThemingScope {
    cookie: Option<usize>,
}

impl ThemingScope {
    pub fn activate() -> Self {
        let Some(context) = ensure_context() else {
            return Self { cookie: None };
        };

        let mut cookie = 0usize;
        let activated = unsafe { ActivateActCtx(context, &mut cookie) };
        if activated == 0 {
            tracing::debug!("activation context could not be activated, using default rendering");
            Self { cookie: None }
        } else {
            Self { cookie: Some(cookie) }
        }
    }
}

impl Drop for ThemingScope {
    fn drop(&mut self) {
        if let Some(cookie) = self.cookie.take() {
            unsafe {
                DeactivateActCtx(0, cookie);
            }
        }
    }
}
