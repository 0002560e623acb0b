// Win32 implementations of the engine's host traits

mod autostart;
mod combo;
mod compositor;
mod panel_window;
mod source;

pub use autostart::RunKeyAutostart;
pub use combo::ComboSelector;
pub use compositor::DwmCompositor;
pub use panel_window::run;
pub use source::{activate_window, Win32WindowSource};

use crate::window::info::WindowHandle;
use std::ffi::OsStr;
use std::iter::once;
use std::os::windows::ffi::OsStrExt;
use winapi::shared::windef::HWND;

/// NUL-terminated UTF-16 copy of `s`
pub(crate) fn to_wide(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(once(0)).collect()
}

pub(crate) fn hwnd_of(handle: WindowHandle) -> HWND {
    handle.0 as usize as HWND
}

pub(crate) fn handle_of(hwnd: HWND) -> WindowHandle {
    WindowHandle(hwnd as usize as u64)
}
