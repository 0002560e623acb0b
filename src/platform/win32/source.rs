// Window enumeration through EnumWindows

use super::{handle_of, hwnd_of};
use crate::window::directory::WindowSource;
use crate::window::info::{HostWindow, WindowHandle};
use log::debug;
use winapi::shared::minwindef::{BOOL, LPARAM, TRUE};
use winapi::shared::windef::HWND;
use winapi::um::winuser::{
    BringWindowToTop, EnumWindows, GetWindow, GetWindowTextW, IsIconic, IsWindow,
    IsWindowVisible, SetForegroundWindow, ShowWindow, GW_OWNER, SW_RESTORE,
};

pub struct Win32WindowSource;

unsafe extern "system" fn collect_windows_proc(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let windows = &mut *(lparam as *mut Vec<HostWindow>);
    windows.push(HostWindow {
        handle: handle_of(hwnd),
        title: window_title(hwnd),
        visible: IsWindowVisible(hwnd) != 0,
        has_owner: !GetWindow(hwnd, GW_OWNER).is_null(),
    });
    TRUE // Continue enumeration
}

fn window_title(hwnd: HWND) -> String {
    unsafe {
        let mut buffer = [0u16; 256];
        let len = GetWindowTextW(hwnd, buffer.as_mut_ptr(), buffer.len() as i32);
        if len > 0 {
            String::from_utf16_lossy(&buffer[..len as usize])
        } else {
            String::new()
        }
    }
}

impl WindowSource for Win32WindowSource {
    fn top_level_windows(&self) -> Vec<HostWindow> {
        let mut windows: Vec<HostWindow> = Vec::new();
        unsafe {
            EnumWindows(
                Some(collect_windows_proc),
                &mut windows as *mut Vec<HostWindow> as LPARAM,
            );
        }
        windows
    }

    fn is_alive(&self, handle: WindowHandle) -> bool {
        !handle.is_null() && unsafe { IsWindow(hwnd_of(handle)) != 0 }
    }

    fn title_of(&self, handle: WindowHandle) -> Option<String> {
        if !self.is_alive(handle) {
            return None;
        }
        Some(window_title(hwnd_of(handle)))
    }
}

/// Restore the window if minimized and bring it to the foreground
pub fn activate_window(handle: WindowHandle) -> bool {
    let hwnd = hwnd_of(handle);
    unsafe {
        if IsWindow(hwnd) == 0 {
            return false;
        }
        if IsIconic(hwnd) != 0 {
            ShowWindow(hwnd, SW_RESTORE);
        }
        BringWindowToTop(hwnd);
        let activated = SetForegroundWindow(hwnd) != 0;
        debug!("Activated {:?}: {}", handle, activated);
        activated
    }
}
