// Launch at login through the per-user Run key

use super::to_wide;
use crate::errors::{PreviewError, PreviewResult};
use crate::platform::Autostart;
use log::{debug, info};
use std::mem;
use std::ptr;
use winapi::shared::minwindef::{BYTE, DWORD, HKEY, MAX_PATH};
use winapi::shared::winerror::{ERROR_FILE_NOT_FOUND, ERROR_SUCCESS};
use winapi::um::libloaderapi::GetModuleFileNameW;
use winapi::um::winnt::{KEY_QUERY_VALUE, KEY_SET_VALUE, REG_SZ};
use winapi::um::winreg::{
    RegCloseKey, RegDeleteValueW, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW,
    HKEY_CURRENT_USER,
};

const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";
const DEFAULT_VALUE_NAME: &str = "WinviewStrip";

pub struct RunKeyAutostart {
    value_name: String,
}

/// Open Run key, closed on drop
struct RunKey(HKEY);

impl RunKey {
    fn open() -> PreviewResult<Self> {
        let path = to_wide(RUN_KEY);
        let mut key: HKEY = ptr::null_mut();
        let status = unsafe {
            RegOpenKeyExW(
                HKEY_CURRENT_USER,
                path.as_ptr(),
                0,
                KEY_QUERY_VALUE | KEY_SET_VALUE,
                &mut key,
            )
        };
        if status as DWORD != ERROR_SUCCESS {
            return Err(PreviewError::Platform(format!(
                "opening the Run key failed: error {}",
                status
            )));
        }
        Ok(Self(key))
    }
}

impl Drop for RunKey {
    fn drop(&mut self) {
        unsafe {
            RegCloseKey(self.0);
        }
    }
}

fn executable_path() -> PreviewResult<Vec<u16>> {
    let mut buffer = vec![0u16; MAX_PATH * 4];
    let len = unsafe {
        GetModuleFileNameW(ptr::null_mut(), buffer.as_mut_ptr(), buffer.len() as DWORD)
    };
    if len == 0 || len as usize >= buffer.len() {
        return Err(PreviewError::Platform(
            "could not resolve the executable path".to_string(),
        ));
    }
    let path = String::from_utf16_lossy(&buffer[..len as usize]);
    Ok(to_wide(&format!("\"{}\"", path)))
}

impl RunKeyAutostart {
    pub fn new() -> Self {
        Self::with_value_name(DEFAULT_VALUE_NAME)
    }

    pub fn with_value_name(value_name: impl Into<String>) -> Self {
        Self {
            value_name: value_name.into(),
        }
    }
}

impl Default for RunKeyAutostart {
    fn default() -> Self {
        Self::new()
    }
}

impl Autostart for RunKeyAutostart {
    fn is_enabled(&self) -> bool {
        let Ok(key) = RunKey::open() else {
            return false;
        };
        let name = to_wide(&self.value_name);
        let status = unsafe {
            RegQueryValueExW(
                key.0,
                name.as_ptr(),
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
            )
        };
        status as DWORD == ERROR_SUCCESS
    }

    fn set_enabled(&self, enabled: bool) -> PreviewResult<()> {
        let key = RunKey::open()?;
        let name = to_wide(&self.value_name);
        let status = if enabled {
            let command = executable_path()?;
            debug!("Run key command: {}", String::from_utf16_lossy(&command));
            unsafe {
                RegSetValueExW(
                    key.0,
                    name.as_ptr(),
                    0,
                    REG_SZ,
                    command.as_ptr() as *const BYTE,
                    (command.len() * mem::size_of::<u16>()) as DWORD,
                )
            }
        } else {
            let status = unsafe { RegDeleteValueW(key.0, name.as_ptr()) };
            if status as DWORD == ERROR_FILE_NOT_FOUND {
                ERROR_SUCCESS as i32
            } else {
                status
            }
        };
        if status as DWORD != ERROR_SUCCESS {
            return Err(PreviewError::Platform(format!(
                "updating the Run key failed: error {}",
                status
            )));
        }
        info!("🚀 Run at startup: {}", enabled);
        Ok(())
    }
}
