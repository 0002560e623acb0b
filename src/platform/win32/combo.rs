// Combo box selector controls, one per active slot

use super::{handle_of, hwnd_of, to_wide};
use crate::errors::{PreviewError, PreviewResult};
use crate::slot::selector::{SelectorControl, SelectorItem};
use crate::window::info::{Span, WindowHandle};
use std::mem;
use std::ptr;
use winapi::shared::basetsd::{DWORD_PTR, UINT_PTR};
use winapi::shared::minwindef::{LPARAM, LRESULT, TRUE, UINT, WPARAM};
use winapi::shared::windef::{HMENU, HWND, RECT};
use winapi::um::commctrl::{DefSubclassProc, RemoveWindowSubclass, SetWindowSubclass};
use winapi::um::errhandlingapi::GetLastError;
use winapi::um::libloaderapi::GetModuleHandleW;
use winapi::um::wingdi::{GetStockObject, DEFAULT_GUI_FONT};
use winapi::um::winuser::*;

/// Control id of slot 0's selector; slot `i` uses `SELECTOR_ID_BASE + i`
pub const SELECTOR_ID_BASE: i32 = 101;

/// Posted to the panel with (slot index, wheel delta) when a selector is scrolled
pub const WM_APP_SELECTOR_WHEEL: UINT = WM_APP + 1;

/// Height of the dropdown list, which opens above the strip
pub(crate) const LIST_HEIGHT: i32 = 200;

pub struct ComboSelector {
    hwnd: HWND,
    index: usize,
    height: i32,
}

unsafe extern "system" fn selector_subclass_proc(
    hwnd: HWND,
    msg: UINT,
    wparam: WPARAM,
    lparam: LPARAM,
    id: UINT_PTR,
    _ref_data: DWORD_PTR,
) -> LRESULT {
    match msg {
        WM_MOUSEWHEEL => {
            let delta = ((wparam >> 16) & 0xFFFF) as u16 as i16;
            SendMessageW(
                GetParent(hwnd),
                WM_APP_SELECTOR_WHEEL,
                id as WPARAM,
                delta as LPARAM,
            );
            0
        }
        WM_ERASEBKGND => 1,
        _ => DefSubclassProc(hwnd, msg, wparam, lparam),
    }
}

impl ComboSelector {
    pub fn create(parent: HWND, index: usize, span: Span, height: i32) -> PreviewResult<Self> {
        let class = to_wide("COMBOBOX");
        let hwnd = unsafe {
            CreateWindowExW(
                0,
                class.as_ptr(),
                ptr::null(),
                WS_CHILD | WS_VISIBLE | WS_VSCROLL | CBS_DROPDOWNLIST | CBS_HASSTRINGS,
                span.x,
                0,
                span.width,
                height,
                parent,
                (SELECTOR_ID_BASE as usize + index) as HMENU,
                GetModuleHandleW(ptr::null()),
                ptr::null_mut(),
            )
        };
        if hwnd.is_null() {
            let error = unsafe { GetLastError() };
            return Err(PreviewError::Platform(format!(
                "creating selector {} failed: error {}",
                index, error
            )));
        }
        unsafe {
            SetWindowSubclass(hwnd, Some(selector_subclass_proc), index as UINT_PTR, 0);
            SendMessageW(
                hwnd,
                WM_SETFONT,
                GetStockObject(DEFAULT_GUI_FONT as i32) as WPARAM,
                TRUE as LPARAM,
            );
            SendMessageW(hwnd, CB_SETDROPPEDWIDTH, span.width as WPARAM, 0);
        }
        Ok(Self {
            hwnd,
            index,
            height,
        })
    }

    fn send(&self, msg: UINT, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
        unsafe { SendMessageW(self.hwnd, msg, wparam, lparam) }
    }

    fn set_item_window(&self, index: usize, window: WindowHandle) {
        self.send(CB_SETITEMDATA, index, hwnd_of(window) as LPARAM);
    }
}

impl SelectorControl for ComboSelector {
    fn item_count(&self) -> usize {
        let count = self.send(CB_GETCOUNT, 0, 0);
        if count < 0 {
            0
        } else {
            count as usize
        }
    }

    fn item(&self, index: usize) -> Option<SelectorItem> {
        let len = self.send(CB_GETLBTEXTLEN, index, 0);
        if len < 0 {
            return None;
        }
        let mut buffer = vec![0u16; len as usize + 1];
        let copied = self.send(CB_GETLBTEXT, index, buffer.as_mut_ptr() as LPARAM);
        if copied < 0 {
            return None;
        }
        let data = self.send(CB_GETITEMDATA, index, 0);
        Some(SelectorItem {
            title: String::from_utf16_lossy(&buffer[..copied as usize]),
            window: handle_of(data as HWND),
        })
    }

    fn append_item(&mut self, title: &str, window: WindowHandle) {
        let wide = to_wide(title);
        let index = self.send(CB_ADDSTRING, 0, wide.as_ptr() as LPARAM);
        if index >= 0 {
            self.set_item_window(index as usize, window);
        }
    }

    fn insert_item(&mut self, index: usize, title: &str, window: WindowHandle) {
        let current = self.current();
        let wide = to_wide(title);
        let inserted = self.send(CB_INSERTSTRING, index, wide.as_ptr() as LPARAM);
        if inserted < 0 {
            return;
        }
        self.set_item_window(inserted as usize, window);
        if let Some(current) = current {
            if inserted as usize <= current {
                self.set_current(Some(current + 1));
            }
        }
    }

    fn remove_item(&mut self, index: usize) {
        let current = self.current();
        self.send(CB_DELETESTRING, index, 0);
        let next = match current {
            Some(current) if current == index => None,
            Some(current) if current > index => Some(current - 1),
            other => other,
        };
        if next != self.current() {
            self.set_current(next);
        }
    }

    fn current(&self) -> Option<usize> {
        let selection = self.send(CB_GETCURSEL, 0, 0);
        if selection == CB_ERR as LRESULT {
            None
        } else {
            Some(selection as usize)
        }
    }

    fn set_current(&mut self, index: Option<usize>) {
        let wparam = match index {
            Some(index) => index,
            None => usize::MAX, // -1 clears the selection
        };
        self.send(CB_SETCURSEL, wparam, 0);
    }

    fn place(&mut self, span: Span) {
        unsafe {
            MoveWindow(self.hwnd, span.x, 0, span.width, self.height, TRUE);
        }
        self.send(CB_SETDROPPEDWIDTH, span.width as WPARAM, 0);
    }
}

impl Drop for ComboSelector {
    fn drop(&mut self) {
        unsafe {
            RemoveWindowSubclass(
                self.hwnd,
                Some(selector_subclass_proc),
                self.index as UINT_PTR,
            );
            DestroyWindow(self.hwnd);
        }
    }
}

/// Move an opening selector's list above the control, matching its width
pub fn open_list_above(combo: HWND) {
    unsafe {
        let mut info: COMBOBOXINFO = mem::zeroed();
        info.cbSize = mem::size_of::<COMBOBOXINFO>() as u32;
        if GetComboBoxInfo(combo, &mut info) == 0 || info.hwndList.is_null() {
            return;
        }
        let mut rect = RECT {
            left: 0,
            top: 0,
            right: 0,
            bottom: 0,
        };
        if GetWindowRect(combo, &mut rect) == 0 {
            return;
        }
        let width = rect.right - rect.left;
        SetWindowPos(
            info.hwndList,
            ptr::null_mut(),
            rect.left,
            rect.top - LIST_HEIGHT,
            width,
            LIST_HEIGHT,
            SWP_NOZORDER | SWP_NOACTIVATE | SWP_FRAMECHANGED,
        );
        SendMessageW(combo, CB_SETDROPPEDWIDTH, width as WPARAM, 0);
    }
}
