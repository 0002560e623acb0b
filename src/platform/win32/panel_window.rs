// The panel's top-level window: message loop, timer, context menu and the
// glue between Win32 messages and the engine.

use super::combo::{open_list_above, ComboSelector, LIST_HEIGHT, SELECTOR_ID_BASE, WM_APP_SELECTOR_WHEEL};
use super::{activate_window, handle_of, to_wide, DwmCompositor, RunKeyAutostart, Win32WindowSource};
use crate::config::{default_store, PanelConfig, Settings, SettingsStore};
use crate::editor::SlotEdit;
use crate::errors::{PreviewError, PreviewResult};
use crate::panel::{Panel, PanelHost};
use crate::platform::Autostart;
use crate::slot::selector::{SelectorControl, SelectorEvent};
use crate::window::info::Span;
use log::{debug, error, info, warn};
use std::cell::RefCell;
use std::mem;
use std::ptr;
use winapi::shared::basetsd::UINT_PTR;
use winapi::shared::minwindef::{FALSE, LPARAM, LRESULT, TRUE, UINT, WPARAM};
use winapi::shared::windef::{HBRUSH, HWND, POINT, RECT};
use winapi::um::commctrl::{InitCommonControlsEx, ICC_STANDARD_CLASSES, INITCOMMONCONTROLSEX};
use winapi::um::errhandlingapi::GetLastError;
use winapi::um::libloaderapi::GetModuleHandleW;
use winapi::um::wingdi::{GetStockObject, BLACK_BRUSH};
use winapi::um::winuser::*;

const CLASS_NAME: &str = "WinviewStripPanel";
const WINDOW_TITLE: &str = "Winview Strip";
const TICK_TIMER_ID: UINT_PTR = 1;
const DEFAULT_POSITION: (i32, i32) = (100, 100);

const ID_ALWAYS_ON_TOP: u32 = 40001;
const ID_RUN_AT_STARTUP: u32 = 40002;
const ID_RESET_AND_EXIT: u32 = 40003;
const ID_ADD_PREVIEW: u32 = 40004;
const ID_REMOVE_PREVIEW: u32 = 40005;
const ID_EXIT: u32 = 40006;

/// Win32 side of the panel chrome
pub struct Win32Host {
    hwnd: HWND,
    selector_height: i32,
}

impl PanelHost for Win32Host {
    fn create_selector(
        &mut self,
        index: usize,
        span: Span,
    ) -> PreviewResult<Box<dyn SelectorControl>> {
        let control = ComboSelector::create(self.hwnd, index, span, self.selector_height)?;
        Ok(Box::new(control))
    }

    fn resize_panel(&mut self, width: i32, height: i32) {
        unsafe {
            SetWindowPos(
                self.hwnd,
                ptr::null_mut(),
                0,
                0,
                width,
                height,
                SWP_NOMOVE | SWP_NOZORDER | SWP_NOACTIVATE,
            );
        }
    }

    fn set_always_on_top(&mut self, on_top: bool) {
        let insert_after = if on_top { HWND_TOPMOST } else { HWND_NOTOPMOST };
        unsafe {
            SetWindowPos(
                self.hwnd,
                insert_after,
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
            );
        }
    }
}

type Win32Panel = Panel<Win32WindowSource, DwmCompositor, Win32Host>;

struct PanelWindow {
    panel: Win32Panel,
    store: Box<dyn SettingsStore>,
    autostart: RunKeyAutostart,
    reset_requested: bool,
}

thread_local! {
    static PANEL: RefCell<Option<PanelWindow>> = const { RefCell::new(None) };
}

/// Run `f` against the panel state. `None` when there is no state yet or the
/// state is already borrowed further up the stack (a re-entrant message).
fn with_panel<R>(f: impl FnOnce(&mut PanelWindow) -> R) -> Option<R> {
    PANEL.with(|cell| {
        let mut state = cell.try_borrow_mut().ok()?;
        state.as_mut().map(f)
    })
}

fn take_panel() -> Option<PanelWindow> {
    PANEL.with(|cell| cell.try_borrow_mut().ok().and_then(|mut state| state.take()))
}

fn low_word(value: usize) -> u32 {
    (value & 0xFFFF) as u32
}

fn high_word(value: usize) -> u32 {
    ((value >> 16) & 0xFFFF) as u32
}

fn point_of(lparam: LPARAM) -> (i32, i32) {
    let x = (lparam & 0xFFFF) as u16 as i16 as i32;
    let y = ((lparam >> 16) & 0xFFFF) as u16 as i16 as i32;
    (x, y)
}

fn message_box(hwnd: HWND, text: &str) {
    let text = to_wide(text);
    let caption = to_wide(WINDOW_TITLE);
    unsafe {
        MessageBoxW(hwnd, text.as_ptr(), caption.as_ptr(), MB_OK | MB_ICONINFORMATION);
    }
}

fn report(hwnd: HWND, result: PreviewResult<()>) {
    if let Err(e) = result {
        if e.is_user_facing() {
            message_box(hwnd, &e.to_string());
        } else {
            warn!("⚠️ {}", e);
        }
    }
}

fn window_position(hwnd: HWND) -> Option<(i32, i32)> {
    let mut rect = RECT {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };
    if unsafe { GetWindowRect(hwnd, &mut rect) } == 0 {
        return None;
    }
    Some((rect.left, rect.top))
}

fn set_clip_children(hwnd: HWND, clip: bool) {
    unsafe {
        let style = GetWindowLongPtrW(hwnd, GWL_STYLE);
        let style = if clip {
            style | WS_CLIPCHILDREN as isize
        } else {
            style & !(WS_CLIPCHILDREN as isize)
        };
        SetWindowLongPtrW(hwnd, GWL_STYLE, style);
    }
}

fn refresh(hwnd: HWND) {
    if let Some(Some(_)) = with_panel(|state| state.panel.tick()) {
        unsafe {
            InvalidateRect(hwnd, ptr::null(), FALSE);
        }
    }
}

/// Apply a slot edit with redraw suspended, then lay out immediately
fn apply_edit(hwnd: HWND, edit: fn(&mut Win32Panel) -> PreviewResult<SlotEdit>) {
    unsafe {
        SendMessageW(hwnd, WM_SETREDRAW, FALSE as WPARAM, 0);
    }
    let result = with_panel(|state| {
        let result = edit(&mut state.panel);
        state.panel.tick();
        result
    });
    unsafe {
        SendMessageW(hwnd, WM_SETREDRAW, TRUE as WPARAM, 0);
        RedrawWindow(
            hwnd,
            ptr::null(),
            ptr::null_mut(),
            RDW_ERASE | RDW_FRAME | RDW_INVALIDATE | RDW_ALLCHILDREN,
        );
    }
    if let Some(result) = result {
        report(hwnd, result.map(|edit| debug!("Applied {:?}", edit)));
    }
}

fn show_context_menu(hwnd: HWND, x: i32, y: i32) {
    let Some((on_top, run_at_startup)) = with_panel(|state| {
        state.panel.record_click(x);
        (state.panel.always_on_top(), state.autostart.is_enabled())
    }) else {
        return;
    };

    let command = unsafe {
        let menu = CreatePopupMenu();
        if menu.is_null() {
            return;
        }
        let checked = |on: bool| if on { MF_CHECKED } else { MF_UNCHECKED };
        let items: [(UINT, u32, &str); 5] = [
            (checked(on_top), ID_ALWAYS_ON_TOP, "Always on top"),
            (checked(run_at_startup), ID_RUN_AT_STARTUP, "Run at startup"),
            (0, ID_ADD_PREVIEW, "Add preview"),
            (0, ID_REMOVE_PREVIEW, "Remove preview"),
            (0, ID_RESET_AND_EXIT, "Reset and exit"),
        ];
        for (flags, id, label) in items {
            let label = to_wide(label);
            AppendMenuW(menu, MF_STRING | flags, id as UINT_PTR, label.as_ptr());
            if id == ID_RUN_AT_STARTUP {
                AppendMenuW(menu, MF_SEPARATOR, 0, ptr::null());
            }
        }
        AppendMenuW(menu, MF_SEPARATOR, 0, ptr::null());
        let exit = to_wide("Exit");
        AppendMenuW(menu, MF_STRING, ID_EXIT as UINT_PTR, exit.as_ptr());

        let mut point = POINT { x, y };
        ClientToScreen(hwnd, &mut point);
        SetForegroundWindow(hwnd);
        let command = TrackPopupMenu(
            menu,
            TPM_RETURNCMD | TPM_RIGHTBUTTON,
            point.x,
            point.y,
            0,
            hwnd,
            ptr::null(),
        );
        DestroyMenu(menu);
        command as u32
    };

    match command {
        ID_ALWAYS_ON_TOP => {
            with_panel(|state| state.panel.toggle_always_on_top());
        }
        ID_RUN_AT_STARTUP => {
            if let Some(result) =
                with_panel(|state| state.autostart.set_enabled(!run_at_startup))
            {
                report(hwnd, result);
            }
        }
        ID_ADD_PREVIEW => apply_edit(hwnd, |panel| panel.insert_slot()),
        ID_REMOVE_PREVIEW => apply_edit(hwnd, |panel| panel.remove_slot()),
        ID_RESET_AND_EXIT => {
            with_panel(|state| state.reset_requested = true);
            unsafe {
                PostMessageW(hwnd, WM_CLOSE, 0, 0);
            }
        }
        ID_EXIT => unsafe {
            PostMessageW(hwnd, WM_CLOSE, 0, 0);
        },
        _ => {}
    }
}

fn on_selector_command(hwnd: HWND, wparam: WPARAM, lparam: LPARAM) -> bool {
    let id = low_word(wparam) as i32;
    let code = high_word(wparam) as u16;
    if id < SELECTOR_ID_BASE {
        return false;
    }
    let index = (id - SELECTOR_ID_BASE) as usize;
    let event = match code {
        CBN_DROPDOWN => SelectorEvent::DropdownOpened,
        CBN_CLOSEUP => SelectorEvent::DropdownClosed,
        CBN_SELCHANGE => SelectorEvent::SelectionChanged,
        _ => return false,
    };

    let Some(result) = with_panel(|state| state.panel.handle_selector_event(index, event)) else {
        return false;
    };
    report(hwnd, result);

    match event {
        SelectorEvent::DropdownOpened => {
            set_clip_children(hwnd, false);
            open_list_above(lparam as HWND);
        }
        SelectorEvent::DropdownClosed => {
            set_clip_children(hwnd, true);
            refresh(hwnd);
        }
        _ => refresh(hwnd),
    }
    true
}

unsafe extern "system" fn panel_window_proc(
    hwnd: HWND,
    msg: UINT,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_TIMER if wparam == TICK_TIMER_ID => {
            refresh(hwnd);
            0
        }
        WM_LBUTTONDOWN => {
            // Drag the borderless panel by its body
            ReleaseCapture();
            SendMessageW(hwnd, WM_NCLBUTTONDOWN, HTCAPTION as WPARAM, 0);
            0
        }
        WM_LBUTTONDBLCLK => {
            let (x, y) = point_of(lparam);
            let target = with_panel(|state| {
                state
                    .panel
                    .slot_at(x, y)
                    .and_then(|index| state.panel.selected_window(index))
            })
            .flatten();
            if let Some(window) = target {
                activate_window(window);
            }
            0
        }
        WM_RBUTTONUP => {
            let (x, y) = point_of(lparam);
            show_context_menu(hwnd, x, y);
            0
        }
        WM_COMMAND if on_selector_command(hwnd, wparam, lparam) => 0,
        WM_APP_SELECTOR_WHEEL => {
            let index = wparam;
            let delta = lparam as i32;
            if let Some(result) = with_panel(|state| {
                state
                    .panel
                    .handle_selector_event(index, SelectorEvent::Wheel(delta))
            }) {
                report(hwnd, result);
                refresh(hwnd);
            }
            0
        }
        WM_ERASEBKGND => 1,
        WM_PAINT => {
            let mut paint: PAINTSTRUCT = mem::zeroed();
            let dc = BeginPaint(hwnd, &mut paint);
            FillRect(dc, &paint.rcPaint, GetStockObject(BLACK_BRUSH as i32) as HBRUSH);
            EndPaint(hwnd, &paint);
            0
        }
        WM_CLOSE => {
            DestroyWindow(hwnd);
            0
        }
        WM_DESTROY => {
            KillTimer(hwnd, TICK_TIMER_ID);
            if let Some(state) = take_panel() {
                shut_down(hwnd, state);
            }
            PostQuitMessage(0);
            0
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

/// Persist (or forget) settings, then release every thumbnail
fn shut_down(hwnd: HWND, mut state: PanelWindow) {
    if state.reset_requested {
        info!("🔄 Reset requested, clearing saved settings");
        if let Err(e) = state.store.clear() {
            warn!("⚠️ Could not clear settings: {}", e);
        }
        if let Err(e) = state.autostart.set_enabled(false) {
            warn!("⚠️ Could not remove the startup entry: {}", e);
        }
    } else {
        let settings = state.panel.settings(window_position(hwnd));
        debug!("Saving {:?}", settings);
        if let Err(e) = state.store.save(&settings) {
            warn!("⚠️ Could not save settings: {}", e);
        }
    }
    state.panel.shutdown();
}

fn register_class() -> PreviewResult<()> {
    let class_name = to_wide(CLASS_NAME);
    let class = WNDCLASSEXW {
        cbSize: mem::size_of::<WNDCLASSEXW>() as UINT,
        style: CS_DBLCLKS | CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(panel_window_proc),
        cbClsExtra: 0,
        cbWndExtra: 0,
        hInstance: unsafe { GetModuleHandleW(ptr::null()) },
        hIcon: ptr::null_mut(),
        hCursor: unsafe { LoadCursorW(ptr::null_mut(), IDC_ARROW) },
        hbrBackground: unsafe { GetStockObject(BLACK_BRUSH as i32) as HBRUSH },
        lpszMenuName: ptr::null(),
        lpszClassName: class_name.as_ptr(),
        hIconSm: ptr::null_mut(),
    };
    if unsafe { RegisterClassExW(&class) } == 0 {
        let error = unsafe { GetLastError() };
        return Err(PreviewError::Platform(format!(
            "registering the panel class failed: error {}",
            error
        )));
    }
    Ok(())
}

fn create_window(position: (i32, i32), width: i32, height: i32) -> PreviewResult<HWND> {
    let class_name = to_wide(CLASS_NAME);
    let title = to_wide(WINDOW_TITLE);
    let hwnd = unsafe {
        CreateWindowExW(
            WS_EX_APPWINDOW,
            class_name.as_ptr(),
            title.as_ptr(),
            WS_POPUP | WS_CLIPCHILDREN,
            position.0,
            position.1,
            width,
            height,
            ptr::null_mut(),
            ptr::null_mut(),
            GetModuleHandleW(ptr::null()),
            ptr::null_mut(),
        )
    };
    if hwnd.is_null() {
        let error = unsafe { GetLastError() };
        return Err(PreviewError::Platform(format!(
            "creating the panel window failed: error {}",
            error
        )));
    }
    Ok(hwnd)
}

fn install_ctrlc_handler(hwnd: HWND) {
    let target = hwnd as usize;
    let result = ctrlc::set_handler(move || {
        info!("🛑 Ctrl+C received, closing the panel");
        unsafe {
            PostMessageW(target as HWND, WM_CLOSE, 0, 0);
        }
    });
    if let Err(e) = result {
        warn!("⚠️ Could not install the Ctrl+C handler: {}", e);
    }
}

/// Create the panel, run its message loop until it closes and return the
/// process exit code.
pub fn run(config: PanelConfig) -> PreviewResult<i32> {
    unsafe {
        let controls = INITCOMMONCONTROLSEX {
            dwSize: mem::size_of::<INITCOMMONCONTROLSEX>() as u32,
            dwICC: ICC_STANDARD_CLASSES,
        };
        InitCommonControlsEx(&controls);
    }

    let screen_width = unsafe { GetSystemMetrics(SM_CXSCREEN) };
    let capacity = config.effective_capacity(screen_width);
    let store = default_store();
    let settings = store
        .load_or_default()
        .unwrap_or_else(|| Settings::with_slot_count(config.default_slot_count))
        .sanitized(capacity);
    info!(
        "🖥️ Screen width {} fits {} previews, starting with {}",
        screen_width, capacity, settings.slot_count
    );

    register_class()?;
    let width = settings.slot_count as i32 * config.fallback_size().width;
    let height = config.panel_height();
    let hwnd = create_window(settings.position.unwrap_or(DEFAULT_POSITION), width, height)?;

    let host = Win32Host {
        hwnd,
        selector_height: config.drop_height + LIST_HEIGHT,
    };
    let tick_interval = config.tick_interval();
    let panel = Panel::new(
        handle_of(hwnd),
        config,
        capacity,
        &settings,
        Win32WindowSource,
        DwmCompositor,
        host,
    );
    PANEL.with(|cell| {
        *cell.borrow_mut() = Some(PanelWindow {
            panel,
            store,
            autostart: RunKeyAutostart::new(),
            reset_requested: false,
        })
    });

    with_panel(|state| state.panel.start());
    unsafe {
        ShowWindow(hwnd, SW_SHOW);
        UpdateWindow(hwnd);
    }
    refresh(hwnd);

    let timer = unsafe { SetTimer(hwnd, TICK_TIMER_ID, tick_interval.as_millis() as UINT, None) };
    if timer == 0 {
        error!("❌ Could not start the refresh timer");
    }
    install_ctrlc_handler(hwnd);

    let mut msg: MSG = unsafe { mem::zeroed() };
    loop {
        let status = unsafe { GetMessageW(&mut msg, ptr::null_mut(), 0, 0) };
        if status <= 0 {
            break;
        }
        unsafe {
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    info!("👋 Panel closed");
    Ok(msg.wParam as i32)
}
