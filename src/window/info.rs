// Window references and the plain geometry types used by layout

use std::fmt;

/// Opaque reference to a top-level window owned by another process.
///
/// This is a lookup key, never ownership: the window may disappear at any
/// moment, so every use goes through `WindowSource::is_alive`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowHandle(pub u64);

impl WindowHandle {
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HWND({:#x})", self.0)
    }
}

/// One row of a directory snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEntry {
    pub handle: WindowHandle,
    pub title: String,
}

impl WindowEntry {
    pub fn new(handle: WindowHandle, title: impl Into<String>) -> Self {
        Self {
            handle,
            title: title.into(),
        }
    }
}

/// Raw record reported by the host for every top-level window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostWindow {
    pub handle: WindowHandle,
    pub title: String,
    pub visible: bool,
    /// The window is owned by another window (dialogs, tool palettes)
    pub has_owner: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Panel-relative rectangle, edges exclusive on the right and bottom
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn from_bounds(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle of `size` whose top-left corner is at (`left`, `top`)
    pub fn at(left: i32, top: i32, size: Size) -> Self {
        Self::from_bounds(left, top, left + size.width, top + size.height)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RECT({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Horizontal extent of a slot inside the strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub x: i32,
    pub width: i32,
}

impl Span {
    pub fn new(x: i32, width: i32) -> Self {
        Self { x, width }
    }

    pub fn contains(&self, x: i32) -> bool {
        x >= self.x && x < self.x + self.width
    }
}
