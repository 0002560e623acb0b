// Live multi-window preview strip.
//
// The engine in this crate is platform independent: it talks to the desktop
// through the `WindowSource`, `Compositor`, `SelectorControl` and `PanelHost`
// traits. The Win32 implementations of those live in `platform::win32`.

pub mod config;
pub mod editor;
pub mod errors;
pub mod layout;
pub mod panel;
pub mod platform;
pub mod slot;
pub mod thumbnail;
pub mod window;

// Re-export the main types for easy access
pub use config::{
    AspectRatio, JsonSettingsStore, NullSettingsStore, PanelConfig, Settings, SettingsStore,
};
pub use editor::{EditKind, SlotEdit};
pub use errors::{CompositorError, PreviewError, PreviewResult};
pub use layout::{LayoutEngine, LayoutPass};
pub use panel::{Panel, PanelHost, TickState};
pub use slot::{SelectorControl, SelectorEvent, SelectorItem, Slot, SlotModel};
pub use thumbnail::{Compositor, ThumbnailId, ThumbnailManager, ThumbnailProps};
pub use window::{HostWindow, Rect, Size, Span, WindowEntry, WindowHandle, WindowSource};
