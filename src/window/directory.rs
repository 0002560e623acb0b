// Window Directory - filtered snapshot of the windows a slot may preview

use crate::config::PanelConfig;
use crate::window::info::{HostWindow, WindowEntry, WindowHandle};

/// Host windowing primitives the engine reads from. Read-only.
pub trait WindowSource {
    /// Every top-level window in system enumeration order
    fn top_level_windows(&self) -> Vec<HostWindow>;

    /// Whether the handle still names an existing window
    fn is_alive(&self, handle: WindowHandle) -> bool;

    /// Current title, `None` when the window is gone
    fn title_of(&self, handle: WindowHandle) -> Option<String>;
}

impl<S: WindowSource + ?Sized> WindowSource for &S {
    fn top_level_windows(&self) -> Vec<HostWindow> {
        (**self).top_level_windows()
    }

    fn is_alive(&self, handle: WindowHandle) -> bool {
        (**self).is_alive(handle)
    }

    fn title_of(&self, handle: WindowHandle) -> Option<String> {
        (**self).title_of(handle)
    }
}

/// Exclusion rules applied to every enumeration
#[derive(Debug, Clone, Default)]
pub struct DirectoryFilter {
    pub exclude_owned: bool,
    pub excluded_substrings: Vec<String>,
}

impl DirectoryFilter {
    pub fn from_config(config: &PanelConfig) -> Self {
        Self {
            exclude_owned: config.exclude_owned_windows,
            excluded_substrings: config.excluded_title_substrings.clone(),
        }
    }

    /// Filters in order: own panel, owned windows, hidden windows, empty
    /// titles, excluded title substrings.
    pub fn accepts(&self, window: &HostWindow, panel: WindowHandle) -> bool {
        if window.handle == panel {
            return false;
        }
        if self.exclude_owned && window.has_owner {
            return false;
        }
        if !window.visible {
            return false;
        }
        if window.title.is_empty() {
            return false;
        }
        !self
            .excluded_substrings
            .iter()
            .any(|excluded| window.title.contains(excluded.as_str()))
    }
}

pub struct WindowDirectory<S: WindowSource> {
    source: S,
    filter: DirectoryFilter,
}

impl<S: WindowSource> WindowDirectory<S> {
    pub fn new(source: S, filter: DirectoryFilter) -> Self {
        Self { source, filter }
    }

    /// Fresh snapshot of selectable windows; call again to refresh
    pub fn enumerate(&self, exclude: WindowHandle) -> Vec<WindowEntry> {
        self.source
            .top_level_windows()
            .into_iter()
            .filter(|window| self.filter.accepts(window, exclude))
            .map(|window| WindowEntry::new(window.handle, window.title))
            .collect()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
