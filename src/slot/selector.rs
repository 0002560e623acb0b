// Selector Synchronizer - keeps each slot's window list in step with the directory

use crate::window::directory::WindowSource;
use crate::window::info::{Span, WindowEntry, WindowHandle};
use log::trace;

/// One entry of a selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorItem {
    pub title: String,
    pub window: WindowHandle,
}

/// Notifications a selector control delivers to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorEvent {
    SelectionChanged,
    DropdownOpened,
    DropdownClosed,
    /// Wheel rotation over the control; positive is away from the user
    Wheel(i32),
}

/// The list UI attached to one slot.
///
/// Implementations keep the current-selection marker consistent the way a
/// native combo box does: removing the current item clears it, and removing
/// or inserting an item before it moves it along.
pub trait SelectorControl {
    fn item_count(&self) -> usize;
    fn item(&self, index: usize) -> Option<SelectorItem>;
    fn append_item(&mut self, title: &str, window: WindowHandle);
    fn insert_item(&mut self, index: usize, title: &str, window: WindowHandle);
    fn remove_item(&mut self, index: usize);
    fn current(&self) -> Option<usize>;
    fn set_current(&mut self, index: Option<usize>);
    /// Move the control to its slot's horizontal extent
    fn place(&mut self, span: Span);

    fn item_refs(&self) -> Vec<WindowHandle> {
        (0..self.item_count())
            .filter_map(|index| self.item(index))
            .map(|item| item.window)
            .collect()
    }

    fn contents(&self) -> Vec<SelectorItem> {
        (0..self.item_count())
            .filter_map(|index| self.item(index))
            .collect()
    }

    fn find(&self, window: WindowHandle) -> Option<usize> {
        (0..self.item_count()).find(|&index| {
            self.item(index)
                .map(|item| item.window == window)
                .unwrap_or(false)
        })
    }

    fn current_window(&self) -> Option<WindowHandle> {
        self.current()
            .and_then(|index| self.item(index))
            .map(|item| item.window)
    }
}

/// Counts of what a merge or refresh changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub appended: usize,
    pub removed: usize,
    pub retitled: usize,
}

impl SyncStats {
    pub fn is_unchanged(&self) -> bool {
        self.appended == 0 && self.removed == 0 && self.retitled == 0
    }
}

/// Fold a directory snapshot into a selector.
///
/// Entries already listed are left alone, entries missing from the snapshot
/// are removed (except the current entry while its window is still alive),
/// and new windows are appended in snapshot order.
pub fn merge_snapshot<S: WindowSource + ?Sized>(
    control: &mut dyn SelectorControl,
    snapshot: &[WindowEntry],
    source: &S,
) -> SyncStats {
    let mut stats = SyncStats::default();
    let current = control.current();

    for index in (0..control.item_count()).rev() {
        let Some(item) = control.item(index) else {
            continue;
        };
        if snapshot.iter().any(|entry| entry.handle == item.window) {
            continue;
        }
        let keep = current == Some(index) && source.is_alive(item.window);
        if !keep {
            control.remove_item(index);
            stats.removed += 1;
        }
    }

    for entry in snapshot {
        if entry.title.is_empty() {
            continue;
        }
        if control.find(entry.handle).is_none() {
            control.append_item(&entry.title, entry.handle);
            stats.appended += 1;
        }
    }

    if !stats.is_unchanged() {
        trace!("Selector merge: {:?}", stats);
    }
    stats
}

/// Re-validate every entry against the live window: dead windows are
/// dropped, changed non-empty titles replace the stored one in place.
pub fn refresh_titles<S: WindowSource + ?Sized>(
    control: &mut dyn SelectorControl,
    source: &S,
) -> SyncStats {
    let mut stats = SyncStats::default();
    let mut index = 0;
    while index < control.item_count() {
        let Some(item) = control.item(index) else {
            index += 1;
            continue;
        };
        if !source.is_alive(item.window) {
            control.remove_item(index);
            stats.removed += 1;
            continue;
        }
        if let Some(title) = source.title_of(item.window) {
            if !title.is_empty() && title != item.title {
                let was_current = control.current() == Some(index);
                control.remove_item(index);
                control.insert_item(index, &title, item.window);
                if was_current {
                    control.set_current(Some(index));
                }
                stats.retitled += 1;
            }
        }
        index += 1;
    }
    stats
}

/// Selection index after a wheel notch, `None` when the selection stays put
pub fn wheel_step(current: Option<usize>, count: usize, delta: i32) -> Option<usize> {
    if count == 0 || delta == 0 {
        return None;
    }
    match current {
        Some(index) if delta > 0 && index > 0 => Some(index - 1),
        Some(index) if delta < 0 && index + 1 < count => Some(index + 1),
        None if delta < 0 => Some(0),
        _ => None,
    }
}
