// Panel - the single owned aggregate every engine component works through

use crate::config::{PanelConfig, Settings};
use crate::editor::{self, SlotEdit};
use crate::errors::{PreviewError, PreviewResult};
use crate::layout::{LayoutEngine, LayoutPass};
use crate::slot::model::SlotModel;
use crate::slot::selector::{self, SelectorControl, SelectorEvent};
use crate::thumbnail::{Compositor, ThumbnailManager};
use crate::window::directory::{DirectoryFilter, WindowDirectory, WindowSource};
use crate::window::info::{Span, WindowHandle};
use log::{debug, info, trace, warn};

/// Panel chrome the engine drives but does not own
pub trait PanelHost {
    /// Create the selector control for slot `index`, placed at `span`
    fn create_selector(
        &mut self,
        index: usize,
        span: Span,
    ) -> PreviewResult<Box<dyn SelectorControl>>;

    /// Resize the panel's client area, keeping its position
    fn resize_panel(&mut self, width: i32, height: i32);

    fn set_always_on_top(&mut self, on_top: bool);
}

/// Whether the passive refresh may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickState {
    Idle,
    /// A selector list is open; ticks are skipped until it closes
    DropdownOpen,
}

pub struct Panel<S: WindowSource, C: Compositor, H: PanelHost> {
    handle: WindowHandle,
    config: PanelConfig,
    slots: SlotModel,
    directory: WindowDirectory<S>,
    thumbnails: ThumbnailManager<C>,
    layout: LayoutEngine,
    host: H,
    width: i32,
    always_on_top: bool,
    state: TickState,
    last_click: Option<i32>,
}

impl<S: WindowSource, C: Compositor, H: PanelHost> Panel<S, C, H> {
    /// `capacity` is the storage size; `settings` supplies the initial slot
    /// count and pin state, clamped into range.
    pub fn new(
        handle: WindowHandle,
        config: PanelConfig,
        capacity: usize,
        settings: &Settings,
        source: S,
        compositor: C,
        host: H,
    ) -> Self {
        let settings = settings.clone().sanitized(capacity);
        let layout = LayoutEngine::new(&config);
        let mut slots = SlotModel::new(capacity, settings.slot_count);
        let spans = layout.fallback_spans(slots.active_count());
        for (slot, span) in slots.active_slots_mut().iter_mut().zip(spans) {
            slot.span = span;
        }
        let width = slots.active_count() as i32 * layout.fallback().width;
        let directory = WindowDirectory::new(source, DirectoryFilter::from_config(&config));

        info!(
            "Panel {:?}: {} of {} slots, {}x{}",
            handle,
            slots.active_count(),
            slots.capacity(),
            width,
            config.panel_height()
        );

        Self {
            handle,
            config,
            slots,
            directory,
            thumbnails: ThumbnailManager::new(compositor, handle),
            layout,
            host,
            width,
            always_on_top: settings.always_on_top,
            state: TickState::Idle,
            last_click: None,
        }
    }

    /// Build the selector controls and apply the initial pin state
    pub fn start(&mut self) {
        if self.always_on_top {
            self.host.set_always_on_top(true);
        }
        self.rebuild_selectors();
    }

    /// One passive refresh: enumerate, merge selectors, lay out, reposition.
    /// Returns `None` when skipped because a dropdown is open.
    pub fn tick(&mut self) -> Option<LayoutPass> {
        if self.state == TickState::DropdownOpen {
            trace!("Tick skipped while a dropdown is open");
            return None;
        }

        let snapshot = self.directory.enumerate(self.handle);
        let source = self.directory.source();
        for slot in self.slots.active_slots_mut() {
            if let Some(control) = slot.selector.as_deref_mut() {
                selector::merge_snapshot(control, &snapshot, source);
            }
        }

        let pass = self
            .layout
            .run(&mut self.slots, &mut self.thumbnails, self.directory.source());

        if pass.total_width != self.width {
            debug!("Panel width {} -> {}", self.width, pass.total_width);
            self.width = pass.total_width;
            self.host
                .resize_panel(self.width, self.config.panel_height());
        }

        let source = self.directory.source();
        for (slot, span) in self.slots.active_slots_mut().iter_mut().zip(&pass.spans) {
            if let Some(control) = slot.selector.as_deref_mut() {
                control.place(*span);
                selector::refresh_titles(control, source);
            }
        }

        Some(pass)
    }

    pub fn handle_selector_event(
        &mut self,
        index: usize,
        event: SelectorEvent,
    ) -> PreviewResult<()> {
        self.check_index(index)?;
        match event {
            SelectorEvent::DropdownOpened => self.state = TickState::DropdownOpen,
            SelectorEvent::DropdownClosed => self.state = TickState::Idle,
            SelectorEvent::SelectionChanged => self.select(index)?,
            SelectorEvent::Wheel(delta) => {
                let Some(control) = self.slots.get_mut(index).and_then(|s| s.selector_mut())
                else {
                    return Ok(());
                };
                if let Some(next) =
                    selector::wheel_step(control.current(), control.item_count(), delta)
                {
                    control.set_current(Some(next));
                    self.select(index)?;
                }
            }
        }
        Ok(())
    }

    /// Adopt the selector's current entry as the slot's selection. The old
    /// handle is released now; the next tick creates the new one.
    pub fn select(&mut self, index: usize) -> PreviewResult<()> {
        self.check_index(index)?;
        let Some(slot) = self.slots.get_mut(index) else {
            return Ok(());
        };
        let Some(window) = slot.selector().and_then(|control| control.current_window()) else {
            return Ok(());
        };
        debug!("Slot {} selected {:?}", index, window);
        slot.selected = Some(window);
        self.thumbnails.release(slot);
        Ok(())
    }

    /// Remember where the pointer was when the context menu opened
    pub fn record_click(&mut self, x: i32) {
        self.last_click = Some(x);
    }

    /// Insert right of the slot under the recorded click, else at the end
    pub fn insert_slot(&mut self) -> PreviewResult<SlotEdit> {
        let target = self.take_click_target();
        self.insert_after(target)
    }

    /// Remove the slot under the recorded click, else the last one
    pub fn remove_slot(&mut self) -> PreviewResult<SlotEdit> {
        let target = self.take_click_target();
        self.remove_at(target)
    }

    pub fn insert_after(&mut self, target: Option<usize>) -> PreviewResult<SlotEdit> {
        let edit = editor::insert_after(&mut self.slots, &mut self.thumbnails, target)?;
        self.rebuild_selectors();
        Ok(edit)
    }

    pub fn remove_at(&mut self, target: Option<usize>) -> PreviewResult<SlotEdit> {
        let edit = editor::remove_at(&mut self.slots, &mut self.thumbnails, target)?;
        self.rebuild_selectors();
        Ok(edit)
    }

    fn take_click_target(&mut self) -> Option<usize> {
        let x = self.last_click.take()?;
        editor::resolve_target(&self.slots.spans(), x)
    }

    /// Recreate every selector control for the active range and restore each
    /// slot's selection; selections that no longer resolve are dropped.
    fn rebuild_selectors(&mut self) {
        for slot in self.slots.all_slots_mut() {
            slot.selector = None;
        }

        let snapshot = self.directory.enumerate(self.handle);
        let spans = self.layout.fallback_spans(self.slots.active_count());
        let active = self.slots.active_count();
        let source = self.directory.source();

        for (index, slot) in self.slots.all_slots_mut().iter_mut().enumerate() {
            if index >= active {
                self.thumbnails.release(slot);
                slot.selected = None;
                continue;
            }
            slot.span = spans[index];
            let mut control = match self.host.create_selector(index, slot.span) {
                Ok(control) => control,
                Err(e) => {
                    warn!("⚠️ No selector for slot {}: {}", index, e);
                    slot.selected = None;
                    self.thumbnails.release(slot);
                    continue;
                }
            };
            selector::merge_snapshot(control.as_mut(), &snapshot, source);
            if let Some(window) = slot.selected {
                match control.find(window) {
                    Some(item) => control.set_current(Some(item)),
                    None => {
                        debug!("Slot {} dropped unresolved {:?}", index, window);
                        slot.selected = None;
                        self.thumbnails.release(slot);
                    }
                }
            }
            slot.selector = Some(control);
        }

        debug_assert!(self.slots.check_invariants().is_ok());
    }

    pub fn toggle_always_on_top(&mut self) -> bool {
        self.always_on_top = !self.always_on_top;
        self.host.set_always_on_top(self.always_on_top);
        info!("Always on top: {}", self.always_on_top);
        self.always_on_top
    }

    /// Slot whose preview area contains the panel-relative point
    pub fn slot_at(&self, x: i32, y: i32) -> Option<usize> {
        let top = self.config.drop_height;
        if y < top || y > top + self.config.preview_height {
            return None;
        }
        editor::resolve_target(&self.slots.spans(), x)
    }

    pub fn selected_window(&self, index: usize) -> Option<WindowHandle> {
        self.slots.get(index).and_then(|slot| slot.selected)
    }

    /// Settings record to persist at shutdown
    pub fn settings(&self, position: Option<(i32, i32)>) -> Settings {
        Settings {
            position,
            always_on_top: self.always_on_top,
            slot_count: self.slots.active_count(),
        }
    }

    /// Release every thumbnail up to capacity and drop the selector controls.
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        let mut released = 0;
        for slot in self.slots.all_slots_mut() {
            if slot.thumbnail.is_some() {
                released += 1;
            }
            self.thumbnails.release(slot);
            slot.selector = None;
        }
        if released > 0 {
            info!("🧹 Released {} thumbnails", released);
        }
    }

    fn check_index(&self, index: usize) -> PreviewResult<()> {
        let active = self.slots.active_count();
        if index < active {
            Ok(())
        } else {
            Err(PreviewError::SlotOutOfRange { index, active })
        }
    }

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn slots(&self) -> &SlotModel {
        &self.slots
    }

    pub fn active_count(&self) -> usize {
        self.slots.active_count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Client width as last pushed to the host
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.config.panel_height()
    }

    pub fn always_on_top(&self) -> bool {
        self.always_on_top
    }

    pub fn tick_state(&self) -> TickState {
        self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn source(&self) -> &S {
        self.directory.source()
    }

    pub fn source_mut(&mut self) -> &mut S {
        self.directory.source_mut()
    }

    pub fn compositor(&self) -> &C {
        self.thumbnails.compositor()
    }
}

impl<S: WindowSource, C: Compositor, H: PanelHost> Drop for Panel<S, C, H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
