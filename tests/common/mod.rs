//! In-memory stand-ins for the desktop, shared by the integration tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use winview_strip::{
    CompositorError, HostWindow, Panel, PanelConfig, PanelHost, PreviewError, PreviewResult,
    SelectorControl, SelectorItem, Settings, Size, Span, ThumbnailId, ThumbnailProps,
    WindowHandle, WindowSource,
};
use winview_strip::thumbnail::Compositor;

pub const PANEL: WindowHandle = WindowHandle(1);

pub type TestPanel = Panel<FakeSource, FakeCompositor, FakeHost>;

/// Desktop with a fixed list of top-level windows
#[derive(Debug, Default, Clone)]
pub struct FakeSource {
    pub windows: Vec<HostWindow>,
}

impl FakeSource {
    pub fn with_windows(windows: &[(u64, &str)]) -> Self {
        let mut source = Self::default();
        for (id, title) in windows {
            source.add(*id, title);
        }
        source
    }

    pub fn add(&mut self, id: u64, title: &str) {
        self.windows.push(HostWindow {
            handle: WindowHandle(id),
            title: title.to_string(),
            visible: true,
            has_owner: false,
        });
    }

    pub fn add_hidden(&mut self, id: u64, title: &str) {
        self.add(id, title);
        if let Some(window) = self.windows.last_mut() {
            window.visible = false;
        }
    }

    pub fn kill(&mut self, id: u64) {
        self.windows.retain(|window| window.handle != WindowHandle(id));
    }

    pub fn retitle(&mut self, id: u64, title: &str) {
        for window in &mut self.windows {
            if window.handle == WindowHandle(id) {
                window.title = title.to_string();
            }
        }
    }
}

impl WindowSource for FakeSource {
    fn top_level_windows(&self) -> Vec<HostWindow> {
        self.windows.clone()
    }

    fn is_alive(&self, handle: WindowHandle) -> bool {
        self.windows.iter().any(|window| window.handle == handle)
    }

    fn title_of(&self, handle: WindowHandle) -> Option<String> {
        self.windows
            .iter()
            .find(|window| window.handle == handle)
            .map(|window| window.title.clone())
    }
}

#[derive(Debug, Default)]
pub struct CompositorState {
    next: u64,
    /// Registered handles and the window each mirrors
    pub live: HashMap<ThumbnailId, WindowHandle>,
    pub registrations: usize,
    pub unregistrations: usize,
    pub updates: Vec<(ThumbnailId, ThumbnailProps)>,
    /// Native sizes by mirrored window; missing windows report no size
    pub sizes: HashMap<WindowHandle, Size>,
    pub failing: HashSet<WindowHandle>,
}

/// Counting compositor; clones share the same state
#[derive(Debug, Default, Clone)]
pub struct FakeCompositor {
    pub state: Rc<RefCell<CompositorState>>,
}

impl FakeCompositor {
    pub fn set_size(&self, window: u64, width: i32, height: i32) {
        self.state
            .borrow_mut()
            .sizes
            .insert(WindowHandle(window), Size::new(width, height));
    }

    pub fn fail_for(&self, window: u64) {
        self.state.borrow_mut().failing.insert(WindowHandle(window));
    }

    pub fn live_count(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub fn registrations(&self) -> usize {
        self.state.borrow().registrations
    }

    pub fn update_count(&self) -> usize {
        self.state.borrow().updates.len()
    }

    pub fn live_handles(&self) -> HashSet<ThumbnailId> {
        self.state.borrow().live.keys().copied().collect()
    }
}

impl Compositor for FakeCompositor {
    fn register(
        &mut self,
        _panel: WindowHandle,
        target: WindowHandle,
    ) -> Result<ThumbnailId, CompositorError> {
        let mut state = self.state.borrow_mut();
        state.registrations += 1;
        if state.failing.contains(&target) {
            return Err(CompositorError::Failed {
                op: "register",
                code: -1,
            });
        }
        state.next += 1;
        let id = ThumbnailId(state.next);
        state.live.insert(id, target);
        Ok(id)
    }

    fn unregister(&mut self, thumbnail: ThumbnailId) -> Result<(), CompositorError> {
        let mut state = self.state.borrow_mut();
        state.unregistrations += 1;
        state
            .live
            .remove(&thumbnail)
            .map(|_| ())
            .ok_or(CompositorError::UnknownHandle(thumbnail.0))
    }

    fn query_source_size(&self, thumbnail: ThumbnailId) -> Result<Size, CompositorError> {
        let state = self.state.borrow();
        let window = state
            .live
            .get(&thumbnail)
            .ok_or(CompositorError::UnknownHandle(thumbnail.0))?;
        state
            .sizes
            .get(window)
            .copied()
            .ok_or(CompositorError::Unavailable)
    }

    fn update(
        &mut self,
        thumbnail: ThumbnailId,
        props: &ThumbnailProps,
    ) -> Result<(), CompositorError> {
        let mut state = self.state.borrow_mut();
        if !state.live.contains_key(&thumbnail) {
            return Err(CompositorError::UnknownHandle(thumbnail.0));
        }
        state.updates.push((thumbnail, *props));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SelectorState {
    pub items: Vec<SelectorItem>,
    pub current: Option<usize>,
    pub span: Option<Span>,
}

/// Selector whose list the test can see and drive
pub struct MemorySelector {
    state: Rc<RefCell<SelectorState>>,
}

impl SelectorControl for MemorySelector {
    fn item_count(&self) -> usize {
        self.state.borrow().items.len()
    }

    fn item(&self, index: usize) -> Option<SelectorItem> {
        self.state.borrow().items.get(index).cloned()
    }

    fn append_item(&mut self, title: &str, window: WindowHandle) {
        self.state.borrow_mut().items.push(SelectorItem {
            title: title.to_string(),
            window,
        });
    }

    fn insert_item(&mut self, index: usize, title: &str, window: WindowHandle) {
        let mut state = self.state.borrow_mut();
        let index = index.min(state.items.len());
        state.items.insert(
            index,
            SelectorItem {
                title: title.to_string(),
                window,
            },
        );
        if let Some(current) = state.current {
            if index <= current {
                state.current = Some(current + 1);
            }
        }
    }

    fn remove_item(&mut self, index: usize) {
        let mut state = self.state.borrow_mut();
        if index >= state.items.len() {
            return;
        }
        state.items.remove(index);
        state.current = match state.current {
            Some(current) if current == index => None,
            Some(current) if current > index => Some(current - 1),
            other => other,
        };
    }

    fn current(&self) -> Option<usize> {
        self.state.borrow().current
    }

    fn set_current(&mut self, index: Option<usize>) {
        let mut state = self.state.borrow_mut();
        state.current = index.filter(|&index| index < state.items.len());
    }

    fn place(&mut self, span: Span) {
        self.state.borrow_mut().span = Some(span);
    }
}

/// Panel chrome that records what the engine asked of it
#[derive(Default)]
pub struct FakeHost {
    /// Latest selector created for each slot index
    pub selectors: HashMap<usize, Rc<RefCell<SelectorState>>>,
    pub created: usize,
    pub resizes: Vec<(i32, i32)>,
    pub on_top: Option<bool>,
    pub fail_selectors: bool,
}

impl FakeHost {
    pub fn selector(&self, index: usize) -> Rc<RefCell<SelectorState>> {
        Rc::clone(&self.selectors[&index])
    }

    /// Make `window` the current entry of slot `index`'s list, as a user would
    pub fn choose(&self, index: usize, window: u64) {
        let selector = self.selector(index);
        let mut state = selector.borrow_mut();
        let position = state
            .items
            .iter()
            .position(|item| item.window == WindowHandle(window))
            .unwrap_or_else(|| panic!("slot {} does not list window {:#x}", index, window));
        state.current = Some(position);
    }

    pub fn titles(&self, index: usize) -> Vec<String> {
        self.selector(index)
            .borrow()
            .items
            .iter()
            .map(|item| item.title.clone())
            .collect()
    }
}

impl PanelHost for FakeHost {
    fn create_selector(
        &mut self,
        index: usize,
        span: Span,
    ) -> PreviewResult<Box<dyn SelectorControl>> {
        if self.fail_selectors {
            return Err(PreviewError::Platform("no controls".to_string()));
        }
        let state = Rc::new(RefCell::new(SelectorState {
            span: Some(span),
            ..SelectorState::default()
        }));
        self.selectors.insert(index, Rc::clone(&state));
        self.created += 1;
        Ok(Box::new(MemorySelector { state }))
    }

    fn resize_panel(&mut self, width: i32, height: i32) {
        self.resizes.push((width, height));
    }

    fn set_always_on_top(&mut self, on_top: bool) {
        self.on_top = Some(on_top);
    }
}

/// Started panel over `windows` with `slot_count` slots and default config
pub fn panel_with(
    windows: &[(u64, &str)],
    slot_count: usize,
    capacity: usize,
) -> (TestPanel, FakeCompositor) {
    let compositor = FakeCompositor::default();
    let mut panel = Panel::new(
        PANEL,
        PanelConfig::default(),
        capacity,
        &Settings::with_slot_count(slot_count),
        FakeSource::with_windows(windows),
        compositor.clone(),
        FakeHost::default(),
    );
    panel.start();
    (panel, compositor)
}

/// Thumbnails the slots believe they own
pub fn slot_handles(panel: &TestPanel) -> HashSet<ThumbnailId> {
    panel
        .slots()
        .all_slots()
        .iter()
        .filter_map(|slot| slot.thumbnail())
        .collect()
}

pub fn select(panel: &mut TestPanel, index: usize, window: u64) {
    panel.host().choose(index, window);
    panel
        .handle_selector_event(index, winview_strip::SelectorEvent::SelectionChanged)
        .unwrap();
}
