// Thumbnail Lifecycle Manager - the only code that creates or destroys handles

use crate::slot::model::Slot;
use crate::thumbnail::{Compositor, ThumbnailProps};
use crate::window::info::{Rect, Size, WindowHandle};
use log::{debug, trace, warn};

pub struct ThumbnailManager<C: Compositor> {
    compositor: C,
    panel: WindowHandle,
}

impl<C: Compositor> ThumbnailManager<C> {
    pub fn new(compositor: C, panel: WindowHandle) -> Self {
        Self { compositor, panel }
    }

    /// Make sure a selected slot has a live handle. A failed registration
    /// degrades the slot to unselected so it is not retried every tick.
    /// Returns whether the slot now holds a handle.
    pub fn ensure(&mut self, slot: &mut Slot) -> bool {
        if slot.thumbnail.is_some() {
            return true;
        }
        let Some(target) = slot.selected else {
            return false;
        };
        match self.compositor.register(self.panel, target) {
            Ok(thumbnail) => {
                debug!("Registered thumbnail {:?} for {:?}", thumbnail, target);
                slot.thumbnail = Some(thumbnail);
                slot.last_destination = None;
                true
            }
            Err(e) => {
                warn!("⚠️ Thumbnail registration for {:?} failed: {}", target, e);
                slot.clear_selection();
                false
            }
        }
    }

    /// Release the slot's handle if it has one. Always clears the cached rect.
    pub fn release(&mut self, slot: &mut Slot) {
        if let Some(thumbnail) = slot.thumbnail.take() {
            if let Err(e) = self.compositor.unregister(thumbnail) {
                warn!("⚠️ Unregistering thumbnail {:?} failed: {}", thumbnail, e);
            } else {
                trace!("Released thumbnail {:?}", thumbnail);
            }
        }
        slot.last_destination = None;
    }

    /// Native content size, `None` without a handle or when the source cannot
    /// report one (minimized windows)
    pub fn query_source_size(&self, slot: &Slot) -> Option<Size> {
        let thumbnail = slot.thumbnail?;
        match self.compositor.query_source_size(thumbnail) {
            Ok(size) if size.width > 0 && size.height > 0 => Some(size),
            Ok(_) => None,
            Err(e) => {
                trace!("Source size for {:?} unavailable: {}", thumbnail, e);
                None
            }
        }
    }

    /// Push `destination` unless it equals the rect already pushed for this
    /// handle. The thumbnail is hidden at the new rect first, then shown.
    /// Returns whether the compositor was called.
    pub fn place(&mut self, slot: &mut Slot, destination: Rect) -> bool {
        let Some(thumbnail) = slot.thumbnail else {
            return false;
        };
        if slot.last_destination == Some(destination) {
            return false;
        }
        let result = self
            .compositor
            .update(thumbnail, &ThumbnailProps::hidden_at(destination))
            .and_then(|_| {
                self.compositor
                    .update(thumbnail, &ThumbnailProps::shown_at(destination))
            });
        match result {
            Ok(()) => {
                trace!("Placed thumbnail {:?} at {:?}", thumbnail, destination);
                slot.last_destination = Some(destination);
            }
            Err(e) => {
                warn!("⚠️ Updating thumbnail {:?} failed: {}", thumbnail, e);
                slot.last_destination = None;
            }
        }
        true
    }

    pub fn compositor(&self) -> &C {
        &self.compositor
    }
}
