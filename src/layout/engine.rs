// Layout Engine - recomputes every slot's size and destination each tick

use crate::config::PanelConfig;
use crate::layout::sizing::fit_source;
use crate::slot::model::SlotModel;
use crate::thumbnail::{Compositor, ThumbnailManager};
use crate::window::directory::WindowSource;
use crate::window::info::{Rect, Size, Span};
use log::debug;

/// Result of one layout pass over the active slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutPass {
    pub sizes: Vec<Size>,
    pub spans: Vec<Span>,
    pub total_width: i32,
    /// Slots whose destination rect was pushed to the compositor
    pub pushed: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct LayoutEngine {
    preview_height: i32,
    drop_height: i32,
    fallback: Size,
}

impl LayoutEngine {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            preview_height: config.preview_height,
            drop_height: config.drop_height,
            fallback: config.fallback_size(),
        }
    }

    pub fn fallback(&self) -> Size {
        self.fallback
    }

    /// Lay the active slots out left to right with no gap.
    ///
    /// Selected slots get a thumbnail on demand and are sized from its source;
    /// slots whose window died are released and cleared. Anything without a
    /// usable source size falls back to the configured aspect.
    pub fn run<C, S>(
        &self,
        slots: &mut SlotModel,
        thumbnails: &mut ThumbnailManager<C>,
        source: &S,
    ) -> LayoutPass
    where
        C: Compositor,
        S: WindowSource + ?Sized,
    {
        let mut pass = LayoutPass::default();
        let mut x = 0;

        for (index, slot) in slots.active_slots_mut().iter_mut().enumerate() {
            let size = match slot.selected {
                Some(window) if source.is_alive(window) => {
                    if thumbnails.ensure(slot) {
                        thumbnails
                            .query_source_size(slot)
                            .map(|native| fit_source(native, self.preview_height))
                            .unwrap_or(self.fallback)
                    } else {
                        self.fallback
                    }
                }
                Some(window) => {
                    debug!("Slot {} lost window {:?}", index, window);
                    thumbnails.release(slot);
                    slot.clear_selection();
                    self.fallback
                }
                None => self.fallback,
            };

            let destination = Rect::at(x, self.drop_height, size);
            if thumbnails.place(slot, destination) {
                pass.pushed.push(index);
            }

            slot.span = Span::new(x, size.width);
            pass.sizes.push(size);
            pass.spans.push(slot.span);
            x += size.width;
        }

        pass.total_width = x;
        pass
    }

    /// Spans for `count` fallback-sized slots, used before the first pass
    pub fn fallback_spans(&self, count: usize) -> Vec<Span> {
        (0..count)
            .map(|index| Span::new(index as i32 * self.fallback.width, self.fallback.width))
            .collect()
    }
}
