// Slot Count Editor - insert and remove slots while keeping handles consistent

use crate::errors::{PreviewError, PreviewResult};
use crate::slot::model::SlotModel;
use crate::thumbnail::{Compositor, ThumbnailManager};
use crate::window::info::Span;
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Remove,
}

/// What an insert or remove did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotEdit {
    pub kind: EditKind,
    /// Position of the new slot, or of the slot that was removed
    pub index: usize,
    pub active_before: usize,
    pub active_after: usize,
}

/// Slot whose horizontal extent contains `x`
pub fn resolve_target(spans: &[Span], x: i32) -> Option<usize> {
    spans.iter().position(|span| span.contains(x))
}

/// Insert an empty slot right of `target`, or at the end when there is no target.
///
/// Every handle from the insertion point through the old last slot is
/// released, because those slots now sit at different positions.
pub fn insert_after<C: Compositor>(
    slots: &mut SlotModel,
    thumbnails: &mut ThumbnailManager<C>,
    target: Option<usize>,
) -> PreviewResult<SlotEdit> {
    let active = slots.active_count();
    if slots.is_full() {
        return Err(PreviewError::CapacityReached {
            capacity: slots.capacity(),
        });
    }
    let position = match target {
        Some(index) if index < active => index + 1,
        Some(index) => return Err(PreviewError::SlotOutOfRange { index, active }),
        None => active,
    };

    for slot in &mut slots.active_slots_mut()[position..] {
        thumbnails.release(slot);
    }
    slots.shift_selections_right(position);
    slots.set_active_count(active + 1);

    info!("➕ Inserted slot at {} ({} -> {})", position, active, active + 1);
    Ok(SlotEdit {
        kind: EditKind::Insert,
        index: position,
        active_before: active,
        active_after: active + 1,
    })
}

/// Remove the slot at `target`, or the last slot when there is no target.
///
/// Handles from the target through the old last slot are released.
pub fn remove_at<C: Compositor>(
    slots: &mut SlotModel,
    thumbnails: &mut ThumbnailManager<C>,
    target: Option<usize>,
) -> PreviewResult<SlotEdit> {
    let active = slots.active_count();
    if active <= 1 {
        return Err(PreviewError::MinimumReached);
    }
    let index = match target {
        Some(index) if index < active => index,
        Some(index) => return Err(PreviewError::SlotOutOfRange { index, active }),
        None => active - 1,
    };

    for slot in &mut slots.active_slots_mut()[index..] {
        thumbnails.release(slot);
    }
    slots.shift_selections_left(index);
    slots.set_active_count(active - 1);

    info!("➖ Removed slot {} ({} -> {})", index, active, active - 1);
    Ok(SlotEdit {
        kind: EditKind::Remove,
        index,
        active_before: active,
        active_after: active - 1,
    })
}
