// Slot Model - fixed-capacity, index-addressed array of preview slots

use crate::slot::selector::SelectorControl;
use crate::thumbnail::ThumbnailId;
use crate::window::info::{Rect, Span, WindowHandle};
use std::collections::HashSet;
use std::fmt;

/// One preview position in the strip
#[derive(Default)]
pub struct Slot {
    pub(crate) selected: Option<WindowHandle>,
    pub(crate) thumbnail: Option<ThumbnailId>,
    pub(crate) last_destination: Option<Rect>,
    pub(crate) span: Span,
    pub(crate) selector: Option<Box<dyn SelectorControl>>,
}

impl Slot {
    pub fn selected(&self) -> Option<WindowHandle> {
        self.selected
    }

    pub fn thumbnail(&self) -> Option<ThumbnailId> {
        self.thumbnail
    }

    /// Last rectangle pushed to the compositor; only meaningful while the handle lives
    pub fn last_destination(&self) -> Option<Rect> {
        self.last_destination
    }

    /// Horizontal extent computed by the most recent layout pass
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn selector(&self) -> Option<&dyn SelectorControl> {
        self.selector.as_deref()
    }

    pub fn selector_mut(&mut self) -> Option<&mut (dyn SelectorControl + 'static)> {
        self.selector.as_deref_mut()
    }

    /// Drop the selection and unmark it in the selector. Does not touch the
    /// thumbnail; callers release it through the thumbnail manager.
    pub(crate) fn clear_selection(&mut self) {
        self.selected = None;
        if let Some(selector) = self.selector.as_deref_mut() {
            selector.set_current(None);
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("selected", &self.selected)
            .field("thumbnail", &self.thumbnail)
            .field("last_destination", &self.last_destination)
            .field("span", &self.span)
            .field("has_selector", &self.selector.is_some())
            .finish()
    }
}

/// Storage is sized once by capacity; inserts and removes only shift contents
/// and move the active count.
pub struct SlotModel {
    slots: Vec<Slot>,
    active: usize,
}

impl SlotModel {
    pub fn new(capacity: usize, active: usize) -> Self {
        let capacity = capacity.max(1);
        let slots = (0..capacity).map(|_| Slot::default()).collect();
        Self {
            slots,
            active: active.clamp(1, capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn is_full(&self) -> bool {
        self.active == self.slots.len()
    }

    pub(crate) fn set_active_count(&mut self, active: usize) {
        debug_assert!(active >= 1 && active <= self.slots.len());
        self.active = active;
    }

    /// Active slot at `index`
    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.active_slots().get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Slot> {
        self.active_slots_mut().get_mut(index)
    }

    pub fn active_slots(&self) -> &[Slot] {
        &self.slots[..self.active]
    }

    pub fn active_slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots[..self.active]
    }

    /// Every slot up to capacity, active or not
    pub fn all_slots(&self) -> &[Slot] {
        &self.slots
    }

    pub(crate) fn all_slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots
    }

    pub fn selections(&self) -> Vec<Option<WindowHandle>> {
        self.active_slots().iter().map(|slot| slot.selected).collect()
    }

    pub fn spans(&self) -> Vec<Span> {
        self.active_slots().iter().map(|slot| slot.span).collect()
    }

    /// Move selections at `from..active` one slot to the right, leaving `from` empty.
    /// The caller grows the active count afterwards.
    pub(crate) fn shift_selections_right(&mut self, from: usize) {
        debug_assert!(self.active < self.slots.len());
        for index in (from..self.active).rev() {
            self.slots[index + 1].selected = self.slots[index].selected;
        }
        if let Some(slot) = self.slots.get_mut(from) {
            slot.selected = None;
        }
    }

    /// Move selections after `target` one slot to the left, clearing the last active slot.
    pub(crate) fn shift_selections_left(&mut self, target: usize) {
        let last = self.active - 1;
        for index in target..last {
            self.slots[index].selected = self.slots[index + 1].selected;
        }
        self.slots[last].selected = None;
    }

    /// Verify the slot invariants, returning a description of the first violation
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if index >= self.active {
                if slot.thumbnail.is_some() {
                    return Err(format!("inactive slot {} holds a thumbnail", index));
                }
                if slot.selected.is_some() {
                    return Err(format!("inactive slot {} holds a selection", index));
                }
            }
            if let Some(thumbnail) = slot.thumbnail {
                if slot.selected.is_none() {
                    return Err(format!("slot {} has a thumbnail but no selection", index));
                }
                if !seen.insert(thumbnail) {
                    return Err(format!("thumbnail {:?} is shared by two slots", thumbnail));
                }
            } else if slot.last_destination.is_some() {
                return Err(format!("slot {} caches a rect without a thumbnail", index));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with(selections: &[Option<u64>], capacity: usize) -> SlotModel {
        let mut model = SlotModel::new(capacity, selections.len());
        for (slot, selection) in model.active_slots_mut().iter_mut().zip(selections) {
            slot.selected = selection.map(WindowHandle);
        }
        model
    }

    #[test]
    fn test_new_clamps_active_count() {
        assert_eq!(SlotModel::new(4, 0).active_count(), 1);
        assert_eq!(SlotModel::new(4, 9).active_count(), 4);
        assert_eq!(SlotModel::new(4, 2).capacity(), 4);
    }

    #[test]
    fn test_shift_right_opens_gap() {
        let mut model = model_with(&[Some(1), Some(2), Some(3)], 5);
        model.shift_selections_right(1);
        model.set_active_count(4);
        assert_eq!(
            model.selections(),
            vec![Some(WindowHandle(1)), None, Some(WindowHandle(2)), Some(WindowHandle(3))]
        );
    }

    #[test]
    fn test_shift_left_closes_gap() {
        let mut model = model_with(&[Some(1), Some(2), Some(3)], 5);
        model.shift_selections_left(0);
        model.set_active_count(2);
        assert_eq!(
            model.selections(),
            vec![Some(WindowHandle(2)), Some(WindowHandle(3))]
        );
        assert!(model.all_slots()[2].selected.is_none());
    }

    #[test]
    fn test_invariants_detect_orphaned_thumbnail() {
        let mut model = model_with(&[None, Some(2)], 3);
        assert!(model.check_invariants().is_ok());
        model.all_slots_mut()[0].thumbnail = Some(ThumbnailId(7));
        assert!(model.check_invariants().is_err());
    }

    #[test]
    fn test_invariants_detect_inactive_leftovers() {
        let mut model = model_with(&[Some(1)], 3);
        model.all_slots_mut()[2].selected = Some(WindowHandle(9));
        assert!(model.check_invariants().is_err());
    }
}
