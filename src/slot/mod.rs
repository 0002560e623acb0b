// Slot model and the selector controls that mirror it

pub mod model;
pub mod selector;

pub use model::{Slot, SlotModel};
pub use selector::{SelectorControl, SelectorEvent, SelectorItem};
