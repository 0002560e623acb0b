// Live thumbnails: the compositor seam and the per-slot handle lifecycle

pub mod manager;

pub use manager::ThumbnailManager;

use crate::errors::CompositorError;
use crate::window::info::{Rect, Size, WindowHandle};

/// Opaque compositor registration owned by exactly one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThumbnailId(pub u64);

/// Property update for a registered thumbnail; `None` fields are left unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThumbnailProps {
    pub destination: Option<Rect>,
    pub visible: Option<bool>,
    pub source_client_area_only: Option<bool>,
    pub opacity: Option<u8>,
}

impl ThumbnailProps {
    /// Move to `destination` while invisible; clears residual images
    pub fn hidden_at(destination: Rect) -> Self {
        Self {
            destination: Some(destination),
            visible: Some(false),
            ..Self::default()
        }
    }

    /// Show at `destination`, client area only, fully opaque
    pub fn shown_at(destination: Rect) -> Self {
        Self {
            destination: Some(destination),
            visible: Some(true),
            source_client_area_only: Some(true),
            opacity: Some(u8::MAX),
        }
    }
}

/// The host's window-composition surface
pub trait Compositor {
    /// Mirror `target` into `panel`
    fn register(
        &mut self,
        panel: WindowHandle,
        target: WindowHandle,
    ) -> Result<ThumbnailId, CompositorError>;

    fn unregister(&mut self, thumbnail: ThumbnailId) -> Result<(), CompositorError>;

    /// Native size of the mirrored window's content
    fn query_source_size(&self, thumbnail: ThumbnailId) -> Result<Size, CompositorError>;

    fn update(
        &mut self,
        thumbnail: ThumbnailId,
        props: &ThumbnailProps,
    ) -> Result<(), CompositorError>;
}
