// Host integrations for the preview engine

use crate::errors::PreviewResult;

#[cfg(windows)]
pub mod win32;

/// Launch-at-login registration
pub trait Autostart {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&self, enabled: bool) -> PreviewResult<()>;
}
