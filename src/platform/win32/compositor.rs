// DWM thumbnails behind the Compositor trait

use super::hwnd_of;
use crate::errors::CompositorError;
use crate::thumbnail::{Compositor, ThumbnailId, ThumbnailProps};
use crate::window::info::{Size, WindowHandle};
use std::ptr;
use winapi::shared::minwindef::{FALSE, TRUE};
use winapi::shared::windef::{RECT, SIZE};
use winapi::shared::winerror::SUCCEEDED;
use winapi::um::dwmapi::{
    DwmQueryThumbnailSourceSize, DwmRegisterThumbnail, DwmUnregisterThumbnail,
    DwmUpdateThumbnailProperties, DWM_THUMBNAIL_PROPERTIES, DWM_TNP_OPACITY,
    DWM_TNP_RECTDESTINATION, DWM_TNP_SOURCECLIENTAREAONLY, DWM_TNP_VISIBLE, HTHUMBNAIL,
};

pub struct DwmCompositor;

fn thumbnail_of(id: ThumbnailId) -> HTHUMBNAIL {
    id.0 as usize as HTHUMBNAIL
}

fn failed(op: &'static str, hr: i32) -> CompositorError {
    CompositorError::Failed {
        op,
        code: hr as u32 as i64,
    }
}

impl Compositor for DwmCompositor {
    fn register(
        &mut self,
        panel: WindowHandle,
        target: WindowHandle,
    ) -> Result<ThumbnailId, CompositorError> {
        let mut thumbnail: HTHUMBNAIL = ptr::null_mut();
        let hr = unsafe { DwmRegisterThumbnail(hwnd_of(panel), hwnd_of(target), &mut thumbnail) };
        if SUCCEEDED(hr) && !thumbnail.is_null() {
            Ok(ThumbnailId(thumbnail as usize as u64))
        } else {
            Err(failed("register", hr))
        }
    }

    fn unregister(&mut self, thumbnail: ThumbnailId) -> Result<(), CompositorError> {
        let hr = unsafe { DwmUnregisterThumbnail(thumbnail_of(thumbnail)) };
        if SUCCEEDED(hr) {
            Ok(())
        } else {
            Err(failed("unregister", hr))
        }
    }

    fn query_source_size(&self, thumbnail: ThumbnailId) -> Result<Size, CompositorError> {
        let mut size = SIZE { cx: 0, cy: 0 };
        let hr = unsafe { DwmQueryThumbnailSourceSize(thumbnail_of(thumbnail), &mut size) };
        if SUCCEEDED(hr) {
            Ok(Size::new(size.cx, size.cy))
        } else {
            Err(failed("query source size", hr))
        }
    }

    fn update(
        &mut self,
        thumbnail: ThumbnailId,
        props: &ThumbnailProps,
    ) -> Result<(), CompositorError> {
        let mut native: DWM_THUMBNAIL_PROPERTIES = unsafe { std::mem::zeroed() };
        if let Some(rect) = props.destination {
            native.dwFlags |= DWM_TNP_RECTDESTINATION;
            native.rcDestination = RECT {
                left: rect.left,
                top: rect.top,
                right: rect.right,
                bottom: rect.bottom,
            };
        }
        if let Some(visible) = props.visible {
            native.dwFlags |= DWM_TNP_VISIBLE;
            native.fVisible = if visible { TRUE } else { FALSE };
        }
        if let Some(client_only) = props.source_client_area_only {
            native.dwFlags |= DWM_TNP_SOURCECLIENTAREAONLY;
            native.fSourceClientAreaOnly = if client_only { TRUE } else { FALSE };
        }
        if let Some(opacity) = props.opacity {
            native.dwFlags |= DWM_TNP_OPACITY;
            native.opacity = opacity;
        }
        let hr = unsafe { DwmUpdateThumbnailProperties(thumbnail_of(thumbnail), &native) };
        if SUCCEEDED(hr) {
            Ok(())
        } else {
            Err(failed("update", hr))
        }
    }
}
