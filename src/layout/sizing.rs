use crate::window::info::Size;

/// Size a thumbnail source into a row of `preview_height` pixels.
///
/// Sources no taller than the row are shown at native size; taller ones are
/// scaled down proportionally with the width rounded to the nearest pixel.
pub fn fit_source(source: Size, preview_height: i32) -> Size {
    if source.height <= preview_height {
        return source;
    }
    let scale = preview_height as f64 / source.height as f64;
    Size::new(
        (source.width as f64 * scale).round() as i32,
        preview_height,
    )
}
