use crate::shared::pixel_buffer::PixelBuffer;

/// Domain interface for a per-pixel or neighbourhood image transform.
///
/// Implementations modify the buffer in place (`&mut PixelBuffer`) and clamp
/// every written sample, so applying a filter cannot fail. Geometric filters
/// may replace the buffer with one of different dimensions.
pub trait PixelFilter: Send {
    /// Stable kebab-case name, used for history labels and logging.
    fn name(&self) -> &str;

    fn apply(&self, buffer: &mut PixelBuffer);
}
