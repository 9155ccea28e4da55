//! Core UI trait

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Anything the face can paint.
///
/// `DrawTarget` is generic, so this trait is not object safe. Heterogeneous
/// children go through [`Element`](super::Element) instead.
pub trait Drawable {
    /// Paint the element inside its bounds.
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error>;

    fn bounds(&self) -> Rectangle;

    /// True when the content changed since the last paint.
    fn is_dirty(&self) -> bool;

    fn mark_clean(&mut self);

    fn mark_dirty(&mut self);
}
