//! Concrete element enum.
//!
//! `DrawTarget` is generic, which makes our [`Drawable`] trait not object
//! safe. Pages own their leaves through this enum instead of trait objects.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::ui::components::{IconView, TextComponent, VectorText};
use crate::ui::core::Drawable;

/// A leaf placed in a layout cell.
pub enum Element {
    Text(TextComponent),
    Vector(VectorText),
    Icon(IconView),
}

impl Element {
    /// Update a text-bearing leaf. Icons ignore text.
    pub fn set_text(&mut self, text: &str) {
        match self {
            Element::Text(t) => t.set_text(text),
            Element::Vector(t) => t.set_text(text),
            Element::Icon(_) => {}
        }
    }

    /// Current label, if the leaf shows text.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Element::Text(t) => Some(t.text()),
            Element::Vector(t) => Some(t.text()),
            Element::Icon(_) => None,
        }
    }
}

impl Drawable for Element {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        match self {
            Element::Text(t) => t.draw(display),
            Element::Vector(t) => t.draw(display),
            Element::Icon(i) => i.draw(display),
        }
    }

    fn bounds(&self) -> Rectangle {
        match self {
            Element::Text(t) => t.bounds(),
            Element::Vector(t) => t.bounds(),
            Element::Icon(i) => i.bounds(),
        }
    }

    fn is_dirty(&self) -> bool {
        match self {
            Element::Text(t) => t.is_dirty(),
            Element::Vector(t) => t.is_dirty(),
            Element::Icon(i) => i.is_dirty(),
        }
    }

    fn mark_clean(&mut self) {
        match self {
            Element::Text(t) => t.mark_clean(),
            Element::Vector(t) => t.mark_clean(),
            Element::Icon(i) => i.mark_clean(),
        }
    }

    fn mark_dirty(&mut self) {
        match self {
            Element::Text(t) => t.mark_dirty(),
            Element::Vector(t) => t.mark_dirty(),
            Element::Icon(i) => i.mark_dirty(),
        }
    }
}
