//! Weather icon cell

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::icons::{IconKind, draw_icon};
use crate::ui::core::Drawable;
use crate::ui::styling::Style;

/// Draws one [`IconKind`] in the largest square at the top-left of its
/// bounds.
pub struct IconView {
    bounds: Rectangle,
    kind: IconKind,
    style: Style,
    dirty: bool,
}

impl IconView {
    pub fn new(bounds: Rectangle, kind: IconKind) -> Self {
        Self {
            bounds,
            kind,
            style: Style::default(),
            dirty: true,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn kind(&self) -> IconKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: IconKind) {
        if self.kind != kind {
            self.kind = kind;
            self.dirty = true;
        }
    }

    fn square(&self) -> Rectangle {
        let side = self.bounds.size.width.min(self.bounds.size.height);
        Rectangle::new(self.bounds.top_left, Size::new(side, side))
    }
}

impl Drawable for IconView {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let mut display = display.clipped(&self.bounds);
        if self.style.background_color.is_some() {
            self.bounds
                .into_styled(self.style.to_primitive_style())
                .draw(&mut display)?;
        }
        draw_icon(self.kind, self.square(), self.style.foreground(), &mut display)
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
