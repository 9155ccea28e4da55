//! Single-line text in a bitmap mono font

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, ascii};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::ui::core::Drawable;
use crate::ui::styling::Style;

/// Mono font presets.
///
/// - `Large`: 10x20
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Large,
}

impl TextSize {
    pub fn font(&self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Large => &ascii::FONT_10X20,
        }
    }
}

/// Text label, vertically centered in its bounds.
///
/// Setting identical text does not mark the label dirty, so the per-second
/// tick can push every label without repainting unchanged ones.
pub struct TextComponent {
    bounds: Rectangle,
    text: heapless::String<32>,
    size: TextSize,
    alignment: Alignment,
    style: Style,
    dirty: bool,
}

impl TextComponent {
    pub fn new(bounds: Rectangle, text: &str, size: TextSize) -> Self {
        let mut label = heapless::String::new();
        label.push_str(text).ok();

        Self {
            bounds,
            text: label,
            size,
            alignment: Alignment::Left,
            style: Style::default(),
            dirty: true,
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Replace the label. Over-long text is truncated.
    pub fn set_text(&mut self, text: &str) {
        if self.text.as_str() == text {
            return;
        }
        self.text.clear();
        for c in text.chars() {
            if self.text.push(c).is_err() {
                break;
            }
        }
        self.dirty = true;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn anchor(&self) -> Point {
        let padding = self.style.padding;
        let y = self.bounds.center().y;
        let x = match self.alignment {
            Alignment::Left => self.bounds.top_left.x + padding.left as i32,
            Alignment::Center => self.bounds.center().x,
            Alignment::Right => {
                self.bounds.top_left.x + self.bounds.size.width as i32 - padding.right as i32
            }
        };
        Point::new(x, y)
    }
}

impl Drawable for TextComponent {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        if self.style.background_color.is_some() {
            self.bounds
                .into_styled(self.style.to_primitive_style())
                .draw(display)?;
        }

        let character_style = MonoTextStyle::new(self.size.font(), self.style.foreground());
        let text_style = TextStyleBuilder::new()
            .alignment(self.alignment)
            .baseline(Baseline::Middle)
            .build();

        Text::with_text_style(&self.text, self.anchor(), character_style, text_style)
            .draw(display)?;
        Ok(())
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
