//! Padding and per-element style

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::RgbColor;
use embedded_graphics::primitives::{PrimitiveStyle, PrimitiveStyleBuilder};

/// Padding around an element (top, right, bottom, left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Padding {
    pub const fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    pub const fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

/// Colors and padding of a single element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Fill painted behind the content. Leaves on the face always set this
    /// so that repainting a shorter label erases the old one.
    pub background_color: Option<Rgb565>,
    pub foreground_color: Option<Rgb565>,
    pub padding: Padding,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background_color: None,
            foreground_color: Some(Rgb565::WHITE),
            padding: Padding::default(),
        }
    }
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, color: Rgb565) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn with_foreground(mut self, color: Rgb565) -> Self {
        self.foreground_color = Some(color);
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn foreground(&self) -> Rgb565 {
        self.foreground_color.unwrap_or(Rgb565::WHITE)
    }

    /// Fill style for the background rectangle.
    pub fn to_primitive_style(&self) -> PrimitiveStyle<Rgb565> {
        let mut builder = PrimitiveStyleBuilder::new();
        if let Some(bg) = self.background_color {
            builder = builder.fill_color(bg);
        }
        builder.build()
    }
}
