//! Scalable stroke font for numeric readouts.
//!
//! Digits are drawn as seven filled segments, so any pixel height works and
//! glyph metrics are exact integers derived from the size:
//!
//! - height = `size`
//! - digit and minus width = `size / 2`
//! - gap between glyphs = `size / 16`
//! - stroke = `max(1, size / 10)`
//!
//! Only what the face shows is supported: `0-9 - : °` and space. Anything
//! else advances like a space.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment};
use embedded_graphics::text::Alignment;

use crate::ui::core::Drawable;
use crate::ui::styling::Style;

const SEG_A: u8 = 1 << 0;
const SEG_B: u8 = 1 << 1;
const SEG_C: u8 = 1 << 2;
const SEG_D: u8 = 1 << 3;
const SEG_E: u8 = 1 << 4;
const SEG_F: u8 = 1 << 5;
const SEG_G: u8 = 1 << 6;

const DIGITS: [u8; 10] = [
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F,
    SEG_B | SEG_C,
    SEG_A | SEG_B | SEG_D | SEG_E | SEG_G,
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_G,
    SEG_B | SEG_C | SEG_F | SEG_G,
    SEG_A | SEG_C | SEG_D | SEG_F | SEG_G,
    SEG_A | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,
    SEG_A | SEG_B | SEG_C,
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_F | SEG_G,
];

/// A stroke font at one pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorFont {
    size: u32,
}

impl VectorFont {
    pub const fn new(size: u32) -> Self {
        Self { size }
    }

    pub const fn size(&self) -> u32 {
        self.size
    }

    fn stroke(&self) -> u32 {
        (self.size / 10).max(1)
    }

    fn gap(&self) -> u32 {
        self.size / 16
    }

    fn glyph_width(&self, c: char) -> u32 {
        match c {
            '0'..='9' | '-' => self.size / 2,
            ':' => (self.size / 5).max(self.stroke() * 2),
            '°' => (self.size / 3).max(3),
            _ => self.size / 4,
        }
    }

    /// Bounding size of `text` rendered at this size.
    pub fn measure(&self, text: &str) -> Size {
        let mut width = 0;
        let mut count = 0;
        for c in text.chars() {
            width += self.glyph_width(c);
            count += 1;
        }
        if count == 0 {
            return Size::new(0, self.size);
        }
        Size::new(width + self.gap() * (count - 1), self.size)
    }

    /// Draw `text` with its top-left corner at `top_left`.
    pub fn draw_str<D>(
        &self,
        text: &str,
        top_left: Point,
        color: Rgb565,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let mut x = top_left.x;
        for c in text.chars() {
            let origin = Point::new(x, top_left.y);
            match c {
                '0'..='9' => {
                    let mask = DIGITS[(c as u32 - '0' as u32) as usize];
                    self.draw_segments(mask, origin, color, display)?;
                }
                '-' => self.draw_segments(SEG_G, origin, color, display)?,
                ':' => self.draw_colon(origin, color, display)?,
                '°' => self.draw_degree(origin, color, display)?,
                _ => {}
            }
            x += (self.glyph_width(c) + self.gap()) as i32;
        }
        Ok(())
    }

    fn draw_segments<D>(
        &self,
        mask: u8,
        origin: Point,
        color: Rgb565,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let w = self.glyph_width('0');
        let h = self.size;
        let t = self.stroke();
        let half = h / 2;
        let mid = half.saturating_sub(t / 2);

        let segments: [(u8, u32, u32, u32, u32); 7] = [
            (SEG_A, 0, 0, w, t),
            (SEG_B, w.saturating_sub(t), 0, t, half),
            (SEG_C, w.saturating_sub(t), half, t, h - half),
            (SEG_D, 0, h.saturating_sub(t), w, t),
            (SEG_E, 0, half, t, h - half),
            (SEG_F, 0, 0, t, half),
            (SEG_G, 0, mid, w, t),
        ];

        for (bit, x, y, sw, sh) in segments {
            if mask & bit != 0 {
                let area = Rectangle::new(
                    origin + Point::new(x as i32, y as i32),
                    Size::new(sw, sh),
                );
                display.fill_solid(&area, color)?;
            }
        }
        Ok(())
    }

    fn draw_colon<D>(&self, origin: Point, color: Rgb565, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let dot = self.stroke().max(2);
        let x = (self.glyph_width(':').saturating_sub(dot) / 2) as i32;
        for y in [self.size / 3, self.size * 2 / 3] {
            let area = Rectangle::new(
                origin + Point::new(x, y.saturating_sub(dot / 2) as i32),
                Size::new(dot, dot),
            );
            display.fill_solid(&area, color)?;
        }
        Ok(())
    }

    fn draw_degree<D>(&self, origin: Point, color: Rgb565, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let diameter = self.glyph_width('°');
        let stroke = (self.stroke() / 2).max(1);
        let style = PrimitiveStyleBuilder::new()
            .stroke_color(color)
            .stroke_width(stroke)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        Circle::new(origin, diameter).into_styled(style).draw(display)
    }
}

/// Largest font size in `min..=max` whose text fits `cell` with a one pixel
/// margin on every side.
///
/// Binary search over inclusive bounds. A size is accepted when
/// `width <= cell.width - 2` and `height <= cell.height - 2`. When nothing
/// fits the result is `min`.
pub fn fit_font_size<F>(cell: Size, min: u32, max: u32, mut measure: F) -> u32
where
    F: FnMut(u32) -> Size,
{
    let max_width = cell.width.saturating_sub(2);
    let max_height = cell.height.saturating_sub(2);

    let (mut lo, mut hi) = (min, max);
    let mut best = min;
    while lo <= hi {
        let mid = (lo + hi) >> 1;
        let size = measure(mid);
        if size.width <= max_width && size.height <= max_height {
            best = mid;
            lo = mid + 1;
        } else if mid == 0 {
            break;
        } else {
            hi = mid - 1;
        }
    }
    best
}

/// How a [`VectorText`] picks its font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSizing {
    Fixed(u32),
    /// Largest size in the range that fits the cell, re-evaluated on draw.
    Fit { min: u32, max: u32 },
}

/// Label drawn with [`VectorFont`], vertically centered in its bounds.
pub struct VectorText {
    bounds: Rectangle,
    text: heapless::String<16>,
    sizing: FontSizing,
    alignment: Alignment,
    style: Style,
    dirty: bool,
}

impl VectorText {
    pub fn new(bounds: Rectangle, text: &str, sizing: FontSizing) -> Self {
        let mut label = heapless::String::new();
        label.push_str(text).ok();

        Self {
            bounds,
            text: label,
            sizing,
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

    fn content(&self) -> Rectangle {
        let padding = self.style.padding;
        Rectangle::new(
            self.bounds.top_left + Point::new(padding.left as i32, padding.top as i32),
            Size::new(
                self.bounds.size.width.saturating_sub(padding.horizontal()),
                self.bounds.size.height.saturating_sub(padding.vertical()),
            ),
        )
    }

    /// Font the label would be drawn with right now.
    pub fn font(&self) -> VectorFont {
        match self.sizing {
            FontSizing::Fixed(size) => VectorFont::new(size),
            FontSizing::Fit { min, max } => VectorFont::new(fit_font_size(
                self.content().size,
                min,
                max,
                |size| VectorFont::new(size).measure(&self.text),
            )),
        }
    }
}

impl Drawable for VectorText {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        if self.style.background_color.is_some() {
            self.bounds
                .into_styled(self.style.to_primitive_style())
                .draw(display)?;
        }

        let font = self.font();
        let text_size = font.measure(&self.text);
        let content = self.content();

        let spare_w = content.size.width as i32 - text_size.width as i32;
        let spare_h = content.size.height as i32 - text_size.height as i32;
        let x = match self.alignment {
            Alignment::Left => 0,
            Alignment::Center => spare_w / 2,
            Alignment::Right => spare_w,
        };
        let top_left = content.top_left + Point::new(x, spare_h / 2);

        font.draw_str(&self.text, top_left, self.style.foreground(), display)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;

    #[test]
    fn metrics_scale_with_size() {
        let font = VectorFont::new(40);
        assert_eq!(font.measure("8"), Size::new(20, 40));
        assert_eq!(font.measure("88"), Size::new(20 + 2 + 20, 40));
        assert_eq!(font.measure("12:34:56").width, 6 * 20 + 2 * 8 + 7 * 2);
        assert_eq!(VectorFont::new(20).measure("--°"), Size::new(10 + 10 + 6 + 2, 20));
    }

    #[test]
    fn fit_picks_largest_fitting_size() {
        // Fits at 28, overflows from 29 on.
        let size = fit_font_size(Size::new(100, 40), 20, 60, |s| Size::new(s * 3 + 14, s));
        assert_eq!(size, 28);
    }

    #[test]
    fn fit_never_exceeds_cell() {
        let cell = Size::new(100, 40);
        let text = "72°";
        let size = fit_font_size(cell, 20, 60, |s| VectorFont::new(s).measure(text));
        let measured = VectorFont::new(size).measure(text);
        assert!(measured.width <= cell.width - 2);
        assert!(measured.height <= cell.height - 2);

        let bigger = VectorFont::new(size + 1).measure(text);
        assert!(bigger.width > cell.width - 2 || bigger.height > cell.height - 2);
    }

    #[test]
    fn fit_falls_back_to_minimum() {
        let size = fit_font_size(Size::new(10, 10), 20, 60, |s| Size::new(s, s));
        assert_eq!(size, 20);
    }

    #[test]
    fn draws_inside_bounds() {
        let bounds = Rectangle::new(Point::new(20, 30), Size::new(80, 50));
        let label = VectorText::new(bounds, "-8°", FontSizing::Fit { min: 20, max: 60 })
            .with_alignment(Alignment::Center)
            .with_style(Style::new().with_background(Rgb565::BLACK));

        let mut fb = FrameBuffer::new();
        label.draw(&mut fb).unwrap();

        let lit = fb.count_color(&bounds, Rgb565::WHITE);
        let everywhere = fb.count_color(&fb.bounding_box(), Rgb565::WHITE);
        assert!(lit > 0);
        assert_eq!(lit, everywhere);
    }

    #[test]
    fn one_lights_only_right_segments() {
        let mut fb = FrameBuffer::new();
        VectorFont::new(20)
            .draw_str("1", Point::zero(), Rgb565::WHITE, &mut fb)
            .unwrap();
        // Left column stays dark, right column (segments B and C) is lit.
        assert_eq!(fb.pixel(0, 5), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(9, 5), Some(Rgb565::WHITE));
        assert_eq!(fb.pixel(9, 15), Some(Rgb565::WHITE));
    }
}
