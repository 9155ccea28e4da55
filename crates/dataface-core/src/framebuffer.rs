//! Off-screen framebuffer for the face.
//!
//! The face always draws into this RAM buffer. Once a frame is finished only
//! the bounding box of pixels that actually changed is pushed to the panel,
//! so a one-second tick that only touches the seconds digits costs a few
//! hundred pixels instead of the whole screen.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::trace;

use crate::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

const WIDTH: usize = DISPLAY_WIDTH_PX as usize;
const HEIGHT: usize = DISPLAY_HEIGHT_PX as usize;

/// Inclusive bounding box of pixels changed since the last flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChangedArea {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl ChangedArea {
    fn at(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn include(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn rectangle(&self) -> Rectangle {
        Rectangle::new(
            Point::new(self.min_x as i32, self.min_y as i32),
            Size::new(
                (self.max_x - self.min_x + 1) as u32,
                (self.max_y - self.min_y + 1) as u32,
            ),
        )
    }
}

/// 176x176 RGB565 draw target with change tracking.
pub struct FrameBuffer {
    pixels: Vec<Rgb565>,
    changed: Option<ChangedArea>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// A black frame with nothing pending.
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgb565::BLACK; WIDTH * HEIGHT],
            changed: None,
        }
    }

    /// Color at `(x, y)`, or `None` outside the panel.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        if x < 0 || y < 0 || x as usize >= WIDTH || y as usize >= HEIGHT {
            return None;
        }
        Some(self.pixels[y as usize * WIDTH + x as usize])
    }

    /// Region that the next [`flush`](Self::flush) would push.
    pub fn pending(&self) -> Option<Rectangle> {
        self.changed.map(|c| c.rectangle())
    }

    /// Treat the whole frame as changed, e.g. after the panel lost power.
    pub fn invalidate(&mut self) {
        self.changed = Some(ChangedArea {
            min_x: 0,
            min_y: 0,
            max_x: WIDTH - 1,
            max_y: HEIGHT - 1,
        });
    }

    /// Count pixels of `color` inside `area`.
    pub fn count_color(&self, area: &Rectangle, color: Rgb565) -> usize {
        area.points()
            .filter(|p| self.pixel(p.x, p.y) == Some(color))
            .count()
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * WIDTH + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.changed {
                Some(area) => area.include(x, y),
                None => self.changed = Some(ChangedArea::at(x, y)),
            }
        }
    }

    /// Push the changed region to `display` and forget it.
    ///
    /// Does nothing when no pixel changed since the previous flush.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(area) = self.changed.take() else {
            return Ok(());
        };

        let rect = area.rectangle();
        trace!(
            "Flushing {}x{} at ({}, {})",
            rect.size.width, rect.size.height, area.min_x, area.min_y
        );

        let pixels = &self.pixels;
        let width = rect.size.width as usize;
        let rows = (area.min_y..=area.max_y).flat_map(move |y| {
            let start = y * WIDTH + area.min_x;
            pixels[start..start + width].iter().copied()
        });

        display.fill_contiguous(&rect, rows)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0
                && coord.y >= 0
                && (coord.x as usize) < WIDTH
                && (coord.y as usize) < HEIGHT
            {
                self.set_pixel(coord.x as usize, coord.y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let visible = area.intersection(&self.bounding_box());
        let Some(bottom_right) = visible.bottom_right() else {
            return Ok(());
        };

        for y in visible.top_left.y as usize..=bottom_right.y as usize {
            for x in visible.top_left.x as usize..=bottom_right.x as usize {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn fresh_buffer_has_nothing_to_flush() {
        let fb = FrameBuffer::new();
        assert_eq!(fb.pending(), None);
        assert_eq!(fb.pixel(0, 0), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(176, 0), None);
    }

    #[test]
    fn tracks_changed_bounding_box() {
        let mut fb = FrameBuffer::new();
        Pixel(Point::new(10, 20), Rgb565::RED).draw(&mut fb).unwrap();
        Pixel(Point::new(30, 5), Rgb565::RED).draw(&mut fb).unwrap();
        assert_eq!(
            fb.pending(),
            Some(Rectangle::new(Point::new(10, 5), Size::new(21, 16)))
        );
    }

    #[test]
    fn redrawing_same_color_is_not_a_change() {
        let mut fb = FrameBuffer::new();
        fb.clear(Rgb565::BLACK).unwrap();
        assert_eq!(fb.pending(), None);
    }

    #[test]
    fn invalidate_flushes_everything() {
        let mut fb = FrameBuffer::new();
        fb.invalidate();
        assert_eq!(fb.pending(), Some(fb.bounding_box()));
    }

    #[test]
    fn flush_copies_only_changed_region() {
        let mut fb = FrameBuffer::new();
        Rectangle::new(Point::new(170, 170), Size::new(20, 20))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::GREEN))
            .draw(&mut fb)
            .unwrap();

        let mut panel = FrameBuffer::new();
        fb.flush(&mut panel).unwrap();
        assert_eq!(fb.pending(), None);
        assert_eq!(panel.pixel(175, 175), Some(Rgb565::GREEN));
        assert_eq!(panel.pixel(169, 169), Some(Rgb565::BLACK));
        assert_eq!(
            panel.pending(),
            Some(Rectangle::new(Point::new(170, 170), Size::new(6, 6)))
        );
    }
}
