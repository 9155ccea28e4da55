//! Weather icons
//!
//! Condition text is mapped onto a closed set of icon kinds, and each kind is
//! drawn from circles and lines so it scales to any cell without bitmaps.

use alloc::string::String;
use core::f32::consts::PI;

use embedded_graphics::Drawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use libm::{cosf, roundf, sinf};

/// Length of the sun's rays past the disc on a 32 px icon.
const RAY_LENGTH: f32 = 6.0;
/// Rain, snow and storm draw their cloud this much shorter (on a 32 px
/// icon) to leave room for precipitation strokes underneath.
const PRECIPITATION_ROOM: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconKind {
    Storm,
    Rain,
    Snow,
    Fog,
    Cloud,
    #[default]
    Clear,
}

/// Keyword table in priority order. The first kind with a matching keyword
/// wins, so "thunderstorm with rain" is a storm.
const KEYWORDS: [(IconKind, &[&str]); 6] = [
    (IconKind::Storm, &["thunder", "storm"]),
    (IconKind::Rain, &["rain", "drizzle", "shower"]),
    (IconKind::Snow, &["snow", "sleet"]),
    (IconKind::Fog, &["fog", "mist", "haze"]),
    (IconKind::Cloud, &["cloud", "overcast"]),
    (IconKind::Clear, &["clear", "sun"]),
];

/// Pick an icon for a free-text condition, case-insensitively.
///
/// Empty or unrecognised text gives [`IconKind::Clear`].
pub fn classify(condition: &str) -> IconKind {
    if condition.is_empty() {
        return IconKind::Clear;
    }
    let lower: String = condition.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(kind, _)| *kind)
        .unwrap_or_default()
}

/// Draw `kind` inside `bounds`.
///
/// Geometry is laid out on a 32 px grid scaled to the shorter side of
/// `bounds`, and every primitive is clipped to `bounds`.
pub fn draw_icon<D>(
    kind: IconKind,
    bounds: Rectangle,
    color: Rgb565,
    display: &mut D,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let mut display = display.clipped(&bounds);
    let center = center_of(bounds);
    let grid = Grid::of(bounds);
    let stroke = PrimitiveStyle::with_stroke(color, 1);
    let at = |dx: f32, dy: f32| center + Point::new(grid.px(dx), grid.px(dy));

    match kind {
        IconKind::Clear => draw_sun(bounds, color, &mut display),
        IconKind::Cloud => draw_cloud(bounds, color, &mut display),
        IconKind::Rain => {
            draw_cloud(shortened(bounds), color, &mut display)?;
            for j in [-8.0, 0.0, 8.0] {
                line(at(j, 8.0), at(j - 2.0, 14.0), stroke, &mut display)?;
            }
            Ok(())
        }
        IconKind::Snow => {
            draw_cloud(shortened(bounds), color, &mut display)?;
            for k in [-8.0, 0.0, 8.0] {
                line(at(k, 8.0), at(k, 14.0), stroke, &mut display)?;
                line(at(k - 3.0, 11.0), at(k + 3.0, 11.0), stroke, &mut display)?;
            }
            Ok(())
        }
        IconKind::Fog => {
            let left = bounds.top_left.x;
            let right = left + bounds.size.width as i32;
            for (inset, dy) in [(2.0, -6.0), (4.0, -1.0), (6.0, 4.0)] {
                let y = center.y + grid.px(dy);
                line(
                    Point::new(left + grid.px(inset), y),
                    Point::new(right - grid.px(inset), y),
                    stroke,
                    &mut display,
                )?;
            }
            Ok(())
        }
        IconKind::Storm => {
            draw_cloud(shortened(bounds), color, &mut display)?;
            line(at(0.0, 6.0), at(-6.0, 15.0), stroke, &mut display)?;
            line(at(-2.0, 12.0), at(6.0, 2.0), stroke, &mut display)
        }
    }
}

/// Maps coordinates on a 32 px design grid onto a box.
#[derive(Clone, Copy)]
struct Grid {
    unit: f32,
}

impl Grid {
    const SIDE: f32 = 32.0;

    fn of(bounds: Rectangle) -> Self {
        Self {
            unit: side_of(bounds) as f32 / Self::SIDE,
        }
    }

    fn scale(self, v: f32) -> f32 {
        v * self.unit
    }

    fn px(self, v: f32) -> i32 {
        roundf(self.scale(v)) as i32
    }
}

fn side_of(bounds: Rectangle) -> u32 {
    bounds.size.width.min(bounds.size.height)
}

fn center_of(bounds: Rectangle) -> Point {
    bounds.top_left
        + Point::new(
            (bounds.size.width >> 1) as i32,
            (bounds.size.height >> 1) as i32,
        )
}

fn radius_of(bounds: Rectangle) -> f32 {
    side_of(bounds) as f32 / 3.0
}

fn shortened(bounds: Rectangle) -> Rectangle {
    let room = Grid::of(bounds).px(PRECIPITATION_ROOM) as u32;
    Rectangle::new(
        bounds.top_left,
        Size::new(bounds.size.width, bounds.size.height.saturating_sub(room)),
    )
}

fn draw_sun<D>(bounds: Rectangle, color: Rgb565, display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let center = center_of(bounds);
    let r = radius_of(bounds);
    let stroke = PrimitiveStyle::with_stroke(color, 1);

    // Rays stop one pixel short of the box edge.
    let half = side_of(bounds) as f32 / 2.0;
    let ray = Grid::of(bounds).scale(RAY_LENGTH).min(half - r - 1.0).max(1.0);

    Circle::with_center(center, diameter(r))
        .into_styled(stroke)
        .draw(display)?;

    for i in 0..8 {
        let angle = i as f32 * PI * 2.0 / 8.0;
        let (dx, dy) = (cosf(angle), sinf(angle));
        let outer = r + ray;
        line(
            center + Point::new(roundf(dx * r) as i32, roundf(dy * r) as i32),
            center + Point::new(roundf(dx * outer) as i32, roundf(dy * outer) as i32),
            stroke,
            display,
        )?;
    }
    Ok(())
}

fn draw_cloud<D>(bounds: Rectangle, color: Rgb565, display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let center = center_of(bounds);
    let grid = Grid::of(bounds);
    let fill = PrimitiveStyle::with_fill(color);

    // Two side puffs and a taller middle one, 29 x 21 on the design grid.
    for (dx, dy, radius) in [(-7.0, 2.0, 7.0), (1.0, -3.0, 9.0), (8.0, 2.0, 7.0)] {
        Circle::with_center(
            center + Point::new(grid.px(dx), grid.px(dy)),
            diameter(grid.scale(radius)),
        )
        .into_styled(fill)
        .draw(display)?;
    }
    Ok(())
}

fn diameter(radius: f32) -> u32 {
    (roundf(radius * 2.0) as u32).max(1)
}

fn line<D>(
    from: Point,
    to: Point,
    style: PrimitiveStyle<Rgb565>,
    display: &mut D,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    Line::new(from, to).into_styled(style).draw(display)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;

    #[test]
    fn classify_priority_and_case() {
        assert_eq!(classify("Thunderstorms"), IconKind::Storm);
        assert_eq!(classify("light rain showers"), IconKind::Rain);
        assert_eq!(classify("Partly Cloudy"), IconKind::Cloud);
        assert_eq!(classify("SLEET"), IconKind::Snow);
        assert_eq!(classify("Haze"), IconKind::Fog);
        assert_eq!(classify("Sunny"), IconKind::Clear);
        assert_eq!(classify("Thunder and snow"), IconKind::Storm);
    }

    #[test]
    fn classify_defaults_to_clear() {
        assert_eq!(classify(""), IconKind::Clear);
        assert_eq!(classify("Tornado warning"), IconKind::Clear);
    }

    fn lit(kind: IconKind, bounds: Rectangle) -> (usize, FrameBuffer) {
        let mut fb = FrameBuffer::new();
        draw_icon(kind, bounds, Rgb565::WHITE, &mut fb).unwrap();
        let count = fb.count_color(&fb.bounding_box(), Rgb565::WHITE);
        (count, fb)
    }

    const ALL_KINDS: [IconKind; 6] = [
        IconKind::Storm,
        IconKind::Rain,
        IconKind::Snow,
        IconKind::Fog,
        IconKind::Cloud,
        IconKind::Clear,
    ];

    #[test]
    fn every_kind_draws_something() {
        let bounds = Rectangle::new(Point::new(40, 40), Size::new(32, 32));
        for kind in ALL_KINDS {
            assert!(lit(kind, bounds).0 > 0, "{kind:?} drew nothing");
        }
    }

    #[test]
    fn every_kind_stays_inside_its_box() {
        for bounds in [
            Rectangle::new(Point::new(40, 40), Size::new(32, 32)),
            Rectangle::new(Point::new(10, 100), Size::new(20, 20)),
            Rectangle::new(Point::new(60, 20), Size::new(48, 40)),
            Rectangle::new(Point::new(0, 0), Size::new(64, 64)),
        ] {
            for kind in ALL_KINDS {
                let (total, fb) = lit(kind, bounds);
                let inside = fb.count_color(&bounds, Rgb565::WHITE);
                assert_eq!(total, inside, "{kind:?} spilled out of {bounds:?}");
            }
        }
    }

    #[test]
    fn sun_and_cloud_geometry_fit_unclipped() {
        for bounds in [
            Rectangle::new(Point::new(40, 40), Size::new(32, 32)),
            Rectangle::new(Point::new(40, 40), Size::new(24, 24)),
        ] {
            let mut sun = FrameBuffer::new();
            draw_sun(bounds, Rgb565::WHITE, &mut sun).unwrap();
            let mut cloud = FrameBuffer::new();
            draw_cloud(bounds, Rgb565::WHITE, &mut cloud).unwrap();
            for fb in [sun, cloud] {
                let total = fb.count_color(&fb.bounding_box(), Rgb565::WHITE);
                assert_eq!(fb.count_color(&bounds, Rgb565::WHITE), total);
            }
        }
    }

    #[test]
    fn sun_center_is_hollow_and_cloud_is_filled() {
        let bounds = Rectangle::new(Point::new(40, 40), Size::new(30, 30));
        let (_, sun) = lit(IconKind::Clear, bounds);
        assert_eq!(sun.pixel(55, 55), Some(Rgb565::BLACK));

        let (_, cloud) = lit(IconKind::Cloud, bounds);
        assert_eq!(cloud.pixel(55, 55), Some(Rgb565::WHITE));
    }

    #[test]
    fn rain_adds_strokes_below_cloud() {
        let bounds = Rectangle::new(Point::new(40, 40), Size::new(30, 30));
        let (cloud, _) = lit(IconKind::Cloud, shortened(bounds));
        let (rain, fb) = lit(IconKind::Rain, bounds);
        assert!(rain > cloud);
        // Drop under the center column: (55, 63) lies on the middle streak.
        assert_eq!(fb.pixel(55, 63), Some(Rgb565::WHITE));
    }
}
