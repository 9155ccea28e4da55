//! The clock face screen
//!
//! ```text
//! +----------------------------+
//! |          12:34:56          |  time (vector 40)
//! |        Sat, Oct 17         |  date (10x20)
//! | 81°                  05:21 |  hi / sunrise
//! |            72°             |  current (fitted)
//! | 60°                  21:03 |  lo / sunset
//! | [icon]                8412 |  footer
//! +----------------------------+
//! ```
//!
//! The tree is built once from [`Settings`]. Afterwards only leaf content
//! changes, and only leaves whose content changed are repainted.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Alignment as TextAlignment;
use heapless::Vec;
use log::debug;
use time::OffsetDateTime;

use crate::app_state::FaceState;
use crate::config::Settings;
use crate::format::{date_short, time_hms};
use crate::icons::{IconKind, classify};
use crate::ui::{
    Container, DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, Direction, Drawable, Element, FontSizing,
    IconView, Padding, SizeConstraint, Style, TextComponent, TextSize, VectorText,
};
use crate::units::temperature_label;

const TIME_FONT: u32 = 40;
const HI_LO_FONT: u32 = 20;
const SUN_FONT: u32 = 18;
const CURRENT_MIN_FONT: u32 = 20;
const CURRENT_MAX_FONT: u32 = 60;

const TIME_ROW: u32 = 48;
const DATE_ROW: u32 = 22;
const FOOTER_ROW: u32 = 32;
const HI_LO_COLUMN: u32 = 44;
const SUN_COLUMN: u32 = 48;
const ROW_GAP: u32 = 2;
const COLUMN_GAP: u32 = 4;

/// Addressable leaves of the face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellId {
    Time,
    Date,
    High,
    Low,
    Current,
    Sunrise,
    Sunset,
    Icon,
    Steps,
}

impl CellId {
    pub const ALL: [CellId; 9] = [
        CellId::Time,
        CellId::Date,
        CellId::High,
        CellId::Low,
        CellId::Current,
        CellId::Sunrise,
        CellId::Sunset,
        CellId::Icon,
        CellId::Steps,
    ];
}

/// Cell rectangles computed from the container tree.
struct Geometry {
    time: Rectangle,
    date: Rectangle,
    high: Rectangle,
    low: Rectangle,
    current: Rectangle,
    sunrise: Rectangle,
    sunset: Rectangle,
    icon: Rectangle,
    steps: Rectangle,
}

fn child(container: &Container<4>, index: usize) -> Rectangle {
    container.child_bounds(index).unwrap_or_default()
}

fn split<const N: usize>(
    bounds: Rectangle,
    direction: Direction,
    gap: u32,
    constraints: [SizeConstraint; N],
) -> [Rectangle; N] {
    let mut container = Container::<N>::new(bounds, direction).with_spacing(gap);
    for constraint in constraints {
        container.add_child(constraint).ok();
    }
    core::array::from_fn(|i| container.child_bounds(i).unwrap_or_default())
}

impl Geometry {
    fn compute(screen: Rectangle, side_padding: u32) -> Self {
        let mut rows = Container::<4>::new(screen, Direction::Vertical)
            .with_padding(Padding::new(4, side_padding, 2, side_padding))
            .with_spacing(ROW_GAP);
        for constraint in [
            SizeConstraint::Fixed(TIME_ROW),
            SizeConstraint::Fixed(DATE_ROW),
            SizeConstraint::Expand,
            SizeConstraint::Fixed(FOOTER_ROW),
        ] {
            rows.add_child(constraint).ok();
        }

        let [left, current, right] = split(
            child(&rows, 2),
            Direction::Horizontal,
            COLUMN_GAP,
            [
                SizeConstraint::Fixed(HI_LO_COLUMN),
                SizeConstraint::Expand,
                SizeConstraint::Fixed(SUN_COLUMN),
            ],
        );
        let [high, low] = split(
            left,
            Direction::Vertical,
            0,
            [SizeConstraint::Expand, SizeConstraint::Expand],
        );
        let [sunrise, sunset] = split(
            right,
            Direction::Vertical,
            0,
            [SizeConstraint::Expand, SizeConstraint::Expand],
        );
        let [icon, steps] = split(
            child(&rows, 3),
            Direction::Horizontal,
            COLUMN_GAP,
            [SizeConstraint::Fixed(FOOTER_ROW), SizeConstraint::Expand],
        );

        Self {
            time: child(&rows, 0),
            date: child(&rows, 1),
            high,
            low,
            current,
            sunrise,
            sunset,
            icon,
            steps,
        }
    }
}

/// The face's layout tree and its leaves.
pub struct FacePage {
    bounds: Rectangle,
    background: Rgb565,
    cells: Vec<(CellId, Element), 9>,
    /// Paint the background under everything on the next render
    needs_clear: bool,
}

impl FacePage {
    pub fn new(settings: &Settings) -> Self {
        let bounds = Rectangle::new(
            Point::zero(),
            Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX),
        );
        let colors = settings.colors;
        let background: Rgb565 = colors.background.into();
        let style = |fg: Rgb565| Style::new().with_background(background).with_foreground(fg);
        let text = style(colors.text.into());

        let g = Geometry::compute(bounds, settings.side_padding_px);
        let placeholder = temperature_label(None);

        let cells = [
            (
                CellId::Time,
                Element::Vector(
                    VectorText::new(g.time, "--:--:--", FontSizing::Fixed(TIME_FONT))
                        .with_alignment(TextAlignment::Center)
                        .with_style(text),
                ),
            ),
            (
                CellId::Date,
                Element::Text(
                    TextComponent::new(g.date, "", TextSize::Large)
                        .with_alignment(TextAlignment::Center)
                        .with_style(text),
                ),
            ),
            (
                CellId::High,
                Element::Vector(
                    VectorText::new(g.high, &placeholder, FontSizing::Fixed(HI_LO_FONT))
                        .with_style(style(colors.high.into())),
                ),
            ),
            (
                CellId::Low,
                Element::Vector(
                    VectorText::new(g.low, &placeholder, FontSizing::Fixed(HI_LO_FONT))
                        .with_style(style(colors.low.into())),
                ),
            ),
            (
                CellId::Current,
                Element::Vector(
                    VectorText::new(
                        g.current,
                        &placeholder,
                        FontSizing::Fit {
                            min: CURRENT_MIN_FONT,
                            max: CURRENT_MAX_FONT,
                        },
                    )
                    .with_alignment(TextAlignment::Center)
                    .with_style(text),
                ),
            ),
            (
                CellId::Sunrise,
                Element::Vector(
                    VectorText::new(g.sunrise, "--:--", FontSizing::Fixed(SUN_FONT))
                        .with_alignment(TextAlignment::Right)
                        .with_style(text),
                ),
            ),
            (
                CellId::Sunset,
                Element::Vector(
                    VectorText::new(g.sunset, "--:--", FontSizing::Fixed(SUN_FONT))
                        .with_alignment(TextAlignment::Right)
                        .with_style(text),
                ),
            ),
            (
                CellId::Icon,
                Element::Icon(
                    IconView::new(g.icon, IconKind::Clear).with_style(text),
                ),
            ),
            (
                CellId::Steps,
                Element::Text(
                    TextComponent::new(g.steps, "0", TextSize::Large)
                        .with_alignment(TextAlignment::Right)
                        .with_style(text),
                ),
            ),
        ];

        let mut leaves = Vec::new();
        for cell in cells {
            leaves.push(cell).ok();
        }

        Self {
            bounds,
            background,
            cells: leaves,
            needs_clear: true,
        }
    }

    pub fn cell(&self, id: CellId) -> Option<&Element> {
        self.cells.iter().find(|(cell, _)| *cell == id).map(|(_, e)| e)
    }

    fn cell_mut(&mut self, id: CellId) -> Option<&mut Element> {
        self.cells
            .iter_mut()
            .find(|(cell, _)| *cell == id)
            .map(|(_, e)| e)
    }

    /// Label currently held by a text leaf.
    pub fn label(&self, id: CellId) -> Option<&str> {
        self.cell(id).and_then(Element::text_content)
    }

    /// Icon currently shown in the footer.
    pub fn icon(&self) -> Option<IconKind> {
        match self.cell(CellId::Icon) {
            Some(Element::Icon(view)) => Some(view.kind()),
            _ => None,
        }
    }

    fn set_label(&mut self, id: CellId, text: &str) {
        if let Some(cell) = self.cell_mut(id) {
            cell.set_text(text);
        }
    }

    /// Clock and date.
    pub fn set_time(&mut self, now: OffsetDateTime) {
        self.set_label(CellId::Time, &time_hms(now.time()));
        self.set_label(CellId::Date, &date_short(now.date()));
    }

    pub fn set_steps(&mut self, steps: u32) {
        let mut label: heapless::String<10> = heapless::String::new();
        let _ = write!(label, "{}", steps);
        self.set_label(CellId::Steps, &label);
    }

    /// Temperatures, condition icon, sun times and steps.
    pub fn update_labels(&mut self, state: &FaceState) {
        let weather = &state.weather;
        self.set_label(CellId::High, &temperature_label(weather.t_hi));
        self.set_label(CellId::Low, &temperature_label(weather.t_lo));
        self.set_label(CellId::Current, &temperature_label(weather.t));
        self.set_label(CellId::Sunrise, &state.sun.sunrise);
        self.set_label(CellId::Sunset, &state.sun.sunset);

        let kind = classify(&weather.cond);
        if let Some(Element::Icon(view)) = self.cell_mut(CellId::Icon) {
            view.set_kind(kind);
        }
        self.set_steps(state.steps);
    }

    /// Leaves that will be painted by the next [`render`](Self::render).
    pub fn dirty_cells(&self) -> impl Iterator<Item = CellId> + '_ {
        let all = self.needs_clear;
        self.cells
            .iter()
            .filter(move |(_, e)| all || e.is_dirty())
            .map(|(id, _)| *id)
    }

    /// Paint dirty leaves and mark them clean. Returns how many were painted.
    pub fn render<D>(&mut self, display: &mut D) -> Result<usize, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if self.needs_clear {
            display.fill_solid(&self.bounds, self.background)?;
        }

        let mut painted = 0;
        for (_, element) in self.cells.iter_mut() {
            if self.needs_clear || element.is_dirty() {
                element.draw(display)?;
                element.mark_clean();
                painted += 1;
            }
        }
        self.needs_clear = false;

        if painted > 0 {
            debug!("Painted {} cells", painted);
        }
        Ok(painted)
    }
}

impl Drawable for FacePage {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        display.fill_solid(&self.bounds, self.background)?;
        for (_, element) in &self.cells {
            element.draw(display)?;
        }
        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.needs_clear || self.cells.iter().any(|(_, e)| e.is_dirty())
    }

    fn mark_clean(&mut self) {
        self.needs_clear = false;
        for (_, element) in self.cells.iter_mut() {
            element.mark_clean();
        }
    }

    /// Schedule a full repaint, background included.
    fn mark_dirty(&mut self) {
        self.needs_clear = true;
    }
}
