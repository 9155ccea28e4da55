//! Row/column container with fixed and expanding children

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;

use crate::ui::styling::Padding;

/// Main axis of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Left to right
    Horizontal,
    /// Top to bottom
    Vertical,
}

/// How a child is sized along the main axis.
///
/// - `Expand`: shares the leftover space equally with other `Expand` children
/// - `Fixed(n)`: exactly `n` pixels
///
/// Children always fill the whole cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeConstraint {
    Expand,
    Fixed(u32),
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    constraint: SizeConstraint,
    bounds: Rectangle,
}

/// Arranges up to `N` child rectangles along one axis.
///
/// Containers only compute geometry. The page that owns them places its
/// leaves into the resulting rectangles, and nested containers are created
/// from a parent's child rectangle.
///
/// ```ignore
/// let mut column = Container::<2>::new(screen, Direction::Vertical)
///     .with_padding(Padding::new(4, 6, 2, 6))
///     .with_spacing(2);
/// let header = column.add_child(SizeConstraint::Fixed(56))?;
/// let body = column.add_child(SizeConstraint::Expand)?;
/// ```
#[derive(Debug, Clone)]
pub struct Container<const N: usize> {
    bounds: Rectangle,
    direction: Direction,
    spacing: u32,
    padding: Padding,
    children: Vec<Slot, N>,
}

impl<const N: usize> Container<N> {
    /// Empty container with no padding and no spacing.
    pub fn new(bounds: Rectangle, direction: Direction) -> Self {
        Self {
            bounds,
            direction,
            spacing: 0,
            padding: Padding::default(),
            children: Vec::new(),
        }
    }

    /// Gap between neighbouring children.
    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self.layout();
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self.layout();
        self
    }

    /// Append a child and re-run layout.
    ///
    /// Returns the child's index, or an error once `N` children exist.
    pub fn add_child(&mut self, constraint: SizeConstraint) -> Result<usize, &'static str> {
        self.children
            .push(Slot {
                constraint,
                bounds: Rectangle::zero(),
            })
            .map_err(|_| "Container full")?;
        self.layout();
        Ok(self.children.len() - 1)
    }

    /// Computed rectangle of child `index`.
    pub fn child_bounds(&self, index: usize) -> Option<Rectangle> {
        self.children.get(index).map(|c| c.bounds)
    }

    /// Split a size into (main, cross) for this container's direction.
    fn split(&self, size: Size) -> (u32, u32) {
        match self.direction {
            Direction::Horizontal => (size.width, size.height),
            Direction::Vertical => (size.height, size.width),
        }
    }

    fn join(&self, main: u32, cross: u32) -> Size {
        match self.direction {
            Direction::Horizontal => Size::new(main, cross),
            Direction::Vertical => Size::new(cross, main),
        }
    }

    fn offset(&self, origin: Point, main: i32, cross: i32) -> Point {
        match self.direction {
            Direction::Horizontal => origin + Point::new(main, cross),
            Direction::Vertical => origin + Point::new(cross, main),
        }
    }

    fn layout(&mut self) {
        if self.children.is_empty() {
            return;
        }

        let content = Size::new(
            self.bounds.size.width.saturating_sub(self.padding.horizontal()),
            self.bounds.size.height.saturating_sub(self.padding.vertical()),
        );
        let origin = self.bounds.top_left
            + Point::new(self.padding.left as i32, self.padding.top as i32);
        let (available_main, available_cross) = self.split(content);

        let gaps = self.spacing * (self.children.len() as u32 - 1);
        let mut claimed = 0u32;
        let mut expanding = 0u32;
        for child in &self.children {
            match child.constraint {
                SizeConstraint::Fixed(n) => claimed += n,
                SizeConstraint::Expand => expanding += 1,
            }
        }
        let share = if expanding > 0 {
            available_main.saturating_sub(claimed).saturating_sub(gaps) / expanding
        } else {
            0
        };

        let mut cursor = 0i32;
        for i in 0..self.children.len() {
            let main = match self.children[i].constraint {
                SizeConstraint::Fixed(n) => n,
                SizeConstraint::Expand => share,
            };

            let top_left = self.offset(origin, cursor, 0);
            let size = self.join(main, available_cross);
            self.children[i].bounds = Rectangle::new(top_left, size);

            cursor += main as i32 + self.spacing as i32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
        Rectangle::new(Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn column_with_fixed_and_expanding_rows() {
        let mut column = Container::<4>::new(rect(0, 0, 176, 176), Direction::Vertical)
            .with_padding(Padding::new(0, 6, 0, 6))
            .with_spacing(2);
        let a = column.add_child(SizeConstraint::Fixed(56)).unwrap();
        let b = column.add_child(SizeConstraint::Fixed(22)).unwrap();
        let c = column.add_child(SizeConstraint::Expand).unwrap();
        let d = column.add_child(SizeConstraint::Fixed(40)).unwrap();

        assert_eq!(column.child_bounds(a), Some(rect(6, 0, 164, 56)));
        assert_eq!(column.child_bounds(b), Some(rect(6, 58, 164, 22)));
        assert_eq!(column.child_bounds(c), Some(rect(6, 82, 164, 52)));
        assert_eq!(column.child_bounds(d), Some(rect(6, 136, 164, 40)));
    }

    #[test]
    fn row_shares_leftover_between_expanders() {
        let mut row = Container::<3>::new(rect(10, 20, 100, 30), Direction::Horizontal);
        row.add_child(SizeConstraint::Fixed(20)).unwrap();
        row.add_child(SizeConstraint::Expand).unwrap();
        row.add_child(SizeConstraint::Expand).unwrap();

        assert_eq!(row.child_bounds(0), Some(rect(10, 20, 20, 30)));
        assert_eq!(row.child_bounds(1), Some(rect(30, 20, 40, 30)));
        assert_eq!(row.child_bounds(2), Some(rect(70, 20, 40, 30)));
    }

    #[test]
    fn full_container_rejects_child() {
        let mut row = Container::<1>::new(rect(0, 0, 10, 10), Direction::Horizontal);
        row.add_child(SizeConstraint::Expand).unwrap();
        assert!(row.add_child(SizeConstraint::Expand).is_err());
        assert_eq!(row.child_bounds(1), None);
    }
}
