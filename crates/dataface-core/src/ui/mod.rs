//! Retained-mode UI for the face
//!
//! A tiny layout system tuned for a 176x176 panel:
//! - [`Drawable`] elements that track their own dirtiness
//! - a flexible [`Container`] that computes child rectangles
//! - text leaves in two flavours: bitmap mono fonts and a scalable
//!   stroke font for numeric readouts
//! - an icon leaf drawing weather glyphs from primitives

pub mod components;
pub mod core;
pub mod elements;
pub mod layouts;
pub mod styling;

pub use components::{
    FontSizing, IconView, TextComponent, TextSize, VectorFont, VectorText, fit_font_size,
};
pub use self::core::Drawable;
pub use elements::Element;
pub use layouts::{Container, Direction, SizeConstraint};
pub use styling::{Padding, Style};

/// Panel width in pixels.
pub const DISPLAY_WIDTH_PX: u32 = 176;
/// Panel height in pixels.
pub const DISPLAY_HEIGHT_PX: u32 = 176;
