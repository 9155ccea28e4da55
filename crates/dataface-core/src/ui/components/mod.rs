//! Leaf components placed in layout cells

pub mod icon;
pub mod text;
pub mod vector_text;

pub use icon::IconView;
pub use text::{TextComponent, TextSize};
pub use vector_text::{FontSizing, VectorFont, VectorText, fit_font_size};
