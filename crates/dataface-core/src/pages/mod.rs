//! Screens

pub mod face;

pub use face::{CellId, FacePage};
