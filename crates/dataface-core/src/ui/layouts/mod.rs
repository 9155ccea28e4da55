//! Layout containers

pub mod container;

pub use container::{Container, Direction, SizeConstraint};
