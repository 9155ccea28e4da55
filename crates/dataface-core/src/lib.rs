//! Hardware-independent core library for the dataface clock face
//!
//! This crate contains all platform-agnostic logic for the watch face: unit
//! conversion and formatting, weather ingestion, sunrise/sunset computation,
//! weather icons, the layout tree, and the timer/event controller that ties
//! them together.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both the
//! watch runtime and desktop hosts (for the simulator and tests). Everything
//! the watch firmware owns (storage, health counters, astronomy, the event
//! loop) is reached through the traits in [`host`].

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod app_state;
pub mod config;
pub mod events;
pub mod face;
pub mod format;
pub mod framebuffer;
pub mod host;
pub mod icons;
pub mod input;
pub mod pages;
pub mod scheduler;
pub mod steps;
pub mod storage;
pub mod sun;
pub mod ui;
pub mod units;
pub mod weather;

pub use face::{ClockFace, HostRequest};
