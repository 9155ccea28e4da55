//! Events delivered by the watch runtime

use alloc::string::String;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;

/// Capacity of [`EventQueue`].
pub const EVENT_QUEUE_CAPACITY: usize = 8;

/// Something happened outside the face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaceEvent {
    /// Raw JSON message from the phone bridge.
    Bridge(String),
    /// The pedometer counted a step.
    Step,
    /// The panel was switched on (`true`) or off.
    LcdPower(bool),
    /// Debounced press of the hardware button.
    Button,
}

/// Single-threaded buffer between the host's event sources and the face.
///
/// Producers use `try_send`; the host loop drains with `try_receive` and
/// feeds [`ClockFace::handle_event`](crate::ClockFace::handle_event).
pub type EventQueue = Channel<NoopRawMutex, FaceEvent, EVENT_QUEUE_CAPACITY>;
