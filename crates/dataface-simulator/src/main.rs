//! Desktop simulator for the dataface clock face.
//!
//! Runs the real [`ClockFace`] controller in an SDL2 window via
//! `embedded-graphics-simulator`, with host services backed by the desktop:
//! files in a storage directory, a fake pedometer, and the built-in solar
//! calculator.
//!
//! # Key bindings
//!
//! | Key | Action                              |
//! |-----|-------------------------------------|
//! | B   | Hardware button (hold to bounce)    |
//! | P   | Toggle panel power                  |
//! | S   | Take ten steps                      |
//! | W   | Push a weather message from a phone |
//! | Q   | Quit                                |
//!
//! Storage lives in `DATAFACE_STORAGE` (default `./storage`). Settings are
//! read from `dataface.json` in that directory when it exists.

use std::convert::Infallible;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use embedded_hal::digital::{ErrorType, InputPin};
use log::{error, info, warn};
use time::OffsetDateTime;

use dataface_core::config::Settings;
use dataface_core::events::{EventQueue, FaceEvent};
use dataface_core::host::{HealthError, HealthSource, HealthStatus, KeyValueStore, StoreError};
use dataface_core::input::ButtonWatch;
use dataface_core::sun::SolarCalculator;
use dataface_core::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};
use dataface_core::{ClockFace, HostRequest};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 2;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

const SETTINGS_FILE: &str = "dataface.json";

const STEPS_PER_KEY: u32 = 10;

// ---------------------------------------------------------------------------
// Host services
// ---------------------------------------------------------------------------

/// One file per key inside a directory.
struct FileStore {
    root: PathBuf,
}

impl FileStore {
    fn open(root: PathBuf) -> Self {
        if let Err(e) = fs::create_dir_all(&root) {
            warn!("Cannot create storage dir {}: {}", root.display(), e);
        }
        Self { root }
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.root.join(name)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }

    fn write(&mut self, name: &str, contents: &str) -> Result<(), StoreError> {
        fs::write(self.root.join(name), contents).map_err(|e| StoreError::Io(e.to_string()))
    }
}

/// Pedometer driven from the keyboard.
#[derive(Default)]
struct SimulatedHealth {
    steps: u32,
}

impl HealthSource for SimulatedHealth {
    fn health_status(&self) -> Result<Option<HealthStatus>, HealthError> {
        Ok(Some(HealthStatus {
            steps: Some(self.steps),
            today: None,
        }))
    }
}

/// The B key standing in for the hardware button GPIO.
#[derive(Default)]
struct KeyPin {
    held: bool,
}

impl ErrorType for KeyPin {
    type Error = Infallible;
}

impl InputPin for KeyPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.held)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.held)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_settings(storage_dir: &Path) -> Settings {
    match fs::read_to_string(storage_dir.join(SETTINGS_FILE)) {
        Ok(text) => match Settings::from_json(&text) {
            Ok(settings) => {
                info!("Loaded {}", SETTINGS_FILE);
                settings
            }
            Err(e) => {
                error!("Ignoring {}: {}", SETTINGS_FILE, e);
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    }
}

/// Local wall-clock time, or UTC when the local offset is unknown.
fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// A bridge message with Kelvin readings that drift with the clock.
fn synthetic_weather(now: OffsetDateTime) -> String {
    const CONDITIONS: [&str; 6] = [
        "Clear sky",
        "Scattered clouds",
        "Light rain",
        "Thunderstorm",
        "Snow",
        "Mist",
    ];
    let minute = now.minute() as f64;
    let temp = 288.15 + 6.0 * (minute / 9.5).sin();
    let condition = CONDITIONS[now.second() as usize % CONDITIONS.len()];
    serde_json::json!({
        "t": "weather",
        "weather": {
            "temp": temp,
            "hi": temp + 4.0,
            "lo": temp - 5.0,
            "txt": condition,
        }
    })
    .to_string()
}

fn queue_event(queue: &EventQueue, event: FaceEvent) {
    if let Err(e) = queue.try_send(event) {
        warn!("Event queue full, dropping {:?}", e);
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting dataface simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, WINDOW_SCALE
    );
    info!("Keys: B=Button  P=Power  S=Steps  W=Weather  Q=Quit");

    let storage_dir =
        PathBuf::from(std::env::var("DATAFACE_STORAGE").unwrap_or_else(|_| "storage".into()));
    let settings = load_settings(&storage_dir);
    let store = FileStore::open(storage_dir);
    let debounce = embassy_time::Duration::from_millis(settings.button_debounce_ms);

    let mut display =
        SimulatorDisplay::<Rgb565>::new(Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Dataface Simulator", &output_settings);

    let events = EventQueue::new();
    let mut button = ButtonWatch::new(KeyPin::default(), debounce);
    let mut face = ClockFace::new(
        settings,
        store,
        SimulatedHealth::default(),
        SolarCalculator,
    );
    face.start(now_local());

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    let _ = face.flush(&mut display);
    window.update(&display);

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    'running: loop {
        let frame_start = std::time::Instant::now();

        // --- SDL events ---------------------------------------------------
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => break 'running,
                    Keycode::B => button.pin_mut().held = true,
                    Keycode::P => queue_event(&events, FaceEvent::LcdPower(!face.is_display_on())),
                    Keycode::S => {
                        face.health_mut().steps += STEPS_PER_KEY;
                        queue_event(&events, FaceEvent::Step);
                    }
                    Keycode::W => {
                        queue_event(&events, FaceEvent::Bridge(synthetic_weather(now_local())))
                    }
                    _ => {}
                },

                SimulatorEvent::KeyUp {
                    keycode: Keycode::B,
                    ..
                } => button.pin_mut().held = false,

                _ => {}
            }
        }

        // --- Button -------------------------------------------------------
        let Ok(pressed) = button.poll(embassy_time::Instant::now());
        if pressed {
            queue_event(&events, FaceEvent::Button);
        }

        // --- Face ---------------------------------------------------------
        let now = now_local();
        for request in face.drain_events(&events, now) {
            match request {
                HostRequest::WakeDisplay => {
                    info!("Face asked to wake the display");
                    queue_event(&events, FaceEvent::LcdPower(true));
                }
                HostRequest::ShowLauncher => info!("Face asked for the launcher"),
            }
        }
        face.poll_timers(now);

        // --- Render -------------------------------------------------------
        if face.is_display_on() {
            let _ = face.flush(&mut display);
        } else {
            let _ = display.clear(Rgb565::BLACK);
        }
        window.update(&display);

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    face.teardown();
    info!("Simulator exiting");
}
