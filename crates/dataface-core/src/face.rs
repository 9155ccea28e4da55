//! Clock face controller
//!
//! [`ClockFace`] owns all mutable state: the weather/sun snapshot, the layout
//! tree, the off-screen frame and the timer queue. The host drives it with
//! three calls and never touches the state directly:
//!
//! - [`ClockFace::start`] once,
//! - [`ClockFace::handle_event`] for every runtime event,
//! - [`ClockFace::poll_timers`] from its main loop.
//!
//! Every call takes the current local time, so the controller itself never
//! reads a clock.

use embassy_time::{Duration, Instant};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::DrawTarget;
use heapless::Vec;
use log::{debug, info, trace, warn};
use time::OffsetDateTime;

use crate::app_state::{FaceRunState, FaceState};
use crate::config::Settings;
use crate::events::{EVENT_QUEUE_CAPACITY, EventQueue, FaceEvent};
use crate::framebuffer::FrameBuffer;
use crate::host::{Astronomy, HealthSource, KeyValueStore};
use crate::pages::FacePage;
use crate::scheduler::{TimerKind, Timers};
use crate::steps::read_steps;
use crate::storage::{load_cache_or_default, read_weather_payload, save_cache};
use crate::ui::Drawable;
use crate::weather::{IngestOutcome, WeatherPayload, parse_bridge_message};

/// Something the face wants the runtime to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    /// Turn the panel on.
    WakeDisplay,
    /// Leave the face and open the app launcher.
    ShowLauncher,
}

/// Milliseconds since the Unix epoch, clamped at zero.
pub fn unix_millis(now: OffsetDateTime) -> u64 {
    (now.unix_timestamp_nanos() / 1_000_000).max(0) as u64
}

/// Timer-queue instant for a wall-clock time.
pub fn instant_at(now: OffsetDateTime) -> Instant {
    Instant::from_millis(unix_millis(now))
}

/// The watch face.
pub struct ClockFace<S, H, A>
where
    S: KeyValueStore,
    H: HealthSource,
    A: Astronomy,
{
    settings: Settings,
    store: S,
    health: H,
    astronomy: A,
    state: FaceState,
    page: FacePage,
    frame: FrameBuffer,
    timers: Timers,
    run_state: FaceRunState,
    display_on: bool,
    ticks: u64,
}

impl<S, H, A> ClockFace<S, H, A>
where
    S: KeyValueStore,
    H: HealthSource,
    A: Astronomy,
{
    /// Settings that fail [`Settings::validate`] are replaced by the defaults.
    pub fn new(settings: Settings, store: S, health: H, astronomy: A) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                warn!("Invalid settings ({}), using defaults", e);
                Settings::default()
            }
        };
        let page = FacePage::new(&settings);
        Self {
            settings,
            store,
            health,
            astronomy,
            state: FaceState::default(),
            page,
            frame: FrameBuffer::new(),
            timers: Timers::new(),
            run_state: FaceRunState::Idle,
            display_on: false,
            ticks: 0,
        }
    }

    /// Restore the cache, paint the first frame and arm all timers.
    ///
    /// The panel is assumed to be on when the face launches.
    pub fn start(&mut self, now: OffsetDateTime) {
        if self.run_state != FaceRunState::Idle {
            warn!("Face already started ({:?})", self.run_state);
            return;
        }
        info!("Starting clock face at {}", now);

        let cache = load_cache_or_default(&self.store, &self.settings.cache_key);
        self.state = FaceState::from_cache(cache);
        self.refresh_sun(now);
        self.state.steps = read_steps(&self.health);
        self.page.update_labels(&self.state);

        self.run_state = FaceRunState::Running;
        self.display_on = true;
        self.start_ticking(now);

        let at = instant_at(now);
        self.timers
            .schedule_every(TimerKind::Refresh, at, self.settings.refresh_period());
        self.timers.schedule_once(
            TimerKind::InitialKick,
            at,
            self.settings.initial_refresh_delay(),
        );
    }

    /// React to a runtime event.
    pub fn handle_event(&mut self, event: FaceEvent, now: OffsetDateTime) -> Option<HostRequest> {
        if self.run_state == FaceRunState::Stopped {
            debug!("Face stopped, dropping {:?}", event);
            return None;
        }

        match event {
            FaceEvent::Bridge(message) => {
                self.on_bridge_message(&message, now);
                None
            }
            FaceEvent::Step => {
                self.update_clock(now);
                self.redraw();
                None
            }
            FaceEvent::LcdPower(on) => {
                self.on_lcd_power(on, now);
                None
            }
            FaceEvent::Button => Some(self.on_button()),
        }
    }

    /// Drain every queued event. Returns the requests they produced, in order.
    pub fn drain_events(
        &mut self,
        queue: &EventQueue,
        now: OffsetDateTime,
    ) -> Vec<HostRequest, EVENT_QUEUE_CAPACITY> {
        let mut requests = Vec::new();
        while let Ok(event) = queue.try_receive() {
            if let Some(request) = self.handle_event(event, now) {
                requests.push(request).ok();
            }
        }
        requests
    }

    /// Run every timer due at `now`. Returns how many fired.
    pub fn poll_timers(&mut self, now: OffsetDateTime) -> usize {
        if self.run_state != FaceRunState::Running {
            return 0;
        }

        let at = instant_at(now);
        let mut fired = 0;
        while let Some(kind) = self.timers.pop_due(at) {
            trace!("Timer {:?} fired", kind);
            fired += 1;
            match kind {
                TimerKind::TickAlign => {
                    self.tick(now);
                    self.timers
                        .schedule_every(TimerKind::Tick, at, self.settings.tick_period());
                }
                TimerKind::Tick => self.tick(now),
                TimerKind::Refresh | TimerKind::InitialKick => self.refresh_info(now),
            }
        }
        fired
    }

    /// Cancel every timer and ignore further events.
    pub fn teardown(&mut self) {
        info!("Tearing down clock face ({} pending timers)", self.timers.len());
        self.timers.cancel_all();
        self.run_state = FaceRunState::Stopped;
    }

    /// Push the changed part of the frame to the panel.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.frame.flush(display)
    }

    /// Earliest pending timer, for hosts that sleep between polls.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &FaceState {
        &self.state
    }

    pub fn page(&self) -> &FacePage {
        &self.page
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Host access to the store, e.g. when a companion app drops a new payload file.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn health_mut(&mut self) -> &mut H {
        &mut self.health
    }

    pub fn run_state(&self) -> FaceRunState {
        self.run_state
    }

    pub fn is_display_on(&self) -> bool {
        self.display_on
    }

    /// Clock ticks handled so far.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    // ------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------

    fn on_lcd_power(&mut self, on: bool, now: OffsetDateTime) {
        if on {
            let was_on = self.display_on;
            self.display_on = true;
            if was_on
                && (self.timers.is_scheduled(TimerKind::Tick)
                    || self.timers.is_scheduled(TimerKind::TickAlign))
            {
                self.update_clock(now);
                self.redraw();
                return;
            }
            info!("Display on, resuming ticks");
            self.page.mark_dirty();
            self.frame.invalidate();
            self.start_ticking(now);
        } else {
            info!("Display off, pausing ticks");
            self.display_on = false;
            self.timers.cancel(TimerKind::Tick);
            self.timers.cancel(TimerKind::TickAlign);
        }
    }

    fn on_button(&mut self) -> HostRequest {
        if self.display_on {
            debug!("Button: opening launcher");
            HostRequest::ShowLauncher
        } else {
            debug!("Button: waking display");
            HostRequest::WakeDisplay
        }
    }

    fn on_bridge_message(&mut self, message: &str, now: OffsetDateTime) {
        match parse_bridge_message(message) {
            Ok(Some(payload)) => {
                if self.apply_weather(&payload, now) {
                    self.redraw();
                    self.persist();
                }
            }
            Ok(None) => trace!("Ignoring non-weather bridge message"),
            Err(e) => warn!("Bad bridge message: {}", e),
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Redraw now, then line the repeating tick up with the next second.
    fn start_ticking(&mut self, now: OffsetDateTime) {
        self.timers.cancel(TimerKind::Tick);
        self.update_clock(now);
        self.redraw();

        let period = self.settings.tick_period_ms.max(1);
        let delay = period - unix_millis(now) % period;
        self.timers.schedule_once(
            TimerKind::TickAlign,
            instant_at(now),
            Duration::from_millis(delay),
        );
    }

    fn tick(&mut self, now: OffsetDateTime) {
        self.ticks += 1;
        self.update_clock(now);
        self.redraw();
    }

    /// Clock, date and step readouts.
    fn update_clock(&mut self, now: OffsetDateTime) {
        self.page.set_time(now);
        self.state.steps = read_steps(&self.health);
        self.page.set_steps(self.state.steps);
    }

    /// Poll the payload file, recompute sun times and persist.
    fn refresh_info(&mut self, now: OffsetDateTime) {
        debug!("Refreshing weather and sun times");
        match read_weather_payload(&self.store, &self.settings.weather_key) {
            Ok(Some(payload)) => {
                self.apply_weather(&payload, now);
            }
            Ok(None) => trace!("No stored weather payload"),
            Err(e) => warn!("Unreadable weather payload: {}", e),
        }
        self.refresh_sun(now);
        self.page.update_labels(&self.state);
        self.redraw();
        self.persist();
    }

    fn apply_weather(&mut self, payload: &WeatherPayload, now: OffsetDateTime) -> bool {
        let reading = payload.normalize(self.settings.units);
        match self.state.weather.apply(reading, unix_millis(now)) {
            IngestOutcome::Updated(fields) => {
                info!("Weather updated ({:?})", fields);
                self.page.update_labels(&self.state);
                true
            }
            IngestOutcome::Empty => {
                debug!("Weather payload had no usable fields");
                false
            }
        }
    }

    fn refresh_sun(&mut self, now: OffsetDateTime) {
        // Failures keep the previous labels and are logged by `refresh`.
        let _ = self.state.sun.refresh(
            &self.astronomy,
            now,
            self.settings.latitude,
            self.settings.longitude,
        );
    }

    fn persist(&mut self) {
        let snapshot = self.state.snapshot();
        if let Err(e) = save_cache(&mut self.store, &self.settings.cache_key, &snapshot) {
            warn!("Could not save cache: {}", e);
        }
    }

    fn redraw(&mut self) {
        let Ok(painted) = self.page.render(&mut self.frame);
        trace!("Redraw painted {} cells", painted);
    }
}
