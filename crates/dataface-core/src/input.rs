//! Hardware button watch
//!
//! Samples a GPIO level and reports debounced rising edges, the same way the
//! runtime's pin watchers behave with `edge: rising` and a debounce window.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;

/// Default debounce window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Turns raw pin samples into button presses.
pub struct ButtonWatch<P: InputPin> {
    pin: P,
    debounce: Duration,
    was_high: bool,
    last_press: Option<Instant>,
}

impl<P: InputPin> ButtonWatch<P> {
    pub fn new(pin: P, debounce: Duration) -> Self {
        Self {
            pin,
            debounce,
            was_high: false,
            last_press: None,
        }
    }

    /// Sample the pin once.
    ///
    /// Returns `true` for a low-to-high transition at least `debounce` after
    /// the previous accepted press. Edges inside the window are contact
    /// bounce and are swallowed.
    pub fn poll(&mut self, now: Instant) -> Result<bool, P::Error> {
        let high = self.pin.is_high()?;
        let rising = high && !self.was_high;
        self.was_high = high;

        if !rising {
            return Ok(false);
        }
        if let Some(last) = self.last_press
            && now.saturating_duration_since(last) < self.debounce
        {
            return Ok(false);
        }
        self.last_press = Some(now);
        Ok(true)
    }

    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    struct ScriptedPin {
        high: bool,
    }

    impl ErrorType for ScriptedPin {
        type Error = Infallible;
    }

    impl InputPin for ScriptedPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.high)
        }
    }

    fn sample(watch: &mut ButtonWatch<ScriptedPin>, high: bool, at_ms: u64) -> bool {
        watch.pin_mut().high = high;
        watch.poll(Instant::from_millis(at_ms)).unwrap()
    }

    #[test]
    fn reports_rising_edges_only() {
        let mut watch = ButtonWatch::new(ScriptedPin { high: false }, DEFAULT_DEBOUNCE);
        assert!(!sample(&mut watch, false, 0));
        assert!(sample(&mut watch, true, 100));
        // Held down: no repeat.
        assert!(!sample(&mut watch, true, 200));
        assert!(!sample(&mut watch, false, 300));
        assert!(sample(&mut watch, true, 400));
    }

    #[test]
    fn bounce_inside_window_is_ignored() {
        let mut watch = ButtonWatch::new(ScriptedPin { high: false }, DEFAULT_DEBOUNCE);
        assert!(sample(&mut watch, true, 1_000));
        assert!(!sample(&mut watch, false, 1_010));
        assert!(!sample(&mut watch, true, 1_020));
        assert!(!sample(&mut watch, false, 1_030));
        assert!(sample(&mut watch, true, 1_080));
    }
}
