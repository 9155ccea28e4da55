//! Daily step count lookup

use log::debug;

use crate::host::HealthSource;

/// Today's step count, trying each known reporting shape in turn.
///
/// Order: flat `steps`, nested `today.steps`, then the legacy counter.
/// A failed health query still falls through to the legacy counter. When
/// nothing reports a count the result is zero.
pub fn read_steps<H: HealthSource + ?Sized>(health: &H) -> u32 {
    match health.health_status() {
        Ok(Some(status)) => {
            if let Some(steps) = status.steps {
                return steps;
            }
            if let Some(steps) = status.today.and_then(|t| t.steps) {
                return steps;
            }
        }
        Ok(None) => {}
        Err(e) => debug!("Health status query failed: {}", e),
    }
    health.legacy_step_count().unwrap_or(0)
}
