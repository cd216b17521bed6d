//! Repeating visibility toggle ("flashing").
//!
//! A [`Flash`] is the per-sprite repeating timer armed by
//! [`Sprite::flash`](crate::sprite::Sprite::flash). It does not own a clock:
//! the frame loop feeds it elapsed time through
//! [`Scene::advance`](crate::scene::Scene::advance), and every full period
//! that elapses is one visibility toggle.
//!
//! With a non-zero `times` limit the timer retires itself once the toggle
//! count exceeds the limit, so `times = 3` toggles four times in total.
//! `times = 0` toggles until cancelled.

use std::time::Duration;

use crate::SceneError;

/// An active repeating visibility toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    period: Duration,
    /// Toggle limit; 0 means unlimited.
    times: u32,
    /// Toggles performed so far.
    flashed: u32,
    /// Time accumulated toward the next toggle.
    elapsed: Duration,
}

/// Result of advancing a [`Flash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlashTick {
    /// How many toggles fell due.
    pub toggles: u32,
    /// The limit was passed; the timer should be dropped.
    pub finished: bool,
}

impl Flash {
    /// Arm a timer toggling every `seconds`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidFlashPeriod`] if `seconds` is not a
    /// positive, finite number of at least one nanosecond.
    pub fn new(seconds: f64, times: u32) -> Result<Self, SceneError> {
        if !(seconds.is_finite() && seconds > 0.0) {
            return Err(SceneError::InvalidFlashPeriod { seconds });
        }
        let period = Duration::try_from_secs_f64(seconds)
            .map_err(|_| SceneError::InvalidFlashPeriod { seconds })?;
        if period.is_zero() {
            return Err(SceneError::InvalidFlashPeriod { seconds });
        }
        Ok(Self {
            period,
            times,
            flashed: 0,
            elapsed: Duration::ZERO,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// The toggle limit (0 = unlimited).
    pub fn times(&self) -> u32 {
        self.times
    }

    /// Toggles performed so far.
    pub fn toggles(&self) -> u32 {
        self.flashed
    }

    /// Feed `dt` of elapsed time and report the toggles that fell due.
    pub fn advance(&mut self, dt: Duration) -> FlashTick {
        self.elapsed = self.elapsed.saturating_add(dt);

        let due = self.elapsed.as_nanos() / self.period.as_nanos();
        let mut due = u32::try_from(due).unwrap_or(u32::MAX);
        if self.times != 0 {
            let remaining = self.times.saturating_add(1).saturating_sub(self.flashed);
            due = due.min(remaining);
        }

        self.elapsed -= self.period * due;
        self.flashed = self.flashed.saturating_add(due);

        FlashTick {
            toggles: due,
            finished: self.times != 0 && self.flashed > self.times,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn toggles_once_per_period() {
        let mut flash = Flash::new(0.5, 0).unwrap();
        assert_eq!(flash.advance(ms(499)).toggles, 0);
        assert_eq!(flash.advance(ms(1)).toggles, 1);
        assert_eq!(flash.advance(ms(1000)).toggles, 2);
        assert_eq!(flash.toggles(), 3);
    }

    #[test]
    fn limited_flash_toggles_times_plus_one() {
        let mut flash = Flash::new(0.125, 3).unwrap();
        let mut total = 0;
        let mut finished = false;
        for _ in 0..10 {
            let tick = flash.advance(ms(125));
            total += tick.toggles;
            if tick.finished {
                finished = true;
                break;
            }
        }
        assert!(finished);
        assert_eq!(total, 4);
    }

    #[test]
    fn limit_caps_a_single_large_step() {
        let mut flash = Flash::new(0.125, 3).unwrap();
        let tick = flash.advance(Duration::from_secs(60));
        assert_eq!(tick.toggles, 4);
        assert!(tick.finished);
    }

    #[test]
    fn unlimited_flash_never_finishes() {
        let mut flash = Flash::new(0.125, 0).unwrap();
        let tick = flash.advance(Duration::from_secs(100));
        assert_eq!(tick.toggles, 800);
        assert!(!tick.finished);
    }

    #[test]
    fn huge_step_saturates() {
        let mut flash = Flash::new(0.5, 0).unwrap();
        flash.advance(ms(300));
        let tick = flash.advance(Duration::MAX);
        assert_eq!(tick.toggles, u32::MAX);
        assert!(!tick.finished);
    }

    #[test]
    fn remainder_carries_over() {
        let mut flash = Flash::new(0.25, 0).unwrap();
        assert_eq!(flash.advance(ms(150)).toggles, 0);
        assert_eq!(flash.advance(ms(150)).toggles, 1);
        assert_eq!(flash.advance(ms(150)).toggles, 0);
        assert_eq!(flash.advance(ms(150)).toggles, 1);
    }

    #[test]
    fn invalid_periods_are_rejected() {
        for seconds in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e-12] {
            assert!(
                matches!(Flash::new(seconds, 0), Err(SceneError::InvalidFlashPeriod { .. })),
                "{seconds} should be rejected"
            );
        }
    }
}
