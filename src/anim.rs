use std::time::Duration;

use kurbo::Point;

use crate::{
    error::{UnicornError, UnicornResult},
    path::LeapPath,
};

/// The layer property a request animates. Position is the only one a leap
/// drives, but requests carry it explicitly rather than assuming it.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
pub enum PropertyName {
    #[default]
    Position,
}

impl PropertyName {
    pub fn key_path(self) -> &'static str {
        match self {
            Self::Position => "position",
        }
    }
}

/// One scheduled leap: path geometry, duration, and a start offset relative
/// to the shared run-loop origin.
#[derive(Clone, Debug)]
pub struct AnimationRequest {
    pub index: usize,
    pub path: LeapPath,
    pub duration: Duration,
    pub start_offset: Duration,
    pub property: PropertyName,
}

/// Lifecycle of a request relative to the shared origin. Requests only move
/// forward: `Scheduled` then `Running` then `Completed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Scheduled,
    Running,
    Completed,
}

impl AnimationRequest {
    pub fn validate(&self) -> UnicornResult<()> {
        if self.duration.is_zero() {
            return Err(UnicornError::animation("animation duration must be > 0"));
        }
        Ok(())
    }

    pub fn phase(&self, elapsed: Duration) -> Phase {
        if elapsed < self.start_offset {
            Phase::Scheduled
        } else if elapsed < self.start_offset + self.duration {
            Phase::Running
        } else {
            Phase::Completed
        }
    }

    /// Position on the path at `elapsed` since the shared origin. Linear
    /// timing, no easing; clamped to the path endpoints outside the
    /// animation's own span.
    pub fn position_at(&self, elapsed: Duration) -> Point {
        let t = if elapsed <= self.start_offset {
            0.0
        } else {
            (elapsed - self.start_offset).as_secs_f64() / self.duration.as_secs_f64()
        };
        self.path.position(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Stage;

    fn request() -> AnimationRequest {
        let stage = Stage::new(100.0, 50.0).unwrap();
        AnimationRequest {
            index: 0,
            path: LeapPath::new(stage, 1.0).unwrap(),
            duration: Duration::from_secs(2),
            start_offset: Duration::from_millis(500),
            property: PropertyName::default(),
        }
    }

    #[test]
    fn phase_boundaries_are_exact() {
        let req = request();
        assert_eq!(req.phase(Duration::from_millis(499)), Phase::Scheduled);
        assert_eq!(req.phase(Duration::from_millis(500)), Phase::Running);
        assert_eq!(req.phase(Duration::from_millis(2499)), Phase::Running);
        assert_eq!(req.phase(Duration::from_millis(2500)), Phase::Completed);
    }

    #[test]
    fn position_is_linear_in_time() {
        let req = request();
        // Halfway through its span the request sits at the arc's apex.
        assert_eq!(req.position_at(Duration::from_millis(1500)), req.path.apex());
        assert_eq!(req.position_at(Duration::ZERO), req.path.start());
        assert_eq!(req.position_at(Duration::from_secs(10)), req.path.end());
    }

    #[test]
    fn zero_duration_fails_validation() {
        let mut req = request();
        req.duration = Duration::ZERO;
        assert!(req.validate().is_err());
    }

    #[test]
    fn property_key_path_is_position() {
        assert_eq!(PropertyName::Position.key_path(), "position");
    }
}
