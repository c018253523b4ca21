use kurbo::{ParamCurve, Point, QuadBez};

use crate::error::{UnicornError, UnicornResult};

/// The drawable region a leap crosses, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stage {
    pub width: f64,
    pub height: f64,
}

impl Stage {
    pub fn new(width: f64, height: f64) -> UnicornResult<Self> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(UnicornError::animation("stage dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// The y coordinate leaps start and end on.
    pub fn baseline(self) -> f64 {
        self.height * 0.9
    }

    /// Apex rise above the baseline for eccentricity 1.0.
    pub fn peak_scale(self) -> f64 {
        self.height * 0.5
    }
}

/// One leap trajectory: a quadratic arc from the left edge to the right
/// edge, both endpoints on the stage baseline, apex scaled by eccentricity.
#[derive(Clone, Copy, Debug)]
pub struct LeapPath {
    curve: QuadBez,
}

impl LeapPath {
    pub fn new(stage: Stage, eccentricity: f64) -> UnicornResult<Self> {
        if !eccentricity.is_finite() || eccentricity < 0.0 {
            return Err(UnicornError::animation(
                "eccentricity must be finite and >= 0",
            ));
        }

        let baseline = stage.baseline();
        let peak = eccentricity * stage.peak_scale();
        // A quadratic's apex sits halfway between the chord and the control
        // point, so the control is lifted twice the requested peak.
        let curve = QuadBez::new(
            Point::new(0.0, baseline),
            Point::new(stage.width / 2.0, baseline - 2.0 * peak),
            Point::new(stage.width, baseline),
        );
        Ok(Self { curve })
    }

    /// Position along the arc at normalized time `t`, clamped to `[0, 1]`.
    pub fn position(&self, t: f64) -> Point {
        self.curve.eval(t.clamp(0.0, 1.0))
    }

    pub fn start(&self) -> Point {
        self.curve.p0
    }

    pub fn end(&self) -> Point {
        self.curve.p2
    }

    pub fn apex(&self) -> Point {
        self.position(0.5)
    }
}
