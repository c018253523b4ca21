use std::time::Duration;

use rand::Rng;

use crate::{
    anim::{AnimationRequest, PropertyName},
    cli::LeapConfig,
    compositor::{CompletionFn, Compositor, Layer, StopSignal},
    error::UnicornResult,
    path::{LeapPath, Stage},
};

/// Fixed stagger ratio: each unicorn launches an eighth of a leap after the
/// previous one, so the next is airborne before the last lands.
const STAGGER_DIVISOR: f64 = 8.0;

/// Herd size when `--number` was not given.
const HERD_SIZE: usize = 30;

/// Per-element delay between successive start times.
pub fn stagger_offset(seconds: f64) -> Duration {
    Duration::from_secs_f64(seconds / STAGGER_DIVISOR)
}

/// Start offset of element `index`: that many stagger offsets after the
/// shared origin. Computed in f64 so the index never wraps a narrower
/// integer multiply.
pub fn start_offset_for(seconds: f64, index: usize) -> Duration {
    stagger_offset(seconds).mul_f64(index as f64)
}

/// Leaps `config.number` unicorns, all with the configured eccentricity, and
/// blocks until the last-submitted animation completes.
pub fn leap(
    config: &LeapConfig,
    stage: Stage,
    layer: &Layer,
    compositor: &mut dyn Compositor,
) -> UnicornResult<()> {
    let ecc = config.eccentricity;
    run_leaps(config.number, config.seconds, |_| ecc, stage, layer, compositor)
}

/// Herd mode: defaults to thirty unicorns unless a count was given, each
/// with an independently resampled eccentricity.
pub fn herd(
    config: &LeapConfig,
    stage: Stage,
    layer: &Layer,
    compositor: &mut dyn Compositor,
) -> UnicornResult<()> {
    let n = if config.number_was_given {
        config.number
    } else {
        HERD_SIZE
    };
    let mut rng = rand::thread_rng();
    run_leaps(
        n,
        config.seconds,
        move |_| herd_eccentricity(&mut rng, n),
        stage,
        layer,
        compositor,
    )
}

/// Uniform integer in `[0, n)` scaled down by ten, so a herd of thirty
/// peaks anywhere up to three times the normal height.
fn herd_eccentricity(rng: &mut impl Rng, n: usize) -> f64 {
    rng.gen_range(0..n) as f64 / 10.0
}

fn run_leaps(
    n: usize,
    seconds: f64,
    eccentricity_for: impl FnMut(usize) -> f64,
    stage: Stage,
    layer: &Layer,
    compositor: &mut dyn Compositor,
) -> UnicornResult<()> {
    let stop = submit_leaps(n, seconds, eccentricity_for, stage, layer, compositor)?;
    compositor.run(stop)
}

/// Submits `n` staggered leap animations in index order and returns the stop
/// signal that the last-submitted one resolves on completion.
///
/// Termination is gated on the animation submitted last (index `n - 1`), not
/// on a completion count; earlier callbacks are no-ops.
#[tracing::instrument(skip(eccentricity_for, layer, compositor))]
pub fn submit_leaps(
    n: usize,
    seconds: f64,
    mut eccentricity_for: impl FnMut(usize) -> f64,
    stage: Stage,
    layer: &Layer,
    compositor: &mut dyn Compositor,
) -> UnicornResult<StopSignal> {
    let stop = StopSignal::new();
    if n == 0 {
        // Nothing scheduled, nothing to wait for.
        stop.set();
        return Ok(stop);
    }

    let duration = Duration::from_secs_f64(seconds);

    for i in 0..n {
        let path = LeapPath::new(stage, eccentricity_for(i))?;
        let request = AnimationRequest {
            index: i,
            path,
            duration,
            start_offset: start_offset_for(seconds, i),
            property: PropertyName::default(),
        };
        let on_complete: CompletionFn = if i + 1 == n {
            let stop = stop.clone();
            Box::new(move || stop.set())
        } else {
            Box::new(|| {})
        };
        compositor.submit(request, layer.clone(), on_complete)?;
    }

    tracing::debug!(count = n, seconds, "scheduled leaps");
    Ok(stop)
}
