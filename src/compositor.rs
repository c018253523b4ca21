use std::{
    cell::Cell,
    rc::Rc,
    thread,
    time::{Duration, Instant},
};

use crate::{
    anim::{AnimationRequest, Phase},
    compose::Canvas,
    error::UnicornResult,
    images::LeapImage,
    term::Surface,
};

/// Once-set run-loop stop flag. Single writer (a completion callback) and
/// single reader (the loop driver), both on the thread inside
/// [`Compositor::run`], so no synchronization beyond the shared cell.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Rc<Cell<bool>>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.set(true);
    }

    pub fn is_set(&self) -> bool {
        self.0.get()
    }
}

pub type CompletionFn = Box<dyn FnOnce()>;

/// Drawable content of one request: the unicorn sprite plus an optional
/// sparkle trailing it along the same path.
#[derive(Clone, Debug)]
pub struct Layer {
    pub image: LeapImage,
    pub sparkle: Option<LeapImage>,
}

/// The platform-collaborator seam: something that accepts keyframe-style
/// animation requests and drives a blocking run loop.
pub trait Compositor {
    /// Registers one animation. Implementations guarantee the completion
    /// callback fires exactly once, on the thread inside [`Compositor::run`],
    /// once the request's phase reaches [`Phase::Completed`].
    fn submit(
        &mut self,
        request: AnimationRequest,
        layer: Layer,
        on_complete: CompletionFn,
    ) -> UnicornResult<()>;

    /// Blocks, processing frames and delivering callbacks, until `stop` is
    /// set. The flag is checked after callback delivery each tick, so a
    /// callback that sets it on the final tick still ends the loop. There is
    /// no timeout: if the flag is never set, this never returns.
    fn run(&mut self, stop: StopSignal) -> UnicornResult<()>;
}

struct Slot {
    request: AnimationRequest,
    layer: Layer,
    on_complete: Option<CompletionFn>,
}

/// Real-time software compositor: a fixed-rate frame loop that samples every
/// request against a shared monotonic origin, composites layers in submission
/// order, and presents through a [`Surface`].
pub struct SoftwareCompositor {
    surface: Box<dyn Surface>,
    frame_interval: Duration,
    slots: Vec<Slot>,
    canvas: Canvas,
}

impl SoftwareCompositor {
    /// Fraction of a leap the sparkle trails behind the unicorn.
    const SPARKLE_LAG: f64 = 0.06;

    pub fn new(surface: Box<dyn Surface>, fps: u32) -> Self {
        let (width, height) = surface.size();
        Self {
            surface,
            frame_interval: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            slots: Vec::new(),
            canvas: Canvas::new(width, height),
        }
    }

    fn tick(&mut self, elapsed: Duration) -> UnicornResult<()> {
        self.canvas.clear();
        for slot in &self.slots {
            if slot.request.phase(elapsed) != Phase::Running {
                continue;
            }
            if let Some(sparkle) = &slot.layer.sparkle {
                let lag = slot.request.duration.mul_f64(Self::SPARKLE_LAG);
                let behind = elapsed.saturating_sub(lag);
                self.canvas.draw_image(sparkle, slot.request.position_at(behind));
            }
            self.canvas
                .draw_image(&slot.layer.image, slot.request.position_at(elapsed));
        }

        // Deliver newly completed callbacks, in submission order.
        for slot in &mut self.slots {
            if slot.on_complete.is_some() && slot.request.phase(elapsed) == Phase::Completed {
                if let Some(on_complete) = slot.on_complete.take() {
                    tracing::debug!(index = slot.request.index, "animation completed");
                    on_complete();
                }
            }
        }

        self.surface.present(&self.canvas)
    }
}

impl Compositor for SoftwareCompositor {
    fn submit(
        &mut self,
        request: AnimationRequest,
        layer: Layer,
        on_complete: CompletionFn,
    ) -> UnicornResult<()> {
        request.validate()?;
        tracing::debug!(
            index = request.index,
            offset_ms = request.start_offset.as_millis() as u64,
            duration_ms = request.duration.as_millis() as u64,
            property = request.property.key_path(),
            "animation scheduled"
        );
        self.slots.push(Slot {
            request,
            layer,
            on_complete: Some(on_complete),
        });
        Ok(())
    }

    fn run(&mut self, stop: StopSignal) -> UnicornResult<()> {
        // The shared origin all start offsets are measured against.
        let origin = Instant::now();
        loop {
            let frame_started = Instant::now();
            self.tick(frame_started.duration_since(origin))?;
            if stop.is_set() {
                return Ok(());
            }
            let spent = frame_started.elapsed();
            if spent < self.frame_interval {
                thread::sleep(self.frame_interval - spent);
            }
        }
    }
}
