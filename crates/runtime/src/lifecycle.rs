//! Surface lifecycle: sizing, the frame loop, resize-safe reallocation,
//! and disposal.
//!
//! The host owns the actual surface and event wiring; it reports size
//! observations and clock ticks here. `Lifecycle` decides when the
//! simulation exists: it allocates the field store once the surface has a
//! real size, replaces it wholesale on every size change (stale fields
//! sized for an old surface must never survive a resize), and drops it on
//! disposal. The host's frame callback calls [`Lifecycle::tick`] then
//! [`Lifecycle::present`]; cancellation is simply not calling again after
//! [`Lifecycle::dispose`], which is why disposal can only land on a tick
//! boundary.

use fluid_engine_core::{FluidConfig, FluidError};
use fluid_engine_sim::{FluidSim, NOMINAL_DT};

use crate::injector::Injector;
use crate::presenter;

/// Longest wall-clock delta fed into one tick, in seconds. Slow frames
/// are absorbed here rather than stretching the advection trace.
pub const MAX_FRAME_DT: f64 = 1.0 / 60.0;

/// Smallest surface extent (physical pixels) considered a real size.
pub const MIN_SURFACE_EXTENT: u32 = 2;

/// Lifecycle states. Resizing is not a distinct state: a resize is a
/// dispose-and-reallocate that starts and finishes within one
/// [`Lifecycle::observe_size`] call, leaving the phase Running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, not yet started.
    Unstarted,
    /// Started, waiting for the surface to reach a usable size.
    Sizing,
    /// Fields allocated; ticks advance the simulation.
    Running,
    /// Torn down; every call is a no-op.
    Disposed,
}

/// Owns the simulation instance and drives it from host callbacks.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    phase: Phase,
    config: FluidConfig,
    paused: bool,
    injector: Injector,
    sim: Option<FluidSim>,
    surface_width: u32,
    surface_height: u32,
    last_tick: Option<f64>,
    generation: u64,
}

impl Lifecycle {
    /// Creates an unstarted lifecycle with a validated configuration.
    pub fn new(config: FluidConfig, seed: u64) -> Result<Self, FluidError> {
        config.validate()?;
        Ok(Self {
            phase: Phase::Unstarted,
            paused: config.paused,
            config,
            injector: Injector::new(seed),
            sim: None,
            surface_width: 0,
            surface_height: 0,
            last_tick: None,
            generation: 0,
        })
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The live simulation, if one is allocated.
    pub fn sim(&self) -> Option<&FluidSim> {
        self.sim.as_ref()
    }

    /// The interaction injector, for wiring host events.
    pub fn injector_mut(&mut self) -> &mut Injector {
        &mut self.injector
    }

    /// Physical surface size last observed.
    pub fn surface_size(&self) -> (u32, u32) {
        (self.surface_width, self.surface_height)
    }

    /// How many field stores have been allocated over this lifecycle's
    /// lifetime. Each resize bumps it by exactly one; it never counts a
    /// store that was not first disposed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether ticks currently skip the solver.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pauses or resumes stepping. Presentation is unaffected.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Starts the lifecycle. Idempotent: hosts may mount twice, and the
    /// second call must not reallocate or reseed anything.
    pub fn start(&mut self) -> Result<(), FluidError> {
        if self.phase != Phase::Unstarted {
            return Ok(());
        }
        self.phase = Phase::Sizing;
        if self.has_usable_surface() {
            self.reallocate()?;
        }
        Ok(())
    }

    /// Reports an observed surface size: logical dimensions scaled by the
    /// device pixel ratio.
    ///
    /// Before the first usable size arrives this only records dimensions.
    /// Once started, a new usable size disposes the current field store
    /// and allocates a fresh one — never resizing in place. A shrink to
    /// an unusable size keeps the current store; ticks skip until the
    /// surface comes back.
    pub fn observe_size(
        &mut self,
        logical_width: f64,
        logical_height: f64,
        device_pixel_ratio: f64,
    ) -> Result<(), FluidError> {
        if self.phase == Phase::Disposed {
            return Ok(());
        }

        let width = (logical_width * device_pixel_ratio).floor().max(0.0) as u32;
        let height = (logical_height * device_pixel_ratio).floor().max(0.0) as u32;
        if width == self.surface_width && height == self.surface_height && self.sim.is_some() {
            return Ok(());
        }

        self.surface_width = width;
        self.surface_height = height;
        self.injector.set_surface_size(width as f32, height as f32);

        if self.phase == Phase::Unstarted || !self.has_usable_surface() {
            return Ok(());
        }
        self.reallocate()
    }

    /// Advances one frame at host time `now_seconds`.
    ///
    /// Computes a clamped delta, drains queued splats, and steps the
    /// solver — unless paused or the surface is currently unusable, in
    /// which case the tick is skipped (never an error).
    pub fn tick(&mut self, now_seconds: f64) -> Result<(), FluidError> {
        if self.phase != Phase::Running {
            return Ok(());
        }

        let dt = match self.last_tick {
            Some(previous) => (now_seconds - previous).clamp(0.0, MAX_FRAME_DT) as f32,
            None => NOMINAL_DT,
        };
        self.last_tick = Some(now_seconds);

        if self.paused || !self.has_usable_surface() {
            return Ok(());
        }

        if let Some(sim) = self.sim.as_mut() {
            for splat in self.injector.drain() {
                sim.splat(splat.point, splat.delta, splat.color)?;
            }
            sim.step(dt)?;
        }
        Ok(())
    }

    /// Renders the current density field to an RGBA8 buffer, regardless
    /// of the pause state, so the displayed image stays live while the
    /// simulation is frozen. `None` until a field store exists.
    pub fn present(&self) -> Option<Vec<u8>> {
        self.sim
            .as_ref()
            .map(|sim| presenter::density_to_rgba(sim.density().read()))
    }

    /// Tears down: drops the field store and stops accepting work.
    /// Idempotent, and safe to call from any phase.
    pub fn dispose(&mut self) {
        self.sim = None;
        self.phase = Phase::Disposed;
    }

    fn has_usable_surface(&self) -> bool {
        self.surface_width >= MIN_SURFACE_EXTENT && self.surface_height >= MIN_SURFACE_EXTENT
    }

    /// Drops any current field store and allocates a fresh one at the
    /// downsampled grid size. Seeds the ambient startup burst on the
    /// very first allocation only.
    fn reallocate(&mut self) -> Result<(), FluidError> {
        let grid_width = self.config.grid_extent(self.surface_width);
        let grid_height = self.config.grid_extent(self.surface_height);

        let first = self.generation == 0;
        // Old store released before the new one exists; nothing stale
        // can be handed out in between.
        self.sim = None;
        self.sim = Some(FluidSim::new(grid_width, grid_height, self.config)?);
        self.generation += 1;
        if first {
            self.injector.seed_startup_burst();
        }
        self.phase = Phase::Running;
        Ok(())
    }
}
