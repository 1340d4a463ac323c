#![deny(unsafe_code)]
//! CPU incompressible-fluid solver.
//!
//! `FluidSim` owns the five simulation fields and advances them with the
//! fixed eight-pass tick: curl, vorticity confinement, divergence,
//! pressure decay, the Jacobi pressure solve, gradient subtraction, then
//! velocity and density advection. The pass order is load-bearing —
//! confinement needs the freshly computed curl, divergence must reflect
//! the confinement-updated velocity, pressure is solved before it is
//! subtracted, and advection transports with the divergence-free
//! velocity — so it lives in exactly one place, [`FluidSim::step`].
//!
//! The GPU pipeline in `fluid-engine-core` runs the same math; this crate
//! is the reference the property tests pin down.

pub mod kernels;

use fluid_engine_core::{DoubleField, Field, FluidConfig, FluidError, Sampling};
use glam::{Vec2, Vec3};

/// Nominal fixed timestep (seconds) for deterministic stepping.
pub const NOMINAL_DT: f32 = 1.0 / 60.0;

/// Upper bound on a wall-clock timestep. Clamping keeps the advection
/// trace from overshooting the grid on slow frames.
pub const MAX_STEP_DT: f32 = 1.0 / 60.0;

/// The five fields of one simulation instance, identically sized.
///
/// Allocated only at a valid grid size and replaced wholesale on resize;
/// fields are never resized in place.
#[derive(Debug, Clone)]
pub struct SimulationState {
    velocity: DoubleField,
    density: DoubleField,
    pressure: DoubleField,
    divergence: Field,
    curl: Field,
}

impl SimulationState {
    /// Allocates all fields zero-filled at the given grid size.
    pub fn new(width: usize, height: usize) -> Result<Self, FluidError> {
        Ok(Self {
            velocity: DoubleField::new(width, height, 2)?,
            density: DoubleField::new(width, height, 3)?,
            pressure: DoubleField::new(width, height, 1)?,
            divergence: Field::new(width, height, 1)?,
            curl: Field::new(width, height, 1)?,
        })
    }
}

/// The CPU solver: fields plus configuration.
#[derive(Debug, Clone)]
pub struct FluidSim {
    state: SimulationState,
    config: FluidConfig,
    sampling: Sampling,
    width: usize,
    height: usize,
}

impl FluidSim {
    /// Creates a solver at the given grid size with bilinear advection
    /// sampling.
    ///
    /// Validates the configuration and allocates zeroed fields. `width`
    /// and `height` are grid texels (already downsampled), not surface
    /// pixels.
    pub fn new(width: usize, height: usize, config: FluidConfig) -> Result<Self, FluidError> {
        Self::with_sampling(width, height, config, Sampling::Bilinear)
    }

    /// Creates a solver with an explicit advection sampling mode.
    ///
    /// Nearest sampling mirrors the GPU fallback for contexts without
    /// linear filtering; the simulation stays stable, only smoothness
    /// suffers.
    pub fn with_sampling(
        width: usize,
        height: usize,
        config: FluidConfig,
        sampling: Sampling,
    ) -> Result<Self, FluidError> {
        config.validate()?;
        Ok(Self {
            state: SimulationState::new(width, height)?,
            config,
            sampling,
            width,
            height,
        })
    }

    /// Grid width in texels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in texels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The configuration this solver was built with.
    pub fn config(&self) -> &FluidConfig {
        &self.config
    }

    /// Advection sampling mode.
    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    /// Grid aspect ratio (width over height).
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// The velocity double buffer (2 channels).
    pub fn velocity(&self) -> &DoubleField {
        &self.state.velocity
    }

    /// The density double buffer (3 channels, the visible color).
    pub fn density(&self) -> &DoubleField {
        &self.state.density
    }

    /// The pressure double buffer (1 channel).
    pub fn pressure(&self) -> &DoubleField {
        &self.state.pressure
    }

    /// The divergence scratch field (1 channel).
    pub fn divergence(&self) -> &Field {
        &self.state.divergence
    }

    /// The curl scratch field (1 channel).
    pub fn curl(&self) -> &Field {
        &self.state.curl
    }

    /// Splat radius corrected for the grid aspect ratio: portrait grids
    /// shrink the radius so splats keep their on-screen size.
    pub fn splat_radius(&self) -> f32 {
        let aspect = self.aspect_ratio();
        if aspect > 1.0 {
            self.config.splat_radius
        } else {
            self.config.splat_radius * aspect
        }
    }

    /// Injects one interaction splat.
    ///
    /// `point` is in normalized coordinates, `delta` is the pointer delta
    /// (scaled to a velocity impulse by the configured splat force), and
    /// `color` is added to the density field. Both fields are splatted at
    /// the same point with the same aspect-corrected radius.
    pub fn splat(&mut self, point: Vec2, delta: Vec2, color: Vec3) -> Result<(), FluidError> {
        let aspect = self.aspect_ratio();
        let radius = self.splat_radius();
        let impulse = delta * self.config.splat_force;

        {
            let (read, write) = self.state.velocity.parts_mut();
            kernels::splat(
                read,
                write,
                point,
                Vec3::new(impulse.x, impulse.y, 0.0),
                radius,
                aspect,
            )?;
        }
        self.state.velocity.swap();

        {
            let (read, write) = self.state.density.parts_mut();
            kernels::splat(read, write, point, color, radius, aspect)?;
        }
        self.state.density.swap();

        Ok(())
    }

    /// Advances the simulation by one tick.
    ///
    /// `dt` is clamped to [0, [`MAX_STEP_DT`]]. Every pass completes,
    /// including its buffer swap, before the next begins.
    pub fn step(&mut self, dt: f32) -> Result<(), FluidError> {
        let dt = dt.clamp(0.0, MAX_STEP_DT);
        let config = self.config;

        // 1) Curl of the current velocity.
        kernels::curl(self.state.velocity.read(), &mut self.state.curl)?;

        // 2) Vorticity confinement force into velocity.
        {
            let (read, write) = self.state.velocity.parts_mut();
            kernels::vorticity_confinement(
                read,
                &self.state.curl,
                write,
                config.curl_strength,
                dt,
            )?;
        }
        self.state.velocity.swap();

        // 3) Divergence of the confinement-updated velocity.
        kernels::divergence(self.state.velocity.read(), &mut self.state.divergence)?;

        // 4) Dissipate the previous tick's pressure as the solve's seed.
        {
            let (read, write) = self.state.pressure.parts_mut();
            kernels::decay(read, write, config.pressure_dissipation)?;
        }
        self.state.pressure.swap();

        // 5) Jacobi pressure solve, ping-ponging each iteration.
        for _ in 0..config.pressure_iterations {
            {
                let (read, write) = self.state.pressure.parts_mut();
                kernels::pressure_jacobi(read, &self.state.divergence, write)?;
            }
            self.state.pressure.swap();
        }

        // 6) Subtract the pressure gradient from velocity.
        {
            let (read, write) = self.state.velocity.parts_mut();
            kernels::gradient_subtract(self.state.pressure.read(), read, write)?;
        }
        self.state.velocity.swap();

        // 7) Advect velocity through itself.
        {
            let (read, write) = self.state.velocity.parts_mut();
            kernels::advect(
                read,
                read,
                write,
                dt,
                config.velocity_dissipation,
                self.sampling,
            )?;
        }
        self.state.velocity.swap();

        // 8) Advect density along the final velocity.
        {
            let velocity = self.state.velocity.read();
            let (read, write) = self.state.density.parts_mut();
            kernels::advect(
                velocity,
                read,
                write,
                dt,
                config.density_dissipation,
                self.sampling,
            )?;
        }
        self.state.density.swap();

        Ok(())
    }
}
