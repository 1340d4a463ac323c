//! The canvas-backed application driving the GPU pipeline.

use fluid_engine_core::render::{FieldTargets, GpuContext, KernelSet, PassPipeline};
use fluid_engine_core::FluidConfig;
use fluid_engine_runtime::{Injector, MAX_FRAME_DT, MIN_SURFACE_EXTENT};
use fluid_engine_sim::NOMINAL_DT;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

/// The fluid simulation bound to one canvas.
///
/// Construction compiles the kernel set (an initialization failure here
/// surfaces as a constructor error so the page can omit the effect).
/// Field textures appear at the first usable `resize` and are disposed
/// and reallocated wholesale on every later one.
#[wasm_bindgen]
pub struct FluidApp {
    canvas: HtmlCanvasElement,
    gpu: GpuContext,
    kernels: KernelSet,
    pipeline: PassPipeline,
    fields: Option<FieldTargets>,
    injector: Injector,
    config: FluidConfig,
    last_frame: Option<f64>,
    allocated_once: bool,
    paused: bool,
    disposed: bool,
}

#[wasm_bindgen]
impl FluidApp {
    /// Builds the app over the canvas's WebGL2 context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, seed: u32) -> Result<FluidApp, JsValue> {
        let webgl2 = canvas
            .get_context("webgl2")
            .map_err(|_| JsValue::from_str("webgl2 context request failed"))?
            .ok_or_else(|| JsValue::from_str("webgl2 is not available"))?
            .dyn_into::<WebGl2RenderingContext>()
            .map_err(|_| JsValue::from_str("context is not webgl2"))?;

        let gpu = GpuContext::new(glow::Context::from_webgl2_context(webgl2));
        let kernels =
            KernelSet::compile(gpu.gl()).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let pipeline = PassPipeline::new(gpu.gl()).map_err(|e| JsValue::from_str(&e))?;

        let config = FluidConfig::default();
        Ok(FluidApp {
            canvas,
            gpu,
            kernels,
            pipeline,
            fields: None,
            injector: Injector::new(u64::from(seed)),
            paused: config.paused,
            config,
            last_frame: None,
            allocated_once: false,
            disposed: false,
        })
    }

    /// Reports an observed surface size (logical pixels and device pixel
    /// ratio). Updates the canvas backing store and reallocates the field
    /// textures; sizes under 2x2 defer until the surface comes back.
    pub fn resize(
        &mut self,
        logical_width: f64,
        logical_height: f64,
        device_pixel_ratio: f64,
    ) -> Result<(), JsValue> {
        if self.disposed {
            return Ok(());
        }
        let width = (logical_width * device_pixel_ratio).floor().max(0.0) as u32;
        let height = (logical_height * device_pixel_ratio).floor().max(0.0) as u32;
        if width == self.canvas.width() && height == self.canvas.height() && self.fields.is_some()
        {
            return Ok(());
        }
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.injector.set_surface_size(width as f32, height as f32);

        if width < MIN_SURFACE_EXTENT || height < MIN_SURFACE_EXTENT {
            return Ok(());
        }

        // Dispose-and-reallocate; stale textures must not survive.
        if let Some(fields) = self.fields.as_mut() {
            fields.dispose(self.gpu.gl());
        }
        let grid_width = self.config.grid_extent(width) as u32;
        let grid_height = self.config.grid_extent(height) as u32;
        let fields = FieldTargets::allocate(&self.gpu, grid_width, grid_height)
            .map_err(|e| JsValue::from_str(&e))?;
        self.fields = Some(fields);
        if !self.allocated_once {
            self.allocated_once = true;
            self.injector.seed_startup_burst();
        }
        Ok(())
    }

    /// One animation frame at `now_ms` (a `performance.now()` timestamp).
    /// Drains splats and steps unless paused; always presents.
    pub fn frame(&mut self, now_ms: f64) {
        if self.disposed {
            return;
        }
        let now = now_ms / 1000.0;
        let dt = match self.last_frame {
            Some(previous) => (now - previous).clamp(0.0, MAX_FRAME_DT) as f32,
            None => NOMINAL_DT,
        };
        self.last_frame = Some(now);

        let Some(fields) = self.fields.as_mut() else {
            return;
        };
        let gl = self.gpu.gl();

        if !self.paused {
            let aspect = fields.width() as f32 / fields.height() as f32;
            let radius = if aspect > 1.0 {
                self.config.splat_radius
            } else {
                self.config.splat_radius * aspect
            };
            for splat in self.injector.drain() {
                self.pipeline.splat(
                    gl,
                    &self.kernels,
                    fields,
                    splat.point,
                    splat.delta * self.config.splat_force,
                    splat.color,
                    radius,
                    aspect,
                );
            }
            self.pipeline
                .step(gl, &self.kernels, fields, &self.config, dt);
        }

        self.pipeline.present(
            gl,
            &self.kernels,
            fields,
            self.canvas.width(),
            self.canvas.height(),
        );
    }

    /// Primary pointer pressed at canvas coordinates.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.injector.mouse_down(x, y);
    }

    /// Primary pointer moved.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.injector.mouse_move(x, y);
    }

    /// Primary pointer released.
    pub fn pointer_up(&mut self) {
        self.injector.mouse_up();
    }

    /// Touch contact began.
    pub fn touch_start(&mut self, id: i32, x: f32, y: f32) {
        self.injector.touch_start(i64::from(id), x, y);
    }

    /// Touch contact moved.
    pub fn touch_move(&mut self, id: i32, x: f32, y: f32) {
        self.injector.touch_move(i64::from(id), x, y);
    }

    /// Touch contact lifted.
    pub fn touch_end(&mut self, id: i32) {
        self.injector.touch_end(i64::from(id));
    }

    /// Queues a burst of randomized ambient splats.
    pub fn queue_ambient(&mut self, count: usize) {
        self.injector.queue_ambient(count);
    }

    /// Pauses or resumes stepping; presentation continues either way.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Releases every GPU resource. Idempotent; the host should stop
    /// calling `frame` afterward (cancellation lands on a frame
    /// boundary, never mid-pass).
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        let gl = self.gpu.gl();
        if let Some(fields) = self.fields.as_mut() {
            fields.dispose(gl);
        }
        self.fields = None;
        self.kernels.destroy(gl);
        self.pipeline.destroy(gl);
        self.disposed = true;
    }
}
