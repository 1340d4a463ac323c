//! Interaction injection: pointer and touch events become splats.
//!
//! Handlers never touch the fields directly; they queue [`Splat`]s that
//! the frame loop drains at the start of a tick. That keeps all field
//! mutation on the solver's timeline — events only record state and
//! enqueue work, so nothing runs during an in-progress pass.

use fluid_engine_core::{PointerSet, Xorshift64};
use glam::{Vec2, Vec3};

/// Motion multiplier for mouse moves.
pub const MOUSE_MOTION_SCALE: f32 = 5.0;

/// Motion multiplier for touch moves. Touch events sample at a lower
/// rate than mouse events, so each delta covers more ground.
pub const TOUCH_MOTION_SCALE: f32 = 10.0;

/// Magnitude bound for each axis of an ambient splat's impulse.
pub const AMBIENT_IMPULSE: f32 = 500.0;

/// Ambient splats seeded when a simulation first comes alive.
pub const STARTUP_SPLAT_BURST: usize = 10;

/// One queued impulse: where, how hard, and what color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splat {
    /// Injection point in normalized coordinates (origin bottom-left).
    pub point: Vec2,
    /// Pointer delta; the solver scales it by the configured splat force.
    pub delta: Vec2,
    /// Color added to the density field.
    pub color: Vec3,
}

/// Converts raw pointer/touch events into queued splats.
#[derive(Debug, Clone)]
pub struct Injector {
    pointers: PointerSet,
    pending: Vec<Splat>,
    ambient_bursts: Vec<usize>,
    rng: Xorshift64,
    surface_width: f32,
    surface_height: f32,
}

impl Injector {
    /// Creates an injector with a deterministic color/ambient source.
    pub fn new(seed: u64) -> Self {
        Self {
            pointers: PointerSet::new(),
            pending: Vec::new(),
            ambient_bursts: Vec::new(),
            rng: Xorshift64::new(seed),
            surface_width: 0.0,
            surface_height: 0.0,
        }
    }

    /// Updates the surface size used to normalize event coordinates.
    pub fn set_surface_size(&mut self, width: f32, height: f32) {
        self.surface_width = width;
        self.surface_height = height;
    }

    /// The tracked pointer records.
    pub fn pointers(&self) -> &PointerSet {
        &self.pointers
    }

    /// Device coordinates (origin top-left) to normalized field
    /// coordinates (origin bottom-left).
    fn normalize(&self, position: Vec2) -> Vec2 {
        if self.surface_width < 1.0 || self.surface_height < 1.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            position.x / self.surface_width,
            1.0 - position.y / self.surface_height,
        )
    }

    /// Primary pointer pressed: record position, zero the delta, assign a
    /// fresh color.
    pub fn mouse_down(&mut self, x: f32, y: f32) {
        let color = self.rng.next_pointer_color();
        self.pointers.primary_mut().press(Vec2::new(x, y), color);
    }

    /// Primary pointer moved. While down, queues one splat carrying the
    /// scaled delta; hover motion is ignored.
    pub fn mouse_move(&mut self, x: f32, y: f32) {
        let position = Vec2::new(x, y);
        if let Some(delta) = self
            .pointers
            .primary_mut()
            .advance(position, MOUSE_MOTION_SCALE)
        {
            let splat = Splat {
                point: self.normalize(position),
                delta,
                color: self.pointers.primary().color,
            };
            self.pending.push(splat);
        }
    }

    /// Primary pointer released. No terminal splat.
    pub fn mouse_up(&mut self) {
        self.pointers.primary_mut().release();
    }

    /// New touch contact: tracked with an independently assigned random
    /// color. Contacts beyond the set's capacity are ignored.
    pub fn touch_start(&mut self, id: i64, x: f32, y: f32) {
        let color = self.rng.next_pointer_color();
        if let Some(pointer) = self.pointers.touch_mut(id) {
            pointer.press(Vec2::new(x, y), color);
        }
    }

    /// Touch contact moved; queues one splat like a mouse move but with
    /// the touch motion multiplier.
    pub fn touch_move(&mut self, id: i64, x: f32, y: f32) {
        let position = Vec2::new(x, y);
        let Some(pointer) = self.pointers.touch_mut(id) else {
            return;
        };
        if let Some(delta) = pointer.advance(position, TOUCH_MOTION_SCALE) {
            let color = pointer.color;
            let splat = Splat {
                point: self.normalize(position),
                delta,
                color,
            };
            self.pending.push(splat);
        }
    }

    /// Touch contact lifted: released and dropped from the set.
    pub fn touch_end(&mut self, id: i64) {
        if let Some(pointer) = self.pointers.touch_mut(id) {
            pointer.release();
        }
        self.pointers.remove_touch(id);
    }

    /// Queues a burst of `count` randomized ambient splats for the next
    /// drain.
    pub fn queue_ambient(&mut self, count: usize) {
        self.ambient_bursts.push(count);
    }

    /// Queues the startup burst a freshly allocated simulation gets.
    pub fn seed_startup_burst(&mut self) {
        self.queue_ambient(STARTUP_SPLAT_BURST);
    }

    /// Whether any splats are waiting.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty() || !self.ambient_bursts.is_empty()
    }

    /// Takes every queued splat: pointer splats first, then any ambient
    /// bursts expanded into randomized splats.
    pub fn drain(&mut self) -> Vec<Splat> {
        let mut splats = std::mem::take(&mut self.pending);
        for count in std::mem::take(&mut self.ambient_bursts) {
            for _ in 0..count {
                splats.push(Splat {
                    point: Vec2::new(self.rng.next_f32(), self.rng.next_f32()),
                    delta: Vec2::new(
                        self.rng.next_range(-AMBIENT_IMPULSE, AMBIENT_IMPULSE),
                        self.rng.next_range(-AMBIENT_IMPULSE, AMBIENT_IMPULSE),
                    ),
                    color: self.rng.next_color(),
                });
            }
        }
        splats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn injector() -> Injector {
        let mut inj = Injector::new(42);
        inj.set_surface_size(200.0, 100.0);
        inj
    }

    // ---- Mouse ----

    #[test]
    fn mouse_down_records_state_without_splatting() {
        let mut inj = injector();
        inj.mouse_down(50.0, 25.0);
        assert!(inj.pointers().primary().down);
        assert_eq!(inj.pointers().primary().delta, Vec2::ZERO);
        assert!(!inj.has_pending());
    }

    #[test]
    fn mouse_down_assigns_a_bright_color() {
        let mut inj = injector();
        inj.mouse_down(0.0, 0.0);
        let color = inj.pointers().primary().color;
        for channel in [color.x, color.y, color.z] {
            assert!(channel >= 0.2, "channel {channel} below brightness floor");
        }
    }

    #[test]
    fn mouse_move_while_down_queues_one_scaled_splat() {
        let mut inj = injector();
        inj.mouse_down(50.0, 25.0);
        inj.mouse_move(54.0, 23.0);
        let splats = inj.drain();
        assert_eq!(splats.len(), 1);
        assert_eq!(splats[0].delta, Vec2::new(20.0, -10.0));
    }

    #[test]
    fn mouse_move_normalizes_and_flips_y() {
        let mut inj = injector();
        inj.mouse_down(0.0, 0.0);
        inj.mouse_move(100.0, 25.0);
        let splats = inj.drain();
        assert_eq!(splats[0].point, Vec2::new(0.5, 0.75));
    }

    #[test]
    fn hover_motion_queues_nothing() {
        let mut inj = injector();
        inj.mouse_move(10.0, 10.0);
        inj.mouse_move(40.0, 40.0);
        assert!(!inj.has_pending());
    }

    #[test]
    fn mouse_up_stops_splatting_without_terminal_splat() {
        let mut inj = injector();
        inj.mouse_down(10.0, 10.0);
        inj.mouse_move(20.0, 10.0);
        inj.mouse_up();
        inj.mouse_move(40.0, 10.0);
        let splats = inj.drain();
        assert_eq!(splats.len(), 1, "only the pre-release move splats");
    }

    #[test]
    fn each_move_measures_from_previous_position() {
        let mut inj = injector();
        inj.mouse_down(0.0, 0.0);
        inj.mouse_move(10.0, 0.0);
        inj.mouse_move(30.0, 0.0);
        let splats = inj.drain();
        assert_eq!(splats[0].delta, Vec2::new(50.0, 0.0));
        assert_eq!(splats[1].delta, Vec2::new(100.0, 0.0));
    }

    // ---- Touch ----

    #[test]
    fn touch_move_uses_touch_multiplier() {
        let mut inj = injector();
        inj.touch_start(7, 100.0, 50.0);
        inj.touch_move(7, 103.0, 50.0);
        let splats = inj.drain();
        assert_eq!(splats.len(), 1);
        assert_eq!(splats[0].delta, Vec2::new(30.0, 0.0));
    }

    #[test]
    fn simultaneous_touches_get_independent_colors() {
        let mut inj = injector();
        inj.touch_start(1, 10.0, 10.0);
        inj.touch_start(2, 90.0, 90.0);
        let a = inj.pointers().touch(1).unwrap().color;
        let b = inj.pointers().touch(2).unwrap().color;
        assert_ne!(a, b, "colors should be drawn independently");
    }

    #[test]
    fn touch_end_removes_the_contact() {
        let mut inj = injector();
        inj.touch_start(3, 0.0, 0.0);
        inj.touch_end(3);
        assert!(inj.pointers().touch(3).is_none());
        inj.touch_move(3, 50.0, 50.0);
        // A move for a dead contact re-registers it but, being up, emits
        // nothing.
        assert!(!inj.has_pending());
    }

    #[test]
    fn unknown_touch_move_does_not_splat() {
        let mut inj = injector();
        inj.touch_move(99, 10.0, 10.0);
        assert!(!inj.has_pending());
    }

    // ---- Ambient ----

    #[test]
    fn ambient_burst_expands_to_requested_count() {
        let mut inj = injector();
        inj.queue_ambient(4);
        let splats = inj.drain();
        assert_eq!(splats.len(), 4);
        for s in &splats {
            assert!((0.0..1.0).contains(&s.point.x));
            assert!((0.0..1.0).contains(&s.point.y));
            assert!(s.delta.x.abs() <= AMBIENT_IMPULSE);
            assert!(s.delta.y.abs() <= AMBIENT_IMPULSE);
        }
    }

    #[test]
    fn startup_burst_queues_the_documented_count() {
        let mut inj = injector();
        inj.seed_startup_burst();
        assert_eq!(inj.drain().len(), STARTUP_SPLAT_BURST);
    }

    #[test]
    fn drain_empties_the_queue() {
        let mut inj = injector();
        inj.queue_ambient(3);
        inj.mouse_down(0.0, 0.0);
        inj.mouse_move(5.0, 5.0);
        assert!(inj.has_pending());
        let first = inj.drain();
        assert_eq!(first.len(), 4);
        assert!(!inj.has_pending());
        assert!(inj.drain().is_empty());
    }

    #[test]
    fn pointer_splats_drain_before_ambient() {
        let mut inj = injector();
        inj.queue_ambient(1);
        inj.mouse_down(0.0, 0.0);
        inj.mouse_move(10.0, 0.0);
        let splats = inj.drain();
        assert_eq!(splats.len(), 2);
        assert_eq!(splats[0].delta, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn same_seed_produces_identical_ambient_splats() {
        let mut a = Injector::new(7);
        let mut b = Injector::new(7);
        a.queue_ambient(5);
        b.queue_ambient(5);
        assert_eq!(a.drain(), b.drain());
    }

    #[test]
    fn zero_surface_normalizes_to_origin() {
        let mut inj = Injector::new(1);
        inj.mouse_down(10.0, 10.0);
        inj.mouse_move(20.0, 20.0);
        let splats = inj.drain();
        assert_eq!(splats[0].point, Vec2::ZERO);
    }
}
