//! Pointer and touch contact tracking.
//!
//! One persistent primary pointer (the mouse) plus a dynamically grown set
//! of touch contacts, each an owned value record keyed by contact id. The
//! interaction layer reads deltas out of these records to build splat
//! impulses; nothing here touches the fields directly.

use glam::{Vec2, Vec3};

/// Contact id reserved for the primary (mouse) pointer.
pub const PRIMARY_POINTER_ID: i64 = -1;

/// Upper bound on simultaneously tracked touch contacts.
pub const MAX_TOUCH_POINTERS: usize = 10;

/// One pointer or touch contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    /// Contact identifier ([`PRIMARY_POINTER_ID`] for the mouse).
    pub id: i64,
    /// Current position in surface pixels.
    pub position: Vec2,
    /// Position change since the last recorded move, pre-scaled by the
    /// motion multiplier.
    pub delta: Vec2,
    /// Whether the contact is currently held down.
    pub down: bool,
    /// Whether the contact has moved since it went down.
    pub moved: bool,
    /// Splat color assigned to this contact.
    pub color: Vec3,
}

impl Pointer {
    /// Creates an idle pointer with the given id.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            position: Vec2::ZERO,
            delta: Vec2::ZERO,
            down: false,
            moved: false,
            color: Vec3::ZERO,
        }
    }

    /// Records a press: position set, delta zeroed, color assigned.
    pub fn press(&mut self, position: Vec2, color: Vec3) {
        self.down = true;
        self.moved = false;
        self.position = position;
        self.delta = Vec2::ZERO;
        self.color = color;
    }

    /// Records a move while down, returning the scaled delta.
    ///
    /// Returns `None` when the pointer is not down (hover motion injects
    /// nothing). Otherwise the delta is `(new - old) * multiplier`, the
    /// position advances, and the moved flag is set.
    pub fn advance(&mut self, position: Vec2, multiplier: f32) -> Option<Vec2> {
        if !self.down {
            return None;
        }
        self.moved = true;
        self.delta = (position - self.position) * multiplier;
        self.position = position;
        Some(self.delta)
    }

    /// Records a release. No terminal delta is produced.
    pub fn release(&mut self) {
        self.down = false;
    }
}

impl Default for Pointer {
    fn default() -> Self {
        Self::new(PRIMARY_POINTER_ID)
    }
}

/// Owned collection of the primary pointer plus touch contacts.
#[derive(Debug, Clone, Default)]
pub struct PointerSet {
    primary: Pointer,
    touches: Vec<Pointer>,
}

impl PointerSet {
    /// Creates a set holding only the idle primary pointer.
    pub fn new() -> Self {
        Self {
            primary: Pointer::new(PRIMARY_POINTER_ID),
            touches: Vec::new(),
        }
    }

    /// The primary (mouse) pointer.
    pub fn primary(&self) -> &Pointer {
        &self.primary
    }

    /// Mutable access to the primary pointer.
    pub fn primary_mut(&mut self) -> &mut Pointer {
        &mut self.primary
    }

    /// Looks up a touch contact by id.
    pub fn touch(&self, id: i64) -> Option<&Pointer> {
        self.touches.iter().find(|p| p.id == id)
    }

    /// Returns the touch contact with the given id, creating it if absent.
    ///
    /// Returns `None` once [`MAX_TOUCH_POINTERS`] contacts are tracked and
    /// the id is new; extra simultaneous contacts are ignored.
    pub fn touch_mut(&mut self, id: i64) -> Option<&mut Pointer> {
        if let Some(idx) = self.touches.iter().position(|p| p.id == id) {
            return Some(&mut self.touches[idx]);
        }
        if self.touches.len() >= MAX_TOUCH_POINTERS {
            return None;
        }
        self.touches.push(Pointer::new(id));
        self.touches.last_mut()
    }

    /// Removes a touch contact when it lifts.
    pub fn remove_touch(&mut self, id: i64) {
        self.touches.retain(|p| p.id != id);
    }

    /// Number of currently tracked touch contacts.
    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    /// Iterates over every pointer, primary first.
    pub fn iter(&self) -> impl Iterator<Item = &Pointer> {
        std::iter::once(&self.primary).chain(self.touches.iter())
    }
}
