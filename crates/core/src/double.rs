//! Double-buffered field pair with O(1) read/write swap.
//!
//! Every multi-pass kernel writes into a destination it is not reading
//! from. `DoubleField` owns two identically shaped [`Field`]s and a flag
//! selecting which one is currently the read half; `swap()` flips the flag
//! without moving any data. The invariant `read half != write half` always
//! holds.

use crate::error::FluidError;
use crate::field::Field;

/// A read/write pair of identically shaped fields.
///
/// The read half holds the result of the previous pass; kernels write the
/// next state into the write half and then call [`DoubleField::swap`].
#[derive(Debug, Clone)]
pub struct DoubleField {
    halves: [Field; 2],
    front: usize,
}

impl DoubleField {
    /// Creates a pair of zero-filled fields of the given shape.
    ///
    /// Fails with the same errors as [`Field::new`].
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self, FluidError> {
        Ok(Self {
            halves: [
                Field::new(width, height, channels)?,
                Field::new(width, height, channels)?,
            ],
            front: 0,
        })
    }

    /// The current read half.
    pub fn read(&self) -> &Field {
        &self.halves[self.front]
    }

    /// The current write half.
    pub fn write(&self) -> &Field {
        &self.halves[1 - self.front]
    }

    /// Mutable access to the current write half.
    pub fn write_mut(&mut self) -> &mut Field {
        &mut self.halves[1 - self.front]
    }

    /// Borrows the read half immutably and the write half mutably at the
    /// same time, for kernels that transform one into the other.
    pub fn parts_mut(&mut self) -> (&Field, &mut Field) {
        let (first, rest) = self.halves.split_at_mut(1);
        if self.front == 0 {
            (&first[0], &mut rest[0])
        } else {
            (&rest[0], &mut first[0])
        }
    }

    /// Exchanges which half is read and which is written. O(1), no data
    /// movement, and its own inverse.
    pub fn swap(&mut self) {
        self.front = 1 - self.front;
    }

    /// Zeroes both halves.
    pub fn clear(&mut self) {
        self.halves[0].clear();
        self.halves[1].clear();
    }

    /// Width shared by both halves.
    pub fn width(&self) -> usize {
        self.halves[0].width()
    }

    /// Height shared by both halves.
    pub fn height(&self) -> usize {
        self.halves[0].height()
    }

    /// Channel count shared by both halves.
    pub fn channels(&self) -> usize {
        self.halves[0].channels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_zeroed_pair() {
        let pair = DoubleField::new(4, 4, 2).unwrap();
        assert_eq!(pair.width(), 4);
        assert_eq!(pair.height(), 4);
        assert_eq!(pair.channels(), 2);
        assert!(pair.read().data().iter().all(|&v| v == 0.0));
        assert!(pair.write().data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn new_propagates_field_errors() {
        assert!(DoubleField::new(1, 4, 1).is_err());
        assert!(DoubleField::new(4, 4, 0).is_err());
    }

    #[test]
    fn swap_exchanges_read_and_write() {
        let mut pair = DoubleField::new(2, 2, 1).unwrap();
        pair.write_mut().set(0, 0, 0, 0.5);
        assert_eq!(pair.read().get(0, 0, 0), 0.0);
        pair.swap();
        assert!((pair.read().get(0, 0, 0) - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn swap_is_its_own_inverse() {
        let mut pair = DoubleField::new(2, 2, 1).unwrap();
        pair.write_mut().set(1, 1, 0, 0.7);
        let read_before: Vec<f32> = pair.read().data().to_vec();
        let write_before: Vec<f32> = pair.write().data().to_vec();
        pair.swap();
        pair.swap();
        assert_eq!(pair.read().data(), &read_before[..]);
        assert_eq!(pair.write().data(), &write_before[..]);
    }

    #[test]
    fn swap_moves_no_data() {
        let mut pair = DoubleField::new(2, 2, 1).unwrap();
        pair.write_mut().set(0, 1, 0, 0.3);
        let snapshot: Vec<f32> = pair.write().data().to_vec();
        pair.swap();
        // Same values, now visible through the read half.
        assert_eq!(pair.read().data(), &snapshot[..]);
    }

    #[test]
    fn parts_mut_borrows_opposite_halves() {
        let mut pair = DoubleField::new(2, 2, 1).unwrap();
        {
            let (read, write) = pair.parts_mut();
            assert_eq!(read.get(0, 0, 0), 0.0);
            write.set(0, 0, 0, 1.0);
        }
        // Written through the write half, not the read half.
        assert_eq!(pair.read().get(0, 0, 0), 0.0);
        assert!((pair.write().get(0, 0, 0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn parts_mut_respects_current_front_after_swap() {
        let mut pair = DoubleField::new(2, 2, 1).unwrap();
        pair.write_mut().set(0, 0, 0, 0.9);
        pair.swap();
        let (read, _write) = pair.parts_mut();
        assert!((read.get(0, 0, 0) - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn clear_zeroes_both_halves() {
        let mut pair = DoubleField::new(2, 2, 1).unwrap();
        pair.write_mut().set(0, 0, 0, 1.0);
        pair.swap();
        pair.write_mut().set(1, 1, 0, 2.0);
        pair.clear();
        assert!(pair.read().data().iter().all(|&v| v == 0.0));
        assert!(pair.write().data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn read_and_write_are_distinct_over_many_swaps() {
        let mut pair = DoubleField::new(2, 2, 1).unwrap();
        for i in 0..100 {
            assert_ne!(
                pair.read() as *const Field,
                pair.write() as *const Field,
                "halves aliased at swap {i}"
            );
            pair.swap();
        }
    }
}
