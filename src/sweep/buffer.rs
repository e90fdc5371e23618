//! Fixed-capacity sample storage for a single channel.
//!
//! Slots are overwritten in place; the buffer never reallocates after
//! construction. A NaN slot means "nothing to draw here" — both the initial
//! empty state and the sweep gap use it.

/// One channel's window of `capacity` numeric slots.
///
/// All slots start as NaN. The sweep writer has exclusive write access and
/// guarantees that every write stays within bounds; out-of-range offsets are
/// a contract violation, caught by debug assertions.
pub struct ChannelBuffer {
    slots: Vec<f64>,
}

impl ChannelBuffer {
    /// Creates a buffer of `capacity` NaN slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![f64::NAN; capacity],
        }
    }

    /// Overwrites `src.len()` slots starting at logical offset `offset`.
    ///
    /// The caller guarantees `offset + src.len() <= capacity`.
    pub fn write_run(&mut self, offset: usize, src: &[f64]) {
        debug_assert!(
            offset + src.len() <= self.slots.len(),
            "write_run out of bounds: offset {} + len {} > capacity {}",
            offset,
            src.len(),
            self.slots.len()
        );
        self.slots[offset..offset + src.len()].copy_from_slice(src);
    }

    /// Overwrites `len` slots with NaN starting at logical offset `offset`.
    ///
    /// The caller guarantees `offset + len <= capacity`.
    pub fn write_gap(&mut self, offset: usize, len: usize) {
        debug_assert!(
            offset + len <= self.slots.len(),
            "write_gap out of bounds: offset {offset} + len {len} > capacity {}",
            self.slots.len()
        );
        for slot in &mut self.slots[offset..offset + len] {
            *slot = f64::NAN;
        }
    }

    /// Read-only view of the window contents, for the renderer.
    pub fn slots(&self) -> &[f64] {
        &self.slots
    }

    /// Number of logical slots in the window.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_fully_nan() {
        let buf = ChannelBuffer::new(8);
        assert_eq!(buf.capacity(), 8);
        assert!(buf.slots().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn write_run_overwrites_in_place() {
        let mut buf = ChannelBuffer::new(6);
        buf.write_run(2, &[1.0, 2.0, 3.0]);
        assert!(buf.slots()[0].is_nan());
        assert!(buf.slots()[1].is_nan());
        assert_eq!(&buf.slots()[2..5], &[1.0, 2.0, 3.0]);
        assert!(buf.slots()[5].is_nan());
    }

    #[test]
    fn write_gap_marks_slots_nan() {
        let mut buf = ChannelBuffer::new(4);
        buf.write_run(0, &[1.0, 2.0, 3.0, 4.0]);
        buf.write_gap(1, 2);
        assert_eq!(buf.slots()[0], 1.0);
        assert!(buf.slots()[1].is_nan());
        assert!(buf.slots()[2].is_nan());
        assert_eq!(buf.slots()[3], 4.0);
    }

    #[test]
    fn zero_length_writes_are_noops() {
        let mut buf = ChannelBuffer::new(3);
        buf.write_run(3, &[]);
        buf.write_gap(3, 0);
        assert!(buf.slots().iter().all(|v| v.is_nan()));
    }
}
