//! Sweeping-window write algorithm shared by all channels.
//!
//! New samples extend the trace left to right. When the window's end is
//! reached the write wraps to the start, overwriting the oldest sweep. While
//! the cursor is mid-window, a short run of NaN slots is kept just ahead of
//! it so the newest samples stay visually separated from the stale data they
//! are about to overwrite.

use anyhow::{anyhow, Result};

use super::buffer::ChannelBuffer;

/// One tick's worth of new samples: one equal-length row per channel.
///
/// Batches are ephemeral; they are consumed by [`SweepWriter::apply`] and not
/// retained.
pub struct Batch {
    rows: Vec<Vec<f64>>,
}

impl Batch {
    /// Wraps per-channel sample rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        debug_assert!(
            rows.windows(2).all(|w| w[0].len() == w[1].len()),
            "batch rows must all have the same length"
        );
        Self { rows }
    }

    /// Number of samples per channel in this batch.
    pub fn count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Number of channel rows.
    pub fn channel_count(&self) -> usize {
        self.rows.len()
    }

    /// The sample row for channel `channel`.
    pub fn row(&self, channel: usize) -> &[f64] {
        &self.rows[channel]
    }
}

/// Owns the per-channel buffers and the shared write cursor.
///
/// The cursor (`last_index`) is the logical index of the most recently
/// written sample, shared by every channel: all channels are written in
/// lockstep, so a single cursor describes the whole window. It is -1 until
/// the first sample lands.
pub struct SweepWriter {
    capacity: usize,
    gap_len: usize,
    channels: Vec<ChannelBuffer>,
    last_index: isize,
}

impl SweepWriter {
    /// Creates a writer with `channel_count` buffers of `capacity` slots.
    ///
    /// `gap_fraction` sizes the NaN separator kept ahead of the cursor,
    /// as a fraction of the window (rounded to whole slots).
    ///
    /// # Errors
    /// - If `capacity` or `channel_count` is zero
    /// - If `gap_fraction` is not in `[0, 1)`
    pub fn new(capacity: usize, channel_count: usize, gap_fraction: f64) -> Result<Self> {
        if capacity == 0 {
            return Err(anyhow!("window capacity must be positive"));
        }
        if channel_count == 0 {
            return Err(anyhow!("channel count must be positive"));
        }
        if !(0.0..1.0).contains(&gap_fraction) {
            return Err(anyhow!(
                "gap fraction must be in [0, 1), got {gap_fraction}"
            ));
        }

        let gap_len = (capacity as f64 * gap_fraction).round() as usize;
        let channels = (0..channel_count)
            .map(|_| ChannelBuffer::new(capacity))
            .collect();

        Ok(Self {
            capacity,
            gap_len,
            channels,
            last_index: -1,
        })
    }

    /// Applies one batch to every channel, wrapping at most once.
    ///
    /// The batch must carry one row per channel and no more than `capacity`
    /// samples per row; both are caller contracts, checked in debug builds.
    /// A batch large enough to complete a second full sweep in one call is
    /// not handled.
    ///
    /// An empty batch is a strict no-op: no slot is touched and the cursor
    /// does not move.
    pub fn apply(&mut self, batch: &Batch) {
        debug_assert_eq!(
            batch.channel_count(),
            self.channels.len(),
            "batch channel count does not match window"
        );

        let count = batch.count();
        debug_assert!(
            count <= self.capacity,
            "batch of {count} samples exceeds window capacity {}",
            self.capacity
        );
        if count == 0 {
            return;
        }

        // Free slots between the cursor and the window's end.
        let space = self.capacity - (self.last_index + 1) as usize;
        let count_right = space.min(count);

        let write_at = (self.last_index + 1) as usize;
        for (channel, buf) in self.channels.iter_mut().enumerate() {
            buf.write_run(write_at, &batch.row(channel)[..count_right]);
        }
        self.last_index += count_right as isize;

        if count_right < space {
            // The batch stopped short of the window's end: blank out the few
            // oldest slots just ahead of the cursor so the fresh trace does
            // not connect to the previous sweep. The cursor stays put; the
            // gap is not consumed space. When the end was reached exactly,
            // wraparound overwrites ahead anyway and no gap is needed.
            let gap_at = (self.last_index + 1) as usize;
            let gap = self.gap_len.min(self.capacity - gap_at);
            for buf in &mut self.channels {
                buf.write_gap(gap_at, gap);
            }
        }

        // Samples that did not fit on the right restart from the left edge.
        let count_left = count - count_right;
        if count_left > 0 {
            for (channel, buf) in self.channels.iter_mut().enumerate() {
                buf.write_run(0, &batch.row(channel)[count_right..]);
            }
            self.last_index = count_left as isize - 1;
        }
    }

    /// Logical index of the most recently written sample, or -1 if empty.
    pub fn last_index(&self) -> isize {
        self.last_index
    }

    /// Number of logical slots per channel.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of channels in the window.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Read-only view of one channel's window, for the renderer.
    pub fn channel(&self, channel: usize) -> &[f64] {
        self.channels[channel].slots()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(rows: Vec<Vec<f64>>) -> Batch {
        Batch::from_rows(rows)
    }

    fn ramp(start: f64, count: usize) -> Vec<f64> {
        (0..count).map(|i| start + i as f64).collect()
    }

    // capacity 10, gap_fraction 0.1 -> gap of exactly 1 slot
    fn writer_cap10() -> SweepWriter {
        SweepWriter::new(10, 1, 0.1).unwrap()
    }

    #[test]
    fn rejects_invalid_construction() {
        assert!(SweepWriter::new(0, 1, 0.01).is_err());
        assert!(SweepWriter::new(10, 0, 0.01).is_err());
        assert!(SweepWriter::new(10, 1, 1.0).is_err());
        assert!(SweepWriter::new(10, 1, -0.1).is_err());
    }

    #[test]
    fn partial_fill_inserts_gap_ahead_of_cursor() {
        let mut w = writer_cap10();
        w.apply(&batch(vec![ramp(0.0, 7)]));

        assert_eq!(w.last_index(), 6);
        assert_eq!(&w.channel(0)[..7], ramp(0.0, 7).as_slice());
        // count_right (7) < space (10), so slot 7 is the gap
        assert!(w.channel(0)[7].is_nan());
        assert!(w.channel(0)[8].is_nan());
    }

    #[test]
    fn wraparound_splits_batch_and_skips_gap() {
        let mut w = writer_cap10();
        w.apply(&batch(vec![ramp(0.0, 7)]));
        w.apply(&batch(vec![ramp(100.0, 5)]));

        // space was 3: samples 100..103 fill slots 7..9, then 103, 104 wrap
        // to slots 0 and 1
        assert_eq!(w.last_index(), 1);
        assert_eq!(&w.channel(0)[7..10], &[100.0, 101.0, 102.0]);
        assert_eq!(&w.channel(0)[0..2], &[103.0, 104.0]);
        // the old samples past the wrap point are untouched
        assert_eq!(w.channel(0)[2], 2.0);
    }

    #[test]
    fn exact_fill_reaches_end_without_gap() {
        let mut w = writer_cap10();
        w.apply(&batch(vec![ramp(0.0, 10)]));

        assert_eq!(w.last_index(), 9);
        assert_eq!(w.channel(0), ramp(0.0, 10).as_slice());
        assert!(w.channel(0).iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn empty_batch_is_a_noop() {
        let mut w = writer_cap10();
        w.apply(&batch(vec![ramp(0.0, 4)]));
        let before: Vec<f64> = w.channel(0).to_vec();
        let cursor = w.last_index();

        w.apply(&batch(vec![vec![]]));

        assert_eq!(w.last_index(), cursor);
        for (a, b) in w.channel(0).iter().zip(&before) {
            assert!(a == b || (a.is_nan() && b.is_nan()));
        }
    }

    #[test]
    fn cursor_stays_in_range_over_many_applies() {
        let mut w = SweepWriter::new(16, 3, 0.05).unwrap();
        assert_eq!(w.last_index(), -1);
        for step in 0..200 {
            let count = (step * 7 + 3) % 17; // 0..=16, includes full-capacity batches
            w.apply(&batch(vec![ramp(0.0, count); 3]));
            assert!(w.last_index() >= -1 && w.last_index() < 16);
        }
    }

    #[test]
    fn all_channels_advance_in_lockstep() {
        let mut w = SweepWriter::new(10, 2, 0.1).unwrap();
        w.apply(&batch(vec![ramp(0.0, 6), ramp(50.0, 6)]));

        assert_eq!(&w.channel(0)[..6], ramp(0.0, 6).as_slice());
        assert_eq!(&w.channel(1)[..6], ramp(50.0, 6).as_slice());
        assert!(w.channel(0)[6].is_nan());
        assert!(w.channel(1)[6].is_nan());
    }

    #[test]
    fn gap_is_clipped_to_remaining_space() {
        // capacity 10, gap_fraction 0.3 -> nominal gap 3
        let mut w = SweepWriter::new(10, 1, 0.3).unwrap();
        w.apply(&batch(vec![ramp(0.0, 8)]));

        // only slots 8 and 9 remain before the end, so the gap is clipped to 2
        assert_eq!(w.last_index(), 7);
        assert!(w.channel(0)[8].is_nan());
        assert!(w.channel(0)[9].is_nan());
    }

    #[test]
    fn batch_samples_are_conserved_across_the_wrap() {
        let mut w = writer_cap10();
        w.apply(&batch(vec![ramp(0.0, 9)]));
        w.apply(&batch(vec![ramp(100.0, 8)]));

        // 1 sample to the right (slot 9), 7 wrapped to slots 0..6
        assert_eq!(w.channel(0)[9], 100.0);
        assert_eq!(&w.channel(0)[0..7], ramp(101.0, 7).as_slice());
        assert_eq!(w.last_index(), 6);
    }
}
