//! Wall-clock pacing for the sample stream.
//!
//! Converts elapsed time between display refreshes into an integer sample
//! count. The sub-sample remainder is carried to the next tick so the
//! long-run output rate converges to exactly the configured sample rate,
//! independent of frame-rate jitter.

/// Per-stream pacing state. Lives for the lifetime of the stream.
pub struct PacingSource {
    sample_rate: u32,
    max_catch_up_ms: f64,
    previous_tick_ms: Option<f64>,
    fractional_carry: f64,
    sample_counter: u64,
}

impl PacingSource {
    /// Creates a pacing source producing `sample_rate` samples per second.
    ///
    /// `max_catch_up_ms` bounds the elapsed time credited to a single tick,
    /// so a stalled frame driver (suspended process, background tab) does not
    /// flush an unbounded backlog in one batch.
    pub fn new(sample_rate: u32, max_catch_up_ms: f64) -> Self {
        Self {
            sample_rate,
            max_catch_up_ms,
            previous_tick_ms: None,
            fractional_carry: 0.0,
            sample_counter: 0,
        }
    }

    /// Computes how many samples to produce for a refresh at `now_ms`.
    ///
    /// `now_ms` is a monotonic clock reading in milliseconds. The first tick
    /// establishes the time base and yields zero samples.
    pub fn tick(&mut self, now_ms: f64) -> usize {
        let elapsed = match self.previous_tick_ms {
            Some(prev) => (now_ms - prev).clamp(0.0, self.max_catch_up_ms),
            None => 0.0,
        };

        let raw = elapsed * self.sample_rate as f64 / 1000.0 + self.fractional_carry;
        let count = raw.floor() as usize;
        self.fractional_carry = raw.fract();
        self.previous_tick_ms = Some(now_ms);
        count
    }

    /// Re-establishes the time base at `now_ms` without producing samples.
    ///
    /// Called when the stream resumes from a pause so the paused interval is
    /// not converted into a catch-up batch.
    pub fn resync(&mut self, now_ms: f64) {
        self.previous_tick_ms = Some(now_ms);
    }

    /// Reserves `count` logical time indices and returns the first one.
    ///
    /// Generators are seeded with the returned index onward, keeping the
    /// sample stream deterministic across ticks.
    pub fn advance(&mut self, count: usize) -> u64 {
        let start = self.sample_counter;
        self.sample_counter += count as u64;
        start
    }

    /// The next logical time index to be produced.
    pub fn sample_counter(&self) -> u64 {
        self.sample_counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_only_establishes_the_time_base() {
        let mut pacing = PacingSource::new(1000, 2000.0);
        assert_eq!(pacing.tick(12345.0), 0);
        // one second later, one second's worth of samples
        assert_eq!(pacing.tick(13345.0), 1000);
    }

    #[test]
    fn fractional_carry_converges_to_the_sample_rate() {
        // 60 fps at 1000 Hz: 16.6 ms per frame never divides evenly
        let mut pacing = PacingSource::new(1000, 2000.0);
        let mut now = 0.0;
        pacing.tick(now);

        let mut total = 0usize;
        for _ in 0..600 {
            now += 16.6;
            total += pacing.tick(now);
        }

        let expected = 1000.0 * (now / 1000.0);
        assert!((total as f64 - expected).abs() <= 1.0);
    }

    #[test]
    fn carry_stays_below_one() {
        let mut pacing = PacingSource::new(441, 2000.0);
        let mut now = 0.0;
        pacing.tick(now);
        for _ in 0..100 {
            now += 16.7;
            pacing.tick(now);
            assert!(pacing.fractional_carry >= 0.0 && pacing.fractional_carry < 1.0);
        }
    }

    #[test]
    fn stall_is_clamped_to_max_catch_up() {
        let mut clamped = PacingSource::new(1000, 2000.0);
        clamped.tick(0.0);
        let after_stall = clamped.tick(60_000.0);

        let mut reference = PacingSource::new(1000, 2000.0);
        reference.tick(0.0);
        let after_exact = reference.tick(2000.0);

        assert_eq!(after_stall, after_exact);
        assert_eq!(after_stall, 2000);
    }

    #[test]
    fn backwards_clock_produces_nothing() {
        let mut pacing = PacingSource::new(1000, 2000.0);
        pacing.tick(100.0);
        assert_eq!(pacing.tick(50.0), 0);
    }

    #[test]
    fn resync_discards_the_paused_interval() {
        let mut pacing = PacingSource::new(1000, 2000.0);
        pacing.tick(0.0);
        pacing.tick(100.0);

        // five seconds paused, then resync just before the next tick
        pacing.resync(5100.0);
        assert_eq!(pacing.tick(5116.0), 16);
    }

    #[test]
    fn advance_hands_out_contiguous_index_ranges() {
        let mut pacing = PacingSource::new(1000, 2000.0);
        assert_eq!(pacing.advance(10), 0);
        assert_eq!(pacing.advance(5), 10);
        assert_eq!(pacing.advance(0), 15);
        assert_eq!(pacing.sample_counter(), 15);
    }
}
