//! Sweeping real-time buffer engine.
//!
//! The core of sweepscope: per-channel fixed-capacity buffers written in
//! lockstep by a shared cursor ([`writer`]), fed by a wall-clock pacing
//! source ([`pacing`]) that converts frame timing into drift-free batch
//! sizes. Rendering and frame scheduling live outside this module; the
//! engine only exposes state-transition operations.

pub mod buffer;
pub mod generators;
pub mod pacing;
pub mod writer;

pub use buffer::ChannelBuffer;
pub use generators::{demo_channels, DemoWave, SampleGenerator};
pub use pacing::PacingSource;
pub use writer::{Batch, SweepWriter};

use anyhow::{anyhow, Result};

/// A paced multi-channel stream feeding a sweeping window.
///
/// Composes the pacing source, one generator per channel, and the sweep
/// writer. One [`tick`](SweepStream::tick) per display refresh does the whole
/// job: size the batch from elapsed wall-clock time, generate the samples,
/// and apply them to the window.
pub struct SweepStream<G: SampleGenerator> {
    pacing: PacingSource,
    generators: Vec<G>,
    writer: SweepWriter,
}

impl<G: SampleGenerator> SweepStream<G> {
    /// Wires a pacing source and per-channel generators to a sweep writer.
    ///
    /// # Errors
    /// - If the number of generators does not match the writer's channels
    pub fn new(pacing: PacingSource, generators: Vec<G>, writer: SweepWriter) -> Result<Self> {
        if generators.len() != writer.channel_count() {
            return Err(anyhow!(
                "{} generators for a {}-channel window",
                generators.len(),
                writer.channel_count()
            ));
        }
        Ok(Self {
            pacing,
            generators,
            writer,
        })
    }

    /// Advances the stream to `now_ms`, producing and applying one batch.
    ///
    /// Returns the number of samples written per channel this tick.
    pub fn tick(&mut self, now_ms: f64) -> usize {
        let count = self.pacing.tick(now_ms);
        let start = self.pacing.advance(count);

        let rows = self
            .generators
            .iter()
            .map(|g| (0..count).map(|i| g.generate(start + i as u64)).collect())
            .collect();
        self.writer.apply(&Batch::from_rows(rows));
        count
    }

    /// Re-establishes the pacing time base, e.g. after a pause.
    pub fn resync(&mut self, now_ms: f64) {
        self.pacing.resync(now_ms);
    }

    /// The sweeping window, for the renderer.
    pub fn writer(&self) -> &SweepWriter {
        &self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(capacity: usize, channels: usize, rate: u32) -> SweepStream<DemoWave> {
        let pacing = PacingSource::new(rate, 2000.0);
        let writer = SweepWriter::new(capacity, channels, 0.01).unwrap();
        SweepStream::new(pacing, demo_channels(channels, 1), writer).unwrap()
    }

    #[test]
    fn generator_count_must_match_channels() {
        let pacing = PacingSource::new(100, 2000.0);
        let writer = SweepWriter::new(100, 4, 0.01).unwrap();
        assert!(SweepStream::new(pacing, demo_channels(3, 1), writer).is_err());
    }

    #[test]
    fn tick_writes_the_paced_sample_count() {
        let mut s = stream(1000, 2, 1000);
        assert_eq!(s.tick(0.0), 0);
        let written = s.tick(50.0);
        assert_eq!(written, 50);
        assert_eq!(s.writer().last_index(), 49);
    }

    #[test]
    fn ticks_are_deterministic_for_a_fixed_clock() {
        let mut a = stream(500, 3, 500);
        let mut b = stream(500, 3, 500);
        for now in [0.0, 16.0, 33.0, 50.0, 900.0, 916.0] {
            a.tick(now);
            b.tick(now);
        }
        for ch in 0..3 {
            for (x, y) in a.writer().channel(ch).iter().zip(b.writer().channel(ch)) {
                assert!(x == y || (x.is_nan() && y.is_nan()));
            }
        }
    }

    #[test]
    fn stream_sweeps_past_the_window_end() {
        let mut s = stream(100, 1, 1000);
        s.tick(0.0);
        s.tick(80.0); // fills slots 0..79
        s.tick(120.0); // 40 more: 20 to the right, 20 wrapped
        assert_eq!(s.writer().last_index(), 19);
    }
}
