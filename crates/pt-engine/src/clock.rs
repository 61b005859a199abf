//! Sample-accurate tick clock.
//!
//! A tick lasts `sample_rate * 60 / bpm / 4 / ticks_per_row` samples, which
//! is rarely a whole number. Rather than comparing a float counter and
//! resetting it each tick, the clock keeps an integer accumulator and
//! carries the remainder, so ticks land on whole samples but the average
//! tick length is exact and playback never drifts against the sample
//! clock. Tempo is quantised to hundredths of a BPM.

/// Rows per beat; a beat is four rows.
pub const ROWS_PER_BEAT: u64 = 4;

/// Integer tick accumulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickClock {
    /// Accumulator units per tick (`sample_rate * 60 * 100`)
    threshold: u64,
    /// Accumulator units per sample (`centi_bpm * 4 * ticks_per_row`)
    step: u64,
    /// Progress towards the next tick
    acc: u64,
}

impl TickClock {
    /// Create a clock for the given rate, tempo and tick resolution.
    pub fn new(sample_rate: u32, bpm: f32, ticks_per_row: u8) -> Self {
        let threshold = (sample_rate as u64 * 60 * 100).max(1);
        let centi_bpm = libm::roundf(bpm * 100.0).max(1.0) as u64;
        // At most one tick per sample.
        let step = centi_bpm
            .saturating_mul(ROWS_PER_BEAT)
            .saturating_mul(ticks_per_row.max(1) as u64)
            .min(threshold);
        Self { threshold, step, acc: 0 }
    }

    /// Advance by one sample. Returns true if a tick boundary was crossed.
    #[inline]
    pub fn advance(&mut self) -> bool {
        self.acc += self.step;
        if self.acc >= self.threshold {
            self.acc -= self.threshold;
            true
        } else {
            false
        }
    }

    /// Restart the current tick from zero.
    pub fn reset(&mut self) {
        self.acc = 0;
    }

    /// Real-valued tick length in samples.
    pub fn samples_per_tick(&self) -> f64 {
        self.threshold as f64 / self.step as f64
    }
}
