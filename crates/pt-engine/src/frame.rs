//! Audio frame type.

/// A stereo audio frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

impl StereoFrame {
    /// Create a silent frame.
    pub const fn silence() -> Self {
        Self { left: 0.0, right: 0.0 }
    }

    /// Create a frame from a left/right pair.
    pub const fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Mix another frame into this one. No clamping.
    #[inline]
    pub fn mix(&mut self, other: StereoFrame) {
        self.left += other.left;
        self.right += other.right;
    }

    /// Scale both channels by `gain`.
    #[inline]
    pub fn scaled(self, gain: f32) -> Self {
        Self {
            left: self.left * gain,
            right: self.right * gain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_is_unclamped_sum() {
        let mut a = StereoFrame::new(0.75, -0.5);
        a.mix(StereoFrame::new(0.5, -0.75));
        assert_eq!(a, StereoFrame::new(1.25, -1.25));
    }

    #[test]
    fn scaled_applies_gain() {
        assert_eq!(StereoFrame::new(1.0, -0.5).scaled(0.5), StereoFrame::new(0.5, -0.25));
    }
}
