//! Decoded sample data.

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::error::ProjectError;

/// Immutable decoded audio backing an instrument.
///
/// Channel data is reference counted, so cloning a buffer (or a whole
/// project snapshot) never copies audio. Mono sources share a single
/// allocation between both channels.
#[derive(Clone)]
pub struct SampleBuffer {
    left: Arc<[f32]>,
    right: Arc<[f32]>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Create a stereo buffer. Both channels must have the same length.
    pub fn stereo(left: Vec<f32>, right: Vec<f32>, sample_rate: u32) -> Result<Self, ProjectError> {
        if left.len() != right.len() {
            return Err(ProjectError::ChannelLengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        Ok(Self {
            left: Arc::from(left),
            right: Arc::from(right),
            sample_rate,
        })
    }

    /// Create a buffer from mono data, duplicated into both channels.
    pub fn mono(data: Vec<f32>, sample_rate: u32) -> Self {
        let data: Arc<[f32]> = Arc::from(data);
        Self {
            left: data.clone(),
            right: data,
            sample_rate,
        }
    }

    /// Split interleaved data (`[L, R, L, R, ...]`) into a buffer.
    ///
    /// Channel 0 becomes left, channel 1 right; any further channels are
    /// ignored and mono input is duplicated.
    pub fn from_interleaved(data: &[f32], channels: u16, sample_rate: u32) -> Result<Self, ProjectError> {
        if channels == 0 {
            return Err(ProjectError::NoChannels);
        }
        let stride = channels as usize;
        if data.len() % stride != 0 {
            return Err(ProjectError::RaggedInterleave { len: data.len(), channels });
        }
        if stride == 1 {
            return Ok(Self::mono(data.to_vec(), sample_rate));
        }
        let left = data.chunks_exact(stride).map(|f| f[0]).collect();
        let right = data.chunks_exact(stride).map(|f| f[1]).collect();
        Self::stereo(left, right, sample_rate)
    }

    /// Left channel samples.
    #[inline]
    pub fn left(&self) -> &[f32] {
        &self.left
    }

    /// Right channel samples.
    #[inline]
    pub fn right(&self) -> &[f32] {
        &self.right
    }

    /// Length in frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Returns true if the buffer holds no frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Native sample rate in Hz.
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns true if both channels share one allocation.
    pub fn is_mono(&self) -> bool {
        Arc::ptr_eq(&self.left, &self.right)
    }

    /// Duration in seconds at the native rate.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.len() as f64 / self.sample_rate as f64
    }

    /// Read one frame. Missing data reads as `None`.
    #[inline]
    pub fn frame(&self, index: usize) -> Option<(f32, f32)> {
        Some((*self.left.get(index)?, *self.right.get(index)?))
    }
}

impl core::fmt::Debug for SampleBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SampleBuffer")
            .field("frames", &self.len())
            .field("sample_rate", &self.sample_rate)
            .field("mono", &self.is_mono())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn mono_duplicates_channel() {
        let buf = SampleBuffer::mono(vec![0.1, 0.2, 0.3], 44100);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.left(), buf.right());
        assert!(buf.is_mono());
    }

    #[test]
    fn stereo_rejects_unequal_channels() {
        let err = SampleBuffer::stereo(vec![0.0; 4], vec![0.0; 3], 48000).unwrap_err();
        assert_eq!(err, ProjectError::ChannelLengthMismatch { left: 4, right: 3 });
    }

    #[test]
    fn interleaved_stereo_splits_channels() {
        let buf = SampleBuffer::from_interleaved(&[0.0, 1.0, 0.5, 1.5], 2, 44100).unwrap();
        assert_eq!(buf.left(), &[0.0, 0.5]);
        assert_eq!(buf.right(), &[1.0, 1.5]);
        assert!(!buf.is_mono());
    }

    #[test]
    fn interleaved_ignores_extra_channels() {
        let buf = SampleBuffer::from_interleaved(&[0.1, 0.2, 9.0, 0.3, 0.4, 9.0], 3, 44100).unwrap();
        assert_eq!(buf.left(), &[0.1, 0.3]);
        assert_eq!(buf.right(), &[0.2, 0.4]);
    }

    #[test]
    fn interleaved_rejects_ragged_data() {
        assert!(matches!(
            SampleBuffer::from_interleaved(&[0.0; 5], 2, 44100),
            Err(ProjectError::RaggedInterleave { len: 5, channels: 2 })
        ));
        assert_eq!(
            SampleBuffer::from_interleaved(&[0.0; 4], 0, 44100).unwrap_err(),
            ProjectError::NoChannels
        );
    }

    #[test]
    fn frame_past_end_is_none() {
        let buf = SampleBuffer::mono(vec![0.25], 8000);
        assert_eq!(buf.frame(0), Some((0.25, 0.25)));
        assert_eq!(buf.frame(1), None);
        assert!((buf.duration_secs() - 1.0 / 8000.0).abs() < 1e-12);
    }
}
