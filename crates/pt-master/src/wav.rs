//! WAV encoding for 16-bit stereo PCM.

use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

use crate::ControllerError;

/// WAV header for 16-bit stereo at `sample_rate`.
pub fn wav_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Convert a float sample to 16-bit, clipping outside [-1, 1].
#[inline]
pub fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Encode planar stereo into any seekable writer.
///
/// Renders `min(left.len(), right.len())` frames.
pub fn write_wav<W: Write + Seek>(
    writer: W,
    left: &[f32],
    right: &[f32],
    sample_rate: u32,
) -> Result<(), hound::Error> {
    let mut wav = hound::WavWriter::new(writer, wav_spec(sample_rate))?;
    for (&l, &r) in left.iter().zip(right) {
        wav.write_sample(to_i16(l))?;
        wav.write_sample(to_i16(r))?;
    }
    wav.finalize()
}

/// Encode planar stereo into an in-memory WAV file.
pub fn wav_bytes(left: &[f32], right: &[f32], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let mut cursor = Cursor::new(Vec::new());
    write_wav(&mut cursor, left, right, sample_rate)?;
    Ok(cursor.into_inner())
}

/// Encode planar stereo to a file.
pub fn write_wav_file(
    path: &Path,
    left: &[f32],
    right: &[f32],
    sample_rate: u32,
) -> Result<(), ControllerError> {
    let file = BufWriter::new(File::create(path)?);
    write_wav(file, left, right, sample_rate)?;
    Ok(())
}
