//! 16-bit WAV export of the generated signals.

use std::path::Path;

use anyhow::{Context, Result};
use rq_core::{TriangularDither, convert};

/// Write a mono ±1 float signal as 16-bit PCM, dithering the
/// quantization.
///
/// # Errors
/// Fails when the file cannot be created or written.
pub fn export_wav(path: &Path, samples: &[f64], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut dither = TriangularDither::new();
    for &sample in samples {
        let quantized: i16 = convert(sample as f32, &mut dither);
        writer.write_sample(quantized)?;
    }
    writer
        .finalize()
        .with_context(|| format!("finalizing {}", path.display()))?;
    Ok(())
}
