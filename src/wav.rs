//! WAV files as flat interleaved tables.

use std::path::Path;

use crate::{error::GenResult, signal::Real};

/// Read a WAV file into `(channels, interleaved samples)`. Integer PCM is
/// scaled into `[-1, 1]`.
pub fn read_table(path: &Path) -> GenResult<(usize, Vec<Real>)> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let table = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| v as Real))
            .collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as Real;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as Real / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };
    tracing::debug!(
        path = %path.display(),
        channels = spec.channels,
        samples = table.len(),
        "table loaded"
    );
    Ok((spec.channels as usize, table))
}

/// Write an interleaved table as a 32 bit float WAV file.
pub fn write_table(path: &Path, channels: u16, sampling_rate: u32, table: &[Real]) -> GenResult<()> {
    let spec = hound::WavSpec {
        channels,
        sample_rate: sampling_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for v in table {
        writer.write_sample(*v as f32)?;
    }
    writer.finalize()?;
    tracing::debug!(path = %path.display(), channels, samples = table.len(), "table written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let path = std::env::temp_dir().join("arachne_wav_round_trip.wav");
        let table = vec![0.5, -0.5, 0.25, -0.25];
        write_table(&path, 2, 44100, &table).unwrap();
        let (channels, read) = read_table(&path).unwrap();
        assert_eq!(channels, 2);
        assert_eq!(read, table);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file() {
        assert!(read_table(Path::new("/no/such/table.wav")).is_err());
    }
}
