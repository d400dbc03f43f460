//! Waveform container and WAV I/O.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::AudioError;

/// Planar multi-channel audio, samples in `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    channels: Vec<Vec<f32>>,
}

impl Waveform {
    /// Build from planar channels. All channels must have the same length.
    pub fn new(channels: Vec<Vec<f32>>) -> Result<Self, AudioError> {
        let expected = channels.first().ok_or(AudioError::NoChannels)?.len();
        if let Some((channel, ch)) = channels
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != expected)
        {
            return Err(AudioError::RaggedChannels {
                channel,
                expected,
                actual: ch.len(),
            });
        }
        Ok(Self { channels })
    }

    /// All-zero waveform of the given shape.
    pub fn silence(num_channels: usize, num_frames: usize) -> Self {
        Self {
            channels: vec![vec![0.0; num_frames]; num_channels.max(1)],
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Linear-interpolation resample. A no-op when the rates match.
    pub fn resample(&self, from_rate: u32, to_rate: u32) -> Self {
        if from_rate == to_rate || from_rate == 0 || self.num_frames() == 0 {
            return self.clone();
        }
        let in_frames = self.num_frames();
        let out_frames = ((in_frames as u64 * to_rate as u64) / from_rate as u64).max(1) as usize;
        let step = from_rate as f64 / to_rate as f64;

        let channels = self
            .channels
            .iter()
            .map(|input| {
                (0..out_frames)
                    .map(|i| {
                        let pos = i as f64 * step;
                        let idx = pos.floor() as usize;
                        let frac = (pos - idx as f64) as f32;
                        let a = input[idx.min(in_frames - 1)];
                        let b = input[(idx + 1).min(in_frames - 1)];
                        a + (b - a) * frac
                    })
                    .collect()
            })
            .collect();
        Self { channels }
    }

    /// Decode a WAV file. Returns the waveform and its sample rate.
    pub fn read_wav(path: &Path) -> Result<(Self, u32), AudioError> {
        let mut reader = WavReader::open(path)?;
        let spec = reader.spec();
        let num_channels = spec.channels as usize;
        if num_channels == 0 {
            return Err(AudioError::NoChannels);
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
            SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()?
            }
        };

        let mut channels = vec![Vec::with_capacity(interleaved.len() / num_channels); num_channels];
        for frame in interleaved.chunks_exact(num_channels) {
            for (ch, sample) in channels.iter_mut().zip(frame) {
                ch.push(*sample);
            }
        }
        Ok((Self { channels }, spec.sample_rate))
    }

    /// Encode as 32-bit float WAV.
    pub fn write_wav(&self, path: &Path, sample_rate: u32) -> Result<(), AudioError> {
        let spec = WavSpec {
            channels: self.num_channels() as u16,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(path, spec)?;
        for frame in 0..self.num_frames() {
            for ch in &self.channels {
                writer.write_sample(ch[frame])?;
            }
        }
        writer.finalize()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(frames: usize) -> Vec<f32> {
        (0..frames).map(|i| i as f32 / frames as f32).collect()
    }

    #[test]
    fn test_ragged_channels_rejected() {
        let err = Waveform::new(vec![vec![0.0; 4], vec![0.0; 3]]).unwrap_err();
        assert!(matches!(err, AudioError::RaggedChannels { channel: 1, expected: 4, actual: 3 }));
        assert!(matches!(Waveform::new(vec![]), Err(AudioError::NoChannels)));
    }

    #[test]
    fn test_resample_changes_length_by_ratio() {
        let wave = Waveform::new(vec![ramp(44_100), ramp(44_100)]).unwrap();
        let out = wave.resample(44_100, 16_000);
        assert_eq!(out.num_channels(), 2);
        assert_eq!(out.num_frames(), 16_000);
        // monotonic ramp stays monotonic
        let ch = out.channel(0).unwrap();
        assert!(ch.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_resample_same_rate_is_identity() {
        let wave = Waveform::new(vec![ramp(100)]).unwrap();
        assert_eq!(wave.resample(16_000, 16_000), wave);
    }

    #[test]
    fn test_wav_roundtrip_preserves_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let wave = Waveform::new(vec![ramp(480), vec![0.25; 480]]).unwrap();

        wave.write_wav(&path, 48_000).unwrap();
        let (decoded, rate) = Waveform::read_wav(&path).unwrap();

        assert_eq!(rate, 48_000);
        assert_eq!(decoded, wave);
    }

    #[test]
    fn test_reads_16_bit_pcm() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pcm.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(i16::MAX).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.write_sample(i16::MIN).unwrap();
        writer.finalize().unwrap();

        let (decoded, rate) = Waveform::read_wav(&path).unwrap();
        assert_eq!(rate, 8_000);
        let ch = decoded.channel(0).unwrap();
        assert!((ch[0] - 1.0).abs() < 1e-3);
        assert_eq!(ch[1], 0.0);
        assert_eq!(ch[2], -1.0);
    }
}
