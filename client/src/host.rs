/*!
The host application the client runs inside.

A host is a single-threaded, frame-driven program (a media patcher, a game
loop, a DAW script). The client only needs two things from it: named playback
objects it can point at a file and reload, and named in-memory audio buffers
it can export before a request.
*/

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

/// A host-native object that plays an audio file.
pub trait PlaybackObject {
    /// Point the object at a new file.
    fn set_file(&mut self, path: &str);

    /// Re-read the file that is currently set.
    fn reload(&mut self);
}

/// Access to host state from the main thread.
pub trait Host {
    fn playback(&mut self, name: &str) -> Option<&mut dyn PlaybackObject>;

    /// Snapshot of a live audio buffer, if the host has one by that name.
    fn audio_buffer(&self, name: &str) -> Option<AudioBuffer>;
}

/// Planar audio copied out of the host.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub sample_rate: u32,
    pub channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    pub fn num_frames(&self) -> usize {
        self.channels.iter().map(Vec::len).min().unwrap_or(0)
    }

    /// Write the buffer as 32-bit float WAV. Channels are truncated to the
    /// shortest one.
    pub fn write_wav(&self, path: &Path) -> Result<(), hound::Error> {
        let spec = WavSpec {
            channels: self.channels.len().max(1) as u16,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(path, spec)?;
        for frame in 0..self.num_frames() {
            for channel in &self.channels {
                writer.write_sample(channel[frame])?;
            }
        }
        writer.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_wav_interleaves_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buffer.wav");
        let buffer = AudioBuffer {
            sample_rate: 48_000,
            channels: vec![vec![0.1, 0.2, 0.3], vec![-0.1, -0.2, -0.3]],
        };
        buffer.write_wav(&path).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 48_000);
        let samples: Vec<f32> = reader.samples::<f32>().map(Result::unwrap).collect();
        assert_eq!(samples, vec![0.1, -0.1, 0.2, -0.2, 0.3, -0.3]);
    }
}
