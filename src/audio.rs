//! Audio device handling and level extraction

use crate::constants;
use crate::error::{AppError, AppResult};
use crate::smoothing::ChunkedLevel;
use cpal::traits::{DeviceTrait, HostTrait};
use tokio::sync::mpsc::UnboundedSender;

/// Audio configuration and device information
pub struct AudioConfig {
    pub device_name: String,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Names of all available input devices
pub fn list_input_devices() -> AppResult<Vec<String>> {
    let host = cpal::default_host();
    let devices = host.input_devices()?;
    Ok(devices.filter_map(|d| d.name().ok()).collect())
}

/// Find and configure an audio input device
pub fn setup_audio_device(device_name: Option<String>) -> AppResult<(cpal::Device, AudioConfig)> {
    let host = cpal::default_host();

    let device = if let Some(name) = device_name {
        host.input_devices()?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
            .ok_or_else(|| AppError::AudioDevice(format!("Device '{}' not found", name)))?
    } else {
        host.default_input_device()
            .ok_or_else(|| AppError::AudioDevice("No default input device available".to_string()))?
    };

    let device_name = device.name()?;

    let mut supported_configs = device.supported_input_configs()?;
    let config_range = supported_configs
        .next()
        .ok_or_else(|| AppError::AudioDevice("No supported input configs found".to_string()))?;

    let preferred = constants::audio::PREFERRED_SAMPLE_RATE;
    let sample_rate = if config_range.min_sample_rate().0 <= preferred
        && config_range.max_sample_rate().0 >= preferred
    {
        preferred
    } else {
        config_range.min_sample_rate().0
    };

    let channels = config_range.channels();

    log::info!(
        "Using input device '{}' at {} Hz, {} channel(s)",
        device_name,
        sample_rate,
        channels
    );

    Ok((
        device,
        AudioConfig {
            device_name,
            sample_rate,
            channels,
        },
    ))
}

/// Build an audio input stream with the given callback
pub fn build_audio_stream<F>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    data_callback: F,
) -> AppResult<cpal::Stream>
where
    F: FnMut(&[f32], &cpal::InputCallbackInfo) + Send + 'static,
{
    let stream = device.build_input_stream(
        config,
        data_callback,
        |err| log::error!("Audio stream error: {}", err),
        None,
    )?;

    Ok(stream)
}

/// Audio callback that measures one channel and forwards levels to the event loop
///
/// Levels are RMS values over fixed-size chunks, clamped to [0, 1]. Sending
/// never blocks the audio thread.
pub fn create_level_callback(
    levels: UnboundedSender<f32>,
    channels: u16,
    channel: usize,
) -> impl FnMut(&[f32], &cpal::InputCallbackInfo) + Send + 'static {
    let stride = usize::from(channels.max(1));
    let channel = channel.min(stride - 1);
    let mut chunker = ChunkedLevel::new(constants::audio::CHUNK_SIZE);

    move |data: &[f32], _: &cpal::InputCallbackInfo| {
        push_channel(&mut chunker, data, stride, channel, |level| {
            // Receiver gone means the UI is shutting down
            let _ = levels.send(level);
        });
    }
}

/// Feed one channel of interleaved `data` into `chunker`
fn push_channel<F>(chunker: &mut ChunkedLevel, data: &[f32], stride: usize, channel: usize, emit: F)
where
    F: FnMut(f32),
{
    chunker.push(data.iter().skip(channel).step_by(stride).copied(), emit);
}

/// Deterministic speech-like level generator for demo mode
///
/// Syllable-rate bursts under a slower phrase envelope, separated by pauses.
pub struct SyntheticVoice {
    t: f32,
    step: f32,
}

impl SyntheticVoice {
    /// Generator emitting `rate` levels per second
    pub fn new(rate: f32) -> Self {
        Self {
            t: 0.0,
            step: 1.0 / rate.max(1.0),
        }
    }

    /// Levels per second produced by the capture path
    pub fn capture_rate() -> f32 {
        constants::audio::PREFERRED_SAMPLE_RATE as f32 / constants::audio::CHUNK_SIZE as f32
    }

    pub fn next_level(&mut self) -> f32 {
        let t = self.t;
        self.t += self.step;

        // 6 s cycle: 4.5 s of speech, 1.5 s of pause
        let cycle = t % 6.0;
        if cycle > 4.5 {
            return 0.004 * (1.0 + (t * 31.0).sin()) / 2.0;
        }

        let phrase = (std::f32::consts::PI * cycle / 4.5).sin();
        let syllable = ((t * 2.0 * std::f32::consts::PI * 4.0).sin() * 0.5 + 0.5).powi(2);
        let jitter = 0.85 + 0.15 * (t * 13.7).sin() * (t * 5.3).cos();
        (0.25 * phrase * syllable * jitter + 0.003).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_channel_reads_selected_channel() {
        // Interleaved stereo: silence on the left, constant 0.5 on the right
        let data: Vec<f32> = (0..4096)
            .map(|i| if i % 2 == 1 { 0.5 } else { 0.0 })
            .collect();

        let mut chunker = ChunkedLevel::new(constants::audio::CHUNK_SIZE);
        let mut right = Vec::new();
        push_channel(&mut chunker, &data, 2, 1, |l| right.push(l));
        assert_eq!(right.len(), 2);
        assert!(right.iter().all(|l| (l - 0.5).abs() < 1e-6));

        let mut chunker = ChunkedLevel::new(constants::audio::CHUNK_SIZE);
        let mut left = Vec::new();
        push_channel(&mut chunker, &data, 2, 0, |l| left.push(l));
        assert_eq!(left, vec![0.0, 0.0]);
    }

    #[test]
    fn test_synthetic_voice_is_bounded_and_has_pauses() {
        let rate = SyntheticVoice::capture_rate();
        let mut voice = SyntheticVoice::new(rate);
        let levels: Vec<f32> = (0..(rate * 12.0) as usize).map(|_| voice.next_level()).collect();

        assert!(levels.iter().all(|l| (0.0..=1.0).contains(l)));
        assert!(levels.iter().any(|&l| l > 0.1));
        let quiet = levels.iter().filter(|&&l| l < 0.01).count();
        assert!(quiet > levels.len() / 10);
    }

    #[test]
    fn test_synthetic_voice_is_deterministic() {
        let mut a = SyntheticVoice::new(43.0);
        let mut b = SyntheticVoice::new(43.0);
        for _ in 0..100 {
            assert_eq!(a.next_level(), b.next_level());
        }
    }
}
