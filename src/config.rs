//! Configuration parsing and validation

use crate::constants;
use crate::error::{AppError, AppResult};
use crate::surface::{LinearGradient, Paint, Rgba, StrokeStyle};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command line arguments for the voicewave application
#[derive(Parser)]
#[command(name = "voicewave")]
#[command(about = "Live waveform overlay for microphone input")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Visualize live microphone input (Space toggles recording)
    Monitor(MonitorArgs),
    /// Visualize a synthetic speech-like signal, no microphone needed
    Demo(DemoArgs),
    /// List available audio input devices
    List(ListArgs),
}

#[derive(Parser)]
pub struct MonitorArgs {
    /// Audio input device name (optional, uses default if not specified)
    #[arg(long)]
    pub device: Option<String>,

    /// Input channel index used for level measurement
    #[arg(long, default_value_t = 0)]
    pub channel: usize,

    /// Animation frame rate
    #[arg(long, default_value_t = constants::ui::DEFAULT_FPS)]
    pub fps: u32,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Parser)]
pub struct DemoArgs {
    /// Animation frame rate
    #[arg(long, default_value_t = constants::ui::DEFAULT_FPS)]
    pub fps: u32,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ListArgs {}

/// Where raw levels come from
#[derive(Debug, Clone, PartialEq)]
pub enum LevelSource {
    /// A cpal input device, `None` for the default one
    Microphone { device_name: Option<String> },
    /// The built-in synthetic signal
    Synthetic,
}

/// Application configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct Config {
    pub source: LevelSource,
    pub channel: usize,
    pub fps: u32,
}

impl Config {
    /// Create configuration from monitor arguments
    pub fn from_monitor_args(args: &MonitorArgs) -> AppResult<Self> {
        validate_fps(args.fps)?;
        Ok(Config {
            source: LevelSource::Microphone {
                device_name: args.device.clone(),
            },
            channel: args.channel,
            fps: args.fps,
        })
    }

    /// Create configuration from demo arguments
    pub fn from_demo_args(args: &DemoArgs) -> AppResult<Self> {
        validate_fps(args.fps)?;
        Ok(Config {
            source: LevelSource::Synthetic,
            channel: 0,
            fps: args.fps,
        })
    }

    /// Whether recording begins without user input
    pub fn autostart(&self) -> bool {
        self.source == LevelSource::Synthetic
    }
}

fn validate_fps(fps: u32) -> AppResult<()> {
    if fps == 0 || fps > constants::ui::MAX_FPS {
        return Err(AppError::Config(format!(
            "Frame rate must be between 1 and {}, got {}",
            constants::ui::MAX_FPS,
            fps
        )));
    }
    Ok(())
}

/// Tuning of the level conditioner
///
/// All fields are fixed for a session; defaults come from
/// [`constants::conditioner`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionerConfig {
    /// Envelope coefficient used when the input rises above the envelope
    pub attack_coef: f32,
    /// Envelope coefficient used when the input falls below the envelope
    pub release_coef: f32,
    /// Capacity of the recent-envelope history
    pub max_peaks_history: usize,
    /// Fraction of the history, from the top, skipped to find the recent peak
    pub peak_percentile: f32,
    /// Per-update multiplier of the adaptive ceiling
    pub decay_rate: f32,
    /// Floor applied to the adaptive ceiling when it is used
    pub min_max_volume: f32,
    /// Adaptive ceiling at session start
    pub initial_max_volume: f32,
    /// Exponent of the low half of the display curve (< 1 expands quiet detail)
    pub gamma: f32,
    /// Slope of the high half of the display curve (< 1 compresses loud input)
    pub upper_slope: f32,
    /// Gain after the display curve
    pub boost_factor: f32,
    /// Lowest published level, keeps motion visible near silence
    pub min_display: f32,
    /// Highest published level
    pub max_target_level: f32,
}

impl Default for ConditionerConfig {
    fn default() -> Self {
        use crate::constants::conditioner::*;
        Self {
            attack_coef: ATTACK_COEF,
            release_coef: RELEASE_COEF,
            max_peaks_history: MAX_PEAKS_HISTORY,
            peak_percentile: PEAK_PERCENTILE,
            decay_rate: DECAY_RATE,
            min_max_volume: MIN_MAX_VOLUME,
            initial_max_volume: INITIAL_MAX_VOLUME,
            gamma: GAMMA,
            upper_slope: UPPER_SLOPE,
            boost_factor: BOOST_FACTOR,
            min_display: MIN_DISPLAY,
            max_target_level: MAX_TARGET_LEVEL,
        }
    }
}

/// Tuning and styling of the waveform animation
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformConfig {
    /// Per-frame smoothing toward the target level
    pub level_smoothing: f32,
    /// Phase advance per frame; frame-rate dependent on purpose
    pub phase_speed: f32,
    /// Minimum animated level
    pub display_floor: f32,
    /// Peak displacement from the centre line at a level of 1.0
    pub amplitude_base: f32,
    pub primary_step: f32,
    pub ghost_step: f32,
    pub ghost_amplitude_ratio: f32,
    pub primary_style: StrokeStyle,
    pub ghost_style: StrokeStyle,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        use crate::constants::waveform::*;
        Self {
            level_smoothing: LEVEL_SMOOTHING,
            phase_speed: PHASE_SPEED,
            display_floor: DISPLAY_FLOOR,
            amplitude_base: AMPLITUDE_BASE,
            primary_step: PRIMARY_STEP,
            ghost_step: GHOST_STEP,
            ghost_amplitude_ratio: GHOST_AMPLITUDE_RATIO,
            primary_style: StrokeStyle {
                paint: Paint::Linear(LinearGradient {
                    x0: 0.0,
                    x1: GRADIENT_SPAN,
                    stops: vec![
                        (0.0, Rgba::rgb(0x4f, 0xac, 0xfe)),
                        (0.5, Rgba::rgb(0x00, 0xf2, 0xfe)),
                        (1.0, Rgba::rgb(0xff, 0x47, 0x57)),
                    ],
                }),
                line_width: PRIMARY_LINE_WIDTH,
            },
            ghost_style: StrokeStyle {
                paint: Paint::Solid(Rgba::rgba(255, 255, 255, GHOST_ALPHA)),
                line_width: GHOST_LINE_WIDTH,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_args_parse() {
        let args = Args::try_parse_from([
            "voicewave",
            "monitor",
            "--device",
            "USB Mic",
            "--channel",
            "1",
            "--fps",
            "30",
        ])
        .unwrap();

        let Commands::Monitor(monitor) = args.command else {
            panic!("expected monitor subcommand");
        };
        let config = Config::from_monitor_args(&monitor).unwrap();
        assert_eq!(
            config.source,
            LevelSource::Microphone {
                device_name: Some("USB Mic".to_string())
            }
        );
        assert_eq!(config.channel, 1);
        assert_eq!(config.fps, 30);
        assert!(!config.autostart());
    }

    #[test]
    fn test_demo_defaults() {
        let args = Args::try_parse_from(["voicewave", "demo"]).unwrap();
        let Commands::Demo(demo) = args.command else {
            panic!("expected demo subcommand");
        };
        let config = Config::from_demo_args(&demo).unwrap();
        assert_eq!(config.fps, constants::ui::DEFAULT_FPS);
        assert!(config.autostart());
        assert!(demo.log_file.is_none());
    }

    #[test]
    fn test_fps_validation() {
        let args = DemoArgs {
            fps: 0,
            log_file: None,
        };
        assert!(matches!(
            Config::from_demo_args(&args),
            Err(AppError::Config(_))
        ));

        let args = DemoArgs {
            fps: 1000,
            log_file: None,
        };
        assert!(Config::from_demo_args(&args).is_err());
    }

    #[test]
    fn test_conditioner_defaults() {
        let config = ConditionerConfig::default();
        assert_eq!(config.attack_coef, 0.3);
        assert_eq!(config.release_coef, 0.05);
        assert_eq!(config.max_peaks_history, 30);
        assert_eq!(config.decay_rate, 0.992);
        assert_eq!(config.min_max_volume, 0.03);
        assert_eq!(config.gamma, 0.6);
        assert_eq!(config.boost_factor, 1.4);
        assert_eq!(config.min_display, 0.15);
    }

    #[test]
    fn test_waveform_defaults() {
        let config = WaveformConfig::default();
        assert_eq!(config.level_smoothing, 0.1);
        assert_eq!(config.phase_speed, 0.15);
        assert!(config.ghost_style.line_width < config.primary_style.line_width);
        assert!(matches!(config.primary_style.paint, Paint::Linear(_)));
    }
}
