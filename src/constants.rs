//! Application constants and configuration values

/// Level conditioning constants
pub mod conditioner {
    /// Envelope attack coefficient (higher = faster reaction to onsets)
    pub const ATTACK_COEF: f32 = 0.3;
    /// Envelope release coefficient (lower = slower decay)
    pub const RELEASE_COEF: f32 = 0.05;
    /// Number of recent envelope values kept for peak estimation
    pub const MAX_PEAKS_HISTORY: usize = 30;
    /// Fraction of the sorted history skipped when picking the recent peak
    pub const PEAK_PERCENTILE: f32 = 0.1;
    /// Per-update decay applied to the adaptive ceiling
    pub const DECAY_RATE: f32 = 0.992;
    /// Noise floor for the adaptive ceiling
    pub const MIN_MAX_VOLUME: f32 = 0.03;
    /// Adaptive ceiling at the start of a session
    pub const INITIAL_MAX_VOLUME: f32 = 0.05;
    /// Exponent of the lower half of the display curve
    pub const GAMMA: f32 = 0.6;
    /// Slope of the upper half of the display curve
    pub const UPPER_SLOPE: f32 = 0.8;
    /// Gain applied after the display curve
    pub const BOOST_FACTOR: f32 = 1.4;
    /// Minimum visual activity while recording
    pub const MIN_DISPLAY: f32 = 0.15;
    /// Hard cap on the published target level
    pub const MAX_TARGET_LEVEL: f32 = 1.5;
}

/// Waveform animation constants
pub mod waveform {
    /// Per-frame smoothing toward the target level
    pub const LEVEL_SMOOTHING: f32 = 0.1;
    /// Phase advance per frame
    pub const PHASE_SPEED: f32 = 0.15;
    /// Visual floor of the animated level
    pub const DISPLAY_FLOOR: f32 = 0.1;
    /// Peak amplitude in logical units at a level of 1.0
    pub const AMPLITUDE_BASE: f32 = 8.0;
    /// Horizontal sampling step of the primary wave
    pub const PRIMARY_STEP: f32 = 2.0;
    /// Horizontal sampling step of the ghost wave
    pub const GHOST_STEP: f32 = 4.0;
    /// Ghost wave amplitude relative to the primary
    pub const GHOST_AMPLITUDE_RATIO: f32 = 0.6;
    /// Logical width spanned by the primary gradient
    pub const GRADIENT_SPAN: f32 = 100.0;
    pub const PRIMARY_LINE_WIDTH: f32 = 2.5;
    pub const GHOST_LINE_WIDTH: f32 = 1.5;
    /// Opacity of the ghost wave
    pub const GHOST_ALPHA: f32 = 0.15;
}

/// Audio processing constants
pub mod audio {
    /// Samples per level measurement
    pub const CHUNK_SIZE: usize = 1024;
    /// Preferred capture rate
    pub const PREFERRED_SAMPLE_RATE: u32 = 44100;
    /// Buffer size for audio streams
    pub const BUFFER_SIZE: cpal::BufferSize = cpal::BufferSize::Default;
}

/// UI display constants
pub mod ui {
    /// Default frame rate of the terminal host
    pub const DEFAULT_FPS: u32 = 60;
    /// Keyboard polling interval in milliseconds
    pub const INPUT_POLL_MS: u64 = 10;
    /// Highest accepted frame rate
    pub const MAX_FPS: u32 = 240;
    /// Braille dots per logical unit on either axis
    pub const PIXEL_RATIO: f32 = 2.0;
    /// Rows reserved for the waveform block, borders included
    pub const WAVEFORM_ROWS: u16 = 14;
    /// Bar width calculation accounts for borders
    pub const BAR_BORDER_WIDTH: usize = 2;
}
