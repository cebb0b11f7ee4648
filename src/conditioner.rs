//! Adaptive gain control that turns raw input levels into a bounded visual level
//!
//! Each raw sample goes through an attack/release envelope, a short history
//! of envelope values yields a spike-robust recent peak, and a slowly
//! decaying ceiling normalizes the envelope. The normalized value is shaped
//! by a two-segment display curve, boosted, floored and capped.

use crate::config::ConditionerConfig;
use crate::smoothing::EnvelopeFollower;
use std::collections::VecDeque;

/// Mutable state owned by one [`LevelConditioner`]
#[derive(Debug, Clone)]
pub struct ConditionerState {
    envelope: EnvelopeFollower,
    peak_history: VecDeque<f32>,
    /// Raw decayed ceiling; may sit below the configured floor
    max_volume: f32,
    target_level: f32,
}

impl ConditionerState {
    fn new(config: &ConditionerConfig) -> Self {
        Self {
            envelope: EnvelopeFollower::new(config.attack_coef, config.release_coef),
            peak_history: VecDeque::with_capacity(config.max_peaks_history + 1),
            max_volume: config.initial_max_volume,
            target_level: 0.0,
        }
    }
}

/// Maps a raw level stream to the target level driving the waveform
pub struct LevelConditioner {
    config: ConditionerConfig,
    state: ConditionerState,
    /// Reused for sorting so updates do not allocate
    scratch: Vec<f32>,
}

impl Default for LevelConditioner {
    fn default() -> Self {
        Self::new(ConditionerConfig::default())
    }
}

impl LevelConditioner {
    pub fn new(config: ConditionerConfig) -> Self {
        let state = ConditionerState::new(&config);
        let scratch = Vec::with_capacity(config.max_peaks_history + 1);
        Self {
            config,
            state,
            scratch,
        }
    }

    /// Feed one raw level and return the new target level
    ///
    /// Negative and non-finite samples count as silence.
    pub fn update(&mut self, raw: f32) -> f32 {
        let raw = if raw.is_finite() && raw > 0.0 {
            raw
        } else {
            if raw != 0.0 {
                log::trace!("Clamping out-of-range level {} to 0", raw);
            }
            0.0
        };

        let smoothed = self.state.envelope.update(raw);

        let history = &mut self.state.peak_history;
        history.push_back(smoothed);
        while history.len() > self.config.max_peaks_history {
            history.pop_front();
        }

        let recent_max = self.recent_peak().unwrap_or(smoothed);

        self.state.max_volume *= self.config.decay_rate;
        let candidate = recent_max.max(smoothed);
        if candidate > self.state.max_volume {
            self.state.max_volume = candidate;
        }

        let normalized = (smoothed / self.effective_max_volume()).min(1.0);
        let visual = (self.display_curve(normalized) * self.config.boost_factor)
            .max(self.config.min_display);

        self.state.target_level = visual.min(self.config.max_target_level);
        self.state.target_level
    }

    /// High-percentile envelope value over the history
    ///
    /// Index `floor(len * percentile)` of the history sorted descending, so
    /// short histories yield one of their top few values.
    fn recent_peak(&mut self) -> Option<f32> {
        self.scratch.clear();
        self.scratch.extend(self.state.peak_history.iter().copied());
        self.scratch.sort_unstable_by(|a, b| b.total_cmp(a));
        let index = (self.scratch.len() as f32 * self.config.peak_percentile).floor() as usize;
        self.scratch.get(index).copied()
    }

    /// Two-segment curve: power law below 0.5, linear compression above
    fn display_curve(&self, normalized: f32) -> f32 {
        if normalized < 0.5 {
            (normalized * 2.0).powf(self.config.gamma) * 0.5
        } else {
            0.5 + (normalized - 0.5) * self.config.upper_slope
        }
    }

    /// Latest published level; 0 before the first update
    pub fn target_level(&self) -> f32 {
        self.state.target_level
    }

    /// Current envelope value
    pub fn smoothed_level(&self) -> f32 {
        self.state.envelope.value()
    }

    /// Adaptive ceiling with its floor applied
    pub fn effective_max_volume(&self) -> f32 {
        self.state.max_volume.max(self.config.min_max_volume)
    }

    pub fn peak_history_len(&self) -> usize {
        self.state.peak_history.len()
    }

    /// Restore the start-of-session state
    pub fn reset(&mut self) {
        self.state = ConditionerState::new(&self.config);
    }
}
