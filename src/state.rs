//! Application state management

use crate::smoothing::amplitude_to_db;

/// What the status panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Recording,
}

/// Internal application state read by the UI
pub struct AppState {
    pub source_name: String,
    pub session: SessionStatus,
    /// Most recent raw level from the source
    pub raw_level: f32,
    /// Conditioned level currently driving the waveform
    pub target_level: f32,
    pub levels_received: u64,
}

impl AppState {
    /// Create a new application state with default values
    pub fn new(source_name: String) -> Self {
        Self {
            source_name,
            session: SessionStatus::Idle,
            raw_level: 0.0,
            target_level: 0.0,
            levels_received: 0,
        }
    }

    /// Record a raw level as it arrives
    pub fn record_level(&mut self, raw: f32) {
        self.raw_level = raw;
        self.levels_received += 1;
    }

    /// Switch session status; a new session restarts the level count
    pub fn set_recording(&mut self, recording: bool) {
        if recording {
            self.session = SessionStatus::Recording;
            self.levels_received = 0;
        } else {
            self.session = SessionStatus::Idle;
            self.raw_level = 0.0;
            self.target_level = 0.0;
        }
    }

    pub fn is_recording(&self) -> bool {
        self.session == SessionStatus::Recording
    }

    /// Raw level in dBFS for display
    pub fn raw_db(&self) -> f32 {
        amplitude_to_db(self.raw_level)
    }

    /// Status line for the current session
    pub fn status(&self) -> String {
        match self.session {
            SessionStatus::Idle => format!(
                "Idle on {}. Press Space to record, Esc or q to quit.",
                self.source_name
            ),
            SessionStatus::Recording => format!(
                "Recording from {} ({} levels)... Press Space to stop, Esc or q to quit.",
                self.source_name, self.levels_received
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = AppState::new("Built-in Mic".to_string());
        assert!(!state.is_recording());
        assert!(state.status().contains("Built-in Mic"));
        assert!(state.status().starts_with("Idle"));
        assert_eq!(state.raw_db(), -60.0);
    }

    #[test]
    fn test_recording_toggle_clears_levels_on_stop() {
        let mut state = AppState::new("mic".to_string());
        state.set_recording(true);
        state.record_level(0.1);
        state.target_level = 0.9;
        assert!(state.is_recording());
        assert!((state.raw_db() + 20.0).abs() < 0.01);

        state.set_recording(false);
        assert_eq!(state.raw_level, 0.0);
        assert_eq!(state.target_level, 0.0);
        assert_eq!(state.levels_received, 1);
    }

    #[test]
    fn test_recording_status_counts_levels() {
        let mut state = AppState::new("mic".to_string());
        state.set_recording(true);
        for _ in 0..3 {
            state.record_level(0.2);
        }
        assert!(state.status().contains("(3 levels)"));

        // Counter restarts with the next session
        state.set_recording(false);
        state.set_recording(true);
        assert!(state.status().contains("(0 levels)"));
    }
}
