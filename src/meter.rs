//! Recording-session facade joining the conditioner and the renderer

use crate::conditioner::LevelConditioner;
use crate::config::{ConditionerConfig, WaveformConfig};
use crate::error::AppResult;
use crate::frame::{FrameHandle, FrameScheduler};
use crate::renderer::WaveformRenderer;
use crate::surface::Surface;

/// Inbound boundary used by the host shell and the audio source
///
/// The conditioner publishes the target level; the renderer reads it on
/// every frame. Nothing else is shared between them.
pub struct VoiceMeter<S: Surface> {
    conditioner: LevelConditioner,
    renderer: WaveformRenderer<S>,
}

impl<S: Surface> VoiceMeter<S> {
    pub fn new(surface: S) -> Self {
        Self::with_config(
            ConditionerConfig::default(),
            WaveformConfig::default(),
            surface,
        )
    }

    pub fn with_config(
        conditioner: ConditionerConfig,
        waveform: WaveformConfig,
        surface: S,
    ) -> Self {
        Self {
            conditioner: LevelConditioner::new(conditioner),
            renderer: WaveformRenderer::with_surface(waveform, surface),
        }
    }

    /// Begin a recording session; no-op while one is running
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) -> AppResult<()> {
        if self.renderer.is_animating() {
            return Ok(());
        }
        self.conditioner.reset();
        self.renderer.start(scheduler)?;
        log::info!("Recording session started");
        Ok(())
    }

    /// End the recording session; no-op when idle
    pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) {
        if !self.renderer.is_animating() {
            return;
        }
        self.renderer.stop(scheduler);
        log::info!(
            "Recording session stopped (last level {:.2})",
            self.conditioner.target_level()
        );
    }

    /// Feed one raw level from the audio source
    ///
    /// Returns whether the level was taken. Levels arriving outside a
    /// session are dropped.
    pub fn feed_level(&mut self, raw: f32) -> bool {
        if !self.renderer.is_animating() {
            return false;
        }
        self.conditioner.update(raw);
        true
    }

    /// Frame callback from the scheduler
    pub fn on_frame(&mut self, handle: FrameHandle, scheduler: &mut impl FrameScheduler) -> bool {
        let target = self.conditioner.target_level();
        self.renderer.on_frame(handle, target, scheduler)
    }

    pub fn resize(&mut self, width: f32, height: f32, pixel_ratio: f32) {
        self.renderer.resize(width, height, pixel_ratio);
    }

    pub fn is_recording(&self) -> bool {
        self.renderer.is_animating()
    }

    pub fn target_level(&self) -> f32 {
        self.conditioner.target_level()
    }

    pub fn conditioner(&self) -> &LevelConditioner {
        &self.conditioner
    }

    pub fn renderer(&self) -> &WaveformRenderer<S> {
        &self.renderer
    }

    pub fn surface(&self) -> Option<&S> {
        self.renderer.surface()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::testing::ManualScheduler;
    use crate::renderer::testing::RecordingSurface;

    #[test]
    fn test_levels_ignored_while_idle() {
        let mut meter = VoiceMeter::new(RecordingSurface::new(100, 48));
        assert!(!meter.feed_level(0.9));
        assert_eq!(meter.target_level(), 0.0);
        assert_eq!(meter.conditioner().peak_history_len(), 0);
    }

    #[test]
    fn test_session_drives_renderer_from_target_level() {
        let mut meter = VoiceMeter::new(RecordingSurface::new(100, 48));
        let mut scheduler = ManualScheduler::default();
        meter.start(&mut scheduler).unwrap();

        for raw in [0.8, 0.8, 0.8] {
            assert!(meter.feed_level(raw));
        }
        assert!(meter.target_level() > 1.0);

        let handle = scheduler.fire().unwrap();
        assert!(meter.on_frame(handle, &mut scheduler));
        let expected = meter.target_level() * 0.1;
        assert!((meter.renderer().state().current_level - expected).abs() < 1e-6);
    }

    #[test]
    fn test_restart_begins_a_fresh_session() {
        let mut meter = VoiceMeter::new(RecordingSurface::new(100, 48));
        let mut scheduler = ManualScheduler::default();

        meter.start(&mut scheduler).unwrap();
        meter.feed_level(0.5);
        meter.stop(&mut scheduler);
        assert!(meter.target_level() > 0.0);

        meter.start(&mut scheduler).unwrap();
        assert_eq!(meter.target_level(), 0.0);
        assert_eq!(meter.conditioner().peak_history_len(), 0);
    }

    #[test]
    fn test_double_start_keeps_session_state() {
        let mut meter = VoiceMeter::new(RecordingSurface::new(100, 48));
        let mut scheduler = ManualScheduler::default();

        meter.start(&mut scheduler).unwrap();
        meter.feed_level(0.5);
        let level = meter.target_level();
        meter.start(&mut scheduler).unwrap();

        assert_eq!(meter.target_level(), level);
        assert_eq!(scheduler.requests, 1);
    }

    #[test]
    fn test_no_drawing_after_stop() {
        let mut meter = VoiceMeter::new(RecordingSurface::new(100, 48));
        let mut scheduler = ManualScheduler::default();
        meter.start(&mut scheduler).unwrap();
        let in_flight = scheduler.pending.unwrap();

        meter.stop(&mut scheduler);
        meter.stop(&mut scheduler);
        let recorded = meter.surface().unwrap().calls.len();

        assert!(!meter.on_frame(in_flight, &mut scheduler));
        assert_eq!(meter.surface().unwrap().calls.len(), recorded);
        assert!(!meter.is_recording());
    }
}
