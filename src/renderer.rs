//! Procedural waveform animation driven by the target level
//!
//! The renderer draws two strokes per frame: an amplitude-modulated primary
//! wave and a fainter ghost wave. It is decorative motion keyed to loudness,
//! not a picture of the captured signal.

use crate::config::WaveformConfig;
use crate::error::{AppError, AppResult};
use crate::frame::{FrameHandle, FrameScheduler};
use crate::smoothing::ease_toward;
use crate::surface::{Point, Surface};

/// Per-session animation state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderState {
    /// Target level smoothed across frames
    pub current_level: f32,
    /// Grows without bound; only ever used inside periodic functions
    pub phase: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Idle,
    Animating { pending: Option<FrameHandle> },
}

/// Draws the waveform to a [`Surface`] once per scheduled frame
pub struct WaveformRenderer<S: Surface> {
    config: WaveformConfig,
    surface: Option<S>,
    pixel_ratio: f32,
    state: RenderState,
    mode: Mode,
    primary: Vec<Point>,
    ghost: Vec<Point>,
}

impl<S: Surface> WaveformRenderer<S> {
    /// Create an idle renderer without a surface
    pub fn new(config: WaveformConfig) -> Self {
        Self {
            config,
            surface: None,
            pixel_ratio: 1.0,
            state: RenderState::default(),
            mode: Mode::Idle,
            primary: Vec::new(),
            ghost: Vec::new(),
        }
    }

    /// Create an idle renderer drawing to `surface`
    pub fn with_surface(config: WaveformConfig, surface: S) -> Self {
        let mut renderer = Self::new(config);
        renderer.attach(surface);
        renderer
    }

    /// Attach a surface, replacing any previous one
    pub fn attach(&mut self, surface: S) -> Option<S> {
        self.surface.replace(surface)
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.mode, Mode::Animating { .. })
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Begin animating from a clean baseline
    ///
    /// Does nothing when already animating. Fails when no surface is attached.
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) -> AppResult<()> {
        if self.is_animating() {
            return Ok(());
        }
        if self.surface.is_none() {
            return Err(AppError::SurfaceUnavailable);
        }

        self.state = RenderState::default();
        self.mode = Mode::Animating {
            pending: Some(scheduler.request_frame()),
        };
        Ok(())
    }

    /// Stop animating, cancel the pending frame and wipe the surface
    pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) {
        let Mode::Animating { pending } = self.mode else {
            return;
        };
        if let Some(handle) = pending {
            scheduler.cancel_frame(handle);
        }
        self.mode = Mode::Idle;

        // Whole backing store, not just the logical area: the scale may have
        // changed since the last frame.
        if let Some(surface) = self.surface.as_mut() {
            surface.clear_all();
        }
    }

    /// Frame callback; returns whether anything was drawn
    ///
    /// Frames delivered after `stop`, or for a handle other than the pending
    /// one, are ignored.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        target_level: f32,
        scheduler: &mut impl FrameScheduler,
    ) -> bool {
        match self.mode {
            Mode::Animating { pending: Some(p) } if p == handle => {}
            _ => return false,
        }

        self.draw_frame(target_level);
        self.mode = Mode::Animating {
            pending: Some(scheduler.request_frame()),
        };
        true
    }

    /// Adapt the backing store to a new logical size and pixel density
    pub fn resize(&mut self, width: f32, height: f32, pixel_ratio: f32) {
        let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        self.pixel_ratio = ratio;

        if let Some(surface) = self.surface.as_mut() {
            let backing_w = (width.max(0.0) * ratio).round() as u32;
            let backing_h = (height.max(0.0) * ratio).round() as u32;
            surface.resize(backing_w, backing_h);
            surface.scale(ratio);
            log::debug!(
                "Surface resized to {}x{} logical ({}x{} backing, ratio {})",
                width,
                height,
                backing_w,
                backing_h,
                ratio
            );
        }
    }

    fn draw_frame(&mut self, target_level: f32) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        // Read once so a resize mid-frame cannot mix sizes
        let (backing_w, backing_h) = surface.backing_size();
        let width = backing_w as f32 / self.pixel_ratio;
        let height = backing_h as f32 / self.pixel_ratio;
        let center_y = height / 2.0;

        surface.clear_rect(0.0, 0.0, width, height);

        let cfg = &self.config;
        self.state.phase += cfg.phase_speed;
        self.state.current_level =
            ease_toward(self.state.current_level, target_level, cfg.level_smoothing);
        let volume = self.state.current_level.max(cfg.display_floor);
        let phase = self.state.phase;

        self.primary.clear();
        let amplitude = cfg.amplitude_base * volume;
        for x in sample_positions(width, cfg.primary_step) {
            let envelope = (x * 0.05 + phase).sin() * (x * 0.1 - phase * 0.5).sin();
            let carrier = (x * 0.15 + phase * 2.0).sin();
            self.primary
                .push(Point::new(x, center_y + carrier * envelope * amplitude));
        }
        surface.stroke_path(&self.primary, &cfg.primary_style);

        self.ghost.clear();
        let ghost_amplitude = amplitude * cfg.ghost_amplitude_ratio;
        for x in sample_positions(width, cfg.ghost_step) {
            let y = center_y + (x * 0.08 + phase + 1.0).sin() * ghost_amplitude;
            self.ghost.push(Point::new(x, y));
        }
        surface.stroke_path(&self.ghost, &cfg.ghost_style);
    }
}

/// `0, step, 2*step, ...` up to and including `width`
fn sample_positions(width: f32, step: f32) -> impl Iterator<Item = f32> {
    let count = if width >= 0.0 && step > 0.0 {
        (width / step).floor() as usize + 1
    } else {
        0
    };
    (0..count).map(move |i| i as f32 * step)
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::surface::{Point, StrokeStyle, Surface};

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Resize(u32, u32),
        Scale(f32),
        ClearRect(f32, f32, f32, f32),
        ClearAll,
        Stroke(Vec<Point>, StrokeStyle),
    }

    /// Surface that records every call
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub width: u32,
        pub height: u32,
        pub calls: Vec<Call>,
    }

    impl RecordingSurface {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                calls: Vec::new(),
            }
        }

        pub fn strokes(&self) -> Vec<&Vec<Point>> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Stroke(points, _) => Some(points),
                    _ => None,
                })
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn backing_size(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.width = width;
            self.height = height;
            self.calls.push(Call::Resize(width, height));
        }

        fn scale(&mut self, factor: f32) {
            self.calls.push(Call::Scale(factor));
        }

        fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
            self.calls.push(Call::ClearRect(x, y, width, height));
        }

        fn clear_all(&mut self) {
            self.calls.push(Call::ClearAll);
        }

        fn stroke_path(&mut self, points: &[Point], style: &StrokeStyle) {
            self.calls.push(Call::Stroke(points.to_vec(), style.clone()));
        }
    }
}
