//! Main application logic and orchestration

use crate::audio::{self, SyntheticVoice};
use crate::canvas::TerminalCanvas;
use crate::config::{Config, LevelSource};
use crate::constants;
use crate::error::{AppError, AppResult};
use crate::frame::FrameClock;
use crate::meter::VoiceMeter;
use crate::state::AppState;
use crate::ui;
use cpal::traits::StreamTrait;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

/// Main application struct
pub struct App {
    config: Config,
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
}

/// Exit codes for the application
#[derive(Debug, Clone, Copy)]
pub enum ExitCode {
    Success = 0,  // User quit with Escape or q
    UserExit = 1, // Interrupted with Ctrl+C
    Error = 2,    // Actual application error
}

/// Result type that includes user exit information
pub type AppRunResult = Result<(), AppError>;

/// Extended result that tracks exit reason
pub struct RunResult {
    pub result: AppRunResult,
    pub exit_code: ExitCode,
}

/// Where levels come from while the app runs
enum LevelFeed {
    Microphone { stream: cpal::Stream },
    Synthetic { voice: SyntheticVoice, tick: Interval },
}

impl LevelFeed {
    fn resume(&self) -> AppResult<()> {
        if let LevelFeed::Microphone { stream } = self {
            stream.play()?;
        }
        Ok(())
    }

    fn pause(&self) {
        if let LevelFeed::Microphone { stream } = self
            && let Err(e) = stream.pause()
        {
            // Some hosts cannot pause; levels are dropped while idle anyway
            log::warn!("{}", AppError::from(e));
        }
    }

    /// Next synthetic level; never completes for the microphone feed
    async fn next_synthetic(&mut self) -> f32 {
        match self {
            LevelFeed::Synthetic { voice, tick } => {
                tick.tick().await;
                voice.next_level()
            }
            LevelFeed::Microphone { .. } => std::future::pending().await,
        }
    }
}

/// What a key press asks for
enum Action {
    ToggleRecording,
    Quit(ExitCode),
    Resize(u16, u16),
}

impl App {
    /// Initialize the application with configuration
    pub fn new_with_config(config: Config) -> AppResult<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(App { config, terminal })
    }

    /// Run the main application loop
    pub async fn run(mut self) -> RunResult {
        let outcome = self.run_loop().await;

        // Cleanup - restore the terminal whatever happened
        if let Err(e) = self.cleanup() {
            log::warn!("Failed to restore terminal: {}", e);
        }

        match outcome {
            Ok(exit_code) => RunResult {
                result: Ok(()),
                exit_code,
            },
            Err(e) => RunResult {
                result: Err(e),
                exit_code: ExitCode::Error,
            },
        }
    }

    async fn run_loop(&mut self) -> AppResult<ExitCode> {
        let (level_tx, mut level_rx) = mpsc::unbounded_channel();
        let (mut feed, source_name) = self.open_feed(level_tx)?;

        let mut app_state = AppState::new(source_name);
        let mut clock = FrameClock::new(self.config.fps);
        let mut meter = VoiceMeter::new(TerminalCanvas::new());

        let size = self.terminal.size()?;
        resize_meter(&mut meter, size.width, size.height);

        if self.config.autostart() {
            set_recording(true, &mut meter, &mut clock, &feed, &mut app_state)?;
        }

        let mut dirty = true;
        loop {
            let mut exit_reason = None;

            tokio::select! {
                // SIGINT from outside the terminal (e.g. `kill -INT`); in raw
                // mode a typed Ctrl+C arrives as a key event instead
                _ = tokio::signal::ctrl_c() => {
                    exit_reason = Some(ExitCode::UserExit);
                }
                Some(level) = level_rx.recv() => {
                    accept_level(level, &mut meter, &mut app_state);
                }
                level = feed.next_synthetic() => {
                    accept_level(level, &mut meter, &mut app_state);
                }
                handle = clock.next_frame() => {
                    if meter.on_frame(handle, &mut clock) {
                        app_state.target_level = meter.target_level();
                        dirty = true;
                    }
                }
                _ = tokio::time::sleep(Duration::from_millis(constants::ui::INPUT_POLL_MS)) => {}
            }

            // Check for keyboard and resize events
            while crossterm::event::poll(Duration::from_millis(0))? {
                match action_for(crossterm::event::read()?) {
                    Some(Action::Quit(code)) => exit_reason = Some(code),
                    Some(Action::ToggleRecording) => {
                        let on = !meter.is_recording();
                        set_recording(on, &mut meter, &mut clock, &feed, &mut app_state)?;
                        dirty = true;
                    }
                    Some(Action::Resize(cols, rows)) => {
                        resize_meter(&mut meter, cols, rows);
                        dirty = true;
                    }
                    None => {}
                }
            }

            if let Some(code) = exit_reason {
                meter.stop(&mut clock);
                feed.pause();
                return Ok(code);
            }

            if dirty {
                self.terminal
                    .draw(|f| ui::render_ui(f, &app_state, meter.surface()))?;
                dirty = false;
            }
        }
    }

    /// Open the configured level source
    fn open_feed(&self, levels: mpsc::UnboundedSender<f32>) -> AppResult<(LevelFeed, String)> {
        match &self.config.source {
            LevelSource::Microphone { device_name } => {
                let (device, audio_config) = audio::setup_audio_device(device_name.clone())?;

                let callback =
                    audio::create_level_callback(levels, audio_config.channels, self.config.channel);
                let stream_config = cpal::StreamConfig {
                    channels: audio_config.channels,
                    sample_rate: cpal::SampleRate(audio_config.sample_rate),
                    buffer_size: constants::audio::BUFFER_SIZE,
                };
                let stream = audio::build_audio_stream(&device, &stream_config, callback)?;

                let feed = LevelFeed::Microphone { stream };
                // Capture only runs while recording
                feed.pause();
                Ok((feed, audio_config.device_name))
            }
            LevelSource::Synthetic => {
                let rate = SyntheticVoice::capture_rate();
                let mut tick = tokio::time::interval(Duration::from_secs_f32(1.0 / rate));
                tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
                let feed = LevelFeed::Synthetic {
                    voice: SyntheticVoice::new(rate),
                    tick,
                };
                Ok((feed, "synthetic voice".to_string()))
            }
        }
    }

    /// Clean up terminal state
    fn cleanup(&mut self) -> AppResult<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

fn set_recording(
    on: bool,
    meter: &mut VoiceMeter<TerminalCanvas>,
    clock: &mut FrameClock,
    feed: &LevelFeed,
    app_state: &mut AppState,
) -> AppResult<()> {
    if on {
        feed.resume()?;
        meter.start(clock)?;
    } else {
        meter.stop(clock);
        feed.pause();
    }
    app_state.set_recording(on);
    Ok(())
}

/// Levels only count while a session is running
fn accept_level(level: f32, meter: &mut VoiceMeter<TerminalCanvas>, app_state: &mut AppState) {
    if meter.feed_level(level) {
        app_state.record_level(level);
    }
}

/// Size the waveform surface for a terminal of `cols` x `rows` cells
fn resize_meter(meter: &mut VoiceMeter<TerminalCanvas>, cols: u16, rows: u16) {
    let area = ui::waveform_area(Rect::new(0, 0, cols, rows));
    let ratio = constants::ui::PIXEL_RATIO;
    let (dots_w, dots_h) = TerminalCanvas::dots_for_cells(area.width, area.height);
    meter.resize(dots_w as f32 / ratio, dots_h as f32 / ratio, ratio);
}

fn action_for(event: Event) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Quit(ExitCode::UserExit))
            }
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit(ExitCode::Success)),
            KeyCode::Char(' ') => Some(Action::ToggleRecording),
            _ => None,
        },
        Event::Resize(cols, rows) => Some(Action::Resize(cols, rows)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::testing::ManualScheduler;
    use crate::surface::Surface;
    use crossterm::event::KeyEvent;

    #[test]
    fn test_key_bindings() {
        let key = |code| Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
        assert!(matches!(
            action_for(key(KeyCode::Esc)),
            Some(Action::Quit(ExitCode::Success))
        ));
        assert!(matches!(
            action_for(key(KeyCode::Char('q'))),
            Some(Action::Quit(ExitCode::Success))
        ));
        assert!(matches!(
            action_for(key(KeyCode::Char(' '))),
            Some(Action::ToggleRecording)
        ));
        assert!(action_for(key(KeyCode::Char('x'))).is_none());

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(matches!(action_for(ctrl_c), Some(Action::Quit(ExitCode::UserExit))));
        assert!(matches!(
            action_for(Event::Resize(100, 40)),
            Some(Action::Resize(100, 40))
        ));
    }

    #[test]
    fn test_levels_recorded_only_while_recording() {
        let mut meter = VoiceMeter::new(TerminalCanvas::new());
        let mut app_state = AppState::new("mic".to_string());
        let mut scheduler = ManualScheduler::default();

        accept_level(0.4, &mut meter, &mut app_state);
        assert_eq!(app_state.levels_received, 0);
        assert_eq!(app_state.raw_level, 0.0);

        meter.start(&mut scheduler).unwrap();
        accept_level(0.4, &mut meter, &mut app_state);
        assert_eq!(app_state.levels_received, 1);
        assert_eq!(app_state.raw_level, 0.4);
        assert!(meter.target_level() > 0.0);
    }

    #[test]
    fn test_resize_maps_cells_to_braille_dots() {
        let mut meter = VoiceMeter::new(TerminalCanvas::new());
        resize_meter(&mut meter, 80, 30);

        let area = ui::waveform_area(Rect::new(0, 0, 80, 30));
        let expected = TerminalCanvas::dots_for_cells(area.width, area.height);
        assert_eq!(meter.surface().unwrap().backing_size(), expected);
    }
}
