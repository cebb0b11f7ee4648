//! Voice-level waveform overlay
//!
//! [`conditioner::LevelConditioner`] turns raw microphone levels into a
//! bounded target level, [`renderer::WaveformRenderer`] animates a waveform
//! from it, and [`meter::VoiceMeter`] ties both to a recording session.
//! The rest of the crate is the terminal host built around them.

pub mod app;
pub mod audio;
pub mod canvas;
pub mod conditioner;
pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod meter;
pub mod renderer;
pub mod smoothing;
pub mod state;
pub mod surface;
pub mod ui;
