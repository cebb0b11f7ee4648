//! Audio level smoothing and measurement utilities

/// Attack/release envelope follower for audio levels
///
/// Rises toward louder input with the attack coefficient and falls back
/// with the (usually much smaller) release coefficient.
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    attack: f32,
    release: f32,
    value: f32,
}

impl EnvelopeFollower {
    /// Create a follower starting at zero
    pub fn new(attack: f32, release: f32) -> Self {
        Self {
            attack,
            release,
            value: 0.0,
        }
    }

    /// Feed one level and return the updated envelope
    pub fn update(&mut self, level: f32) -> f32 {
        let coef = if level > self.value {
            self.attack
        } else {
            self.release
        };
        self.value = ease_toward(self.value, level, coef);
        self.value
    }

    /// Get the current envelope value
    pub fn value(&self) -> f32 {
        self.value
    }
}

/// One-pole step of `current` toward `target`
#[inline]
pub fn ease_toward(current: f32, target: f32, coef: f32) -> f32 {
    current + (target - current) * coef
}

/// Root mean square of a block of samples, clamped to [0, 1]
pub fn rms_level(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt().clamp(0.0, 1.0)
}

/// Convert linear amplitude to decibels
pub fn amplitude_to_db(amplitude: f32) -> f32 {
    if amplitude > 0.0 {
        (20.0 * amplitude.log10()).max(-60.0)
    } else {
        -60.0 // Minimum dB level
    }
}

/// Collects samples into fixed-size chunks and reports one RMS level per chunk
pub struct ChunkedLevel {
    buffer: Vec<f32>,
    chunk_size: usize,
}

impl ChunkedLevel {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(chunk_size),
            chunk_size: chunk_size.max(1),
        }
    }

    /// Push samples, calling `emit` once for every completed chunk
    pub fn push<F>(&mut self, samples: impl IntoIterator<Item = f32>, mut emit: F)
    where
        F: FnMut(f32),
    {
        for sample in samples {
            self.buffer.push(sample);
            if self.buffer.len() == self.chunk_size {
                emit(rms_level(&self.buffer));
                self.buffer.clear();
            }
        }
    }
}
