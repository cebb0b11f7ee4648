//! Abstract 2D drawing target used by the waveform renderer

/// A point in logical drawing units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 8-bit RGB colour with a floating point alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Linear interpolation between two colours
    pub fn mix(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Composite over an opaque background
    pub fn over(self, background: Rgba) -> Rgba {
        Rgba {
            a: 1.0,
            ..background.mix(Rgba { a: 1.0, ..self }, self.a)
        }
    }
}

/// Horizontal linear gradient between `x0` and `x1`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub x0: f32,
    pub x1: f32,
    /// Colour stops as `(offset, colour)`, offsets ascending in [0, 1]
    pub stops: Vec<(f32, Rgba)>,
}

impl LinearGradient {
    /// Colour at logical x; positions outside the span take the end colour
    pub fn color_at(&self, x: f32) -> Rgba {
        let Some(&(_, first)) = self.stops.first() else {
            return Rgba::rgba(0, 0, 0, 0.0);
        };
        let span = self.x1 - self.x0;
        let t = if span.abs() > f32::EPSILON {
            ((x - self.x0) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let mut previous = (0.0, first);
        for &(offset, color) in &self.stops {
            if t <= offset {
                let width = offset - previous.0;
                if width <= f32::EPSILON {
                    return color;
                }
                return previous.1.mix(color, (t - previous.0) / width);
            }
            previous = (offset, color);
        }
        previous.1
    }
}

/// How a stroke is coloured
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
}

impl Paint {
    /// Colour of the stroke at logical x
    pub fn color_at(&self, x: f32) -> Rgba {
        match self {
            Paint::Solid(color) => *color,
            Paint::Linear(gradient) => gradient.color_at(x),
        }
    }
}

/// Styling for a stroked path; caps and joins are always round
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub paint: Paint,
    pub line_width: f32,
}

/// A drawing target with a backing store measured in device pixels
///
/// Coordinates passed to `clear_rect` and `stroke_path` are logical units;
/// the surface maps them to device pixels through its current scale.
pub trait Surface {
    /// Size of the backing store in device pixels
    fn backing_size(&self) -> (u32, u32);

    /// Resize the backing store; resets the scale to 1 and drops its content
    fn resize(&mut self, width: u32, height: u32);

    /// Multiply the current scale by `factor`
    fn scale(&mut self, factor: f32);

    /// Clear a rectangle given in logical units
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Clear the entire backing store regardless of scale
    fn clear_all(&mut self);

    /// Stroke an open polyline
    fn stroke_path(&mut self, points: &[Point], style: &StrokeStyle);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_stop() -> LinearGradient {
        LinearGradient {
            x0: 0.0,
            x1: 100.0,
            stops: vec![
                (0.0, Rgba::rgb(0, 0, 0)),
                (0.5, Rgba::rgb(100, 100, 100)),
                (1.0, Rgba::rgb(200, 0, 0)),
            ],
        }
    }

    #[test]
    fn test_gradient_interpolates_between_stops() {
        let gradient = three_stop();
        assert_eq!(gradient.color_at(0.0), Rgba::rgb(0, 0, 0));
        assert_eq!(gradient.color_at(25.0), Rgba::rgb(50, 50, 50));
        assert_eq!(gradient.color_at(50.0), Rgba::rgb(100, 100, 100));
        assert_eq!(gradient.color_at(75.0), Rgba::rgb(150, 50, 50));
    }

    #[test]
    fn test_gradient_clamps_outside_span() {
        let gradient = three_stop();
        assert_eq!(gradient.color_at(-10.0), Rgba::rgb(0, 0, 0));
        assert_eq!(gradient.color_at(400.0), Rgba::rgb(200, 0, 0));
    }

    #[test]
    fn test_translucent_over_black() {
        let ghost = Rgba::rgba(255, 255, 255, 0.15);
        let composed = ghost.over(Rgba::rgb(0, 0, 0));
        assert_eq!(composed, Rgba::rgb(38, 38, 38));
    }
}
