//! UI rendering and layout utilities

use crate::canvas::TerminalCanvas;
use crate::constants;
use crate::state::AppState;
use crate::surface::Surface;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine},
        Block, Borders, Paragraph,
    },
    Frame,
};

/// Blue, cyan and red, matching the waveform gradient
const BAND_COLORS: [Color; 3] = [
    Color::Rgb(0x4f, 0xac, 0xfe),
    Color::Rgb(0x00, 0xf2, 0xfe),
    Color::Rgb(0xff, 0x47, 0x57),
];

fn split(size: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(constants::ui::WAVEFORM_ROWS),
            Constraint::Min(4),
        ])
        .split(size)
}

/// Inner cell area of the waveform block for a terminal of `size`
pub fn waveform_area(size: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(split(size)[1])
}

fn band_color(i: usize, width: usize) -> Color {
    if i < width / 3 {
        BAND_COLORS[0]
    } else if i < 2 * width / 3 {
        BAND_COLORS[1]
    } else {
        BAND_COLORS[2]
    }
}

/// Create a gradient bar showing the target level
pub fn create_gradient_bar(width: usize, ratio: f64) -> Line<'static> {
    let ratio = ratio.clamp(0.0, 1.0);
    let filled = (ratio * width as f64) as usize;
    let partial_fill = (ratio * width as f64) - filled as f64;
    let mut spans = Vec::with_capacity(width);

    for i in 0..width {
        let ch = if i < filled {
            '█'
        } else if i == filled && partial_fill > 0.0 {
            match (partial_fill * 8.0) as usize {
                0 | 1 => '░',
                2 | 3 => '▒',
                4 | 5 => '▓',
                _ => '█',
            }
        } else {
            '░'
        };
        spans.push(Span::styled(
            ch.to_string(),
            Style::default().fg(band_color(i, width)),
        ));
    }

    Line::from(spans)
}

/// Scale labels under the bar with a marker at the display floor
pub fn create_level_labels(width: usize) -> Line<'static> {
    let max = constants::conditioner::MAX_TARGET_LEVEL as f64;
    let floor_ratio = constants::conditioner::MIN_DISPLAY as f64 / max;
    let floor_pos = (floor_ratio * width.saturating_sub(1) as f64).round() as usize;
    let mut spans = Vec::new();

    let mut i = 0;
    while i < width {
        if i == floor_pos {
            spans.push(Span::styled("▲", Style::default().fg(Color::White)));
            i += 1;
            continue;
        }

        let label = if i == 0 {
            "0"
        } else if i == width / 3 {
            "0.5"
        } else if i == 2 * width / 3 {
            "1.0"
        } else if i + 3 == width {
            "1.5"
        } else {
            " "
        };

        let fits = i + label.chars().count() <= width;
        let text = if fits { label } else { " " };
        spans.push(Span::styled(text, Style::default().fg(band_color(i, width))));
        i += text.chars().count();
    }

    Line::from(spans)
}

/// Waveform canvas widget drawing the display list of `canvas`
fn waveform_widget(canvas: &TerminalCanvas) -> Canvas<'_, impl Fn(&mut Context) + '_> {
    let (width, height) = canvas.backing_size();
    let height = height as f64;

    Canvas::default()
        .block(Block::default().title("Waveform").borders(Borders::ALL))
        .marker(Marker::Braille)
        .x_bounds([0.0, width as f64])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            // Canvas y grows upwards, surface y grows downwards
            for s in canvas.segments() {
                ctx.draw(&CanvasLine {
                    x1: s.x1 as f64,
                    y1: height - s.y1 as f64,
                    x2: s.x2 as f64,
                    y2: height - s.y2 as f64,
                    color: Color::Rgb(s.color.r, s.color.g, s.color.b),
                });
            }
        })
}

/// Render the complete UI
pub fn render_ui(f: &mut Frame, state: &AppState, canvas: Option<&TerminalCanvas>) {
    let chunks = split(f.size());

    let status_block = Block::default().title("Status").borders(Borders::ALL);
    let status_text = Paragraph::new(state.status()).block(status_block);
    f.render_widget(status_text, chunks[0]);

    match canvas {
        Some(canvas) => f.render_widget(waveform_widget(canvas), chunks[1]),
        None => f.render_widget(
            Block::default().title("Waveform").borders(Borders::ALL),
            chunks[1],
        ),
    }

    let ratio = (state.target_level / constants::conditioner::MAX_TARGET_LEVEL) as f64;
    let bar_width =
        (chunks[2].width as usize).saturating_sub(constants::ui::BAR_BORDER_WIDTH);
    let gauge = Paragraph::new(vec![
        create_gradient_bar(bar_width, ratio),
        create_level_labels(bar_width),
    ])
    .block(
        Block::default()
            .title(format!(
                "Level: {:.2} (Raw: {:.1} dB)",
                state.target_level,
                state.raw_db()
            ))
            .borders(Borders::ALL),
    );
    f.render_widget(gauge, chunks[2]);
}
