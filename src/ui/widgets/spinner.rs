use ratatui::{layout::Rect, text::Span, widgets::Paragraph};

use crate::ui::Frame;

/// Braille frames cycled once per tick.
///
pub const FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Returns the frame for the given spinner index.
///
pub fn frame(index: usize) -> &'static str {
    FRAMES[index % FRAMES.len()]
}

/// Render the spinner followed by a label.
///
pub fn render(frame_ref: &mut Frame, size: Rect, index: usize, label: &str) {
    let text = Span::raw(format!("{} {}", frame(index), label));
    frame_ref.render_widget(Paragraph::new(text), size);
}
