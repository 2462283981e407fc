//! Render helpers for screen and widget tests.

use ratatui::{Frame, Terminal, backend::TestBackend, buffer::Buffer};

/// Draw once on a `width` x `height` test terminal and return the buffer.
#[allow(clippy::unwrap_used)]
pub fn render(width: u16, height: u16, draw: impl FnOnce(&mut Frame)) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(draw).unwrap();
    terminal.backend().buffer().clone()
}

/// Row `y` as text, one char per cell.
pub fn buffer_line(buf: &Buffer, y: u16) -> String {
    let area = buf.area;
    (area.left()..area.right())
        .map(|x| buf[(x, y)].symbol())
        .collect()
}

/// All rows joined with newlines.
pub fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| buffer_line(buf, y))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Column where `needle` starts on row `y`.
pub fn find_col(buf: &Buffer, y: u16, needle: &str) -> Option<u16> {
    let line: Vec<char> = buffer_line(buf, y).chars().collect();
    let needle: Vec<char> = needle.chars().collect();
    let idx = line.windows(needle.len()).position(|w| w == needle.as_slice())?;
    u16::try_from(idx).ok()
}
