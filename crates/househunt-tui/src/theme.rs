//! Palette and semantic styles for the TUI.

use ratatui::style::{Color, Modifier, Style};

use househunt_core::Vote;

/// Selection and focus accent.
pub const TERRACOTTA: Color = Color::Rgb(226, 114, 91);
/// Headings and emphasised keys.
pub const SKY: Color = Color::Rgb(126, 200, 227);
pub const ROSE: Color = Color::Rgb(240, 128, 160);
pub const AMBER: Color = Color::Rgb(245, 190, 80);
pub const SAGE: Color = Color::Rgb(120, 200, 120);
pub const BRICK: Color = Color::Rgb(220, 70, 60);

pub const PLASTER: Color = Color::Rgb(205, 200, 190);
pub const SLATE: Color = Color::Rgb(112, 128, 144);
pub const BG_RAISED: Color = Color::Rgb(48, 44, 42);
pub const BG_NIGHT: Color = Color::Rgb(28, 26, 25);

/// One color per vote, red at 0 through green at 10.
pub const VOTE_SCALE: [Color; 11] = [
    Color::Rgb(220, 70, 60),
    Color::Rgb(225, 92, 62),
    Color::Rgb(230, 115, 65),
    Color::Rgb(236, 138, 68),
    Color::Rgb(240, 160, 72),
    Color::Rgb(245, 190, 80),
    Color::Rgb(215, 195, 90),
    Color::Rgb(185, 198, 100),
    Color::Rgb(160, 200, 108),
    Color::Rgb(138, 200, 114),
    Color::Rgb(120, 200, 120),
];

/// Marker and cell color for a vote. Unvoted listings are gray.
pub fn vote_color(vote: Option<Vote>) -> Color {
    vote.and_then(|v| VOTE_SCALE.get(usize::from(v.value())).copied())
        .unwrap_or(SLATE)
}

const fn fg(color: Color) -> Style {
    Style::new().fg(color)
}

pub fn heading() -> Style {
    fg(SKY).add_modifier(Modifier::BOLD)
}

pub fn frame_active() -> Style {
    fg(TERRACOTTA)
}

pub fn frame_idle() -> Style {
    fg(SLATE)
}

pub fn column_header() -> Style {
    heading().add_modifier(Modifier::UNDERLINED)
}

pub fn row_plain() -> Style {
    fg(PLASTER)
}

pub fn row_cursor() -> Style {
    fg(TERRACOTTA).bg(BG_RAISED).add_modifier(Modifier::BOLD)
}

/// A row whose delete is in flight.
pub fn row_removing() -> Style {
    fg(SLATE).add_modifier(Modifier::CROSSED_OUT)
}

pub fn mode_current() -> Style {
    frame_active().add_modifier(Modifier::BOLD)
}

pub fn mode_other() -> Style {
    row_plain()
}

/// Description half of a `key description` hint pair.
pub fn hint_text() -> Style {
    fg(SLATE)
}

pub fn hint_key() -> Style {
    heading()
}

/// Inline error text under a form or table.
pub fn error_text() -> Style {
    fg(BRICK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_scale_runs_red_to_green() {
        assert_eq!(vote_color(Some(Vote::new(10))), SAGE);
        assert_eq!(vote_color(Some(Vote::new(0))), BRICK);
        assert_eq!(vote_color(None), SLATE);
    }

    #[test]
    fn cursor_row_stands_out_from_plain_rows() {
        assert_ne!(row_cursor(), row_plain());
        assert_eq!(row_cursor().bg, Some(BG_RAISED));
    }
}
