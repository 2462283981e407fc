//! Vote slider (0–10) and compact vote badge.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use househunt_core::Vote;

use crate::theme;

/// Room taken by the `0 ` / ` 10` end labels and the value.
const CHROME: usize = 2 + 3 + 4;

/// `0 ━━━━━━●───── 10  7` with the knob in the vote's color.
///
/// `width` is the total cell budget; the track shrinks to fit and
/// keeps at least eleven cells so every integer has a position.
pub fn vote_slider(vote: Option<Vote>, width: u16, active: bool) -> Line<'static> {
    let track = usize::from(width).saturating_sub(CHROME).max(11);
    let color = theme::vote_color(vote);
    let dim = Style::default().fg(theme::SLATE);

    let (filled, rest) = match vote {
        Some(v) => {
            let knob = usize::from(v.value()) * (track - 1) / 10;
            (knob, track - knob - 1)
        }
        None => (0, track),
    };

    let mut spans = vec![
        Span::styled("0 ", dim),
        Span::styled("━".repeat(filled), Style::default().fg(color)),
    ];
    if vote.is_some() {
        let knob_style = if active {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        spans.push(Span::styled("●", knob_style));
    }
    spans.push(Span::styled("─".repeat(rest), dim));
    spans.push(Span::styled(" 10", dim));
    spans.push(Span::styled(
        format!("  {}", vote.map_or_else(|| "-".to_owned(), |v| v.to_string())),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ));
    Line::from(spans)
}

/// `● 7` in the vote color, `· -` without a vote.
pub fn vote_badge(vote: Option<Vote>) -> Span<'static> {
    let text = match vote {
        Some(v) => format!("● {v}"),
        None => "· -".to_owned(),
    };
    Span::styled(text, Style::default().fg(theme::vote_color(vote)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn knob_sits_at_the_ends_for_0_and_10() {
        let low = text(&vote_slider(Some(Vote::new(0)), 20, false));
        assert!(low.starts_with("0 ●"), "{low}");
        let high = text(&vote_slider(Some(Vote::new(10)), 20, false));
        assert!(high.contains("● 10  10"), "{high}");
    }

    #[test]
    fn slider_keeps_its_width() {
        for v in 0..=10 {
            let line = vote_slider(Some(Vote::new(v)), 30, true);
            let track: usize = line
                .spans
                .iter()
                .filter(|s| s.content.starts_with(['━', '─', '●']))
                .map(|s| s.content.chars().count())
                .sum();
            assert_eq!(track, 30 - CHROME, "vote {v}");
        }
    }

    #[test]
    fn missing_vote_has_no_knob() {
        let line = text(&vote_slider(None, 20, false));
        assert!(!line.contains('●'));
        assert!(line.ends_with("  -"));
        assert_eq!(vote_badge(None).content, "· -");
        assert_eq!(vote_badge(Some(Vote::new(7))).content, "● 7");
    }
}
