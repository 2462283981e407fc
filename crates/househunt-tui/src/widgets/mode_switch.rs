//! The Insert / List / Map switch at the bottom of the screen.
//!
//! Exactly one mode is highlighted: the one the current route maps to.
//! Detail routes highlight List.

use ratatui::text::{Line, Span};
use ratatui::widgets::Tabs;
use strum::IntoEnumIterator;

use househunt_core::Mode;

use crate::theme;

pub fn label(mode: Mode) -> &'static str {
    match mode {
        Mode::Insert => "Insert",
        Mode::List => "List",
        Mode::Map => "Map",
    }
}

/// Mode bound to a number key (`1` = Insert, `2` = List, `3` = Map).
pub fn mode_for_key(c: char) -> Option<Mode> {
    let n = c.to_digit(10)?.checked_sub(1)?;
    Mode::iter().nth(usize::try_from(n).ok()?)
}

/// Next or previous mode, wrapping around.
pub fn cycle(mode: Mode, forward: bool) -> Mode {
    let modes: Vec<Mode> = Mode::iter().collect();
    let idx = modes.iter().position(|&m| m == mode).unwrap_or(0);
    let next = if forward {
        (idx + 1) % modes.len()
    } else {
        (idx + modes.len() - 1) % modes.len()
    };
    modes.get(next).copied().unwrap_or(mode)
}

pub fn mode_switch(active: Mode) -> Tabs<'static> {
    let titles: Vec<Line> = Mode::iter()
        .enumerate()
        .map(|(i, mode)| {
            let style = if mode == active {
                theme::mode_current()
            } else {
                theme::mode_other()
            };
            Line::from(Span::styled(format!(" {} {} ", i + 1, label(mode)), style))
        })
        .collect();

    let selected = Mode::iter().position(|m| m == active).unwrap_or(0);
    Tabs::new(titles)
        .divider(Span::styled("│", theme::hint_text()))
        .highlight_style(theme::mode_current())
        .select(selected)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::layout::Rect;

    use super::*;
    use crate::testing::{buffer_line, find_col, render};

    #[test]
    fn number_keys_pick_modes_in_switch_order() {
        assert_eq!(mode_for_key('1'), Some(Mode::Insert));
        assert_eq!(mode_for_key('3'), Some(Mode::Map));
        assert_eq!(mode_for_key('4'), None);
        assert_eq!(mode_for_key('0'), None);
    }

    #[test]
    fn cycling_wraps() {
        assert_eq!(cycle(Mode::Map, true), Mode::Insert);
        assert_eq!(cycle(Mode::Insert, false), Mode::Map);
        assert_eq!(cycle(Mode::Insert, true), Mode::List);
    }

    #[test]
    fn only_the_active_mode_is_highlighted() {
        let buf = render(40, 1, |frame| {
            frame.render_widget(mode_switch(Mode::List), Rect::new(0, 0, 40, 1));
        });
        let line = buffer_line(&buf, 0);
        assert!(line.contains("1 Insert"), "{line}");
        assert!(line.contains("2 List"), "{line}");

        let list = find_col(&buf, 0, "List").unwrap();
        assert_eq!(buf[(list, 0)].fg, theme::TERRACOTTA);
        let insert = find_col(&buf, 0, "Insert").unwrap();
        assert_eq!(buf[(insert, 0)].fg, theme::PLASTER);
    }
}
