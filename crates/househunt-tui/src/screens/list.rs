//! List screen: one row per listing in server order, with open, map
//! and delete actions.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use househunt_core::view::{ListContent, ListRow, ListView};
use househunt_core::{Command, Listing, QueryState};

use crate::action::{Action, ConfirmAction, Toast, Tone};
use crate::component::Component;
use crate::theme;
use crate::widgets::vote_slider::vote_badge;

pub struct ListScreen {
    focused: bool,
    state: QueryState<Vec<Listing>>,
    view: ListView,
    table_state: TableState,
}

impl ListScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            state: QueryState::default(),
            view: ListView::new(),
            table_state: TableState::default().with_selected(Some(0)),
        }
    }

    fn rows(&self) -> Vec<ListRow> {
        match self.view.content(&self.state) {
            ListContent::Rows(rows) => rows,
            _ => Vec::new(),
        }
    }

    fn selected_row(&self) -> Option<ListRow> {
        let idx = self.table_state.selected().unwrap_or(0);
        self.rows().into_iter().nth(idx)
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.table_state.select(Some(next));
    }

    /// Keep the cursor on a row after the collection shrinks.
    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        let current = self.table_state.selected().unwrap_or(0);
        self.table_state.select(Some(current.min(len.saturating_sub(1))));
    }

    fn request_remove(&self) -> Option<Action> {
        let row = self.selected_row()?;
        if !self.view.can_remove() {
            return Some(Action::Notify(Toast::new(
                Tone::Info,
                "A delete is already running",
            )));
        }
        Some(Action::ShowConfirm(ConfirmAction::RemoveListing {
            id: row.id,
            title: row.primary,
        }))
    }

    fn render_message(frame: &mut Frame, area: Rect, text: &str, style: Style) {
        let layout = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);
        frame.render_widget(
            Paragraph::new(Span::styled(text.to_owned(), style)).centered(),
            layout[1],
        );
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, rows: &[ListRow]) {
        let header = Row::new(vec![
            Cell::from("Listing").style(theme::column_header()),
            Cell::from("Size").style(theme::column_header()),
            Cell::from("Vote").style(theme::column_header()),
            Cell::from("").style(theme::column_header()),
        ]);

        let selected = self.table_state.selected().unwrap_or(0);
        let body: Vec<Row> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let prefix = if i == selected { "▸ " } else { "  " };
                let style = if row.removing {
                    theme::row_removing()
                } else {
                    theme::row_plain()
                };
                let status = if row.removing { "deleting…" } else { "" };
                Row::new(vec![
                    Cell::from(format!("{prefix}{}", row.primary)).style(style),
                    Cell::from(row.secondary.clone()).style(style),
                    Cell::from(Line::from(vote_badge(row.vote))),
                    Cell::from(status).style(Style::default().fg(theme::AMBER)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Fill(3),
            Constraint::Length(18),
            Constraint::Length(6),
            Constraint::Length(10),
        ];
        let table = Table::new(body, widths)
            .header(header)
            .row_highlight_style(theme::row_cursor());

        let mut state = TableState::default().with_selected(self.table_state.selected());
        frame.render_stateful_widget(table, area, &mut state);
    }
}

impl Default for ListScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ListScreen {
    fn on_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.table_state.select(Some(0));
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.move_selection(isize::MAX);
                None
            }
            KeyCode::Enter => self
                .selected_row()
                .map(|row| Action::Navigate(row.detail_route())),
            KeyCode::Char('m') => self
                .selected_row()
                .map(|row| Action::Navigate(row.map_route())),
            KeyCode::Char('d') | KeyCode::Delete => self.request_remove(),
            _ => None,
        };
        Ok(action)
    }

    fn on_action(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ListingsUpdated(state) => {
                self.state = state.clone();
                self.clamp_selection();
            }
            Action::RemoveConfirmed(id) => {
                return Ok(self.view.begin_remove(id).map(Action::Run));
            }
            Action::CommandFinished {
                command: Command::RemoveListing { .. },
                result,
            } => self.view.finish_remove(result),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let content = self.view.content(&self.state);
        let count = match &content {
            ListContent::Rows(rows) => format!(" ({})", rows.len()),
            _ => String::new(),
        };
        let block = Block::default()
            .title(format!(" Listings{count} "))
            .title_style(theme::heading())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::frame_active()
            } else {
                theme::frame_idle()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1), // mutation error
            Constraint::Length(1), // hints
        ])
        .split(inner);

        match &content {
            ListContent::Loading => Self::render_message(
                frame,
                layout[0],
                "Loading listings…",
                Style::default().fg(theme::PLASTER),
            ),
            ListContent::Error(message) => {
                Self::render_message(frame, layout[0], message, theme::error_text());
            }
            ListContent::Empty => Self::render_message(
                frame,
                layout[0],
                "No listings yet. Press 1 to add one.",
                Style::default().fg(theme::PLASTER),
            ),
            ListContent::Rows(rows) => self.render_table(frame, layout[0], rows),
        }

        if let Some(message) = self.view.mutation_error() {
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" {message}"), theme::error_text())),
                layout[1],
            );
        }

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::hint_key()),
            Span::styled("move  ", theme::hint_text()),
            Span::styled("Enter ", theme::hint_key()),
            Span::styled("open  ", theme::hint_text()),
            Span::styled("m ", theme::hint_key()),
            Span::styled("map  ", theme::hint_text()),
            Span::styled("d ", theme::hint_key()),
            Span::styled("delete", theme::hint_text()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn hints(&self) -> &'static str {
        "Enter open  m map  d delete"
    }
}
