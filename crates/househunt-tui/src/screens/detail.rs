//! Detail screen: every field of one listing, with a vote slider and
//! a comment editor that stay a local draft until Update.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use househunt_core::view::detail::fields;
use househunt_core::view::{DetailContent, DetailView};
use househunt_core::{Command, Listing, QueryState, Route};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::vote_slider::vote_slider;

/// Width of the label column.
const LABEL_WIDTH: usize = 14;

pub struct DetailScreen {
    focused: bool,
    view: Option<DetailView>,
    state: QueryState<Listing>,
    editing_comment: bool,
}

impl DetailScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            view: None,
            state: QueryState::default(),
            editing_comment: false,
        }
    }

    fn begin_update(&mut self) -> Option<Action> {
        self.editing_comment = false;
        self.view.as_mut()?.begin_update().map(Action::Run)
    }

    fn handle_comment_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return self.begin_update();
        }
        let listing = self.state.data.clone()?;
        let view = self.view.as_mut()?;
        match key.code {
            KeyCode::Esc => self.editing_comment = false,
            KeyCode::Enter => view.comment_mut(&listing).push('\n'),
            KeyCode::Backspace => {
                view.comment_mut(&listing).pop();
            }
            KeyCode::Char(c) => view.comment_mut(&listing).push(c),
            _ => {}
        }
        None
    }

    fn render_fields(frame: &mut Frame, area: Rect, listing: &Listing) {
        let lines: Vec<Line> = fields(listing)
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("  {label:<LABEL_WIDTH$}"), theme::hint_text()),
                    Span::styled(value, Style::default().fg(theme::PLASTER)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_vote(&self, frame: &mut Frame, area: Rect, view: &DetailView, listing: &Listing) {
        let label = Span::styled(format!("  {:<LABEL_WIDTH$}", "Vote"), theme::hint_text());
        let slider_width = area.width.saturating_sub(u16::try_from(LABEL_WIDTH + 2).unwrap_or(0));
        let mut line = vote_slider(
            view.shown_vote(listing),
            slider_width.min(40),
            !self.editing_comment,
        );
        line.spans.insert(0, label);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_comment(&self, frame: &mut Frame, area: Rect, view: &DetailView, listing: &Listing) {
        let border = if self.editing_comment {
            theme::frame_active()
        } else {
            theme::frame_idle()
        };
        let block = Block::default()
            .title(" Comment ")
            .title_style(theme::heading())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let mut text = view.shown_comment(listing).to_owned();
        if self.editing_comment {
            text.push('█');
        }
        frame.render_widget(
            Paragraph::new(text)
                .style(Style::default().fg(theme::SKY))
                .wrap(Wrap { trim: false })
                .block(block),
            area,
        );
    }

    fn status_line(view: &DetailView) -> Line<'static> {
        if view.is_updating() {
            return Line::from(Span::styled(
                "  Updating…",
                Style::default().fg(theme::AMBER),
            ));
        }
        if let Some(message) = view.mutation_error() {
            return Line::from(Span::styled(format!("  {message}"), theme::error_text()));
        }
        if view.has_draft() {
            return Line::from(Span::styled(
                "  Unsaved changes",
                Style::default()
                    .fg(theme::ROSE)
                    .add_modifier(Modifier::ITALIC),
            ));
        }
        Line::default()
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let pairs: &[(&str, &str)] = if self.editing_comment {
            &[("Esc ", "done  "), ("Ctrl+S ", "update")]
        } else {
            &[
                ("←/→ ", "vote  "),
                ("e ", "comment  "),
                ("u ", "update  "),
                ("x ", "discard  "),
                ("m ", "map  "),
                ("Esc ", "back"),
            ]
        };
        let mut spans = vec![Span::raw(" ")];
        for (key, label) in pairs {
            spans.push(Span::styled(*key, theme::hint_key()));
            spans.push(Span::styled(*label, theme::hint_text()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Default for DetailScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for DetailScreen {
    fn on_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.editing_comment {
            return Ok(self.handle_comment_key(key));
        }
        let Some(listing) = self.state.data.clone() else {
            return Ok(None);
        };
        let Some(view) = self.view.as_mut() else {
            return Ok(None);
        };

        let action = match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                view.nudge_vote(&listing, -1);
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                view.nudge_vote(&listing, 1);
                None
            }
            KeyCode::Char('e') => {
                self.editing_comment = true;
                None
            }
            KeyCode::Char('x') => {
                view.discard_draft();
                None
            }
            KeyCode::Char('m') => Some(Action::Navigate(view.map_route())),
            KeyCode::Char('u') => self.begin_update(),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.begin_update()
            }
            _ => None,
        };
        Ok(action)
    }

    fn on_action(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            // Every visit starts without a draft.
            Action::Navigate(Route::Detail(id)) => {
                self.view = Some(DetailView::new(id.clone()));
                self.state = QueryState::default();
                self.editing_comment = false;
            }
            Action::ListingUpdated { id, state } => {
                if self.view.as_ref().is_some_and(|v| v.id() == id) {
                    self.state = state.clone();
                }
            }
            Action::CommandFinished {
                command: Command::UpdateListing { id, .. },
                result,
            } => {
                if let Some(view) = self.view.as_mut().filter(|v| v.id() == id) {
                    view.finish_update(result);
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = self
            .view
            .as_ref()
            .map_or_else(|| " Listing ".to_owned(), |v| format!(" Listing {} ", v.id()));
        let block = Block::default()
            .title(title)
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

        let Some(view) = self.view.as_ref() else {
            return;
        };

        let layout = Layout::vertical([
            Constraint::Length(7), // fields
            Constraint::Length(1), // vote
            Constraint::Min(3),    // comment
            Constraint::Length(1), // status
            Constraint::Length(1), // hints
        ])
        .split(inner);

        match view.content(&self.state) {
            DetailContent::Loading => frame.render_widget(
                Paragraph::new(Span::styled(
                    "  Loading listing…",
                    Style::default().fg(theme::PLASTER),
                )),
                layout[0],
            ),
            DetailContent::Error(message) => frame.render_widget(
                Paragraph::new(Span::styled(format!("  {message}"), theme::error_text())),
                layout[0],
            ),
            DetailContent::Ready(listing) => {
                Self::render_fields(frame, layout[0], &listing);
                self.render_vote(frame, layout[1], view, &listing);
                self.render_comment(frame, layout[2], view, &listing);
                frame.render_widget(Paragraph::new(Self::status_line(view)), layout[3]);
            }
        }

        self.render_hints(frame, layout[4]);
    }

    fn captures_input(&self) -> bool {
        self.editing_comment
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn hints(&self) -> &'static str {
        "←/→ vote  e comment  u update"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use househunt_core::{
        CommandResult, CoreError, FailureCause, ListingId, ListingPatch, QueryStatus, Vote,
    };

    use super::*;
    use crate::testing::{buffer_text, render};

    fn listing() -> Listing {
        Listing {
            id: ListingId::from("3"),
            link: "http://example.org/3/".into(),
            vote: Some(Vote::new(6)),
            comment: Some("quiet street".into()),
            city: Some("Torino".into()),
            zone: None,
            street: Some("Via Po 2".into()),
            lat: None,
            lng: None,
            rooms_number: Some(3),
            square_meters: None,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mounted() -> DetailScreen {
        let mut screen = DetailScreen::new();
        let id = ListingId::from("3");
        screen
            .on_action(&Action::Navigate(Route::detail(&id)))
            .unwrap();
        screen
            .on_action(&Action::ListingUpdated {
                id,
                state: QueryState {
                    data: Some(Arc::new(listing())),
                    ..QueryState::default()
                },
            })
            .unwrap();
        screen
    }

    fn draw(screen: &DetailScreen) -> String {
        buffer_text(&render(70, 18, |f| screen.render(f, f.area())))
    }

    #[test]
    fn renders_every_field_with_placeholders() {
        let text = draw(&mounted());
        for needle in ["Listing 3", "Via Po 2", "Torino", "http://example.org/3/", "quiet street"] {
            assert!(text.contains(needle), "missing {needle} in\n{text}");
        }
        assert!(text.contains("Zone"));
        assert!(text.contains("  6"), "vote value shown\n{text}");
    }

    #[test]
    fn updates_for_other_listings_are_ignored() {
        let mut screen = mounted();
        screen
            .on_action(&Action::ListingUpdated {
                id: ListingId::from("9"),
                state: QueryState {
                    status: QueryStatus::Error("nope".into()),
                    ..QueryState::default()
                },
            })
            .unwrap();
        assert!(!draw(&screen).contains("nope"));
    }

    #[test]
    fn slider_and_comment_build_one_update() {
        let mut screen = mounted();
        screen.on_key(key(KeyCode::Right)).unwrap();
        screen.on_key(key(KeyCode::Char('e'))).unwrap();
        assert!(screen.captures_input());
        for c in ", no shops".chars() {
            screen.on_key(key(KeyCode::Char(c))).unwrap();
        }
        screen.on_key(key(KeyCode::Esc)).unwrap();
        assert!(!screen.captures_input());
        assert!(draw(&screen).contains("Unsaved changes"));

        let run = screen.on_key(key(KeyCode::Char('u'))).unwrap();
        let Some(Action::Run(Command::UpdateListing { id, patch })) = run else {
            panic!("expected update");
        };
        assert_eq!(id.as_str(), "3");
        assert_eq!(
            patch,
            ListingPatch {
                comment: Some("quiet street, no shops".into()),
                vote: Some(Vote::new(7)),
            }
        );
        assert!(draw(&screen).contains("Updating…"));
    }

    #[test]
    fn failed_update_keeps_the_draft() {
        let mut screen = mounted();
        screen.on_key(key(KeyCode::Left)).unwrap();
        screen.on_key(key(KeyCode::Char('u'))).unwrap();
        screen
            .on_action(&Action::CommandFinished {
                command: Command::UpdateListing {
                    id: ListingId::from("3"),
                    patch: ListingPatch::default(),
                },
                result: Err(CoreError::Mutation {
                    operation: "update",
                    message: "HTTP 500: boom".into(),
                    cause: FailureCause::Status(500),
                }),
            })
            .unwrap();
        let text = draw(&screen);
        assert!(text.contains("Failed to update listing: HTTP 500: boom"));
        assert!(text.contains("  5"), "draft vote still shown\n{text}");

        screen.on_key(key(KeyCode::Char('u'))).unwrap();
        screen
            .on_action(&Action::CommandFinished {
                command: Command::UpdateListing {
                    id: ListingId::from("3"),
                    patch: ListingPatch::default(),
                },
                result: Ok(CommandResult::Updated {
                    id: ListingId::from("3"),
                }),
            })
            .unwrap();
        assert!(!draw(&screen).contains("Unsaved changes"));
    }

    #[test]
    fn map_key_selects_this_listing() {
        let mut screen = mounted();
        let action = screen.on_key(key(KeyCode::Char('m'))).unwrap();
        let Some(Action::Navigate(route)) = action else {
            panic!("expected navigation");
        };
        assert_eq!(route.to_string(), "/map?houseId=3");
    }
}
