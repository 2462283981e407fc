//! Insert screen: link, vote and comment fields with a "fetch info"
//! lookup. One submission per visit: Done and Failed are final until the
//! screen is entered again.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tracing::debug;

use househunt_core::view::{DiscoveryState, InsertForm, InsertPhase};
use househunt_core::{Command, DiscoveryResult, Route, Vote};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::vote_slider::vote_slider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Link,
    Vote,
    Comment,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Self::Link => Self::Vote,
            Self::Vote => Self::Comment,
            Self::Comment => Self::Link,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Link => Self::Comment,
            Self::Vote => Self::Link,
            Self::Comment => Self::Vote,
        }
    }
}

pub struct InsertScreen {
    focused: bool,
    form: InsertForm,
    field: Field,
    throbber: ThrobberState,
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

fn discovered_lines(found: &DiscoveryResult) -> Vec<Line<'static>> {
    let value = Style::default().fg(theme::PLASTER);
    vec![
        Line::from(vec![
            Span::styled("  Found  ", Style::default().fg(theme::SAGE)),
            Span::styled(
                found.headline(),
                Style::default()
                    .fg(theme::SKY)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                "         {} rooms · {} m² · cost {}",
                or_dash(found.rooms_number),
                or_dash(found.square_meters),
                or_dash(found.cost),
            ),
            value,
        )),
    ]
}

impl InsertScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            form: InsertForm::new(),
            field: Field::Link,
            throbber: ThrobberState::default(),
        }
    }

    fn discover(&mut self) -> Option<Action> {
        self.form.begin_discovery().ok().map(Action::Discover)
    }

    fn submit(&mut self) -> Option<Action> {
        match self.form.submit() {
            Ok(command) => Some(Action::Run(command)),
            Err(e) => {
                debug!(error = %e, "insert refused");
                None
            }
        }
    }

    fn edit_field(&mut self, key: KeyEvent) -> Option<Action> {
        match (self.field, key.code) {
            (Field::Link, KeyCode::Enter) => return self.discover(),
            (Field::Link, KeyCode::Backspace) => self.form.edit_link(|l| {
                l.pop();
            }),
            (Field::Link, KeyCode::Char(c)) => self.form.edit_link(|l| l.push(c)),

            (Field::Vote, KeyCode::Enter) => return self.submit(),
            (Field::Vote, KeyCode::Left | KeyCode::Char('h')) => self.form.nudge_vote(-1),
            (Field::Vote, KeyCode::Right | KeyCode::Char('l')) => self.form.nudge_vote(1),
            (Field::Vote, KeyCode::Char(c)) if c.is_ascii_digit() => {
                let digit = i64::from(c.to_digit(10).unwrap_or(0));
                // "1" then "0" reads as 10.
                let vote = if self.form.vote().value() == 1 && digit == 0 {
                    Vote::MAX
                } else {
                    Vote::new(digit)
                };
                self.form.set_vote(vote);
            }

            (Field::Comment, KeyCode::Enter) => self.form.comment_mut().push('\n'),
            (Field::Comment, KeyCode::Backspace) => {
                self.form.comment_mut().pop();
            }
            (Field::Comment, KeyCode::Char(c)) => self.form.comment_mut().push(c),
            _ => {}
        }
        None
    }

    fn border(&self, field: Field) -> Style {
        if self.field == field {
            theme::frame_active()
        } else {
            theme::frame_idle()
        }
    }

    fn input_block(&self, title: &'static str, field: Field) -> Block<'static> {
        Block::default()
            .title(title)
            .title_style(theme::heading())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.border(field))
    }

    fn with_cursor(&self, field: Field, text: &str) -> String {
        if self.field == field {
            format!("{text}█")
        } else {
            text.to_owned()
        }
    }

    fn discovery_lines(&self) -> Vec<Line<'static>> {
        match self.form.discovery() {
            DiscoveryState::Idle => vec![Line::from(Span::styled(
                "  Ctrl+F or Enter on the link fetches address and size",
                theme::hint_text(),
            ))],
            DiscoveryState::Fetching { .. } => Vec::new(),
            DiscoveryState::Found { .. } => {
                self.form.discovered().map(discovered_lines).unwrap_or_default()
            }
            DiscoveryState::NotFound | DiscoveryState::Failed(_) => self
                .form
                .discovery_message()
                .map(|m| vec![Line::from(Span::styled(format!("  {m}"), theme::error_text()))])
                .unwrap_or_default(),
        }
    }

    fn render_throbber(&self, frame: &mut Frame, area: Rect, label: &'static str) {
        let throbber = Throbber::default()
            .label(label)
            .style(Style::default().fg(theme::SKY))
            .throbber_style(Style::default().fg(theme::TERRACOTTA));
        frame.render_stateful_widget(throbber, area, &mut self.throbber.clone());
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(3), // link
            Constraint::Length(2), // discovery
            Constraint::Length(1), // vote
            Constraint::Min(3),    // comment
            Constraint::Length(1), // validation
            Constraint::Length(1), // hints
        ])
        .split(area);

        let link = Paragraph::new(self.with_cursor(Field::Link, self.form.link()))
            .style(Style::default().fg(theme::SKY))
            .block(self.input_block(" Link ", Field::Link));
        frame.render_widget(link, layout[0]);

        if matches!(self.form.discovery(), DiscoveryState::Fetching { .. }) {
            self.render_throbber(frame, layout[1], "  Fetching info…");
        } else {
            frame.render_widget(Paragraph::new(self.discovery_lines()), layout[1]);
        }

        let mut vote = vote_slider(
            Some(self.form.vote()),
            layout[2].width.saturating_sub(8).min(40),
            self.field == Field::Vote,
        );
        vote.spans.insert(
            0,
            Span::styled(
                "  Vote  ",
                if self.field == Field::Vote {
                    theme::hint_key()
                } else {
                    theme::hint_text()
                },
            ),
        );
        frame.render_widget(Paragraph::new(vote), layout[2]);

        let comment = Paragraph::new(self.with_cursor(Field::Comment, self.form.comment()))
            .style(Style::default().fg(theme::PLASTER))
            .wrap(Wrap { trim: false })
            .block(self.input_block(" Comment ", Field::Comment));
        frame.render_widget(comment, layout[3]);

        if let Some(message) = self.form.validation() {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {message}"), theme::error_text())),
                layout[4],
            );
        }

        let mut spans = vec![Span::raw(" ")];
        for (key, label) in [
            ("Tab ", "next field  "),
            ("Ctrl+F ", "fetch info  "),
            ("Ctrl+S ", "add  "),
            ("Esc ", "back"),
        ] {
            spans.push(Span::styled(key, theme::hint_key()));
            spans.push(Span::styled(label, theme::hint_text()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), layout[5]);
    }

    fn render_outcome(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        let top = area.y + area.height.saturating_sub(height) / 2;
        let rect = Rect::new(area.x, top, area.width, height.min(area.height));
        frame.render_widget(Paragraph::new(lines).centered(), rect);
    }
}

impl Default for InsertScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for InsertScreen {
    fn on_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.form.phase() {
            InsertPhase::Editing => {}
            InsertPhase::Done { id: Some(id) } if key.code == KeyCode::Enter => {
                return Ok(Some(Action::Navigate(Route::detail(id))));
            }
            _ => return Ok(None),
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Char('f') if ctrl => self.discover(),
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::Esc => Some(Action::GoBack),
            KeyCode::Tab | KeyCode::Down => {
                self.field = self.field.next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field = self.field.prev();
                None
            }
            _ => self.edit_field(key),
        };
        Ok(action)
    }

    fn on_action(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            // Entering the screen always starts a new form.
            Action::Navigate(Route::Insert) => {
                self.form = InsertForm::new();
                self.field = Field::Link;
            }
            Action::DiscoveryFinished { link, result } => {
                if !self.form.finish_discovery(link, result.clone()) {
                    debug!(%link, "discarding discovery for an outdated link");
                }
            }
            Action::CommandFinished {
                command: Command::InsertListing(_),
                result,
            } => {
                if *self.form.phase() == InsertPhase::Working {
                    self.form.finish_submit(result.clone());
                }
            }
            Action::Tick => {
                let busy = *self.form.phase() == InsertPhase::Working
                    || matches!(self.form.discovery(), DiscoveryState::Fetching { .. });
                if busy {
                    self.throbber.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Add listing ")
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

        match self.form.phase() {
            InsertPhase::Editing => self.render_form(frame, inner),
            InsertPhase::Working => {
                let rows = Layout::vertical([
                    Constraint::Min(0),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ])
                .split(inner);
                let cols = Layout::horizontal([
                    Constraint::Min(0),
                    Constraint::Length(20),
                    Constraint::Min(0),
                ])
                .split(rows[1]);
                self.render_throbber(frame, cols[1], " Saving listing…");
            }
            InsertPhase::Done { id } => {
                let mut lines = vec![Line::from(Span::styled(
                    "✓ Listing added",
                    Style::default()
                        .fg(theme::SAGE)
                        .add_modifier(Modifier::BOLD),
                ))];
                if id.is_some() {
                    lines.push(Line::from(Span::styled(
                        "Enter opens it · 2 goes to the list",
                        theme::hint_text(),
                    )));
                }
                Self::render_outcome(frame, inner, lines);
            }
            InsertPhase::Failed(message) => {
                let lines = vec![
                    Line::from(Span::styled(message.clone(), theme::error_text())),
                    Line::from(Span::styled(
                        "Switch to another mode and back to start over",
                        theme::hint_text(),
                    )),
                ];
                Self::render_outcome(frame, inner, lines);
            }
        }
    }

    fn captures_input(&self) -> bool {
        self.form.is_editing()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn hints(&self) -> &'static str {
        if self.form.is_editing() {
            "Ctrl+F fetch  Ctrl+S add"
        } else {
            ""
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use househunt_core::{CommandResult, CoreError, FailureCause, ListingId, NewListing};

    use super::*;
    use crate::testing::{buffer_text, render};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(screen: &mut InsertScreen, text: &str) {
        for c in text.chars() {
            screen.on_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    fn mounted() -> InsertScreen {
        let mut screen = InsertScreen::new();
        screen.on_action(&Action::Navigate(Route::Insert)).unwrap();
        screen
    }

    fn draw(screen: &InsertScreen) -> String {
        buffer_text(&render(80, 20, |f| screen.render(f, f.area())))
    }

    fn found() -> DiscoveryResult {
        DiscoveryResult {
            city: Some("Milano".into()),
            street: Some("Via Tortona 12".into()),
            zone: Some("Navigli".into()),
            rooms_number: Some(3),
            square_meters: Some(80),
            cost: Some(1400),
            ..DiscoveryResult::default()
        }
    }

    #[test]
    fn not_found_is_inline_and_submit_still_works() {
        let mut screen = mounted();
        type_text(&mut screen, "http://x/");
        let fetch = screen.on_key(key(KeyCode::Enter)).unwrap();
        assert!(matches!(fetch, Some(Action::Discover(ref l)) if l == "http://x/"));

        screen
            .on_action(&Action::DiscoveryFinished {
                link: "http://x/".into(),
                result: Err(CoreError::DiscoveryNotFound {
                    link: "http://x/".into(),
                }),
            })
            .unwrap();
        assert!(draw(&screen).contains("Not found"));

        let Some(Action::Run(Command::InsertListing(draft))) =
            screen.on_key(ctrl('s')).unwrap()
        else {
            panic!("expected insert");
        };
        assert_eq!(
            draft,
            NewListing {
                link: "http://x/".into(),
                vote: Vote::DEFAULT,
                comment: String::new(),
                ..NewListing::default()
            }
        );
        assert!(draw(&screen).contains("Saving listing"));
        assert!(!screen.captures_input());

        screen
            .on_action(&Action::CommandFinished {
                command: Command::InsertListing(draft),
                result: Ok(CommandResult::Inserted {
                    id: Some(ListingId::from("7")),
                }),
            })
            .unwrap();
        assert!(draw(&screen).contains("Listing added"));
        let open = screen.on_key(key(KeyCode::Enter)).unwrap();
        assert!(matches!(open, Some(Action::Navigate(Route::Detail(ref id))) if id.as_str() == "7"));
    }

    #[test]
    fn found_fields_show_and_clear_when_the_link_changes() {
        let mut screen = mounted();
        type_text(&mut screen, "http://y/");
        screen.on_key(ctrl('f')).unwrap();
        screen
            .on_action(&Action::DiscoveryFinished {
                link: "http://y/".into(),
                result: Ok(found()),
            })
            .unwrap();
        let text = draw(&screen);
        assert!(text.contains("Milano Via Tortona 12 (Navigli)"), "{text}");
        assert!(text.contains("3 rooms · 80 m² · cost 1400"), "{text}");

        screen.on_key(key(KeyCode::Backspace)).unwrap();
        assert!(!draw(&screen).contains("Milano"));
    }

    #[test]
    fn late_discovery_for_an_old_link_is_dropped() {
        let mut screen = mounted();
        type_text(&mut screen, "http://a/");
        screen.on_key(ctrl('f')).unwrap();
        type_text(&mut screen, "b");
        screen
            .on_action(&Action::DiscoveryFinished {
                link: "http://a/".into(),
                result: Ok(found()),
            })
            .unwrap();
        assert_eq!(screen.form.discovered(), None);
    }

    #[test]
    fn empty_link_is_refused_locally() {
        let mut screen = mounted();
        assert!(screen.on_key(ctrl('s')).unwrap().is_none());
        assert!(draw(&screen).contains("a link is required"));
        assert!(screen.captures_input());
    }

    #[test]
    fn vote_field_takes_digits_and_arrows() {
        let mut screen = mounted();
        screen.on_key(key(KeyCode::Tab)).unwrap();
        type_text(&mut screen, "8");
        screen.on_key(key(KeyCode::Right)).unwrap();
        assert_eq!(screen.form.vote(), Vote::new(9));
        type_text(&mut screen, "10");
        assert_eq!(screen.form.vote(), Vote::MAX);
    }

    #[test]
    fn failure_is_final_until_remount() {
        let mut screen = mounted();
        type_text(&mut screen, "http://z/");
        let Some(Action::Run(command)) = screen.on_key(ctrl('s')).unwrap() else {
            panic!("expected insert");
        };
        screen
            .on_action(&Action::CommandFinished {
                command: command.clone(),
                result: Err(CoreError::Mutation {
                    operation: "insert",
                    message: "HTTP 500: boom".into(),
                    cause: FailureCause::Status(500),
                }),
            })
            .unwrap();
        assert!(draw(&screen).contains("Failed to insert listing: HTTP 500: boom"));
        assert!(screen.on_key(key(KeyCode::Char('x'))).unwrap().is_none());
        assert!(!screen.captures_input());

        screen.on_action(&Action::Navigate(Route::Insert)).unwrap();
        assert!(screen.captures_input());
        assert_eq!(screen.form.link(), "");

        // A result for the abandoned form changes nothing.
        screen
            .on_action(&Action::CommandFinished {
                command,
                result: Ok(CommandResult::Inserted { id: None }),
            })
            .unwrap();
        assert!(screen.form.is_editing());
    }
}
