//! Map screen: mapped listings on a lat/lng canvas, one marker color
//! per vote, and a popup for the selected listing.
//!
//! The popup opens only once the canvas has been drawn with a real
//! area. Readiness is recorded during render and picked up on the next
//! tick, so selection, data and readiness may arrive in any order.

use std::cell::Cell;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::Canvas;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use tracing::debug;

use househunt_core::view::map::PopupChange;
use househunt_core::view::{Coordinate, Loadable, MapModel, MarkerStyle, PopupController};
use househunt_core::{Listing, QueryState, Route};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

const MIN_HALF_SPAN: f64 = 0.005;
const MAX_ZOOM: f64 = 64.0;

fn marker_color(style: MarkerStyle) -> Color {
    match style {
        MarkerStyle::Vote(v) => theme::vote_color(Some(v)),
        MarkerStyle::Unvoted => theme::vote_color(None),
    }
}

pub struct MapScreen {
    focused: bool,
    state: QueryState<Vec<Listing>>,
    model: MapModel,
    popup: PopupController,
    zoom: f64,
    pan: Coordinate,
    last_area: Cell<Rect>,
}

impl MapScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            state: QueryState::default(),
            model: MapModel::build(&[], None),
            popup: PopupController::new(),
            zoom: 1.0,
            pan: Coordinate { lat: 0.0, lng: 0.0 },
            last_area: Cell::new(Rect::default()),
        }
    }

    fn log_change(change: Option<PopupChange>) {
        if let Some(change) = change {
            debug!(?change, "map popup");
        }
    }

    fn rebuild(&mut self) {
        let listings = self.state.data.as_deref().map_or(&[][..], Vec::as_slice);
        self.model = MapModel::build(listings, self.popup.selected());
        let change = self.popup.set_markers(self.model.marker_ids().cloned());
        Self::log_change(change);
    }

    fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan = Coordinate { lat: 0.0, lng: 0.0 };
    }

    /// Half extents (lat, lng) that fit every marker around the center.
    fn half_span(&self, center: Coordinate) -> (f64, f64) {
        let (sw, ne) = self.model.bounds().unwrap_or((center, center));
        let lat = (ne.lat - center.lat).max(center.lat - sw.lat) * 1.1;
        let lng = (ne.lng - center.lng).max(center.lng - sw.lng) * 1.1;
        (
            lat.max(MIN_HALF_SPAN) / self.zoom,
            lng.max(MIN_HALF_SPAN) / self.zoom,
        )
    }

    /// Visible `[min, max]` bounds for x (lng) and y (lat).
    fn viewport(&self) -> Option<([f64; 2], [f64; 2])> {
        let center = self.model.center?;
        let (half_lat, half_lng) = self.half_span(center);
        let lat = center.lat + self.pan.lat;
        let lng = center.lng + self.pan.lng;
        Some((
            [lng - half_lng, lng + half_lng],
            [lat - half_lat, lat + half_lat],
        ))
    }

    fn pan_by(&mut self, dlat: f64, dlng: f64) {
        let Some(center) = self.model.center else {
            return;
        };
        let (half_lat, half_lng) = self.half_span(center);
        self.pan.lat += dlat * half_lat * 0.25;
        self.pan.lng += dlng * half_lng * 0.25;
    }

    /// Route selecting the next (or previous) marker in collection order.
    fn cycle_selection(&self, forward: bool) -> Option<Action> {
        let ids: Vec<_> = self.model.marker_ids().collect();
        if ids.is_empty() {
            return None;
        }
        let current = self
            .popup
            .selected()
            .and_then(|sel| ids.iter().position(|id| *id == sel));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => ids.len() - 1,
            (Some(i), true) => (i + 1) % ids.len(),
            (Some(i), false) => (i + ids.len() - 1) % ids.len(),
        };
        ids.get(next)
            .map(|id| Action::Navigate(Route::map_selecting(id)))
    }

    fn render_canvas(&self, frame: &mut Frame, area: Rect) {
        let Some((x_bounds, y_bounds)) = self.viewport() else {
            return;
        };
        let selected = self.popup.selected();
        let canvas = Canvas::default()
            .marker(symbols::Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                for marker in &self.model.markers {
                    let glyph = if selected == Some(&marker.id) { "◉" } else { "●" };
                    ctx.print(
                        marker.position.lng,
                        marker.position.lat,
                        Span::styled(glyph, Style::default().fg(marker_color(marker.style))),
                    );
                }
            });
        frame.render_widget(canvas, area);
        self.last_area.set(area);
    }

    fn render_popup(&self, frame: &mut Frame, area: Rect) {
        let Some(marker) = self.popup.open_popup().and_then(|id| self.model.marker(id)) else {
            return;
        };
        let lines = marker.popup.lines();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = u16::try_from(longest + 4)
            .unwrap_or(u16::MAX)
            .clamp(20, area.width.max(20))
            .min(area.width);
        let height = 6.min(area.height);
        let rect = Rect::new(area.right().saturating_sub(width), area.y, width, height);

        let text: Vec<Line> = lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let style = if i == 0 {
                    Style::default().fg(theme::SKY)
                } else {
                    Style::default().fg(theme::PLASTER)
                };
                Line::from(Span::styled(line, style))
            })
            .collect();
        let block = Block::default()
            .title(format!(" {} ", marker.id))
            .title_style(theme::heading())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(marker_color(marker.style)))
            .style(Style::default().bg(theme::BG_NIGHT));

        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(text).wrap(Wrap { trim: true }).block(block),
            rect,
        );
    }

    fn render_message(frame: &mut Frame, area: Rect, message: &str, style: Style) {
        let y = area.y + area.height / 2;
        let line = Rect::new(area.x, y, area.width, 1.min(area.height));
        frame.render_widget(Paragraph::new(Span::styled(message.to_owned(), style)).centered(), line);
    }
}

impl Default for MapScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for MapScreen {
    fn on_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.pan_by(1.0, 0.0);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.pan_by(-1.0, 0.0);
                None
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.pan_by(0.0, -1.0);
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.pan_by(0.0, 1.0);
                None
            }
            KeyCode::Char('+' | '=') => {
                self.zoom = (self.zoom * 2.0).min(MAX_ZOOM);
                None
            }
            KeyCode::Char('-') => {
                self.zoom = (self.zoom / 2.0).max(1.0);
                None
            }
            KeyCode::Char('r') => {
                self.reset_view();
                None
            }
            KeyCode::Char('c') => {
                Self::log_change(self.popup.dismiss());
                None
            }
            KeyCode::Char('n') => self.cycle_selection(true),
            KeyCode::Char('p') => self.cycle_selection(false),
            KeyCode::Enter => self
                .popup
                .selected()
                .map(|id| Action::Navigate(Route::detail(id))),
            _ => None,
        };
        Ok(action)
    }

    fn on_action(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Navigate(Route::Map { selected }) => {
                Self::log_change(self.popup.set_selected(selected.clone()));
                self.reset_view();
                self.rebuild();
            }
            Action::ListingsUpdated(state) => {
                self.state = state.clone();
                self.rebuild();
            }
            Action::Tick => {
                if !self.popup.is_map_ready() && self.last_area.get().area() > 0 {
                    Self::log_change(self.popup.set_map_ready(true));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = format!(" Map ({} mapped) ", self.model.markers.len());
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

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
        let (body, hints) = (layout[0], layout[1]);

        match Loadable::from_state(&self.state) {
            Loadable::Loading => Self::render_message(
                frame,
                body,
                "Loading listings…",
                Style::default().fg(theme::PLASTER),
            ),
            Loadable::Failed(message) => {
                Self::render_message(frame, body, &message, theme::error_text());
            }
            Loadable::Ready(_) if self.model.is_empty() => Self::render_message(
                frame,
                body,
                "No mapped listings",
                Style::default().fg(theme::PLASTER),
            ),
            Loadable::Ready(_) => {
                self.render_canvas(frame, body);
                self.render_popup(frame, body);
            }
        }

        let mut spans = vec![Span::raw(" ")];
        for (key, label) in [
            ("←↑↓→ ", "pan  "),
            ("+/- ", "zoom  "),
            ("n/p ", "select  "),
            ("Enter ", "open  "),
            ("c ", "close popup"),
        ] {
            spans.push(Span::styled(key, theme::hint_key()));
            spans.push(Span::styled(label, theme::hint_text()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), hints);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            // Leaving the map tears the canvas down.
            self.last_area.set(Rect::default());
            Self::log_change(self.popup.set_map_ready(false));
        }
    }

    fn hints(&self) -> &'static str {
        "n/p select  Enter open"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use househunt_core::{ListingId, QueryStatus, Vote};

    use super::*;
    use crate::testing::{buffer_text, render};

    fn listing(id: &str, coords: Option<(f64, f64)>) -> Listing {
        Listing {
            id: ListingId::from(id),
            link: format!("http://example.org/{id}/"),
            vote: Some(Vote::new(8)),
            comment: Some(format!("note {id}")),
            city: None,
            zone: None,
            street: Some(format!("Street {id}")),
            lat: coords.map(|c| c.0),
            lng: coords.map(|c| c.1),
            rooms_number: Some(2),
            square_meters: Some(50),
        }
    }

    fn loaded(listings: Vec<Listing>) -> Action {
        Action::ListingsUpdated(QueryState {
            data: Some(Arc::new(listings)),
            ..QueryState::default()
        })
    }

    fn select(id: Option<&str>) -> Action {
        Action::Navigate(Route::Map {
            selected: id.map(ListingId::from),
        })
    }

    fn draw(screen: &MapScreen) -> String {
        buffer_text(&render(70, 20, |f| screen.render(f, f.area())))
    }

    fn two_listings() -> Vec<Listing> {
        vec![
            listing("a", Some((45.0, 9.0))),
            listing("b", Some((45.1, 9.2))),
            listing("c", None),
        ]
    }

    #[test]
    fn popup_waits_for_the_map_to_be_drawn() {
        let mut screen = MapScreen::new();
        screen.set_focused(true);
        screen.on_action(&select(Some("b"))).unwrap();
        screen.on_action(&loaded(two_listings())).unwrap();

        // Selection and data are in, but nothing has been drawn yet.
        screen.on_action(&Action::Tick).unwrap();
        assert_eq!(screen.popup.open_popup(), None);

        let first = draw(&screen);
        assert!(!first.contains("http://example.org/b/"));
        assert!(first.contains("◉"), "selected marker drawn\n{first}");

        screen.on_action(&Action::Tick).unwrap();
        let text = draw(&screen);
        for needle in ["http://example.org/b/", "vote: 8", "Street b, 2 rooms, 50 m²", "note b"] {
            assert!(text.contains(needle), "missing {needle}\n{text}");
        }
    }

    #[test]
    fn selection_arriving_after_readiness_still_opens() {
        let mut screen = MapScreen::new();
        screen.set_focused(true);
        screen.on_action(&select(None)).unwrap();
        screen.on_action(&loaded(two_listings())).unwrap();
        draw(&screen);
        screen.on_action(&Action::Tick).unwrap();
        assert_eq!(screen.popup.open_popup(), None);

        screen.on_action(&select(Some("a"))).unwrap();
        assert_eq!(screen.popup.open_popup().map(ListingId::as_str), Some("a"));
    }

    #[test]
    fn unmapped_selection_opens_nothing() {
        let mut screen = MapScreen::new();
        screen.set_focused(true);
        screen.on_action(&select(Some("c"))).unwrap();
        screen.on_action(&loaded(two_listings())).unwrap();
        draw(&screen);
        screen.on_action(&Action::Tick).unwrap();
        assert_eq!(screen.popup.open_popup(), None);
        assert_eq!(screen.model.markers.len(), 2);
    }

    #[test]
    fn leaving_the_map_closes_the_popup() {
        let mut screen = MapScreen::new();
        screen.set_focused(true);
        screen.on_action(&select(Some("a"))).unwrap();
        screen.on_action(&loaded(two_listings())).unwrap();
        draw(&screen);
        screen.on_action(&Action::Tick).unwrap();
        assert!(screen.popup.open_popup().is_some());

        screen.set_focused(false);
        assert_eq!(screen.popup.open_popup(), None);
    }

    #[test]
    fn empty_and_error_states() {
        let mut screen = MapScreen::new();
        screen.on_action(&loaded(vec![listing("c", None)])).unwrap();
        assert!(draw(&screen).contains("No mapped listings"));

        screen
            .on_action(&Action::ListingsUpdated(QueryState {
                status: QueryStatus::Error("Failed to load houses: timeout".into()),
                ..QueryState::default()
            }))
            .unwrap();
        assert!(draw(&screen).contains("Failed to load houses: timeout"));
    }

    #[test]
    fn cycling_and_opening_navigate() {
        let mut screen = MapScreen::new();
        screen.on_action(&select(None)).unwrap();
        screen.on_action(&loaded(two_listings())).unwrap();

        let next = screen
            .on_key(KeyEvent::from(KeyCode::Char('n')))
            .unwrap();
        assert!(matches!(next, Some(Action::Navigate(ref r)) if r.to_string() == "/map?houseId=a"));

        screen.on_action(&select(Some("b"))).unwrap();
        let wrap = screen
            .on_key(KeyEvent::from(KeyCode::Char('n')))
            .unwrap();
        assert!(matches!(wrap, Some(Action::Navigate(ref r)) if r.to_string() == "/map?houseId=a"));

        let open = screen.on_key(KeyEvent::from(KeyCode::Enter)).unwrap();
        assert!(matches!(open, Some(Action::Navigate(Route::Detail(ref id))) if id.as_str() == "b"));
    }
}
