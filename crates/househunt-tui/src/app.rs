//! Application core: event loop, routing, action dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use househunt_core::{Command, CommandResult, Controller, Route};

use crate::action::{Action, ConfirmAction, Toast, Tone};
use crate::component::Component;
use crate::data_bridge::{follow_listing, load_listings, spawn_data_bridge};
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::mode_switch::{cycle, mode_for_key, mode_switch};

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    /// Where the user is. Exactly one screen shows it.
    route: Route,
    /// Target of `GoBack`.
    previous_route: Option<Route>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    controller: Controller,
    /// Parent of every bridge task.
    data_cancel: CancellationToken,
    /// The bridge following the listing on the Detail screen.
    detail_cancel: Option<CancellationToken>,
    /// Blocks other input while set.
    pending_confirm: Option<ConfirmAction>,
    notification: Option<(Toast, Instant)>,
}

impl App {
    pub fn new(controller: Controller, route: Route) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            route,
            previous_route: None,
            screens: create_screens().into_iter().collect(),
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            controller,
            data_cancel: CancellationToken::new(),
            detail_cancel: None,
            pending_confirm: None,
            notification: None,
        }
    }

    /// Connect the data bridge and mount the starting route.
    fn start(&mut self) -> Result<()> {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        let cancel = self.data_cancel.clone();
        tokio::spawn(async move {
            spawn_data_bridge(controller, tx, cancel).await;
        });

        let route = self.route.clone();
        self.mount(&route)
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::start()?;
        let size = tui.area();
        self.start()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(route = %self.route, width = size.width, height = size.height, "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.dispatch_key(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        drop(tui);
        info!("TUI event loop ended");
        Ok(())
    }

    fn active_screen(&self) -> ScreenId {
        ScreenId::for_route(&self.route)
    }

    /// Global keys first, then the active screen. A screen capturing
    /// text input sees every key except Ctrl+C.
    fn dispatch_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        let active = self.active_screen();
        if let Some(screen) = self.screens.get_mut(&active) {
            if screen.captures_input() {
                return screen.on_key(key);
            }
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char(c)) => {
                if let Some(mode) = mode_for_key(c) {
                    return Ok(Some(Action::Navigate(mode.route())));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                let mode = cycle(self.route.mode(), true);
                return Ok(Some(Action::Navigate(mode.route())));
            }
            (_, KeyCode::BackTab) => {
                let mode = cycle(self.route.mode(), false);
                return Ok(Some(Action::Navigate(mode.route())));
            }
            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::GoBack)),
            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&active) {
            return screen.on_key(key);
        }
        Ok(None)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Resize(w, h) => debug!(width = w, height = h, "terminal resized"),
            Action::Render => {}

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, created)| created.elapsed() > NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
                let active = self.active_screen();
                self.forward(active, action)?;
            }

            Action::Navigate(route) => self.navigate(route.clone())?,

            Action::GoBack => {
                let target = self.previous_route.take().unwrap_or_default();
                self.action_tx.send(Action::Navigate(target))?;
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            // Data and results go to every screen so none goes stale.
            Action::ListingsUpdated(_)
            | Action::ListingUpdated { .. }
            | Action::CommandFinished { .. }
            | Action::DiscoveryFinished { .. } => {
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.on_action(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            Action::Run(command) => self.execute_command(command.clone()),
            Action::Discover(link) => self.discover(link.clone()),

            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_confirm(confirm)?;
                }
            }
            Action::ConfirmNo => self.pending_confirm = None,
            Action::RemoveConfirmed(_) => self.forward(ScreenId::List, action)?,

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }
        }
        Ok(())
    }

    /// Deliver `action` to one screen and queue its follow-up.
    fn forward(&mut self, id: ScreenId, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&id) {
            if let Some(follow_up) = screen.on_action(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn navigate(&mut self, route: Route) -> Result<()> {
        if route == self.route {
            return Ok(());
        }
        debug!(from = %self.route, to = %route, "navigate");

        let previous = std::mem::replace(&mut self.route, route.clone());
        let (from, to) = (ScreenId::for_route(&previous), ScreenId::for_route(&route));
        if from != to {
            if let Some(screen) = self.screens.get_mut(&from) {
                screen.set_focused(false);
            }
        }
        self.previous_route = Some(previous);
        self.mount(&route)
    }

    /// Focus the route's screen, start the reads it needs and hand it
    /// the route.
    fn mount(&mut self, route: &Route) -> Result<()> {
        let id = ScreenId::for_route(route);
        if let Some(screen) = self.screens.get_mut(&id) {
            screen.set_focused(true);
        }

        if let Some(cancel) = self.detail_cancel.take() {
            cancel.cancel();
        }
        match route {
            Route::Detail(listing) => {
                let cancel = self.data_cancel.child_token();
                tokio::spawn(follow_listing(
                    self.controller.clone(),
                    listing.clone(),
                    self.action_tx.clone(),
                    cancel.clone(),
                ));
                self.detail_cancel = Some(cancel);
            }
            Route::List | Route::Map { .. } => load_listings(&self.controller),
            Route::Insert => {}
        }

        self.forward(id, &Action::Navigate(route.clone()))
    }

    /// Run a write in the background and report back through the loop.
    fn execute_command(&self, command: Command) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let operation = command.operation();
            let result = controller.execute(command.clone()).await;
            let toast = match &result {
                Ok(done) => {
                    info!(operation, "command succeeded");
                    Toast::new(Tone::Success, success_message(done))
                }
                Err(e) => {
                    warn!(operation, error = %e, "command failed");
                    Toast::new(Tone::Error, format!("Could not {operation} listing"))
                }
            };
            let _ = tx.send(Action::Notify(toast));
            let _ = tx.send(Action::CommandFinished { command, result });
        });
    }

    fn discover(&self, link: String) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = controller.discover(&link).await;
            if let Err(e) = &result {
                debug!(%link, error = %e, "discovery finished without a result");
            }
            let _ = tx.send(Action::DiscoveryFinished { link, result });
        });
    }

    fn execute_confirm(&self, confirm: ConfirmAction) -> Result<()> {
        match confirm {
            ConfirmAction::RemoveListing { id, .. } => {
                self.action_tx.send(Action::RemoveConfirmed(id))?;
            }
        }
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // screen
            Constraint::Length(1), // mode switch
            Constraint::Length(1), // status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen()) {
            screen.render(frame, layout[0]);
        }
        frame.render_widget(mode_switch(self.route.mode()), layout[1]);
        self.render_status_bar(frame, layout[2]);

        if let Some((ref notification, _)) = self.notification {
            Self::render_notification(frame, area, notification);
        }
        if let Some(ref confirm) = self.pending_confirm {
            Self::render_confirm_dialog(frame, area, confirm);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let hints = self
            .screens
            .get(&self.active_screen())
            .map(|s| s.hints())
            .filter(|h| !h.is_empty());

        let mut spans = vec![
            Span::raw(" "),
            Span::styled(self.route.to_string(), theme::hint_key()),
            Span::styled(" │ ", theme::hint_text()),
            Span::styled(
                self.controller.config().api_url.to_string(),
                Style::default().fg(theme::SLATE),
            ),
        ];
        if let Some(hints) = hints {
            spans.push(Span::styled(format!(" │ {hints}"), theme::hint_text()));
        }
        spans.push(Span::styled(" │ ? help  q quit", theme::hint_text()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let width = 56u16.min(area.width.saturating_sub(4));
        let height = 19u16.min(area.height.saturating_sub(2));
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let help_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, help_area);
        let block = Block::default()
            .title(" Keys ")
            .title_style(theme::heading())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::frame_active())
            .style(Style::default().bg(theme::BG_NIGHT));
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            Line::from(Span::styled(
                format!("  {title}"),
                Style::default().fg(theme::SKY),
            ))
        };
        let row = |key: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<12}"), theme::hint_key()),
                Span::styled(what, theme::hint_text()),
            ])
        };

        let text = vec![
            section("Modes"),
            row("1 2 3", "Insert / List / Map"),
            row("Tab", "Next mode"),
            row("Esc", "Back"),
            Line::from(""),
            section("List"),
            row("j/k ↑/↓", "Move"),
            row("Enter", "Open details"),
            row("m / d", "Show on map / delete"),
            Line::from(""),
            section("Detail"),
            row("←/→  e", "Vote / edit comment"),
            row("u  x", "Update / discard draft"),
            Line::from(""),
            section("Map"),
            row("arrows +/-", "Pan / zoom"),
            row("n/p  c", "Select marker / close popup"),
            Line::from(Span::styled("  Esc or ? to close", theme::hint_text())),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let width = 50u16.min(area.width.saturating_sub(4));
        let height = 5u16.min(area.height);
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let dialog_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, dialog_area);
        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::heading())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::AMBER))
            .style(Style::default().bg(theme::BG_NIGHT));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let text = vec![
            Line::from(Span::styled(
                format!("  {}", confirm.prompt()),
                Style::default().fg(theme::PLASTER),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  y ", theme::hint_key()),
                Span::styled("confirm    ", theme::hint_text()),
                Span::styled("n ", theme::hint_key()),
                Span::styled("cancel", theme::hint_text()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    /// Toast in the bottom-right corner, above the status rows.
    fn render_notification(frame: &mut Frame, area: Rect, toast: &Toast) {
        let len = u16::try_from(toast.text.chars().count()).unwrap_or(u16::MAX);
        let width = len.saturating_add(6).clamp(20, 60).min(area.width);
        let height = 3u16;
        let x = area.x + area.width.saturating_sub(width + 1);
        let y = area.y + area.height.saturating_sub(height + 2);
        let toast_area = Rect::new(x, y, width, height.min(area.height));

        let (color, icon) = match toast.tone {
            Tone::Success => (theme::SAGE, "✓"),
            Tone::Error => (theme::BRICK, "✗"),
            Tone::Info => (theme::ROSE, "·"),
        };

        frame.render_widget(Clear, toast_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(theme::BG_NIGHT));
        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(color)),
            Span::styled(
                toast.text.as_str(),
                Style::default().fg(theme::PLASTER),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

fn success_message(result: &CommandResult) -> String {
    match result {
        CommandResult::Inserted { .. } => "Listing added".to_owned(),
        CommandResult::Updated { id } => format!("Listing {id} updated"),
        CommandResult::Removed { id } => format!("Listing {id} deleted"),
    }
}
