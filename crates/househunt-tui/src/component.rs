//! The trait every screen implements.
//!
//! Screens own only view state. They never touch the network: anything
//! with side effects comes back out as an [`Action`] for the app to run.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::action::Action;

pub trait Component: Send {
    /// A key the app let through. The returned action is queued.
    fn on_key(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// React to a queued action; may queue one more.
    fn on_action(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect);

    /// Text entry in progress: keys bypass the global shortcuts (Ctrl+C
    /// still quits).
    fn captures_input(&self) -> bool {
        false
    }

    fn set_focused(&mut self, _focused: bool) {}

    /// Shown in the status bar while this screen is active.
    fn hints(&self) -> &'static str {
        ""
    }
}
