//! Terminal lifecycle: raw mode, alternate screen, and restoring both
//! on exit or panic.

use std::io::{self, Stdout};

use color_eyre::eyre::Result;
use crossterm::{cursor, execute, terminal};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Size};

type Backend = CrosstermBackend<Stdout>;

/// Owns the terminal while the app runs. Dropping it restores the shell.
pub struct Tui {
    terminal: Terminal<Backend>,
}

impl Tui {
    /// Switch stdout into raw mode on the alternate screen.
    pub fn start() -> Result<Self> {
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        terminal.clear()?;
        Ok(Self { terminal })
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render).map(drop).map_err(Into::into)
    }

    /// Current size, or a conventional 80x24 when the backend can't tell.
    pub fn area(&self) -> Size {
        self.terminal.size().unwrap_or(Size::new(80, 24))
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        leave_terminal();
    }
}

/// Undo everything [`Tui::start`] did. Each step runs even when the
/// previous one fails.
fn leave_terminal() {
    let stdout = &mut io::stdout();
    let shown = execute!(stdout, cursor::Show);
    let left = execute!(stdout, terminal::LeaveAlternateScreen);
    let cooked = terminal::disable_raw_mode();
    if let Err(err) = shown.and(left).and(cooked) {
        tracing::warn!(error = %err, "terminal restore incomplete");
    }
}

/// Report errors through color-eyre and put the terminal back before a
/// panic message is printed.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, report_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();
    report_hook.install()?;

    let print_panic = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        leave_terminal();
        print_panic(info);
    }));
    Ok(())
}
