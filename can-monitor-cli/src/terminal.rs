//! Full-screen terminal handling
//!
//! Raw mode + alternate screen while the view is up, and a watcher thread that
//! turns quit keys into a stop message for the refresh loop. Key events come from
//! the controlling terminal, so this works while stdin carries the frame stream.

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use crossterm::cursor::{Hide, MoveTo, MoveToNextLine, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

/// Restores the terminal when dropped
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)
            .context("Failed to switch to alternate screen")?;
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Redraw the whole screen with the given lines
pub fn draw(lines: &[String]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    queue!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;
    for line in lines {
        queue!(stdout, Print(line), MoveToNextLine(1))?;
    }
    stdout.flush()
}

fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Watch for quit keys on a background thread and send on `stop` when one arrives
///
/// If the terminal cannot be read the watcher also sends `stop`, since there
/// would be no other way to end the view.
pub fn spawn_quit_watcher(stop: Sender<()>) -> Result<()> {
    thread::Builder::new()
        .name("keys".to_string())
        .spawn(move || loop {
            match event::poll(Duration::from_millis(100)) {
                Ok(false) => continue,
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if is_quit_key(&key) => {
                        log::debug!("Quit key pressed");
                        let _ = stop.send(());
                        return;
                    }
                    Ok(_) => continue,
                    Err(e) => {
                        log::error!("Failed to read terminal event: {}", e);
                        let _ = stop.send(());
                        return;
                    }
                },
                Err(e) => {
                    log::error!("Failed to poll terminal events: {}", e);
                    let _ = stop.send(());
                    return;
                }
            }
        })
        .context("Failed to spawn key watcher")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);

        assert!(is_quit_key(&q));
        assert!(is_quit_key(&esc));
        assert!(is_quit_key(&ctrl_c));
        assert!(!is_quit_key(&c));
        assert!(!is_quit_key(&x));
    }
}
