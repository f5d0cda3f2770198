//! Terminal lifecycle: raw mode, alternate screen, panic hook, and SIGTERM.

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use signal_hook::consts::SIGTERM;
use signal_hook::flag::register;
use std::io::{stdout, BufWriter, Stdout};
use std::panic;
use std::sync::{atomic::AtomicBool, Arc};

/// Crossterm backend over a buffered stdout, so each frame is a few large writes.
pub type Tui = Terminal<CrosstermBackend<BufWriter<Stdout>>>;

/// Enables raw mode and enters the alternate screen with mouse capture.
///
/// Pair every successful call with [`restore_tui`]; ratatui does not restore the
/// terminal on drop.
///
/// # Errors
///
/// Returns `Err` if raw mode cannot be enabled, the escape sequences cannot be
/// written, or `Terminal::new` fails to query the terminal size.
pub fn init_tui() -> std::io::Result<Tui> {
    let mut out = BufWriter::new(stdout());
    enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(out))
}

/// Leaves the alternate screen and disables raw mode. Idempotent.
///
/// # Errors
///
/// Returns `Err` if raw mode cannot be disabled or the escape sequences cannot be
/// written. The panic hook ignores this error.
pub fn restore_tui() -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Restores the terminal before the previous hook prints the panic message.
///
/// Install before [`init_tui`]. Without it a panic leaves the shell in raw mode
/// on the alternate screen, with the message hidden.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Best effort: we are already unwinding.
        let _ = restore_tui();
        original_hook(panic_info);
    }));
}

/// Returns a flag that flips to `true` on SIGTERM; the event loop polls it.
///
/// # Errors
///
/// Returns `Err` if the OS refuses to install the signal handler. Startup treats
/// that as fatal.
pub fn register_sigterm() -> std::io::Result<Arc<AtomicBool>> {
    let term = Arc::new(AtomicBool::new(false));
    // The handler only performs an atomic store, which is async-signal-safe.
    register(SIGTERM, Arc::clone(&term))?;
    Ok(term)
}
