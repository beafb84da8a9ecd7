//! Interactive console helpers.

use std::io::{self, BufRead, IsTerminal, Write};

/// Wait for Enter so a console window does not close before the user reads it.
///
/// No-op when disabled or when stdin is not a terminal.
pub fn pause(enabled: bool) {
    if !enabled || !io::stdin().is_terminal() {
        return;
    }

    print!("Press Enter to continue . . . ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
