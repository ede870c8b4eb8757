//! Terminal logging with colored stage prefixes.
//!
//! - `log!` prints one line per event, prefixed by the stage that emitted it
//! - `Progress` draws a single in-place bar while the output is written
//! - `use_stderr` moves both to stderr when stdout carries `--dump` JSON
//!
//! # Example
//!
//! ```ignore
//! log!("collections"; "{} members in `{}`", count, name);
//! log!("warn"; "order {} used twice in `{}`", order, lang);
//!
//! let progress = Progress::new("write", files.len());
//! progress.inc();
//! progress.finish();
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{Write, stderr, stdout},
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Set while a progress bar occupies the line below the cursor
static BAR_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Set when stdout is reserved for machine-readable output (`--dump`)
static TO_STDERR: AtomicBool = AtomicBool::new(false);

// Bar format: "[write] [████░░░░] 42/100"

/// `[` + `]` + trailing space around the module name
const PREFIX_OVERHEAD: usize = 3;
/// " []" around the bar plus the space before the counter
const BAR_OVERHEAD: usize = 4;
const MIN_BAR_WIDTH: usize = 10;
const MAX_BAR_WIDTH: usize = 40;

/// Send every log line and progress bar to stderr from now on.
pub fn use_stderr() {
    TO_STDERR.store(true, Ordering::SeqCst);
}

/// Run `$body` with `$out` bound to the locked log stream.
macro_rules! with_output {
    (|$out:ident| $body:block) => {
        if TO_STDERR.load(Ordering::SeqCst) {
            let mut $out = stderr().lock();
            $body
        } else {
            let mut $out = stdout().lock();
            $body
        }
    };
}

fn terminal_width() -> usize {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120)) as usize
}

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Print `message` behind a colored `[module]` prefix.
///
/// Single-line messages are truncated to the terminal width.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let max_len = terminal_width().saturating_sub(module.len() + PREFIX_OVERHEAD);
    let message = if message.contains('\n') {
        message
    } else {
        truncate_str(message, max_len)
    };

    let bar_active = BAR_ACTIVE.load(Ordering::SeqCst);
    with_output!(|out| {
        if bar_active {
            execute!(out, cursor::MoveUp(1)).ok();
            execute!(out, Clear(ClearType::FromCursorDown)).ok();
        } else {
            execute!(out, Clear(ClearType::UntilNewLine)).ok();
        }

        writeln!(out, "{prefix} {message}").ok();
        if bar_active {
            // Re-reserve the bar line; the next `inc` redraws it
            writeln!(out).ok();
        }
        out.flush().ok();
    });
}

fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "error" => prefix.bright_red().bold(),
        "warn" => prefix.bright_magenta().bold(),
        "build" | "write" => prefix.bright_green().bold(),
        "init" => prefix.bright_blue().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Cut `s` to at most `max_len` bytes on a character boundary.
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Progress
// ============================================================================

/// One progress bar drawn in place on the line below the log output.
///
/// `inc` may be called from rayon workers; redraws are serialized.
pub struct Progress {
    prefix: ColoredString,
    prefix_len: usize,
    total: usize,
    current: AtomicUsize,
    lock: Mutex<()>,
}

impl Progress {
    pub fn new(module: &str, total: usize) -> Self {
        with_output!(|out| {
            writeln!(out).ok();
            out.flush().ok();
        });
        BAR_ACTIVE.store(true, Ordering::SeqCst);

        Self {
            prefix: colorize_prefix(module),
            prefix_len: module.len() + PREFIX_OVERHEAD,
            total,
            current: AtomicUsize::new(0),
            lock: Mutex::new(()),
        }
    }

    pub fn inc(&self) {
        let current = self.current.fetch_add(1, Ordering::Relaxed) + 1;
        self.display(current);
    }

    fn display(&self, current: usize) {
        let _guard = self.lock.lock().ok();

        let counter = format!("{current}/{}", self.total);
        let bar = render_bar(
            current,
            self.total,
            bar_width(terminal_width(), self.prefix_len, counter.len()),
        );

        with_output!(|out| {
            execute!(out, cursor::MoveUp(1)).ok();
            execute!(out, Clear(ClearType::CurrentLine)).ok();
            write!(out, "{} [{bar}] {counter}", self.prefix).ok();
            execute!(out, cursor::MoveDown(1)).ok();
            write!(out, "\r").ok();
            out.flush().ok();
        });
    }

    /// Clear the bar line and release it for regular logging.
    pub fn finish(&self) {
        if !BAR_ACTIVE.swap(false, Ordering::SeqCst) {
            return;
        }
        let _guard = self.lock.lock().ok();
        with_output!(|out| {
            execute!(out, cursor::MoveUp(1)).ok();
            execute!(out, Clear(ClearType::CurrentLine)).ok();
            out.flush().ok();
        });
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish();
    }
}

fn bar_width(terminal: usize, prefix_len: usize, counter_len: usize) -> usize {
    terminal
        .saturating_sub(prefix_len + BAR_OVERHEAD + counter_len)
        .clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH)
}

fn render_bar(current: usize, total: usize, width: usize) -> String {
    let filled = if total > 0 {
        (current.min(total) * width) / total
    } else {
        0
    };
    "█".repeat(filled) + &"░".repeat(width - filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str_fits() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_str_cuts() {
        assert_eq!(truncate_str("hello world", 5), "hello");
        assert_eq!(truncate_str("hello", 0), "");
    }

    #[test]
    fn test_truncate_str_unicode_boundary() {
        // "é" is 2 bytes; cutting inside it backs off to the boundary
        assert_eq!(truncate_str("café", 4), "caf");
        assert_eq!(truncate_str("café", 5), "café");
    }

    #[test]
    fn test_bar_width_clamped() {
        assert_eq!(bar_width(20, 8, 5), MIN_BAR_WIDTH);
        assert_eq!(bar_width(500, 8, 5), MAX_BAR_WIDTH);
        assert_eq!(bar_width(40, 8, 5), 23);
    }

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar(0, 4, 4), "░░░░");
        assert_eq!(render_bar(2, 4, 4), "██░░");
        assert_eq!(render_bar(4, 4, 4), "████");
        // Overshoot never panics
        assert_eq!(render_bar(9, 4, 4), "████");
        assert_eq!(render_bar(0, 0, 3), "░░░");
    }

    #[test]
    fn test_use_stderr_keeps_stdout_clean() {
        use_stderr();
        assert!(TO_STDERR.load(Ordering::SeqCst));

        // Both writers run against stderr without panicking
        log("build", "routed to stderr");
        let progress = Progress::new("write", 1);
        progress.inc();
        progress.finish();
    }
}
