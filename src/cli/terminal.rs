//! Styling for registry output
//!
//! Colour is applied only when stdout supports it, so piped output stays
//! plain.

use owo_colors::{OwoColorize, colors::css};

/// Terminals narrower than this get the compact layouts.
const NARROW_COLUMNS: u16 = 60;

/// Whether stdout accepts ANSI colour.
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Whether the terminal is too narrow for the tabular layouts.
///
/// Unknown widths (for example when piped) count as wide.
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| width.0 < NARROW_COLUMNS)
}

/// A horizontal separator `width` characters long.
pub fn rule(width: usize) -> String {
    "─".repeat(width).dim()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    /// A change was applied.
    Success,
    /// A limit or condition the user should notice.
    Warning,
    /// Nothing changed, or filler text.
    Dim,
}

fn paint(text: &str, style: Style, enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }
    match style {
        Style::Success => text.fg::<css::Green>().to_string(),
        Style::Warning => text.fg::<css::Orange>().to_string(),
        Style::Dim => text.dimmed().to_string(),
    }
}

/// Styling helpers for command output.
pub trait Colorize {
    /// Green, for applied changes.
    fn success(&self) -> String;
    /// Amber, for limits.
    fn warning(&self) -> String;
    /// Dimmed, for no-ops and placeholders.
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint(self.as_ref(), Style::Success, supports_color())
    }

    fn warning(&self) -> String {
        paint(self.as_ref(), Style::Warning, supports_color())
    }

    fn dim(&self) -> String {
        paint(self.as_ref(), Style::Dim, supports_color())
    }
}
