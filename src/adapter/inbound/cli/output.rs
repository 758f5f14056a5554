//! Astral-style CLI output formatting.
//!
//! Provides consistent terminal output with colored symbols and structured
//! formatting. Colors follow the `--color` flag through owo-colors'
//! global override, and are dropped when the stream is not a terminal.

use std::fmt::Display;

use owo_colors::{OwoColorize, Stream};

use super::command::ColorChoice;

/// Apply the color mode chosen on the command line.
pub fn configure(color: &ColorChoice) {
    match color {
        ColorChoice::Auto => owo_colors::unset_override(),
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
    }
}

/// Print the application header with name and version.
pub fn header(version: &str) {
    println!(
        "{} {}",
        "botdeck".if_supports_color(Stream::Stdout, |s| s.bold()),
        version.if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
    println!();
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    println!(
        "  {:<18} {}",
        label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
        value
    );
}

/// Print a success line.
pub fn success(message: &str) {
    println!("  {} {}", "✓".if_supports_color(Stream::Stdout, |s| s.green()), message);
}

/// Print a warning line.
pub fn warning(message: &str) {
    println!("  {} {}", "⚠".if_supports_color(Stream::Stdout, |s| s.yellow()), message);
}

/// Print an error line.
pub fn error(message: &str) {
    eprintln!("  {} {}", "×".if_supports_color(Stream::Stderr, |s| s.red()), message);
}

/// Print a section header.
pub fn section(title: &str) {
    println!();
    println!("{}", title.if_supports_color(Stream::Stdout, |s| s.bold()));
}

/// Clear the terminal between menus.
pub fn clear() {
    print!("\x1B[2J\x1B[1;1H");
}

/// Format a positive value in green.
pub fn positive(value: impl Display) -> String {
    format!("{}", value.to_string().if_supports_color(Stream::Stdout, |s| s.green()))
}

/// Format a negative value in red.
pub fn negative(value: impl Display) -> String {
    format!("{}", value.to_string().if_supports_color(Stream::Stdout, |s| s.red()))
}

/// Format a highlighted value in cyan.
pub fn highlight(value: impl Display) -> String {
    format!("{}", value.to_string().if_supports_color(Stream::Stdout, |s| s.cyan()))
}

/// Format a dimmed/muted value.
pub fn muted(value: impl Display) -> String {
    format!("{}", value.to_string().if_supports_color(Stream::Stdout, |s| s.dimmed()))
}

/// Braille spinner animation frames (Astral-style).
const BRAILLE_SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Create and start a progress spinner with Astral-style braille animation.
pub fn spinner(message: &str) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new_spinner();
    if let Ok(style) = indicatif::ProgressStyle::default_spinner()
        .tick_strings(BRAILLE_SPINNER)
        .template("  {spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Stop a spinner and remove it from the terminal.
pub fn spinner_clear(pb: &indicatif::ProgressBar) {
    pb.finish_and_clear();
}
