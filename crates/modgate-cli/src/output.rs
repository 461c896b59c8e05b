//! Colored terminal output for CLI commands.
//!
//! Uses `termcolor`. Respects the `NO_COLOR` environment variable and the
//! `--color` flag.

use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Resolve `ColorChoice` from CLI flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(flag: Option<&str>) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match flag {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Styled writer over stdout and stderr.
pub struct StyledOutput {
    stdout: StandardStream,
    stderr: StandardStream,
}

impl StyledOutput {
    /// Create a new styled output with the given color choice.
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(choice),
            stderr: StandardStream::stderr(choice),
        }
    }

    /// Write text to stdout with a specific color and weight.
    pub fn write_styled(&mut self, text: &str, color: Option<Color>, bold: bool) {
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        let _ = self.stdout.set_color(&spec);
        let _ = write!(self.stdout, "{}", text);
        let _ = self.stdout.reset();
    }

    /// Green bold text.
    pub fn success(&mut self, text: &str) {
        self.write_styled(text, Some(Color::Green), true);
    }

    /// Cyan text.
    pub fn info(&mut self, text: &str) {
        self.write_styled(text, Some(Color::Cyan), false);
    }

    /// Bold text.
    pub fn bold(&mut self, text: &str) {
        self.write_styled(text, None, true);
    }

    /// Plain text (no color).
    pub fn plain(&mut self, text: &str) {
        let _ = write!(self.stdout, "{}", text);
    }

    /// Newline.
    pub fn newline(&mut self) {
        let _ = writeln!(self.stdout);
    }

    /// Stream diagnostics are rendered to.
    pub fn stderr(&mut self) -> &mut StandardStream {
        &mut self.stderr
    }

    /// Red bold "error:" prefix on stderr, followed by the message.
    pub fn stderr_error(&mut self, msg: &str) {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Red)).set_bold(true);
        let _ = self.stderr.set_color(&spec);
        let _ = write!(self.stderr, "error");
        let _ = self.stderr.reset();
        let _ = writeln!(self.stderr, ": {}", msg);
    }

    /// Flush both streams.
    pub fn flush(&mut self) {
        let _ = self.stdout.flush();
        let _ = self.stderr.flush();
    }
}
