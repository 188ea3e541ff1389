//! Colored terminal output shared by the commands.
//!
//! Uses `termcolor` for cross-platform colored output. Respects the
//! `NO_COLOR` environment variable and the `--color` flag.

use std::io::Write;
use svecl_plugin::Diagnostic;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Resolve `ColorChoice` from the CLI flag and environment.
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

/// Severity label of a printed diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    fn color(self) -> Color {
        match self {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
        }
    }
}

/// Results go to stdout, diagnostics to stderr.
pub struct StyledOutput {
    stdout: StandardStream,
    stderr: StandardStream,
}

impl StyledOutput {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(choice),
            stderr: StandardStream::stderr(choice),
        }
    }

    fn write_styled(stream: &mut StandardStream, text: &str, color: Option<Color>, bold: bool) {
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        let _ = stream.set_color(&spec);
        let _ = write!(stream, "{}", text);
        let _ = stream.reset();
    }

    /// Green bold text.
    pub fn success(&mut self, text: &str) {
        Self::write_styled(&mut self.stdout, text, Some(Color::Green), true);
    }

    /// Cyan text.
    pub fn info(&mut self, text: &str) {
        Self::write_styled(&mut self.stdout, text, Some(Color::Cyan), false);
    }

    /// Dim/gray text.
    pub fn dim(&mut self, text: &str) {
        Self::write_styled(&mut self.stdout, text, Some(Color::White), false);
    }

    pub fn plain(&mut self, text: &str) {
        let _ = write!(self.stdout, "{}", text);
    }

    pub fn newline(&mut self) {
        let _ = writeln!(self.stdout);
    }

    pub fn flush(&mut self) {
        let _ = self.stdout.flush();
        let _ = self.stderr.flush();
    }

    /// `error: <text>` on stderr.
    pub fn stderr_error(&mut self, text: &str) {
        Self::write_styled(&mut self.stderr, "error", Some(Color::Red), true);
        let _ = writeln!(self.stderr, ": {}", text);
    }

    /// A compiler diagnostic with its source line and an underline.
    pub fn diagnostic(&mut self, severity: Severity, diagnostic: &Diagnostic) {
        Self::write_styled(&mut self.stderr, severity.label(), Some(severity.color()), true);
        let _ = writeln!(self.stderr, ": {}", diagnostic.text);

        let Some(location) = &diagnostic.location else {
            return;
        };
        Self::write_styled(&mut self.stderr, "  --> ", Some(Color::Cyan), false);
        let _ = writeln!(
            self.stderr,
            "{}:{}:{}",
            location.file, location.line, location.column
        );

        let gutter = location.line.to_string();
        let _ = writeln!(self.stderr, "  {} | {}", gutter, location.line_text);

        let underline = format!(
            "{}{}",
            " ".repeat(location.column),
            "^".repeat(location.length.max(1))
        );
        let _ = write!(self.stderr, "  {} | ", " ".repeat(gutter.len()));
        Self::write_styled(&mut self.stderr, &underline, Some(severity.color()), true);
        let _ = writeln!(self.stderr);
    }
}
