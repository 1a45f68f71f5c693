//! Terminal output for the provisioning report

use std::io::{self, IsTerminal, Write};

use color_eyre::owo_colors::OwoColorize;
use domain_namespace::{ReportLevel, Reporter};

/// Writes status lines to stdout, coloured when attached to a terminal
#[derive(Debug, Clone, Copy)]
pub struct TerminalReporter {
    color: bool,
}

impl TerminalReporter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Colour only for an interactive stdout, and never when `NO_COLOR` is set
    pub fn detect(no_color_flag: bool) -> Self {
        let color = !no_color_flag
            && std::env::var_os("NO_COLOR").is_none()
            && io::stdout().is_terminal();
        Self::new(color)
    }

    pub fn render(&self, level: ReportLevel, message: &str) -> String {
        let prefix = match level {
            ReportLevel::Info => "ℹ️  ",
            ReportLevel::Success => "✅ ",
            ReportLevel::Warning => "⚠️  ",
            ReportLevel::Error => "❌ ",
            ReportLevel::Heading | ReportLevel::Plain => "",
        };
        let text = format!("{}{}", prefix, message);

        if !self.color || message.is_empty() {
            return text;
        }

        match level {
            ReportLevel::Info => text.blue().to_string(),
            ReportLevel::Success | ReportLevel::Heading => text.green().to_string(),
            ReportLevel::Warning => text.yellow().to_string(),
            ReportLevel::Error => text.red().to_string(),
            ReportLevel::Plain => text,
        }
    }
}

impl Reporter for TerminalReporter {
    fn emit(&self, level: ReportLevel, message: &str) {
        let line = self.render(level, message);
        let mut stdout = io::stdout().lock();
        // A closed stdout is not worth failing the run over
        let _ = writeln!(stdout, "{}", line);
    }
}
