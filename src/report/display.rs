use std::fmt;

use colored::Colorize;

use super::{Entry, Report, Severity};

impl Severity {
    fn label(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Deprecation => "deprecation",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    fn colored_label(&self) -> colored::ColoredString {
        match self {
            Severity::Info => self.label().cyan(),
            Severity::Deprecation => self.label().magenta(),
            Severity::Warning => self.label().yellow(),
            Severity::Error => self.label().red().bold(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.position.is_unset() {
            write!(f, "{}: {}", self.severity.colored_label(), self.message)?;
        } else {
            write!(
                f,
                "{} at {}:{}: {}",
                self.severity.colored_label(),
                self.position.line,
                self.position.column,
                self.message
            )?;
        }
        if !self.position.highlight.is_empty() {
            write!(f, "\n    {}", self.position.highlight.dimmed())?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.entries() {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}
