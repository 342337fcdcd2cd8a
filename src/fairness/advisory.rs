//! Advisory messages
//!
//! Advisories never change computed values. They are emitted through
//! `tracing` only when verbose output is enabled, optionally colourised,
//! and recorded so callers can inspect what was reported.

use colored::Colorize;
use std::cell::RefCell;

/// Severity of an advisory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Progress and ordinary notices
    Info,
    /// Something the user should double-check
    Warning,
}

/// One emitted advisory, uncoloured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub severity: Severity,
    pub message: String,
}

/// Emits advisories according to the verbosity and colour switches
#[derive(Debug)]
pub struct Advisor {
    verbose: bool,
    colorize: bool,
    emitted: RefCell<Vec<Advisory>>,
}

impl Advisor {
    pub fn new(verbose: bool, colorize: bool) -> Self {
        Self {
            verbose,
            colorize,
            emitted: RefCell::new(Vec::new()),
        }
    }

    /// Format a message the way it would be emitted
    pub fn render(&self, severity: Severity, message: &str) -> String {
        if !self.colorize {
            return message.to_string();
        }
        match severity {
            Severity::Info => message.truecolor(140, 140, 140).to_string(),
            Severity::Warning => message.truecolor(230, 180, 80).bold().to_string(),
        }
    }

    /// Progress step
    pub fn step(&self, message: &str) {
        self.advise(Severity::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.advise(Severity::Warning, message);
    }

    pub fn advise(&self, severity: Severity, message: &str) {
        if !self.verbose {
            return;
        }
        let text = self.render(severity, message);
        match severity {
            Severity::Info => tracing::info!("{}", text),
            Severity::Warning => tracing::warn!("{}", text),
        }
        self.emitted.borrow_mut().push(Advisory {
            severity,
            message: message.to_string(),
        });
    }

    /// Advisories emitted so far, in order
    pub fn into_advisories(self) -> Vec<Advisory> {
        self.emitted.into_inner()
    }
}
