//! Reporting sink
//!
//! Every validated configuration produces one success or failure line.
//! Duplicate submit names add one detail line per duplicate.

use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};

/// Status of a report line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStatus {
    Success,
    Failure,
    Detail,
}

/// One line of checker output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub status: LineStatus,
    pub message: String,
}

/// Destination for checker output
pub trait Reporter {
    fn line(&mut self, status: LineStatus, message: &str);

    fn success(&mut self, message: &str) {
        self.line(LineStatus::Success, message);
    }

    fn failure(&mut self, message: &str) {
        self.line(LineStatus::Failure, message);
    }

    /// Indented continuation of the preceding line
    fn detail(&mut self, message: &str) {
        self.line(LineStatus::Detail, message);
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn line(&mut self, status: LineStatus, message: &str) {
        (**self).line(status, message);
    }
}

/// Console output with `:)` / `:(` markers
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
}

impl ConsoleReporter {
    /// Report to stdout. Color follows `colored`'s global override.
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn format(status: LineStatus, message: &str) -> String {
        match status {
            LineStatus::Success => format!("{} {}", ":)".green(), message),
            LineStatus::Failure => format!("{} {}", ":(".red(), message),
            LineStatus::Detail => format!("  - {}", message),
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn line(&mut self, status: LineStatus, message: &str) {
        let text = Self::format(status, message);
        if let Err(e) = writeln!(self.out, "{}", text) {
            log::warn!("failed to write report line: {}", e);
        }
    }
}

/// Collects report lines in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    lines: Vec<ReportLine>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<ReportLine> {
        self.lines
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReportLine> {
        self.lines.iter().filter(|l| l.status == LineStatus::Failure)
    }

    pub fn successes(&self) -> impl Iterator<Item = &ReportLine> {
        self.lines.iter().filter(|l| l.status == LineStatus::Success)
    }
}

impl Reporter for MemoryReporter {
    fn line(&mut self, status: LineStatus, message: &str) {
        self.lines.push(ReportLine {
            status,
            message: message.to_string(),
        });
    }
}
