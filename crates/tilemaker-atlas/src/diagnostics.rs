//! Run diagnostics: counted warnings and errors, summarised at the end of a run.
//!
//! Every report is also emitted as a `tracing` event when it happens, so a
//! verbose console shows problems in context while the summary groups them.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// How bad a reported problem is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// The file was skipped or adjusted; the output is still usable.
    Warning,
    /// The file could not be used at all.
    Error,
}

/// What kind of problem was reported; messages are grouped by class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticClass {
    /// A file matched no known tile.
    UnusedFile,
    /// A second file resolved to an already occupied cell.
    DuplicateFile,
    /// A file's contents were copied to a paired tile.
    SharedFile,
    /// A file could not be read or decoded.
    ReadError,
    /// Width or height failed the power-of-two or aspect rules.
    BadDimensions,
    /// A material channel image holds only its default value.
    DefaultChannel,
    /// A bump map carries no variation.
    FlatBumpMap,
    /// A bump map is neither a recognisable normal map nor a height field.
    UnknownBumpFormat,
    /// An auxiliary channel exists for a tile that has no color image, or the reverse.
    MissingCounterpart,
    /// Legacy naming forced a best-guess swap of two files.
    NamingSwap,
    /// Requested animation frame does not exist.
    FrameOutOfRange,
    /// Color content does not match the tile's expectations (alpha, decals).
    ContentHint,
    /// An atlas could not be written.
    WriteFailed,
}

impl DiagnosticClass {
    fn label(self) -> &'static str {
        match self {
            DiagnosticClass::UnusedFile => "unused files",
            DiagnosticClass::DuplicateFile => "duplicate files",
            DiagnosticClass::SharedFile => "shared files",
            DiagnosticClass::ReadError => "read errors",
            DiagnosticClass::BadDimensions => "bad dimensions",
            DiagnosticClass::DefaultChannel => "default-valued channels",
            DiagnosticClass::FlatBumpMap => "flat bump maps",
            DiagnosticClass::UnknownBumpFormat => "unrecognised bump maps",
            DiagnosticClass::MissingCounterpart => "missing counterparts",
            DiagnosticClass::NamingSwap => "naming swaps",
            DiagnosticClass::FrameOutOfRange => "frame out of range",
            DiagnosticClass::ContentHint => "content hints",
            DiagnosticClass::WriteFailed => "write failures",
        }
    }
}

/// A single reported problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub class: DiagnosticClass,
    pub message: String,
}

/// Accumulates diagnostics for one run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    warnings: usize,
    errors: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning.
    pub fn warn(&mut self, class: DiagnosticClass, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(class = ?class, "{message}");
        self.warnings += 1;
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            class,
            message,
        });
    }

    /// Records an error.
    pub fn error(&mut self, class: DiagnosticClass, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(class = ?class, "{message}");
        self.errors += 1;
        self.entries.push(Diagnostic {
            severity: Severity::Error,
            class,
            message,
        });
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of reports of the given class.
    pub fn count(&self, class: DiagnosticClass) -> usize {
        self.entries.iter().filter(|d| d.class == class).count()
    }

    /// Returns `true` if nothing was reported.
    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    /// Human-readable end-of-run summary.
    ///
    /// Reports are grouped by severity and class; identical messages within a
    /// class are printed once with a repeat count.
    pub fn summary(&self) -> String {
        let mut groups: BTreeMap<(Severity, DiagnosticClass), Vec<(&str, usize)>> =
            BTreeMap::new();
        for d in &self.entries {
            let messages = groups.entry((d.severity, d.class)).or_default();
            match messages.iter_mut().find(|(m, _)| *m == d.message) {
                Some((_, n)) => *n += 1,
                None => messages.push((&d.message, 1)),
            }
        }

        let mut out = String::new();
        for ((severity, class), messages) in groups.iter().rev() {
            let tag = match severity {
                Severity::Error => "ERROR",
                Severity::Warning => "WARN",
            };
            let total: usize = messages.iter().map(|(_, n)| n).sum();
            let _ = writeln!(out, "{tag} {} ({total}):", class.label());
            for (message, n) in messages {
                if *n > 1 {
                    let _ = writeln!(out, "  {message} (x{n})");
                } else {
                    let _ = writeln!(out, "  {message}");
                }
            }
        }
        let _ = write!(
            out,
            "{} error(s), {} warning(s)",
            self.errors, self.warnings
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut d = Diagnostics::new();
        d.warn(DiagnosticClass::UnusedFile, "a.png not used");
        d.warn(DiagnosticClass::UnusedFile, "b.png not used");
        d.error(DiagnosticClass::ReadError, "c.png unreadable");
        assert_eq!(d.warning_count(), 2);
        assert_eq!(d.error_count(), 1);
        assert_eq!(d.count(DiagnosticClass::UnusedFile), 2);
        assert!(!d.is_clean());
    }

    #[test]
    fn test_summary_deduplicates_messages() {
        let mut d = Diagnostics::new();
        d.warn(DiagnosticClass::DuplicateFile, "same");
        d.warn(DiagnosticClass::DuplicateFile, "same");
        d.warn(DiagnosticClass::DuplicateFile, "other");
        let summary = d.summary();
        assert!(summary.contains("duplicate files (3)"));
        assert!(summary.contains("same (x2)"));
        assert_eq!(summary.matches("same").count(), 1);
        assert!(summary.ends_with("0 error(s), 3 warning(s)"));
    }

    #[test]
    fn test_errors_listed_before_warnings() {
        let mut d = Diagnostics::new();
        d.warn(DiagnosticClass::UnusedFile, "w");
        d.error(DiagnosticClass::BadDimensions, "e");
        let summary = d.summary();
        let e = summary.find("ERROR").unwrap();
        let w = summary.find("WARN").unwrap();
        assert!(e < w);
    }
}
