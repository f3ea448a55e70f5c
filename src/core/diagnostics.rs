//! # Diagnostics
//!
//! Structured, line-scoped problems found while parsing a configuration file. The parser
//! never prints anything itself: it hands each [`Diagnostic`] to a [`DiagnosticSink`]
//! chosen by the caller, and message formatting only happens in the `Display` impl.

use std::fmt;

/// What went wrong, with the context needed to explain it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A `-` appeared before any command on its line. The line is dropped.
    MinusWithoutCommand,
    /// A tag appeared before any command on its line. The line is dropped.
    TagWithoutCommand {
        /// The tag text, without `@`.
        tag: String,
    },
    /// A bare `@`. The token is ignored.
    EmptyTag {
        /// The command the tag was attached to.
        command: String,
    },
    /// A second tag on the same instruction. The new tag is ignored.
    DuplicateTag {
        /// The rejected tag.
        tag: String,
        /// The command being tagged.
        command: String,
        /// The tag the command already carries.
        current: String,
    },
    /// An instruction already holds the maximum number of extensions.
    TooManyExtensions {
        /// The rejected extension.
        extension: String,
        /// The command declaring it.
        command: String,
        /// The per-instruction bound.
        limit: usize,
    },
    /// The instruction capacity is exhausted. Nothing after this point is parsed.
    CapacityReached {
        /// The instruction bound.
        limit: usize,
    },
    /// A second instruction without extensions. Only the first one can be the default.
    DuplicateDefault {
        /// The rejected command.
        command: String,
        /// The command that is already the default.
        default: String,
    },
}

/// A problem tied to a file and line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The problem and its context.
    pub kind: DiagnosticKind,
    /// Display name of the configuration file.
    pub file: String,
    /// 1-based line number.
    pub line: usize,
}

impl Diagnostic {
    /// Creates a diagnostic for `file` at `line`.
    pub fn new(kind: DiagnosticKind, file: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            file: file.into(),
            line,
        }
    }

    /// Log level the diagnostic deserves. Losing the rest of the file is an error, the
    /// line-scoped problems are warnings.
    pub fn level(&self) -> log::Level {
        match self.kind {
            DiagnosticKind::CapacityReached { .. } => log::Level::Error,
            _ => log::Level::Warn,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = &self.file;
        let line = self.line;
        match &self.kind {
            DiagnosticKind::MinusWithoutCommand => {
                write!(f, t!("diag.minus_without_command"), file = file, line = line)
            }
            DiagnosticKind::TagWithoutCommand { tag } => write!(
                f,
                t!("diag.tag_without_command"),
                file = file,
                line = line,
                tag = tag
            ),
            DiagnosticKind::EmptyTag { command } => write!(
                f,
                t!("diag.empty_tag"),
                file = file,
                line = line,
                command = command
            ),
            DiagnosticKind::DuplicateTag {
                tag,
                command,
                current,
            } => write!(
                f,
                t!("diag.duplicate_tag"),
                file = file,
                line = line,
                tag = tag,
                command = command,
                current = current
            ),
            DiagnosticKind::TooManyExtensions {
                extension,
                command,
                limit,
            } => write!(
                f,
                t!("diag.too_many_extensions"),
                file = file,
                line = line,
                extension = extension,
                command = command,
                limit = limit
            ),
            DiagnosticKind::CapacityReached { limit } => write!(
                f,
                t!("diag.capacity_reached"),
                file = file,
                line = line,
                limit = limit
            ),
            DiagnosticKind::DuplicateDefault { command, default } => write!(
                f,
                t!("diag.duplicate_default"),
                file = file,
                line = line,
                command = command,
                default = default
            ),
        }
    }
}

/// Receives diagnostics as the parser finds them.
pub trait DiagnosticSink {
    /// Accepts one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects diagnostics in order, for callers that want to inspect them.
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::log!(diagnostic.level(), "{}", diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_file_line_and_context() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::DuplicateTag {
                tag: "B".to_string(),
                command: "mpv".to_string(),
                current: "A".to_string(),
            },
            "xopen.conf",
            3,
        );
        let message = diagnostic.to_string();
        assert!(message.starts_with("xopen.conf:3:"), "{}", message);
        assert!(message.contains("@B"));
        assert!(message.contains("mpv"));
        assert!(message.contains("@A"));
    }

    #[test]
    fn test_capacity_is_reported_as_error() {
        let capacity = Diagnostic::new(DiagnosticKind::CapacityReached { limit: 2 }, "f", 1);
        let minus = Diagnostic::new(DiagnosticKind::MinusWithoutCommand, "f", 1);
        assert_eq!(capacity.level(), log::Level::Error);
        assert_eq!(minus.level(), log::Level::Warn);
    }

    #[test]
    fn test_vec_sink_keeps_order() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.report(Diagnostic::new(DiagnosticKind::MinusWithoutCommand, "f", 1));
        sink.report(Diagnostic::new(
            DiagnosticKind::EmptyTag {
                command: "mpv".to_string(),
            },
            "f",
            2,
        ));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1].line, 2);
    }
}
