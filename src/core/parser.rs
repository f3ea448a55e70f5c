//! # Instruction Parser
//!
//! A line-oriented state machine over the token stream produced by the
//! [`Lexer`](crate::core::lexer::Lexer). Each configuration line declares at most one
//! [`Instruction`]:
//!
//! ```text
//! COMMAND [- EXTENSION ...] [@TAG]
//! ```
//!
//! Problems scoped to one line (a `-` or a tag with no command, empty or repeated tags,
//! too many extensions, a second default) are reported to a [`DiagnosticSink`] and
//! parsing carries on. Two conditions end it early:
//!
//! - running out of instruction capacity keeps everything parsed so far;
//! - a literal where neither a command nor an extension can appear discards everything
//!   and returns a [`ParseError`].

use crate::{
    constants::{EXTENSION_CAPACITY, INSTRUCTION_CAPACITY},
    core::{
        diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink},
        lexer::{Lexer, Token, TokenKind},
    },
    models::{Instruction, InstructionStore},
};
use std::path::Path;
use thiserror::Error;

/// Fatal conditions that abort a parse and discard every instruction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A literal followed a command without a `-` in between.
    #[error(
        "{file}:{line}: unexpected '{text}' after command '{command}' (extensions must follow '-'). No command was loaded."
    )]
    UnexpectedLiteral {
        /// Display name of the configuration file.
        file: String,
        /// 1-based line number.
        line: usize,
        /// The offending literal.
        text: String,
        /// The command the literal followed.
        command: String,
    },
}

/// What the parser expects the next literal to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Start of a line: a literal starts a new instruction.
    #[default]
    ExpectCommand,
    /// Right after a command, before any `-`. A literal here is fatal.
    ExpectArguments,
    /// After a `-`: literals are extensions.
    ExpectExtensions,
}

/// Capacity bounds applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Maximum number of instructions kept from one file.
    pub instructions: usize,
    /// Maximum number of extensions per instruction.
    pub extensions: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            instructions: INSTRUCTION_CAPACITY,
            extensions: EXTENSION_CAPACITY,
        }
    }
}

impl ParseLimits {
    /// The default limits with a different instruction capacity.
    pub fn with_capacity(instructions: usize) -> Self {
        Self {
            instructions,
            ..Self::default()
        }
    }
}

/// Outcome of feeding one token to the state machine.
#[derive(Debug)]
enum Step {
    Continue,
    /// Drop the rest of the current line.
    SkipLine,
    /// Stop reading, keeping what was parsed.
    Stop,
    /// Stop reading, discarding everything.
    Abort(ParseError),
}

/// Parses configuration `text` into an [`InstructionStore`].
///
/// `source` names the file in diagnostics and is recorded on the store.
pub fn parse_instructions(
    text: &str,
    source: &Path,
    limits: ParseLimits,
    sink: &mut dyn DiagnosticSink,
) -> Result<InstructionStore, ParseError> {
    let parser = Parser {
        lexer: Lexer::new(text),
        file: source.display().to_string(),
        limits,
        sink,
        mode: ParseMode::default(),
        current: None,
        instructions: Vec::new(),
        truncated: false,
    };
    let (instructions, truncated) = parser.run()?;
    log::debug!(
        "Parsed {} instruction(s) from '{}'{}",
        instructions.len(),
        source.display(),
        if truncated { " (truncated)" } else { "" }
    );
    Ok(InstructionStore::new(instructions, source).with_truncated(truncated))
}

struct Parser<'a, 's> {
    lexer: Lexer<'a>,
    file: String,
    limits: ParseLimits,
    sink: &'s mut dyn DiagnosticSink,
    mode: ParseMode,
    /// The instruction declared on the current line, once its command is known.
    current: Option<Instruction>,
    instructions: Vec<Instruction>,
    truncated: bool,
}

impl Parser<'_, '_> {
    fn run(mut self) -> Result<(Vec<Instruction>, bool), ParseError> {
        let mut skip_line = false;
        loop {
            // A dropped line is fast-forwarded so it cannot produce more diagnostics.
            let token = if skip_line {
                skip_line = false;
                self.lexer.find_kind(TokenKind::Newline)
            } else {
                self.lexer.next_token()
            };

            match self.step(token) {
                Step::Continue => {}
                Step::SkipLine => skip_line = true,
                Step::Stop => break,
                Step::Abort(error) => return Err(error),
            }
        }
        self.finish_line();
        Ok((self.instructions, self.truncated))
    }

    fn step(&mut self, token: Token<'_>) -> Step {
        match token.kind {
            TokenKind::Eof => Step::Stop,
            TokenKind::Newline => {
                self.finish_line();
                self.mode = ParseMode::ExpectCommand;
                Step::Continue
            }
            TokenKind::Minus => {
                if self.current.is_none() {
                    self.report(DiagnosticKind::MinusWithoutCommand, token.line);
                    return Step::SkipLine;
                }
                self.mode = ParseMode::ExpectExtensions;
                Step::Continue
            }
            TokenKind::Tag => self.on_tag(token),
            TokenKind::Literal => self.on_literal(token),
            TokenKind::Unknown
            | TokenKind::OpenParen
            | TokenKind::CloseParen
            | TokenKind::Percent
            | TokenKind::LineComment => Step::Continue,
        }
    }

    fn on_tag(&mut self, token: Token<'_>) -> Step {
        if self.current.is_none() {
            self.report(
                DiagnosticKind::TagWithoutCommand {
                    tag: token.text.to_string(),
                },
                token.line,
            );
            return Step::SkipLine;
        }

        let problem = match self.current.as_mut() {
            Some(instruction) if token.is_empty() => DiagnosticKind::EmptyTag {
                command: instruction.command.clone(),
            },
            Some(instruction) => match &instruction.tag {
                Some(current) => DiagnosticKind::DuplicateTag {
                    tag: token.text.to_string(),
                    command: instruction.command.clone(),
                    current: current.clone(),
                },
                None => {
                    instruction.tag = Some(token.text.to_string());
                    return Step::Continue;
                }
            },
            None => return Step::Continue,
        };
        self.report(problem, token.line);
        Step::Continue
    }

    fn on_literal(&mut self, token: Token<'_>) -> Step {
        match self.mode {
            ParseMode::ExpectCommand => {
                if self.instructions.len() >= self.limits.instructions {
                    self.report(
                        DiagnosticKind::CapacityReached {
                            limit: self.limits.instructions,
                        },
                        token.line,
                    );
                    self.truncated = true;
                    return Step::Stop;
                }
                self.current = Some(Instruction::new(token.text, token.line));
                self.mode = ParseMode::ExpectArguments;
                Step::Continue
            }
            ParseMode::ExpectExtensions => {
                let limit = self.limits.extensions;
                match self.current.as_mut() {
                    Some(instruction) if instruction.extensions.len() < limit => {
                        instruction.extensions.push(token.text.to_string());
                        Step::Continue
                    }
                    Some(instruction) => {
                        let problem = DiagnosticKind::TooManyExtensions {
                            extension: token.text.to_string(),
                            command: instruction.command.clone(),
                            limit,
                        };
                        self.report(problem, token.line);
                        Step::Continue
                    }
                    None => Step::Abort(self.unexpected(token)),
                }
            }
            ParseMode::ExpectArguments => Step::Abort(self.unexpected(token)),
        }
    }

    /// Closes the current line: its instruction, if any, joins the result.
    fn finish_line(&mut self) {
        let Some(instruction) = self.current.take() else {
            return;
        };

        if instruction.is_default()
            && let Some(default) = self.instructions.iter().find(|i| i.is_default())
        {
            let problem = DiagnosticKind::DuplicateDefault {
                command: instruction.command.clone(),
                default: default.command.clone(),
            };
            self.report(problem, instruction.line);
            return;
        }

        log::trace!(
            "{}:{}: '{}' handles {:?}",
            self.file,
            instruction.line,
            instruction.command,
            instruction.extensions
        );
        self.instructions.push(instruction);
    }

    fn unexpected(&self, token: Token<'_>) -> ParseError {
        ParseError::UnexpectedLiteral {
            file: self.file.clone(),
            line: token.line,
            text: token.text.to_string(),
            command: self
                .current
                .as_ref()
                .map(|i| i.command.clone())
                .unwrap_or_default(),
        }
    }

    fn report(&mut self, kind: DiagnosticKind, line: usize) {
        self.sink
            .report(Diagnostic::new(kind, self.file.clone(), line));
    }
}
